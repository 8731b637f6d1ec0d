use clap::Parser;

use super::IbkrError;

/// Client Portal gateway connection settings
#[derive(Parser, Debug, Clone)]
pub struct IbkrEnv {
    /// Gateway API base URL (paper vs live gateway)
    /// Paper: http://localhost:4001/v1/api
    /// Live: http://localhost:7497/v1/api
    #[clap(
        long,
        env = "IBKR_BASE_URL",
        default_value = "http://localhost:4001/v1/api"
    )]
    pub base_url: String,

    /// Interactive Brokers account the orders are placed on
    #[clap(long, env = "IBKR_ACCOUNT_ID")]
    pub account_id: String,

    /// The gateway serves a self-signed certificate when run over https
    #[clap(long, env = "IBKR_ACCEPT_INVALID_CERTS", default_value = "false")]
    pub accept_invalid_certs: bool,
}

impl IbkrEnv {
    /// Base URL with a single trailing slash removed, checked to be a URL.
    pub fn normalized_base_url(&self) -> Result<String, IbkrError> {
        let base_url = self
            .base_url
            .strip_suffix('/')
            .unwrap_or(&self.base_url)
            .to_string();

        url::Url::parse(&base_url)?;

        Ok(base_url)
    }

    pub fn validated_account_id(&self) -> Result<String, IbkrError> {
        let account_id = self.account_id.trim();

        if account_id.is_empty() {
            return Err(IbkrError::InvalidConfiguration(
                "account id must not be empty".to_string(),
            ));
        }

        Ok(account_id.to_string())
    }
}
