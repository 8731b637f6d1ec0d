use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};

use super::{HealthStatus, IbkrEnv, IbkrError, InstrumentRef, PositionsResult};
use crate::order::{OrderRequest, OrderResult};
use crate::{BrokerError, Gateway, Symbol};

/// Client Portal gateway reached over HTTP
#[derive(Debug, Clone)]
pub struct IbkrGateway {
    client: reqwest::Client,
    base_url: String,
    account_id: String,
}

impl IbkrGateway {
    pub fn try_from_env(env: &IbkrEnv) -> Result<Self, IbkrError> {
        let base_url = env.normalized_base_url()?;
        let account_id = env.validated_account_id()?;

        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(env.accept_invalid_certs)
            .build()?;

        Ok(Self {
            client,
            base_url,
            account_id,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub(crate) fn account_path(&self) -> String {
        urlencoding::encode(&self.account_id).into_owned()
    }

    pub(crate) async fn get_json(
        &self,
        action: &str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, IbkrError> {
        let url = self.url(path);
        debug!("GET {url} ({action})");

        let response = self.client.get(&url).query(query).send().await?;

        read_json(action, response).await
    }

    pub(crate) async fn post_json<T: Serialize + Sync>(
        &self,
        action: &str,
        path: &str,
        body: &T,
    ) -> Result<Value, IbkrError> {
        let url = self.url(path);
        debug!("POST {url} ({action})");

        let response = self.client.post(&url).json(body).send().await?;

        read_json(action, response).await
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<OrderResult, IbkrError> {
        info!(
            "Submitting {} order: {} {} shares of {} (conid {}, tif {})",
            order.order_type,
            order.side,
            order.quantity,
            order.instrument.symbol,
            order.instrument.contract_id,
            order.time_in_force
        );

        let path = format!(
            "/iserver/account/{}/orders",
            urlencoding::encode(&order.account_id)
        );
        let response = self
            .post_json("submit order", &path, &order.payload())
            .await?;

        let result = OrderResult::from_response(order, response);

        info!(
            "Order for {} accepted by gateway: order_id={:?}, status={}",
            result.symbol, result.order_id, result.status
        );

        Ok(result)
    }
}

/// Turns a gateway response into JSON, treating any non-2xx status as a
/// failure of `action`. An empty body reads as `null`.
async fn read_json(action: &str, response: reqwest::Response) -> Result<Value, IbkrError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(IbkrError::RequestFailed {
            action: action.to_string(),
            status,
            body,
        });
    }

    let response_text = response.text().await?;
    debug!("IBKR {action} response: {response_text}");

    if response_text.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&response_text).map_err(|parse_error| {
        error!(
            action = %action,
            response_text = %response_text,
            parse_error = %parse_error,
            "Failed to parse IBKR response"
        );
        IbkrError::ApiResponseParse {
            action: action.to_string(),
            response_text,
            parse_error: parse_error.to_string(),
        }
    })
}

#[async_trait]
impl Gateway for IbkrGateway {
    fn account_id(&self) -> &str {
        &self.account_id
    }

    async fn check_health(&self) -> HealthStatus {
        self.fetch_health().await
    }

    async fn list_positions(&self) -> Result<PositionsResult, BrokerError> {
        Ok(self.fetch_positions().await?)
    }

    async fn resolve_instrument(&self, symbol: &Symbol) -> Result<InstrumentRef, BrokerError> {
        self.search_contract(symbol).await
    }

    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderResult, BrokerError> {
        Ok(self.place_order(order).await?)
    }
}
