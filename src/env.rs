use clap::Parser;
use ibkr_broker::{DryRunGateway, Gateway, IbkrEnv, IbkrError, IbkrGateway};
use std::sync::Arc;
use tracing::Level;

use crate::telemetry::{self, TelemetryGuard};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct Env {
    #[clap(long, env, default_value = "info")]
    pub log_level: LogLevel,
    #[clap(flatten)]
    pub ibkr: IbkrEnv,
    /// Log orders instead of sending them to the gateway
    #[clap(long, env, default_value = "false")]
    pub dry_run: bool,
    /// API key for OTLP trace export (optional)
    #[clap(long, env)]
    pub otlp_api_key: Option<String>,
    #[clap(long, env, default_value = "https://in-otel.hyperdx.io/v1/traces")]
    pub otlp_endpoint: String,
}

impl Env {
    pub fn get_gateway(&self) -> Result<Arc<dyn Gateway>, IbkrError> {
        if self.dry_run {
            Ok(Arc::new(DryRunGateway::new(
                self.ibkr.validated_account_id()?,
            )))
        } else {
            Ok(Arc::new(IbkrGateway::try_from_env(&self.ibkr)?))
        }
    }
}

pub(crate) fn default_filter(level: Level) -> String {
    format!("ibkr_bridge={level},ibkr_broker={level}")
}

/// Installs the global subscriber. Logs go to stderr so stdout stays
/// reserved for JSON results. The returned guard flushes exported spans on
/// drop and must be held for the life of the process.
pub fn setup_tracing(env: &Env) -> Option<TelemetryGuard> {
    let level: Level = env.log_level.into();

    if let Some(ref api_key) = env.otlp_api_key {
        match telemetry::setup_telemetry(api_key.clone(), &env.otlp_endpoint, level) {
            Ok(guard) => return Some(guard),
            Err(e) => {
                eprintln!("Failed to set up OTLP export: {e}, falling back to console logging");
            }
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(level).into()),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TEST_ACCOUNT_ID;

    fn parse(args: &[&str]) -> Result<Env, clap::Error> {
        Env::try_parse_from(std::iter::once("ibkr-bridge").chain(args.iter().copied()))
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(Level::from(LogLevel::Trace), Level::TRACE);
        assert_eq!(Level::from(LogLevel::Warn), Level::WARN);
        assert_eq!(Level::from(LogLevel::Error), Level::ERROR);
    }

    #[test]
    fn test_default_filter_names_both_crates() {
        assert_eq!(
            default_filter(Level::DEBUG),
            "ibkr_bridge=DEBUG,ibkr_broker=DEBUG"
        );
    }

    #[test]
    fn test_parse_with_defaults() {
        let env = parse(&["--account-id", TEST_ACCOUNT_ID]).unwrap();

        assert_eq!(env.log_level, LogLevel::Info);
        assert!(!env.dry_run);
        assert!(env.otlp_api_key.is_none());
        assert_eq!(env.ibkr.account_id, TEST_ACCOUNT_ID);
    }

    #[test]
    fn test_dry_run_gateway() {
        let env = parse(&["--account-id", TEST_ACCOUNT_ID, "--dry-run"]).unwrap();
        let gateway = env.get_gateway().unwrap();

        assert_eq!(gateway.account_id(), TEST_ACCOUNT_ID);
        assert!(format!("{gateway:?}").contains("DryRunGateway"));
    }

    #[test]
    fn test_real_gateway() {
        let env = parse(&[
            "--account-id",
            TEST_ACCOUNT_ID,
            "--base-url",
            "https://localhost:5000/v1/api/",
        ])
        .unwrap();
        let gateway = env.get_gateway().unwrap();

        assert_eq!(gateway.account_id(), TEST_ACCOUNT_ID);
        assert!(format!("{gateway:?}").contains("IbkrGateway"));
    }

    #[test]
    fn test_blank_account_rejected_in_both_modes() {
        let env = parse(&["--account-id", "  "]).unwrap();
        assert!(matches!(
            env.get_gateway(),
            Err(IbkrError::InvalidConfiguration(_))
        ));

        let env = parse(&["--account-id", "  ", "--dry-run"]).unwrap();
        assert!(matches!(
            env.get_gateway(),
            Err(IbkrError::InvalidConfiguration(_))
        ));
    }
}
