use httpmock::MockServer;
use ibkr_broker::{IbkrEnv, IbkrGateway};

use crate::env::{Env, LogLevel};

pub const TEST_ACCOUNT_ID: &str = "DU1234567";

pub fn create_test_env(base_url: String) -> IbkrEnv {
    IbkrEnv {
        base_url,
        account_id: TEST_ACCOUNT_ID.to_string(),
        accept_invalid_certs: false,
    }
}

pub fn create_test_app_env(server: &MockServer) -> Env {
    Env {
        log_level: LogLevel::Debug,
        ibkr: create_test_env(server.base_url()),
        dry_run: false,
        otlp_api_key: None,
        otlp_endpoint: "http://localhost:4318/v1/traces".to_string(),
    }
}

pub fn create_test_gateway(server: &MockServer) -> IbkrGateway {
    IbkrGateway::try_from_env(&create_test_env(server.base_url())).unwrap()
}

/// Gateway pointed at a port nothing listens on.
pub fn create_unreachable_gateway() -> IbkrGateway {
    IbkrGateway::try_from_env(&create_test_env("http://127.0.0.1:1".to_string())).unwrap()
}
