use thiserror::Error;

pub mod broker;
pub mod contract;
pub mod env;
pub mod health;
pub mod positions;

pub use broker::IbkrGateway;
pub use contract::InstrumentRef;
pub use env::IbkrEnv;
pub use health::{HealthState, HealthStatus};
pub use positions::PositionsResult;

#[derive(Error, Debug)]
pub enum IbkrError {
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parsing failed: {0}")]
    Url(#[from] url::ParseError),
    #[error("{action} failed with status: {status}, body: {body}")]
    RequestFailed {
        action: String,
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error(
        "Failed to parse API response: {action}, response: {response_text}, error: {parse_error}"
    )]
    ApiResponseParse {
        action: String,
        response_text: String,
        parse_error: String,
    },
}
