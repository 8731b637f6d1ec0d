use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod dry_run;
pub mod error;
pub mod ibkr;
pub mod order;

#[cfg(test)]
pub mod test_utils;

pub use dry_run::DryRunGateway;
pub use error::{BrokerError, ValidationError};
pub use ibkr::{
    HealthState, HealthStatus, IbkrEnv, IbkrError, IbkrGateway, InstrumentRef, PositionsResult,
};
pub use order::{OrderRequest, OrderResult, OrderTicket, OrderType, TimeInForce, build_order};

/// Ticker symbol as typed by the user. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(symbol: impl AsRef<str>) -> Result<Self, ValidationError> {
        let symbol = symbol.as_ref().trim();

        if symbol.is_empty() {
            return Err(ValidationError::MissingSymbol);
        }

        Ok(Self(symbol.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order quantity. Always strictly positive; fractional quantities are passed
/// through to the gateway, which decides whether the instrument allows them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Shares(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Shares {
    pub fn new(quantity: Decimal) -> Result<Self, ValidationError> {
        if quantity <= Decimal::ZERO {
            return Err(ValidationError::InvalidQuantity(quantity));
        }

        Ok(Self(quantity))
    }

    pub const fn value(self) -> Decimal {
        self.0
    }
}

impl Display for Shares {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The brokerage gateway as seen by the orchestrator.
///
/// Every method is a single request/response step. Implementations hold the
/// account they trade on; nothing is cached between calls.
#[async_trait]
pub trait Gateway: Send + Sync + std::fmt::Debug {
    fn account_id(&self) -> &str;

    /// Never fails: transport problems are reported as an unhealthy status.
    async fn check_health(&self) -> HealthStatus;

    async fn list_positions(&self) -> Result<PositionsResult, BrokerError>;

    async fn resolve_instrument(&self, symbol: &Symbol) -> Result<InstrumentRef, BrokerError>;

    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderResult, BrokerError>;
}
