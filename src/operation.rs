use ibkr_broker::{
    BrokerError, Direction, Gateway, HealthStatus, OrderResult, OrderTicket, PositionsResult,
    build_order,
};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::info;

use crate::error::ItemError;
use crate::params::OrderParams;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown operation: {0}")]
pub struct UnknownOperation(pub String);

/// The four operations the bridge exposes, named the way workflow items
/// name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    HealthCheck,
    ListPositions,
    PlaceOrder { side: Direction },
}

impl OperationKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HealthCheck => "healthCheck",
            Self::ListPositions => "listPositions",
            Self::PlaceOrder {
                side: Direction::Buy,
            } => "buyStock",
            Self::PlaceOrder {
                side: Direction::Sell,
            } => "sellStock",
        }
    }

    /// Runs the operation against the gateway. Order parameters are read
    /// from `item`; the other operations ignore it.
    pub async fn execute<G: Gateway + ?Sized>(
        self,
        gateway: &G,
        item: &Value,
    ) -> Result<OperationOutput, ItemError> {
        match self {
            Self::HealthCheck => Ok(OperationOutput::Health(gateway.check_health().await)),
            Self::ListPositions => Ok(OperationOutput::Positions(
                gateway.list_positions().await?,
            )),
            Self::PlaceOrder { side } => {
                let ticket = OrderParams::from_item(item)?.into_ticket(side)?;
                Ok(OperationOutput::Order(place_order(gateway, ticket).await?))
            }
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "healthCheck" => Ok(Self::HealthCheck),
            "listPositions" => Ok(Self::ListPositions),
            "buyStock" => Ok(Self::PlaceOrder {
                side: Direction::Buy,
            }),
            "sellStock" => Ok(Self::PlaceOrder {
                side: Direction::Sell,
            }),
            _ => Err(UnknownOperation(s.to_string())),
        }
    }
}

/// Normalized result of one operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OperationOutput {
    Health(HealthStatus),
    Positions(PositionsResult),
    Order(OrderResult),
}

/// Validates the ticket, resolves its instrument and submits it.
pub async fn place_order<G: Gateway + ?Sized>(
    gateway: &G,
    ticket: OrderTicket,
) -> Result<OrderResult, BrokerError> {
    let request = build_order(gateway, ticket).await?;
    let result = gateway.submit_order(&request).await?;

    info!(
        "Order for {} {} {} accepted with status {}",
        result.side, result.quantity, result.symbol, result.status
    );

    Ok(result)
}
