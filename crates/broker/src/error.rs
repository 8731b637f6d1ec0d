use rust_decimal::Decimal;

use crate::ibkr::IbkrError;

/// Order fields that fail the order-type rules. Always raised before any
/// request reaches the gateway.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Symbol is required")]
    MissingSymbol,
    #[error("Quantity must be greater than zero, got {0}")]
    InvalidQuantity(Decimal),
    #[error("Limit price is required for limit orders")]
    MissingLimitPrice,
    #[error("Stop price is required for stop orders")]
    MissingStopPrice,
    #[error("Invalid order type: '{0}'. Expected one of: MKT, LMT, STP, STP LMT")]
    InvalidOrderType(String),
    #[error("Invalid time in force: '{0}'. Expected one of: DAY, GTC, IOC, FOK")]
    InvalidTimeInForce(String),
}

#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Could not find contract ID for symbol: {symbol}. Please verify the symbol is correct.")]
    ContractNotFound { symbol: String },

    #[error("IBKR API error: {0}")]
    Ibkr(#[from] IbkrError),
}
