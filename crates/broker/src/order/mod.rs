use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::ibkr::InstrumentRef;
use crate::{Direction, Shares, Symbol};

mod builder;
mod result;

pub use builder::{PriceFields, build_order, validate_prices};
pub use result::OrderResult;

/// Order types accepted by the gateway. Serialized with the gateway's own
/// codes; the descriptive names are accepted on input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    #[default]
    #[serde(rename = "MKT", alias = "MARKET")]
    Market,
    #[serde(rename = "LMT", alias = "LIMIT")]
    Limit,
    #[serde(rename = "STP", alias = "STOP")]
    Stop,
    #[serde(rename = "STP LMT", alias = "STOP_LIMIT")]
    StopLimit,
}

impl OrderType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Market => "MKT",
            Self::Limit => "LMT",
            Self::Stop => "STP",
            Self::StopLimit => "STP LMT",
        }
    }

    pub const fn requires_limit_price(self) -> bool {
        matches!(self, Self::Limit | Self::StopLimit)
    }

    pub const fn requires_stop_price(self) -> bool {
        matches!(self, Self::Stop | Self::StopLimit)
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MKT" | "MARKET" => Ok(Self::Market),
            "LMT" | "LIMIT" => Ok(Self::Limit),
            "STP" | "STOP" => Ok(Self::Stop),
            "STP LMT" | "STOP_LIMIT" => Ok(Self::StopLimit),
            _ => Err(ValidationError::InvalidOrderType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    #[default]
    #[serde(rename = "DAY")]
    Day,
    #[serde(rename = "GTC", alias = "GOOD_TILL_CANCEL")]
    GoodTillCancel,
    #[serde(rename = "IOC", alias = "IMMEDIATE_OR_CANCEL")]
    ImmediateOrCancel,
    #[serde(rename = "FOK", alias = "FILL_OR_KILL")]
    FillOrKill,
}

impl TimeInForce {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "DAY",
            Self::GoodTillCancel => "GTC",
            Self::ImmediateOrCancel => "IOC",
            Self::FillOrKill => "FOK",
        }
    }
}

impl std::fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TimeInForce {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DAY" => Ok(Self::Day),
            "GTC" | "GOOD_TILL_CANCEL" => Ok(Self::GoodTillCancel),
            "IOC" | "IMMEDIATE_OR_CANCEL" => Ok(Self::ImmediateOrCancel),
            "FOK" | "FILL_OR_KILL" => Ok(Self::FillOrKill),
            _ => Err(ValidationError::InvalidTimeInForce(s.to_string())),
        }
    }
}

/// What the user asked for, before prices are checked against the order type
/// and before the symbol is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTicket {
    pub side: Direction,
    pub symbol: Symbol,
    pub quantity: Shares,
    pub order_type: OrderType,
    pub limit_price: Option<Decimal>,
    pub stop_price: Option<Decimal>,
    pub time_in_force: TimeInForce,
}

impl OrderTicket {
    /// Market day order with no prices.
    pub fn market(side: Direction, symbol: Symbol, quantity: Shares) -> Self {
        Self {
            side,
            symbol,
            quantity,
            order_type: OrderType::Market,
            limit_price: None,
            stop_price: None,
            time_in_force: TimeInForce::Day,
        }
    }
}

/// A validated order bound to a resolved contract. Only [`build_order`]
/// produces one, so `limit_price` is set exactly when the order type takes a
/// limit and `stop_price` exactly when it takes a stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub account_id: String,
    pub side: Direction,
    pub instrument: InstrumentRef,
    pub quantity: Shares,
    pub order_type: OrderType,
    pub limit_price: Option<Decimal>,
    pub stop_price: Option<Decimal>,
    pub time_in_force: TimeInForce,
}

impl OrderRequest {
    pub fn payload(&self) -> OrderPayload {
        OrderPayload {
            orders: vec![WireOrder {
                conid: self.instrument.contract_id,
                order_type: self.order_type,
                side: self.side,
                quantity: self.quantity,
                tif: self.time_in_force,
                price: self.limit_price,
                aux_price: self.stop_price,
            }],
        }
    }
}

/// Body of `POST /iserver/account/{accountId}/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderPayload {
    pub orders: Vec<WireOrder>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireOrder {
    pub conid: i64,
    pub order_type: OrderType,
    pub side: Direction,
    pub quantity: Shares,
    pub tif: TimeInForce,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub aux_price: Option<Decimal>,
}
