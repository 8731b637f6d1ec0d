use ibkr_broker::{Direction, OrderTicket, OrderType, Shares, Symbol, TimeInForce, ValidationError};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

/// Order fields of a batch item, with the same defaults the workflow editor
/// shows. Fields not listed here (such as `operation`) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderParams {
    #[serde(default)]
    pub symbol: String,
    #[serde(default = "default_quantity")]
    pub quantity: Decimal,
    #[serde(default)]
    pub order_type: OrderType,
    #[serde(default)]
    pub limit_price: Option<Decimal>,
    #[serde(default)]
    pub stop_price: Option<Decimal>,
    #[serde(default)]
    pub time_in_force: TimeInForce,
}

const fn default_quantity() -> Decimal {
    Decimal::ONE
}

pub(crate) const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl OrderParams {
    /// Only a JSON object is accepted; an array would otherwise fill the
    /// fields positionally.
    pub fn from_item(item: &Value) -> Result<Self, serde_json::Error> {
        if !item.is_object() {
            return Err(serde::de::Error::custom(format!(
                "expected an object of order parameters, got {}",
                value_kind(item)
            )));
        }

        Self::deserialize(item)
    }

    /// Checks symbol and quantity. Price rules depend on the order type and
    /// are left to the order builder.
    pub fn into_ticket(self, side: Direction) -> Result<OrderTicket, ValidationError> {
        Ok(OrderTicket {
            side,
            symbol: Symbol::new(&self.symbol)?,
            quantity: Shares::new(self.quantity)?,
            order_type: self.order_type,
            limit_price: self.limit_price,
            stop_price: self.stop_price,
            time_in_force: self.time_in_force,
        })
    }
}
