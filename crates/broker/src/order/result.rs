use serde::Serialize;
use serde_json::{Map, Value, json};

use super::{OrderRequest, OrderType};
use crate::{Direction, Shares, Symbol};

const ORDER_ID_KEYS: [&str; 3] = ["id", "orderId", "order_id"];
const STATUS_KEYS: [&str; 2] = ["status", "order_status"];
const DEFAULT_STATUS: &str = "submitted";

/// Normalized answer to an order submission.
///
/// Serializes as the submitted order (`orderId`, `status`, `symbol`, `side`,
/// `quantity`, `orderType`) overlaid with every field of the gateway
/// response, so the gateway's value wins wherever the two share a key. The
/// typed fields hold the order as submitted plus the id and status picked
/// out of the response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OrderResult {
    #[serde(skip)]
    pub order_id: Option<String>,
    #[serde(skip)]
    pub status: String,
    #[serde(skip)]
    pub symbol: Symbol,
    #[serde(skip)]
    pub side: Direction,
    #[serde(skip)]
    pub quantity: Shares,
    #[serde(skip)]
    pub order_type: OrderType,
    fields: Map<String, Value>,
}

impl OrderResult {
    pub fn from_response(order: &OrderRequest, response: Value) -> Self {
        let response = match response {
            Value::Object(fields) => fields,
            // The gateway answers with one entry per submitted order.
            Value::Array(entries) => entries
                .into_iter()
                .find_map(|entry| match entry {
                    Value::Object(fields) => Some(fields),
                    _ => None,
                })
                .unwrap_or_default(),
            _ => Map::new(),
        };

        let order_id = ORDER_ID_KEYS
            .iter()
            .find_map(|key| response.get(*key).and_then(scalar_to_string));

        let status = STATUS_KEYS
            .iter()
            .find_map(|key| response.get(*key).and_then(scalar_to_string))
            .unwrap_or_else(|| DEFAULT_STATUS.to_string());

        let mut fields = Map::new();
        if let Some(order_id) = &order_id {
            fields.insert("orderId".to_string(), json!(order_id));
        }
        fields.insert("status".to_string(), json!(status));
        fields.insert("symbol".to_string(), json!(order.instrument.symbol));
        fields.insert("side".to_string(), json!(order.side));
        fields.insert("quantity".to_string(), json!(order.quantity));
        fields.insert("orderType".to_string(), json!(order.order_type));
        fields.extend(response);

        Self {
            order_id,
            status,
            symbol: order.instrument.symbol.clone(),
            side: order.side,
            quantity: order.quantity,
            order_type: order.order_type,
            fields,
        }
    }

    /// A field of the serialized result, gateway fields included.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
