use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::IbkrGateway;
use crate::{BrokerError, Symbol};

/// A symbol bound to the gateway's contract id (conid).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentRef {
    pub symbol: Symbol,
    pub contract_id: i64,
}

/// Picks the contract id out of a stock search response.
///
/// A list of candidates resolves to the first candidate, trusting the
/// gateway's ranking: a ticker listed on several exchanges may resolve to a
/// listing other than the one intended. A bare object resolves to its own
/// conid.
pub fn contract_id_from_search(response: &Value) -> Option<i64> {
    match response {
        Value::Array(candidates) => candidates
            .first()
            .and_then(|candidate| candidate.get("conid"))
            .and_then(parse_conid),
        Value::Object(fields) => fields.get("conid").and_then(parse_conid),
        _ => None,
    }
}

fn parse_conid(value: &Value) -> Option<i64> {
    let conid = match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };

    conid.filter(|id| *id > 0)
}

impl IbkrGateway {
    pub(crate) async fn search_contract(&self, symbol: &Symbol) -> Result<InstrumentRef, BrokerError> {
        let response = self
            .get_json(
                "contract search",
                "/iserver/secdef/search",
                &[
                    ("symbol", symbol.as_str()),
                    ("name", "true"),
                    ("secType", "STK"),
                ],
            )
            .await?;

        let Some(contract_id) = contract_id_from_search(&response) else {
            warn!("No contract found for symbol {symbol}");
            return Err(BrokerError::ContractNotFound {
                symbol: symbol.to_string(),
            });
        };

        debug!("Resolved {symbol} to conid {contract_id}");

        Ok(InstrumentRef {
            symbol: symbol.clone(),
            contract_id,
        })
    }
}
