use serde::Serialize;
use serde_json::Value;

use super::{IbkrError, IbkrGateway};

/// Positions as returned by the gateway. A list gets counted; anything else
/// is handed back exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PositionsResult {
    Listed { positions: Vec<Value>, count: usize },
    Passthrough(Value),
}

impl From<Value> for PositionsResult {
    fn from(response: Value) -> Self {
        match response {
            Value::Array(positions) => Self::Listed {
                count: positions.len(),
                positions,
            },
            other => Self::Passthrough(other),
        }
    }
}

impl IbkrGateway {
    pub(crate) async fn fetch_positions(&self) -> Result<PositionsResult, IbkrError> {
        let path = format!("/portfolio/{}/positions", self.account_path());
        let response = self.get_json("list positions", &path, &[]).await?;

        Ok(response.into())
    }
}
