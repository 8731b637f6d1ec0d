use async_trait::async_trait;
use serde_json::{Map, json};
use std::sync::{
    Arc,
    atomic::{AtomicI64, AtomicU64, Ordering},
};
use tracing::warn;

use crate::order::{OrderRequest, OrderResult};
use crate::{BrokerError, Gateway, HealthStatus, InstrumentRef, PositionsResult, Symbol};

const FIRST_DRY_RUN_CONID: i64 = 900_000_001;

/// Stand-in gateway for dry-run mode that logs operations without touching
/// the real gateway
#[derive(Debug, Clone)]
pub struct DryRunGateway {
    account_id: String,
    order_counter: Arc<AtomicU64>,
    conid_counter: Arc<AtomicI64>,
}

impl DryRunGateway {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            order_counter: Arc::new(AtomicU64::new(1)),
            conid_counter: Arc::new(AtomicI64::new(FIRST_DRY_RUN_CONID)),
        }
    }

    fn generate_order_id(&self) -> String {
        let id = self.order_counter.fetch_add(1, Ordering::SeqCst);
        format!("DRY_RUN_{id}")
    }
}

#[async_trait]
impl Gateway for DryRunGateway {
    fn account_id(&self) -> &str {
        &self.account_id
    }

    async fn check_health(&self) -> HealthStatus {
        warn!("[DRY-RUN] Health check - gateway is always healthy in dry-run mode");
        HealthStatus::from_status_code(200)
    }

    async fn list_positions(&self) -> Result<PositionsResult, BrokerError> {
        warn!(
            "[DRY-RUN] Listing positions for {} - no positions in dry-run mode",
            self.account_id
        );
        Ok(PositionsResult::from(json!([])))
    }

    async fn resolve_instrument(&self, symbol: &Symbol) -> Result<InstrumentRef, BrokerError> {
        let contract_id = self.conid_counter.fetch_add(1, Ordering::SeqCst);
        warn!("[DRY-RUN] Resolving {symbol} to synthetic conid {contract_id}");

        Ok(InstrumentRef {
            symbol: symbol.clone(),
            contract_id,
        })
    }

    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderResult, BrokerError> {
        let order_id = self.generate_order_id();

        warn!(
            "[DRY-RUN] Would submit {} order: {} {} shares of {} (order_id: {})",
            order.order_type, order.side, order.quantity, order.instrument.symbol, order_id
        );

        let mut response = Map::new();
        response.insert("id".to_string(), json!(order_id));
        response.insert("dryRun".to_string(), json!(true));

        Ok(OrderResult::from_response(order, response.into()))
    }
}
