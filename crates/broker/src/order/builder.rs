use rust_decimal::Decimal;
use tracing::debug;

use super::{OrderRequest, OrderTicket, OrderType};
use crate::error::ValidationError;
use crate::{BrokerError, Gateway};

/// Prices that survive validation for a given order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceFields {
    pub limit_price: Option<Decimal>,
    pub stop_price: Option<Decimal>,
}

/// Checks the conditional price fields. The limit rule is checked before the
/// stop rule, so a stop-limit order missing both reports the limit price.
///
/// Zero and negative prices count as absent. Prices the order type does not
/// use are dropped.
pub fn validate_prices(
    order_type: OrderType,
    limit_price: Option<Decimal>,
    stop_price: Option<Decimal>,
) -> Result<PriceFields, ValidationError> {
    let positive = |price: Option<Decimal>| price.filter(|p| *p > Decimal::ZERO);

    let limit_price = if order_type.requires_limit_price() {
        Some(positive(limit_price).ok_or(ValidationError::MissingLimitPrice)?)
    } else {
        None
    };

    let stop_price = if order_type.requires_stop_price() {
        Some(positive(stop_price).ok_or(ValidationError::MissingStopPrice)?)
    } else {
        None
    };

    Ok(PriceFields {
        limit_price,
        stop_price,
    })
}

/// Turns a ticket into a submittable order. Validation runs first so a bad
/// ticket never costs a contract lookup; the lookup is the only request made.
pub async fn build_order<G: Gateway + ?Sized>(
    gateway: &G,
    ticket: OrderTicket,
) -> Result<OrderRequest, BrokerError> {
    let prices = validate_prices(ticket.order_type, ticket.limit_price, ticket.stop_price)?;

    let instrument = gateway.resolve_instrument(&ticket.symbol).await?;

    debug!(
        "Built {} {} order for {} {} (conid {})",
        ticket.order_type, ticket.side, ticket.quantity, instrument.symbol, instrument.contract_id
    );

    Ok(OrderRequest {
        account_id: gateway.account_id().to_string(),
        side: ticket.side,
        instrument,
        quantity: ticket.quantity,
        order_type: ticket.order_type,
        limit_price: prices.limit_price,
        stop_price: prices.stop_price,
        time_in_force: ticket.time_in_force,
    })
}
