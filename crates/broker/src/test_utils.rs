use httpmock::MockServer;
use rust_decimal_macros::dec;

use crate::order::{OrderTicket, OrderType};
use crate::{Direction, IbkrEnv, IbkrGateway, Shares, Symbol};

pub const TEST_ACCOUNT_ID: &str = "DU1234567";

pub fn create_test_env(base_url: String) -> IbkrEnv {
    IbkrEnv {
        base_url,
        account_id: TEST_ACCOUNT_ID.to_string(),
        accept_invalid_certs: false,
    }
}

/// Gateway pointed at a mock server, trading on [`TEST_ACCOUNT_ID`].
pub fn create_test_gateway(server: &MockServer) -> IbkrGateway {
    IbkrGateway::try_from_env(&create_test_env(server.base_url())).unwrap()
}

/// Gateway pointed at a port nothing listens on.
pub fn create_unreachable_gateway() -> IbkrGateway {
    IbkrGateway::try_from_env(&create_test_env("http://127.0.0.1:1".to_string())).unwrap()
}

/// Ten-share day order of the given type with no prices set.
pub fn ticket(side: Direction, symbol: &str, order_type: OrderType) -> OrderTicket {
    OrderTicket {
        order_type,
        ..OrderTicket::market(
            side,
            Symbol::new(symbol).unwrap(),
            Shares::new(dec!(10)).unwrap(),
        )
    }
}
