use httpmock::prelude::*;
use ibkr_bridge::{BatchError, BatchRunner, FailureMode, ItemState, OperationKind};
use ibkr_broker::{DryRunGateway, IbkrEnv, IbkrGateway};
use serde_json::{Value, json};

fn create_gateway(server: &MockServer) -> IbkrGateway {
    IbkrGateway::try_from_env(&IbkrEnv {
        base_url: format!("{}/", server.base_url()),
        account_id: "U7654321".to_string(),
        accept_invalid_certs: false,
    })
    .unwrap()
}

fn workflow_items() -> Vec<Value> {
    vec![
        json!({"operation": "buyStock", "symbol": "AAPL", "quantity": 10, "orderType": "MKT"}),
        json!({"operation": "buyStock", "symbol": "MSFT", "quantity": 5, "orderType": "LMT", "limitPrice": 0}),
        json!({"operation": "healthCheck"}),
        json!({"operation": "sellStock", "symbol": "NVDA", "quantity": 3, "orderType": "STP", "stopPrice": 120.5, "timeInForce": "GTC"}),
        json!({"operation": "listPositions"}),
    ]
}

#[tokio::test]
async fn test_workflow_with_continue_on_fail() {
    let server = MockServer::start();
    let gateway = create_gateway(&server);

    let aapl_search = server.mock(|when, then| {
        when.method(GET)
            .path("/iserver/secdef/search")
            .query_param("symbol", "AAPL");
        then.status(200)
            .json_body(json!([{"conid": 265_598, "companyName": "APPLE INC"}]));
    });
    let nvda_search = server.mock(|when, then| {
        when.method(GET)
            .path("/iserver/secdef/search")
            .query_param("symbol", "NVDA");
        then.status(200).json_body(json!([{"conid": "4815747"}]));
    });
    let msft_search = server.mock(|when, then| {
        when.method(GET)
            .path("/iserver/secdef/search")
            .query_param("symbol", "MSFT");
        then.status(200).json_body(json!([{"conid": 272_093}]));
    });
    let buy_order = server.mock(|when, then| {
        when.method(POST)
            .path("/iserver/account/U7654321/orders")
            .body_contains(r#""side":"BUY""#);
        then.status(200)
            .json_body(json!([{"order_id": "1001", "order_status": "Submitted"}]));
    });
    let sell_order = server.mock(|when, then| {
        when.method(POST)
            .path("/iserver/account/U7654321/orders")
            .json_body(json!({
                "orders": [{
                    "conid": 4_815_747,
                    "orderType": "STP",
                    "side": "SELL",
                    "quantity": 3.0,
                    "tif": "GTC",
                    "auxPrice": 120.5
                }]
            }));
        then.status(200)
            .json_body(json!([{"id": "1002", "message": ["Order will be held until triggered"]}]));
    });
    let health = server.mock(|when, then| {
        when.method(GET).path("/iserver/auth/status");
        then.status(200).json_body(json!({"authenticated": true}));
    });
    let positions = server.mock(|when, then| {
        when.method(GET).path("/portfolio/U7654321/positions");
        then.status(200).json_body(json!([
            {"conid": 265_598, "position": 10.0, "ticker": "AAPL"}
        ]));
    });

    let records = BatchRunner::new(&gateway, FailureMode::Continue)
        .run(&workflow_items())
        .await
        .unwrap();

    aapl_search.assert();
    nvda_search.assert();
    msft_search.assert_hits(0);
    buy_order.assert();
    sell_order.assert();
    health.assert();
    positions.assert();

    let states: Vec<_> = records.iter().map(|record| record.state()).collect();
    assert_eq!(
        states,
        vec![
            ItemState::Succeeded,
            ItemState::Failed,
            ItemState::Succeeded,
            ItemState::Succeeded,
            ItemState::Succeeded,
        ]
    );

    let output = serde_json::to_value(&records).unwrap();
    assert_eq!(output[0]["json"]["orderId"], "1001");
    assert_eq!(output[0]["json"]["status"], "Submitted");
    assert_eq!(output[0]["json"]["symbol"], "AAPL");
    assert_eq!(
        output[1],
        json!({
            "json": {"error": "Limit price is required for limit orders"},
            "pairedItem": {"item": 1}
        })
    );
    assert_eq!(output[2]["json"]["status"], "healthy");
    assert_eq!(output[2]["json"]["statusCode"], 200);
    assert_eq!(output[3]["json"]["orderId"], "1002");
    assert_eq!(output[3]["json"]["status"], "submitted");
    assert_eq!(output[3]["json"]["orderType"], "STP");
    assert_eq!(output[4]["json"]["count"], 1);
    assert_eq!(output[4]["pairedItem"]["item"], 4);
}

#[tokio::test]
async fn test_workflow_aborts_without_continue_on_fail() {
    let server = MockServer::start();
    let gateway = create_gateway(&server);

    server.mock(|when, then| {
        when.method(GET).path("/iserver/secdef/search");
        then.status(200).json_body(json!([{"conid": 265_598}]));
    });
    let orders = server.mock(|when, then| {
        when.method(POST).path("/iserver/account/U7654321/orders");
        then.status(200).json_body(json!([{"order_id": "1001"}]));
    });
    let health = server.mock(|when, then| {
        when.method(GET).path("/iserver/auth/status");
        then.status(200);
    });

    let err = BatchRunner::new(&gateway, FailureMode::Abort)
        .run(&workflow_items())
        .await
        .unwrap_err();

    assert!(matches!(err, BatchError::ItemFailed { index: 1, .. }));
    orders.assert_hits(1);
    health.assert_hits(0);
}

#[tokio::test]
async fn test_gateway_outage_recorded_per_item() {
    let server = MockServer::start();
    let gateway = create_gateway(&server);

    let search = server.mock(|when, then| {
        when.method(GET).path("/iserver/secdef/search");
        then.status(500).body("Internal Server Error");
    });

    let records = BatchRunner::new(&gateway, FailureMode::Continue)
        .with_default_operation(Some(OperationKind::PlaceOrder {
            side: ibkr_broker::Direction::Buy,
        }))
        .run(&[json!({"symbol": "AAPL"}), json!({"symbol": "MSFT"})])
        .await
        .unwrap();

    search.assert_hits(2);
    for record in &records {
        let error = record.error().unwrap();
        assert!(error.contains("contract search failed with status: 500"), "{error}");
    }
}

#[tokio::test]
async fn test_dry_run_workflow_never_fails_healthy_items() {
    let gateway = DryRunGateway::new("U7654321");

    let records = BatchRunner::new(&gateway, FailureMode::Continue)
        .run(&workflow_items())
        .await
        .unwrap();

    let output = serde_json::to_value(&records).unwrap();
    assert_eq!(output[0]["json"]["orderId"], "DRY_RUN_1");
    assert_eq!(output[0]["json"]["dryRun"], true);
    assert_eq!(
        output[1]["json"]["error"],
        "Limit price is required for limit orders"
    );
    assert_eq!(output[3]["json"]["orderId"], "DRY_RUN_2");
    assert_eq!(output[4]["json"], json!({"positions": [], "count": 0}));
}
