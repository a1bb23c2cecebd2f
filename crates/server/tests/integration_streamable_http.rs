mod common;
mod common_mcp;

use axum::Router;
use axum::routing::{get, put};
use common::{
    KillOnDrop, MockApi, TEST_SEC1_PEM, TEST_TOKEN, pick_unused_port, spawn_http_server,
    wait_http_ok,
};
use common_mcp::{McpHttpClient, result_json, result_text};
use serde_json::json;
use std::time::Duration;

fn mock_bank() -> Router {
    Router::new()
        .route(
            "/api/v2/accounts",
            get(|| async {
                axum::Json(json!({"accounts": [{"accountUid": "acc-1", "defaultCategory": "cat-1"}]}))
            }),
        )
        .route(
            "/api/v2/payments/local/account/{a}/category/{c}",
            put(|| async { axum::Json(json!({"paymentOrderUid": "po-1"})) }),
        )
}

async fn start(extra_env: &[(&str, &str)]) -> anyhow::Result<(MockApi, KillOnDrop, McpHttpClient)> {
    let bank = MockApi::start(mock_bank()).await?;
    let port = pick_unused_port()?;
    let child = KillOnDrop(spawn_http_server(bank.base_url(), port, extra_env)?);

    let base_url = format!("http://127.0.0.1:{port}");
    wait_http_ok(&format!("{base_url}/health"), Duration::from_secs(10)).await?;
    Ok((bank, child, McpHttpClient::new(&base_url)))
}

#[tokio::test]
async fn initialize_reports_server_identity() -> anyhow::Result<()> {
    let (bank, _server, mcp) = start(&[]).await?;

    let msg = mcp
        .request(
            1,
            "initialize",
            json!({
                "protocolVersion": "2025-03-26",
                "capabilities": {},
                "clientInfo": { "name": "starling-bank-mcp-integration-tests", "version": "0" }
            }),
            Duration::from_secs(5),
        )
        .await?;

    assert_eq!(msg["result"]["serverInfo"]["name"], json!("starling-bank-mcp"));
    assert_eq!(msg["result"]["serverInfo"]["version"], json!("1.0.0"));
    assert!(msg["result"]["capabilities"]["tools"].is_object());

    bank.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn tools_list_serves_the_catalog_without_a_session() -> anyhow::Result<()> {
    let (bank, _server, mcp) = start(&[]).await?;

    let resp = mcp
        .post(json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list", "params": {}}))
        .await?;
    assert!(resp.headers().get("Mcp-Session-Id").is_none());
    drop(resp);

    let msg = mcp
        .request(2, "tools/list", json!({}), Duration::from_secs(5))
        .await?;
    let tools = msg["result"]["tools"].as_array().cloned().unwrap_or_default();
    assert_eq!(tools.len(), 24);

    let payment = tools
        .iter()
        .find(|t| t["name"] == json!("payment_create"))
        .expect("payment_create listed");
    assert_eq!(payment["title"], json!("Create payment"));
    assert_eq!(payment["annotations"]["readOnlyHint"], json!(false));
    assert_eq!(payment["annotations"]["idempotentHint"], json!(false));

    let deposit = tools
        .iter()
        .find(|t| t["name"] == json!("savings_goal_deposit"))
        .expect("savings_goal_deposit listed");
    assert!(deposit["outputSchema"].is_object());

    bank.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn tools_call_reaches_the_bank_with_bearer_auth() -> anyhow::Result<()> {
    let (bank, _server, mcp) = start(&[]).await?;

    let result = mcp.call_tool(1, "accounts_list", json!({})).await?;
    assert_eq!(result["isError"], json!(false));
    assert_eq!(
        result_json(&result)?,
        json!({"accounts": [{"accountUid": "acc-1", "defaultCategory": "cat-1"}]})
    );

    let reqs = bank.requests();
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].path, "/api/v2/accounts");
    assert_eq!(
        reqs[0].header("authorization"),
        Some(format!("Bearer {TEST_TOKEN}").as_str())
    );

    bank.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn tool_failures_are_results_not_protocol_errors() -> anyhow::Result<()> {
    let (bank, _server, mcp) = start(&[]).await?;

    let result = mcp.call_tool(1, "no_such_tool", json!({})).await?;
    assert_eq!(result["isError"], json!(true));
    assert_eq!(result_text(&result)?, "Error: Unknown tool: no_such_tool");

    let result = mcp.call_tool(2, "payment_create", json!({
        "accountUid": "a",
        "categoryUid": "c",
        "destinationPayeeAccountUid": "p",
        "reference": "r",
        "amount": {"currency": "GBP", "minorUnits": 1},
    })).await?;
    assert_eq!(result["isError"], json!(true));
    assert!(result_text(&result)?.contains("signing key material not configured"));
    assert!(bank.requests().is_empty());

    bank.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn payment_create_is_signed_when_a_key_is_configured() -> anyhow::Result<()> {
    let escaped_pem = TEST_SEC1_PEM.replace('\n', "\\n");
    let (bank, _server, mcp) = start(&[
        ("STARLING_BANK_PRIVATE_KEY_PEM", escaped_pem.as_str()),
        ("STARLING_BANK_PRIVATE_KEY_UID", "key-uid-1"),
    ])
    .await?;

    let result = mcp.call_tool(1, "payment_create", json!({
        "accountUid": "acc-1",
        "categoryUid": "cat-1",
        "destinationPayeeAccountUid": "payee-acc",
        "reference": "rent",
        "amount": {"currency": "GBP", "minorUnits": 120_000},
    })).await?;
    assert_eq!(result["isError"], json!(false));
    assert_eq!(result_json(&result)?, json!({"paymentOrderUid": "po-1"}));

    let reqs = bank.requests();
    assert_eq!(reqs.len(), 1);
    let auth = reqs[0].header("authorization").unwrap_or_default();
    assert!(auth.starts_with(&format!("Bearer {TEST_TOKEN};Signature keyid=\"key-uid-1\"")));
    assert!(auth.contains("headers=\"(request-target) Date Digest\""));
    assert!(reqs[0].header("digest").is_some());
    assert!(reqs[0].header("date").is_some());

    bank.shutdown().await;
    Ok(())
}
