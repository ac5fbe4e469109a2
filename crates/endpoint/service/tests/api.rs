use std::time::Duration;

use clap::Parser as _;
use claim_assembler::{ClaimPayload, B256, U256};
use claim_assembler_client::{
    mocks::{deposit, zero_proof, MockBridge, RunningBridge, StatusCode},
    Client, Config, Url,
};
use claim_assembler_service::{
    api::{self, Api},
    app, Cli,
};
use poem::{test::TestClient, Endpoint};
use serde_json::json;

const BRIDGE: &str = "0x22D0Cc772C6e87e6A952b675BB128CCF97B1A2d6";

fn service(mock: &RunningBridge) -> anyhow::Result<TestClient<impl Endpoint>> {
    let client = mock.client(Duration::from_secs(5))?;

    Ok(TestClient::new(app(client, "http://localhost:3000")))
}

fn request(marker: &str) -> serde_json::Value {
    json!({
        "data": marker,
        "sender": "0x0000000000000000000000000000000000000001",
    })
}

#[tokio::test]
async fn claim_returns_encoded_payload() -> anyhow::Result<()> {
    let mock = MockBridge::new(BRIDGE)
        .with_deposits([deposit("0xabc123")])
        .spawn()
        .await?;

    let response = service(&mock)?
        .post("/")
        .body_json(&request("0xabc123"))
        .send()
        .await;

    response.assert_status_is_ok();

    let json = response.json().await;
    let data = json.value().object().get("data").string().to_string();

    assert!(data.starts_with("0x"));

    let payload = ClaimPayload::decode(const_hex::decode(&data)?)?;

    assert_eq!(payload.globalIndex, U256::from(7));
    assert_eq!(payload.mainnetExitRoot, B256::ZERO);
    assert_eq!(payload.rollupExitRoot, B256::ZERO);
    assert!(payload.smtProofLocalExitRoot.iter().all(|h| h.is_zero()));
    assert!(payload.smtProofRollupExitRoot.iter().all(|h| h.is_zero()));
    assert_eq!(payload.metadata.as_ref(), &[0xab, 0xc1, 0x23]);

    Ok(())
}

#[tokio::test]
async fn missing_deposit_is_not_found() -> anyhow::Result<()> {
    let mock = MockBridge::new(BRIDGE)
        .with_deposits([deposit("0xabc123")])
        .spawn()
        .await?;

    let response = service(&mock)?
        .post("/")
        .body_json(&request("0xABC123"))
        .send()
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    response
        .assert_json(json!({ "error": Api::NOT_FOUND }))
        .await;

    Ok(())
}

#[tokio::test]
async fn pending_deposit_is_unavailable() -> anyhow::Result<()> {
    let mut pending = deposit("0xabc123");
    pending.ready_for_claim = false;
    pending.claim_tx_hash = Some("0x5d3a".into());

    let mock = MockBridge::new(BRIDGE)
        .with_deposits([pending])
        .spawn()
        .await?;

    let response = service(&mock)?
        .post("/")
        .body_json(&request("0xabc123"))
        .send()
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    response
        .assert_json(json!({ "error": "Deposit not ready for claim" }))
        .await;

    Ok(())
}

#[tokio::test]
async fn claimed_deposit_is_unavailable() -> anyhow::Result<()> {
    let mut claimed = deposit("0xabc123");
    claimed.claim_tx_hash = Some("0x5d3a".into());

    let mock = MockBridge::new(BRIDGE)
        .with_deposits([claimed])
        .spawn()
        .await?;

    let response = service(&mock)?
        .post("/")
        .body_json(&request("0xabc123"))
        .send()
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    response
        .assert_json(json!({ "error": "Deposit already claimed" }))
        .await;

    Ok(())
}

#[tokio::test]
async fn upstream_failure_is_internal_error() -> anyhow::Result<()> {
    let mocks = [
        MockBridge::new(BRIDGE).with_deposits_status(StatusCode::BAD_GATEWAY),
        MockBridge::new(BRIDGE)
            .with_deposits([deposit("0xabc123")])
            .with_proof_status(StatusCode::INTERNAL_SERVER_ERROR),
    ];

    for mock in mocks {
        let mock = mock.spawn().await?;
        let response = service(&mock)?
            .post("/")
            .body_json(&request("0xabc123"))
            .send()
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response
            .assert_json(json!({ "error": "Internal Server Error" }))
            .await;
    }

    Ok(())
}

#[tokio::test]
async fn malformed_proof_is_internal_error() -> anyhow::Result<()> {
    let mut proof = zero_proof();
    proof.rollup_merkle_proof.push(B256::ZERO);

    let mock = MockBridge::new(BRIDGE)
        .with_deposits([deposit("0xabc123")])
        .with_proof(proof)
        .spawn()
        .await?;

    let response = service(&mock)?
        .post("/")
        .body_json(&request("0xabc123"))
        .send()
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response
        .assert_json(json!({ "error": "Internal Server Error" }))
        .await;

    Ok(())
}

#[tokio::test]
async fn unreachable_upstream_is_internal_error() -> anyhow::Result<()> {
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        listener.local_addr()?
    };

    let url = Url::parse(&format!("http://{addr}"))?;
    let client = Client::new(Config::new(url, BRIDGE))?;
    let service = TestClient::new(app(client, "http://localhost:3000"));

    let response = service
        .post("/")
        .body_json(&request("0xabc123"))
        .send()
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response
        .assert_json(json!({ "error": "Internal Server Error" }))
        .await;

    Ok(())
}

#[tokio::test]
async fn claim_without_sender_is_served() -> anyhow::Result<()> {
    let mock = MockBridge::new(BRIDGE)
        .with_deposits([deposit("0xabc123")])
        .spawn()
        .await?;

    let service = service(&mock)?;

    let bodies = [
        json!({ "data": "0xabc123" }),
        json!({ "data": "0xabc123", "sender": null }),
    ];

    for body in bodies {
        let response = service.post("/").body_json(&body).send().await;

        response.assert_status_is_ok();

        let json = response.json().await;
        let data = json.value().object().get("data").string().to_string();

        assert_eq!(
            ClaimPayload::decode(const_hex::decode(&data)?)?.globalIndex,
            U256::from(7)
        );
    }

    Ok(())
}

#[tokio::test]
async fn request_without_marker_is_rejected() -> anyhow::Result<()> {
    let mock = MockBridge::new(BRIDGE).spawn().await?;

    let response = service(&mock)?
        .post("/")
        .body_json(&json!({ "sender": "0x01" }))
        .send()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response
        .assert_json(json!({ "error": Api::BAD_REQUEST }))
        .await;

    assert!(mock.proof_queries().is_empty());

    Ok(())
}

#[tokio::test]
async fn request_body_errors_are_json() -> anyhow::Result<()> {
    let mock = MockBridge::new(BRIDGE).spawn().await?;
    let service = service(&mock)?;

    let response = service
        .post("/")
        .content_type("application/json")
        .body("{ \"data\": ")
        .send()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response
        .assert_json(json!({ "error": Api::BAD_REQUEST }))
        .await;

    let response = service
        .post("/")
        .body_json(&json!({ "data": 42 }))
        .send()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response
        .assert_json(json!({ "error": Api::BAD_REQUEST }))
        .await;

    Ok(())
}

#[tokio::test]
async fn unknown_route_is_json() -> anyhow::Result<()> {
    let mock = MockBridge::new(BRIDGE).spawn().await?;

    let response = service(&mock)?.get("/claims").send().await;

    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(json!({ "error": "Not Found" })).await;

    Ok(())
}

#[tokio::test]
async fn server_errors_are_generic() -> anyhow::Result<()> {
    let response = api::error_response(poem::Error::from_string(
        "connection reset by peer",
        StatusCode::BAD_GATEWAY,
    ))
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = response.into_body().into_string().await?;
    let body: serde_json::Value = serde_json::from_str(&body)?;

    assert_eq!(body, json!({ "error": Api::INTERNAL_ERROR }));

    Ok(())
}

#[tokio::test]
async fn spec_is_served() -> anyhow::Result<()> {
    let mock = MockBridge::new(BRIDGE).spawn().await?;

    service(&mock)?
        .get("/spec")
        .send()
        .await
        .assert_status_is_ok();

    Ok(())
}

#[test]
fn cli_reads_configuration() -> anyhow::Result<()> {
    let cli = Cli::try_parse_from([
        "claim-assembler",
        "--base-url",
        "https://bridge-api.zkevm-test.net",
        "--bridge",
        BRIDGE,
        "--bind",
        "127.0.0.1:3001",
        "--timeout",
        "2500",
    ])?;

    let config = cli.config();

    assert_eq!(config.base_url.as_str(), "https://bridge-api.zkevm-test.net/");
    assert_eq!(config.bridge, BRIDGE);
    assert_eq!(config.timeout, Duration::from_millis(2500));
    assert_eq!(cli.bind.port(), 3001);

    Ok(())
}

#[test]
fn cli_rejects_invalid_configuration() {
    let invalid = [
        ["claim-assembler", "--base-url", "", "--bridge", BRIDGE],
        ["claim-assembler", "--base-url", "bridge-api", "--bridge", BRIDGE],
        ["claim-assembler", "--base-url", "ftp://bridge-api", "--bridge", BRIDGE],
        ["claim-assembler", "--base-url", "http://bridge-api", "--bridge", ""],
    ];

    for args in invalid {
        assert!(Cli::try_parse_from(args).is_err(), "{args:?}");
    }
}
