//! Wallet connections, network reads and the payment state machine over HTTP.

mod common;

use common::{spawn_server, TestResult};
use memecoin_creator::crypto::address::random_address;
use reqwest::Method;
use serde_json::json;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_wallets_and_networks() -> TestResult {
    let server = spawn_server().await?;
    let token = server.login_as("collector").await?;

    let (status, info) = server.get("/api/networks/ethereum", None).await?;
    assert_eq!(status, 200);
    assert_eq!(info["data"]["chain_id"], 1);
    assert!(info["data"]["deployment_cost"].is_number());

    let (status, _) = server.get("/api/networks/dogechain", None).await?;
    assert_eq!(status, 404);

    let (status, gas) = server.get("/api/networks/bsc/gas-price", None).await?;
    assert_eq!(status, 200);
    assert_eq!(gas["data"]["gas_price"], "12000000000");
    assert_eq!(gas["data"]["source"], "rpc");

    let address = random_address();
    let (status, balance) = server
        .get(&format!("/api/networks/ethereum/balance/{address}"), None)
        .await?;
    assert_eq!(status, 200);
    assert_eq!(balance["data"]["balance"], "2000000000000000000");

    let (status, _) = server.get("/api/networks/ethereum/balance/0xnope", None).await?;
    assert_eq!(status, 400);

    let (status, wallet) = server
        .post(
            "/api/wallets",
            Some(&token),
            json!({ "address": address.to_lowercase(), "wallet_type": "walletconnect" }),
        )
        .await?;
    assert_eq!(status, 201, "{wallet}");
    assert_eq!(wallet["data"]["address"], address.as_str());
    let wallet_id = wallet["data"]["id"].as_str().ok_or("missing id")?.to_string();

    let other = server.login_as("copycat").await?;
    let (status, _) = server
        .post("/api/wallets", Some(&other), json!({ "address": address }))
        .await?;
    assert_eq!(status, 409);

    let (status, _) = server
        .call(Method::DELETE, &format!("/api/wallets/{wallet_id}"), Some(&other), None)
        .await?;
    assert_eq!(status, 403);

    let (status, _) = server
        .call(Method::DELETE, &format!("/api/wallets/{wallet_id}"), Some(&token), None)
        .await?;
    assert_eq!(status, 200);
    let (_, wallets) = server.get("/api/wallets", Some(&token)).await?;
    assert_eq!(wallets["data"].as_array().map(Vec::len), Some(0));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_payment_lifecycle() -> TestResult {
    let server = spawn_server().await?;
    let token = server.login_as("payer").await?;

    let (status, coin) = server
        .post(
            "/api/meme-coins",
            Some(&token),
            json!({
                "name": "Bonk",
                "symbol": "BONK",
                "total_supply": "1000",
                "network": "ethereum"
            }),
        )
        .await?;
    assert_eq!(status, 201, "{coin}");
    let coin_id = coin["data"]["id"].as_str().ok_or("missing id")?.to_string();

    let (status, body) = server
        .post(
            "/api/payments",
            Some(&token),
            json!({ "meme_coin_id": coin_id, "amount": 0.0001, "currency": "ETH" }),
        )
        .await?;
    assert_eq!(status, 400, "{body}");

    let (status, created) = server
        .post(
            "/api/payments",
            Some(&token),
            json!({ "meme_coin_id": coin_id, "amount": 0.05, "currency": "eth" }),
        )
        .await?;
    assert_eq!(status, 201, "{created}");
    assert_eq!(created["data"]["status"], "pending");
    assert_eq!(created["data"]["currency"], "ETH");
    let id = created["data"]["id"].as_str().ok_or("missing id")?.to_string();

    let (status, _) = server
        .post(&format!("/api/payments/{id}/refund"), Some(&token), json!({}))
        .await?;
    assert_eq!(status, 409);

    // No body at all: a hash is simulated.
    let response = server
        .client
        .post(server.url(&format!("/api/payments/{id}/process")))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 200);
    let processed: serde_json::Value = response.json().await?;
    assert_eq!(processed["data"]["status"], "completed");
    assert!(processed["data"]["paid_at"].is_string());
    assert!(processed["data"]["transaction_hash"].is_string());

    let (status, refunded) = server
        .post(&format!("/api/payments/{id}/refund"), Some(&token), json!({}))
        .await?;
    assert_eq!(status, 200);
    assert_eq!(refunded["data"]["status"], "refunded");

    let stranger = server.login_as("snoop").await?;
    let (status, _) = server.get(&format!("/api/payments/{id}"), Some(&stranger)).await?;
    assert_eq!(status, 403);

    let (_, mine) = server.get("/api/user/payments", Some(&token)).await?;
    assert_eq!(mine["data"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn test_profile_and_password() -> TestResult {
    let server = spawn_server().await?;
    let token = server.login_as("profiled").await?;

    let (status, _) = server.get("/api/profile", None).await?;
    assert_eq!(status, 401);
    let (status, _) = server.get("/api/profile", Some("not-a-jwt")).await?;
    assert_eq!(status, 401);

    let (status, profile) = server
        .call(
            Method::PUT,
            "/api/profile",
            Some(&token),
            Some(json!({ "email": "profiled@example.com", "first_name": "Pro" })),
        )
        .await?;
    assert_eq!(status, 200, "{profile}");
    assert_eq!(profile["data"]["email"], "profiled@example.com");
    assert!(profile["data"].get("password_hash").is_none());

    let (status, _) = server
        .call(
            Method::PUT,
            "/api/user/password",
            Some(&token),
            Some(json!({ "current_password": "wrong-one!", "new_password": "another-long-one" })),
        )
        .await?;
    assert_eq!(status, 401);

    let (status, _) = server
        .call(
            Method::PUT,
            "/api/user/password",
            Some(&token),
            Some(json!({
                "current_password": "correct-horse-battery",
                "new_password": "another-long-one"
            })),
        )
        .await?;
    assert_eq!(status, 200);

    let (status, _) = server
        .post(
            "/auth/login",
            None,
            json!({ "username": "profiled", "password": "another-long-one" }),
        )
        .await?;
    assert_eq!(status, 200);
    Ok(())
}
