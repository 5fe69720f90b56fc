//! Meme coin lifecycle over HTTP:
//! register, create, browse, edit, deploy, then verify the deployed coin is locked.

mod common;

use common::{spawn_server, TestResult};
use reqwest::Method;
use serde_json::json;

fn coin_body(symbol: &str) -> serde_json::Value {
    json!({
        "name": "Doge Moon",
        "symbol": symbol,
        "description": "much wow",
        "total_supply": "1000000000",
        "network": "bsc",
        "website": "https://dogemoon.example"
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_meme_coin_lifecycle() -> TestResult {
    let server = spawn_server().await?;
    let token = server.login_as("shibe").await?;

    // Create requires auth.
    let (status, _) = server.post("/api/meme-coins", None, coin_body("dgm")).await?;
    assert_eq!(status, 401);

    let (status, created) = server
        .post("/api/meme-coins", Some(&token), coin_body("dgm"))
        .await?;
    assert_eq!(status, 201, "{created}");
    assert!(created["success"].as_bool().unwrap_or(false));
    let coin = &created["data"];
    assert_eq!(coin["symbol"], "DGM");
    assert_eq!(coin["status"], "pending");
    let id = coin["id"].as_str().ok_or("missing id")?.to_string();

    // Symbols are unique regardless of case.
    let (status, _) = server
        .post("/api/meme-coins", Some(&token), coin_body("DgM"))
        .await?;
    assert_eq!(status, 409);

    let (status, by_symbol) = server.get("/api/meme-coins/symbol/dgm", None).await?;
    assert_eq!(status, 200);
    assert_eq!(by_symbol["data"]["id"], id.as_str());

    let (status, found) = server.get("/api/meme-coins/search?q=moon", None).await?;
    assert_eq!(status, 200);
    assert_eq!(found["data"].as_array().map(Vec::len), Some(1));

    let (status, on_eth) = server.get("/api/meme-coins?network=ethereum", None).await?;
    assert_eq!(status, 200);
    assert_eq!(on_eth["data"].as_array().map(Vec::len), Some(0));

    // A stranger may not edit; the creator may, and blank fields are ignored.
    let stranger = server.login_as("cat_person").await?;
    let (status, _) = server
        .call(
            Method::PUT,
            &format!("/api/meme-coins/{id}"),
            Some(&stranger),
            Some(json!({ "description": "stolen" })),
        )
        .await?;
    assert_eq!(status, 403);

    let (status, updated) = server
        .call(
            Method::PUT,
            &format!("/api/meme-coins/{id}"),
            Some(&token),
            Some(json!({ "description": "to the moon", "name": "" })),
        )
        .await?;
    assert_eq!(status, 200, "{updated}");
    assert_eq!(updated["data"]["description"], "to the moon");
    assert_eq!(updated["data"]["name"], "Doge Moon");

    let (status, contract) = server.get(&format!("/api/meme-coins/{id}/contract"), None).await?;
    assert_eq!(status, 200);
    assert!(contract["data"]["contract_code"]
        .as_str()
        .unwrap_or_default()
        .contains("contract DogeMoon is ERC20, Ownable"));

    // Deploy once; the second attempt conflicts.
    let (status, deployed) = server
        .post(&format!("/api/meme-coins/{id}/deploy"), Some(&token), json!({}))
        .await?;
    assert_eq!(status, 200, "{deployed}");
    assert_eq!(deployed["data"]["meme_coin"]["status"], "deployed");
    assert!(deployed["data"]["meme_coin"]["contract_address"].is_string());
    assert_eq!(deployed["data"]["deployment"]["status"], "confirmed");

    let (status, _) = server
        .post(&format!("/api/meme-coins/{id}/deploy"), Some(&token), json!({}))
        .await?;
    assert_eq!(status, 409);

    let (status, deployments) = server
        .get(&format!("/api/meme-coins/{id}/deployments"), None)
        .await?;
    assert_eq!(status, 200);
    assert_eq!(deployments["data"].as_array().map(Vec::len), Some(1));

    // Deployed coins stay.
    let (status, body) = server
        .call(Method::DELETE, &format!("/api/meme-coins/{id}"), Some(&token), None)
        .await?;
    assert_eq!(status, 400, "{body}");

    let (status, mine) = server.get("/api/user/meme-coins", Some(&token)).await?;
    assert_eq!(status, 200);
    assert_eq!(mine["data"].as_array().map(Vec::len), Some(1));

    Ok(())
}

#[tokio::test]
async fn test_meme_coin_input_errors() -> TestResult {
    let server = spawn_server().await?;
    let token = server.login_as("validator").await?;

    let mut bad = coin_body("X");
    let (status, body) = server.post("/api/meme-coins", Some(&token), bad.clone()).await?;
    assert_eq!(status, 400, "{body}");
    assert_eq!(body["success"], false);

    bad["symbol"] = json!("GOOD");
    bad["network"] = json!("solana");
    let (status, _) = server.post("/api/meme-coins", Some(&token), bad).await?;
    assert_eq!(status, 400);

    let response = server
        .client
        .post(server.url("/api/meme-coins"))
        .bearer_auth(&token)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 422);
    let body: serde_json::Value = response.json().await?;
    assert!(body["error"]
        .as_str()
        .unwrap_or_default()
        .starts_with("Invalid JSON body"));

    let (status, _) = server.get("/api/meme-coins/not-a-uuid", None).await?;
    assert_eq!(status, 400);
    let (status, _) = server
        .get("/api/meme-coins/00000000-0000-4000-8000-000000000000", None)
        .await?;
    assert_eq!(status, 404);

    let (status, health) = server.get("/health", None).await?;
    assert_eq!(status, 200);
    assert_eq!(health["data"]["storage"], "memory");
    Ok(())
}
