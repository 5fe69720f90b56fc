//! List endpoints treat malformed paging parameters as absent and keep errors in the envelope.

mod common;

use common::{spawn_server, TestResult};
use serde_json::json;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unparsable_paging_falls_back_to_defaults() -> TestResult {
    let server = spawn_server().await?;
    let token = server.login_as("pager").await?;

    for symbol in ["PGA", "PGB", "PGC"] {
        let (status, body) = server
            .post(
                "/api/meme-coins",
                Some(&token),
                json!({
                    "name": format!("Page {symbol}"),
                    "symbol": symbol,
                    "total_supply": "1000",
                    "network": "bsc"
                }),
            )
            .await?;
        assert_eq!(status, 201, "{body}");
    }

    for path in [
        "/api/meme-coins?limit=abc",
        "/api/meme-coins?offset=abc",
        "/api/meme-coins?limit=abc&offset=-1",
        "/api/meme-coins?limit=0",
        "/api/meme-coins?limit=1000",
        "/api/meme-coins/search?q=page&limit=many&offset=x",
    ] {
        let (status, body) = server.get(path, None).await?;
        assert_eq!(status, 200, "{path}: {body}");
        assert_eq!(body["success"], true, "{path}");
        assert_eq!(body["data"].as_array().map(Vec::len), Some(3), "{path}");
    }

    let (status, body) = server.get("/api/meme-coins?limit=2&offset=2", None).await?;
    assert_eq!(status, 200);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let (status, body) = server.get("/api/tokens?limit=abc&offset=zzz", None).await?;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body["success"], true);

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unknown_search_status_is_an_enveloped_400() -> TestResult {
    let server = spawn_server().await?;

    let (status, body) = server.get("/api/meme-coins/search?status=bogus", None).await?;
    assert_eq!(status, 400, "{body}");
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap_or_default().contains("status"));

    let (status, body) = server.get("/api/meme-coins/search?status=Pending", None).await?;
    assert_eq!(status, 200, "{body}");

    Ok(())
}
