mod common;

use serde_json::json;
use std::time::Duration;

use common::serve_once;
use vota::config::SearchConfig;
use vota::tools::search::SearchHit;
use vota::tools::{TavilySearchTool, Tool};
use vota::{VotaError, VotaResult};

fn search_tool(base_url: &str, max_results: u32) -> VotaResult<TavilySearchTool> {
    let config = SearchConfig {
        base_url: base_url.to_string(),
        max_results,
        timeout_secs: 5,
    };
    TavilySearchTool::with_api_key("test-key".to_string(), &config)
}

#[tokio::test]
async fn search_keeps_at_most_max_results_hits() -> VotaResult<()> {
    let body = json!({
        "query": "weather in birmingham",
        "results": [
            { "url": "https://a.example", "content": "rain", "score": 0.9 },
            { "url": "https://b.example", "content": "cloudy", "score": 0.8 },
            { "url": "https://c.example", "content": "sun", "score": 0.1 }
        ]
    });
    let (base_url, request_rx) = serve_once(200, "application/json", vec![body.to_string()], Duration::ZERO).await?;
    let tool = search_tool(&base_url, 2)?;

    let hits = tool.search("weather in birmingham").await?;

    assert_eq!(
        hits,
        vec![
            SearchHit {
                url: "https://a.example".to_string(),
                content: "rain".to_string(),
            },
            SearchHit {
                url: "https://b.example".to_string(),
                content: "cloudy".to_string(),
            },
        ]
    );

    let sent = request_rx.await.unwrap();
    assert!(sent.starts_with("POST /search "));
    assert!(sent.to_lowercase().contains("authorization: bearer test-key"));
    assert!(sent.contains("\"max_results\":2"));
    assert!(sent.contains("\"query\":\"weather in birmingham\""));
    Ok(())
}

#[tokio::test]
async fn search_tool_returns_hits_as_json() -> VotaResult<()> {
    let body = json!({ "results": [{ "url": "https://a.example", "content": "rain" }] });
    let (base_url, _request) = serve_once(200, "application/json", vec![body.to_string()], Duration::ZERO).await?;
    let tool = search_tool(&base_url, 2)?;

    let output = tool.execute(json!({ "query": "weather" })).await?;

    assert_eq!(output.content, json!([{ "url": "https://a.example", "content": "rain" }]));
    Ok(())
}

#[tokio::test]
async fn error_status_is_a_provider_error() -> VotaResult<()> {
    let body = json!({ "detail": { "error": "Unauthorized: missing or invalid API key." } });
    let (base_url, _request) = serve_once(401, "application/json", vec![body.to_string()], Duration::ZERO).await?;
    let tool = search_tool(&base_url, 2)?;

    let err = tool.search("weather").await.unwrap_err();

    assert!(
        matches!(err, VotaError::Provider(ref msg) if msg.contains("401") && msg.contains("invalid API key")),
        "{}",
        err
    );
    Ok(())
}

#[tokio::test]
async fn missing_query_is_rejected_before_any_request() -> VotaResult<()> {
    // Nothing listens here; a request would fail with a network error instead
    let tool = search_tool("http://127.0.0.1:9", 2)?;

    let err = tool.execute(json!({ "q": "weather" })).await.unwrap_err();

    assert!(matches!(err, VotaError::InvalidInput(_)), "{}", err);
    Ok(())
}
