use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::env;
use std::time::Duration;
use tracing::{debug, error};

use super::{Tool, ToolOutput};
use crate::config::SearchConfig;
use crate::error::{VotaError, VotaResult};

#[derive(Debug, Deserialize)]
struct SearchInput {
    query: String,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    max_results: u32,
    search_depth: &'a str,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub url: String,
    pub content: String,
}

/// Web search backed by the Tavily API.
pub struct TavilySearchTool {
    client: Client,
    api_key: String,
    base_url: String,
    max_results: u32,
}

impl TavilySearchTool {
    pub fn new(config: &SearchConfig) -> VotaResult<Self> {
        let api_key = env::var("TAVILY_API_KEY")
            .map_err(|_| VotaError::config("TAVILY_API_KEY environment variable not set"))?;

        Self::with_api_key(api_key, config)
    }

    pub fn with_api_key(api_key: String, config: &SearchConfig) -> VotaResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("vota/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_results: config.max_results,
        })
    }

    pub async fn search(&self, query: &str) -> VotaResult<Vec<SearchHit>> {
        let url = format!("{}/search", self.base_url);
        debug!("Searching for '{}'", query);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&SearchRequest {
                query,
                max_results: self.max_results,
                search_depth: "advanced",
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            error!("Tavily API error ({}): {}", status, error_text);
            return Err(VotaError::provider(format!("Tavily API error ({}): {}", status, error_text)));
        }

        let body: SearchResponse = response.json().await?;
        Ok(body.results.into_iter().take(self.max_results as usize).collect())
    }
}

#[async_trait]
impl Tool for TavilySearchTool {
    async fn execute(&self, input: Value) -> VotaResult<ToolOutput> {
        let args: SearchInput = serde_json::from_value(input)
            .map_err(|e| VotaError::invalid_input(format!("search expects a query string: {}", e)))?;

        let hits = self.search(&args.query).await?;
        Ok(ToolOutput::new(serde_json::to_value(hits)?))
    }

    fn name(&self) -> &str {
        "tavily_search_results_json"
    }

    fn description(&self) -> &str {
        "A search engine optimized for comprehensive, accurate, and trusted results. \
         Useful for when you need to answer questions about current events. \
         Input should be a search query."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "search query to look up" }
            },
            "required": ["query"]
        })
    }
}
