//! `websearch` tool: search the web using the DuckDuckGo Instant Answer API.
//!
//! The API needs no key and returns abstracts, instant answers,
//! definitions and related topics rather than a full result listing. Each
//! of those becomes one structured output item, capped at `limit`.
//!
//! # Inputs
//!
//! | Name | Type | Required | Default |
//! |------|------|:---:|---------|
//! | `query` | string | Yes | |
//! | `limit` | number | No | 5 |

use serde_json::{Value, json};
use toolrun_application::{ToolContext, ToolEvent, ToolEventStream, ToolFailure, ToolHandler};
use toolrun_domain::{ToolCall, ToolDefinition, ToolInput, ToolOutput, WEB_SEARCH};

/// DuckDuckGo Instant Answer API endpoint (no API key required).
const DDG_API_URL: &str = "https://api.duckduckgo.com/";

/// Default number of result items
const DEFAULT_LIMIT: i64 = 5;

pub fn web_search_definition() -> ToolDefinition {
    ToolDefinition::new(
        WEB_SEARCH,
        "Search the web using DuckDuckGo. Returns instant answers, abstracts, and related topics.",
    )
    .with_display_name("Web search")
    .with_alias("web_search")
    .with_alias("search")
    .with_input(ToolInput::required("query", "The search query"))
    .with_input(
        ToolInput::optional("limit", "Maximum number of results", DEFAULT_LIMIT)
            .with_type("number"),
    )
    .on_by_default(true)
}

/// Handler for `websearch`
#[derive(Debug, Clone)]
pub struct WebSearch {
    client: reqwest::Client,
}

impl WebSearch {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl ToolHandler for WebSearch {
    fn call(&self, call: &ToolCall, _context: &ToolContext) -> ToolEventStream {
        let client = self.client.clone();
        let query = call.require_string("query").map(str::to_string);
        let limit = call.get_i64("limit").unwrap_or(DEFAULT_LIMIT).max(1) as usize;

        Box::pin(async_stream::stream! {
            match query {
                Err(e) => {
                    yield Err(ToolFailure::from(e));
                }
                Ok(query) => {
                    yield Ok(ToolEvent::Progress(format!("Searching the web for \"{}\"", query)));
                    yield fetch_instant_answer(&client, &query)
                        .await
                        .map(|data| ToolEvent::Output(ToolOutput::new(search_results(&data, limit))));
                }
            }
        })
    }
}

async fn fetch_instant_answer(client: &reqwest::Client, query: &str) -> Result<Value, ToolFailure> {
    let response = client
        .get(DDG_API_URL)
        .query(&[
            ("q", query),
            ("format", "json"),
            ("no_html", "1"),
            ("skip_disambig", "1"),
        ])
        .send()
        .await
        .map_err(|e| ToolFailure::new(format!("Search request failed: {}", e)))?;

    if !response.status().is_success() {
        return Err(ToolFailure::new(format!(
            "Search API returned error: {}",
            response.status()
        )));
    }

    response
        .json()
        .await
        .map_err(|e| ToolFailure::new(format!("Failed to parse search results: {}", e)))
}

fn non_empty<'a>(data: &'a Value, key: &str) -> Option<&'a str> {
    data[key].as_str().filter(|s| !s.is_empty())
}

/// Turn an Instant Answer response into at most `limit` result items.
fn search_results(data: &Value, limit: usize) -> Vec<Value> {
    let mut items = Vec::new();

    if let Some(text) = non_empty(data, "AbstractText") {
        items.push(json!({
            "kind": "summary",
            "source": data["AbstractSource"].as_str().unwrap_or("Unknown"),
            "text": text,
            "url": data["AbstractURL"].as_str().unwrap_or(""),
        }));
    }

    if let Some(answer) = non_empty(data, "Answer") {
        items.push(json!({"kind": "answer", "text": answer}));
    }

    if let Some(definition) = non_empty(data, "Definition") {
        items.push(json!({
            "kind": "definition",
            "source": data["DefinitionSource"].as_str().unwrap_or("Unknown"),
            "text": definition,
        }));
    }

    // Topic groups nest their topics one level down
    if let Some(topics) = data["RelatedTopics"].as_array() {
        let flat = topics.iter().flat_map(|t| match t["Topics"].as_array() {
            Some(group) => group.iter().collect::<Vec<_>>(),
            None => vec![t],
        });
        for topic in flat {
            if let Some(text) = non_empty(topic, "Text") {
                items.push(json!({
                    "kind": "related",
                    "text": text,
                    "url": topic["FirstURL"].as_str().unwrap_or(""),
                }));
            }
        }
    }

    if let Some(redirect) = non_empty(data, "Redirect") {
        items.push(json!({"kind": "redirect", "url": redirect}));
    }

    if items.is_empty() {
        items.push(json!({
            "kind": "empty",
            "text": "No instant answer available. Try fetch_url on a specific page for more detail.",
        }));
    }

    items.truncate(limit);
    items
}
