//! `fetch_url` tool: fetch a page and extract its readable text.
//!
//! HTML is reduced to text with `scraper`, dropping scripts, styles and
//! other non-content subtrees. Other content types are returned as-is.
//! The text is cut at `max_length` bytes on a character boundary.

use serde_json::json;
use toolrun_application::{ToolContext, ToolEvent, ToolEventStream, ToolFailure, ToolHandler};
use toolrun_domain::util::truncate_str;
use toolrun_domain::{ToolCall, ToolDefinition, ToolInput, ToolOutput};

/// Canonical tool name
pub const FETCH_URL: &str = "fetch_url";

/// Maximum response body size (5 MB)
const MAX_BODY_SIZE: usize = 5 * 1024 * 1024;

/// Default max output text size (50 KB)
const DEFAULT_MAX_TEXT: i64 = 50 * 1024;

/// Subtrees that never carry readable content
const SKIP_TAGS: [&str; 4] = ["script", "style", "noscript", "svg"];

pub fn fetch_url_definition() -> ToolDefinition {
    ToolDefinition::new(
        FETCH_URL,
        "Fetch a web page and extract its text content. Returns the readable text from the page.",
    )
    .with_display_name("Fetch URL")
    .with_alias("web_fetch")
    .with_alias("fetch")
    .with_input(ToolInput::required("url", "The URL to fetch"))
    .with_input(
        ToolInput::optional(
            "max_length",
            "Maximum length of extracted text in bytes",
            DEFAULT_MAX_TEXT,
        )
        .with_type("number"),
    )
}

/// Handler for `fetch_url`
#[derive(Debug, Clone)]
pub struct FetchUrl {
    client: reqwest::Client,
}

impl FetchUrl {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl ToolHandler for FetchUrl {
    fn call(&self, call: &ToolCall, _context: &ToolContext) -> ToolEventStream {
        let client = self.client.clone();
        let url = call.require_string("url").map(str::to_string);
        let max_length = call.get_i64("max_length").unwrap_or(DEFAULT_MAX_TEXT).max(0) as usize;

        Box::pin(async_stream::stream! {
            match url {
                Err(e) => {
                    yield Err(ToolFailure::from(e));
                }
                Ok(url) => {
                    yield Ok(ToolEvent::Progress(format!("Fetching {}", url)));
                    yield fetch(&client, &url, max_length).await.map(ToolEvent::Output);
                }
            }
        })
    }
}

async fn fetch(client: &reqwest::Client, url: &str, max_length: usize) -> Result<ToolOutput, ToolFailure> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ToolFailure::new(format!("Failed to fetch URL: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ToolFailure::new(format!(
            "HTTP error: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        )));
    }

    if let Some(length) = response.content_length()
        && length > MAX_BODY_SIZE as u64
    {
        return Err(ToolFailure::new(format!(
            "Response too large: {} bytes (max: {} bytes)",
            length, MAX_BODY_SIZE
        )));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let body = response
        .bytes()
        .await
        .map_err(|e| ToolFailure::new(format!("Failed to read response body: {}", e)))?;
    if body.len() > MAX_BODY_SIZE {
        return Err(ToolFailure::new(format!(
            "Response too large: {} bytes",
            body.len()
        )));
    }

    let body = String::from_utf8_lossy(&body);
    let text = if content_type.contains("text/html") || content_type.contains("application/xhtml")
    {
        html_to_text(&body)
    } else {
        body.into_owned()
    };

    Ok(page_output(url, status.as_u16(), &content_type, &text, max_length))
}

fn page_output(url: &str, status: u16, content_type: &str, text: &str, max_length: usize) -> ToolOutput {
    let content = truncate_str(text, max_length);
    ToolOutput::single(json!({
        "url": url,
        "status": status,
        "content_type": content_type,
        "size": text.len(),
        "truncated": content.len() < text.len(),
        "content": content,
    }))
}

/// Extract readable text from HTML, stripping tags, scripts, and styles
pub fn html_to_text(html: &str) -> String {
    use scraper::{Html, Selector};

    let document = Html::parse_document(html);
    let body = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next());
    let root = body.unwrap_or_else(|| document.root_element());

    clean_whitespace(&collect_element_text(root).join(" "))
}

fn collect_element_text(element: scraper::ElementRef) -> Vec<String> {
    if SKIP_TAGS.contains(&element.value().name()) {
        return Vec::new();
    }

    let mut parts = Vec::new();
    for child in element.children() {
        match child.value() {
            scraper::Node::Text(text) => {
                let t = text.trim();
                if !t.is_empty() {
                    parts.push(t.to_string());
                }
            }
            scraper::Node::Element(_) => {
                if let Some(child_el) = scraper::ElementRef::wrap(child) {
                    parts.extend(collect_element_text(child_el));
                }
            }
            _ => {}
        }
    }
    parts
}

/// Collapse runs of spaces and keep at most one blank line
fn clean_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev_was_whitespace = false;
    let mut newline_count = 0;

    for ch in text.chars() {
        if ch == '\n' {
            newline_count += 1;
            if newline_count <= 2 {
                result.push('\n');
            }
            prev_was_whitespace = true;
        } else if ch.is_whitespace() {
            if !prev_was_whitespace {
                result.push(' ');
            }
            prev_was_whitespace = true;
            newline_count = 0;
        } else {
            result.push(ch);
            prev_was_whitespace = false;
            newline_count = 0;
        }
    }

    result.trim().to_string()
}
