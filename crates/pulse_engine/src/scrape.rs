use pulse_logging::pulse_debug;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

/// Element id the video page uses for rendered comment bodies.
pub const CONTENT_SELECTOR: &str = "#content-text";

/// The only action the scrape channel answers.
pub const GET_COMMENTS_ACTION: &str = "getComments";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid selector {selector:?}: {message}")]
pub struct SelectorError {
    pub selector: String,
    pub message: String,
}

pub trait Scraper: Send + Sync {
    fn scrape(&self, html: &str) -> Vec<String>;
}

/// Collects trimmed text of every element matching a selector, in document
/// order, up to `limit` entries.
#[derive(Debug, Clone)]
pub struct SelectorScraper {
    selector: Selector,
    limit: usize,
}

impl SelectorScraper {
    pub fn new(selector: &str, limit: usize) -> Result<Self, SelectorError> {
        let parsed = Selector::parse(selector).map_err(|err| SelectorError {
            selector: selector.to_string(),
            message: err.to_string(),
        })?;
        Ok(Self {
            selector: parsed,
            limit,
        })
    }

    pub fn comments(limit: usize) -> Self {
        Self {
            selector: Selector::parse(CONTENT_SELECTOR).expect("content selector"),
            limit,
        }
    }
}

impl Default for SelectorScraper {
    fn default() -> Self {
        Self::comments(100)
    }
}

impl Scraper for SelectorScraper {
    fn scrape(&self, html: &str) -> Vec<String> {
        let doc = Html::parse_document(html);
        doc.select(&self.selector)
            .take(self.limit)
            .map(|node| node.text().collect::<String>().trim().to_string())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeRequest {
    pub action: String,
}

impl ScrapeRequest {
    pub fn get_comments() -> Self {
        Self {
            action: GET_COMMENTS_ACTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeResponse {
    pub comments: Vec<String>,
}

/// Answers one inbound scrape message. Unknown actions get no reply.
pub fn handle_message(
    request: &ScrapeRequest,
    html: &str,
    scraper: &dyn Scraper,
) -> Option<ScrapeResponse> {
    if request.action != GET_COMMENTS_ACTION {
        pulse_debug!("ignoring scrape message action={}", request.action);
        return None;
    }
    let comments = scraper.scrape(html);
    pulse_debug!("scraped {} snippets", comments.len());
    Some(ScrapeResponse { comments })
}
