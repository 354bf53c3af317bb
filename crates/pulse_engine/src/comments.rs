use pulse_logging::{pulse_debug, pulse_info};
use serde::Deserialize;

use crate::{PipelineConfig, PipelineError, RawComment, VideoId, UNKNOWN_AUTHOR};

const SERVICE: &str = "comment listing API";
const FALLBACK_MESSAGE: &str = "YouTube API Error";

/// One page of normalized comments plus the cursor for the next one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentPage {
    pub comments: Vec<RawComment>,
    pub next_page_token: Option<String>,
}

#[async_trait::async_trait]
pub trait CommentSource: Send + Sync {
    /// Fetches one page; `page_token` is empty for the first page.
    async fn fetch_page(
        &self,
        video_id: &VideoId,
        page_token: &str,
    ) -> Result<CommentPage, PipelineError>;
}

/// Pages through `source` until `max_comments` are collected or the source
/// runs out of continuation tokens.
///
/// Pages are fetched one at a time. Any page error aborts the whole fetch and
/// discards what was already collected. The result never exceeds
/// `max_comments`.
pub async fn fetch_comments(
    source: &dyn CommentSource,
    video_id: &VideoId,
    max_comments: usize,
) -> Result<Vec<RawComment>, PipelineError> {
    let mut comments = Vec::new();
    let mut page_token = String::new();
    let mut pages = 0usize;

    while comments.len() < max_comments {
        let page = source.fetch_page(video_id, &page_token).await?;
        pages += 1;
        pulse_debug!(
            "video={} page={} items={} has_next={}",
            video_id,
            pages,
            page.comments.len(),
            page.next_page_token.is_some()
        );
        comments.extend(page.comments);

        match page.next_page_token.filter(|token| !token.is_empty()) {
            Some(token) => page_token = token,
            None => break,
        }
    }

    comments.truncate(max_comments);
    pulse_info!(
        "fetched {} comments for video={} in {} page(s)",
        comments.len(),
        video_id,
        pages
    );
    Ok(comments)
}

/// Comment source backed by the YouTube Data API `commentThreads` listing.
#[derive(Debug, Clone)]
pub struct YoutubeCommentSource {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    page_size: u32,
}

impl YoutubeCommentSource {
    pub fn new(client: reqwest::Client, config: &PipelineConfig) -> Self {
        Self {
            client,
            endpoint: config.comments_api_url.clone(),
            api_key: config.api_key.clone(),
            page_size: config.page_size(),
        }
    }
}

#[async_trait::async_trait]
impl CommentSource for YoutubeCommentSource {
    async fn fetch_page(
        &self,
        video_id: &VideoId,
        page_token: &str,
    ) -> Result<CommentPage, PipelineError> {
        let page_size = self.page_size.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("part", "snippet"),
                ("videoId", video_id.as_str()),
                ("maxResults", page_size.as_str()),
                ("pageToken", page_token),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|err| PipelineError::from_reqwest(SERVICE, err))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| PipelineError::from_reqwest(SERVICE, err))?;

        // The API reports failures in the body, usually alongside a non-2xx status.
        let listing: ListingResponse = match serde_json::from_slice(&body) {
            Ok(listing) => listing,
            Err(_) if !status.is_success() => {
                return Err(PipelineError::RemoteApi {
                    message: format!("{FALLBACK_MESSAGE} (http status {})", status.as_u16()),
                });
            }
            Err(err) => {
                return Err(PipelineError::Decode {
                    service: SERVICE,
                    message: err.to_string(),
                });
            }
        };

        if let Some(error) = listing.error {
            return Err(PipelineError::RemoteApi {
                message: error
                    .message
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
            });
        }
        if !status.is_success() {
            return Err(PipelineError::RemoteApi {
                message: format!("{FALLBACK_MESSAGE} (http status {})", status.as_u16()),
            });
        }

        Ok(CommentPage {
            comments: listing
                .items
                .into_iter()
                .map(|item| item.snippet.top_level_comment.snippet.into_raw())
                .collect(),
            next_page_token: listing.next_page_token,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListingResponse {
    #[serde(default)]
    items: Vec<ThreadItem>,
    next_page_token: Option<String>,
    error: Option<ListingError>,
}

#[derive(Debug, Deserialize)]
struct ListingError {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ThreadItem {
    snippet: ThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadSnippet {
    top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    text_original: String,
    published_at: String,
    author_channel_id: Option<AuthorChannelId>,
}

#[derive(Debug, Deserialize)]
struct AuthorChannelId {
    value: Option<String>,
}

impl CommentSnippet {
    fn into_raw(self) -> RawComment {
        let author_id = self
            .author_channel_id
            .and_then(|channel| channel.value)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
        RawComment {
            text: self.text_original,
            timestamp: self.published_at,
            author_id,
        }
    }
}
