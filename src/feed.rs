//! Story feed from a public search API, rendered as a short list of links.

use crate::{error::ContentLoadError, APP_USER_AGENT};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{instrument, warn};
use url::Url;

pub const DEFAULT_STORIES_URL: &str = "https://hn.algolia.com/api/v1/search?tags=front_page";
/// Maximum number of stories shown.
pub const MAX_STORIES: usize = 5;
pub const LOAD_FAILED: &str = "Unable to load stories right now.";
pub const NO_STORIES: &str = "No stories right now.";

const ITEM_URL: &str = "https://news.ycombinator.com/item?id=";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Story {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "objectID")]
    pub object_id: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: Vec<Story>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedEntry {
    Link { title: String, url: String },
    Placeholder(String),
}

#[derive(Debug, Clone)]
pub struct StoryFeed {
    client: Client,
    url: Url,
}

impl StoryFeed {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: Url) -> Result<Self, ContentLoadError> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, url })
    }

    /// # Errors
    /// Returns `ContentLoadError` on network failure, a non-success status or
    /// an unexpected payload.
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Result<Vec<Story>, ContentLoadError> {
        let response = self.client.get(self.url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(ContentLoadError::Status(response.status().as_u16()));
        }

        let body: SearchResponse = response.json().await?;
        Ok(body.hits)
    }

    /// Fetches and renders; never fails.
    pub async fn load(&self) -> Vec<FeedEntry> {
        render(self.fetch().await)
    }
}

/// Turns a fetch result into list entries, degrading to a single placeholder.
#[must_use]
pub fn render(result: Result<Vec<Story>, ContentLoadError>) -> Vec<FeedEntry> {
    let stories = match result {
        Ok(stories) => stories,
        Err(err) => {
            warn!("story feed failed: {err}");
            return vec![FeedEntry::Placeholder(LOAD_FAILED.to_string())];
        }
    };

    let entries: Vec<FeedEntry> = stories
        .into_iter()
        .filter_map(|story| {
            let title = story.title.filter(|t| !t.trim().is_empty())?;
            let url = story
                .url
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| format!("{ITEM_URL}{}", story.object_id));
            Some(FeedEntry::Link { title, url })
        })
        .take(MAX_STORIES)
        .collect();

    if entries.is_empty() {
        vec![FeedEntry::Placeholder(NO_STORIES.to_string())]
    } else {
        entries
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn story(id: u32, url: Option<&str>) -> Story {
        Story {
            title: Some(format!("Story {id}")),
            url: url.map(ToString::to_string),
            object_id: id.to_string(),
        }
    }

    #[test]
    fn failure_renders_one_placeholder() {
        let entries = render(Err(ContentLoadError::Network("connection refused".to_string())));
        assert_eq!(entries, vec![FeedEntry::Placeholder(LOAD_FAILED.to_string())]);
    }

    #[test]
    fn caps_at_five_and_falls_back_to_item_page() {
        let mut stories: Vec<Story> = (1..=8).map(|i| story(i, Some("https://example.com"))).collect();
        stories[0].url = None;

        let entries = render(Ok(stories));
        assert_eq!(entries.len(), MAX_STORIES);
        assert_eq!(
            entries[0],
            FeedEntry::Link {
                title: "Story 1".to_string(),
                url: "https://news.ycombinator.com/item?id=1".to_string(),
            }
        );
    }

    #[test]
    fn untitled_hits_are_skipped() {
        let mut untitled = story(1, None);
        untitled.title = None;
        assert_eq!(
            render(Ok(vec![untitled])),
            vec![FeedEntry::Placeholder(NO_STORIES.to_string())]
        );
    }

    #[tokio::test]
    async fn fetch_parses_hits() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/search"))
            .and(query_param("tags", "front_page"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "hits": [
                    { "title": "Rust 2024", "url": "https://blog.rust-lang.org", "objectID": "1" },
                    { "title": "Ask HN", "url": null, "objectID": "2" }
                ]
            })))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/api/v1/search?tags=front_page", server.uri())).unwrap();
        let entries = StoryFeed::new(url).unwrap().load().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[1],
            FeedEntry::Link {
                title: "Ask HN".to_string(),
                url: "https://news.ycombinator.com/item?id=2".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn unreachable_host_degrades() {
        let feed = StoryFeed::new(Url::parse("http://127.0.0.1:9/api").unwrap()).unwrap();
        assert!(matches!(
            feed.fetch().await,
            Err(ContentLoadError::Network(_))
        ));
        assert_eq!(
            feed.load().await,
            vec![FeedEntry::Placeholder(LOAD_FAILED.to_string())]
        );
    }

    #[tokio::test]
    async fn server_error_degrades() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let feed = StoryFeed::new(Url::parse(&server.uri()).unwrap()).unwrap();
        assert_eq!(feed.fetch().await, Err(ContentLoadError::Status(503)));
        assert_eq!(
            feed.load().await,
            vec![FeedEntry::Placeholder(LOAD_FAILED.to_string())]
        );
    }
}
