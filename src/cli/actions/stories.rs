use crate::feed::{FeedEntry, StoryFeed};
use anyhow::Result;
use url::Url;

/// Execute the stories action. Load failures are rendered, not returned.
/// # Errors
/// Returns an error if the HTTP client cannot be built.
pub async fn execute(url: Url) -> Result<()> {
    let feed = StoryFeed::new(url)?;

    for entry in feed.load().await {
        match entry {
            FeedEntry::Link { title, url } => println!("- {title}\n  {url}"),
            FeedEntry::Placeholder(text) => println!("{text}"),
        }
    }

    Ok(())
}
