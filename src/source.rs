use std::path::Path;

use tracing::info;

use crate::error::FeedError;

/// Load the raw feed document from `location`: an existing local file is read
/// directly, anything else is fetched as a URL with the shared client.
pub async fn load(client: &reqwest::Client, location: &str) -> Result<String, FeedError> {
    let text = if Path::new(location).is_file() {
        info!("Reading feed from file: {}", location);
        std::fs::read_to_string(location).map_err(|e| FeedError::SourceUnavailable {
            location: location.to_string(),
            reason: e.to_string(),
        })?
    } else {
        info!("Fetching feed from URL: {}", location);
        fetch(client, location).await?
    };

    if text.trim().is_empty() {
        return Err(FeedError::SourceUnavailable {
            location: location.to_string(),
            reason: "document is empty".into(),
        });
    }
    Ok(text)
}

async fn fetch(client: &reqwest::Client, url: &str) -> Result<String, FeedError> {
    let unavailable = |reason: String| FeedError::SourceUnavailable {
        location: url.to_string(),
        reason,
    };

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| unavailable(e.to_string()))?;
    let response = response
        .error_for_status()
        .map_err(|e| unavailable(e.to_string()))?;
    response.text().await.map_err(|e| unavailable(e.to_string()))
}
