use serde::Serialize;
use tracing::info;

use crate::batch::Batch;
use crate::config::Config;
use crate::error::FeedError;

/// Request body for one batch submission. The processing hint is omitted
/// entirely when not configured.
#[derive(Debug, Serialize)]
struct Payload<'a> {
    xml: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    chunk_size: Option<u32>,
}

/// What happened to one batch.
#[derive(Debug)]
pub enum Outcome {
    /// Accepted and acknowledged; holds the endpoint's response body.
    Sent(String),
    /// Accepted but the submission failed; holds the error detail.
    Failed(String),
    /// Declined at the confirmation prompt.
    Skipped,
}

/// Per-batch transmission record, collected for the end-of-run summary.
#[derive(Debug)]
pub struct TransmissionResult {
    pub batch_index: usize,
    pub outcome: Outcome,
}

/// Submit one batch. A single attempt: failures are reported to the caller,
/// never retried, and must not abort the remaining batches.
pub async fn send(
    client: &reqwest::Client,
    config: &Config,
    batch: &Batch,
) -> Result<String, FeedError> {
    let transmission = |detail: String| FeedError::Transmission {
        index: batch.index,
        detail,
    };

    let payload = Payload {
        xml: &batch.text,
        chunk_size: config.chunk_size,
    };

    let mut request = client.post(&config.endpoint).json(&payload);
    if let Some(token) = &config.token {
        request = request.bearer_auth(token);
    }

    info!("Submitting batch {} to {}", batch.index, config.endpoint);
    let response = request.send().await.map_err(|e| transmission(e.to_string()))?;

    let status = response.status();
    let body = response.text().await.map_err(|e| transmission(e.to_string()))?;
    if !status.is_success() {
        return Err(transmission(format!("HTTP {status}: {body}")));
    }

    // Endpoint replies are sometimes JSON, sometimes plain text.
    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(value) => Ok(serde_json::to_string_pretty(&value).unwrap_or(body)),
        Err(_) => Ok(body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_carries_batch_text() {
        let payload = Payload {
            xml: "<Listings>\n<Listing>a</Listing>\n</Listings>",
            chunk_size: Some(50),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["xml"], "<Listings>\n<Listing>a</Listing>\n</Listings>");
        assert_eq!(json["chunk_size"], 50);
    }

    #[test]
    fn hint_is_omitted_when_unset() {
        let payload = Payload {
            xml: "<Listings></Listings>",
            chunk_size: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("chunk_size").is_none());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transmission_error() {
        let config = Config::new(
            "feed.xml".into(),
            "http://127.0.0.1:1/import".into(),
            None,
            130,
            None,
        );
        let batch = Batch {
            index: 1,
            start: 0,
            records: vec!["<Listing>a</Listing>".into()],
            text: "<Listings>\n<Listing>a</Listing>\n</Listings>".into(),
        };
        let err = send(&reqwest::Client::new(), &config, &batch).await.unwrap_err();
        assert!(matches!(err, FeedError::Transmission { index: 1, .. }));
    }
}
