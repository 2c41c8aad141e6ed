//! Source file downloader
//!
//! Downloads the raw text of a linked source file. GitHub blob URLs are
//! rewritten to raw-content URLs first. Any status other than 200 and any
//! transport error is retried, sleeping `attempt × backoff unit` between
//! attempts.

use crate::crawler::retry::{RetryContext, RetryDecision};
use crate::url::to_raw_url;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Failure of one download attempt, or of the whole download
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("unexpected status code: {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("failed after {retries} retries: {last}")]
    Exhausted {
        retries: u32,
        last: Box<DownloadError>,
    },
}

/// Downloads a source file with retries
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `url` - The source URL as linked from the documentation page
/// * `max_retries` - Additional attempts after the first failure
/// * `backoff` - Fixed unit of the linear backoff
///
/// # Returns
///
/// * `Ok(String)` - The raw file content
/// * `Err(DownloadError::Exhausted)` - Every attempt failed
pub async fn download_source(
    client: &Client,
    url: &str,
    max_retries: u32,
    backoff: Duration,
) -> Result<String, DownloadError> {
    let raw_url = to_raw_url(url);
    if raw_url != url {
        tracing::debug!("Rewrote {} to {}", url, raw_url);
    }

    let mut retry = RetryContext::new(max_retries);
    loop {
        let error = match attempt_download(client, &raw_url).await {
            Ok(body) => return Ok(body),
            Err(e) => e,
        };

        match retry.record_failure() {
            RetryDecision::Retry { attempt } => {
                tracing::warn!(
                    "Error downloading {} (attempt {}/{}): {}. Retrying...",
                    raw_url,
                    attempt,
                    max_retries,
                    error
                );
                tokio::time::sleep(RetryContext::backoff(attempt, backoff)).await;
            }
            RetryDecision::GiveUp => {
                return Err(DownloadError::Exhausted {
                    retries: retry.retries(),
                    last: Box::new(error),
                });
            }
        }
    }
}

async fn attempt_download(client: &Client, url: &str) -> Result<String, DownloadError> {
    let response = client.get(url).send().await?;

    if response.status() != StatusCode::OK {
        return Err(DownloadError::Status(response.status().as_u16()));
    }

    Ok(response.text().await?)
}
