//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the shared HTTP client with the configured user agent
//! - GET requests for documentation pages
//! - Classification of failures into HTTP status and network errors

use crate::FlattenError;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Result of a single fetch attempt
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// The server answered with an error status (>= 400)
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// No response was received (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// HTTP status of the attempt, or None for a transport-level failure
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Success { status_code, .. } | Self::HttpError { status_code } => {
                Some(*status_code)
            }
            Self::NetworkError { .. } => None,
        }
    }

    /// Human-readable description of a failed attempt
    pub fn describe(&self) -> String {
        match self {
            Self::Success { status_code, .. } => format!("HTTP {}", status_code),
            Self::HttpError { status_code } => format!("HTTP {}", status_code),
            Self::NetworkError { error } => error.clone(),
        }
    }
}

/// Builds an HTTP client sending the given user agent
///
/// # Example
///
/// ```no_run
/// use doc_flattener::crawler::build_http_client;
///
/// let client = build_http_client("flatten-doc/1.0").unwrap();
/// ```
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues one GET request for a page
///
/// Redirects are followed by the client; any final status below 400 counts
/// as success.
pub async fn fetch_url(client: &Client, url: &Url) -> FetchResult {
    match client.get(url.as_str()).send().await {
        Ok(response) => {
            let status = response.status();
            let final_url = response.url().to_string();

            if status.is_client_error() || status.is_server_error() {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                };
            }

            match response.text().await {
                Ok(body) => FetchResult::Success {
                    final_url,
                    status_code: status.as_u16(),
                    body,
                },
                Err(e) => FetchResult::NetworkError {
                    error: e.to_string(),
                },
            }
        }
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            FetchResult::NetworkError { error }
        }
    }
}

/// Verifies with a single GET that a documentation page exists
///
/// Any answer other than 200, or no answer at all, is an error.
pub async fn check_available(client: &Client, url: &str) -> Result<(), FlattenError> {
    let status = match client.get(url).send().await {
        Ok(response) => response.status(),
        Err(e) => {
            return Err(FlattenError::Unavailable {
                url: url.to_string(),
                status: e.to_string(),
            })
        }
    };

    if status != StatusCode::OK {
        return Err(FlattenError::Unavailable {
            url: url.to_string(),
            status: status.as_u16().to_string(),
        });
    }

    Ok(())
}
