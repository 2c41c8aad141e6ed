//! Crawler coordinator - main crawl orchestration logic
//!
//! One run wires the stages together as an explicit pipeline:
//! fetch → extract → convert → dispatch.
//!
//! - Page tasks run in a `JoinSet`, each waiting for a slot of the bounded
//!   page pool and the politeness delay before every attempt
//! - A finished page task hands back its in-scope children; the coordinator
//!   claims each one in the store and spawns a new page task for the winners
//! - Source files claimed by a page task are downloaded in a second
//!   `JoinSet`, outside the page pool
//! - The run ends once both sets are drained; results are then sorted by URL

use crate::config::{validate, CrawlConfig};
use crate::convert::render_source;
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchResult};
use crate::crawler::parser::{parse_page, SourceLink};
use crate::crawler::retry::{RetryContext, RetryDecision};
use crate::crawler::scheduler::Scheduler;
use crate::crawler::source::download_source;
use crate::state::{CrawlStore, PageResult};
use crate::url::{canonical_url, CrawlScope};
use crate::FlattenError;
use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use url::Url;

/// Crawls a documentation tree and flattens it into ordered page results
pub struct Flattener {
    config: Arc<CrawlConfig>,
    client: Client,
}

/// Everything the tasks of one run share
struct CrawlRun {
    config: Arc<CrawlConfig>,
    client: Client,
    scope: CrawlScope,
    scheduler: Scheduler,
    store: CrawlStore,
}

/// What a page task reports back to the coordinator
enum PageOutcome {
    Fetched {
        children: Vec<Url>,
        sources: Vec<SourceLink>,
    },
    Failed {
        url: Url,
        status: Option<u16>,
        reason: String,
    },
}

/// A page request that ran out of attempts
struct FetchFailure {
    status: Option<u16>,
    reason: String,
}

impl Flattener {
    /// Creates a flattener for the given configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Flattener)` - Configuration is valid and the HTTP client is built
    /// * `Err(FlattenError)` - Invalid configuration or client setup failure
    pub fn new(config: CrawlConfig) -> Result<Self, FlattenError> {
        validate(&config)?;
        let client = build_http_client(&config.user_agent)?;

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// The configuration every run of this flattener uses
    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Crawls `root_url` and returns every page and source result sorted by URL
    ///
    /// Only a root URL that cannot be crawled at all is an error: one that
    /// is rejected before dispatch, or whose every attempt fails without an
    /// HTTP response. Pages (the root included) that keep answering with an
    /// error status and downloads that fail after their retries are logged
    /// and left out, so the result may be empty.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use doc_flattener::{CrawlConfig, Flattener};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let flattener = Flattener::new(CrawlConfig::default())?;
    /// let results = flattener.flatten("https://pkg.go.dev/github.com/cinar/indicator/v2").await?;
    /// for result in &results {
    ///     println!("{}", result.url);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn flatten(&self, root_url: &str) -> Result<Vec<PageResult>, FlattenError> {
        let scope = CrawlScope::new(root_url, &self.config.allowed_domains)?;
        let root = scope.root().clone();

        let run = Arc::new(CrawlRun {
            config: Arc::clone(&self.config),
            client: self.client.clone(),
            scheduler: Scheduler::new(
                self.config.parallelism,
                self.config.politeness_delay(),
                self.config.max_concurrent_downloads,
            ),
            store: CrawlStore::new(),
            scope,
        });

        tracing::info!("Starting crawl of {}", root);
        let start_time = Instant::now();

        let mut pages: JoinSet<PageOutcome> = JoinSet::new();
        let mut downloads: JoinSet<()> = JoinSet::new();

        run.store.claim_page(run.scope.root_prefix());
        pages.spawn(process_page(Arc::clone(&run), root));

        let mut root_pending = true;
        let mut pages_fetched = 0usize;

        while let Some(joined) = pages.join_next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    if root_pending {
                        return Err(FlattenError::RootFetch {
                            url: run.scope.root_prefix().to_string(),
                            reason: e.to_string(),
                        });
                    }
                    tracing::error!("Page task failed: {}", e);
                    continue;
                }
            };

            match outcome {
                PageOutcome::Fetched { children, sources } => {
                    root_pending = false;
                    pages_fetched += 1;
                    tracing::debug!(
                        "Progress: {} pages fetched, {} results",
                        pages_fetched,
                        run.store.len()
                    );

                    for child in children {
                        if run.store.claim_page(&run.scope.page_id(&child)) {
                            tracing::debug!("Queueing page {}", child);
                            pages.spawn(process_page(Arc::clone(&run), child));
                        }
                    }

                    for source in sources {
                        tracing::debug!("Queueing source {}", source.url);
                        downloads.spawn(process_source(Arc::clone(&run), source));
                    }
                }
                PageOutcome::Failed {
                    url,
                    status,
                    reason,
                } => {
                    if root_pending {
                        root_pending = false;
                        if status.is_none() {
                            return Err(FlattenError::RootFetch {
                                url: url.to_string(),
                                reason,
                            });
                        }
                        tracing::warn!("Root page {} left out: {}", url, reason);
                    } else {
                        tracing::debug!("Leaving out {}: {}", url, reason);
                    }
                }
            }
        }

        while let Some(joined) = downloads.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Download task failed: {}", e);
            }
        }

        let results = run.store.take_sorted_results();

        tracing::info!(
            "Crawl completed: {} pages fetched, {} sources claimed, {} results in {:?}",
            pages_fetched,
            run.store.claimed_sources(),
            results.len(),
            start_time.elapsed()
        );

        Ok(results)
    }
}

/// Fetches one page, stores its Markdown, and reports its links
async fn process_page(run: Arc<CrawlRun>, url: Url) -> PageOutcome {
    let body = match fetch_with_retry(&run, &url).await {
        Ok(body) => body,
        Err(FetchFailure { status, reason }) => {
            return PageOutcome::Failed {
                url,
                status,
                reason,
            }
        }
    };

    let parsed = parse_page(&body, &url, &run.scope, &run.config);

    match parsed.markdown {
        Some(markdown) => run.store.push(PageResult::new(run.scope.page_id(&url), markdown)),
        None => tracing::debug!("No documentation content on {}", url),
    }

    let sources = parsed
        .links
        .sources
        .into_iter()
        .filter(|source| run.store.claim_source(&canonical_url(&source.url)))
        .collect();

    PageOutcome::Fetched {
        children: parsed.links.children,
        sources,
    }
}

/// Issues a page request until it succeeds or its retries are exhausted
async fn fetch_with_retry(run: &CrawlRun, url: &Url) -> Result<String, FetchFailure> {
    let mut retry = RetryContext::new(run.config.max_retries);

    loop {
        let result = {
            let _permit = run.scheduler.acquire_page_slot().await;
            tracing::debug!("Fetching {}", url);
            fetch_url(&run.client, url).await
        };

        let failure = match result {
            FetchResult::Success {
                final_url, body, ..
            } => {
                if final_url != url.as_str() {
                    tracing::debug!("{} redirected to {}", url, final_url);
                }
                return Ok(body);
            }
            failure => failure,
        };

        let failed = FetchFailure {
            status: failure.status(),
            reason: failure.describe(),
        };

        if !RetryContext::is_retryable(failed.status) {
            return Err(failed);
        }

        match retry.record_failure() {
            RetryDecision::Retry { attempt } => {
                tracing::warn!(
                    "Error requesting {} (attempt {}/{}): {}. Retrying...",
                    url,
                    attempt,
                    retry.max_retries(),
                    failed.reason
                );
            }
            RetryDecision::GiveUp => {
                tracing::error!(
                    "Error requesting {}: {}. Max retries reached.",
                    url,
                    failed.reason
                );
                return Err(failed);
            }
        }
    }
}

/// Downloads one claimed source file and stores it as a fenced code block
async fn process_source(run: Arc<CrawlRun>, source: SourceLink) {
    let _permit = run.scheduler.acquire_download_slot().await;
    let url = canonical_url(&source.url);

    match download_source(
        &run.client,
        &url,
        run.config.max_retries,
        run.config.retry_backoff(),
    )
    .await
    {
        Ok(code) => {
            tracing::debug!("Downloaded source {}", url);
            let content = render_source(&url, &source.language, &code);
            run.store.push(PageResult::new(url, content));
        }
        Err(e) => tracing::error!("Failed to download source {}: {}", url, e),
    }
}

/// Runs a complete flatten operation with the given configuration
///
/// # Example
///
/// ```no_run
/// use doc_flattener::{flatten, CrawlConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let results = flatten("https://pkg.go.dev/fmt", CrawlConfig::default()).await?;
/// println!("{} results", results.len());
/// # Ok(())
/// # }
/// ```
pub async fn flatten(root_url: &str, config: CrawlConfig) -> Result<Vec<PageResult>, FlattenError> {
    Flattener::new(config)?.flatten(root_url).await
}
