//! URL and in-page anchor checking for exported details reports.
//!
//! The only component with partial-failure semantics: a failing URL is
//! recorded and the scan moves on to the next one.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use url::Url;

use crate::error::Result;

/// Outcome of checking one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlStatus {
    /// Fetched successfully; anchor (if any) found in the body.
    Ok,
    /// Transport failure or non-success HTTP status.
    Broken,
    /// Page fetched but the fragment was not found in the body.
    AnchorMissing(String),
}

/// One checked URL and its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlCheck {
    pub url: String,
    pub status: UrlStatus,
}

/// Checks every URL referenced by a details report.
pub struct UrlChecker {
    client: reqwest::Client,
}

impl std::fmt::Debug for UrlChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlChecker").finish_non_exhaustive()
    }
}

impl Default for UrlChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlChecker {
    /// Create a checker with a bounded per-request timeout.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest` client cannot be constructed
    /// (unreachable in practice).
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("ragmeter/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("reqwest client builder should not fail with timeout and user_agent");
        Self { client }
    }

    /// Distinct URLs from the `Url:` lines of a details report,
    /// in deterministic (sorted) order.
    #[must_use]
    pub fn extract_urls(report: &str) -> BTreeSet<String> {
        report
            .lines()
            .filter_map(|line| line.split_once("Url:"))
            .map(|(_, rest)| rest.trim().to_owned())
            .filter(|url| !url.is_empty())
            .collect()
    }

    /// Check one URL: fetch it and, when the URL carries a fragment,
    /// look for the fragment in the response body.
    pub async fn check(&self, url: &str) -> UrlCheck {
        let response = match self.client.get(url).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                tracing::error!(url = %url, status = %r.status(), "URL: ERROR");
                return UrlCheck {
                    url: url.to_owned(),
                    status: UrlStatus::Broken,
                };
            }
            Err(e) => {
                tracing::error!(url = %url, error = %e, "URL: ERROR");
                return UrlCheck {
                    url: url.to_owned(),
                    status: UrlStatus::Broken,
                };
            }
        };

        let fragment = Url::parse(url)
            .ok()
            .and_then(|u| u.fragment().map(str::to_owned))
            .filter(|f| !f.is_empty());
        let Some(fragment) = fragment else {
            return UrlCheck {
                url: url.to_owned(),
                status: UrlStatus::Ok,
            };
        };

        let status = match response.text().await {
            Ok(body) if body.contains(&fragment) => UrlStatus::Ok,
            Ok(_) => {
                tracing::error!(url = %url, anchor = %fragment, "Anchor: ERROR");
                UrlStatus::AnchorMissing(fragment)
            }
            Err(e) => {
                tracing::error!(url = %url, error = %e, "URL: ERROR");
                UrlStatus::Broken
            }
        };
        UrlCheck {
            url: url.to_owned(),
            status,
        }
    }

    /// Check every URL found in the report at `report_path`.
    ///
    /// Per-URL failures are recorded in the results, never propagated.
    ///
    /// # Errors
    ///
    /// Returns an error only if the report file cannot be read.
    pub async fn check_report(&self, report_path: &Path) -> Result<Vec<UrlCheck>> {
        let text = fs::read_to_string(report_path)?;
        let urls = Self::extract_urls(&text);
        tracing::info!(count = urls.len(), "checking URLs from report");

        let mut results = Vec::with_capacity(urls.len());
        for url in urls {
            let check = self.check(&url).await;
            if check.status == UrlStatus::Ok {
                tracing::info!(url = %check.url, "URL ok");
            }
            results.push(check);
        }

        tracing::info!("done checking URLs");
        Ok(results)
    }
}
