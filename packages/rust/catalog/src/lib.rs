//! HTTP client for the catalog content API.
//!
//! Three read-only calls cover a scrape: the catalog list, the program
//! listing of one catalog, and the full program content for a batch of ids.
//! Every call returns XML; listing responses are parsed here, program
//! content is handed back raw for the assembler.

mod listing;

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, instrument};
use url::Url;

use degreemap_shared::{CatalogRef, CatalogSettings, DegreeMapError, Result};

pub use listing::{parse_catalogs, parse_program_ids};

/// User-Agent string for catalog requests.
const USER_AGENT: &str = concat!("degreemap/", env!("CARGO_PKG_VERSION"));

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 3;

/// Client for one catalog API endpoint.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    settings: CatalogSettings,
}

impl CatalogClient {
    /// Build a client from validated settings.
    pub fn new(settings: CatalogSettings) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| DegreeMapError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, settings })
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    /// All published catalogs, newest year first.
    #[instrument(skip_all)]
    pub async fn catalogs(&self) -> Result<Vec<CatalogRef>> {
        let body = self
            .fetch("content", &[("method", "getCatalogs".to_string())])
            .await?;

        let catalogs = parse_catalogs(&body, &self.settings.title_prefix)?;
        info!(count = catalogs.len(), "catalogs listed");
        Ok(catalogs)
    }

    /// Ids of every program of the configured degree type in one catalog.
    #[instrument(skip(self))]
    pub async fn program_ids(&self, catalog_id: &str) -> Result<Vec<String>> {
        let body = self
            .fetch(
                "search/programs",
                &[
                    ("method", "listing".to_string()),
                    ("options[limit]", "0".to_string()),
                    ("catalog", catalog_id.to_string()),
                ],
            )
            .await?;

        let ids = parse_program_ids(&body, &self.settings.degree_type)?;
        info!(
            count = ids.len(),
            degree_type = %self.settings.degree_type,
            "program ids listed"
        );
        Ok(ids)
    }

    /// Raw full-content markup for a batch of programs.
    ///
    /// Callers keep batches to a sensible size; the API accepts a few hundred
    /// ids per request.
    #[instrument(skip(self, ids), fields(ids = ids.len()))]
    pub async fn program_content(&self, catalog_id: &str, ids: &[String]) -> Result<String> {
        let mut params = vec![
            ("method", "getItems".to_string()),
            ("options[full]", "1".to_string()),
            ("catalog", catalog_id.to_string()),
            ("type", "programs".to_string()),
        ];
        params.extend(ids.iter().map(|id| ("ids[]", id.clone())));

        self.fetch("content", &params).await
    }

    /// GET an endpoint relative to the base URL with the key and format attached.
    async fn fetch(&self, endpoint: &str, params: &[(&str, String)]) -> Result<String> {
        let url = self.endpoint_url(endpoint)?;

        let response = self
            .http
            .get(url.clone())
            .query(&[("key", self.settings.api_key.as_str()), ("format", "xml")])
            .query(params)
            .send()
            .await
            .map_err(|e| DegreeMapError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DegreeMapError::Network(format!("{url}: HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| DegreeMapError::Network(format!("{url}: failed to read body: {e}")))?;

        debug!(%url, bytes = body.len(), "catalog response received");
        Ok(body)
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        self.settings.base_url.join(endpoint).map_err(|e| {
            DegreeMapError::config(format!(
                "cannot join '{endpoint}' onto {}: {e}",
                self.settings.base_url
            ))
        })
    }
}
