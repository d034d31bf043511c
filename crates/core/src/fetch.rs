//! HTTP access to the upstream hosts.
//!
//! [`Upstream`] bundles one `reqwest::Client`, the [`FetchConfig`] and the
//! [`Endpoints`] every fetcher builds its URLs from. It is cheap to clone and
//! carries no mutable state, so concurrent operations can share one instance.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::parse::Document;
use crate::{ModStatsError, Result};

/// Base URL of the mod statistics site.
pub const DEFAULT_SITE: &str = "http://javid.ddns.net/tModLoader/";
/// Base URL of the mirror hosting mod icons as `<name>.png`.
pub const DEFAULT_ICON_MIRROR: &str = "https://mirror.sgkoi.dev/direct/";
/// Base URL of the Steam Web API.
pub const DEFAULT_STEAM_API: &str = "https://api.steampowered.com/";

/// HTTP client configuration for fetching upstream pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: format!("modstats/{}", env!("CARGO_PKG_VERSION")) }
    }
}

/// Base URLs of the three upstream hosts.
///
/// Each base ends with `/` so page paths can be joined onto it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub site: Url,
    pub icon_mirror: Url,
    pub steam_api: Url,
}

impl Endpoints {
    /// Parses the three base URLs, appending a trailing `/` where missing.
    pub fn new(site: &str, icon_mirror: &str, steam_api: &str) -> Result<Self> {
        Ok(Self { site: base_url(site)?, icon_mirror: base_url(icon_mirror)?, steam_api: base_url(steam_api)? })
    }
}

fn base_url(raw: &str) -> Result<Url> {
    let normalized = if raw.ends_with('/') { raw.to_string() } else { format!("{}/", raw) };
    let url = Url::parse(&normalized).map_err(|e| ModStatsError::InvalidUrl(format!("{}: {}", raw, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ModStatsError::InvalidUrl(format!("{}: scheme must be http or https", raw)));
    }

    Ok(url)
}

/// Query parameters whose values never leave the process.
const SECRET_PARAMS: &[&str] = &["key"];

/// Renders `url` for errors and logs with secret query values masked.
fn redacted(url: &Url) -> String {
    if !url.query_pairs().any(|(name, _)| SECRET_PARAMS.contains(&name.as_ref())) {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            let value = if SECRET_PARAMS.contains(&name.as_ref()) { "redacted".to_string() } else { value.into_owned() };
            (name.into_owned(), value)
        })
        .collect();

    let mut clean = url.clone();
    clean.query_pairs_mut().clear().extend_pairs(pairs);
    clean.to_string()
}

fn join(base: &Url, path: &str, query: &[(&str, &str)]) -> Result<Url> {
    let mut url = base.join(path).map_err(|e| ModStatsError::InvalidUrl(format!("{}{}: {}", base, path, e)))?;
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

/// Shared HTTP client for all fetchers.
#[derive(Debug, Clone)]
pub struct Upstream {
    client: Client,
    config: FetchConfig,
    endpoints: Endpoints,
}

impl Upstream {
    /// Creates a client with default configuration against the real hosts.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Creates a new builder.
    ///
    /// # Example
    ///
    /// ```rust
    /// use modstats_core::Upstream;
    ///
    /// let upstream = Upstream::builder()
    ///     .timeout(10)
    ///     .site("http://localhost:8080/tModLoader")
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(upstream.endpoints().site.as_str(), "http://localhost:8080/tModLoader/");
    /// ```
    pub fn builder() -> UpstreamBuilder {
        UpstreamBuilder::new()
    }

    /// Timeout and User-Agent the client was built with.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// URL of a page on the statistics site.
    pub fn site_url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        join(&self.endpoints.site, path, query)
    }

    /// URL of a file on the icon mirror.
    pub fn icon_url(&self, file: &str) -> Result<Url> {
        join(&self.endpoints.icon_mirror, file, &[])
    }

    /// URL of a Steam Web API method.
    pub fn steam_url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        join(&self.endpoints.steam_api, path, query)
    }

    fn get(&self, url: Url) -> RequestBuilder {
        self.client.get(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response> {
        request.send().await.map_err(|e| {
            if e.is_timeout() {
                ModStatsError::Timeout { timeout: self.config.timeout }
            } else {
                ModStatsError::Http(e.without_url())
            }
        })
    }

    /// Sends `request` and returns the body, failing on any non-2xx status.
    async fn text(&self, request: RequestBuilder) -> Result<String> {
        let response = self.send(request).await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ModStatsError::Status { url: redacted(response.url()), status: status.as_u16() });
        }

        response.text().await.map_err(|e| ModStatsError::Http(e.without_url()))
    }

    /// Fetches a page body as text.
    pub async fn get_text(&self, url: Url) -> Result<String> {
        debug!(url = %redacted(&url), "GET");
        self.text(self.get(url)).await
    }

    /// Fetches and parses an HTML page.
    pub async fn get_html(&self, url: Url) -> Result<Document> {
        let body = self.get_text(url).await?;
        Ok(Document::parse(&body))
    }

    /// Fetches a JSON document and decodes it into `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let body = self.get_text(url).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Posts an urlencoded form and decodes the JSON answer into `T`.
    pub async fn post_form_json<T: DeserializeOwned>(&self, url: Url, form: &[(&str, &str)]) -> Result<T> {
        debug!(url = %redacted(&url), "POST");
        let body = self.text(self.client.post(url).form(form)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Issues a GET and reports the status without treating it as an error.
    ///
    /// Transport failures are still errors.
    pub async fn get_status(&self, url: Url) -> Result<StatusCode> {
        debug!(url = %redacted(&url), "GET (status only)");
        let response = self.send(self.get(url)).await?;
        Ok(response.status())
    }
}

/// Builder for [`Upstream`].
#[derive(Debug, Clone, Default)]
pub struct UpstreamBuilder {
    config: FetchConfig,
    site: Option<String>,
    icon_mirror: Option<String>,
    steam_api: Option<String>,
}

impl UpstreamBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout in seconds.
    pub fn timeout(mut self, secs: u64) -> Self {
        self.config.timeout = secs;
        self
    }

    /// Sets the User-Agent header.
    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.user_agent = value.into();
        self
    }

    /// Overrides the statistics site base URL.
    pub fn site(mut self, url: impl Into<String>) -> Self {
        self.site = Some(url.into());
        self
    }

    /// Overrides the icon mirror base URL.
    pub fn icon_mirror(mut self, url: impl Into<String>) -> Self {
        self.icon_mirror = Some(url.into());
        self
    }

    /// Overrides the Steam Web API base URL.
    pub fn steam_api(mut self, url: impl Into<String>) -> Self {
        self.steam_api = Some(url.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`ModStatsError::InvalidUrl`] for an unusable base URL and
    /// [`ModStatsError::Http`] if the TLS backend cannot be initialised.
    pub fn build(self) -> Result<Upstream> {
        let endpoints = Endpoints::new(
            self.site.as_deref().unwrap_or(DEFAULT_SITE),
            self.icon_mirror.as_deref().unwrap_or(DEFAULT_ICON_MIRROR),
            self.steam_api.as_deref().unwrap_or(DEFAULT_STEAM_API),
        )?;

        let client = Client::builder()
            .timeout(Duration::from_secs(self.config.timeout))
            .user_agent(self.config.user_agent.clone())
            .build()
            .map_err(ModStatsError::Http)?;

        Ok(Upstream { client, config: self.config, endpoints })
    }
}
