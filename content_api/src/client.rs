//! HTTP client for the CMS content API.

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    query::{BlogQuery, CategoryQuery, Query},
    types::{
        BlogDetailResponse, BlogPage, BlogsResponse, CategoriesResponse, HomepagePayload,
        PagePayload, SiteConfig,
    },
    Error,
};

/// Backstop timeout applied to every request. Callers normally impose a
/// shorter per-call deadline on top of this.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Page size the upstream uses when none is requested.
const UPSTREAM_DEFAULT_PAGE_SIZE: i64 = 10;

/// Status and body of a passthrough request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawReply {
    pub status: u16,
    pub body: String,
}

impl RawReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client for the CMS content API.
///
/// Every request asks intermediaries not to serve a cached copy, so results
/// always reflect the latest upstream state.
#[derive(Clone, Debug)]
pub struct Client {
    /// Base URL for the API, without a trailing slash.
    base_api_url: String,
    timeout: Duration,
}

impl Client {
    /// Creates a client for the API hosted at `base_url` (e.g. `http://127.0.0.1:8000`).
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_api_url: base_url.trim_end_matches('/').to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Overrides the backstop timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_api_url
    }

    fn get_url(&self, path: &str, query: Option<&impl Query>) -> Result<Url, Error> {
        let url = Url::parse(format!("{}{}", &self.base_api_url, path).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::InvalidUrl(format!("{}{}", &self.base_api_url, path))
        })?;
        Ok(match query {
            Some(query) => query.add_to_url(&url),
            None => url,
        })
    }

    fn http(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })
    }

    async fn get<T, Q>(&self, path: &str, query: Option<&Q>) -> Result<T, Error>
    where
        T: DeserializeOwned,
        Q: Query,
    {
        let url = self.get_url(path, query)?;
        tracing::debug!("GET {}", url);
        let resp = self
            .http()?
            .get(url)
            .header("accept", "application/json")
            .header("cache-control", "no-cache")
            .header("pragma", "no-cache")
            .send()
            .await
            .map_err(map_send_error)?;

        let status = resp.status();
        let body = resp.text().await.map_err(map_send_error)?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::warn!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        serde_json::from_str::<T>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::warn!("Failed to parse resource: {} | body: {}", e, snippet);
            Error::Parse(e.to_string())
        })
    }

    /// Fetches one page of articles and normalizes either response shape.
    pub async fn get_blogs(&self, query: &BlogQuery) -> Result<BlogPage, Error> {
        let resp = self
            .get::<BlogsResponse, BlogQuery>("/api/blogs/", Some(query))
            .await?;
        let page_size = query.common.page_size.unwrap_or(UPSTREAM_DEFAULT_PAGE_SIZE);
        Ok(resp.into_page(query.common.page, page_size))
    }

    /// Fetches a single article by slug. A missing article is `Error::HttpStatus { status: 404, .. }`.
    pub async fn get_blog(&self, slug: &str) -> Result<BlogDetailResponse, Error> {
        let path = format!("/api/blogs/{}/", encode_segment(slug));
        self.get::<BlogDetailResponse, CategoryQuery>(&path, None)
            .await
    }

    /// Fetches categories, optionally scoped to a parent page.
    pub async fn get_categories(&self, query: &CategoryQuery) -> Result<CategoriesResponse, Error> {
        self.get::<CategoriesResponse, CategoryQuery>("/api/categories/", Some(query))
            .await
    }

    /// Fetches every category regardless of parent page. Only `kind` applies here.
    pub async fn get_all_categories(&self, query: &CategoryQuery) -> Result<CategoriesResponse, Error> {
        self.get::<CategoriesResponse, CategoryQuery>("/api/categories/all/", Some(query))
            .await
    }

    pub async fn get_homepage(&self) -> Result<HomepagePayload, Error> {
        self.get::<HomepagePayload, CategoryQuery>("/api/homepage/", None)
            .await
    }

    pub async fn get_page(&self, slug: &str) -> Result<PagePayload, Error> {
        let path = format!("/api/page/{}/", encode_segment(slug));
        self.get::<PagePayload, CategoryQuery>(&path, None).await
    }

    pub async fn get_site_config(&self) -> Result<SiteConfig, Error> {
        self.get::<SiteConfig, CategoryQuery>("/api/site-config/", None)
            .await
    }

    /// Posts a JSON body to `path` and returns the upstream status and body untouched.
    ///
    /// Non-2xx answers are not errors here; only transport failures are.
    pub async fn post_raw(&self, path: &str, body: &str) -> Result<RawReply, Error> {
        let url = self.get_url(path, None::<&CategoryQuery>)?;
        self.post_url(url, body).await
    }

    /// Like [`Client::post_raw`], but to a full URL outside this client's base.
    pub async fn post_absolute(&self, url: &str, body: &str) -> Result<RawReply, Error> {
        let url = Url::parse(url).map_err(|e| {
            tracing::error!("Invalid URL {}: {}", url, e);
            Error::InvalidUrl(url.to_string())
        })?;
        self.post_url(url, body).await
    }

    async fn post_url(&self, url: Url, body: &str) -> Result<RawReply, Error> {
        tracing::debug!("POST {}", url);
        let resp = self
            .http()?
            .post(url)
            .header("content-type", "application/json")
            .header("cache-control", "no-cache")
            .body(body.to_string())
            .send()
            .await
            .map_err(map_send_error)?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(map_send_error)?;
        Ok(RawReply { status, body })
    }

    /// Posts a contact form submission to `/api/contact/submit/`.
    pub async fn submit_contact(&self, body: &str) -> Result<RawReply, Error> {
        self.post_raw("/api/contact/submit/", body).await
    }
}

fn map_send_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        tracing::warn!("Request timed out: {}", e);
        Error::Timeout
    } else {
        tracing::warn!("Failed to get resource: {}", e);
        Error::RequestFailed
    }
}

/// Percent-encodes a single path segment.
fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = Client::with_base_url("http://127.0.0.1:8000/");
        assert_eq!(client.base_url(), "http://127.0.0.1:8000");
    }

    #[test]
    fn segments_are_encoded() {
        assert_eq!(encode_segment("car insurance/101"), "car%20insurance%2F101");
        assert_eq!(encode_segment("alaska"), "alaska");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let body = "é".repeat(1500);
        let out = truncate_body(&body);
        assert!(out.ends_with("...[truncated]"));
    }
}
