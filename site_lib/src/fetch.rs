//! Deadline-and-fallback wrapper around the content API client.
//!
//! Every call gets its own deadline. When the deadline passes the request
//! future is dropped, which cancels it. A timeout, a non-2xx status, a
//! transport error and malformed JSON all collapse into the same "no data"
//! result. Nothing is retried.

use std::future::Future;
use std::time::Duration;

use content_api::types::{
    Article, BlogDetailResponse, BlogPage, Category, HomepagePayload, PagePayload, RawCategory,
    SiteConfig,
};
use content_api::{BlogQuery, CategoryQuery, Client, RawReply};

use crate::config::{FetchTimeouts, Settings};

const HOMEPAGE_ERROR: &str = "homepage upstream error";

/// Awaits `request` for at most `deadline`. Any failure is logged and becomes `None`.
pub async fn fetch_or_none<T, F>(label: &str, deadline: Duration, request: F) -> Option<T>
where
    F: Future<Output = Result<T, content_api::Error>>,
{
    match tokio::time::timeout(deadline, request).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            tracing::warn!("{} unavailable, using empty fallback: {}", label, e);
            None
        }
        Err(_) => {
            tracing::warn!(
                "{} aborted after {}ms, using empty fallback",
                label,
                deadline.as_millis()
            );
            None
        }
    }
}

/// Content API client whose calls never fail: each either yields data or
/// an empty/default value.
#[derive(Clone, Debug)]
pub struct SafeClient {
    inner: Client,
    timeouts: FetchTimeouts,
}

impl SafeClient {
    pub fn new(inner: Client, timeouts: FetchTimeouts) -> Self {
        Self { inner, timeouts }
    }

    /// Creates a safe client for `base_url` with default deadlines.
    pub fn with_base_url(base_url: &str) -> Self {
        Self::new(Client::with_base_url(base_url), FetchTimeouts::default())
    }

    /// Client for one inbound request, resolving the upstream from `settings`
    /// and, failing that, the request's `Host` header.
    pub fn from_settings(settings: &Settings, host: Option<&str>) -> Self {
        Self::new(
            Client::with_base_url(&settings.resolve_api_base(host)),
            settings.timeouts,
        )
    }

    pub fn timeouts(&self) -> &FetchTimeouts {
        &self.timeouts
    }

    pub fn inner(&self) -> &Client {
        &self.inner
    }

    /// One page of articles, or `None` when the upstream could not answer.
    pub async fn blogs(&self, query: &BlogQuery) -> Option<BlogPage> {
        fetch_or_none("blogs", self.timeouts.blogs, self.inner.get_blogs(query)).await
    }

    /// Up to `limit` articles matching `search`, for live suggestions.
    pub async fn search_suggestions(
        &self,
        search: &str,
        limit: usize,
    ) -> Result<Vec<Article>, content_api::Error> {
        let query = BlogQuery::default()
            .with_search(search)
            .with_limit(limit as i64);
        match tokio::time::timeout(self.timeouts.blogs, self.inner.get_blogs(&query)).await {
            Ok(result) => result.map(|page| page.blogs.into_iter().take(limit).collect()),
            Err(_) => Err(content_api::Error::Timeout),
        }
    }

    /// Every category as filter chips; empty on failure.
    pub async fn all_categories(&self, query: &CategoryQuery) -> Vec<Category> {
        fetch_or_none(
            "categories",
            self.timeouts.categories,
            self.inner.get_all_categories(query),
        )
        .await
        .map(|resp| resp.into_categories())
        .unwrap_or_default()
    }

    /// Categories scoped by `query`, or `None` when the upstream could not answer.
    pub async fn categories(&self, query: &CategoryQuery) -> Option<Vec<Category>> {
        fetch_or_none(
            "categories",
            self.timeouts.categories,
            self.inner.get_categories(query),
        )
        .await
        .map(|resp| resp.into_categories())
    }

    /// Categories scoped by `query` as the upstream sent them, ids and
    /// nested blogs included.
    pub async fn raw_categories(&self, query: &CategoryQuery) -> Option<Vec<RawCategory>> {
        fetch_or_none(
            "categories",
            self.timeouts.categories,
            self.inner.get_categories(query),
        )
        .await
        .map(|resp| resp.into_raw())
    }

    /// Article detail; `{blog: null}` on any failure, including 404.
    pub async fn blog(&self, slug: &str) -> BlogDetailResponse {
        fetch_or_none("blog detail", self.timeouts.blogs, self.inner.get_blog(slug))
            .await
            .unwrap_or_default()
    }

    /// Homepage payload, or the fallback when unavailable. A non-2xx answer
    /// gives the plain fallback; anything worse also sets `error`.
    pub async fn homepage(&self) -> HomepagePayload {
        match tokio::time::timeout(self.timeouts.homepage, self.inner.get_homepage()).await {
            Ok(Ok(payload)) => payload,
            Ok(Err(content_api::Error::HttpStatus { status, .. })) => {
                tracing::warn!("homepage answered {}, using fallback", status);
                HomepagePayload::fallback()
            }
            Ok(Err(e)) => {
                tracing::warn!("homepage unavailable, using fallback: {}", e);
                HomepagePayload::fallback_with_error(HOMEPAGE_ERROR)
            }
            Err(_) => {
                tracing::warn!(
                    "homepage aborted after {}ms, using fallback",
                    self.timeouts.homepage.as_millis()
                );
                HomepagePayload::fallback_with_error(HOMEPAGE_ERROR)
            }
        }
    }

    pub async fn page(&self, slug: &str) -> PagePayload {
        fetch_or_none("page", self.timeouts.homepage, self.inner.get_page(slug))
            .await
            .unwrap_or_else(PagePayload::fallback)
    }

    /// Site config; defaults (and so the default brand) on failure.
    pub async fn site_config(&self) -> SiteConfig {
        fetch_or_none(
            "site config",
            self.timeouts.site_config,
            self.inner.get_site_config(),
        )
        .await
        .unwrap_or_default()
    }

    /// Posts to `url` with the contact deadline. `None` means no answer at all.
    pub async fn post_raw_to(&self, url: &str, body: &str) -> Option<RawReply> {
        fetch_or_none(
            "contact submit",
            self.timeouts.contact,
            self.inner.post_absolute(url, body),
        )
        .await
    }
}
