//! Request handling for the site's JSON proxy routes, independent of any
//! HTTP framework. Every handler answers with a [`ProxyReply`]; upstream
//! failures become well-formed fallback bodies, and only bad route
//! parameters produce an error.

use content_api::types::BlogPage;
use content_api::{BlogQuery, CategoryQuery, PagedQuery};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::SiteError;
use crate::fetch::SafeClient;
use crate::params::QueryParams;
use crate::validation::validate_slug;

pub const CONTACT_UNAVAILABLE: &str = "Submission temporarily unavailable";
/// Largest `page_size` or `limit` passed upstream; bigger requests are capped.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Status code and JSON body to send back.
#[derive(Clone, Debug, PartialEq)]
pub struct ProxyReply {
    pub status: u16,
    pub body: Value,
}

impl ProxyReply {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    fn json<T: Serialize>(value: &T) -> Result<Self, SiteError> {
        Ok(Self::ok(serde_json::to_value(value)?))
    }
}

/// `GET /api/blogs/{slug}`: the upstream `{blog}`, or `{blog: null}` when it
/// could not be fetched.
pub async fn blog_detail(client: &SafeClient, slug: &str) -> Result<ProxyReply, SiteError> {
    let slug = validate_slug(slug)?;
    ProxyReply::json(&client.blog(&slug).await)
}

/// Builds the upstream article query from proxy query parameters. Accepts
/// `search` or the site's `q`.
pub fn blog_query_from(params: &QueryParams) -> BlogQuery {
    let search = params
        .get("search")
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| params.search());
    let mut query = BlogQuery::default()
        .with_search(search.trim())
        .with_category(params.category().trim())
        .with_page(params.page());
    if let Some(size) = positive(params.get("page_size")) {
        query = query.with_page_size(size.min(MAX_PAGE_SIZE));
    }
    if let Some(limit) = positive(params.get("limit")) {
        query = query.with_limit(limit.min(MAX_PAGE_SIZE));
    }
    query
}

/// `GET /api/blogs`: normalized `{blogs, pagination}`, empty on failure.
pub async fn blogs(client: &SafeClient, params: &QueryParams) -> Result<ProxyReply, SiteError> {
    let page = client
        .blogs(&blog_query_from(params))
        .await
        .unwrap_or_else(BlogPage::empty);
    ProxyReply::json(&page)
}

/// `GET /api/categories`: `{categories}`, empty on failure. With `page_id`
/// the list is scoped to that parent page; otherwise every category is
/// returned, optionally filtered by `type`.
pub async fn categories(client: &SafeClient, params: &QueryParams) -> Result<ProxyReply, SiteError> {
    let mut query = CategoryQuery::default();
    if let Some(kind) = params.get("type").map(str::trim).filter(|k| !k.is_empty()) {
        query = query.with_kind(kind);
    }
    let categories = match positive(params.get("page_id")) {
        Some(page_id) => {
            query = query.with_page_id(page_id);
            if let Some(flag) = params.get("include_blogs") {
                query = query.with_include_blogs(matches!(flag.trim(), "1" | "true"));
            }
            client.categories(&query).await.unwrap_or_default()
        }
        None => client.all_categories(&query).await,
    };
    Ok(ProxyReply::ok(json!({ "categories": categories })))
}

/// `GET /api/homepage`.
pub async fn homepage(client: &SafeClient) -> Result<ProxyReply, SiteError> {
    ProxyReply::json(&client.homepage().await)
}

/// `GET /api/page/{slug}`: `{sections}`, or `{sections: []}` on failure.
pub async fn page(client: &SafeClient, slug: &str) -> Result<ProxyReply, SiteError> {
    let slug = validate_slug(slug)?;
    ProxyReply::json(&client.page(&slug).await)
}

/// `GET /api/site-config`.
pub async fn site_config(client: &SafeClient) -> Result<ProxyReply, SiteError> {
    ProxyReply::json(&client.site_config().await)
}

/// `POST /api/contact`: tries each submit endpoint in `urls` in order
/// (normally [`crate::config::Settings::contact_submit_urls`]).
///
/// The first 2xx answer yields `{ok: true}`. If endpoints answered but none
/// accepted, the last answer's status and body are passed back. If nothing
/// answered at all the reply is `{ok: false, error}` with status 200.
pub async fn contact(client: &SafeClient, urls: &[String], body: &str) -> ProxyReply {
    let mut last = None;
    for url in urls {
        match client.post_raw_to(url, body).await {
            Some(reply) if reply.is_success() => {
                tracing::info!("contact submission accepted by {}", url);
                return ProxyReply::ok(json!({ "ok": true }));
            }
            Some(reply) => {
                tracing::warn!("contact submission rejected by {} with {}", url, reply.status);
                last = Some(reply);
            }
            None => {}
        }
    }
    match last {
        Some(reply) => ProxyReply {
            status: reply.status,
            body: serde_json::from_str(&reply.body).unwrap_or(Value::String(reply.body)),
        },
        None => ProxyReply::ok(json!({ "ok": false, "error": CONTACT_UNAVAILABLE })),
    }
}

pub fn health() -> ProxyReply {
    ProxyReply::ok(json!({ "status": "ok" }))
}

fn positive(value: Option<&str>) -> Option<i64> {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
}
