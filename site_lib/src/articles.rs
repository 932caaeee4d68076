//! View-model for the `/articles` listing: search, category chips and pagination.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use content_api::types::{Article, BlogPage, Category, Pagination};
use content_api::{BlogQuery, CategoryQuery, PagedQuery};
use serde::Serialize;

use crate::fetch::SafeClient;
use crate::pagination::{page_window, PageItem, PageStrip, PageWindow, DEFAULT_WINDOW_SIZE};
use crate::params::QueryParams;

pub const ARTICLES_PATH: &str = "/articles";
pub const ARTICLES_PAGE_SIZE: i64 = 24;
pub const LOAD_ERROR: &str = "Unable to load blog articles.";

/// What the listing was asked for, read from normalized query parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArticleListRequest {
    pub params: QueryParams,
    pub search: String,
    pub category: String,
    pub page: i64,
    pub page_size: i64,
}

impl ArticleListRequest {
    pub fn from_params(params: QueryParams) -> Self {
        Self {
            search: params.search().trim().to_string(),
            category: params.category().trim().to_string(),
            page: params.page(),
            page_size: ARTICLES_PAGE_SIZE,
            params,
        }
    }

    pub fn is_search(&self) -> bool {
        !self.search.is_empty()
    }

    pub fn blog_query(&self) -> BlogQuery {
        BlogQuery::default()
            .with_search(&self.search)
            .with_category(&self.category)
            .with_page(self.page)
            .with_page_size(self.page_size)
    }
}

/// A category filter link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryChip {
    pub name: String,
    pub slug: String,
    pub href: String,
    pub active: bool,
}

/// An article as it is rendered in the grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ArticleCard {
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub href: String,
    pub image: String,
    pub category: Option<String>,
    /// Display date, empty when the upstream date does not parse.
    pub date: String,
}

impl ArticleCard {
    pub fn from_article(article: &Article) -> Self {
        Self {
            slug: article.slug.clone(),
            title: article.title.clone(),
            summary: article.summary.clone().unwrap_or_default(),
            href: article_href(&article.slug),
            image: hero_image(article),
            category: article.category.clone().filter(|c| !c.trim().is_empty()),
            date: article
                .created_at
                .as_deref()
                .map(format_date)
                .unwrap_or_default(),
        }
    }
}

/// 1-based positions of the first and last article on this page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ShownRange {
    pub start: i64,
    pub end: i64,
}

/// A page link, or a gap between page links.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageLink {
    Page {
        number: i64,
        href: String,
        current: bool,
    },
    Gap,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageNav {
    pub previous: Option<String>,
    pub links: Vec<PageLink>,
    pub next: Option<String>,
}

/// Everything the listing page renders.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ArticleListView {
    pub title: String,
    pub heading: String,
    pub subheading: Option<String>,
    pub search: String,
    pub category: String,
    pub items: Vec<Article>,
    pub cards: Vec<ArticleCard>,
    pub pagination: Pagination,
    pub categories: Vec<Category>,
    pub chips: Vec<CategoryChip>,
    pub all_href: String,
    pub error: Option<String>,
    pub total: i64,
    pub window: PageWindow,
    pub range: Option<ShownRange>,
    /// Present only when there is more than one page to show.
    pub nav: Option<PageNav>,
}

impl ArticleListView {
    /// Assembles the view from whatever the two fetches produced.
    pub fn build(
        request: &ArticleListRequest,
        categories: Vec<Category>,
        page: Option<BlogPage>,
        brand: &str,
    ) -> Self {
        let (page, error) = match page {
            Some(page) => (page, None),
            None => (BlogPage::empty(), Some(LOAD_ERROR.to_string())),
        };
        let BlogPage { blogs, pagination } = page;

        let total = if pagination.total_count > 0 {
            pagination.total_count
        } else {
            blogs.len() as i64
        };
        let current = pagination.current_page.max(1);
        let total_pages = pagination.total_pages.max(1);
        let window = page_window(current, total_pages, DEFAULT_WINDOW_SIZE);
        let range = shown_range(current, request.page_size, total);

        let chips = categories
            .iter()
            .map(|cat| CategoryChip {
                name: cat.name.clone(),
                slug: cat.slug.clone(),
                href: request.params.with_category(&cat.slug).href(ARTICLES_PATH),
                active: request.category == cat.slug,
            })
            .collect();

        let nav = (total_pages > 1 && !blogs.is_empty()).then(|| {
            page_nav(
                &request.params,
                &PageStrip::new(current, total_pages, DEFAULT_WINDOW_SIZE),
            )
        });

        let (heading, subheading) = if request.is_search() {
            (
                "Search Results".to_string(),
                Some(format!(
                    "Found {} article{} matching your search",
                    total,
                    if total != 1 { "s" } else { "" }
                )),
            )
        } else {
            ("Insurance Articles".to_string(), None)
        };

        Self {
            title: format!("Insurance Articles | {}", brand),
            heading,
            subheading,
            search: request.search.clone(),
            category: request.category.clone(),
            cards: blogs.iter().map(ArticleCard::from_article).collect(),
            items: blogs,
            pagination,
            categories,
            chips,
            all_href: request.params.without_category().href(ARTICLES_PATH),
            error,
            total,
            window,
            range,
            nav,
        }
    }
}

/// Fetches categories and the requested page of articles concurrently and
/// builds the view. Never fails; upstream problems show up as `error` or as
/// an empty category list.
pub async fn load_article_list(client: &SafeClient, request: &ArticleListRequest) -> ArticleListView {
    let query = request.blog_query();
    let all = CategoryQuery::default();
    let (categories, page, site) = tokio::join!(
        client.all_categories(&all),
        client.blogs(&query),
        client.site_config(),
    );
    tracing::debug!(
        "articles: {} categories, blogs {}",
        categories.len(),
        if page.is_some() { "loaded" } else { "unavailable" }
    );
    ArticleListView::build(request, categories, page, &site.brand())
}

fn page_nav(params: &QueryParams, strip: &PageStrip) -> PageNav {
    let href = |n: i64| params.with_page(n).href(ARTICLES_PATH);
    PageNav {
        previous: strip.previous.map(href),
        links: strip
            .items
            .iter()
            .map(|item| match item {
                PageItem::Page { number, current } => PageLink::Page {
                    number: *number,
                    href: href(*number),
                    current: *current,
                },
                PageItem::Gap => PageLink::Gap,
            })
            .collect(),
        next: strip.next.map(href),
    }
}

/// Range of articles shown on `current_page`, or `None` when there are none.
pub fn shown_range(current_page: i64, page_size: i64, total: i64) -> Option<ShownRange> {
    if total <= 0 {
        return None;
    }
    let start = (current_page.max(1) - 1)
        .saturating_mul(page_size)
        .saturating_add(1);
    Some(ShownRange {
        start,
        end: start.saturating_add(page_size - 1).min(total),
    })
}

/// Detail page link for an article slug.
pub fn article_href(slug: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(slug.as_bytes()).collect();
    format!("{}/{}", ARTICLES_PATH, encoded.replace('+', "%20"))
}

/// The article's hero image, or a stable placeholder seeded by its slug.
pub fn hero_image(article: &Article) -> String {
    match article.hero_image.as_deref().map(str::trim) {
        Some(src) if !src.is_empty() => src.to_string(),
        _ => format!("https://picsum.photos/seed/{}/600/400", article.slug),
    }
}

/// Formats an upstream timestamp as `Mar 5, 2024`. Unparsable input gives `""`.
pub fn format_date(input: &str) -> String {
    const DISPLAY: &str = "%b %-d, %Y";
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return dt.format(DISPLAY).to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format(DISPLAY).to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return date.format(DISPLAY).to_string();
    }
    String::new()
}
