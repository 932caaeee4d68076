use serde::{Deserialize, Serialize};

use super::Article;

/// Pagination block exactly as the upstream sends it. Any field may be missing.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct RawPagination {
    #[serde(default)]
    pub total_count: Option<i64>,
    #[serde(default)]
    pub page_size: Option<i64>,
    #[serde(default)]
    pub current_page: Option<i64>,
    #[serde(default)]
    pub total_pages: Option<i64>,
    #[serde(default)]
    pub has_next: Option<bool>,
    #[serde(default)]
    pub has_previous: Option<bool>,
}

/// Canonical pagination metadata.
///
/// `current_page` is always within `[1, total_pages]` and `total_pages >= 1`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub total_count: i64,
    pub current_page: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl Pagination {
    /// Builds pagination for `total_count` items viewed `page_size` at a time.
    pub fn synthesize(total_count: i64, requested_page: i64, page_size: i64) -> Self {
        let total_count = total_count.max(0);
        let total_pages = total_pages_for(total_count, page_size);
        let current_page = requested_page.clamp(1, total_pages);
        Self {
            total_count,
            current_page,
            total_pages,
            has_next: current_page < total_pages,
            has_previous: current_page > 1,
        }
    }

    /// One page holding exactly `count` items.
    pub fn single_page(count: usize) -> Self {
        Self {
            total_count: count as i64,
            current_page: 1,
            total_pages: 1,
            has_next: false,
            has_previous: false,
        }
    }

    /// Fills gaps in an upstream block, falling back to the request when a field is absent.
    pub fn from_raw(raw: &RawPagination, item_count: usize, requested_page: i64, page_size: i64) -> Self {
        let total_count = match raw.total_count {
            Some(count) if count > 0 => count,
            _ => item_count as i64,
        };
        let page_size = raw.page_size.filter(|size| *size > 0).unwrap_or(page_size);
        let total_pages = match raw.total_pages {
            Some(pages) if pages > 0 => pages,
            _ => total_pages_for(total_count, page_size),
        };
        let current_page = raw
            .current_page
            .filter(|page| *page > 0)
            .unwrap_or(requested_page)
            .clamp(1, total_pages);
        Self {
            total_count,
            current_page,
            total_pages,
            has_next: raw.has_next.unwrap_or(current_page < total_pages),
            has_previous: raw.has_previous.unwrap_or(current_page > 1),
        }
    }
}

fn total_pages_for(total_count: i64, page_size: i64) -> i64 {
    if page_size <= 0 {
        return 1;
    }
    let pages = total_count / page_size + i64::from(total_count % page_size != 0);
    pages.max(1)
}

/// The two shapes `GET /api/blogs` is known to answer with.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum BlogsResponse {
    /// Legacy shape: a bare array with no pagination.
    Bare(Vec<Article>),
    Envelope {
        #[serde(default)]
        blogs: Vec<Article>,
        #[serde(default)]
        pagination: Option<RawPagination>,
    },
}

impl BlogsResponse {
    /// Normalizes either shape into a [`BlogPage`].
    pub fn into_page(self, requested_page: i64, page_size: i64) -> BlogPage {
        match self {
            BlogsResponse::Bare(blogs) => BlogPage {
                pagination: Pagination::single_page(blogs.len()),
                blogs,
            },
            BlogsResponse::Envelope { blogs, pagination } => {
                let pagination = match pagination {
                    Some(raw) => Pagination::from_raw(&raw, blogs.len(), requested_page, page_size),
                    None => Pagination::synthesize(blogs.len() as i64, requested_page, page_size),
                };
                BlogPage { blogs, pagination }
            }
        }
    }
}

/// One page of articles with canonical pagination.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BlogPage {
    pub blogs: Vec<Article>,
    pub pagination: Pagination,
}

impl BlogPage {
    /// The empty single-page result used when the article fetch fails.
    pub fn empty() -> Self {
        Self {
            blogs: Vec::new(),
            pagination: Pagination::single_page(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesize_rounds_up_and_clamps() {
        let p = Pagination::synthesize(49, 9, 24);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.current_page, 3);
        assert!(!p.has_next);
        assert!(p.has_previous);
    }

    #[test]
    fn synthesize_empty_is_one_page() {
        let p = Pagination::synthesize(0, 1, 24);
        assert_eq!(p.total_pages, 1);
        assert_eq!(p.current_page, 1);
    }

    #[test]
    fn from_raw_fills_missing_fields() {
        let raw = RawPagination {
            total_count: Some(100),
            ..Default::default()
        };
        let p = Pagination::from_raw(&raw, 24, 2, 24);
        assert_eq!(p.total_pages, 5);
        assert_eq!(p.current_page, 2);
        assert!(p.has_next);
        assert!(p.has_previous);
    }

    #[test]
    fn from_raw_clamps_current_page() {
        let raw = RawPagination {
            total_count: Some(10),
            total_pages: Some(1),
            current_page: Some(7),
            ..Default::default()
        };
        let p = Pagination::from_raw(&raw, 10, 7, 24);
        assert_eq!(p.current_page, 1);
    }

    #[test]
    fn huge_page_size_does_not_overflow() {
        let p = Pagination::synthesize(2, 1, i64::MAX);
        assert_eq!(p.total_pages, 1);
        let p = Pagination::synthesize(i64::MAX, 1, 2);
        assert_eq!(p.total_pages, i64::MAX / 2 + 1);

        let raw = RawPagination::default();
        let p = Pagination::from_raw(&raw, 2, 1, i64::MAX);
        assert_eq!(p.total_pages, 1);
        assert_eq!(p.total_count, 2);
    }

    #[test]
    fn bare_array_becomes_single_page() {
        let resp: BlogsResponse =
            serde_json::from_str(r#"[{"slug":"a"},{"slug":"b"},{"slug":"c"}]"#).unwrap();
        let page = resp.into_page(4, 24);
        assert_eq!(page.blogs.len(), 3);
        assert_eq!(page.pagination, Pagination::single_page(3));
    }
}
