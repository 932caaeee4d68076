use url::Url;

use super::{
    common::{PagedQuery, QueryCommon},
    Query,
};

/// Search/filter query for `GET /api/blogs`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlogQuery {
    pub common: QueryCommon,
    pub search: Option<String>,
    pub category: Option<String>,
    /// Caps the number of results; used by live search suggestions.
    pub limit: Option<i64>,
}

impl Query for BlogQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        if let Some(search) = &self.search {
            url.query_pairs_mut().append_pair("search", search.as_str());
        };
        if let Some(category) = &self.category {
            url.query_pairs_mut()
                .append_pair("category", category.as_str());
        };
        let mut url = self.common.add_to_url(&url);
        if let Some(limit) = self.limit {
            url.query_pairs_mut()
                .append_pair("limit", &limit.to_string());
        };
        url
    }
}

impl PagedQuery for BlogQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
}

impl BlogQuery {
    /// Sets the free-text search. Blank input clears the filter.
    pub fn with_search(mut self, search: &str) -> Self {
        self.search = non_blank(search);
        self
    }

    /// Sets the category slug filter. Blank input clears the filter.
    pub fn with_category(mut self, category: &str) -> Self {
        self.category = non_blank(category);
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

fn non_blank(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
