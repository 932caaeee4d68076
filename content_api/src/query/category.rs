use url::Url;

use super::Query;

/// Query for `GET /api/categories/`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryQuery {
    /// Parent page primary key, as sent by the admin category picker.
    pub page_id: Option<i64>,
    /// Parent page slug, as sent by the public site.
    pub page: Option<String>,
    pub include_blogs: Option<bool>,
    /// Category type filter (`type=` on the wire).
    pub kind: Option<String>,
}

impl Query for CategoryQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        if let Some(page_id) = self.page_id {
            url.query_pairs_mut()
                .append_pair("page_id", &page_id.to_string());
        }
        if let Some(page) = &self.page {
            url.query_pairs_mut().append_pair("page", page.as_str());
        }
        if let Some(include_blogs) = self.include_blogs {
            url.query_pairs_mut()
                .append_pair("include_blogs", if include_blogs { "1" } else { "0" });
        }
        if let Some(kind) = &self.kind {
            url.query_pairs_mut().append_pair("type", kind.as_str());
        }
        url
    }
}

impl CategoryQuery {
    pub fn with_page_id(mut self, page_id: i64) -> Self {
        self.page_id = Some(page_id);
        self
    }

    pub fn with_page(mut self, page_slug: &str) -> Self {
        self.page = Some(page_slug.to_string());
        self
    }

    pub fn with_include_blogs(mut self, include_blogs: bool) -> Self {
        self.include_blogs = Some(include_blogs);
        self
    }

    pub fn with_kind(mut self, kind: &str) -> Self {
        self.kind = Some(kind.to_string());
        self
    }
}
