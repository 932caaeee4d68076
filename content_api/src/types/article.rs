use serde::{Deserialize, Serialize};

/// A blog article as it appears in list responses.
///
/// `slug` is the identity used for routing and de-duplication. Every other
/// field is optional upstream; unknown fields are ignored.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Article {
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub hero_image: Option<String>,
    /// Category display name.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub category_slug: Option<String>,
    /// ISO-8601 timestamp, or `None` for category-inline articles.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Full article returned by `GET /api/blogs/<slug>/`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct BlogDetail {
    #[serde(flatten)]
    pub article: Article,
    #[serde(default)]
    pub content_html: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub reviewer: Option<String>,
    #[serde(default)]
    pub parent_page: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub related_blogs: Vec<Article>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct BlogDetailResponse {
    pub blog: Option<BlogDetail>,
}
