//! Library layer for the insurance article site: fail-safe content client,
//! article listing view-model, live search suggestions, proxy handlers and
//! admin helpers.
//!
//! Wraps the `content_api` crate with per-call deadlines and empty fallbacks
//! so no upstream failure reaches a page or proxy response.

pub mod admin;
pub mod articles;
pub mod config;
pub mod editor;
pub mod error;
pub mod fetch;
pub mod pagination;
pub mod params;
pub mod proxy;
pub mod suggest;
pub mod validation;

pub use content_api;
pub use content_api::types;
pub use content_api::{BlogQuery, CategoryQuery, PagedQuery, Query};

pub use articles::{load_article_list, ArticleListRequest, ArticleListView};
pub use config::{FetchTimeouts, Settings};
pub use editor::{EditorError, ExtensionRegistry};
pub use error::SiteError;
pub use fetch::SafeClient;
pub use pagination::{page_window, PageStrip, PageWindow};
pub use params::QueryParams;
pub use proxy::ProxyReply;
pub use suggest::{SearchBox, SuggestionDebouncer, SuggestionSource};
