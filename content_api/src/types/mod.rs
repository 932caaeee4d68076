mod meta;
pub use self::meta::{BlogPage, BlogsResponse, Pagination, RawPagination};

mod article;
pub use self::article::{Article, BlogDetail, BlogDetailResponse};

mod category;
pub use self::category::{CategoriesResponse, Category, RawCategory};

mod homepage;
pub use self::homepage::{HomepagePayload, PagePayload};

mod site;
pub use self::site::{SiteConfig, DEFAULT_BRAND_NAME};
