mod common;
pub use self::common::{PagedQuery, Query, QueryCommon};

mod blog;
pub use self::blog::BlogQuery;

mod category;
pub use self::category::CategoryQuery;
