mod client;
mod errors;
mod query;
pub mod types;
pub use self::client::{Client, RawReply};
pub use self::errors::Error;
pub use self::query::{BlogQuery, CategoryQuery, PagedQuery, Query};
