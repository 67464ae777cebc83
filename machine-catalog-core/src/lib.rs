pub mod catalog;
pub mod error;
pub mod pagination;

pub use catalog::api::PAGE_LIMIT;
pub use catalog::client::{ApiCall, DEFAULT_BASE_URL};
pub use catalog::{CatalogClient, Machine, PageCursor, PageEnvelope};
pub use error::CatalogError;
pub use pagination::PageState;
