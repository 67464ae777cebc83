pub mod api;
pub mod client;
pub mod models;

pub use client::CatalogClient;
pub use models::{Machine, PageCursor, PageEnvelope};
