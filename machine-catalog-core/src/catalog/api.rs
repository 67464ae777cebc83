use super::client::CatalogClient;
use super::models::PageEnvelope;
use crate::error::CatalogError;
use log::info;

/// Fixed page size used in every request.
pub const PAGE_LIMIT: u64 = 12;

impl CatalogClient {
    /// Fetch one page of the machine list.
    ///
    /// A non-success status, a failed body read, and a malformed body are
    /// all surfaced as errors; none of them are retried.
    pub async fn fetch_page(&self, page: u64, limit: u64) -> Result<PageEnvelope, CatalogError> {
        let uri = format!("{}/machines?page={}&limit={}", self.base_url(), page, limit);
        let response = self.call(&uri).await?;

        let status = response.status();
        if !status.is_success() {
            info!("machine list request failed: {}", status);
            return Err(CatalogError::Status(status));
        }

        let body = response.text().await?;
        let envelope: PageEnvelope = serde_json::from_str(&body)?;

        Ok(envelope)
    }

    /// Fetch the raw bytes of a machine image so the GUI can render a
    /// thumbnail. Callers log failures instead of surfacing them.
    pub async fn fetch_image_bytes(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        let response = self.call(url).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status));
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}
