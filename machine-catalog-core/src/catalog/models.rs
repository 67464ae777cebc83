use serde::{Deserialize, Serialize};

/// One machine as the server describes it. Only the display fields are
/// modelled; anything else in the payload is ignored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Machine {
    pub title: String,
    pub image: String,
    #[serde(rename = "class")]
    pub class_label: String,
}

/// Reference to an adjacent page, present only when that page exists.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub page: u64,
}

/// The wrapper around one page of results.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PageEnvelope {
    #[serde(default)]
    pub results: Vec<Machine>,
    pub total: u64,
    pub next: Option<PageCursor>,
    pub previous: Option<PageCursor>,
}

impl PageEnvelope {
    /// Number of pages the catalog spans at the given page size.
    pub fn total_pages(&self, limit: u64) -> u64 {
        (self.total + limit - 1) / limit // Ceiling division
    }
}
