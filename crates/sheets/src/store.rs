use async_trait::async_trait;
use thiserror::Error;

use phrasey_core::phrase::{PhraseRecord, PhraseRow};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("sheet request failed: {0}")]
    Transport(String),
    #[error("sheet returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("sheet response decode failed: {0}")]
    Decode(String),
}

/// Read/write access to the phrase spreadsheet.
#[async_trait]
pub trait PhraseStore: Send + Sync {
    /// Returns rows matching `search_text`, in store order. An empty search
    /// text means "no filter"; an empty result is not an error.
    async fn query(&self, search_text: &str) -> Result<Vec<PhraseRow>, StoreError>;

    /// Writes exactly one record. Not idempotent: repeated calls with the
    /// same record append duplicate rows.
    async fn append(&self, record: &PhraseRecord) -> Result<(), StoreError>;
}
