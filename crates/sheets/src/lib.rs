pub mod client;
pub mod memory;
pub mod store;

pub use client::SheetsClient;
pub use memory::InMemoryPhraseStore;
pub use store::{PhraseStore, StoreError};
