use tokio::sync::RwLock;

use async_trait::async_trait;

use phrasey_core::phrase::{PhraseRecord, PhraseRow};

use crate::store::{PhraseStore, StoreError};

/// Store double backed by a Vec, for tests and local runs without a deployed
/// sheet. Query keeps rows with any cell containing the search text (empty
/// text keeps everything); append pushes one row per call, duplicates
/// included, matching the remote store's non-idempotent append.
#[derive(Default)]
pub struct InMemoryPhraseStore {
    rows: RwLock<Vec<PhraseRow>>,
    appended: RwLock<Vec<PhraseRecord>>,
}

impl InMemoryPhraseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<PhraseRow>) -> Self {
        Self { rows: RwLock::new(rows), appended: RwLock::new(Vec::new()) }
    }

    pub async fn appended_records(&self) -> Vec<PhraseRecord> {
        self.appended.read().await.clone()
    }

    pub async fn row_count(&self) -> usize {
        self.rows.read().await.len()
    }
}

#[async_trait]
impl PhraseStore for InMemoryPhraseStore {
    async fn query(&self, search_text: &str) -> Result<Vec<PhraseRow>, StoreError> {
        let rows = self.rows.read().await;
        if search_text.is_empty() {
            return Ok(rows.clone());
        }

        Ok(rows
            .iter()
            .filter(|row| row.cells().iter().any(|cell| cell.contains(search_text)))
            .cloned()
            .collect())
    }

    async fn append(&self, record: &PhraseRecord) -> Result<(), StoreError> {
        let row = PhraseRow::new(vec![
            record.category.clone(),
            record.tone.clone(),
            record.text.clone(),
            record.notes.clone(),
        ]);
        self.rows.write().await.push(row);
        self.appended.write().await.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use phrasey_core::phrase::{PhraseRecord, PhraseRow};

    use super::InMemoryPhraseStore;
    use crate::store::PhraseStore;

    fn row(cells: &[&str]) -> PhraseRow {
        PhraseRow::new(cells.iter().map(|cell| cell.to_string()).collect())
    }

    #[tokio::test]
    async fn query_filters_by_cell_containment() {
        let store = InMemoryPhraseStore::with_rows(vec![
            row(&["오류", "정중", "결제가 실패했습니다"]),
            row(&["환영", "긍정", "가입을 축하합니다"]),
        ]);

        let matched = store.query("결제").await.expect("query");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].phrase_text(), "결제가 실패했습니다");

        let all = store.query("").await.expect("query");
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn append_is_not_idempotent() {
        let store = InMemoryPhraseStore::new();
        let record = PhraseRecord {
            category: "오류".to_string(),
            text: "결제 실패".to_string(),
            tone: "정중".to_string(),
            notes: String::new(),
        };

        store.append(&record).await.expect("append");
        store.append(&record).await.expect("append");

        assert_eq!(store.appended_records().await.len(), 2);
        assert_eq!(store.row_count().await, 2);
    }
}
