use serde::{Deserialize, Serialize};

/// One UX copy entry as written to the spreadsheet store.
///
/// Created by the add command and never mutated or deleted by this system;
/// the spreadsheet owns the record's lifecycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseRecord {
    pub category: String,
    pub text: String,
    #[serde(default)]
    pub tone: String,
    #[serde(default)]
    pub notes: String,
}

/// One positional row returned by a spreadsheet query.
///
/// Index 1 carries the tone label and index 2 the phrase text; index 0 and
/// anything past index 2 are not used by reply formatting. Short rows read
/// as empty cells.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PhraseRow(Vec<String>);

impl PhraseRow {
    pub fn new(cells: Vec<String>) -> Self {
        Self(cells)
    }

    pub fn cells(&self) -> &[String] {
        &self.0
    }

    pub fn tone_label(&self) -> &str {
        self.cell(1)
    }

    pub fn phrase_text(&self) -> &str {
        self.cell(2)
    }

    fn cell(&self, index: usize) -> &str {
        self.0.get(index).map(String::as_str).unwrap_or("")
    }
}

impl From<Vec<String>> for PhraseRow {
    fn from(cells: Vec<String>) -> Self {
        Self::new(cells)
    }
}
