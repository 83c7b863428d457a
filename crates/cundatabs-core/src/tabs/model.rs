use serde::{Deserialize, Serialize};

/// A tablature as sent by the editor.
///
/// Only the fields the server lists are typed. Anything else the editor
/// sends is kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabData {
    pub name: String,
    pub string_count: u8,
    /// Measures, each a list of strings, each a list of cells.
    pub measures: Vec<Vec<Vec<String>>>,
    pub timestamp: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Summary of a stored tablature, as returned by the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedTab {
    /// Stored file name without the `.json` extension.
    pub filename: String,
    pub name: String,
    pub string_count: u8,
    pub timestamp: String,
}

impl SavedTab {
    pub fn from_tab(filename: String, tab: &TabData) -> Self {
        Self {
            filename,
            name: tab.name.clone(),
            string_count: tab.string_count,
            timestamp: tab.timestamp.clone(),
        }
    }
}
