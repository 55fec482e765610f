//! JSON collection parsing.
//!
//! A collection file is an array of resource objects. Display-only fields
//! (description, tags, ...) are ignored. When the file as a whole does not
//! match, entries are recovered one by one.

use serde::Deserialize;
use serde_json::Value;

/// One entry as stored in a collection file.
#[derive(Debug, Deserialize)]
pub(super) struct ResourceRecord {
    pub id: RecordId,
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// Ids are usually strings; some hand-edited files use numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum RecordId {
    Text(String),
    Number(serde_json::Number),
}

impl RecordId {
    pub fn into_string(self) -> String {
        match self {
            RecordId::Text(s) => s,
            RecordId::Number(n) => n.to_string(),
        }
    }
}

/// Parsed records plus the number of entries that had to be skipped.
#[derive(Debug)]
pub(super) struct ParsedCollection {
    pub records: Vec<ResourceRecord>,
    pub skipped: usize,
}

/// Parses a collection file.
///
/// Accepts a bare array, or an object wrapping the array under any key
/// (`{"models": [...]}`). Entries that do not carry `id`, `title` and `link`
/// are skipped and counted.
///
/// # Errors
///
/// Returns the parse error only when the text is not JSON at all.
pub(super) fn parse_collection(text: &str) -> Result<ParsedCollection, serde_json::Error> {
    if let Ok(records) = serde_json::from_str::<Vec<ResourceRecord>>(text) {
        return Ok(ParsedCollection {
            records,
            skipped: 0,
        });
    }

    let value: Value = serde_json::from_str(text)?;
    let entries = match value {
        Value::Array(items) => items,
        Value::Object(map) => map
            .into_iter()
            .find_map(|(_, v)| match v {
                Value::Array(items) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    };

    let total = entries.len();
    let records: Vec<ResourceRecord> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect();
    Ok(ParsedCollection {
        skipped: total - records.len(),
        records,
    })
}
