//! Request and response types for audiobook fetches.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::catalog::CatalogRecord;

/// Parameters for one page of audiobooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    /// ISO 3166-1 alpha-2 market code.
    #[serde(default = "default_market")]
    pub market: String,
    /// Server-side search text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl Default for FetchRequest {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
            market: default_market(),
            query: None,
        }
    }
}

impl FetchRequest {
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }
}

pub(crate) fn default_limit() -> u32 {
    40
}

pub(crate) fn default_market() -> String {
    "AU".to_string()
}

/// One page of fetched audiobooks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudiobookPage {
    pub items: Vec<CatalogRecord>,
    /// Total matching records before paging.
    pub total: u32,
    pub limit: u32,
    pub offset: u32,
}

impl AudiobookPage {
    pub fn empty(request: &FetchRequest) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            limit: request.limit,
            offset: request.offset,
        }
    }
}

/// Object-shaped catalog document: the upstream envelope
/// (`{"audiobooks": {"items": [...]}}`) or a single page (`{"items": [...]}`).
#[derive(Debug, Deserialize)]
struct CatalogObject {
    #[serde(default)]
    audiobooks: Option<CatalogItems>,
    #[serde(default)]
    items: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct CatalogItems {
    #[serde(default)]
    items: Vec<Value>,
}

/// Parse a catalog document into records.
///
/// The document may be an envelope, a page object or a bare array of
/// records. Errors in the document itself are returned with their position.
/// An entry that cannot be read as a record at all is skipped with a
/// warning so the rest of the catalog still loads.
pub(crate) fn parse_catalog(bytes: &[u8]) -> Result<Vec<CatalogRecord>, serde_json::Error> {
    let entries = match bytes.iter().copied().find(|b| !b.is_ascii_whitespace()) {
        Some(b'[') => serde_json::from_slice::<Vec<Value>>(bytes)?,
        _ => {
            let object: CatalogObject = serde_json::from_slice(bytes)?;
            match (object.audiobooks, object.items) {
                (Some(audiobooks), _) => audiobooks.items,
                (None, Some(items)) => items,
                (None, None) => {
                    return Err(serde::de::Error::custom(
                        "expected `audiobooks.items`, `items` or an array of records",
                    ))
                }
            }
        }
    };

    let records = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping catalog entry {}: {}", index, e);
                None
            }
        })
        .collect();
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_request_defaults() {
        let request: FetchRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request, FetchRequest::default());
        assert_eq!(request.limit, 40);
        assert_eq!(request.market, "AU");
        assert!(request.query.is_none());
    }

    #[test]
    fn test_document_shapes() {
        let envelope =
            parse_catalog(br#"{"audiobooks": {"items": [{"id": "1", "name": "A"}]}}"#).unwrap();
        assert_eq!(envelope.len(), 1);
        assert_eq!(envelope[0].title, "A");

        let items = parse_catalog(br#"{"items": [{"id": "1"}, {"id": "2"}]}"#).unwrap();
        assert_eq!(items.len(), 2);

        let bare = parse_catalog(br#"  [{"id": "1"}]"#).unwrap();
        assert_eq!(bare[0].id, "1");
    }

    #[test]
    fn test_bad_fields_do_not_lose_other_records() {
        let documents: [&[u8]; 5] = [
            br#"[{"id":"1","name":"Good"},{"id":"2","name":"Bad","images":null}]"#,
            br#"[{"id":"1","name":"Good"},{"id":"2","name":"Bad","languages":null}]"#,
            br#"[{"id":"1","name":"Good"},{"id":"2","name":null}]"#,
            br#"[{"id":"1","name":"Good"},{"id":"2","name":"Bad","release_date":20240101}]"#,
            br#"[{"id":"1","name":"Good"},{"id":"2","name":"Good","title":"Good"}]"#,
        ];
        for document in documents {
            let records = parse_catalog(document).unwrap();
            assert_eq!(records.len(), 2, "{}", String::from_utf8_lossy(document));
            assert_eq!(records[0].title, "Good");
        }
    }

    #[test]
    fn test_unreadable_entries_are_skipped() {
        let records =
            parse_catalog(br#"{"items": [{"id": "1"}, "stray", {"name": "no id"}, {"id": "4"}]}"#)
                .unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
    }

    #[test]
    fn test_document_errors_keep_position() {
        let err = parse_catalog(b"{\n  \"items\": [\n    {\"id\": \"1\"},\n  ]\n}")
            .unwrap_err();
        assert_eq!(err.line(), 4);

        let err = parse_catalog(br#"{"audiobooks": {"items": {"id": "1"}}}"#).unwrap_err();
        assert!(err.to_string().contains("invalid type"), "{}", err);

        let err = parse_catalog(br#"{"shows": []}"#).unwrap_err();
        assert!(err.to_string().contains("audiobooks.items"), "{}", err);

        assert!(parse_catalog(b"").is_err());
        assert!(parse_catalog(br#""just text""#).is_err());
    }
}
