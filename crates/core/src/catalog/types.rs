//! Types for catalog records as delivered by the upstream audiobook API.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A single audiobook in a fetch result.
///
/// Records are read-only once fetched. Only `id`, `title`, `authors`,
/// `narrators` and `release_date` are inspected by the view pipeline; the
/// remaining fields are carried through untouched for presentation.
///
/// Deserialization never rejects a record over a malformed field: a value
/// of the wrong type reads as that field's empty default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "RawRecord")]
pub struct CatalogRecord {
    /// Identifier, unique within one fetch result. Join key for hiding.
    pub id: String,
    /// Audiobook title.
    pub title: String,
    /// Credited authors (possibly empty).
    pub authors: Vec<Author>,
    /// Narrator credits in whatever shape the upstream sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrators: Option<NarratorField>,
    /// Release date (ISO-8601, possibly partial or missing).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// Cover art in several sizes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Image>,
    /// Total duration in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Number of chapters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_chapters: Option<u32>,
    /// Links to the audiobook on external services.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_urls: Option<ExternalUrls>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,
    /// Any other upstream fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Wire shape of a record. The upstream API names the title `name`; both
/// keys are accepted and `title` wins when both carry a string.
#[derive(Deserialize)]
struct RawRecord {
    #[serde(deserialize_with = "record_id")]
    id: String,
    #[serde(default, deserialize_with = "lenient")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    authors: Vec<Author>,
    #[serde(default)]
    narrators: Option<NarratorField>,
    #[serde(default, deserialize_with = "lenient")]
    release_date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    images: Vec<Image>,
    #[serde(default, deserialize_with = "lenient")]
    duration_ms: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    total_chapters: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    external_urls: Option<ExternalUrls>,
    #[serde(default, deserialize_with = "lenient")]
    publisher: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    languages: Vec<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawRecord> for CatalogRecord {
    fn from(raw: RawRecord) -> Self {
        Self {
            id: raw.id,
            title: raw.title.or(raw.name).unwrap_or_default(),
            authors: raw.authors,
            narrators: raw.narrators,
            release_date: raw.release_date,
            images: raw.images,
            duration_ms: raw.duration_ms,
            total_chapters: raw.total_chapters,
            external_urls: raw.external_urls,
            publisher: raw.publisher,
            description: raw.description,
            languages: raw.languages,
            extra: raw.extra,
        }
    }
}

impl CatalogRecord {
    /// Create a record with only the fields the pipeline inspects.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            authors: Vec::new(),
            narrators: None,
            release_date: None,
            images: Vec::new(),
            duration_ms: None,
            total_chapters: None,
            external_urls: None,
            publisher: None,
            description: None,
            languages: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Author names that are present, in credit order.
    pub fn author_names(&self) -> impl Iterator<Item = &str> {
        self.authors.iter().filter_map(|a| a.name.as_deref())
    }
}

/// An author credit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Author {
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
}

impl Author {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// The raw `narrators` attribute.
///
/// Upstream data is inconsistent here: some records carry an array of
/// objects, some an array of plain strings, some a single bare string.
/// `null` and a missing key both deserialize to `None` on the record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum NarratorField {
    List(Vec<NarratorEntry>),
    Text(String),
    Other(Value),
}

/// One element of a narrator array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum NarratorEntry {
    Name(String),
    Credit(NarratorCredit),
    Other(Value),
}

/// An object-shaped narrator entry, e.g. `{ "name": "Jim Dale" }`.
///
/// `name` is kept as a raw value since it is not guaranteed to be a string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NarratorCredit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NarratorCredit {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(Value::String(name.into())),
            extra: Map::new(),
        }
    }
}

/// A cover image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Image {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

/// External links for a record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExternalUrls {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spotify: Option<String>,
}

/// Read a value, falling back to `T::default()` when it is null or of the
/// wrong type.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Record ids are strings upstream; numeric ids are accepted as their
/// decimal text.
fn record_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string id, found {}",
            other
        ))),
    }
}
