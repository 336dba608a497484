//! Narrator normalization.
//!
//! Every consumer of narrator data goes through [`normalize`], so the raw
//! shape of the field is inspected in exactly one place.

use serde::Serialize;
use serde_json::Value;

use super::types::{CatalogRecord, NarratorEntry, NarratorField};

/// Display name used for narrator entries without a usable name.
pub const NARRATOR_PLACEHOLDER: &str = "Narrator";

/// Canonical narrator list derived from a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedNarrators {
    /// Display names in credit order.
    pub names: Vec<String>,
    /// Number of credited narrators, placeholders included.
    pub count: usize,
}

impl NormalizedNarrators {
    /// Names joined for display, e.g. `"Ann, Bob"`.
    pub fn display(&self) -> String {
        self.names.join(", ")
    }

    /// Card label: singular unless more than one narrator is credited.
    pub fn label(&self) -> &'static str {
        if self.count > 1 {
            "Narrators"
        } else {
            "Narrator"
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Normalize a raw narrator field.
///
/// Only arrays produce names. A bare string, a number, `null` or a missing
/// field all normalize to an empty list. Array entries that are neither a
/// string nor an object with a non-empty string `name` become
/// [`NARRATOR_PLACEHOLDER`] and still count.
pub fn normalize(field: Option<&NarratorField>) -> NormalizedNarrators {
    let names: Vec<String> = match field {
        Some(NarratorField::List(entries)) => entries.iter().map(entry_name).collect(),
        Some(NarratorField::Text(_)) | Some(NarratorField::Other(_)) | None => Vec::new(),
    };

    NormalizedNarrators {
        count: names.len(),
        names,
    }
}

/// Normalize the narrators of a record.
pub fn narrators_of(record: &CatalogRecord) -> NormalizedNarrators {
    normalize(record.narrators.as_ref())
}

fn entry_name(entry: &NarratorEntry) -> String {
    match entry {
        NarratorEntry::Name(name) => name.clone(),
        NarratorEntry::Credit(credit) => match &credit.name {
            Some(Value::String(name)) if !name.is_empty() => name.clone(),
            _ => NARRATOR_PLACEHOLDER.to_string(),
        },
        NarratorEntry::Other(_) => NARRATOR_PLACEHOLDER.to_string(),
    }
}
