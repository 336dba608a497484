//! Ordering of catalog records by title or release date.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::catalog::CatalogRecord;

/// Field to order by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Name,
    ReleaseDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// The four sort choices offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    #[default]
    NameAsc,
    NameDesc,
    /// Oldest first.
    ReleaseDateAsc,
    /// Newest first.
    ReleaseDateDesc,
}

impl SortOption {
    pub const ALL: [SortOption; 4] = [
        SortOption::NameAsc,
        SortOption::NameDesc,
        SortOption::ReleaseDateAsc,
        SortOption::ReleaseDateDesc,
    ];

    pub fn from_parts(key: SortKey, direction: SortDirection) -> Self {
        match (key, direction) {
            (SortKey::Name, SortDirection::Asc) => SortOption::NameAsc,
            (SortKey::Name, SortDirection::Desc) => SortOption::NameDesc,
            (SortKey::ReleaseDate, SortDirection::Asc) => SortOption::ReleaseDateAsc,
            (SortKey::ReleaseDate, SortDirection::Desc) => SortOption::ReleaseDateDesc,
        }
    }

    pub fn key(self) -> SortKey {
        match self {
            SortOption::NameAsc | SortOption::NameDesc => SortKey::Name,
            SortOption::ReleaseDateAsc | SortOption::ReleaseDateDesc => SortKey::ReleaseDate,
        }
    }

    pub fn direction(self) -> SortDirection {
        match self {
            SortOption::NameAsc | SortOption::ReleaseDateAsc => SortDirection::Asc,
            SortOption::NameDesc | SortOption::ReleaseDateDesc => SortDirection::Desc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortOption::NameAsc => "name-asc",
            SortOption::NameDesc => "name-desc",
            SortOption::ReleaseDateAsc => "release-date-asc",
            SortOption::ReleaseDateDesc => "release-date-desc",
        }
    }

    /// Label shown in the sort selector.
    pub fn label(self) -> &'static str {
        match self {
            SortOption::NameAsc => "Name (A-Z)",
            SortOption::NameDesc => "Name (Z-A)",
            SortOption::ReleaseDateAsc => "Release date (oldest first)",
            SortOption::ReleaseDateDesc => "Release date (newest first)",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown sort option: {0}")]
pub struct ParseSortOptionError(pub String);

impl FromStr for SortOption {
    type Err = ParseSortOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOption::ALL
            .into_iter()
            .find(|option| option.as_str() == s)
            .ok_or_else(|| ParseSortOptionError(s.to_string()))
    }
}

/// Parse a release date into an instant.
///
/// Accepts RFC 3339 timestamps, local date-times without an offset, and the
/// day, month and year precisions the upstream catalog uses (`2024-03-09`,
/// `2024-03`, `2024`). Anything else yields `None`.
pub fn parse_release_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if raw.len() == 7 {
        if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d") {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    if raw.len() == 4 && raw.bytes().all(|b| b.is_ascii_digit()) {
        let year: i32 = raw.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0));
    }
    None
}

/// Broad character groups in collation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CharClass {
    Space,
    Punctuation,
    Digit,
    Letter,
}

impl CharClass {
    fn of(c: char) -> Self {
        if c.is_whitespace() {
            CharClass::Space
        } else if c.is_numeric() {
            CharClass::Digit
        } else if c.is_alphabetic() {
            CharClass::Letter
        } else {
            CharClass::Punctuation
        }
    }
}

/// Primary-strength sort key for a title.
///
/// Case and accents are ignored. Latin letters without a canonical
/// decomposition (`Æ`, `Ø`, `Ł`, `ß`, ...) fold to their base letters.
/// Whitespace sorts before punctuation and symbols, then digits, then
/// letters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey(Vec<(CharClass, char)>);

impl CollationKey {
    pub fn new(title: &str) -> Self {
        let mut key = Vec::with_capacity(title.len());
        for c in title.nfd().filter(|c| !is_combining_mark(*c)) {
            for lower in c.to_lowercase() {
                match fold_letter(lower) {
                    Some(folded) => key.extend(folded.chars().map(|f| (CharClass::Letter, f))),
                    None => key.push((CharClass::of(lower), lower)),
                }
            }
        }
        Self(key)
    }
}

/// Base letters for lower-case Latin letters that NFD leaves whole.
fn fold_letter(c: char) -> Option<&'static str> {
    let folded = match c {
        'æ' => "ae",
        'œ' => "oe",
        'ø' => "o",
        'ł' => "l",
        'đ' | 'ð' => "d",
        'ħ' => "h",
        'ı' => "i",
        'ŀ' => "l",
        'ŋ' => "n",
        'ŧ' => "t",
        'þ' => "th",
        'ß' => "ss",
        _ => return None,
    };
    Some(folded)
}

/// Case- and accent-insensitive key for title ordering.
pub fn collation_key(title: &str) -> CollationKey {
    CollationKey::new(title)
}

enum SortValue {
    Name(CollationKey),
    Date(Option<NaiveDateTime>),
}

impl SortValue {
    fn of(record: &CatalogRecord, key: SortKey) -> Self {
        match key {
            SortKey::Name => SortValue::Name(collation_key(&record.title)),
            SortKey::ReleaseDate => SortValue::Date(
                record
                    .release_date
                    .as_deref()
                    .and_then(parse_release_date),
            ),
        }
    }

    fn compare(&self, other: &Self, direction: SortDirection) -> Ordering {
        match (self, other) {
            (SortValue::Name(a), SortValue::Name(b)) => direction.apply(a.cmp(b)),
            // Missing dates stay last in either direction.
            (SortValue::Date(None), SortValue::Date(None)) => Ordering::Equal,
            (SortValue::Date(None), SortValue::Date(Some(_))) => Ordering::Greater,
            (SortValue::Date(Some(_)), SortValue::Date(None)) => Ordering::Less,
            (SortValue::Date(Some(a)), SortValue::Date(Some(b))) => direction.apply(a.cmp(b)),
            _ => Ordering::Equal,
        }
    }
}

/// Return the records in order. The input is left untouched and records
/// that compare equal keep their relative input order.
pub fn sort<'a, I>(records: I, key: SortKey, direction: SortDirection) -> Vec<&'a CatalogRecord>
where
    I: IntoIterator<Item = &'a CatalogRecord>,
{
    let mut keyed: Vec<(SortValue, &'a CatalogRecord)> = records
        .into_iter()
        .map(|record| (SortValue::of(record, key), record))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| a.compare(b, direction));
    keyed.into_iter().map(|(_, record)| record).collect()
}
