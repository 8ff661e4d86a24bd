//! Book model and related types

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};

/// Opaque server-generated book identifier
pub type BookId = String;

/// Full book record as stored in the registry.
///
/// `year`, `author`, `summary`, `publisher` and `reading` are kept exactly as
/// the client sent them; `null` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub name: String,
    pub year: Value,
    pub author: Value,
    pub summary: Value,
    pub publisher: Value,
    pub page_count: u32,
    pub read_page: u32,
    /// Always `read_page == page_count`, recomputed on every write
    pub finished: bool,
    pub reading: Value,
    #[serde(serialize_with = "serialize_timestamp")]
    pub inserted_at: DateTime<Utc>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Build a new record from an already validated payload
    pub fn new(id: BookId, payload: ValidBook, now: DateTime<Utc>) -> Self {
        let ValidBook {
            name,
            year,
            author,
            summary,
            publisher,
            page_count,
            read_page,
            reading,
        } = payload;

        Self {
            id,
            name,
            year,
            author,
            summary,
            publisher,
            page_count,
            read_page,
            finished: page_count == read_page,
            reading,
            inserted_at: now,
            updated_at: now,
        }
    }

    /// Replace every mutable attribute; `id` and `inserted_at` are kept.
    pub fn apply(&mut self, payload: ValidBook, now: DateTime<Utc>) {
        self.name = payload.name;
        self.year = payload.year;
        self.author = payload.author;
        self.summary = payload.summary;
        self.publisher = payload.publisher;
        self.page_count = payload.page_count;
        self.read_page = payload.read_page;
        self.reading = payload.reading;
        self.finished = self.page_count == self.read_page;
        self.updated_at = now;
    }

    /// Whether this record passes every criterion of `filter`.
    ///
    /// The `reading` criterion only matches a stored JSON boolean.
    pub fn matches(&self, filter: &BookFilter) -> bool {
        if let Some(ref needle) = filter.name {
            if !self.name.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }
        if filter
            .reading
            .is_some_and(|reading| self.reading != Value::Bool(reading))
        {
            return false;
        }
        if filter.finished.is_some_and(|finished| finished != self.finished) {
            return false;
        }
        true
    }
}

/// List projection of a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BookShort {
    pub id: BookId,
    pub name: String,
    pub publisher: Value,
}

impl From<&Book> for BookShort {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            name: book.name.clone(),
            publisher: book.publisher.clone(),
        }
    }
}

/// Create / update request body.
///
/// Every attribute is taken as raw JSON so that decoding never fails on a
/// field's type; `validate` decides what is acceptable.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct BookPayload {
    pub name: Value,
    pub year: Value,
    pub author: Value,
    pub summary: Value,
    pub publisher: Value,
    /// Non-negative integer, 0 when absent
    pub page_count: Value,
    /// Non-negative integer not above `pageCount`, 0 when absent
    pub read_page: Value,
    pub reading: Value,
}

/// Business rules a payload can break
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BookRejection {
    #[error("Mohon isi nama buku")]
    MissingName,
    #[error("pageCount dan readPage harus berupa bilangan bulat tidak negatif")]
    InvalidPageNumber,
    #[error("readPage tidak boleh lebih besar dari pageCount")]
    ReadPageExceedsPageCount,
}

/// Payload that passed validation; the name is guaranteed non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidBook {
    pub name: String,
    pub year: Value,
    pub author: Value,
    pub summary: Value,
    pub publisher: Value,
    pub page_count: u32,
    pub read_page: u32,
    pub reading: Value,
}

impl BookPayload {
    /// Check the rules in order; the first broken rule wins.
    pub fn validate(self) -> Result<ValidBook, BookRejection> {
        let name = match self.name {
            Value::String(name) if !name.is_empty() => name,
            _ => return Err(BookRejection::MissingName),
        };

        let page_count = page_number(&self.page_count)?;
        let read_page = page_number(&self.read_page)?;
        if read_page > page_count {
            return Err(BookRejection::ReadPageExceedsPageCount);
        }

        Ok(ValidBook {
            name,
            year: self.year,
            author: self.author,
            summary: self.summary,
            publisher: self.publisher,
            page_count,
            read_page,
            reading: self.reading,
        })
    }
}

fn page_number(value: &Value) -> Result<u32, BookRejection> {
    match value {
        Value::Null => Ok(0),
        Value::Number(number) => number
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or(BookRejection::InvalidPageNumber),
        _ => Err(BookRejection::InvalidPageNumber),
    }
}

/// List query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive substring of the book name
    pub name: Option<String>,
    /// Integer flag: nonzero keeps books being read, 0 keeps the others
    pub reading: Option<String>,
    /// Integer flag: nonzero keeps finished books, 0 keeps the others
    pub finished: Option<String>,
}

impl BookQuery {
    /// Collect the known keys from raw query pairs; the first occurrence of a
    /// repeated key wins and unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "name" => &mut query.name,
                "reading" => &mut query.reading,
                "finished" => &mut query.finished,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

/// Typed list filter; `None` criteria are not applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    /// Lowercased name fragment
    pub name: Option<String>,
    pub reading: Option<bool>,
    pub finished: Option<bool>,
}

impl From<BookQuery> for BookFilter {
    fn from(query: BookQuery) -> Self {
        Self {
            name: query
                .name
                .filter(|name| !name.is_empty())
                .map(|name| name.to_lowercase()),
            reading: query.reading.as_deref().map(query_flag),
            finished: query.finished.as_deref().map(query_flag),
        }
    }
}

/// Read a query flag as an integer, then as a boolean.
///
/// Leading whitespace and an optional sign are skipped, a `0x`/`0X` prefix
/// switches to hexadecimal, and the leading digits are parsed; anything after
/// them is ignored. Text with no leading digits reads as 0.
pub fn query_flag(raw: &str) -> bool {
    let trimmed = raw.trim_start();
    let unsigned = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('+'))
        .unwrap_or(trimmed);

    let (digits, radix) = match unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (unsigned, 10),
    };

    digits
        .chars()
        .take_while(|c| c.is_digit(radix))
        .any(|digit| digit != '0')
}

fn serialize_timestamp<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}
