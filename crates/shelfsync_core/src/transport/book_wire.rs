//! Catalog wire records and their normalization.
//!
//! # Responsibility
//! - Mirror the catalog service JSON (`_id`, `placePub`, `Fil`, ...).
//! - Coerce counters and category flags into typed values.
//!
//! # Invariants
//! - Counters follow leading-integer parsing: `"12"`, `" 7 copies"` and
//!   `3.9` become `12`, `7` and `3`; anything else is malformed.
//! - A flag is set only for JSON `true` or the string `"1"`.

use crate::config::{CacheConfig, MalformedCounterPolicy};
use crate::model::book::{BookImage, BookRecord, Category, CategoryFlags, Counters};
use crate::transport::{TransportError, TransportResult};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

static LEADING_INT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("valid leading int regex"));

/// Full catalog response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSnapshotTransport {
    #[serde(default, alias = "studentbook")]
    pub books: Vec<BookRecordTransport>,
    #[serde(default, alias = "bookSubjects")]
    pub subjects: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookImageTransport {
    pub public_id: Option<String>,
    pub url: Option<String>,
}

/// One catalog record as sent by the service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookRecordTransport {
    #[serde(rename = "_id")]
    pub id: String,
    pub book_image: Option<BookImageTransport>,
    pub title: Option<String>,
    pub responsibility: Option<String>,
    pub uniform_title: Option<String>,
    pub parallel_title: Option<String>,
    pub main_author: Option<String>,
    pub other_author: Option<String>,
    pub contributors: Option<String>,
    pub corp_author: Option<String>,
    #[serde(rename = "placePub")]
    pub place_pub: Option<String>,
    pub publisher: Option<String>,
    #[serde(rename = "yearPub")]
    pub year_pub: Option<String>,
    pub edition: Option<String>,
    pub pages: Option<String>,
    pub other_details: Option<String>,
    pub dimension: Option<String>,
    pub acc_materials: Option<String>,
    pub series: Option<String>,
    pub gen_notes: Option<String>,
    pub isbn: Option<String>,
    pub call_number: Option<String>,
    pub accession: Option<String>,
    // The service spells this field `languange`.
    #[serde(rename = "languange", alias = "language")]
    pub language: Option<String>,
    pub location: Option<String>,
    pub electronic_access: Option<String>,
    pub copy: Option<Value>,
    pub on_shelf: Option<Value>,
    pub out: Option<Value>,
    pub date_updated: Option<String>,
    pub date_entered: Option<String>,
    #[serde(rename = "Fil")]
    pub fil: Option<Value>,
    #[serde(rename = "Ref")]
    pub reference: Option<Value>,
    #[serde(rename = "Bio")]
    pub bio: Option<Value>,
    #[serde(rename = "Fic")]
    pub fic: Option<Value>,
    #[serde(rename = "Res")]
    pub res: Option<Value>,
    pub subjects: Option<Vec<String>>,
}

impl BookRecordTransport {
    /// Normalizes this wire record into a catalog record.
    ///
    /// # Errors
    /// - `TransportError::MalformedCounter` when a counter is not an integer
    ///   and `config.malformed_counter_policy` is `Reject`.
    pub fn into_record(self, config: &CacheConfig) -> TransportResult<BookRecord> {
        let counters = Counters {
            copy: normalize_counter(&self.id, "copy", self.copy.as_ref(), config)?,
            on_shelf: normalize_counter(&self.id, "on_shelf", self.on_shelf.as_ref(), config)?,
            out: normalize_counter(&self.id, "out", self.out.as_ref(), config)?,
        };

        let mut categories = CategoryFlags::default();
        for (category, raw) in [
            (Category::Filipiniana, &self.fil),
            (Category::Reference, &self.reference),
            (Category::Biography, &self.bio),
            (Category::Fiction, &self.fic),
            (Category::Reserve, &self.res),
        ] {
            categories.set(category, parse_flag(raw.as_ref()));
        }

        let image = match self.book_image {
            Some(image) => BookImage {
                public_id: image.public_id,
                url: image
                    .url
                    .unwrap_or_else(|| config.placeholder_image_url.clone()),
            },
            None => BookImage::placeholder(config.placeholder_image_url.as_str()),
        };

        Ok(BookRecord {
            id: self.id,
            image,
            title: self.title,
            responsibility: self.responsibility,
            uniform_title: self.uniform_title,
            parallel_title: self.parallel_title,
            main_author: self.main_author,
            other_author: self.other_author,
            contributors: self.contributors,
            corp_author: self.corp_author,
            place_published: self.place_pub,
            publisher: self.publisher,
            year_published: self.year_pub,
            edition: self.edition,
            pages: self.pages,
            other_details: self.other_details,
            dimension: self.dimension,
            accompanying_materials: self.acc_materials,
            series: self.series,
            general_notes: self.gen_notes,
            isbn: self.isbn,
            call_number: self.call_number,
            accession: self.accession,
            language: self.language,
            location: self.location,
            electronic_access: self.electronic_access,
            date_updated: self.date_updated,
            date_entered: self.date_entered,
            categories,
            subjects: self.subjects.unwrap_or_default(),
            counters,
        })
    }
}

/// Parses one counter with leading-integer semantics.
///
/// Returns `None` for values with no leading integer (including `null`,
/// booleans and empty strings).
pub fn parse_counter(raw: Option<&Value>) -> Option<i64> {
    match raw? {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|value| value.is_finite())
                .map(|value| value.trunc() as i64)
        }),
        Value::String(text) => LEADING_INT_RE
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|digits| digits.as_str().parse::<i64>().ok()),
        _ => None,
    }
}

/// Returns whether a wire flag is set (`true` or `"1"`).
pub fn parse_flag(raw: Option<&Value>) -> bool {
    match raw {
        Some(Value::Bool(value)) => *value,
        Some(Value::String(text)) => text == "1",
        _ => false,
    }
}

fn normalize_counter(
    book_id: &str,
    field: &'static str,
    raw: Option<&Value>,
    config: &CacheConfig,
) -> TransportResult<i64> {
    if let Some(value) = parse_counter(raw) {
        return Ok(value);
    }

    let raw_text = raw.map_or_else(|| "null".to_string(), Value::to_string);
    match config.malformed_counter_policy {
        MalformedCounterPolicy::Zero => {
            warn!(
                "event=counter_normalize module=catalog status=defaulted book_id={} field={} raw={}",
                book_id, field, raw_text
            );
            Ok(0)
        }
        MalformedCounterPolicy::Reject => Err(TransportError::MalformedCounter {
            book_id: book_id.to_string(),
            field,
            raw: raw_text,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_counter, parse_flag};
    use serde_json::json;

    #[test]
    fn counter_parsing_keeps_leading_integer_only() {
        assert_eq!(parse_counter(Some(&json!(4))), Some(4));
        assert_eq!(parse_counter(Some(&json!("12"))), Some(12));
        assert_eq!(parse_counter(Some(&json!("  7 copies"))), Some(7));
        assert_eq!(parse_counter(Some(&json!("-2"))), Some(-2));
        assert_eq!(parse_counter(Some(&json!(3.9))), Some(3));
    }

    #[test]
    fn non_numeric_counters_are_rejected() {
        assert_eq!(parse_counter(None), None);
        assert_eq!(parse_counter(Some(&json!(null))), None);
        assert_eq!(parse_counter(Some(&json!("abc"))), None);
        assert_eq!(parse_counter(Some(&json!(""))), None);
        assert_eq!(parse_counter(Some(&json!(true))), None);
    }

    #[test]
    fn flags_accept_true_and_string_one_only() {
        assert!(parse_flag(Some(&json!(true))));
        assert!(parse_flag(Some(&json!("1"))));
        assert!(!parse_flag(Some(&json!("0"))));
        assert!(!parse_flag(Some(&json!(1))));
        assert!(!parse_flag(Some(&json!("true"))));
        assert!(!parse_flag(None));
    }
}
