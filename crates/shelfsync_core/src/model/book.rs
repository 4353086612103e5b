//! Book inventory domain model.
//!
//! # Responsibility
//! - Define the normalized in-memory shape of one catalog record.
//! - Provide counter helpers used by optimistic borrow/return actions.
//!
//! # Invariants
//! - `id` is the only identity; it is never rewritten after load.
//! - `on_shelf + out == copy` is preserved by every borrow/return pair.
//! - Counters are plain integers after normalization, never strings.

use serde::{Deserialize, Serialize};

/// Stable identifier assigned by the remote catalog.
pub type BookId = String;

/// Cover image reference for a catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookImage {
    /// Asset id on the image host, when the record has an uploaded cover.
    pub public_id: Option<String>,
    /// Display URL. Falls back to the configured placeholder.
    pub url: String,
}

impl BookImage {
    /// Image reference used when a record carries no cover.
    pub fn placeholder(url: impl Into<String>) -> Self {
        Self {
            public_id: None,
            url: url.into(),
        }
    }
}

/// Shelving categories carried as boolean flags on every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Wire code `Fil`.
    Filipiniana,
    /// Wire code `Ref`.
    Reference,
    /// Wire code `Bio`.
    Biography,
    /// Wire code `Fic`.
    Fiction,
    /// Wire code `Res`.
    Reserve,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Filipiniana,
        Category::Reference,
        Category::Biography,
        Category::Fiction,
        Category::Reserve,
    ];

    /// Returns the short code used by the catalog service.
    pub fn wire_code(self) -> &'static str {
        match self {
            Self::Filipiniana => "Fil",
            Self::Reference => "Ref",
            Self::Biography => "Bio",
            Self::Fiction => "Fic",
            Self::Reserve => "Res",
        }
    }
}

/// Category flag set for one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFlags {
    pub filipiniana: bool,
    pub reference: bool,
    pub biography: bool,
    pub fiction: bool,
    pub reserve: bool,
}

impl CategoryFlags {
    pub fn contains(&self, category: Category) -> bool {
        match category {
            Category::Filipiniana => self.filipiniana,
            Category::Reference => self.reference,
            Category::Biography => self.biography,
            Category::Fiction => self.fiction,
            Category::Reserve => self.reserve,
        }
    }

    pub fn set(&mut self, category: Category, value: bool) {
        let slot = match category {
            Category::Filipiniana => &mut self.filipiniana,
            Category::Reference => &mut self.reference,
            Category::Biography => &mut self.biography,
            Category::Fiction => &mut self.fiction,
            Category::Reserve => &mut self.reserve,
        };
        *slot = value;
    }
}

/// Inventory counters for one title.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    /// Total copies owned.
    pub copy: i64,
    /// Copies available for lending.
    pub on_shelf: i64,
    /// Copies currently lent out.
    pub out: i64,
}

impl Counters {
    pub fn new(copy: i64, on_shelf: i64, out: i64) -> Self {
        Self {
            copy,
            on_shelf,
            out,
        }
    }

    /// Returns whether `on_shelf + out == copy`.
    pub fn is_balanced(&self) -> bool {
        self.on_shelf.checked_add(self.out) == Some(self.copy)
    }

    /// Moves one copy from the shelf to the lent-out pile.
    pub fn take_out(&mut self) {
        self.on_shelf -= 1;
        self.out += 1;
    }

    /// Moves one copy from the lent-out pile back to the shelf.
    pub fn put_back(&mut self) {
        self.on_shelf += 1;
        self.out -= 1;
    }
}

/// Normalized catalog record.
///
/// Bibliographic fields are optional because the remote catalog leaves
/// most of them blank for older acquisitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: BookId,
    pub image: BookImage,
    pub title: Option<String>,
    pub responsibility: Option<String>,
    pub uniform_title: Option<String>,
    pub parallel_title: Option<String>,
    pub main_author: Option<String>,
    pub other_author: Option<String>,
    pub contributors: Option<String>,
    pub corp_author: Option<String>,
    pub place_published: Option<String>,
    pub publisher: Option<String>,
    pub year_published: Option<String>,
    pub edition: Option<String>,
    pub pages: Option<String>,
    pub other_details: Option<String>,
    pub dimension: Option<String>,
    pub accompanying_materials: Option<String>,
    pub series: Option<String>,
    pub general_notes: Option<String>,
    pub isbn: Option<String>,
    pub call_number: Option<String>,
    pub accession: Option<String>,
    pub language: Option<String>,
    pub location: Option<String>,
    pub electronic_access: Option<String>,
    pub date_updated: Option<String>,
    pub date_entered: Option<String>,
    pub categories: CategoryFlags,
    pub subjects: Vec<String>,
    pub counters: Counters,
}

impl BookRecord {
    /// Creates a record with only identity, title and counters populated.
    ///
    /// Used by tests and by callers that seed a catalog without a transport.
    pub fn new(
        id: impl Into<BookId>,
        title: Option<String>,
        counters: Counters,
        image: BookImage,
    ) -> Self {
        Self {
            id: id.into(),
            image,
            title,
            responsibility: None,
            uniform_title: None,
            parallel_title: None,
            main_author: None,
            other_author: None,
            contributors: None,
            corp_author: None,
            place_published: None,
            publisher: None,
            year_published: None,
            edition: None,
            pages: None,
            other_details: None,
            dimension: None,
            accompanying_materials: None,
            series: None,
            general_notes: None,
            isbn: None,
            call_number: None,
            accession: None,
            language: None,
            location: None,
            electronic_access: None,
            date_updated: None,
            date_entered: None,
            categories: CategoryFlags::default(),
            subjects: Vec::new(),
            counters,
        }
    }

    /// Returns whether at least one copy can be lent right now.
    pub fn is_available(&self) -> bool {
        self.counters.on_shelf > 0
    }

    pub fn has_subject(&self, subject: &str) -> bool {
        self.subjects
            .iter()
            .any(|value| value.trim().eq_ignore_ascii_case(subject.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, CategoryFlags, Counters};

    #[test]
    fn take_out_and_put_back_keep_balance() {
        let mut counters = Counters::new(3, 2, 1);
        counters.take_out();
        assert_eq!(counters, Counters::new(3, 1, 2));
        assert!(counters.is_balanced());
        counters.put_back();
        assert_eq!(counters, Counters::new(3, 2, 1));
    }

    #[test]
    fn unbalanced_counters_are_detected() {
        assert!(!Counters::new(5, 2, 1).is_balanced());
        assert!(!Counters::new(i64::MAX, i64::MAX, 1).is_balanced());
    }

    #[test]
    fn category_flags_set_and_contains_agree() {
        let mut flags = CategoryFlags::default();
        for category in Category::ALL {
            assert!(!flags.contains(category));
            flags.set(category, true);
            assert!(flags.contains(category));
        }
    }
}
