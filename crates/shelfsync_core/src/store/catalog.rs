//! Book catalog container.
//!
//! # Responsibility
//! - Mirror the remote catalog and subject list.
//! - Serve lookup/search views and optimistic borrow/return counters.
//!
//! # Invariants
//! - `all_books` keeps snapshot order.
//! - A borrow/return pair leaves `on_shelf + out` unchanged.
//! - Under `CounterPolicy::Clamp` no action drives a counter below zero.

use crate::config::{CacheConfig, CounterPolicy};
use crate::model::book::{BookRecord, Category, Counters};
use crate::store::{LoadGeneration, LoadOutcome, StoreError, StoreResult};
use crate::transport::{CatalogSnapshotTransport, CatalogSource, TransportResult};
use log::{debug, error, info, warn};
use std::cell::RefCell;
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

/// Immutable catalog contents at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogState {
    books: Vec<BookRecord>,
    subjects: Vec<String>,
}

impl CatalogState {
    pub fn new(books: Vec<BookRecord>, subjects: Vec<String>) -> Self {
        Self { books, subjects }
    }

    pub fn books(&self) -> &[BookRecord] {
        &self.books
    }

    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    /// Returns the first record with `id`.
    pub fn find(&self, id: &str) -> Option<&BookRecord> {
        self.books.iter().find(|book| book.id == id)
    }

    /// Case-insensitive title substring search. Untitled records never match.
    pub fn search_title(&self, query: &str) -> Vec<&BookRecord> {
        let needle = query.to_lowercase();
        self.books
            .iter()
            .filter(|book| {
                book.title
                    .as_deref()
                    .is_some_and(|title| title.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn in_category(&self, category: Category) -> Vec<&BookRecord> {
        self.books
            .iter()
            .filter(|book| book.categories.contains(category))
            .collect()
    }

    pub fn with_subject(&self, subject: &str) -> Vec<&BookRecord> {
        self.books
            .iter()
            .filter(|book| book.has_subject(subject))
            .collect()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.books.iter().position(|book| book.id == id)
    }
}

/// Counter values around one borrow/return action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterChange {
    pub before: Counters,
    pub after: Counters,
    /// `false` when the clamp policy refused the change.
    pub applied: bool,
}

#[derive(Debug, Clone, Copy)]
enum CounterAction {
    TakeOut,
    PutBack,
}

impl CounterAction {
    fn name(self) -> &'static str {
        match self {
            Self::TakeOut => "takeout_one",
            Self::PutBack => "return_out_one",
        }
    }

    /// Value of the counter this action decrements.
    fn decremented(self, counters: &Counters) -> i64 {
        match self {
            Self::TakeOut => counters.on_shelf,
            Self::PutBack => counters.out,
        }
    }

    fn apply(self, counters: &mut Counters) {
        match self {
            Self::TakeOut => counters.take_out(),
            Self::PutBack => counters.put_back(),
        }
    }
}

/// Single-owner catalog mirror.
pub struct BookCatalog {
    state: RefCell<Arc<CatalogState>>,
    generation: LoadGeneration,
    config: CacheConfig,
}

impl BookCatalog {
    pub fn new(config: CacheConfig) -> Self {
        Self::with_state(config, CatalogState::default())
    }

    /// Creates a catalog pre-seeded with `state`.
    pub fn with_state(config: CacheConfig, state: CatalogState) -> Self {
        Self {
            state: RefCell::new(Arc::new(state)),
            generation: LoadGeneration::default(),
            config,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns the current immutable state.
    ///
    /// The handle stays valid and unchanged across later loads and actions.
    pub fn snapshot(&self) -> Arc<CatalogState> {
        Arc::clone(&self.state.borrow())
    }

    pub fn all_books(&self) -> Vec<BookRecord> {
        self.snapshot().books().to_vec()
    }

    pub fn all_subjects(&self) -> Vec<String> {
        self.snapshot().subjects().to_vec()
    }

    pub fn search_for_title(&self, query: &str) -> Vec<BookRecord> {
        self.snapshot()
            .search_title(query)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Detail-view lookup. A miss is `None`, never an error.
    pub fn book_details(&self, id: &str) -> Option<BookRecord> {
        self.snapshot().find(id).cloned()
    }

    pub fn books_in_category(&self, category: Category) -> Vec<BookRecord> {
        self.snapshot()
            .in_category(category)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn books_with_subject(&self, subject: &str) -> Vec<BookRecord> {
        self.snapshot()
            .with_subject(subject)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Records one borrowed copy: `on_shelf - 1`, `out + 1`.
    ///
    /// # Errors
    /// - `StoreError::BookNotFound` when no record has `id`.
    pub fn takeout_one(&self, id: &str) -> StoreResult<CounterChange> {
        self.adjust(id, CounterAction::TakeOut)
    }

    /// Records one returned copy: `on_shelf + 1`, `out - 1`.
    ///
    /// # Errors
    /// - `StoreError::BookNotFound` when no record has `id`.
    pub fn return_out_one(&self, id: &str) -> StoreResult<CounterChange> {
        self.adjust(id, CounterAction::PutBack)
    }

    /// Fetches the full catalog from `source` and installs it.
    ///
    /// The load's generation is taken when this method is called, so if
    /// another load is started before this one resolves, this result is
    /// dropped. Failures are logged and leave the current state in place.
    pub fn bulk_load<'a, S: CatalogSource + 'a>(
        &'a self,
        source: &'a S,
    ) -> impl Future<Output = LoadOutcome> + 'a {
        let generation = self.generation.begin();
        debug!("event=catalog_load module=catalog status=started generation={generation}");

        async move {
            let fetched = source.fetch_book_catalog().await;
            if !self.generation.is_current(generation) {
                let latest = self.generation.latest();
                info!(
                    "event=catalog_load module=catalog status=superseded generation={} latest={}",
                    generation, latest
                );
                return LoadOutcome::Superseded { generation, latest };
            }

            match fetched.and_then(|snapshot| self.normalize(snapshot)) {
                Ok(state) => {
                    let records = state.books.len();
                    let subjects = state.subjects.len();
                    *self.state.borrow_mut() = Arc::new(state);
                    info!(
                        "event=catalog_load module=catalog status=ok generation={} books={} subjects={}",
                        generation, records, subjects
                    );
                    LoadOutcome::Installed {
                        generation,
                        records,
                    }
                }
                Err(err) => {
                    error!(
                        "event=catalog_load module=catalog status=error generation={} error={}",
                        generation, err
                    );
                    LoadOutcome::Failed { generation }
                }
            }
        }
    }

    fn normalize(&self, snapshot: CatalogSnapshotTransport) -> TransportResult<CatalogState> {
        let mut seen = HashSet::with_capacity(snapshot.books.len());
        let mut books = Vec::with_capacity(snapshot.books.len());

        for wire in snapshot.books {
            let record = wire.into_record(&self.config)?;
            if !seen.insert(record.id.clone()) {
                warn!(
                    "event=catalog_load module=catalog status=duplicate_id book_id={}",
                    record.id
                );
            }
            if !record.counters.is_balanced() {
                warn!(
                    "event=catalog_load module=catalog status=unbalanced book_id={} copy={} on_shelf={} out={}",
                    record.id, record.counters.copy, record.counters.on_shelf, record.counters.out
                );
            }
            books.push(record);
        }

        Ok(CatalogState::new(
            books,
            snapshot.subjects.unwrap_or_default(),
        ))
    }

    fn adjust(&self, id: &str, action: CounterAction) -> StoreResult<CounterChange> {
        let mut guard = self.state.borrow_mut();
        let index = guard
            .position(id)
            .ok_or_else(|| StoreError::BookNotFound(id.to_string()))?;

        let before = guard.books[index].counters;
        if action.decremented(&before) <= 0 {
            match self.config.counter_policy {
                CounterPolicy::Clamp => {
                    warn!(
                        "event={} module=catalog status=clamped book_id={} on_shelf={} out={}",
                        action.name(),
                        id,
                        before.on_shelf,
                        before.out
                    );
                    return Ok(CounterChange {
                        before,
                        after: before,
                        applied: false,
                    });
                }
                CounterPolicy::AllowNegative => {
                    warn!(
                        "event={} module=catalog status=negative book_id={} on_shelf={} out={}",
                        action.name(),
                        id,
                        before.on_shelf,
                        before.out
                    );
                }
            }
        }

        let record = &mut Arc::make_mut(&mut guard).books[index];
        action.apply(&mut record.counters);
        let after = record.counters;
        debug!(
            "event={} module=catalog status=ok book_id={} on_shelf={} out={}",
            action.name(),
            id,
            after.on_shelf,
            after.out
        );

        Ok(CounterChange {
            before,
            after,
            applied: true,
        })
    }
}
