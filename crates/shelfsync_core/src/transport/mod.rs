//! Fetch collaborator contracts and wire-level record shapes.
//!
//! # Responsibility
//! - Define the async sources the containers pull snapshots from.
//! - Decode wire records with the service's field names and normalize them
//!   into `model` types.
//!
//! # Invariants
//! - HTTP, auth and retries live behind `CatalogSource` and
//!   `NotificationSource`; this crate never performs network I/O itself.
//! - Normalization never mutates container state; it either yields a full
//!   record list or fails as a whole.

pub mod book_wire;
pub mod notification_wire;

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;

pub use book_wire::{BookImageTransport, BookRecordTransport, CatalogSnapshotTransport};
pub use notification_wire::{NotificationRecordTransport, NotificationSnapshotTransport};

pub type TransportResult<T> = Result<T, TransportError>;

/// Failure while fetching or normalizing a remote snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request did not complete (connectivity, HTTP status, auth).
    Network(String),
    /// The response body could not be decoded into transport records.
    Decode(String),
    /// A counter field is not an integer and the policy rejects it.
    MalformedCounter {
        book_id: String,
        field: &'static str,
        raw: String,
    },
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(message) => write!(f, "network failure: {message}"),
            Self::Decode(message) => write!(f, "decode failure: {message}"),
            Self::MalformedCounter {
                book_id,
                field,
                raw,
            } => write!(f, "book {book_id}: counter `{field}` is not an integer: {raw}"),
        }
    }
}

impl Error for TransportError {}

impl From<serde_json::Error> for TransportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}

/// Remote catalog endpoint.
pub trait CatalogSource {
    /// Fetches the full catalog: every book plus the subject list.
    fn fetch_book_catalog(&self) -> impl Future<Output = TransportResult<CatalogSnapshotTransport>>;
}

/// Remote notification endpoint.
pub trait NotificationSource {
    /// Fetches the user's inbox. `Ok(None)` means the service sent no body.
    fn fetch_notification_snapshot(
        &self,
    ) -> impl Future<Output = TransportResult<Option<NotificationSnapshotTransport>>>;
}
