//! Client-side state cache for the library app.
//! This crate owns the catalog and inbox mirrors and their invariants.

pub mod clock;
pub mod config;
pub mod logging;
pub mod model;
pub mod store;
pub mod transport;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{CacheConfig, ConfigError, CounterPolicy, MalformedCounterPolicy};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::book::{BookId, BookImage, BookRecord, Category, CategoryFlags, Counters};
pub use model::notification::{DeliveryStatus, NotificationKind, NotificationRecord};
pub use store::catalog::{BookCatalog, CatalogState, CounterChange};
pub use store::events::InboxEvent;
pub use store::inbox::{InboxState, NotificationInbox};
pub use store::{LoadOutcome, StoreError, StoreResult};
pub use transport::{
    BookRecordTransport, CatalogSnapshotTransport, CatalogSource, NotificationRecordTransport,
    NotificationSnapshotTransport, NotificationSource, TransportError, TransportResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
