//! CLI smoke entry point.
//!
//! # Responsibility
//! - Load catalog/inbox snapshot files through the core containers.
//! - Print view counts so local fixtures can be sanity-checked quickly.
//!
//! Usage: `shelfsync_cli <catalog.json> [notifications.json]`.
//! Set `SHELFSYNC_LOG_DIR` to an absolute path to enable file logging.

use log::info;
use shelfsync_core::{
    default_log_level, init_logging, BookCatalog, CacheConfig, CatalogSnapshotTransport,
    CatalogSource, NotificationInbox, NotificationSnapshotTransport, NotificationSource,
    TransportError, TransportResult,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Snapshot source backed by a JSON file.
struct FileSource(PathBuf);

impl FileSource {
    fn read(&self) -> TransportResult<Vec<u8>> {
        std::fs::read(&self.0).map_err(|err| {
            TransportError::Network(format!("cannot read `{}`: {err}", self.0.display()))
        })
    }
}

impl CatalogSource for FileSource {
    async fn fetch_book_catalog(&self) -> TransportResult<CatalogSnapshotTransport> {
        Ok(serde_json::from_slice(&self.read()?)?)
    }
}

impl NotificationSource for FileSource {
    async fn fetch_notification_snapshot(
        &self,
    ) -> TransportResult<Option<NotificationSnapshotTransport>> {
        Ok(Some(serde_json::from_slice(&self.read()?)?))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(catalog_path) = args.first() else {
        eprintln!("usage: shelfsync_cli <catalog.json> [notifications.json]");
        return ExitCode::from(2);
    };

    if let Ok(log_dir) = std::env::var("SHELFSYNC_LOG_DIR") {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let catalog = BookCatalog::new(CacheConfig::default());
    let outcome = catalog
        .bulk_load(&FileSource(Path::new(catalog_path).to_path_buf()))
        .await;
    info!("event=cli_catalog_load module=cli outcome={outcome:?}");

    let snapshot = catalog.snapshot();
    let available = snapshot
        .books()
        .iter()
        .filter(|book| book.is_available())
        .count();
    println!(
        "catalog books={} subjects={} available={}",
        snapshot.books().len(),
        snapshot.subjects().len(),
        available
    );

    if let Some(inbox_path) = args.get(1) {
        let inbox = NotificationInbox::new(CacheConfig::default());
        let outcome = inbox
            .bulk_load(&FileSource(PathBuf::from(inbox_path)))
            .await;
        info!("event=cli_inbox_load module=cli outcome={outcome:?}");
        println!(
            "inbox today={} prior={} unseen={}",
            inbox.today_notifications().len(),
            inbox.prior_notifications().len(),
            inbox.unseen_count()
        );
    }

    if outcome.is_installed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
