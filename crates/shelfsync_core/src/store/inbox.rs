//! Notification inbox container.
//!
//! # Responsibility
//! - Mirror the user's notification list and the service `success` flag.
//! - Partition notifications into today / prior views by local calendar day.
//! - Publish `InboxEvent`s for UI acknowledgments.
//!
//! # Invariants
//! - Loads replace the whole inbox; they never merge.
//! - `today_notifications` and `prior_notifications` are disjoint and keep
//!   insertion order unless `sort_by_delivery_status` is enabled.
//! - `empty_out` supersedes any load still in flight.

use crate::clock::{local_date_of, Clock, SystemClock};
use crate::config::CacheConfig;
use crate::model::notification::{DeliveryStatus, NotificationRecord};
use crate::store::events::InboxEvent;
use crate::store::{LoadGeneration, LoadOutcome, StoreError, StoreResult};
use crate::transport::NotificationSource;
use log::{debug, error, info};
use std::cell::RefCell;
use std::future::Future;
use std::sync::Arc;
use time::{Date, OffsetDateTime};
use tokio::sync::broadcast;

/// Immutable inbox contents at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboxState {
    notifications: Vec<NotificationRecord>,
    success: bool,
}

impl InboxState {
    pub fn new(notifications: Vec<NotificationRecord>, success: bool) -> Self {
        Self {
            notifications,
            success,
        }
    }

    pub fn notifications(&self) -> &[NotificationRecord] {
        &self.notifications
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn unseen_count(&self) -> usize {
        self.notifications
            .iter()
            .filter(|record| !record.is_seen())
            .count()
    }

    /// Records created on `now`'s calendar day.
    pub fn today(&self, now: OffsetDateTime) -> Vec<&NotificationRecord> {
        let today = now.date();
        self.filter_by_day(now, |day| day == today)
    }

    /// Records created strictly before `now`'s calendar day.
    pub fn prior(&self, now: OffsetDateTime) -> Vec<&NotificationRecord> {
        let today = now.date();
        self.filter_by_day(now, |day| day < today)
    }

    fn filter_by_day(
        &self,
        now: OffsetDateTime,
        keep: impl Fn(Date) -> bool,
    ) -> Vec<&NotificationRecord> {
        self.notifications
            .iter()
            .filter(|record| creation_day(record, now).is_some_and(&keep))
            .collect()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.notifications.iter().position(|record| record.has_id(id))
    }
}

/// Creation day in `now`'s offset. A record without timestamp counts as now.
fn creation_day(record: &NotificationRecord, now: OffsetDateTime) -> Option<Date> {
    match record.created_at.as_deref() {
        Some(raw) => local_date_of(raw, now.offset()),
        None => Some(now.date()),
    }
}

/// Single-owner notification mirror.
pub struct NotificationInbox {
    state: RefCell<Arc<InboxState>>,
    generation: LoadGeneration,
    clock: Arc<dyn Clock>,
    events: broadcast::Sender<InboxEvent>,
    config: CacheConfig,
}

impl NotificationInbox {
    /// Creates an empty inbox on the host clock.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            state: RefCell::new(Arc::new(InboxState::default())),
            generation: LoadGeneration::default(),
            clock,
            events,
            config,
        }
    }

    /// Subscribes to inbox events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<InboxEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> Arc<InboxState> {
        Arc::clone(&self.state.borrow())
    }

    pub fn notifications(&self) -> Vec<NotificationRecord> {
        self.snapshot().notifications().to_vec()
    }

    pub fn success(&self) -> bool {
        self.snapshot().success()
    }

    pub fn unseen_count(&self) -> usize {
        self.snapshot().unseen_count()
    }

    pub fn today_notifications(&self) -> Vec<NotificationRecord> {
        let now = self.clock.now();
        let snapshot = self.snapshot();
        self.arrange(snapshot.today(now))
    }

    pub fn prior_notifications(&self) -> Vec<NotificationRecord> {
        let now = self.clock.now();
        let snapshot = self.snapshot();
        self.arrange(snapshot.prior(now))
    }

    /// Marks one notification as seen and emits `InboxEvent::MarkedSeen`.
    ///
    /// # Errors
    /// - `StoreError::NotificationNotFound` when no record has `id`; no
    ///   record is changed and no event is emitted.
    pub fn mark_as_seen(&self, id: &str) -> StoreResult<()> {
        {
            let mut guard = self.state.borrow_mut();
            let index = guard
                .position(id)
                .ok_or_else(|| StoreError::NotificationNotFound(id.to_string()))?;
            Arc::make_mut(&mut guard).notifications[index].delivery_status =
                Some(DeliveryStatus::Seen);
        }

        info!("event=mark_seen module=inbox status=ok notification_id={id}");
        self.emit(InboxEvent::MarkedSeen { id: id.to_string() });
        Ok(())
    }

    /// Clears the inbox and resets `success` to `false`.
    pub fn empty_out(&self) {
        let generation = self.generation.begin();
        *self.state.borrow_mut() = Arc::new(InboxState::default());
        info!("event=empty_out module=inbox status=ok generation={generation}");
        self.emit(InboxEvent::Emptied);
    }

    /// Fetches the inbox from `source` and replaces the whole state with it.
    ///
    /// An empty response keeps the current state. Failures are logged only.
    /// A result is dropped if another load or `empty_out` started after this
    /// call.
    pub fn bulk_load<'a, S: NotificationSource + 'a>(
        &'a self,
        source: &'a S,
    ) -> impl Future<Output = LoadOutcome> + 'a {
        let generation = self.generation.begin();
        debug!("event=inbox_load module=inbox status=started generation={generation}");

        async move {
            let fetched = source.fetch_notification_snapshot().await;
            if !self.generation.is_current(generation) {
                let latest = self.generation.latest();
                info!(
                    "event=inbox_load module=inbox status=superseded generation={} latest={}",
                    generation, latest
                );
                return LoadOutcome::Superseded { generation, latest };
            }

            match fetched {
                Ok(Some(snapshot)) => {
                    let state = InboxState::new(
                        snapshot
                            .notifications
                            .into_iter()
                            .map(NotificationRecord::from)
                            .collect(),
                        snapshot.success,
                    );
                    let records = state.notifications.len();
                    let success = state.success;
                    *self.state.borrow_mut() = Arc::new(state);
                    info!(
                        "event=inbox_load module=inbox status=ok generation={} notifications={} success={}",
                        generation, records, success
                    );
                    self.emit(InboxEvent::Loaded {
                        count: records,
                        success,
                    });
                    LoadOutcome::Installed {
                        generation,
                        records,
                    }
                }
                Ok(None) => {
                    debug!("event=inbox_load module=inbox status=empty generation={generation}");
                    LoadOutcome::Empty { generation }
                }
                Err(err) => {
                    error!(
                        "event=inbox_load module=inbox status=error generation={} error={}",
                        generation, err
                    );
                    LoadOutcome::Failed { generation }
                }
            }
        }
    }

    fn arrange(&self, records: Vec<&NotificationRecord>) -> Vec<NotificationRecord> {
        let mut owned: Vec<NotificationRecord> = records.into_iter().cloned().collect();
        if self.config.sort_by_delivery_status {
            owned.sort_by_key(NotificationRecord::status_rank);
        }
        owned
    }

    fn emit(&self, event: InboxEvent) {
        if self.events.send(event).is_err() {
            debug!("event=inbox_event module=inbox status=no_subscribers");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{creation_day, InboxState};
    use crate::model::notification::NotificationRecord;
    use time::macros::{date, datetime};

    fn at(created_at: Option<&str>) -> NotificationRecord {
        NotificationRecord {
            created_at: created_at.map(str::to_string),
            ..NotificationRecord::default()
        }
    }

    #[test]
    fn missing_timestamp_counts_as_today() {
        let now = datetime!(2024-05-10 09:00 +8);
        assert_eq!(creation_day(&at(None), now), Some(date!(2024 - 05 - 10)));
    }

    #[test]
    fn unparseable_timestamp_is_in_neither_view() {
        let now = datetime!(2024-05-10 09:00 +8);
        let state = InboxState::new(vec![at(Some("not a date"))], true);
        assert!(state.today(now).is_empty());
        assert!(state.prior(now).is_empty());
    }

    #[test]
    fn future_timestamp_is_in_neither_view() {
        let now = datetime!(2024-05-10 09:00 +8);
        let state = InboxState::new(vec![at(Some("2024-05-11T09:00:00+08:00"))], true);
        assert!(state.today(now).is_empty());
        assert!(state.prior(now).is_empty());
    }
}
