//! Notification domain model.
//!
//! # Responsibility
//! - Define the in-memory shape of one inbox notification.
//! - Keep wire enum spellings (`Approve`, `Delivered`, ...) stable.
//!
//! # Invariants
//! - `id` may be absent for transient notifications; such records can never
//!   be targeted by id-based actions.
//! - `created_at` is kept as the raw ISO-8601 string; day classification is
//!   done by the inbox against its clock.

use serde::{Deserialize, Serialize};

/// Reason a notification was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    Approve,
    Decline,
    Penalty,
    Others,
}

/// Delivery lifecycle of one notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Delivered,
    Seen,
}

/// Inbox record mirrored from the notification service.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: Option<String>,
    pub sender: Option<String>,
    pub receiver: Option<String>,
    pub kind: Option<NotificationKind>,
    pub title: Option<String>,
    pub text: Option<String>,
    /// ISO-8601 creation timestamp as sent by the service.
    pub created_at: Option<String>,
    pub delivery_status: Option<DeliveryStatus>,
}

impl NotificationRecord {
    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }

    pub fn is_seen(&self) -> bool {
        self.delivery_status == Some(DeliveryStatus::Seen)
    }

    /// Ordering rank used by the optional delivery-status sort.
    pub(crate) fn status_rank(&self) -> u8 {
        match self.delivery_status {
            Some(DeliveryStatus::Delivered) => 0,
            Some(DeliveryStatus::Seen) => 1,
            None => 2,
        }
    }
}
