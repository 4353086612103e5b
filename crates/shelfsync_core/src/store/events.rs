//! Inbox domain events for UI subscribers.

/// Emitted by `NotificationInbox` after a state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboxEvent {
    /// A bulk load installed a new snapshot.
    Loaded { count: usize, success: bool },
    /// A notification was marked as seen; the UI acknowledges this to the user.
    MarkedSeen { id: String },
    /// The inbox was cleared (sign-out or invalidation).
    Emptied,
}
