//! Notification wire records.

use crate::model::notification::{DeliveryStatus, NotificationKind, NotificationRecord};
use serde::Deserialize;

/// Inbox response: the full notification list plus the service flag.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationSnapshotTransport {
    #[serde(default)]
    pub notifications: Vec<NotificationRecordTransport>,
    #[serde(default)]
    pub success: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationRecordTransport {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub sender: Option<String>,
    pub receiver: Option<String>,
    #[serde(rename = "notificationType")]
    pub notification_type: Option<NotificationKind>,
    #[serde(rename = "notificationTitle")]
    pub notification_title: Option<String>,
    #[serde(rename = "notificationText")]
    pub notification_text: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(rename = "deliveryStatus")]
    pub delivery_status: Option<DeliveryStatus>,
}

impl From<NotificationRecordTransport> for NotificationRecord {
    fn from(value: NotificationRecordTransport) -> Self {
        Self {
            id: value.id,
            sender: value.sender,
            receiver: value.receiver,
            kind: value.notification_type,
            title: value.notification_title,
            text: value.notification_text,
            created_at: value.created_at,
            delivery_status: value.delivery_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NotificationSnapshotTransport;
    use crate::model::notification::{DeliveryStatus, NotificationKind, NotificationRecord};
    use serde_json::json;

    #[test]
    fn decodes_service_field_names() {
        let snapshot: NotificationSnapshotTransport = serde_json::from_value(json!({
            "success": true,
            "notifications": [{
                "_id": "n-1",
                "sender": "librarian",
                "receiver": "student-9",
                "notificationType": "Penalty",
                "notificationTitle": "Overdue",
                "notificationText": "Return Noli Me Tangere",
                "createdAt": "2024-05-01T08:00:00.000Z",
                "deliveryStatus": "Delivered",
                "__v": 0
            }]
        }))
        .expect("snapshot should decode");

        assert!(snapshot.success);
        let record = NotificationRecord::from(snapshot.notifications[0].clone());
        assert_eq!(record.id.as_deref(), Some("n-1"));
        assert_eq!(record.kind, Some(NotificationKind::Penalty));
        assert_eq!(record.delivery_status, Some(DeliveryStatus::Delivered));
        assert_eq!(record.text.as_deref(), Some("Return Noli Me Tangere"));
    }

    #[test]
    fn unknown_kind_fails_decoding() {
        let result = serde_json::from_value::<NotificationSnapshotTransport>(json!({
            "notifications": [{ "notificationType": "Reminder" }]
        }));
        assert!(result.is_err());
    }
}
