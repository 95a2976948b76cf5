//! Notification Entity
//!
//! In-app notifications cached from the remote feed. Delivery itself
//! (push) happens outside this crate; a tap hands back the kind and
//! reference ID so the shell can route to the referenced record.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use super::entity::Entity;

/// What a notification refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    OutingInvite,
    DebtReminder,
    EventUpdate,
    PaymentReceived,
    #[default]
    Other,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::OutingInvite => "outing_invite",
            NotificationKind::DebtReminder => "debt_reminder",
            NotificationKind::EventUpdate => "event_update",
            NotificationKind::PaymentReceived => "payment_received",
            NotificationKind::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "outing_invite" => NotificationKind::OutingInvite,
            "debt_reminder" => NotificationKind::DebtReminder,
            "event_update" => NotificationKind::EventUpdate,
            "payment_received" => NotificationKind::PaymentReceived,
            _ => NotificationKind::Other,
        }
    }
}

/// A cached notification row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// ID of the outing, event or debt this notification points at
    pub reference_id: String,
    pub sent_at: i64,
    pub read_at: Option<i64>,
}

impl Notification {
    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }

    pub fn sent_at_time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.sent_at).single()
    }
}

impl Entity for Notification {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }
}
