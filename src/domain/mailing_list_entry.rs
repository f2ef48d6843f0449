use chrono::{DateTime, Utc};
use uuid::Uuid;

/// One row of the mailing list.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MailingListEntry {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub subscribed: bool,
    pub created: DateTime<Utc>,
    pub unsubscribed_at: Option<DateTime<Utc>>,
}
