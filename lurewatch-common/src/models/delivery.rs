use diesel::{Insertable, Queryable, QueryableByName};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

use crate::schema::deliveries;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendStatus {
    Pending,
    Sent,
    Failed,
}

impl SendStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SendStatus::Pending => "PENDING",
            SendStatus::Sent => "SENT",
            SendStatus::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for SendStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Queryable, QueryableByName)]
#[diesel(table_name = deliveries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Delivery {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub user_id: Uuid,
    /// Snapshot of the target at launch time. Later edits or deletions of
    /// the Target row must not alter historical deliveries.
    pub target_name: String,
    pub target_email: String,
    pub interacted: bool,
    pub send_status: String,
    pub created_timestamp: SystemTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = deliveries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDelivery<'a> {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub user_id: Uuid,
    pub target_name: &'a str,
    pub target_email: &'a str,
    pub interacted: bool,
    pub send_status: &'a str,
    pub created_timestamp: SystemTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_status_strings() {
        assert_eq!(SendStatus::Pending.as_str(), "PENDING");
        assert_eq!(SendStatus::Sent.as_str(), "SENT");
        assert_eq!(SendStatus::Failed.as_str(), "FAILED");
        assert_eq!(format!("{}", SendStatus::Sent), "SENT");
    }
}
