use diesel::{Insertable, Queryable, QueryableByName};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

use crate::schema::campaigns;

/// The only category the engine currently creates. The column exists so other
/// attack categories (SMS, voice) can share the same tables later.
pub const CATEGORY_EMAIL_ATTACK: &str = "EMAIL_ATTACK";

/// Campaigns are created `ACTIVE` and the engine drives no further status
/// transitions.
pub const STATUS_ACTIVE: &str = "ACTIVE";

#[derive(Debug, Serialize, Deserialize, Queryable, QueryableByName)]
#[diesel(table_name = campaigns)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Campaign {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: String,
    /// Always a concrete catalog id; the RANDOM pseudo-mode is resolved
    /// before this row is written.
    pub template: String,
    pub status: String,
    pub created_timestamp: SystemTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = campaigns)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewCampaign<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: &'a str,
    pub template: &'a str,
    pub status: &'a str,
    pub created_timestamp: SystemTime,
}
