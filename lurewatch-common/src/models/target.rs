use diesel::{Insertable, Queryable, QueryableByName};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

use crate::schema::targets;

/// Sentinel display name for targets registered without one.
pub const UNKNOWN_TARGET_NAME: &str = "UNKNOWN";

#[derive(Debug, Serialize, Deserialize, Queryable, QueryableByName)]
#[diesel(table_name = targets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Target {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub created_timestamp: SystemTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = targets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewTarget<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub created_timestamp: SystemTime,
}
