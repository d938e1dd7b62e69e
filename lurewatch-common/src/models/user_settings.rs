use diesel::{Insertable, Queryable, QueryableByName};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

use crate::schema::user_settings;

#[derive(Debug, Serialize, Deserialize, Queryable, QueryableByName)]
#[diesel(table_name = user_settings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserSettings {
    pub user_id: Uuid,
    pub company_name: String,
    pub default_template: String,
    pub sender_address: Option<String>,
    pub sender_secret: Option<String>,
    pub updated_timestamp: SystemTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = user_settings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewUserSettings<'a> {
    pub user_id: Uuid,
    pub company_name: &'a str,
    pub default_template: &'a str,
    pub sender_address: Option<&'a str>,
    pub sender_secret: Option<&'a str>,
    pub updated_timestamp: SystemTime,
}
