use diesel::{dsl, ExpressionMethods, OptionalExtension, QueryDsl};
use diesel_async::RunQueryDsl;
use std::time::SystemTime;
use uuid::Uuid;

use crate::db::{DaoError, DbAsyncPool};
use crate::models::user_settings::{NewUserSettings, UserSettings};

use crate::schema::user_settings as user_settings_fields;
use crate::schema::user_settings::dsl::user_settings;

pub struct Dao {
    db_async_pool: DbAsyncPool,
}

impl Dao {
    pub fn new(db_async_pool: &DbAsyncPool) -> Self {
        Self {
            db_async_pool: db_async_pool.clone(),
        }
    }

    pub async fn get_settings(&self, user_id: Uuid) -> Result<Option<UserSettings>, DaoError> {
        let mut conn = self.db_async_pool.get().await?;

        Ok(user_settings
            .find(user_id)
            .get_result::<UserSettings>(&mut conn)
            .await
            .optional()?)
    }

    pub async fn upsert_settings(
        &self,
        user_id: Uuid,
        company_name: &str,
        default_template: &str,
        sender_address: Option<&str>,
        sender_secret: Option<&str>,
    ) -> Result<UserSettings, DaoError> {
        let mut conn = self.db_async_pool.get().await?;

        let now = SystemTime::now();
        let new_settings = NewUserSettings {
            user_id,
            company_name,
            default_template,
            sender_address,
            sender_secret,
            updated_timestamp: now,
        };

        Ok(dsl::insert_into(user_settings)
            .values(&new_settings)
            .on_conflict(user_settings_fields::user_id)
            .do_update()
            .set((
                user_settings_fields::company_name.eq(company_name),
                user_settings_fields::default_template.eq(default_template),
                user_settings_fields::sender_address.eq(sender_address),
                user_settings_fields::sender_secret.eq(sender_secret),
                user_settings_fields::updated_timestamp.eq(now),
            ))
            .get_result::<UserSettings>(&mut conn)
            .await?)
    }
}
