use diesel::{dsl, BoolExpressionMethods, ExpressionMethods, QueryDsl};
use diesel_async::RunQueryDsl;
use std::time::SystemTime;
use uuid::Uuid;

use crate::db::{DaoError, DbAsyncPool};
use crate::models::target::{NewTarget, Target};

use crate::schema::targets as target_fields;
use crate::schema::targets::dsl::targets;

pub struct Dao {
    db_async_pool: DbAsyncPool,
}

impl Dao {
    pub fn new(db_async_pool: &DbAsyncPool) -> Self {
        Self {
            db_async_pool: db_async_pool.clone(),
        }
    }

    pub async fn create_target(
        &self,
        user_id: Uuid,
        name: &str,
        email: &str,
    ) -> Result<Target, DaoError> {
        let mut conn = self.db_async_pool.get().await?;

        let new_target = NewTarget {
            id: Uuid::now_v7(),
            user_id,
            name,
            email,
            created_timestamp: SystemTime::now(),
        };

        Ok(dsl::insert_into(targets)
            .values(&new_target)
            .get_result::<Target>(&mut conn)
            .await?)
    }

    pub async fn get_targets(&self, user_id: Uuid) -> Result<Vec<Target>, DaoError> {
        let mut conn = self.db_async_pool.get().await?;

        Ok(targets
            .filter(target_fields::user_id.eq(user_id))
            .order(target_fields::created_timestamp.desc())
            .get_results::<Target>(&mut conn)
            .await?)
    }

    pub async fn delete_target(&self, target_id: Uuid, user_id: Uuid) -> Result<usize, DaoError> {
        let mut conn = self.db_async_pool.get().await?;

        Ok(diesel::delete(
            targets.filter(
                target_fields::id
                    .eq(target_id)
                    .and(target_fields::user_id.eq(user_id)),
            ),
        )
        .execute(&mut conn)
        .await?)
    }

    pub async fn count_targets(&self, user_id: Uuid) -> Result<i64, DaoError> {
        let mut conn = self.db_async_pool.get().await?;

        Ok(targets
            .filter(target_fields::user_id.eq(user_id))
            .count()
            .get_result::<i64>(&mut conn)
            .await?)
    }
}
