use diesel::{dsl, BoolExpressionMethods, ExpressionMethods, OptionalExtension, QueryDsl};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use std::time::SystemTime;
use uuid::Uuid;

use crate::db::{DaoError, DbAsyncPool};
use crate::models::campaign::{Campaign, NewCampaign};
use crate::models::delivery::{Delivery, NewDelivery, SendStatus};

use crate::schema::campaigns as campaign_fields;
use crate::schema::campaigns::dsl::campaigns;
use crate::schema::deliveries as delivery_fields;
use crate::schema::deliveries::dsl::deliveries;

/// Owner context for a delivery whose interaction flag was just flipped.
/// Only produced on the first flip; re-flips match no rows.
pub struct InteractedDelivery {
    pub user_id: Uuid,
    pub campaign_id: Uuid,
    pub target_name: String,
    pub target_email: String,
}

pub struct Dao {
    db_async_pool: DbAsyncPool,
}

impl Dao {
    pub fn new(db_async_pool: &DbAsyncPool) -> Self {
        Self {
            db_async_pool: db_async_pool.clone(),
        }
    }

    pub async fn create_campaign(
        &self,
        user_id: Uuid,
        category: &str,
        template: &str,
        status: &str,
    ) -> Result<Campaign, DaoError> {
        let mut conn = self.db_async_pool.get().await?;

        let new_campaign = NewCampaign {
            id: Uuid::now_v7(),
            user_id,
            category,
            template,
            status,
            created_timestamp: SystemTime::now(),
        };

        Ok(dsl::insert_into(campaigns)
            .values(&new_campaign)
            .get_result::<Campaign>(&mut conn)
            .await?)
    }

    pub async fn get_campaigns(&self, user_id: Uuid) -> Result<Vec<Campaign>, DaoError> {
        let mut conn = self.db_async_pool.get().await?;

        Ok(campaigns
            .filter(campaign_fields::user_id.eq(user_id))
            .order(campaign_fields::created_timestamp.desc())
            .get_results::<Campaign>(&mut conn)
            .await?)
    }

    /// Deletes the campaign and all of its deliveries in one transaction.
    /// Returns the number of campaign rows removed (0 when the id did not
    /// belong to the user).
    pub async fn delete_campaign(&self, campaign_id: Uuid, user_id: Uuid) -> Result<usize, DaoError> {
        let mut conn = self.db_async_pool.get().await?;

        let affected = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    diesel::delete(
                        deliveries.filter(
                            delivery_fields::campaign_id
                                .eq(campaign_id)
                                .and(delivery_fields::user_id.eq(user_id)),
                        ),
                    )
                    .execute(conn)
                    .await?;

                    diesel::delete(
                        campaigns.filter(
                            campaign_fields::id
                                .eq(campaign_id)
                                .and(campaign_fields::user_id.eq(user_id)),
                        ),
                    )
                    .execute(conn)
                    .await
                }
                .scope_boxed()
            })
            .await?;

        Ok(affected)
    }

    pub async fn create_delivery(
        &self,
        campaign_id: Uuid,
        user_id: Uuid,
        target_name: &str,
        target_email: &str,
    ) -> Result<Delivery, DaoError> {
        let mut conn = self.db_async_pool.get().await?;

        let new_delivery = NewDelivery {
            id: Uuid::now_v7(),
            campaign_id,
            user_id,
            target_name,
            target_email,
            interacted: false,
            send_status: SendStatus::Pending.as_str(),
            created_timestamp: SystemTime::now(),
        };

        Ok(dsl::insert_into(deliveries)
            .values(&new_delivery)
            .get_result::<Delivery>(&mut conn)
            .await?)
    }

    pub async fn set_delivery_send_status(
        &self,
        delivery_id: Uuid,
        status: SendStatus,
    ) -> Result<(), DaoError> {
        let mut conn = self.db_async_pool.get().await?;

        dsl::update(deliveries.filter(delivery_fields::id.eq(delivery_id)))
            .set(delivery_fields::send_status.eq(status.as_str()))
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    /// Flips the interaction flag, but only false -> true. Returns `None`
    /// when the id is unknown or the flag was already set, so callers cannot
    /// distinguish the two cases and repeat invocations are harmless.
    pub async fn mark_delivery_interacted(
        &self,
        delivery_id: Uuid,
    ) -> Result<Option<InteractedDelivery>, DaoError> {
        let mut conn = self.db_async_pool.get().await?;

        let flipped = dsl::update(
            deliveries.filter(
                delivery_fields::id
                    .eq(delivery_id)
                    .and(delivery_fields::interacted.eq(false)),
            ),
        )
        .set(delivery_fields::interacted.eq(true))
        .returning((
            delivery_fields::user_id,
            delivery_fields::campaign_id,
            delivery_fields::target_name,
            delivery_fields::target_email,
        ))
        .get_result::<(Uuid, Uuid, String, String)>(&mut conn)
        .await
        .optional()?;

        Ok(flipped.map(
            |(user_id, campaign_id, target_name, target_email)| InteractedDelivery {
                user_id,
                campaign_id,
                target_name,
                target_email,
            },
        ))
    }

    pub async fn get_deliveries(
        &self,
        campaign_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<Delivery>, DaoError> {
        let mut conn = self.db_async_pool.get().await?;

        Ok(deliveries
            .filter(
                delivery_fields::campaign_id
                    .eq(campaign_id)
                    .and(delivery_fields::user_id.eq(user_id)),
            )
            .order(delivery_fields::created_timestamp.desc())
            .get_results::<Delivery>(&mut conn)
            .await?)
    }

    pub async fn count_campaigns(&self, user_id: Uuid) -> Result<i64, DaoError> {
        let mut conn = self.db_async_pool.get().await?;

        Ok(campaigns
            .filter(campaign_fields::user_id.eq(user_id))
            .count()
            .get_result::<i64>(&mut conn)
            .await?)
    }

    pub async fn count_interactions(&self, user_id: Uuid) -> Result<i64, DaoError> {
        let mut conn = self.db_async_pool.get().await?;

        Ok(deliveries
            .filter(
                delivery_fields::user_id
                    .eq(user_id)
                    .and(delivery_fields::interacted.eq(true)),
            )
            .count()
            .get_result::<i64>(&mut conn)
            .await?)
    }
}
