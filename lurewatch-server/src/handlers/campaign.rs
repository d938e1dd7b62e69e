use lurewatch_common::db::{self, DbAsyncPool};
use lurewatch_common::email::MailerFactoryHandle;
use lurewatch_common::events::{ChangeEvent, ChangeFeed, ChangeKind};
use lurewatch_common::messages::{
    CampaignList, CampaignMessage, DeliveryList, DeliveryMessage, LaunchCampaignRequest,
    LaunchReport,
};

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::dispatch::{self, LaunchError};
use crate::handlers::error::HttpErrorResponse;
use crate::middleware::auth::AuthorizedUser;

pub async fn launch(
    db_async_pool: web::Data<DbAsyncPool>,
    mailer_factory: web::Data<MailerFactoryHandle>,
    change_feed: web::Data<ChangeFeed>,
    user: AuthorizedUser,
    launch_req: web::Json<LaunchCampaignRequest>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let outcome = dispatch::launch(
        &db_async_pool,
        &mailer_factory,
        &change_feed,
        user.user_id,
        launch_req.mode,
        launch_req.sender_address.as_deref(),
    )
    .await
    .map_err(|e| match e {
        LaunchError::NoSenderCredentials => HttpErrorResponse::NoSenderCredentials(
            "No usable sender identity is configured",
        ),
        LaunchError::Transport(e) => {
            log::error!("{e}");
            HttpErrorResponse::InternalError("Failed to initialize the mail transport")
        }
        LaunchError::Dao(e) => {
            log::error!("{e}");
            HttpErrorResponse::InternalError("Failed to launch campaign")
        }
    })?;

    Ok(HttpResponse::Created().json(LaunchReport {
        campaign: outcome.campaign.into(),
        created: outcome.created,
        sent: outcome.sent,
        failed: outcome.failed,
    }))
}

pub async fn get_all(
    db_async_pool: web::Data<DbAsyncPool>,
    user: AuthorizedUser,
) -> Result<HttpResponse, HttpErrorResponse> {
    let campaign_dao = db::campaign::Dao::new(&db_async_pool);

    let campaigns = match campaign_dao.get_campaigns(user.user_id).await {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError("Failed to get campaigns"));
        }
    };

    Ok(HttpResponse::Ok().json(CampaignList {
        campaigns: campaigns.into_iter().map(CampaignMessage::from).collect(),
    }))
}

pub async fn get_deliveries(
    db_async_pool: web::Data<DbAsyncPool>,
    user: AuthorizedUser,
    campaign_id: web::Path<Uuid>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let campaign_dao = db::campaign::Dao::new(&db_async_pool);

    let deliveries = match campaign_dao
        .get_deliveries(*campaign_id, user.user_id)
        .await
    {
        Ok(d) => d,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(
                "Failed to get campaign deliveries",
            ));
        }
    };

    Ok(HttpResponse::Ok().json(DeliveryList {
        deliveries: deliveries.into_iter().map(DeliveryMessage::from).collect(),
    }))
}

pub async fn delete(
    db_async_pool: web::Data<DbAsyncPool>,
    change_feed: web::Data<ChangeFeed>,
    user: AuthorizedUser,
    campaign_id: web::Path<Uuid>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let campaign_dao = db::campaign::Dao::new(&db_async_pool);

    // Deliveries are cascade-deleted with their campaign
    let affected = match campaign_dao.delete_campaign(*campaign_id, user.user_id).await {
        Ok(a) => a,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError("Failed to delete campaign"));
        }
    };

    if affected == 0 {
        return Err(HttpErrorResponse::DoesNotExist(
            "No campaign with the given ID belongs to the user",
        ));
    }

    change_feed.publish(ChangeEvent {
        user_id: user.user_id,
        kind: ChangeKind::CampaignDeleted,
        campaign_id: *campaign_id,
        delivery_id: None,
    });

    Ok(HttpResponse::Ok().finish())
}
