use lurewatch_common::db::{self, DbAsyncPool};
use lurewatch_common::events::ChangeFeed;
use lurewatch_common::messages::DashboardOverview;

use actix_web::http::header;
use actix_web::web::Bytes;
use actix_web::{web, HttpResponse};
use futures::stream;
use std::convert::Infallible;
use tokio::sync::broadcast::error::RecvError;

use crate::handlers::error::HttpErrorResponse;
use crate::middleware::auth::AuthorizedUser;

pub async fn overview(
    db_async_pool: web::Data<DbAsyncPool>,
    user: AuthorizedUser,
) -> Result<HttpResponse, HttpErrorResponse> {
    let target_dao = db::target::Dao::new(&db_async_pool);
    let campaign_dao = db::campaign::Dao::new(&db_async_pool);

    let counts = futures::try_join!(
        target_dao.count_targets(user.user_id),
        campaign_dao.count_campaigns(user.user_id),
        campaign_dao.count_interactions(user.user_id),
    );

    let (targets, campaigns, interactions) = match counts {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(
                "Failed to get dashboard overview",
            ));
        }
    };

    Ok(HttpResponse::Ok().json(DashboardOverview {
        targets,
        campaigns,
        interactions,
    }))
}

/// Server-sent events stream of the caller's committed Campaign/Delivery
/// mutations, so dashboards see interaction flags flip without polling.
pub async fn events(
    change_feed: web::Data<ChangeFeed>,
    user: AuthorizedUser,
) -> HttpResponse {
    let receiver = change_feed.subscribe();
    let user_id = user.user_id;

    let event_stream = stream::unfold(receiver, move |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(event) if event.user_id == user_id => {
                    let Ok(payload) = serde_json::to_string(&event) else {
                        continue;
                    };

                    let frame = Bytes::from(format!("data: {payload}\n\n"));
                    return Some((Ok::<_, Infallible>(frame), receiver));
                }
                // Other users' events are invisible to this subscriber
                Ok(_) => continue,
                // A lagged dashboard just misses events; it re-queries on
                // the next one it sees
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return None,
            }
        }
    });

    HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "text/event-stream"))
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(event_stream)
}
