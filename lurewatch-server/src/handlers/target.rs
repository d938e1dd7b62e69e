use lurewatch_common::db::{self, DbAsyncPool};
use lurewatch_common::messages::{NewTargetRequest, TargetList, TargetMessage};
use lurewatch_common::models::target::UNKNOWN_TARGET_NAME;
use lurewatch_common::validators;

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::handlers::error::HttpErrorResponse;
use crate::middleware::auth::AuthorizedUser;

const MAX_NAME_LENGTH: usize = 255;

pub async fn create(
    db_async_pool: web::Data<DbAsyncPool>,
    user: AuthorizedUser,
    target_req: web::Json<NewTargetRequest>,
) -> Result<HttpResponse, HttpErrorResponse> {
    if !validators::is_valid_email(&target_req.email) {
        return Err(HttpErrorResponse::IncorrectlyFormed(
            "Target email address is invalid",
        ));
    }

    let name = target_req
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_TARGET_NAME);

    if name.len() > MAX_NAME_LENGTH {
        return Err(HttpErrorResponse::IncorrectlyFormed(
            "Target name is too long",
        ));
    }

    let target_dao = db::target::Dao::new(&db_async_pool);

    let target = match target_dao
        .create_target(user.user_id, name, &target_req.email)
        .await
    {
        Ok(t) => t,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError("Failed to register target"));
        }
    };

    Ok(HttpResponse::Created().json(TargetMessage::from(target)))
}

pub async fn get_all(
    db_async_pool: web::Data<DbAsyncPool>,
    user: AuthorizedUser,
) -> Result<HttpResponse, HttpErrorResponse> {
    let target_dao = db::target::Dao::new(&db_async_pool);

    let targets = match target_dao.get_targets(user.user_id).await {
        Ok(t) => t,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError("Failed to get targets"));
        }
    };

    Ok(HttpResponse::Ok().json(TargetList {
        targets: targets.into_iter().map(TargetMessage::from).collect(),
    }))
}

pub async fn delete(
    db_async_pool: web::Data<DbAsyncPool>,
    user: AuthorizedUser,
    target_id: web::Path<Uuid>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let target_dao = db::target::Dao::new(&db_async_pool);

    let affected = match target_dao.delete_target(*target_id, user.user_id).await {
        Ok(a) => a,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError("Failed to delete target"));
        }
    };

    if affected == 0 {
        return Err(HttpErrorResponse::DoesNotExist(
            "No target with the given ID belongs to the user",
        ));
    }

    Ok(HttpResponse::Ok().finish())
}
