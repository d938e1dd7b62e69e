use lurewatch_common::db::{self, DbAsyncPool};
use lurewatch_common::messages::{SettingsMessage, SettingsUpdateRequest};
use lurewatch_common::validators;

use actix_web::{web, HttpResponse};

use crate::handlers::error::HttpErrorResponse;
use crate::middleware::auth::AuthorizedUser;

const MAX_COMPANY_NAME_LENGTH: usize = 255;

pub async fn get(
    db_async_pool: web::Data<DbAsyncPool>,
    user: AuthorizedUser,
) -> Result<HttpResponse, HttpErrorResponse> {
    let settings_dao = db::settings::Dao::new(&db_async_pool);

    let settings = match settings_dao.get_settings(user.user_id).await {
        Ok(s) => s,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError("Failed to get settings"));
        }
    };

    match settings {
        Some(settings) => Ok(HttpResponse::Ok().json(SettingsMessage::from(settings))),
        None => Err(HttpErrorResponse::DoesNotExist(
            "No settings are stored for the user",
        )),
    }
}

pub async fn update(
    db_async_pool: web::Data<DbAsyncPool>,
    user: AuthorizedUser,
    update_req: web::Json<SettingsUpdateRequest>,
) -> Result<HttpResponse, HttpErrorResponse> {
    if update_req.company_name.is_empty()
        || update_req.company_name.len() > MAX_COMPANY_NAME_LENGTH
    {
        return Err(HttpErrorResponse::IncorrectlyFormed(
            "Company name must be between 1 and 255 characters",
        ));
    }

    if let Some(address) = update_req.sender_address.as_deref() {
        if !validators::is_valid_email(address) {
            return Err(HttpErrorResponse::IncorrectlyFormed(
                "Sender address is invalid",
            ));
        }
    }

    let settings_dao = db::settings::Dao::new(&db_async_pool);

    let settings = match settings_dao
        .upsert_settings(
            user.user_id,
            &update_req.company_name,
            &update_req.default_template,
            update_req.sender_address.as_deref(),
            update_req.sender_secret.as_deref(),
        )
        .await
    {
        Ok(s) => s,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError("Failed to save settings"));
        }
    };

    Ok(HttpResponse::Ok().json(SettingsMessage::from(settings)))
}
