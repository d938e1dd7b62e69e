use actix_web::web::*;

use crate::handlers;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/settings")
            .route("", get().to(handlers::settings::get))
            .route("", put().to(handlers::settings::update)),
    );
}
