use actix_web::web::*;

use crate::handlers;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/dashboard")
            .route("/overview", get().to(handlers::dashboard::overview))
            .route("/events", get().to(handlers::dashboard::events)),
    );
}
