use actix_web::web::*;

use crate::handlers;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.route("/heartbeat", get().to(handlers::health::heartbeat))
        .route("/health", get().to(handlers::health::health));
}
