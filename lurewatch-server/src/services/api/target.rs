use actix_web::web::*;

use crate::handlers;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/target")
            .route("", post().to(handlers::target::create))
            .route("/all", get().to(handlers::target::get_all))
            .route("/{target_id}", delete().to(handlers::target::delete)),
    );
}
