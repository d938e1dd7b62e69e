use actix_web::web::*;

use crate::handlers;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/campaign")
            .route("", post().to(handlers::campaign::launch))
            .route("/all", get().to(handlers::campaign::get_all))
            .route(
                "/{campaign_id}/deliveries",
                get().to(handlers::campaign::get_deliveries),
            )
            .route("/{campaign_id}", delete().to(handlers::campaign::delete)),
    );
}
