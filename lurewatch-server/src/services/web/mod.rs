use actix_web::web::*;

use crate::handlers::track;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(scope("").route("/l/{delivery_id}", get().to(track::record_click)));
}
