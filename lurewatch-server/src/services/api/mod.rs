use actix_web::web::*;

mod campaign;
mod dashboard;
mod health;
mod settings;
mod target;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/api")
            .configure(campaign::configure)
            .configure(dashboard::configure)
            .configure(health::configure)
            .configure(settings::configure)
            .configure(target::configure),
    );
}
