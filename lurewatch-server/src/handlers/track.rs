use lurewatch_common::db::{self, DbAsyncPool};
use lurewatch_common::email::{EmailMessage, MailerFactoryHandle};
use lurewatch_common::events::{ChangeEvent, ChangeFeed, ChangeKind};
use lurewatch_common::html::templates::LureLandingPage;
use lurewatch_common::templates::ClickAlertNotice;

use actix_web::{web, HttpResponse};
use lettre::message::Mailbox;
use tokio::time;
use uuid::Uuid;

use crate::dispatch::credentials;
use crate::env;

/// The tracking endpoint is reached by untrusted recipients; it never errors
/// and never varies its response, whatever the id looks like or matches.
fn acknowledge() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(LureLandingPage::generate())
}

pub async fn record_click(
    db_async_pool: web::Data<DbAsyncPool>,
    mailer_factory: web::Data<MailerFactoryHandle>,
    change_feed: web::Data<ChangeFeed>,
    delivery_id: web::Path<String>,
) -> HttpResponse {
    let Ok(delivery_id) = Uuid::parse_str(&delivery_id) else {
        return acknowledge();
    };

    let campaign_dao = db::campaign::Dao::new(&db_async_pool);

    match campaign_dao.mark_delivery_interacted(delivery_id).await {
        Ok(Some(interaction)) => {
            change_feed.publish(ChangeEvent {
                user_id: interaction.user_id,
                kind: ChangeKind::DeliveryInteracted,
                campaign_id: interaction.campaign_id,
                delivery_id: Some(delivery_id),
            });

            notify_owner(&db_async_pool, &mailer_factory, interaction);
        }
        // Unknown ids and repeat visits are indistinguishable by design
        Ok(None) => (),
        Err(e) => log::error!("Failed to record click for delivery {delivery_id}: {e}"),
    }

    acknowledge()
}

/// Emails the campaign owner that a target interacted. Best-effort in a
/// detached task; a failure here must never delay or alter the response the
/// target sees.
fn notify_owner(
    db_async_pool: &DbAsyncPool,
    mailer_factory: &MailerFactoryHandle,
    interaction: db::campaign::InteractedDelivery,
) {
    let db_async_pool = db_async_pool.clone();
    let mailer_factory = MailerFactoryHandle::clone(mailer_factory);

    tokio::spawn(async move {
        let settings_dao = db::settings::Dao::new(&db_async_pool);

        let settings = match settings_dao.get_settings(interaction.user_id).await {
            Ok(s) => s,
            Err(e) => {
                log::error!("{e}");
                return;
            }
        };

        let Some(sender_credentials) = credentials::resolve(
            settings.as_ref(),
            None,
            env::CONF.fallback_sender_secret.as_deref(),
        ) else {
            return;
        };

        let mailer = match mailer_factory.mailer_for(&sender_credentials) {
            Ok(m) => m,
            Err(e) => {
                log::error!("{e}");
                return;
            }
        };

        let Ok(address) = sender_credentials.address.parse() else {
            return;
        };
        let from = Mailbox::new(Some(String::from("Lurewatch Alerts")), address);

        let subject = format!("Interaction recorded: {}", interaction.target_name);
        let alert = EmailMessage {
            body: ClickAlertNotice::generate(&interaction.target_name, &interaction.target_email),
            subject: &subject,
            from,
            destination: &sender_credentials.address,
            is_html: true,
        };

        match time::timeout(env::CONF.send_timeout, mailer.send(alert)).await {
            Ok(Ok(())) => (),
            Ok(Err(e)) => log::error!("Click alert failed: {e}"),
            Err(_) => log::error!("Click alert timed out"),
        }
    });
}
