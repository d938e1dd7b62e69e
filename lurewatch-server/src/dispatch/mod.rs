pub mod credentials;

use lurewatch_common::db::{self, DaoError, DbAsyncPool};
use lurewatch_common::email::{
    EmailError, EmailMessage, EmailSender, MailerFactoryHandle, SenderCredentials,
};
use lurewatch_common::events::{ChangeEvent, ChangeFeed, ChangeKind};
use lurewatch_common::messages::StrategyMode;
use lurewatch_common::models::campaign::{Campaign, CATEGORY_EMAIL_ATTACK, STATUS_ACTIVE};
use lurewatch_common::models::delivery::SendStatus;
use lurewatch_common::templates::{DeliveryReceiptNotice, LureTemplate, LureVars, RenderedLure};

use lettre::message::Mailbox;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time;
use uuid::Uuid;

use crate::env;

/// Used when the user has not configured a company name yet.
pub const DEFAULT_COMPANY_NAME: &str = "Private Company";

const DEFAULT_TEMPLATE: LureTemplate = LureTemplate::SecurityAlert;

#[derive(Debug)]
pub enum LaunchError {
    /// No usable sender identity; nothing was created.
    NoSenderCredentials,
    /// The mail transport could not be constructed; nothing was created.
    Transport(EmailError),
    Dao(DaoError),
}

impl std::error::Error for LaunchError {}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchError::NoSenderCredentials => {
                write!(f, "LaunchError: No usable sender credentials")
            }
            LaunchError::Transport(e) => write!(f, "LaunchError: Transport: {e}"),
            LaunchError::Dao(e) => write!(f, "LaunchError: {e}"),
        }
    }
}

impl From<DaoError> for LaunchError {
    fn from(error: DaoError) -> Self {
        LaunchError::Dao(error)
    }
}

pub struct LaunchOutcome {
    pub campaign: Campaign,
    pub created: u32,
    pub sent: u32,
    pub failed: u32,
}

/// One prepared per-target send: the delivery row already exists and the
/// message is fully rendered.
pub struct SendTask {
    pub delivery_id: Uuid,
    pub target_name: String,
    pub target_email: String,
    pub lure: RenderedLure,
}

/// Launches one campaign for `user_id`: resolves credentials and template,
/// creates the campaign and one delivery per registered target, fans out the
/// sends through a bounded worker pool and records each delivery's outcome.
///
/// Per-target transport failures are recorded, counted and reported; they
/// never fail the launch. Only a missing sender identity (or an unbuildable
/// transport) fails the whole call, and it does so before any row is written.
pub async fn launch(
    db_async_pool: &DbAsyncPool,
    mailer_factory: &MailerFactoryHandle,
    change_feed: &ChangeFeed,
    user_id: Uuid,
    mode: StrategyMode,
    request_sender_address: Option<&str>,
) -> Result<LaunchOutcome, LaunchError> {
    let settings_dao = db::settings::Dao::new(db_async_pool);
    let settings = settings_dao.get_settings(user_id).await?;

    let sender_credentials = credentials::resolve(
        settings.as_ref(),
        request_sender_address,
        env::CONF.fallback_sender_secret.as_deref(),
    )
    .ok_or(LaunchError::NoSenderCredentials)?;

    let company_name = settings
        .as_ref()
        .map(|s| s.company_name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_COMPANY_NAME);

    let from = sender_mailbox(&sender_credentials, company_name)
        .ok_or(LaunchError::NoSenderCredentials)?;

    let mailer = mailer_factory
        .mailer_for(&sender_credentials)
        .map_err(LaunchError::Transport)?;

    // Resolved exactly once; every target in this campaign gets the same
    // variant and the stored id is always a concrete catalog key
    let template = resolve_template(
        mode,
        settings.as_ref().map(|s| s.default_template.as_str()),
    );

    let campaign_dao = db::campaign::Dao::new(db_async_pool);
    let campaign = campaign_dao
        .create_campaign(user_id, CATEGORY_EMAIL_ATTACK, template.id(), STATUS_ACTIVE)
        .await?;

    change_feed.publish(ChangeEvent {
        user_id,
        kind: ChangeKind::CampaignCreated,
        campaign_id: campaign.id,
        delivery_id: None,
    });

    let target_dao = db::target::Dao::new(db_async_pool);
    let target_snapshot = target_dao.get_targets(user_id).await?;

    // An empty campaign is valid, just inert
    if target_snapshot.is_empty() {
        return Ok(LaunchOutcome {
            campaign,
            created: 0,
            sent: 0,
            failed: 0,
        });
    }

    let mut tasks = Vec::with_capacity(target_snapshot.len());
    for target in &target_snapshot {
        let delivery = campaign_dao
            .create_delivery(campaign.id, user_id, &target.name, &target.email)
            .await?;

        change_feed.publish(ChangeEvent {
            user_id,
            kind: ChangeKind::DeliveryCreated,
            campaign_id: campaign.id,
            delivery_id: Some(delivery.id),
        });

        let link = tracking_link(&env::CONF.tracking_base_url, delivery.id);
        let lure = template.render(&LureVars {
            target_name: &target.name,
            company_name,
            link: &link,
        });

        tasks.push(SendTask {
            delivery_id: delivery.id,
            target_name: target.name.clone(),
            target_email: target.email.clone(),
            lure,
        });
    }

    let created = tasks.len() as u32;

    // The fan-out runs detached so a caller that disconnects mid-launch
    // cannot cancel in-flight sends or leave outcomes unrecorded
    let db_async_pool = db_async_pool.clone();
    let change_feed = change_feed.clone();
    let campaign_id = campaign.id;
    let receipt_destination = sender_credentials.address.clone();
    let template_id = template.id();
    let worker_count = env::CONF.dispatch_worker_count;
    let send_timeout = env::CONF.send_timeout;

    let fan_out = tokio::spawn(async move {
        let outcomes = run_fan_out(
            mailer,
            from,
            receipt_destination,
            template_id,
            tasks,
            worker_count,
            send_timeout,
        )
        .await;

        record_outcomes(&db_async_pool, &change_feed, user_id, campaign_id, outcomes).await
    });

    let (sent, failed) = match fan_out.await {
        Ok(counts) => counts,
        Err(e) => {
            // Outcomes are unknown; the rows keep their PENDING status
            log::error!("Campaign {campaign_id} fan-out task failed: {e}");
            (0, created)
        }
    };

    Ok(LaunchOutcome {
        campaign,
        created,
        sent,
        failed,
    })
}

pub(crate) fn resolve_template(
    mode: StrategyMode,
    configured_default: Option<&str>,
) -> LureTemplate {
    match mode {
        StrategyMode::Random => LureTemplate::draw(),
        StrategyMode::Fixed => configured_default
            .filter(|id| !id.is_empty())
            .map(LureTemplate::from_id)
            .unwrap_or(DEFAULT_TEMPLATE),
    }
}

/// The delivery id is the only correlatable identifier in the link.
pub(crate) fn tracking_link(base_url: &str, delivery_id: Uuid) -> String {
    format!("{}/l/{}", base_url.trim_end_matches('/'), delivery_id)
}

fn sender_mailbox(credentials: &SenderCredentials, company_name: &str) -> Option<Mailbox> {
    let address = credentials.address.parse().ok()?;
    Some(Mailbox::new(Some(format!("{company_name} Support")), address))
}

/// Sends every task through a pool of at most `worker_count` concurrent
/// workers. Each worker owns its task; the only shared state is the
/// semaphore. Ordering across targets is not meaningful.
pub(crate) async fn run_fan_out(
    mailer: EmailSender,
    from: Mailbox,
    receipt_destination: String,
    template_id: &'static str,
    tasks: Vec<SendTask>,
    worker_count: usize,
    send_timeout: Duration,
) -> Vec<(Uuid, SendStatus)> {
    let semaphore = Arc::new(Semaphore::new(worker_count.max(1)));
    let mut handles = Vec::with_capacity(tasks.len());

    for task in tasks {
        let semaphore = Arc::clone(&semaphore);
        let mailer = Arc::clone(&mailer);
        let from = from.clone();
        let receipt_destination = receipt_destination.clone();

        handles.push(tokio::spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return (task.delivery_id, SendStatus::Failed),
            };

            let lure_message = EmailMessage {
                body: task.lure.html,
                subject: &task.lure.subject,
                from: from.clone(),
                destination: &task.target_email,
                is_html: true,
            };

            let status = match time::timeout(send_timeout, mailer.send(lure_message)).await {
                Ok(Ok(())) => SendStatus::Sent,
                Ok(Err(e)) => {
                    log::error!("Send for delivery {} failed: {e}", task.delivery_id);
                    SendStatus::Failed
                }
                Err(_) => {
                    log::error!(
                        "Send for delivery {} timed out after {}s",
                        task.delivery_id,
                        send_timeout.as_secs()
                    );
                    SendStatus::Failed
                }
            };

            if status == SendStatus::Sent {
                // Operator receipt; best-effort, never affects the recorded
                // delivery outcome
                let receipt_subject = format!("Lure dispatched: {}", task.target_name);
                let receipt = EmailMessage {
                    body: DeliveryReceiptNotice::generate(
                        &task.target_name,
                        &task.target_email,
                        template_id,
                    ),
                    subject: &receipt_subject,
                    from,
                    destination: &receipt_destination,
                    is_html: true,
                };

                match time::timeout(send_timeout, mailer.send(receipt)).await {
                    Ok(Ok(())) => (),
                    Ok(Err(e)) => {
                        log::error!("Receipt for delivery {} failed: {e}", task.delivery_id)
                    }
                    Err(_) => {
                        log::error!("Receipt for delivery {} timed out", task.delivery_id)
                    }
                }
            }

            (task.delivery_id, status)
        }));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => log::error!("Fan-out worker failed: {e}"),
        }
    }

    outcomes
}

async fn record_outcomes(
    db_async_pool: &DbAsyncPool,
    change_feed: &ChangeFeed,
    user_id: Uuid,
    campaign_id: Uuid,
    outcomes: Vec<(Uuid, SendStatus)>,
) -> (u32, u32) {
    let campaign_dao = db::campaign::Dao::new(db_async_pool);

    let mut sent = 0u32;
    let mut failed = 0u32;

    for (delivery_id, status) in outcomes {
        match status {
            SendStatus::Sent => sent += 1,
            _ => failed += 1,
        }

        if let Err(e) = campaign_dao
            .set_delivery_send_status(delivery_id, status)
            .await
        {
            log::error!("Failed to record send status for delivery {delivery_id}: {e}");
        }

        change_feed.publish(ChangeEvent {
            user_id,
            kind: ChangeKind::DeliverySendRecorded,
            campaign_id,
            delivery_id: Some(delivery_id),
        });
    }

    (sent, failed)
}

#[cfg(test)]
mod tests {
    use super::*;

    use lurewatch_common::email::senders::MockSender;
    use lurewatch_common::email::SendEmail;
    use lurewatch_common::templates::DRAWABLE_TEMPLATES;

    use std::collections::HashSet;

    fn task(name: &str, email: &str) -> SendTask {
        let template = LureTemplate::SecurityAlert;
        let delivery_id = Uuid::now_v7();
        let link = tracking_link("https://lure.test", delivery_id);

        SendTask {
            delivery_id,
            target_name: String::from(name),
            target_email: String::from(email),
            lure: template.render(&LureVars {
                target_name: name,
                company_name: "Initech",
                link: &link,
            }),
        }
    }

    fn from_mailbox() -> Mailbox {
        "Initech Support <ops@initech.com>".parse().unwrap()
    }

    struct SlowSender {
        delay: Duration,
    }

    #[async_trait::async_trait]
    impl SendEmail for SlowSender {
        async fn send<'a>(&self, _message: EmailMessage<'a>) -> Result<(), EmailError> {
            time::sleep(self.delay).await;
            Ok(())
        }
    }

    #[test]
    fn test_resolve_template_fixed_uses_configured_default() {
        assert_eq!(
            resolve_template(StrategyMode::Fixed, Some("FINANCE_INVOICE")),
            LureTemplate::FinanceInvoice
        );
        assert_eq!(
            resolve_template(StrategyMode::Fixed, None),
            LureTemplate::SecurityAlert
        );
        assert_eq!(
            resolve_template(StrategyMode::Fixed, Some("")),
            LureTemplate::SecurityAlert
        );
        assert_eq!(
            resolve_template(StrategyMode::Fixed, Some("NO_SUCH_TEMPLATE")),
            LureTemplate::GenericNotice
        );
    }

    #[test]
    fn test_resolve_template_random_draws_from_catalog() {
        let mut drawn = HashSet::new();
        for _ in 0..2_000 {
            drawn.insert(resolve_template(StrategyMode::Random, Some("HR_POLICY")).id());
        }

        assert_eq!(drawn.len(), DRAWABLE_TEMPLATES.len());
        assert!(!drawn.contains(LureTemplate::GenericNotice.id()));
    }

    #[test]
    fn test_tracking_link_format() {
        let delivery_id = Uuid::now_v7();

        assert_eq!(
            tracking_link("https://lure.test", delivery_id),
            format!("https://lure.test/l/{delivery_id}")
        );
        assert_eq!(
            tracking_link("https://lure.test/", delivery_id),
            format!("https://lure.test/l/{delivery_id}")
        );
    }

    #[tokio::test]
    async fn test_fan_out_reports_per_target_outcomes() {
        let mock = Arc::new(MockSender::new());
        mock.fail_for("charlie@y.com");

        let tasks = vec![
            task("Alice", "alice@y.com"),
            task("Bob", "bob@y.com"),
            task("Charlie", "charlie@y.com"),
        ];
        let charlie_id = tasks[2].delivery_id;

        let outcomes = run_fan_out(
            Arc::clone(&mock) as EmailSender,
            from_mailbox(),
            String::from("ops@initech.com"),
            "SECURITY_ALERT",
            tasks,
            2,
            Duration::from_secs(5),
        )
        .await;

        assert_eq!(outcomes.len(), 3);

        let sent = outcomes
            .iter()
            .filter(|(_, s)| *s == SendStatus::Sent)
            .count();
        let failed: Vec<_> = outcomes
            .iter()
            .filter(|(_, s)| *s == SendStatus::Failed)
            .collect();

        assert_eq!(sent, 2);
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].0, charlie_id);

        // Two lures plus two operator receipts; the refused target produced
        // neither
        let messages = mock.sent_messages();
        assert_eq!(messages.len(), 4);

        let receipts = messages
            .iter()
            .filter(|m| m.destination == "ops@initech.com")
            .count();
        assert_eq!(receipts, 2);
    }

    #[tokio::test]
    async fn test_fan_out_times_out_slow_sends() {
        let slow = Arc::new(SlowSender {
            delay: Duration::from_millis(200),
        });

        let tasks = vec![task("Alice", "alice@y.com")];

        let outcomes = run_fan_out(
            slow as EmailSender,
            from_mailbox(),
            String::from("ops@initech.com"),
            "SECURITY_ALERT",
            tasks,
            4,
            Duration::from_millis(10),
        )
        .await;

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].1, SendStatus::Failed);
    }

    #[tokio::test]
    async fn test_fan_out_with_single_worker_still_completes_all_tasks() {
        let mock = Arc::new(MockSender::new());

        let tasks: Vec<SendTask> = (0..8)
            .map(|i| task(&format!("T{i}"), &format!("t{i}@y.com")))
            .collect();

        let outcomes = run_fan_out(
            Arc::clone(&mock) as EmailSender,
            from_mailbox(),
            String::from("ops@initech.com"),
            "HR_POLICY",
            tasks,
            1,
            Duration::from_secs(5),
        )
        .await;

        assert_eq!(outcomes.len(), 8);
        assert!(outcomes.iter().all(|(_, s)| *s == SendStatus::Sent));
    }
}
