use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::models::campaign::Campaign;
use crate::models::delivery::Delivery;
use crate::models::target::Target;
use crate::models::user_settings::UserSettings;

/// Timestamps cross the wire as unix seconds.
fn unix_secs(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyMode {
    Fixed,
    Random,
}

#[derive(Debug, Deserialize)]
pub struct LaunchCampaignRequest {
    pub mode: StrategyMode,
    /// Optional sender address for users without a stored credential record;
    /// it is paired with the process-wide fallback secret.
    #[serde(default)]
    pub sender_address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CampaignMessage {
    pub id: Uuid,
    pub category: String,
    pub template: String,
    pub status: String,
    pub created_timestamp: u64,
}

impl From<Campaign> for CampaignMessage {
    fn from(campaign: Campaign) -> Self {
        Self {
            id: campaign.id,
            category: campaign.category,
            template: campaign.template,
            status: campaign.status,
            created_timestamp: unix_secs(campaign.created_timestamp),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CampaignList {
    pub campaigns: Vec<CampaignMessage>,
}

#[derive(Debug, Serialize)]
pub struct LaunchReport {
    pub campaign: CampaignMessage,
    pub created: u32,
    pub sent: u32,
    pub failed: u32,
}

#[derive(Debug, Serialize)]
pub struct DeliveryMessage {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub target_name: String,
    pub target_email: String,
    pub interacted: bool,
    pub send_status: String,
    pub created_timestamp: u64,
}

impl From<Delivery> for DeliveryMessage {
    fn from(delivery: Delivery) -> Self {
        Self {
            id: delivery.id,
            campaign_id: delivery.campaign_id,
            target_name: delivery.target_name,
            target_email: delivery.target_email,
            interacted: delivery.interacted,
            send_status: delivery.send_status,
            created_timestamp: unix_secs(delivery.created_timestamp),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeliveryList {
    pub deliveries: Vec<DeliveryMessage>,
}

#[derive(Debug, Deserialize)]
pub struct NewTargetRequest {
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct TargetMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_timestamp: u64,
}

impl From<Target> for TargetMessage {
    fn from(target: Target) -> Self {
        Self {
            id: target.id,
            name: target.name,
            email: target.email,
            created_timestamp: unix_secs(target.created_timestamp),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TargetList {
    pub targets: Vec<TargetMessage>,
}

#[derive(Debug, Deserialize)]
pub struct SettingsUpdateRequest {
    pub company_name: String,
    pub default_template: String,
    #[serde(default)]
    pub sender_address: Option<String>,
    #[serde(default)]
    pub sender_secret: Option<String>,
}

/// The stored secret is reported only as a presence flag; it must never be
/// echoed back in a response body.
#[derive(Debug, Serialize)]
pub struct SettingsMessage {
    pub company_name: String,
    pub default_template: String,
    pub sender_address: Option<String>,
    pub sender_secret_configured: bool,
    pub updated_timestamp: u64,
}

impl From<UserSettings> for SettingsMessage {
    fn from(settings: UserSettings) -> Self {
        Self {
            company_name: settings.company_name,
            default_template: settings.default_template,
            sender_address: settings.sender_address,
            sender_secret_configured: settings
                .sender_secret
                .as_deref()
                .is_some_and(|s| !s.is_empty()),
            updated_timestamp: unix_secs(settings.updated_timestamp),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardOverview {
    pub targets: i64,
    pub campaigns: i64,
    pub interactions: i64,
}

#[derive(Debug, Serialize)]
pub struct ServerErrorResponse {
    pub err_type: String,
    pub err_message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_mode_wire_format() {
        assert_eq!(
            serde_json::to_string(&StrategyMode::Fixed).unwrap(),
            "\"FIXED\""
        );
        assert_eq!(
            serde_json::from_str::<StrategyMode>("\"RANDOM\"").unwrap(),
            StrategyMode::Random
        );
        assert!(serde_json::from_str::<StrategyMode>("\"random\"").is_err());
    }

    #[test]
    fn test_launch_request_sender_address_defaults_to_none() {
        let req: LaunchCampaignRequest = serde_json::from_str("{\"mode\":\"FIXED\"}").unwrap();
        assert_eq!(req.mode, StrategyMode::Fixed);
        assert!(req.sender_address.is_none());
    }

    #[test]
    fn test_settings_message_never_carries_the_secret() {
        let settings = UserSettings {
            user_id: Uuid::now_v7(),
            company_name: String::from("Initech"),
            default_template: String::from("SECURITY_ALERT"),
            sender_address: Some(String::from("ops@initech.com")),
            sender_secret: Some(String::from("super-secret")),
            updated_timestamp: SystemTime::now(),
        };

        let message = SettingsMessage::from(settings);
        assert!(message.sender_secret_configured);

        let json = serde_json::to_string(&message).unwrap();
        assert!(!json.contains("super-secret"));
    }

    #[test]
    fn test_empty_secret_counts_as_unconfigured() {
        let settings = UserSettings {
            user_id: Uuid::now_v7(),
            company_name: String::from("Initech"),
            default_template: String::from("SECURITY_ALERT"),
            sender_address: Some(String::from("ops@initech.com")),
            sender_secret: Some(String::new()),
            updated_timestamp: SystemTime::now(),
        };

        assert!(!SettingsMessage::from(settings).sender_secret_configured);
    }
}
