use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeKind {
    CampaignCreated,
    CampaignDeleted,
    DeliveryCreated,
    DeliverySendRecorded,
    DeliveryInteracted,
}

/// One committed Campaign/Delivery mutation. Everything a dashboard needs to
/// decide what to re-query; never row contents.
#[derive(Clone, Debug, Serialize)]
pub struct ChangeEvent {
    pub user_id: Uuid,
    pub kind: ChangeKind,
    pub campaign_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_id: Option<Uuid>,
}

/// Fan-out of committed mutations to dashboard subscribers. Publishing never
/// blocks and never fails; events for users nobody is watching are dropped.
#[derive(Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn publish(&self, event: ChangeEvent) {
        // An Err here only means no subscriber is currently listening
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_published_event() {
        let feed = ChangeFeed::new(8);
        let mut receiver = feed.subscribe();

        let user_id = Uuid::now_v7();
        let campaign_id = Uuid::now_v7();

        feed.publish(ChangeEvent {
            user_id,
            kind: ChangeKind::CampaignCreated,
            campaign_id,
            delivery_id: None,
        });

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.user_id, user_id);
        assert_eq!(event.kind, ChangeKind::CampaignCreated);
        assert_eq!(event.campaign_id, campaign_id);
        assert!(event.delivery_id.is_none());
    }

    #[test]
    fn test_publish_without_subscribers_is_a_no_op() {
        let feed = ChangeFeed::new(8);

        feed.publish(ChangeEvent {
            user_id: Uuid::now_v7(),
            kind: ChangeKind::DeliveryInteracted,
            campaign_id: Uuid::now_v7(),
            delivery_id: Some(Uuid::now_v7()),
        });
    }

    #[test]
    fn test_event_serialization() {
        let event = ChangeEvent {
            user_id: Uuid::nil(),
            kind: ChangeKind::DeliveryInteracted,
            campaign_id: Uuid::nil(),
            delivery_id: None,
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"DELIVERY_INTERACTED\""));
        assert!(!json.contains("delivery_id"));
    }
}
