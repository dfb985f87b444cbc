//! Fan-out distribution of live alerts.
//!
//! Every subscriber gets its own unbounded mailbox and every published alert
//! is delivered to all mailboxes registered at publish time. Publishing never
//! waits, so a slow subscriber cannot hold up the poller.
//!
//! # Example
//!
//! ```no_run
//! use broadcaster::{AlertEvent, Broadcaster};
//!
//! # async fn example(event: AlertEvent) {
//! let broadcaster = Broadcaster::new();
//! let mut subscription = broadcaster.subscribe();
//!
//! broadcaster.publish(event);
//!
//! if let Some(event) = subscription.recv().await {
//!     println!("{} in {:?}", event.title, event.cities);
//! }
//! # }
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use alert_core::{Alert, AlertType, CategoryCode};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// An alert as handed to live subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub id: String,
    pub cat: CategoryCode,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub title: String,
    pub cities: Vec<String>,
    /// Mirrors the title.
    pub instructions: String,
}

impl From<&Alert> for AlertEvent {
    fn from(alert: &Alert) -> Self {
        Self {
            id: alert.id.clone(),
            cat: alert.category.clone(),
            alert_type: alert.alert_type,
            title: alert.title.clone(),
            cities: alert.cities.clone(),
            instructions: alert.title.clone(),
        }
    }
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    mailboxes: Vec<(u64, mpsc::UnboundedSender<AlertEvent>)>,
}

/// Registers subscribers and fans alerts out to them.
///
/// Cloning shares the registry.
#[derive(Debug, Clone, Default)]
pub struct Broadcaster {
    registry: Arc<Mutex<Registry>>,
}

impl Broadcaster {
    /// Create a broadcaster with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber. Only alerts published afterwards are delivered.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut registry = self.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.mailboxes.push((id, tx));
        info!(subscriber = id, total = registry.mailboxes.len(), "Subscriber registered");
        Subscription { id, rx }
    }

    /// Deliver an alert to every live subscriber, dropping closed mailboxes.
    ///
    /// Returns the number of subscribers that received it.
    pub fn publish(&self, event: AlertEvent) -> usize {
        let mut registry = self.lock();
        registry.mailboxes.retain(|(id, tx)| {
            let delivered = tx.send(event.clone()).is_ok();
            if !delivered {
                debug!(subscriber = *id, "Dropping closed subscriber");
            }
            delivered
        });
        let delivered = registry.mailboxes.len();
        debug!(alert_id = %event.id, delivered, "Published alert");
        delivered
    }

    /// Number of subscribers that are still connected.
    pub fn subscriber_count(&self) -> usize {
        self.lock()
            .mailboxes
            .iter()
            .filter(|(_, tx)| !tx.is_closed())
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        // The registry holds no invariants a panicking holder could break.
        self.registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// A subscriber's mailbox. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    rx: mpsc::UnboundedReceiver<AlertEvent>,
}

impl Subscription {
    /// Subscriber id, for logging.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Wait for the next alert. `None` once the broadcaster is gone.
    pub async fn recv(&mut self) -> Option<AlertEvent> {
        self.rx.recv().await
    }

    /// Take the next alert if one is already queued.
    pub fn try_recv(&mut self) -> Option<AlertEvent> {
        self.rx.try_recv().ok()
    }

    /// Convert into the underlying receiver, e.g. to wrap it in a stream.
    pub fn into_receiver(self) -> mpsc::UnboundedReceiver<AlertEvent> {
        self.rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str) -> AlertEvent {
        AlertEvent::from(&Alert::new(
            id,
            CategoryCode::from(1),
            "Enter Shelters",
            vec!["Tel Aviv".to_string()],
            "2025-06-01T00:00:00",
        ))
    }

    #[test]
    fn test_event_schema() {
        let json = serde_json::to_value(event("12345")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "12345",
                "cat": 1,
                "type": "missiles",
                "title": "Enter Shelters",
                "cities": ["Tel Aviv"],
                "instructions": "Enter Shelters"
            })
        );
    }

    #[tokio::test]
    async fn test_every_subscriber_receives_every_alert() {
        let broadcaster = Broadcaster::new();
        let mut first = broadcaster.subscribe();
        let mut second = broadcaster.subscribe();

        assert_eq!(broadcaster.publish(event("a")), 2);
        assert_eq!(broadcaster.publish(event("b")), 2);

        assert_eq!(first.recv().await.unwrap().id, "a");
        assert_eq!(first.recv().await.unwrap().id, "b");
        assert_eq!(second.recv().await.unwrap().id, "a");
        assert_eq!(second.recv().await.unwrap().id, "b");
    }

    #[tokio::test]
    async fn test_dropped_subscribers_are_pruned() {
        let broadcaster = Broadcaster::new();
        let mut kept = broadcaster.subscribe();
        let dropped = broadcaster.subscribe();
        assert_eq!(broadcaster.subscriber_count(), 2);

        drop(dropped);
        assert_eq!(broadcaster.subscriber_count(), 1);
        assert_eq!(broadcaster.publish(event("a")), 1);
        assert_eq!(kept.recv().await.unwrap().id, "a");
    }

    #[test]
    fn test_publish_without_subscribers() {
        let broadcaster = Broadcaster::new();
        assert_eq!(broadcaster.publish(event("a")), 0);
    }

    #[test]
    fn test_late_subscriber_sees_only_new_alerts() {
        let broadcaster = Broadcaster::new();
        broadcaster.publish(event("early"));
        let mut late = broadcaster.subscribe();
        assert!(late.try_recv().is_none());
        broadcaster.publish(event("later"));
        assert_eq!(late.try_recv().unwrap().id, "later");
    }
}
