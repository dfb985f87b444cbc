//! Route handlers for the relay.

pub mod alerts;
pub mod health;
pub mod stream;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Live feed
        .route("/api/alerts-stream", get(stream::alert_stream))
        .route("/api/alerts/stream", get(stream::alert_stream))
        .route("/api/alerts/current", get(alerts::current))
        // Stored alerts
        .route("/api/alerts/history", get(alerts::history))
        .route("/api/alerts/recent", get(alerts::recent))
        .route("/api/alerts/city/:name", get(alerts::by_city))
        .route("/api/alerts/stats", get(alerts::stats))
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::time::Duration;

    use alert_core::{Alert, CategoryCode};
    use broadcaster::{AlertEvent, Broadcaster};
    use database::{AlertStore, Database};
    use tokio::sync::watch;

    use super::*;

    struct TestServer {
        addr: SocketAddr,
        store: AlertStore,
        broadcaster: Broadcaster,
        last_alert: watch::Sender<Option<String>>,
        shutdown: watch::Sender<bool>,
    }

    async fn spawn_server() -> TestServer {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        let store = AlertStore::open(db).await.unwrap();
        let broadcaster = Broadcaster::new();
        let (last_alert, last_alert_rx) = watch::channel(None);
        let (shutdown, shutdown_rx) = watch::channel(false);

        let state = AppState::new(store.clone(), broadcaster.clone(), last_alert_rx, shutdown_rx);
        let app = router().with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestServer {
            addr,
            store,
            broadcaster,
            last_alert,
            shutdown,
        }
    }

    fn alert(id: &str, cities: &[&str], timestamp: &str) -> Alert {
        Alert::new(
            id,
            CategoryCode::from("1"),
            "ירי רקטות וטילים",
            cities.iter().map(|c| c.to_string()).collect(),
            timestamp,
        )
    }

    #[tokio::test]
    async fn test_health_reports_subscribers() {
        let server = spawn_server().await;
        let _subscription = server.broadcaster.subscribe();

        let body: serde_json::Value = reqwest::get(format!("http://{}/health", server.addr))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["subscribers"], 1);
    }

    #[tokio::test]
    async fn test_recent_with_since() {
        let server = spawn_server().await;
        server.store.save(&alert("old-1", &["a"], "2024-01-01T00:00:00")).await.unwrap();
        server.store.save(&alert("new-1", &["b"], "2025-06-01T00:00:00")).await.unwrap();

        let body: serde_json::Value = reqwest::get(format!(
            "http://{}/api/alerts/recent?since=2025-01-01T00:00:00",
            server.addr
        ))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

        assert_eq!(body["count"], 1);
        let alerts = body["alerts"].as_array().unwrap();
        assert_eq!(alerts[0]["id"], "new-1");
        assert_eq!(alerts[0]["data"][0], "b");
        assert_eq!(alerts[0]["type"], "missiles");
    }

    #[tokio::test]
    async fn test_by_city_and_unknown_city() {
        let server = spawn_server().await;
        server.store.save(&alert("c1", &["חיפה"], "2025-06-01T00:00:00")).await.unwrap();

        let client = reqwest::Client::new();
        let url = reqwest::Url::parse(&format!("http://{}/api/alerts/city/", server.addr))
            .unwrap()
            .join("חיפה")
            .unwrap();
        let body: serde_json::Value = client.get(url).send().await.unwrap().json().await.unwrap();
        assert_eq!(body["city"], "חיפה");
        assert_eq!(body["count"], 1);
        assert_eq!(body["alerts"].as_array().unwrap().len(), 1);

        let body: serde_json::Value = client
            .get(format!("http://{}/api/alerts/city/nowhere", server.addr))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["city"], "nowhere");
        assert_eq!(body["count"], 0);
        assert!(body["alerts"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_filters_by_city_or_since() {
        let server = spawn_server().await;
        server.store.save(&alert("h1", &["אילת"], "2024-01-01T00:00:00")).await.unwrap();
        server.store.save(&alert("h2", &["חיפה"], "2025-06-01T00:00:00")).await.unwrap();
        server.store.save(&alert("h3", &["אילת"], "2025-06-02T00:00:00")).await.unwrap();

        let client = reqwest::Client::new();
        let url = format!("http://{}/api/alerts/history", server.addr);

        let body: serde_json::Value = client.get(&url).send().await.unwrap().json().await.unwrap();
        assert_eq!(body["count"], 3);
        assert_eq!(body["alerts"][0]["id"], "h3");

        let body: serde_json::Value = client
            .get(&url)
            .query(&[("city", "אילת"), ("limit", "1")])
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["count"], 1);
        assert_eq!(body["alerts"][0]["id"], "h3");

        let body: serde_json::Value = client
            .get(&url)
            .query(&[("since", "2025-01-01T00:00:00")])
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["count"], 2);
    }

    #[tokio::test]
    async fn test_current_reflects_poller_state() {
        let server = spawn_server().await;
        let url = format!("http://{}/api/alerts/current", server.addr);

        let body: serde_json::Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
        assert_eq!(body["active"], false);
        assert!(body["last_alert_id"].is_null());

        server.last_alert.send_replace(Some("133812345".to_string()));

        let body: serde_json::Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
        assert_eq!(body["active"], true);
        assert_eq!(body["last_alert_id"], "133812345");
    }

    #[tokio::test]
    async fn test_stats() {
        let server = spawn_server().await;
        server.store.save(&alert("s1", &["אילת", "חיפה"], "2025-06-01T00:00:00")).await.unwrap();
        server.store.save(&alert("s2", &["חיפה"], "2025-06-02T00:00:00")).await.unwrap();

        let body: serde_json::Value =
            reqwest::get(format!("http://{}/api/alerts/stats?top=1", server.addr))
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
        assert_eq!(body["total_alerts"], 2);
        assert_eq!(body["total_city_entries"], 3);
        assert_eq!(body["top_cities"].as_array().unwrap().len(), 1);
        assert_eq!(body["top_cities"][0]["city"], "חיפה");
    }

    #[tokio::test]
    async fn test_stream_delivers_to_every_client() {
        let server = spawn_server().await;
        let mut first = reqwest::get(format!("http://{}/api/alerts-stream", server.addr))
            .await
            .unwrap();
        let mut second = reqwest::get(format!("http://{}/api/alerts/stream", server.addr))
            .await
            .unwrap();
        assert_eq!(server.broadcaster.subscriber_count(), 2);

        let event = AlertEvent::from(&alert("live-1", &["שדרות"], "2025-06-01T00:00:00"));
        assert_eq!(server.broadcaster.publish(event), 2);

        for response in [&mut first, &mut second] {
            let mut received = String::new();
            while !received.contains("live-1") {
                let chunk = tokio::time::timeout(Duration::from_secs(2), response.chunk())
                    .await
                    .unwrap()
                    .unwrap()
                    .unwrap();
                received.push_str(&String::from_utf8_lossy(&chunk));
            }
            assert!(received.contains("event: new_alert"));
        }
    }

    #[tokio::test]
    async fn test_stream_ends_on_shutdown() {
        let server = spawn_server().await;
        let mut response = reqwest::get(format!("http://{}/api/alerts/stream", server.addr))
            .await
            .unwrap();

        server.shutdown.send(true).unwrap();

        let ended = tokio::time::timeout(Duration::from_secs(2), async {
            while let Ok(Some(_)) = response.chunk().await {}
        })
        .await;
        assert!(ended.is_ok());
    }
}
