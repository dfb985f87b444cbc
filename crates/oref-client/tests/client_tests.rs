//! Client tests against a local stand-in for the upstream feeds.

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::Router;
use oref_client::{OrefClient, OrefConfig, OrefError};

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr, alerts: &str, history: &str) -> OrefClient {
    let config = OrefConfig::new(
        format!("http://{}{}", addr, alerts),
        format!("http://{}{}", addr, history),
    )
    .with_timeout(Duration::from_millis(500));
    OrefClient::new(config).unwrap()
}

#[tokio::test]
async fn test_fetch_current_with_bom() {
    let app = Router::new().route(
        "/alerts.json",
        get(|| async {
            "\u{feff}{\"id\": \"12345\", \"cat\": \"1\", \"data\": [\"Tel Aviv\"], \"title\": \"Enter Shelters\"}\r\n"
        }),
    );
    let addr = serve(app).await;
    let client = client_for(addr, "/alerts.json", "/history.json");

    let alert = client.fetch_current().await.unwrap().unwrap();
    assert_eq!(alert.id, "12345");
    assert_eq!(alert.data, vec!["Tel Aviv"]);
}

#[tokio::test]
async fn test_fetch_current_empty_body_is_no_alert() {
    let app = Router::new().route("/alerts.json", get(|| async { "\u{feff}\r\n" }));
    let addr = serve(app).await;
    let client = client_for(addr, "/alerts.json", "/history.json");

    assert!(client.fetch_current().await.unwrap().is_none());
}

#[tokio::test]
async fn test_sends_upstream_headers() {
    let app = Router::new().route(
        "/alerts.json",
        get(|headers: HeaderMap| async move {
            let ok = headers.get("referer").is_some()
                && headers
                    .get("x-requested-with")
                    .map(|v| v == "XMLHttpRequest")
                    .unwrap_or(false);
            if ok {
                (StatusCode::OK, "")
            } else {
                (StatusCode::FORBIDDEN, "")
            }
        }),
    );
    let addr = serve(app).await;
    let client = client_for(addr, "/alerts.json", "/history.json");

    assert!(client.fetch_current().await.unwrap().is_none());
}

#[tokio::test]
async fn test_forbidden_is_distinguished() {
    let app = Router::new().route("/alerts.json", get(|| async { StatusCode::FORBIDDEN }));
    let addr = serve(app).await;
    let client = client_for(addr, "/alerts.json", "/history.json");

    let err = client.fetch_current().await.unwrap_err();
    assert!(err.is_forbidden());
}

#[tokio::test]
async fn test_server_error_is_status() {
    let app = Router::new().route(
        "/history.json",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let addr = serve(app).await;
    let client = client_for(addr, "/alerts.json", "/history.json");

    let err = client.fetch_history().await.unwrap_err();
    assert!(matches!(err, OrefError::Status(500)));
}

#[tokio::test]
async fn test_timeout_is_transient_http_error() {
    let app = Router::new().route(
        "/alerts.json",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            ""
        }),
    );
    let addr = serve(app).await;
    let client = client_for(addr, "/alerts.json", "/history.json");

    let err = client.fetch_current().await.unwrap_err();
    assert!(err.is_timeout());
    assert!(!err.is_forbidden());
}

#[tokio::test]
async fn test_fetch_history() {
    let app = Router::new().route(
        "/history.json",
        get(|| async {
            r#"[
                {"alertDate": "2025-06-13 03:15:42", "title": "ירי רקטות וטילים", "data": "שדרות", "category": 1},
                {"alertDate": "2025-06-13 03:15:42", "title": "ירי רקטות וטילים", "data": "נתיבות", "category": 1}
            ]"#
        }),
    );
    let addr = serve(app).await;
    let client = client_for(addr, "/alerts.json", "/history.json");

    let rows = client.fetch_history().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].alert_date, "2025-06-13 03:15:42");
}
