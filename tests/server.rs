//! End-to-end tests against a bound server.

use std::time::Duration;

use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_server_end_to_end() {
    let (addr, shutdown) = common::start_server(common::instant_config()).await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let base = format!("http://{addr}");

    let res = client.get(format!("{base}/health")).send().await.expect("server unreachable");
    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("x-request-id"));

    let res = client.get(format!("{base}/api/users/2")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let user: Value = res.json().await.unwrap();
    assert_eq!(user, json!({"id": 2, "name": "Bob", "email": "bob@example.com"}));

    let res = client.get(format!("{base}/api/users/99")).send().await.unwrap();
    assert_eq!(res.status(), 404);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["detail"], "User not found");

    let res = client.get(format!("{base}/api/error")).send().await.unwrap();
    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["detail"], "Intentional error for testing");

    let text = client
        .get(format!("{base}/metrics"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(text.contains("http_requests_total"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_concurrent_slow_requests_overlap() {
    let mut config = common::instant_config();
    config.faults.slow = sample_api::config::FaultProfile::new(300, 300, 0.0);
    let (addr, shutdown) = common::start_server(config).await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let start = std::time::Instant::now();
    let requests = (0..8).map(|_| {
        let client = client.clone();
        let url = format!("http://{addr}/api/slow");
        tokio::spawn(async move { client.get(url).send().await.map(|r| r.status()) })
    });
    for handle in requests.collect::<Vec<_>>() {
        assert_eq!(handle.await.unwrap().unwrap(), 200);
    }

    // eight 300ms sleeps finish well before they would if run back to back
    assert!(start.elapsed() < Duration::from_millis(2_000));

    shutdown.trigger();
}

#[tokio::test]
async fn test_graceful_shutdown_stops_server() {
    let (addr, shutdown) = common::start_server(common::instant_config()).await;
    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();

    let res = client.get(format!("http://{addr}/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(client.get(format!("http://{addr}/health")).send().await.is_err());
}
