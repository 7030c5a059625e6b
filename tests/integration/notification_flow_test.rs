// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use comicwatch::config::settings::{GatewaySettings, NotifierSettings};
use comicwatch::domain::models::comic::ComicSnapshot;
use comicwatch::domain::models::notification::NotificationTask;
use comicwatch::infrastructure::messaging::PushGateway;
use comicwatch::workers::dispatcher::NotificationDispatcher;
use std::sync::Arc;
use tokio::sync::mpsc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn notifier_settings() -> NotifierSettings {
    NotifierSettings {
        queue_capacity: 16,
        max_retries: 5,
        cycle_interval_secs: 60,
        delivery_concurrency: 4,
    }
}

fn gateway(server_uri: &str) -> Arc<PushGateway> {
    Arc::new(PushGateway::new(&GatewaySettings {
        endpoint: format!("{}/push", server_uri),
        token: "test-token".to_string(),
        timeout_secs: 5,
    }))
}

fn task(recipient: &str) -> NotificationTask {
    NotificationTask::new(
        recipient.to_string(),
        ComicSnapshot {
            name: "Monster Hunt".to_string(),
            chapter: "Episode 11".to_string(),
            chapter_url: "https://comic.naver.com/episode/11".to_string(),
        },
    )
}

#[tokio::test]
async fn test_push_delivery_carries_token_and_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/push"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_partial_json(serde_json::json!({ "to": "user-a" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (tx, rx) = mpsc::channel(16);
    let mut dispatcher = NotificationDispatcher::new(gateway(&server.uri()), rx, notifier_settings());

    tx.send(task("user-a")).await.unwrap();
    dispatcher.run_cycle().await;
}

#[tokio::test]
async fn test_failed_delivery_is_retried_next_cycle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/push"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/push"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (tx, rx) = mpsc::channel(16);
    let mut dispatcher = NotificationDispatcher::new(gateway(&server.uri()), rx, notifier_settings());

    tx.send(task("user-a")).await.unwrap();
    dispatcher.run_cycle().await;
    dispatcher.run_cycle().await;
}

#[tokio::test]
async fn test_permanently_failing_delivery_stops_at_cap() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/push"))
        .respond_with(ResponseTemplate::new(500))
        .expect(5)
        .mount(&server)
        .await;

    let (tx, rx) = mpsc::channel(16);
    let mut dispatcher = NotificationDispatcher::new(gateway(&server.uri()), rx, notifier_settings());

    tx.send(task("user-a")).await.unwrap();
    for _ in 0..8 {
        dispatcher.run_cycle().await;
    }
}
