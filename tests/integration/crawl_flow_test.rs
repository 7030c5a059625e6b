// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use comicwatch::config::settings::{CrawlerSettings, FetcherSettings, SpoilerSettings};
use comicwatch::crawler::ComicCrawler;
use comicwatch::domain::models::comic::Comic;
use comicwatch::fetcher::{HttpFetcher, PageFetcher};
use comicwatch::infrastructure::repositories::{
    MemoryComicRepository, MemorySubscriberRepository,
};
use comicwatch::infrastructure::sites::create_default_registry;
use comicwatch::workers::dispatcher::Notifier;
use comicwatch::workers::update_scheduler::UpdateScheduler;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn naver_series_page(episode_no: u32) -> String {
    format!(
        r#"<html><body>
        <div class="comicinfo">
            <div class="thumb"><img src="/thumb/42.jpg"></div>
            <div class="detail"><h2>Monster Hunt</h2></div>
        </div>
        <table class="viewList">
            <tr><td class="title"><a href="/episode/{no}">Episode {no}</a></td></tr>
            <tr><td class="title"><a href="/episode/{prev}">Episode {prev}</a></td></tr>
        </table>
        </body></html>"#,
        no = episode_no,
        prev = episode_no - 1,
    )
}

fn chapter_page(image_count: usize) -> String {
    format!(
        "<html><body><div class=\"wt_viewer\">{}</div></body></html>",
        "<img src=\"page.jpg\">".repeat(image_count)
    )
}

fn crawler_settings() -> CrawlerSettings {
    CrawlerSettings {
        pool_size: 5,
        poll_interval_minutes: 30,
        crawl_timeout_secs: 5,
        list_timeout_secs: 2,
    }
}

fn fetcher() -> Arc<dyn PageFetcher> {
    Arc::new(HttpFetcher::new(&FetcherSettings {
        user_agent: "Comicwatch-Test/0.1.0".to_string(),
        timeout_secs: 5,
    }))
}

fn registry_settings() -> SpoilerSettings {
    SpoilerSettings {
        default_min_items: 3,
        overrides: HashMap::new(),
    }
}

fn tracked_comic(server_uri: &str, chapter_url: &str) -> Comic {
    let mut comic = Comic::new(
        1,
        "comic.naver.com".to_string(),
        "Monster Hunt".to_string(),
        format!("{}/series", server_uri),
    );
    comic.chapter = "Episode 10".to_string();
    comic.chapter_url = chapter_url.to_string();
    comic
}

fn scheduler(
    comics: Arc<MemoryComicRepository>,
    subscribers: Arc<MemorySubscriberRepository>,
    tx: mpsc::Sender<comicwatch::domain::models::notification::NotificationTask>,
) -> UpdateScheduler<MemoryComicRepository, MemorySubscriberRepository> {
    let registry = Arc::new(create_default_registry(&registry_settings()));
    let crawler = Arc::new(ComicCrawler::new(registry, fetcher()));
    let notifier = Notifier::new(subscribers, tx, Duration::from_secs(2));
    UpdateScheduler::new(comics, crawler, notifier, crawler_settings())
}

#[tokio::test]
async fn test_new_chapter_is_crawled_and_fanned_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/series"))
        .respond_with(ResponseTemplate::new(200).set_body_string(naver_series_page(11)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/episode/11"))
        .respond_with(ResponseTemplate::new(200).set_body_string(chapter_page(5)))
        .mount(&server)
        .await;

    let comics = Arc::new(MemoryComicRepository::new());
    comics.insert(tracked_comic(
        &server.uri(),
        &format!("{}/episode/10", server.uri()),
    ));
    let subscribers = Arc::new(MemorySubscriberRepository::new());
    subscribers.subscribe(1, "user-a".to_string());
    subscribers.subscribe(1, "user-b".to_string());

    let (tx, mut rx) = mpsc::channel(16);
    let scheduler = scheduler(comics.clone(), subscribers, tx);

    scheduler.run_cycle().await;

    let updated = comics.get(1).unwrap();
    assert_eq!(updated.chapter, "Episode 11");
    assert_eq!(updated.chapter_url, format!("{}/episode/11", server.uri()));
    assert_eq!(updated.image_url, format!("{}/thumb/42.jpg", server.uri()));

    let first = rx.try_recv().expect("first notification queued");
    let second = rx.try_recv().expect("second notification queued");
    assert!(rx.try_recv().is_err());
    assert_eq!(first.comic.chapter, "Episode 11");
    assert_eq!(second.comic.chapter, "Episode 11");
}

#[tokio::test]
async fn test_static_page_is_idempotent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/series"))
        .respond_with(ResponseTemplate::new(200).set_body_string(naver_series_page(10)))
        .mount(&server)
        .await;

    let comics = Arc::new(MemoryComicRepository::new());
    comics.insert(tracked_comic(
        &server.uri(),
        &format!("{}/episode/10", server.uri()),
    ));
    let subscribers = Arc::new(MemorySubscriberRepository::new());
    subscribers.subscribe(1, "user-a".to_string());

    let (tx, mut rx) = mpsc::channel(16);
    let scheduler = scheduler(comics.clone(), subscribers, tx);

    scheduler.run_cycle().await;
    scheduler.run_cycle().await;

    // 页面没有新章节：记录保持原样，也没有任何通知入队
    let unchanged = comics.get(1).unwrap();
    assert_eq!(unchanged.chapter, "Episode 10");
    assert_eq!(unchanged.name, "Monster Hunt");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_spoiler_chapter_is_deferred_until_complete() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/series"))
        .respond_with(ResponseTemplate::new(200).set_body_string(naver_series_page(11)))
        .mount(&server)
        .await;
    // 章节页面只有1张图片：视为尚未发布完整
    Mock::given(method("GET"))
        .and(path("/episode/11"))
        .respond_with(ResponseTemplate::new(200).set_body_string(chapter_page(1)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/episode/11"))
        .respond_with(ResponseTemplate::new(200).set_body_string(chapter_page(5)))
        .mount(&server)
        .await;

    let comics = Arc::new(MemoryComicRepository::new());
    comics.insert(tracked_comic(
        &server.uri(),
        &format!("{}/episode/10", server.uri()),
    ));
    let subscribers = Arc::new(MemorySubscriberRepository::new());

    let (tx, _rx) = mpsc::channel(16);
    let scheduler = scheduler(comics.clone(), subscribers, tx);

    scheduler.run_cycle().await;

    // 第一轮：剧透章节，存储的章节URL不得前移
    let deferred = comics.get(1).unwrap();
    assert_eq!(deferred.chapter_url, format!("{}/episode/10", server.uri()));

    scheduler.run_cycle().await;

    // 第二轮：章节加载完整后才接受
    let accepted = comics.get(1).unwrap();
    assert_eq!(accepted.chapter_url, format!("{}/episode/11", server.uri()));
}

#[tokio::test]
async fn test_unreachable_series_page_leaves_comic_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/series"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let comics = Arc::new(MemoryComicRepository::new());
    comics.insert(tracked_comic(
        &server.uri(),
        &format!("{}/episode/10", server.uri()),
    ));
    let subscribers = Arc::new(MemorySubscriberRepository::new());

    let (tx, _rx) = mpsc::channel(16);
    let scheduler = scheduler(comics.clone(), subscribers, tx);

    scheduler.run_cycle().await;

    let unchanged = comics.get(1).unwrap();
    assert_eq!(unchanged.chapter_url, format!("{}/episode/10", server.uri()));
}
