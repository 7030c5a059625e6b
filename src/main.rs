// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use comicwatch::config::settings::Settings;
use comicwatch::crawler::ComicCrawler;
use comicwatch::fetcher::{HttpFetcher, PageFetcher};
use comicwatch::infrastructure::messaging::PushGateway;
use comicwatch::infrastructure::repositories::seed;
use comicwatch::infrastructure::repositories::{MemoryComicRepository, MemorySubscriberRepository};
use comicwatch::infrastructure::sites::create_default_registry;
use comicwatch::utils::telemetry;
use comicwatch::workers::{NotificationDispatcher, Notifier, UpdateScheduler};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{error, info};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动后台循环
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting comicwatch...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");

    // 3. Build page fetcher and site adapter registry
    let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new(&settings.fetcher));
    let registry = Arc::new(create_default_registry(&settings.spoiler));

    // 4. Initialize repositories (in-process collaborators)
    let comic_repo = Arc::new(MemoryComicRepository::new());
    let subscriber_repo = Arc::new(MemorySubscriberRepository::new());
    if let Some(path) = &settings.seed_file {
        seed::load_seed(path, &comic_repo, &subscriber_repo)?;
    }

    // 5. Build the comic crawler
    let crawler = Arc::new(ComicCrawler::new(registry, fetcher));

    // 6. Start the notification dispatcher
    let (tx, rx) = mpsc::channel(settings.notifier.queue_capacity);
    let gateway = Arc::new(PushGateway::new(&settings.gateway));
    let dispatcher = NotificationDispatcher::new(gateway, rx, settings.notifier.clone());
    let dispatcher_handle = dispatcher.start();

    // 7. Start the update scheduler
    let notifier = Notifier::new(
        subscriber_repo,
        tx,
        Duration::from_secs(settings.crawler.list_timeout_secs),
    );
    let scheduler = UpdateScheduler::new(comic_repo, crawler, notifier, settings.crawler.clone());
    let scheduler_handle = scheduler.start();

    // 8. Wait for shutdown signal
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(err) => error!("Unable to listen for shutdown signal: {}", err),
    }

    info!("Shutting down workers...");
    scheduler_handle.abort();
    dispatcher_handle.abort();
    info!("Workers shut down successfully");

    Ok(())
}
