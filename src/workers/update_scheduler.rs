// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::CrawlerSettings;
use crate::crawler::ComicCrawler;
use crate::domain::models::comic::Comic;
use crate::domain::repositories::comic_repository::ComicRepository;
use crate::domain::repositories::subscriber_repository::SubscriberRepository;
use crate::domain::sites::CrawlError;
use crate::workers::dispatcher::Notifier;
use futures::StreamExt;
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

/// 更新调度器
///
/// 无限轮询循环：每个周期读取全部被跟踪的漫画，分发到固定大小的
/// 并发工作器池执行爬取，等待整个批次结束后休眠固定间隔。
/// 周期之间不会重叠；清单读取失败只记录日志并直接进入休眠。
pub struct UpdateScheduler<C, S>
where
    C: ComicRepository + 'static,
    S: SubscriberRepository + 'static,
{
    comics: Arc<C>,
    crawler: Arc<ComicCrawler>,
    notifier: Notifier<S>,
    settings: CrawlerSettings,
}

impl<C, S> UpdateScheduler<C, S>
where
    C: ComicRepository + 'static,
    S: SubscriberRepository + 'static,
{
    /// 创建新的更新调度器实例
    ///
    /// # 参数
    ///
    /// * `comics` - 漫画仓库
    /// * `crawler` - 漫画爬取器
    /// * `notifier` - 通知生产者句柄
    /// * `settings` - 爬取调度配置
    ///
    /// # 返回值
    ///
    /// 返回新的更新调度器实例
    pub fn new(
        comics: Arc<C>,
        crawler: Arc<ComicCrawler>,
        notifier: Notifier<S>,
        settings: CrawlerSettings,
    ) -> Self {
        Self {
            comics,
            crawler,
            notifier,
            settings,
        }
    }

    /// 运行调度循环
    pub async fn run(&self) {
        info!("Update scheduler started");

        loop {
            self.run_cycle().await;
            sleep(Duration::from_secs(self.settings.poll_interval_minutes * 60)).await;
        }
    }

    /// 启动后台运行
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    /// 执行一个完整的轮询周期
    ///
    /// 返回即表示批次内每部漫画都已到达终态（批次完成屏障）。
    pub async fn run_cycle(&self) {
        let listing = timeout(
            Duration::from_secs(self.settings.list_timeout_secs),
            self.comics.list(),
        )
        .await;

        let comics = match listing {
            Ok(Ok(comics)) => comics,
            Ok(Err(e)) => {
                error!("Comic listing failed: {}", e);
                return;
            }
            Err(_) => {
                error!("Comic listing timed out");
                return;
            }
        };

        if comics.is_empty() {
            debug!("No comics tracked, skipping cycle");
            return;
        }

        info!("Polling cycle started: {} comics", comics.len());

        futures::stream::iter(comics)
            .for_each_concurrent(self.settings.pool_size, |comic| self.process_comic(comic))
            .await;

        info!("Polling cycle complete");
    }

    /// 处理单部漫画的一次爬取
    ///
    /// 所有失败都被吸收在这里，绝不向批次传播。
    async fn process_comic(&self, mut comic: Comic) {
        let outcome = timeout(
            Duration::from_secs(self.settings.crawl_timeout_secs),
            self.crawler.update(&mut comic),
        )
        .await;

        match outcome {
            Err(_) => {
                warn!("Crawl timed out for comic {} ({})", comic.id, comic.url);
                counter!("comic_crawl_failed_total", "reason" => "timeout").increment(1);
            }
            Ok(Err(e)) if e.is_benign() => {
                debug!("Comic {} not updated: {}", comic.id, e);
                counter!("comic_crawl_skipped_total", "reason" => skip_reason(&e)).increment(1);
            }
            Ok(Err(e)) => {
                warn!("Crawl failed for comic {} ({}): {}", comic.id, comic.url, e);
                counter!("comic_crawl_failed_total", "reason" => failure_reason(&e)).increment(1);
            }
            Ok(Ok(())) => {
                info!(
                    "Comic {} updated: {} {}",
                    comic.id, comic.name, comic.chapter
                );
                counter!("comic_crawl_updated_total").increment(1);

                // 持久化失败则跳过本周期的通知，下个周期会重新发现同一更新
                if let Err(e) = self.comics.update(&comic).await {
                    error!("Failed to persist comic {}: {}", comic.id, e);
                    return;
                }
                self.notifier.notify(&comic).await;
            }
        }
    }
}

fn skip_reason(error: &CrawlError) -> &'static str {
    match error {
        CrawlError::UpToDate => "up_to_date",
        _ => "spoiler",
    }
}

fn failure_reason(error: &CrawlError) -> &'static str {
    match error {
        CrawlError::UnsupportedPage(_) => "unsupported_page",
        CrawlError::InvalidUrl(_) => "invalid_url",
        _ => "extraction_failed",
    }
}

#[cfg(test)]
#[path = "update_scheduler_test.rs"]
mod tests;
