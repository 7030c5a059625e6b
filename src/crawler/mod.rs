// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 爬取模块
///
/// 编排页面抓取、站点适配器与剧透检测，产出单部漫画的更新结果
pub mod spoiler;

pub use spoiler::SpoilerDetector;

use crate::domain::models::comic::Comic;
use crate::domain::sites::CrawlError;
use crate::fetcher::PageFetcher;
use crate::infrastructure::sites::AdapterRegistry;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::debug;

/// 漫画爬取器
///
/// `update`对单部漫画执行一次完整的更新检测：
/// 解析适配器、提取元数据、与已存储章节比对、必要时做剧透检测，
/// 最后就地覆写漫画字段。提取过程中的任何panic都被捕获并转换为
/// `ExtractionFailed`，单部漫画的失败不会中止整个批次。
pub struct ComicCrawler {
    registry: Arc<AdapterRegistry>,
    fetcher: Arc<dyn PageFetcher>,
    detector: SpoilerDetector,
}

impl ComicCrawler {
    /// 创建新的漫画爬取器实例
    ///
    /// # 参数
    ///
    /// * `registry` - 站点适配器注册表
    /// * `fetcher` - 页面抓取器
    ///
    /// # 返回值
    ///
    /// 返回新的漫画爬取器实例
    pub fn new(registry: Arc<AdapterRegistry>, fetcher: Arc<dyn PageFetcher>) -> Self {
        let detector = SpoilerDetector::new(fetcher.clone());
        Self {
            registry,
            fetcher,
            detector,
        }
    }

    /// 检测单部漫画是否有新章节
    ///
    /// # 参数
    ///
    /// * `comic` - 待检测的漫画，发现更新时就地覆写
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 发现新章节且字段已覆写
    /// * `Err(CrawlError)` - 未更新或失败，`comic`保持原样
    pub async fn update(&self, comic: &mut Comic) -> Result<(), CrawlError> {
        let adapter = self
            .registry
            .get(&comic.page)
            .ok_or_else(|| CrawlError::UnsupportedPage(comic.page.clone()))?;

        let extracted = AssertUnwindSafe(adapter.extract(self.fetcher.as_ref(), comic))
            .catch_unwind()
            .await;

        let extraction = match extracted {
            Ok(result) => result?,
            Err(_) => {
                return Err(CrawlError::ExtractionFailed(format!(
                    "extraction panicked for {}",
                    comic.url
                )))
            }
        };

        if extraction.chapter_url == comic.chapter_url {
            return Err(CrawlError::UpToDate);
        }

        // 首次爬取没有基准章节，跳过剧透检测直接接受
        if !comic.is_first_crawl() {
            self.detector
                .detect(&extraction.chapter_url, &adapter.spoiler_rule())
                .await?;
        }

        debug!(
            "Comic {} advanced: {:?} -> {:?}",
            comic.id, comic.chapter_url, extraction.chapter_url
        );
        comic.apply(extraction);
        Ok(())
    }
}

#[cfg(test)]
#[path = "crawler_test.rs"]
mod tests;
