// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::sites::{CrawlError, SpoilerRule};
use crate::fetcher::PageFetcher;
use scraper::{Html, Selector};
use std::sync::Arc;
use tracing::debug;

/// 剧透章节检测器
///
/// 抓取候选章节页面并按站点规则统计内容项数量，
/// 判断章节是否已发布完整。
pub struct SpoilerDetector {
    fetcher: Arc<dyn PageFetcher>,
}

impl SpoilerDetector {
    /// 创建新的剧透章节检测器实例
    ///
    /// # 参数
    ///
    /// * `fetcher` - 页面抓取器
    ///
    /// # 返回值
    ///
    /// 返回新的剧透章节检测器实例
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    /// 检测候选章节是否为剧透章节
    ///
    /// 内容项数量低于规则阈值时返回`SpoilerChapter`；调用方必须
    /// 保持已存储的章节URL不变，使下一个轮询周期重新检查同一候选章节。
    /// 网络或解析故障返回`ExtractionFailed`。
    pub async fn detect(&self, chapter_url: &str, rule: &SpoilerRule) -> Result<(), CrawlError> {
        let body = self
            .fetcher
            .fetch(chapter_url)
            .await
            .map_err(|e| CrawlError::ExtractionFailed(format!("{}: {}", chapter_url, e)))?;

        let count = count_content_items(&body, chapter_url, rule)?;
        debug!(
            "Spoiler check for {}: {} content items (min {})",
            chapter_url, count, rule.min_items
        );

        if count < rule.min_items {
            return Err(CrawlError::SpoilerChapter(chapter_url.to_string()));
        }

        Ok(())
    }
}

/// 在章节正文容器下统计内容项数量
///
/// 解析在同步上下文中完成，文档不跨越await点。
fn count_content_items(body: &str, url: &str, rule: &SpoilerRule) -> Result<usize, CrawlError> {
    let document = Html::parse_document(body);

    let primary = Selector::parse(&rule.primary)
        .map_err(|e| CrawlError::ExtractionFailed(format!("bad primary selector: {}", e)))?;
    let content = Selector::parse(&rule.content)
        .map_err(|e| CrawlError::ExtractionFailed(format!("bad content selector: {}", e)))?;

    let root = document
        .select(&primary)
        .next()
        .ok_or_else(|| CrawlError::InvalidUrl(format!("missing chapter body on {}", url)))?;

    Ok(root.select(&content).count())
}

#[cfg(test)]
#[path = "spoiler_test.rs"]
mod tests;
