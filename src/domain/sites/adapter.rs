// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::comic::{Comic, Extraction};
use crate::fetcher::PageFetcher;
use async_trait::async_trait;
use thiserror::Error;

/// 爬取错误分类
///
/// `UpToDate`与`SpoilerChapter`是控制流哨兵而非硬错误：
/// 调用方不得因它们写入持久化或消耗重试预算。
#[derive(Debug, Error, Clone)]
pub enum CrawlError {
    /// 没有与该域名匹配的站点适配器
    #[error("Unsupported page: {0}")]
    UnsupportedPage(String),
    /// 页面不可达或结构不符合预期
    #[error("Invalid url: {0}")]
    InvalidUrl(String),
    /// 提取到的章节与已存储章节相同
    #[error("Already up to date")]
    UpToDate,
    /// 候选章节内容尚未加载完整
    #[error("Spoiler chapter: {0}")]
    SpoilerChapter(String),
    /// 提取过程中的解析或运行时故障
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),
}

impl CrawlError {
    /// 是否为无需告警的控制流哨兵
    pub fn is_benign(&self) -> bool {
        matches!(self, CrawlError::UpToDate | CrawlError::SpoilerChapter(_))
    }
}

/// 剧透章节检测规则
///
/// 在`primary`选中的节点下统计`content`匹配的内容项数量，
/// 低于`min_items`视为章节尚未发布完整。
#[derive(Debug, Clone)]
pub struct SpoilerRule {
    /// 章节正文容器选择器
    pub primary: String,
    /// 内容项选择器
    pub content: String,
    /// 最小内容项数量
    pub min_items: usize,
}

/// 站点适配器特质
///
/// 每个受支持的站点实现一次，无状态，进程启动时注册后不再变化。
/// 适配器只做结构化提取，不做语义解析。
#[async_trait]
pub trait SiteAdapter: Send + Sync {
    /// 适配器绑定的站点域名
    fn page(&self) -> &str;

    /// 该站点的剧透检测规则
    fn spoiler_rule(&self) -> SpoilerRule;

    /// 抓取漫画主页并提取最新章节元数据
    ///
    /// 页面不可达或缺少预期的结构锚点时返回`InvalidUrl`。
    async fn extract(
        &self,
        fetcher: &dyn PageFetcher,
        comic: &Comic,
    ) -> Result<Extraction, CrawlError>;
}
