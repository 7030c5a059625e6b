// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::comic::{Comic, Extraction};
use crate::domain::sites::{CrawlError, SiteAdapter, SpoilerRule};
use crate::fetcher::PageFetcher;
use crate::utils::url_utils;
use async_trait::async_trait;
use scraper::{Html, Selector};

/// Naver漫画站点适配器
///
/// 漫画主页的结构锚点：
/// - 标题：`div.comicinfo div.detail h2`
/// - 封面：`div.comicinfo div.thumb img`
/// - 最新话：`table.viewList td.title a`（列表第一行即最新话）
///
/// 章节正文为`div.wt_viewer`下的`img`序列，用于剧透检测。
pub struct NaverAdapter {
    title_selector: Selector,
    cover_selector: Selector,
    episode_selector: Selector,
    min_items: usize,
}

impl NaverAdapter {
    /// 适配器绑定的站点域名
    pub const PAGE: &'static str = "comic.naver.com";

    /// 创建新的Naver适配器实例
    ///
    /// # 参数
    ///
    /// * `min_items` - 该站点的剧透检测阈值
    pub fn new(min_items: usize) -> Self {
        // Pre-compile selectors once at registration time
        let title_selector = Selector::parse("div.comicinfo div.detail h2")
            .expect("Failed to compile naver title selector");
        let cover_selector = Selector::parse("div.comicinfo div.thumb img")
            .expect("Failed to compile naver cover selector");
        let episode_selector = Selector::parse("table.viewList td.title a")
            .expect("Failed to compile naver episode selector");

        Self {
            title_selector,
            cover_selector,
            episode_selector,
            min_items,
        }
    }

    /// 从主页源码提取最新章节元数据
    fn parse_series_page(&self, body: &str, base_url: &str) -> Result<Extraction, CrawlError> {
        let document = Html::parse_document(body);

        let name = document
            .select(&self.title_selector)
            .next()
            .map(|e| e.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CrawlError::InvalidUrl(format!("missing title on {}", base_url)))?;

        let cover = document
            .select(&self.cover_selector)
            .next()
            .and_then(|e| e.value().attr("src"))
            .ok_or_else(|| CrawlError::InvalidUrl(format!("missing cover on {}", base_url)))?;

        let episode = document
            .select(&self.episode_selector)
            .next()
            .ok_or_else(|| CrawlError::InvalidUrl(format!("missing episode list on {}", base_url)))?;
        let chapter = episode.text().collect::<String>().trim().to_string();
        let href = episode
            .value()
            .attr("href")
            .ok_or_else(|| CrawlError::InvalidUrl(format!("episode link without href on {}", base_url)))?;

        let image_url = url_utils::resolve_url(base_url, cover)
            .map_err(|e| CrawlError::InvalidUrl(format!("bad cover url on {}: {}", base_url, e)))?;
        let chapter_url = url_utils::resolve_url(base_url, href)
            .map_err(|e| CrawlError::InvalidUrl(format!("bad episode url on {}: {}", base_url, e)))?;

        Ok(Extraction {
            name,
            image_url,
            chapter,
            chapter_url,
        })
    }
}

#[async_trait]
impl SiteAdapter for NaverAdapter {
    fn page(&self) -> &str {
        Self::PAGE
    }

    fn spoiler_rule(&self) -> SpoilerRule {
        SpoilerRule {
            primary: "div.wt_viewer".to_string(),
            content: "img".to_string(),
            min_items: self.min_items,
        }
    }

    async fn extract(
        &self,
        fetcher: &dyn PageFetcher,
        comic: &Comic,
    ) -> Result<Extraction, CrawlError> {
        let body = fetcher
            .fetch(&comic.url)
            .await
            .map_err(|e| CrawlError::InvalidUrl(format!("{}: {}", comic.url, e)))?;
        self.parse_series_page(&body, &comic.url)
    }
}
