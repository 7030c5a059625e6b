// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::comic::{Comic, Extraction};
use crate::domain::sites::{CrawlError, SiteAdapter, SpoilerRule};
use crate::fetcher::PageFetcher;
use crate::utils::url_utils;
use async_trait::async_trait;
use regex::Regex;
use scraper::{Html, Selector};

/// Daum漫画站点适配器
///
/// 漫画主页的结构锚点：
/// - 标题：`div.webtoon_info h2.tit_wt`
/// - 封面：`div.webtoon_info img.img_thumb`
/// - 最新话：`ul.list_episode li a.link_episode`（列表第一项即最新话）
///
/// 部分版式的最新话链接没有文字标签，此时从href中的话数编号
/// 推导章节标签。
pub struct DaumAdapter {
    title_selector: Selector,
    cover_selector: Selector,
    episode_selector: Selector,
    episode_no_regex: Regex,
    min_items: usize,
}

impl DaumAdapter {
    /// 适配器绑定的站点域名
    pub const PAGE: &'static str = "webtoon.daum.net";

    /// 创建新的Daum适配器实例
    ///
    /// # 参数
    ///
    /// * `min_items` - 该站点的剧透检测阈值
    pub fn new(min_items: usize) -> Self {
        let title_selector = Selector::parse("div.webtoon_info h2.tit_wt")
            .expect("Failed to compile daum title selector");
        let cover_selector = Selector::parse("div.webtoon_info img.img_thumb")
            .expect("Failed to compile daum cover selector");
        let episode_selector = Selector::parse("ul.list_episode li a.link_episode")
            .expect("Failed to compile daum episode selector");
        let episode_no_regex =
            Regex::new(r"episode/(\d+)").expect("Failed to compile daum episode regex");

        Self {
            title_selector,
            cover_selector,
            episode_selector,
            episode_no_regex,
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
        let href = episode
            .value()
            .attr("href")
            .ok_or_else(|| CrawlError::InvalidUrl(format!("episode link without href on {}", base_url)))?;
        let chapter = self.derive_chapter_label(&episode.text().collect::<String>(), href);

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

    /// 优先使用链接文字作为章节标签，缺失时从href推导话数
    fn derive_chapter_label(&self, text: &str, href: &str) -> String {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
        if let Some(cap) = self.episode_no_regex.captures(href) {
            return format!("제{}화", &cap[1]);
        }
        href.to_string()
    }
}

#[async_trait]
impl SiteAdapter for DaumAdapter {
    fn page(&self) -> &str {
        Self::PAGE
    }

    fn spoiler_rule(&self) -> SpoilerRule {
        SpoilerRule {
            primary: "div.cont_view".to_string(),
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
