// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;

/// 应用程序配置设置
///
/// 包含爬取调度、通知分发、页面抓取和消息网关等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 爬取调度配置
    pub crawler: CrawlerSettings,
    /// 通知分发配置
    pub notifier: NotifierSettings,
    /// 页面抓取配置
    pub fetcher: FetcherSettings,
    /// 消息网关配置
    pub gateway: GatewaySettings,
    /// 剧透章节检测配置
    pub spoiler: SpoilerSettings,
    /// 启动时加载的种子文件路径（可选）
    pub seed_file: Option<String>,
}

/// 爬取调度配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerSettings {
    /// 并发爬取工作器数量
    pub pool_size: usize,
    /// 轮询周期间隔（分钟）
    pub poll_interval_minutes: u64,
    /// 单个漫画的爬取超时时间（秒）
    pub crawl_timeout_secs: u64,
    /// 漫画清单及订阅者查询的超时时间（秒）
    pub list_timeout_secs: u64,
}

/// 通知分发配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct NotifierSettings {
    /// 新任务队列容量
    pub queue_capacity: usize,
    /// 单个通知任务的最大投递尝试次数
    pub max_retries: u32,
    /// 分发周期间隔（秒）
    pub cycle_interval_secs: u64,
    /// 单个周期内的并发投递数量
    pub delivery_concurrency: usize,
}

/// 页面抓取配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherSettings {
    /// 请求使用的User-Agent
    pub user_agent: String,
    /// 单次请求超时时间（秒）
    pub timeout_secs: u64,
}

/// 消息网关配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct GatewaySettings {
    /// 消息推送端点
    pub endpoint: String,
    /// 访问令牌
    pub token: String,
    /// 单次投递超时时间（秒）
    pub timeout_secs: u64,
}

/// 剧透章节检测配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct SpoilerSettings {
    /// 默认的最小内容项数量阈值
    pub default_min_items: usize,
    /// 按站点覆盖的阈值
    #[serde(default)]
    pub overrides: HashMap<String, usize>,
}

impl SpoilerSettings {
    /// 获取指定站点的剧透检测阈值
    pub fn min_items_for(&self, page: &str) -> usize {
        self.overrides
            .get(page)
            .copied()
            .unwrap_or(self.default_min_items)
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Default crawler settings
            .set_default("crawler.pool_size", 5)?
            .set_default("crawler.poll_interval_minutes", 30)?
            .set_default("crawler.crawl_timeout_secs", 10)?
            .set_default("crawler.list_timeout_secs", 7)?
            // Default notifier settings
            .set_default("notifier.queue_capacity", 256)?
            .set_default("notifier.max_retries", 5)?
            .set_default("notifier.cycle_interval_secs", 60)?
            .set_default("notifier.delivery_concurrency", 10)?
            // Default fetcher settings
            .set_default("fetcher.user_agent", "Comicwatch/0.1.0")?
            .set_default("fetcher.timeout_secs", 10)?
            // Default gateway settings
            .set_default("gateway.endpoint", "http://localhost:9290/push")?
            .set_default("gateway.token", "dev-token")?
            .set_default("gateway.timeout_secs", 10)?
            // Default spoiler settings
            .set_default("spoiler.default_min_items", 3)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("COMICWATCH").separator("__"));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
