// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::comic::Comic;
use crate::infrastructure::repositories::{MemoryComicRepository, MemorySubscriberRepository};
use anyhow::{Context, Result};
use chrono::Utc;
use serde::Deserialize;
use std::fs;
use tracing::info;

/// 种子文件结构
///
/// 没有外部持久化协作方的部署通过YAML文件声明
/// 跟踪的漫画与订阅关系，启动时一次性加载。
#[derive(Debug, Deserialize)]
pub struct SeedFile {
    /// 跟踪的漫画清单
    #[serde(default)]
    pub comics: Vec<SeedComic>,
    /// 订阅关系清单
    #[serde(default)]
    pub subscriptions: Vec<SeedSubscription>,
}

/// 种子漫画条目
#[derive(Debug, Deserialize)]
pub struct SeedComic {
    pub id: i64,
    pub page: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub chapter: String,
    #[serde(default)]
    pub chapter_url: String,
}

/// 种子订阅条目
#[derive(Debug, Deserialize)]
pub struct SeedSubscription {
    pub comic_id: i64,
    pub recipient: String,
}

/// 从YAML种子文件加载漫画与订阅关系
///
/// # 参数
///
/// * `path` - 种子文件路径
/// * `comics` - 漫画仓库
/// * `subscribers` - 订阅者仓库
pub fn load_seed(
    path: &str,
    comics: &MemoryComicRepository,
    subscribers: &MemorySubscriberRepository,
) -> Result<()> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read seed file {}", path))?;
    let seed: SeedFile =
        serde_yaml::from_str(&content).with_context(|| format!("malformed seed file {}", path))?;

    let comic_count = seed.comics.len();
    let subscription_count = seed.subscriptions.len();

    for entry in seed.comics {
        comics.insert(Comic {
            id: entry.id,
            page: entry.page,
            name: entry.name,
            url: entry.url,
            image_url: entry.image_url,
            chapter: entry.chapter,
            chapter_url: entry.chapter_url,
            updated_at: Utc::now(),
        });
    }
    for entry in seed.subscriptions {
        subscribers.subscribe(entry.comic_id, entry.recipient);
    }

    info!(
        "Seed loaded from {}: {} comics, {} subscriptions",
        path, comic_count, subscription_count
    );
    Ok(())
}
