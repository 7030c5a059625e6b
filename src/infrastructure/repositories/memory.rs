// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::comic::Comic;
use crate::domain::repositories::comic_repository::{ComicRepository, RepositoryError};
use crate::domain::repositories::subscriber_repository::SubscriberRepository;
use async_trait::async_trait;
use dashmap::DashMap;

/// 进程内漫画仓库实现
///
/// 用并发哈希表保存漫画记录，满足仓库契约以便核心在没有
/// 外部持久化协作方时独立运行和测试。
pub struct MemoryComicRepository {
    comics: DashMap<i64, Comic>,
}

impl MemoryComicRepository {
    /// 创建空的漫画仓库
    pub fn new() -> Self {
        Self {
            comics: DashMap::new(),
        }
    }

    /// 插入一条漫画记录（种子加载和测试使用）
    pub fn insert(&self, comic: Comic) {
        self.comics.insert(comic.id, comic);
    }

    /// 按ID读取漫画记录
    pub fn get(&self, id: i64) -> Option<Comic> {
        self.comics.get(&id).map(|entry| entry.value().clone())
    }
}

impl Default for MemoryComicRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ComicRepository for MemoryComicRepository {
    async fn list(&self) -> Result<Vec<Comic>, RepositoryError> {
        let mut comics: Vec<Comic> = self
            .comics
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        comics.sort_by_key(|c| c.id);
        Ok(comics)
    }

    async fn update(&self, comic: &Comic) -> Result<(), RepositoryError> {
        if !self.comics.contains_key(&comic.id) {
            return Err(RepositoryError::NotFound);
        }
        self.comics.insert(comic.id, comic.clone());
        Ok(())
    }
}

/// 进程内订阅者仓库实现
pub struct MemorySubscriberRepository {
    subscriptions: DashMap<i64, Vec<String>>,
}

impl MemorySubscriberRepository {
    /// 创建空的订阅者仓库
    pub fn new() -> Self {
        Self {
            subscriptions: DashMap::new(),
        }
    }

    /// 为漫画添加一个订阅者（种子加载和测试使用）
    pub fn subscribe(&self, comic_id: i64, recipient: String) {
        self.subscriptions
            .entry(comic_id)
            .or_default()
            .push(recipient);
    }
}

impl Default for MemorySubscriberRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubscriberRepository for MemorySubscriberRepository {
    async fn list_subscribers(&self, comic_id: i64) -> Result<Vec<String>, RepositoryError> {
        Ok(self
            .subscriptions
            .get(&comic_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }
}
