// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 漫画实体
///
/// 表示一个被跟踪的漫画页面及其最近一次已知的章节信息。
/// `page`与`url`在创建后不再变化，更新检测只覆写名称、封面和章节字段。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comic {
    /// 漫画唯一标识符，由持久化层分配
    pub id: i64,
    /// 来源站点域名，用于解析站点适配器
    pub page: String,
    /// 漫画显示名称
    pub name: String,
    /// 漫画主页URL
    pub url: String,
    /// 封面图片URL
    pub image_url: String,
    /// 最新章节标签
    pub chapter: String,
    /// 最新章节URL，空字符串表示尚未爬取过
    pub chapter_url: String,
    /// 更新时间，章节信息最后变化的时间戳
    pub updated_at: DateTime<Utc>,
}

/// 漫画快照
///
/// 通知分发时刻的漫画字段副本，保证延迟投递不会观察到
/// 后续周期覆写的半新记录。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComicSnapshot {
    /// 漫画显示名称
    pub name: String,
    /// 最新章节标签
    pub chapter: String,
    /// 最新章节URL
    pub chapter_url: String,
}

/// 站点适配器的提取结果
///
/// 一次页面解析得到的全部元数据字段。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// 漫画显示名称
    pub name: String,
    /// 封面图片URL
    pub image_url: String,
    /// 最新章节标签
    pub chapter: String,
    /// 最新章节URL
    pub chapter_url: String,
}

impl Comic {
    /// 创建一个新的漫画实体
    ///
    /// # 参数
    ///
    /// * `id` - 持久化层分配的标识符
    /// * `page` - 来源站点域名
    /// * `name` - 漫画显示名称
    /// * `url` - 漫画主页URL
    ///
    /// # 返回值
    ///
    /// 返回一个章节字段为空（表示尚未爬取）的漫画实例
    pub fn new(id: i64, page: String, name: String, url: String) -> Self {
        Self {
            id,
            page,
            name,
            url,
            image_url: String::new(),
            chapter: String::new(),
            chapter_url: String::new(),
            updated_at: Utc::now(),
        }
    }

    /// 是否为首次爬取（尚无已知章节URL）
    pub fn is_first_crawl(&self) -> bool {
        self.chapter_url.is_empty()
    }

    /// 用提取结果覆写可变字段
    ///
    /// `page`和`url`保持不变。
    pub fn apply(&mut self, extraction: Extraction) {
        self.name = extraction.name;
        self.image_url = extraction.image_url;
        self.chapter = extraction.chapter;
        self.chapter_url = extraction.chapter_url;
        self.updated_at = Utc::now();
    }

    /// 生成当前时刻的通知快照
    pub fn snapshot(&self) -> ComicSnapshot {
        ComicSnapshot {
            name: self.name.clone(),
            chapter: self.chapter.clone(),
            chapter_url: self.chapter_url.clone(),
        }
    }
}
