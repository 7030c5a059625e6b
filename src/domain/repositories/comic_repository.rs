// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::comic::Comic;
use async_trait::async_trait;
use thiserror::Error;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("数据库错误: {0}")]
    Database(String),
    /// 记录未找到
    #[error("未找到数据")]
    NotFound,
}

/// 漫画仓库特质
///
/// 定义漫画数据访问接口。本子系统每个轮询周期读取一次清单，
/// 仅对发生更新的漫画发出一次update调用。
#[async_trait]
pub trait ComicRepository: Send + Sync {
    /// 列出全部被跟踪的漫画
    async fn list(&self) -> Result<Vec<Comic>, RepositoryError>;
    /// 更新漫画记录
    async fn update(&self, comic: &Comic) -> Result<(), RepositoryError>;
}
