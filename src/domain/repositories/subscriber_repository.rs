// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::comic_repository::RepositoryError;
use async_trait::async_trait;

/// 订阅者仓库特质
///
/// 查询某部漫画的当前订阅者清单，每次成功更新后调用一次
#[async_trait]
pub trait SubscriberRepository: Send + Sync {
    /// 列出指定漫画的订阅者标识符
    async fn list_subscribers(&self, comic_id: i64) -> Result<Vec<String>, RepositoryError>;
}
