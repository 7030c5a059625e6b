// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::comic::ComicSnapshot;
use serde::{Deserialize, Serialize};

/// 通知任务实体
///
/// 表示一条待投递的更新通知。任务始终归属于其当前所在的
/// 队列（新任务队列或重试队列），投递成功或达到重试上限后销毁。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationTask {
    /// 接收者标识符
    pub recipient: String,
    /// 分发时刻的漫画快照
    pub comic: ComicSnapshot,
    /// 已尝试投递次数
    pub attempt_count: u32,
}

impl NotificationTask {
    /// 创建一个新的通知任务
    ///
    /// # 参数
    ///
    /// * `recipient` - 接收者标识符
    /// * `comic` - 分发时刻的漫画快照
    ///
    /// # 返回值
    ///
    /// 返回尝试计数为零的新任务
    pub fn new(recipient: String, comic: ComicSnapshot) -> Self {
        Self {
            recipient,
            comic,
            attempt_count: 0,
        }
    }

    /// 是否还允许再次投递
    pub fn can_retry(&self, max_retries: u32) -> bool {
        self.attempt_count < max_retries
    }
}
