// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::comic::ComicSnapshot;
use async_trait::async_trait;
use thiserror::Error;

/// 消息投递错误类型
#[derive(Error, Debug, Clone)]
pub enum DeliveryError {
    /// 投递失败
    #[error("Delivery failed: {0}")]
    Failed(String),
    /// 投递超时
    #[error("Delivery timeout")]
    Timeout,
}

/// 消息网关特质
///
/// 出站消息投递的抽象接口。对本核心而言投递是一个可能失败的
/// 黑盒调用，失败由通知分发器的重试策略处理。
#[async_trait]
pub trait MessageGateway: Send + Sync {
    /// 向单个接收者投递一条更新通知
    async fn deliver(&self, recipient: &str, comic: &ComicSnapshot) -> Result<(), DeliveryError>;
}
