// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 页面抓取模块
///
/// 定义页面源码获取的抽象接口及其HTTP实现。
/// 抓取只返回原始HTML文本；解析在调用方同步完成，
/// 解析后的文档不得跨越await点持有。
pub mod http_fetcher;

pub use http_fetcher::HttpFetcher;

use async_trait::async_trait;
use thiserror::Error;

/// 抓取错误类型
#[derive(Debug, Error, Clone)]
pub enum FetchError {
    /// 请求失败
    #[error("Request failed: {0}")]
    Request(String),
    /// 非成功状态码
    #[error("Status {0} for {1}")]
    Status(u16, String),
    /// 请求超时
    #[error("Request timeout")]
    Timeout,
}

/// 页面抓取特质
///
/// 纯I/O，无状态，返回页面的原始HTML文本
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 抓取指定URL的页面源码
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}
