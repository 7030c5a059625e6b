// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::GatewaySettings;
use crate::domain::messaging::{DeliveryError, MessageGateway};
use crate::domain::models::comic::ComicSnapshot;
use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::json;
use std::time::Duration;
use tracing::info;

/// HTTP消息推送网关
///
/// 向配置的端点POST一条JSON消息。端点与访问令牌在构造时
/// 显式传入，不依赖任何进程级状态。
pub struct PushGateway {
    client: Client,
    endpoint: String,
    token: String,
    timeout: Duration,
}

impl PushGateway {
    /// 创建新的消息推送网关实例
    ///
    /// # 参数
    ///
    /// * `settings` - 网关配置
    ///
    /// # 返回值
    ///
    /// 返回新的消息推送网关实例
    pub fn new(settings: &GatewaySettings) -> Self {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("Comicwatch-Push/0.1.0"),
        );
        Self {
            client: Client::builder()
                .default_headers(headers)
                .build()
                .unwrap_or_else(|_| Client::new()),
            endpoint: settings.endpoint.clone(),
            token: settings.token.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }
}

#[async_trait]
impl MessageGateway for PushGateway {
    async fn deliver(&self, recipient: &str, comic: &ComicSnapshot) -> Result<(), DeliveryError> {
        let payload = json!({
            "to": recipient,
            "messages": [{
                "type": "text",
                "text": format!("{} {}\n{}", comic.name, comic.chapter, comic.chapter_url),
            }],
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&payload)
            .timeout(self.timeout)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                info!("Notification delivered to {}", recipient);
                Ok(())
            }
            Ok(resp) => Err(DeliveryError::Failed(format!(
                "push endpoint returned {}",
                resp.status()
            ))),
            Err(e) if e.is_timeout() => Err(DeliveryError::Timeout),
            Err(e) => Err(DeliveryError::Failed(e.to_string())),
        }
    }
}
