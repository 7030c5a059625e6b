// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::SpoilerSettings;
use crate::domain::sites::SiteAdapter;
use crate::infrastructure::sites::daum::DaumAdapter;
use crate::infrastructure::sites::kakao::KakaoAdapter;
use crate::infrastructure::sites::naver::NaverAdapter;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// 站点适配器注册表
///
/// 按域名分发到对应的站点适配器。注册在进程启动时完成一次，
/// 此后只读；每部漫画的`page`必须恰好匹配一个已注册的适配器，
/// 否则该漫画视为不受支持。
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn SiteAdapter>>,
}

impl AdapterRegistry {
    /// 创建空的注册表
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// 注册站点适配器
    ///
    /// # 参数
    ///
    /// * `adapter` - 要注册的适配器，按其绑定的域名索引
    pub fn register(&mut self, adapter: Arc<dyn SiteAdapter>) {
        info!("Site adapter registered: {}", adapter.page());
        self.adapters.insert(adapter.page().to_string(), adapter);
    }

    /// 按域名获取适配器
    pub fn get(&self, page: &str) -> Option<Arc<dyn SiteAdapter>> {
        self.adapters.get(page).cloned()
    }

    /// 获取所有已注册的站点域名
    pub fn registered_pages(&self) -> Vec<String> {
        self.adapters.keys().cloned().collect()
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// 创建并注册所有受支持站点的注册表
///
/// # 参数
///
/// * `spoiler` - 剧透检测配置，按站点解析各自的阈值
pub fn create_default_registry(spoiler: &SpoilerSettings) -> AdapterRegistry {
    let mut registry = AdapterRegistry::new();
    registry.register(Arc::new(NaverAdapter::new(
        spoiler.min_items_for(NaverAdapter::PAGE),
    )));
    registry.register(Arc::new(DaumAdapter::new(
        spoiler.min_items_for(DaumAdapter::PAGE),
    )));
    registry.register(Arc::new(KakaoAdapter::new(
        spoiler.min_items_for(KakaoAdapter::PAGE),
    )));
    info!(
        "All site adapters registered: {:?}",
        registry.registered_pages()
    );
    registry
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
