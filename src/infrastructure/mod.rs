// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节，提供对具体技术的抽象和封装。
///
/// 包含的子模块：
/// - 站点适配器（sites）：各漫画站点的提取实现与注册表
/// - 仓库实现（repositories）：领域仓库接口的进程内实现
/// - 消息投递（messaging）：消息网关的HTTP实现
///
/// 基础设施层遵循依赖倒置原则，依赖于领域层的抽象接口，
/// 确保领域层保持纯粹的业务逻辑，不受技术实现的影响。
pub mod messaging;
pub mod repositories;
pub mod sites;
