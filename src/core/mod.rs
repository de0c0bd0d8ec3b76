//! 核心框架模块
//!
//! - Service: 服务定位与依赖注入（按类型 + tag 解析共享实例）

pub mod service;

pub use service::{ServiceError, ServiceLocator};
