//! csvpad - CSV 文本编辑器的项目管理内核
//!
//! 模块结构：
//! - core: 服务定位（按类型 + tag 解析共享实例）
//! - models: 数据模型（Project, 关闭事件, CSV 行格式化）
//! - kernel: 项目管理、观察者与宿主循环，以及服务层（ports + adapters）

pub mod core;
pub mod kernel;
pub mod models;
