//! # 配置管理模块
//!
//! 模型配置、配置层合并与构建器

pub mod builders;
pub mod core;

// 重新导出所有公共类型以保持API兼容性
pub use builders::ModelConfigBuilder;
pub use self::core::{inherit_config, ConfigOverrides, ExtraFields, ModelConfig};
