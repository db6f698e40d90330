//! 模型定义系统模块
//!
//! 字段描述符、模型元数据（继承链上的字段与配置合并）、
//! 模型实例以及类型化模型的宏

pub mod convenience;
pub mod field_types;
pub mod instance;
pub mod macros;
pub mod meta;
pub mod traits;

// 重新导出核心类型
pub use convenience::*;
pub use field_types::{BooleanField, FloatField, IntegerField, ModelField, StringField};
pub use instance::{FrozenInstance, ModelInstance};
pub use meta::{HashFn, HashStrategy, ModelBuilder, ModelMeta};
pub use traits::Model;
