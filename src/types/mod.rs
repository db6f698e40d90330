//! 通用数据类型定义
//!
//! 定义模型字段使用的数据值类型

pub mod data_value;

// 重新导出所有公共类型以保持API兼容性
pub use data_value::{json_object_to_data_map, json_value_to_data_value, DataValue};
