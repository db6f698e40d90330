//! rat_jsondb - 声明式数据模型库
//!
//! 通过字段声明定义模型，构造时按字段约束验证并转换输入数据，
//! 以字典方式只读访问验证后的记录。支持模型继承、不可变模型与可哈希实例。

// 导出所有公共模块
pub mod config;
pub mod error;
pub mod i18n;
pub mod model;
pub mod types;
pub mod validator;

// 宏内部使用
#[doc(hidden)]
pub use once_cell;

// 重新导出常用类型和函数
pub use config::{inherit_config, ConfigOverrides, ExtraFields, ModelConfig, ModelConfigBuilder};
pub use error::{ErrorCode, FieldError, JsonDbError, JsonDbResult, ValidationError};
pub use model::{
    boolean_field, date_field, datetime_field, email_field, float_field, integer_field,
    string_field, uuid_field, BooleanField, FloatField, FrozenInstance, HashFn, HashStrategy,
    IntegerField, Model, ModelBuilder, ModelField, ModelInstance, ModelMeta, StringField,
};
pub use types::*;
pub use validator::{Bound, FieldValidator, Schema, StringFormat, ALLOWED_FORMATS};

// 日志系统导入
use rat_logger::info;

// 条件编译调试宏 - 只有在 debug 模式下才输出调试信息
#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        rat_logger::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        // 在 release 模式下不输出调试信息
    };
}

/// 初始化rat_jsondb库
///
/// 注册多语言消息并根据 `RAT_LANG`/`LANG` 设置语言。
/// 不调用时，首次生成验证消息时也会自动注册翻译。
///
/// 注意：日志系统由调用者自行初始化，本库不会初始化日志
pub fn init() {
    i18n::MessageI18n::init();
    info!("{} 初始化完成，语言: {}", NAME, i18n::current_language());
}

/// 库版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 库名称
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// 获取库信息
pub fn get_info() -> String {
    format!("{} v{}", NAME, VERSION)
}
