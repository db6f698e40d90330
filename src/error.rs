//! 错误处理模块
//!
//! 定义模型层的统一错误类型，以及字段验证失败时携带的结构化错误信息

use crate::i18n;
use crate::types::DataValue;
use crate::validator::{Bound, StringFormat};
use std::fmt;
use thiserror::Error;

/// 模型层结果类型
pub type JsonDbResult<T> = Result<T, JsonDbError>;

/// 模型层错误类型
#[derive(Error, Debug)]
pub enum JsonDbError {
    /// 字符串字段声明了不支持的格式标签
    #[error("无效的格式 '{fmt}'，必须是以下之一: {}", .allowed.join(", "))]
    InvalidFormat {
        fmt: String,
        allowed: Vec<&'static str>,
    },

    /// 字符串字段的正则表达式无法编译
    #[error("无效的正则表达式 '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// 同时使用了嵌套配置和配置关键字参数
    #[error("在两个不同位置指定配置会造成混淆，请只使用嵌套配置或配置关键字参数之一")]
    DuplicateConfig,

    /// 配置关键字参数的值类型不正确
    #[error("配置项 '{key}' 的值无效，期望 {expected}")]
    InvalidConfigValue { key: String, expected: &'static str },

    /// 字段验证失败
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// 不可变模型的字段被重新赋值
    #[error("字段 '{field}' 属于不可变模型，不能重新赋值")]
    FrozenField { field: String },

    /// 访问了模型未声明的字段
    #[error("'{model}' 没有字段 '{field}'")]
    FieldNotFound { model: String, field: String },

    /// 非不可变模型不能按字段值计算哈希
    #[error("模型 '{model}' 不是不可变模型，无法按字段值计算哈希")]
    NotHashable { model: String },

    /// 字段描述符在绑定名称之前被使用
    #[error("字段描述符尚未绑定到模型")]
    UnboundField,

    /// 实例数据缺少已声明字段（内部不变量被破坏）
    #[error("模型 '{model}' 的实例数据缺少字段 '{field}'")]
    MissingData { model: String, field: String },

    /// 输入数据不是键值映射
    #[error("无效的输入数据: {message}")]
    InvalidInput { message: String },

    /// 配置错误
    #[error("配置错误: {message}")]
    ConfigError { message: String },

    /// IO错误
    #[error("IO错误: {0}")]
    IoError(#[from] std::io::Error),
}

/// 字段验证错误
///
/// 三种形态互不转换：默认值验证、单字段赋值验证、整体映射构造验证
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// 字段声明的默认值不满足字段自身的约束
    #[error("默认值验证失败: {0}")]
    DefaultValue(FieldError),

    /// 对单个字段赋值时验证失败
    #[error("字段赋值验证失败: {0}")]
    Assignment(FieldError),

    /// 构造模型实例时整体映射验证失败
    #[error("模型 '{model}' 验证失败: {}", join_errors(.errors))]
    Construction {
        model: String,
        errors: Vec<FieldError>,
    },
}

impl ValidationError {
    /// 获取所有字段错误
    pub fn errors(&self) -> &[FieldError] {
        match self {
            ValidationError::DefaultValue(error) | ValidationError::Assignment(error) => {
                std::slice::from_ref(error)
            }
            ValidationError::Construction { errors, .. } => errors,
        }
    }

    /// 按字段名查找错误
    pub fn error_for(&self, field: &str) -> Option<&FieldError> {
        self.errors().iter().find(|e| e.field == field)
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// 单个字段的验证错误
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    /// 字段名
    pub field: String,
    /// 调用方实际提供的原始值，必填字段缺失时为 None
    pub value: Option<DataValue>,
    /// 机器可读的错误码
    pub code: ErrorCode,
    /// 本地化的错误消息
    pub message: String,
}

impl FieldError {
    /// 创建字段错误，消息由错误码生成
    pub fn new(field: impl Into<String>, value: Option<DataValue>, code: ErrorCode) -> Self {
        let message = code.message();
        Self {
            field: field.into(),
            value,
            code,
            message,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={:?}: {}", self.field, value, self.message),
            None => write!(f, "{}: {}", self.field, self.message),
        }
    }
}

/// 约束失败的错误码
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorCode {
    /// 类型不匹配，携带期望的类型名
    Type { expected: &'static str },
    Null,
    Blank,
    MinLength(usize),
    MaxLength(usize),
    Pattern(String),
    /// 字符串不符合格式的语法
    Format(StringFormat),
    /// 语法正确但取值不存在（如 2月30日）
    InvalidValue(StringFormat),
    Integer,
    Finite,
    Minimum(Bound),
    ExclusiveMinimum(Bound),
    Maximum(Bound),
    ExclusiveMaximum(Bound),
    Required,
    InvalidProperty,
}

impl ErrorCode {
    /// 生成本地化的错误消息
    pub fn message(&self) -> String {
        match self {
            ErrorCode::Type { expected } => match *expected {
                "string" => i18n::message("validation.type_string", &[], "Must be a string."),
                "boolean" => {
                    i18n::message("validation.type_boolean", &[], "Must be a valid boolean.")
                }
                _ => i18n::message("validation.type_number", &[], "Must be a number."),
            },
            ErrorCode::Null => i18n::message("validation.null", &[], "May not be null."),
            ErrorCode::Blank => i18n::message("validation.blank", &[], "Must not be blank."),
            ErrorCode::MinLength(min) => i18n::message(
                "validation.min_length",
                &[("min_length", min.to_string().as_str())],
                "Must have at least {min_length} characters.",
            ),
            ErrorCode::MaxLength(max) => i18n::message(
                "validation.max_length",
                &[("max_length", max.to_string().as_str())],
                "Must have no more than {max_length} characters.",
            ),
            ErrorCode::Pattern(pattern) => i18n::message(
                "validation.pattern",
                &[("pattern", pattern.as_str())],
                "Must match the pattern /{pattern}/.",
            ),
            ErrorCode::Format(format) => format_message(*format),
            ErrorCode::InvalidValue(format) => i18n::message(
                "validation.invalid_value",
                &[("format", format.as_str())],
                "Must be a real {format}.",
            ),
            ErrorCode::Integer => i18n::message("validation.integer", &[], "Must be an integer."),
            ErrorCode::Finite => i18n::message("validation.finite", &[], "Must be finite."),
            ErrorCode::Minimum(bound) => i18n::message(
                "validation.minimum",
                &[("minimum", bound.to_string().as_str())],
                "Must be greater than or equal to {minimum}.",
            ),
            ErrorCode::ExclusiveMinimum(bound) => i18n::message(
                "validation.exclusive_minimum",
                &[("exclusive_minimum", bound.to_string().as_str())],
                "Must be greater than {exclusive_minimum}.",
            ),
            ErrorCode::Maximum(bound) => i18n::message(
                "validation.maximum",
                &[("maximum", bound.to_string().as_str())],
                "Must be less than or equal to {maximum}.",
            ),
            ErrorCode::ExclusiveMaximum(bound) => i18n::message(
                "validation.exclusive_maximum",
                &[("exclusive_maximum", bound.to_string().as_str())],
                "Must be less than {exclusive_maximum}.",
            ),
            ErrorCode::Required => {
                i18n::message("validation.required", &[], "This field is required.")
            }
            ErrorCode::InvalidProperty => {
                i18n::message("validation.invalid_property", &[], "Invalid property name.")
            }
        }
    }
}

fn format_message(format: StringFormat) -> String {
    match format {
        StringFormat::Uuid => i18n::message("validation.format_uuid", &[], "Must be valid UUID format."),
        StringFormat::IpAddress => i18n::message(
            "validation.format_ipaddress",
            &[],
            "Must be a valid IPv4 or IPv6 address format.",
        ),
        StringFormat::Url => i18n::message("validation.format_url", &[], "Must be a valid URL format."),
        other => i18n::message(
            "validation.format",
            &[("format", other.as_str())],
            "Must be a valid {format} format.",
        ),
    }
}

/// 便捷宏：构造常用错误
#[macro_export]
macro_rules! jsondb_error {
    (config, $message:expr) => {
        $crate::error::JsonDbError::ConfigError {
            message: $message.to_string(),
        }
    };
    (field_not_found, $model:expr, $field:expr) => {
        $crate::error::JsonDbError::FieldNotFound {
            model: $model.to_string(),
            field: $field.to_string(),
        }
    };
    (frozen, $field:expr) => {
        $crate::error::JsonDbError::FrozenField {
            field: $field.to_string(),
        }
    };
    (missing_data, $model:expr, $field:expr) => {
        $crate::error::JsonDbError::MissingData {
            model: $model.to_string(),
            field: $field.to_string(),
        }
    };
    (config_value, $key:expr, $expected:expr) => {
        $crate::error::JsonDbError::InvalidConfigValue {
            key: $key.to_string(),
            expected: $expected,
        }
    };
}
