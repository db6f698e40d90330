//! 约束验证模块
//!
//! 每种字段类型对应一个验证器，负责类型强制转换与约束检查。
//! 模型层只通过 [`FieldValidator`] 与 [`Schema`] 使用本模块。

pub mod boolean;
pub mod formats;
pub mod number;
pub mod schema;
pub mod string;

pub use boolean::BooleanValidator;
pub use formats::{StringFormat, ALLOWED_FORMATS};
pub use number::{Bound, NumberKind, NumberValidator};
pub use schema::Schema;
pub use string::StringValidator;

use crate::error::ErrorCode;
use crate::types::DataValue;

/// 所有验证器共享的选项
#[derive(Debug, Clone, PartialEq)]
pub struct CommonOptions {
    /// 是否允许 null
    pub allow_null: bool,
    /// 显式默认值，None 表示未声明
    pub default: Option<DataValue>,
    pub read_only: bool,
    /// 是否尝试把输入转换为目标类型
    pub coerce_types: bool,
}

impl Default for CommonOptions {
    fn default() -> Self {
        Self {
            allow_null: false,
            default: None,
            read_only: false,
            coerce_types: true,
        }
    }
}

/// 字段验证器
#[derive(Debug, Clone)]
pub enum FieldValidator {
    String(StringValidator),
    Boolean(BooleanValidator),
    Integer(NumberValidator),
    Float(NumberValidator),
}

impl FieldValidator {
    pub fn validate(&self, value: &DataValue) -> Result<DataValue, ErrorCode> {
        match self {
            FieldValidator::String(v) => v.validate(value),
            FieldValidator::Boolean(v) => v.validate(value),
            FieldValidator::Integer(v) | FieldValidator::Float(v) => v.validate(value),
        }
    }

    pub fn common(&self) -> &CommonOptions {
        match self {
            FieldValidator::String(v) => &v.common,
            FieldValidator::Boolean(v) => &v.common,
            FieldValidator::Integer(v) | FieldValidator::Float(v) => &v.common,
        }
    }

    pub(crate) fn common_mut(&mut self) -> &mut CommonOptions {
        match self {
            FieldValidator::String(v) => &mut v.common,
            FieldValidator::Boolean(v) => &mut v.common,
            FieldValidator::Integer(v) | FieldValidator::Float(v) => &mut v.common,
        }
    }

    pub fn read_only(&self) -> bool {
        self.common().read_only
    }

    /// 是否显式声明了默认值
    pub fn has_default(&self) -> bool {
        self.common().default.is_some()
    }

    /// 缺失字段使用的值，包括可空字段隐含的 null
    pub fn default_value(&self) -> Option<DataValue> {
        match self {
            FieldValidator::String(v) => v.default_value(),
            FieldValidator::Boolean(v) => v.default_value(),
            FieldValidator::Integer(v) | FieldValidator::Float(v) => v.default_value(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValidator::String(_) => "string",
            FieldValidator::Boolean(_) => "boolean",
            FieldValidator::Integer(_) => "integer",
            FieldValidator::Float(_) => "float",
        }
    }
}
