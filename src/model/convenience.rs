//! 模型便捷函数模块
//!
//! 提供创建各种字段构建器的便捷函数

use crate::model::field_types::{BooleanField, FloatField, IntegerField, StringField};
use crate::validator::StringFormat;

/// 便捷函数：创建字符串字段
pub fn string_field() -> StringField {
    StringField::new()
}

/// 便捷函数：创建布尔字段
pub fn boolean_field() -> BooleanField {
    BooleanField::new()
}

/// 便捷函数：创建整数字段
pub fn integer_field() -> IntegerField {
    IntegerField::new()
}

/// 便捷函数：创建浮点数字段
pub fn float_field() -> FloatField {
    FloatField::new()
}

/// 便捷函数：创建日期字段（字符串字段，格式为 date）
pub fn date_field() -> StringField {
    StringField::new().format(StringFormat::Date)
}

/// 便捷函数：创建日期时间字段
///
/// 带时区偏移的输入解析为带时区的日期时间，否则为本地日期时间
pub fn datetime_field() -> StringField {
    StringField::new().format(StringFormat::DateTime)
}

/// 便捷函数：创建UUID字段
pub fn uuid_field() -> StringField {
    StringField::new().format(StringFormat::Uuid)
}

/// 便捷函数：创建邮箱字段
pub fn email_field() -> StringField {
    StringField::new().format(StringFormat::Email)
}
