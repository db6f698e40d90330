//! 字段类型定义模块
//!
//! 定义模型字段描述符以及各类型字段的构建器。
//! 构建器收集约束选项，`build()` 时验证格式标签、编译正则并验证默认值。

use crate::debug_log;
use crate::error::{FieldError, JsonDbError, JsonDbResult, ValidationError};
use crate::model::instance::ModelInstance;
use crate::types::DataValue;
use crate::validator::{
    BooleanValidator, Bound, CommonOptions, FieldValidator, NumberKind, NumberValidator, StringFormat,
    StringValidator, ALLOWED_FORMATS,
};
use once_cell::sync::OnceCell;
use regex::Regex;

/// 模型字段描述符
///
/// 名称与所属模型在模型构建时绑定且只绑定一次
#[derive(Debug, Clone)]
pub struct ModelField {
    name: OnceCell<String>,
    owner: OnceCell<String>,
    validator: FieldValidator,
    repr: bool,
}

impl ModelField {
    /// 用已构建好的验证器创建字段
    ///
    /// 显式默认值会先经过验证，存储的是转换后的值
    pub fn from_validator(mut validator: FieldValidator, repr: bool) -> JsonDbResult<Self> {
        if let Some(default) = validator.common().default.clone() {
            match validator.validate(&default) {
                Ok(coerced) => validator.common_mut().default = Some(coerced),
                Err(code) => {
                    debug_log!("默认值验证失败: {:?} -> {:?}", default, code);
                    return Err(ValidationError::DefaultValue(FieldError::new(
                        "default",
                        Some(default),
                        code,
                    ))
                    .into());
                }
            }
        }

        Ok(Self {
            name: OnceCell::new(),
            owner: OnceCell::new(),
            validator,
            repr,
        })
    }

    /// 绑定字段名与所属模型
    pub(crate) fn bind(&self, owner: &str, name: &str) {
        if self.name.set(name.to_string()).is_ok() {
            let _ = self.owner.set(owner.to_string());
        }
    }

    /// 返回尚未绑定的副本，用于在另一个模型中重新声明
    pub(crate) fn detached(&self) -> Self {
        Self {
            name: OnceCell::new(),
            owner: OnceCell::new(),
            validator: self.validator.clone(),
            repr: self.repr,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.name.get().is_some()
    }

    /// 字段名
    pub fn name(&self) -> JsonDbResult<&str> {
        self.name
            .get()
            .map(String::as_str)
            .ok_or(JsonDbError::UnboundField)
    }

    /// 声明该字段的模型名
    pub fn owner(&self) -> Option<&str> {
        self.owner.get().map(String::as_str)
    }

    pub fn validator(&self) -> &FieldValidator {
        &self.validator
    }

    /// 是否出现在文本表示中
    pub fn repr(&self) -> bool {
        self.repr
    }

    pub fn read_only(&self) -> bool {
        self.validator.read_only()
    }

    pub fn has_default(&self) -> bool {
        self.validator.has_default()
    }

    pub fn default_value(&self) -> Option<DataValue> {
        self.validator.default_value()
    }

    /// 读取实例中该字段的值
    pub fn get<'a>(&self, instance: &'a ModelInstance) -> JsonDbResult<&'a DataValue> {
        let name = self.name()?;
        instance
            .data()
            .get(name)
            .ok_or_else(|| crate::jsondb_error!(missing_data, instance.meta().name(), name))
    }

    /// 为实例中的该字段赋值
    ///
    /// 不可变模型拒绝赋值；开启 `validate_assignment` 时先验证再写入
    pub fn set(&self, instance: &mut ModelInstance, value: impl Into<DataValue>) -> JsonDbResult<()> {
        let name = self.name()?;
        let value = value.into();
        let config = instance.meta().config();

        if config.frozen {
            return Err(crate::jsondb_error!(frozen, name));
        }

        let stored = if config.validate_assignment {
            self.validator.validate(&value).map_err(|code| {
                debug_log!("字段 {} 赋值验证失败: {:?}", name, code);
                JsonDbError::from(ValidationError::Assignment(FieldError::new(
                    name,
                    Some(value.clone()),
                    code,
                )))
            })?
        } else {
            value
        };

        instance.data_mut().insert(name.to_string(), stored);
        Ok(())
    }

    /// 从实例中删除该字段的值
    pub fn delete(&self, instance: &mut ModelInstance) -> JsonDbResult<Option<DataValue>> {
        let name = self.name()?;
        if instance.meta().config().frozen {
            return Err(crate::jsondb_error!(frozen, name));
        }
        Ok(instance.data_mut().remove(name))
    }
}

/// 所有字段构建器共享的选项方法
macro_rules! common_field_options {
    () => {
        /// 是否允许 null
        pub fn nullable(mut self, nullable: bool) -> Self {
            self.common.allow_null = nullable;
            self
        }

        /// 设置默认值，`DataValue::Null` 表示显式的 null 默认值
        pub fn default(mut self, value: impl Into<DataValue>) -> Self {
            self.common.default = Some(value.into());
            self
        }

        /// 只读字段构造时总是取默认值
        pub fn read_only(mut self, read_only: bool) -> Self {
            self.common.read_only = read_only;
            self
        }

        /// 是否进行类型转换
        pub fn coerce_types(mut self, coerce: bool) -> Self {
            self.common.coerce_types = coerce;
            self
        }

        /// 是否出现在文本表示中
        pub fn repr(mut self, repr: bool) -> Self {
            self.repr = repr;
            self
        }
    };
}

/// 字符串字段构建器
#[derive(Debug, Clone)]
pub struct StringField {
    common: CommonOptions,
    allow_blank: bool,
    trim_whitespace: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<String>,
    fmt: Option<String>,
    repr: bool,
}

impl StringField {
    pub fn new() -> Self {
        Self {
            common: CommonOptions::default(),
            allow_blank: false,
            trim_whitespace: true,
            min_length: None,
            max_length: None,
            pattern: None,
            fmt: None,
            repr: true,
        }
    }

    common_field_options!();

    pub fn allow_blank(mut self, allow: bool) -> Self {
        self.allow_blank = allow;
        self
    }

    pub fn trim_whitespace(mut self, trim: bool) -> Self {
        self.trim_whitespace = trim;
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// 正则表达式，按搜索语义匹配
    pub fn pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_string());
        self
    }

    /// 格式标签，必须属于 [`ALLOWED_FORMATS`]，在 `build()` 时检查
    pub fn fmt(mut self, fmt: &str) -> Self {
        self.fmt = Some(fmt.to_string());
        self
    }

    pub fn format(mut self, format: StringFormat) -> Self {
        self.fmt = Some(format.as_str().to_string());
        self
    }

    pub fn build(self) -> JsonDbResult<ModelField> {
        let format = match self.fmt {
            Some(fmt) => Some(fmt.parse::<StringFormat>().map_err(|_| {
                JsonDbError::InvalidFormat {
                    fmt,
                    allowed: ALLOWED_FORMATS.to_vec(),
                }
            })?),
            None => None,
        };

        let pattern = match self.pattern {
            Some(pattern) => Some(Regex::new(&pattern).map_err(|e| JsonDbError::InvalidPattern {
                message: e.to_string(),
                pattern,
            })?),
            None => None,
        };

        let validator = StringValidator {
            common: self.common,
            allow_blank: self.allow_blank,
            trim_whitespace: self.trim_whitespace,
            min_length: self.min_length,
            max_length: self.max_length,
            pattern,
            format,
        };
        ModelField::from_validator(FieldValidator::String(validator), self.repr)
    }
}

/// 布尔字段构建器
#[derive(Debug, Clone)]
pub struct BooleanField {
    common: CommonOptions,
    repr: bool,
}

impl BooleanField {
    pub fn new() -> Self {
        Self {
            common: CommonOptions::default(),
            repr: true,
        }
    }

    common_field_options!();

    pub fn build(self) -> JsonDbResult<ModelField> {
        ModelField::from_validator(
            FieldValidator::Boolean(BooleanValidator::new(self.common)),
            self.repr,
        )
    }
}

/// 数值字段构建器：`ge`/`le` 为闭区间边界，`gt`/`lt` 为开区间边界
macro_rules! number_field {
    ($(#[$doc:meta])* $name:ident, $kind:expr, $variant:ident, $bound:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name {
            common: CommonOptions,
            minimum: Option<Bound>,
            maximum: Option<Bound>,
            exclusive_minimum: Option<Bound>,
            exclusive_maximum: Option<Bound>,
            repr: bool,
        }

        impl $name {
            pub fn new() -> Self {
                Self {
                    common: CommonOptions::default(),
                    minimum: None,
                    maximum: None,
                    exclusive_minimum: None,
                    exclusive_maximum: None,
                    repr: true,
                }
            }

            common_field_options!();

            /// 大于等于
            pub fn ge(mut self, bound: $bound) -> Self {
                self.minimum = Some(Bound::from(bound));
                self
            }

            /// 小于等于
            pub fn le(mut self, bound: $bound) -> Self {
                self.maximum = Some(Bound::from(bound));
                self
            }

            /// 大于
            pub fn gt(mut self, bound: $bound) -> Self {
                self.exclusive_minimum = Some(Bound::from(bound));
                self
            }

            /// 小于
            pub fn lt(mut self, bound: $bound) -> Self {
                self.exclusive_maximum = Some(Bound::from(bound));
                self
            }

            pub fn build(self) -> JsonDbResult<ModelField> {
                let mut validator = NumberValidator::new($kind, self.common);
                validator.minimum = self.minimum;
                validator.maximum = self.maximum;
                validator.exclusive_minimum = self.exclusive_minimum;
                validator.exclusive_maximum = self.exclusive_maximum;
                ModelField::from_validator(FieldValidator::$variant(validator), self.repr)
            }
        }
    };
}

number_field!(
    /// 整数字段构建器
    IntegerField,
    NumberKind::Integer,
    Integer,
    i64
);
number_field!(
    /// 浮点数字段构建器
    FloatField,
    NumberKind::Float,
    Float,
    f64
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_unknown_format_rejected_at_build() {
        let err = StringField::new().fmt("text").build().unwrap_err();
        match err {
            JsonDbError::InvalidFormat { fmt, allowed } => {
                assert_eq!(fmt, "text");
                assert_eq!(allowed.len(), ALLOWED_FORMATS.len());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_pattern_rejected_at_build() {
        let err = StringField::new().pattern("([a-z").build().unwrap_err();
        assert!(matches!(err, JsonDbError::InvalidPattern { .. }));
    }

    #[test]
    fn test_default_is_validated_and_coerced() {
        let err = IntegerField::new().ge(0).default(-1i64).build().unwrap_err();
        match err {
            JsonDbError::Validation(ValidationError::DefaultValue(entry)) => {
                assert_eq!(entry.field, "default");
                assert_eq!(entry.value, Some(DataValue::Int(-1)));
                assert_eq!(entry.code, ErrorCode::Minimum(Bound::Int(0)));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let field = StringField::new().default("  guest ").build().unwrap();
        assert_eq!(field.default_value(), Some(DataValue::from("guest")));
    }

    #[test]
    fn test_explicit_null_default_is_validated() {
        assert!(BooleanField::new().default(DataValue::Null).build().is_err());
        let field = BooleanField::new()
            .nullable(true)
            .default(DataValue::Null)
            .build()
            .unwrap();
        assert!(field.has_default());
    }

    #[test]
    fn test_unbound_field_has_no_name() {
        let field = FloatField::new().build().unwrap();
        assert!(matches!(field.name(), Err(JsonDbError::UnboundField)));
        field.bind("Point", "x");
        field.bind("Other", "y");
        assert_eq!(field.name().unwrap(), "x");
        assert_eq!(field.owner(), Some("Point"));
        assert!(!field.detached().is_bound());
    }
}
