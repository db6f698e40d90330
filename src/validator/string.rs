//! 字符串验证器

use super::formats::StringFormat;
use super::CommonOptions;
use crate::error::ErrorCode;
use crate::types::DataValue;
use regex::Regex;

/// 字符串验证器
#[derive(Debug, Clone)]
pub struct StringValidator {
    pub common: CommonOptions,
    /// 是否允许空字符串
    pub allow_blank: bool,
    /// 是否去除首尾空白
    pub trim_whitespace: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    /// 已编译的正则表达式，按搜索语义匹配
    pub pattern: Option<Regex>,
    pub format: Option<StringFormat>,
}

impl StringValidator {
    /// 创建默认的字符串验证器：不可为空、不允许空白、去除首尾空白
    pub fn new(common: CommonOptions) -> Self {
        Self {
            common,
            allow_blank: false,
            trim_whitespace: true,
            min_length: None,
            max_length: None,
            pattern: None,
            format: None,
        }
    }

    /// 未声明默认值时，可空字段默认为 null，允许空白的字段默认为空字符串
    pub fn default_value(&self) -> Option<DataValue> {
        if self.common.default.is_some() {
            return self.common.default.clone();
        }
        if self.common.allow_null {
            Some(DataValue::Null)
        } else if self.allow_blank {
            Some(DataValue::String(String::new()))
        } else {
            None
        }
    }

    pub fn validate(&self, value: &DataValue) -> Result<DataValue, ErrorCode> {
        let raw = match value {
            DataValue::Null if self.common.allow_null => return Ok(DataValue::Null),
            DataValue::Null if self.allow_blank && self.common.coerce_types => {
                return Ok(DataValue::String(String::new()));
            }
            DataValue::Null => return Err(ErrorCode::Null),
            native if self.format.is_some_and(|f| f.is_native(native)) => {
                return Ok(native.clone());
            }
            DataValue::String(s) => s,
            _ => return Err(ErrorCode::Type { expected: "string" }),
        };

        // 空字符总是无效的
        let mut text = raw.replace('\0', "");
        if self.trim_whitespace {
            text = text.trim().to_string();
        }

        if text.is_empty() && !self.allow_blank {
            if self.common.allow_null && self.common.coerce_types {
                return Ok(DataValue::Null);
            }
            return Err(ErrorCode::Blank);
        }

        let length = text.chars().count();
        if let Some(min_length) = self.min_length {
            if length < min_length {
                return Err(ErrorCode::MinLength(min_length));
            }
        }
        if let Some(max_length) = self.max_length {
            if length > max_length {
                return Err(ErrorCode::MaxLength(max_length));
            }
        }
        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(&text) {
                return Err(ErrorCode::Pattern(pattern.as_str().to_string()));
            }
        }
        if let Some(format) = self.format {
            return format.validate(&text);
        }

        Ok(DataValue::String(text))
    }
}
