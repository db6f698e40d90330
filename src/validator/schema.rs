//! 组合模式验证
//!
//! 按字段顺序验证整个输入映射，收集所有字段错误后一次性返回

use super::FieldValidator;
use crate::debug_log;
use crate::error::{ErrorCode, FieldError};
use crate::types::DataValue;
use std::collections::HashMap;

/// 有序字段集合
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub fields: Vec<(String, FieldValidator)>,
    /// 是否接受（并丢弃）未声明的键
    pub additional_properties: bool,
}

impl Schema {
    pub fn new(fields: Vec<(String, FieldValidator)>, additional_properties: bool) -> Self {
        Self {
            fields,
            additional_properties,
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValidator> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, validator)| validator)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 验证输入映射
    ///
    /// 错误按字段声明顺序排列，未知键的错误排在最后并按键名排序
    pub fn validate(
        &self,
        input: &HashMap<String, DataValue>,
    ) -> Result<HashMap<String, DataValue>, Vec<FieldError>> {
        let mut output = HashMap::with_capacity(self.fields.len());
        let mut errors = Vec::new();

        for (name, validator) in &self.fields {
            match input.get(name) {
                Some(raw) => match validator.validate(raw) {
                    Ok(value) => {
                        output.insert(name.clone(), value);
                    }
                    Err(code) => errors.push(FieldError::new(name, Some(raw.clone()), code)),
                },
                None => match validator.default_value() {
                    Some(value) => {
                        output.insert(name.clone(), value);
                    }
                    None => errors.push(FieldError::new(name, None, ErrorCode::Required)),
                },
            }
        }

        let mut unknown: Vec<&String> = input.keys().filter(|key| !self.contains(key)).collect();
        unknown.sort();
        if self.additional_properties {
            if !unknown.is_empty() {
                debug_log!("丢弃未声明的键: {:?}", unknown);
            }
        } else {
            for key in unknown {
                errors.push(FieldError::new(
                    key.as_str(),
                    input.get(key).cloned(),
                    ErrorCode::InvalidProperty,
                ));
            }
        }

        if errors.is_empty() {
            Ok(output)
        } else {
            debug_log!("模式验证失败，共 {} 个错误", errors.len());
            Err(errors)
        }
    }
}
