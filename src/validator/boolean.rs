//! 布尔验证器

use super::CommonOptions;
use crate::error::ErrorCode;
use crate::types::DataValue;

/// 布尔验证器
#[derive(Debug, Clone)]
pub struct BooleanValidator {
    pub common: CommonOptions,
}

impl BooleanValidator {
    pub fn new(common: CommonOptions) -> Self {
        Self { common }
    }

    pub fn default_value(&self) -> Option<DataValue> {
        if self.common.default.is_some() {
            return self.common.default.clone();
        }
        self.common.allow_null.then_some(DataValue::Null)
    }

    pub fn validate(&self, value: &DataValue) -> Result<DataValue, ErrorCode> {
        let type_error = ErrorCode::Type { expected: "boolean" };
        match value {
            DataValue::Null if self.common.allow_null => Ok(DataValue::Null),
            DataValue::Null => Err(ErrorCode::Null),
            DataValue::Bool(b) => Ok(DataValue::Bool(*b)),
            _ if !self.common.coerce_types => Err(type_error),
            DataValue::String(s) => {
                let lowered = s.to_lowercase();
                if self.common.allow_null && matches!(lowered.as_str(), "" | "null" | "none") {
                    return Ok(DataValue::Null);
                }
                match lowered.as_str() {
                    "true" | "on" | "1" => Ok(DataValue::Bool(true)),
                    "false" | "off" | "0" | "" => Ok(DataValue::Bool(false)),
                    _ => Err(type_error),
                }
            }
            DataValue::Int(1) => Ok(DataValue::Bool(true)),
            DataValue::Int(0) => Ok(DataValue::Bool(false)),
            DataValue::Float(f) if *f == 1.0 => Ok(DataValue::Bool(true)),
            DataValue::Float(f) if *f == 0.0 => Ok(DataValue::Bool(false)),
            _ => Err(type_error),
        }
    }
}
