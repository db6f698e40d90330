//! 数值验证器（整数与浮点数）

use super::CommonOptions;
use crate::error::ErrorCode;
use crate::types::DataValue;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// 数值种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumberKind {
    Integer,
    Float,
}

/// 数值边界
///
/// 整数字段的边界以 i64 精确保存，与整数值比较时不经过浮点数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Bound {
    Int(i64),
    Float(f64),
}

impl From<i64> for Bound {
    fn from(value: i64) -> Self {
        Bound::Int(value)
    }
}

impl From<f64> for Bound {
    fn from(value: f64) -> Self {
        Bound::Float(value)
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Int(i) => write!(f, "{}", i),
            Bound::Float(x) => write!(f, "{:?}", x),
        }
    }
}

/// 数值验证器
#[derive(Debug, Clone)]
pub struct NumberValidator {
    pub kind: NumberKind,
    pub common: CommonOptions,
    pub minimum: Option<Bound>,
    pub maximum: Option<Bound>,
    pub exclusive_minimum: Option<Bound>,
    pub exclusive_maximum: Option<Bound>,
}

impl NumberValidator {
    pub fn new(kind: NumberKind, common: CommonOptions) -> Self {
        Self {
            kind,
            common,
            minimum: None,
            maximum: None,
            exclusive_minimum: None,
            exclusive_maximum: None,
        }
    }

    pub fn default_value(&self) -> Option<DataValue> {
        if self.common.default.is_some() {
            return self.common.default.clone();
        }
        self.common.allow_null.then_some(DataValue::Null)
    }

    pub fn validate(&self, value: &DataValue) -> Result<DataValue, ErrorCode> {
        let type_error = ErrorCode::Type { expected: "number" };
        let coerce = self.common.coerce_types;

        let number = match value {
            DataValue::Null if self.common.allow_null => return Ok(DataValue::Null),
            DataValue::Null => return Err(ErrorCode::Null),
            DataValue::String(s) if s.is_empty() && self.common.allow_null && coerce => {
                return Ok(DataValue::Null);
            }
            DataValue::Int(i) => match self.kind {
                NumberKind::Integer => DataValue::Int(*i),
                NumberKind::Float => DataValue::Float(*i as f64),
            },
            DataValue::Float(f) => match self.kind {
                NumberKind::Integer => DataValue::Int(integral(*f)?),
                NumberKind::Float => DataValue::Float(*f),
            },
            DataValue::String(s) if coerce => self.parse(s.trim())?,
            _ => return Err(type_error),
        };

        if let DataValue::Float(f) = number {
            if !f.is_finite() {
                return Err(ErrorCode::Finite);
            }
        }
        self.check_bounds(&number)?;
        Ok(number)
    }

    fn parse(&self, text: &str) -> Result<DataValue, ErrorCode> {
        let type_error = ErrorCode::Type { expected: "number" };
        match self.kind {
            NumberKind::Integer => match text.parse::<i64>() {
                Ok(i) => Ok(DataValue::Int(i)),
                Err(_) => {
                    let f = text.parse::<f64>().map_err(|_| type_error)?;
                    Ok(DataValue::Int(integral(f)?))
                }
            },
            NumberKind::Float => text
                .parse::<f64>()
                .map(DataValue::Float)
                .map_err(|_| type_error),
        }
    }

    fn check_bounds(&self, value: &DataValue) -> Result<(), ErrorCode> {
        if let Some(minimum) = self.minimum {
            if compare(value, minimum) == Some(Ordering::Less) {
                return Err(ErrorCode::Minimum(minimum));
            }
        }
        if let Some(exclusive_minimum) = self.exclusive_minimum {
            if matches!(compare(value, exclusive_minimum), Some(Ordering::Less | Ordering::Equal)) {
                return Err(ErrorCode::ExclusiveMinimum(exclusive_minimum));
            }
        }
        if let Some(maximum) = self.maximum {
            if compare(value, maximum) == Some(Ordering::Greater) {
                return Err(ErrorCode::Maximum(maximum));
            }
        }
        if let Some(exclusive_maximum) = self.exclusive_maximum {
            if matches!(compare(value, exclusive_maximum), Some(Ordering::Greater | Ordering::Equal)) {
                return Err(ErrorCode::ExclusiveMaximum(exclusive_maximum));
            }
        }
        Ok(())
    }
}

/// 2^63，i64 范围之外的第一个浮点数
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// 比较数值与边界，整数之间精确比较；NaN 边界无法比较
fn compare(value: &DataValue, bound: Bound) -> Option<Ordering> {
    match (value, bound) {
        (DataValue::Int(v), Bound::Int(b)) => Some(v.cmp(&b)),
        (DataValue::Int(v), Bound::Float(b)) => compare_int_float(*v, b),
        (DataValue::Float(v), Bound::Int(b)) => {
            compare_int_float(b, *v).map(Ordering::reverse)
        }
        (DataValue::Float(v), Bound::Float(b)) => v.partial_cmp(&b),
        _ => None,
    }
}

fn compare_int_float(int: i64, float: f64) -> Option<Ordering> {
    if float.is_nan() {
        return None;
    }
    if float >= I64_LIMIT {
        return Some(Ordering::Less);
    }
    if float < -I64_LIMIT {
        return Some(Ordering::Greater);
    }
    let floor = float.floor();
    match int.cmp(&(floor as i64)) {
        Ordering::Equal if float > floor => Some(Ordering::Less),
        other => Some(other),
    }
}

/// 浮点数必须是有限的整数值，且落在 i64 范围内才能作为整数接受
fn integral(value: f64) -> Result<i64, ErrorCode> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(ErrorCode::Integer);
    }
    if !(-I64_LIMIT..I64_LIMIT).contains(&value) {
        return Err(ErrorCode::Integer);
    }
    Ok(value as i64)
}
