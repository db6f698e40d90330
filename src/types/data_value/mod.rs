use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::net::IpAddr;
use uuid::Uuid;

/// 通用数据值类型 - 模型字段的输入值与验证后的值都使用此类型表示
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub enum DataValue {
    /// 空值
    Null,
    /// 布尔值
    Bool(bool),
    /// 整数
    Int(i64),
    /// 浮点数
    Float(f64),
    /// 字符串
    String(String),
    /// 日期
    Date(NaiveDate),
    /// 时间
    Time(NaiveTime),
    /// 不带时区的日期时间
    NaiveDateTime(NaiveDateTime),
    /// 带时区偏移的日期时间
    DateTime(DateTime<FixedOffset>),
    /// UUID
    Uuid(Uuid),
    /// IPv4 / IPv6 地址
    IpAddr(IpAddr),
    /// 无法映射为标量的 JSON 值（数组、对象）
    Json(serde_json::Value),
}

impl std::fmt::Display for DataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataValue::Null => write!(f, "null"),
            DataValue::Bool(b) => write!(f, "{}", b),
            DataValue::Int(i) => write!(f, "{}", i),
            DataValue::Float(fl) => write!(f, "{:?}", fl),
            DataValue::String(s) => write!(f, "{}", s),
            DataValue::Date(d) => write!(f, "{}", d),
            DataValue::Time(t) => write!(f, "{}", t),
            DataValue::NaiveDateTime(dt) => write!(f, "{}", dt),
            DataValue::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            DataValue::Uuid(uuid) => write!(f, "{}", uuid),
            DataValue::IpAddr(ip) => write!(f, "{}", ip),
            DataValue::Json(json) => write!(f, "{}", json),
        }
    }
}

impl std::fmt::Debug for DataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Debug 输出与模型的文本表示保持一致：文本类的值带引号
        match self {
            DataValue::Null
            | DataValue::Bool(_)
            | DataValue::Int(_)
            | DataValue::Float(_)
            | DataValue::Json(_) => write!(f, "{}", self),
            other => write!(f, "'{}'", other.to_string().replace('\'', "\\'")),
        }
    }
}

impl Hash for DataValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            DataValue::Null => {}
            DataValue::Bool(b) => b.hash(state),
            DataValue::Int(i) => i.hash(state),
            DataValue::Float(f) => {
                // 0.0 与 -0.0 相等，哈希也必须相同
                let normalized = if *f == 0.0 { 0.0f64 } else { *f };
                normalized.to_bits().hash(state)
            }
            DataValue::String(s) => s.hash(state),
            DataValue::Date(d) => d.hash(state),
            DataValue::Time(t) => t.hash(state),
            DataValue::NaiveDateTime(dt) => dt.hash(state),
            DataValue::DateTime(dt) => dt.hash(state),
            DataValue::Uuid(u) => u.hash(state),
            DataValue::IpAddr(ip) => ip.hash(state),
            DataValue::Json(json) => json.to_string().hash(state),
        }
    }
}

impl DataValue {
    /// 获取数据类型名称
    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::Null => "null",
            DataValue::Bool(_) => "boolean",
            DataValue::Int(_) => "integer",
            DataValue::Float(_) => "float",
            DataValue::String(_) => "string",
            DataValue::Date(_) => "date",
            DataValue::Time(_) => "time",
            DataValue::NaiveDateTime(_) | DataValue::DateTime(_) => "datetime",
            DataValue::Uuid(_) => "uuid",
            DataValue::IpAddr(_) => "ipaddress",
            DataValue::Json(_) => "json",
        }
    }

    /// 判断是否为空值
    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    /// 获取字符串引用
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// 获取整数值
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DataValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// 获取浮点数值，整数会被转换
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataValue::Float(f) => Some(*f),
            DataValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// 获取布尔值
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DataValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// 转换为 JSON 值
    ///
    /// 日期、时间、UUID 与 IP 地址以字符串形式输出
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            DataValue::Null => serde_json::Value::Null,
            DataValue::Bool(b) => serde_json::Value::Bool(*b),
            DataValue::Int(i) => serde_json::Value::Number(serde_json::Number::from(*i)),
            DataValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            DataValue::String(s) => serde_json::Value::String(s.clone()),
            DataValue::DateTime(dt) => serde_json::Value::String(dt.to_rfc3339()),
            DataValue::Json(j) => j.clone(),
            other => serde_json::Value::String(other.to_string()),
        }
    }

    /// 从 JSON 值转换
    pub fn from_json_value(value: serde_json::Value) -> Self {
        json_value_to_data_value(value)
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        DataValue::Bool(value)
    }
}

impl From<i32> for DataValue {
    fn from(value: i32) -> Self {
        DataValue::Int(value as i64)
    }
}

impl From<i64> for DataValue {
    fn from(value: i64) -> Self {
        DataValue::Int(value)
    }
}

impl From<f32> for DataValue {
    fn from(value: f32) -> Self {
        DataValue::Float(value as f64)
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        DataValue::Float(value)
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::String(value)
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::String(value.to_string())
    }
}

impl From<NaiveDate> for DataValue {
    fn from(value: NaiveDate) -> Self {
        DataValue::Date(value)
    }
}

impl From<NaiveTime> for DataValue {
    fn from(value: NaiveTime) -> Self {
        DataValue::Time(value)
    }
}

impl From<NaiveDateTime> for DataValue {
    fn from(value: NaiveDateTime) -> Self {
        DataValue::NaiveDateTime(value)
    }
}

impl From<DateTime<Utc>> for DataValue {
    fn from(value: DateTime<Utc>) -> Self {
        DataValue::DateTime(value.fixed_offset())
    }
}

impl From<DateTime<FixedOffset>> for DataValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        DataValue::DateTime(value)
    }
}

impl From<Uuid> for DataValue {
    fn from(value: Uuid) -> Self {
        DataValue::Uuid(value)
    }
}

impl From<IpAddr> for DataValue {
    fn from(value: IpAddr) -> Self {
        DataValue::IpAddr(value)
    }
}

impl From<serde_json::Value> for DataValue {
    fn from(value: serde_json::Value) -> Self {
        json_value_to_data_value(value)
    }
}

impl<T> From<Option<T>> for DataValue
where
    T: Into<DataValue>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => DataValue::Null,
        }
    }
}

/// 将 serde_json::Value 转换为对应的 DataValue 类型
///
/// 数组与对象没有对应的标量类型，保留为 DataValue::Json
pub fn json_value_to_data_value(value: serde_json::Value) -> DataValue {
    match value {
        serde_json::Value::Null => DataValue::Null,
        serde_json::Value::Bool(b) => DataValue::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                DataValue::Int(i)
            } else if let Some(f) = n.as_f64() {
                DataValue::Float(f)
            } else {
                DataValue::Json(serde_json::Value::Number(n))
            }
        }
        serde_json::Value::String(s) => DataValue::String(s),
        other => DataValue::Json(other),
    }
}

/// 将 JSON 对象转换为字段映射，非对象输入返回 None
pub fn json_object_to_data_map(value: serde_json::Value) -> Option<HashMap<String, DataValue>> {
    match value {
        serde_json::Value::Object(obj) => Some(
            obj.into_iter()
                .map(|(k, v)| (k, json_value_to_data_value(v)))
                .collect(),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(value: &DataValue) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_json_conversion() {
        let value = json_value_to_data_value(serde_json::json!(18));
        assert_eq!(value, DataValue::Int(18));

        let value = json_value_to_data_value(serde_json::json!(4.5));
        assert_eq!(value, DataValue::Float(4.5));

        let value = json_value_to_data_value(serde_json::json!([1, 2]));
        assert!(matches!(value, DataValue::Json(_)));
    }

    #[test]
    fn test_json_object_to_data_map() {
        let map = json_object_to_data_map(serde_json::json!({"s": "x", "b": true}))
            .expect("object");
        assert_eq!(map.get("s"), Some(&DataValue::String("x".to_string())));
        assert_eq!(map.get("b"), Some(&DataValue::Bool(true)));

        assert!(json_object_to_data_map(serde_json::json!("x")).is_none());
    }

    #[test]
    fn test_zero_floats_hash_equal() {
        assert_eq!(DataValue::Float(0.0), DataValue::Float(-0.0));
        assert_eq!(hash_of(&DataValue::Float(0.0)), hash_of(&DataValue::Float(-0.0)));
    }

    #[test]
    fn test_debug_quotes_text_values() {
        assert_eq!(format!("{:?}", DataValue::from("admin")), "'admin'");
        assert_eq!(format!("{:?}", DataValue::Int(3)), "3");
        assert_eq!(format!("{:?}", DataValue::Null), "null");
    }

    #[test]
    fn test_floats_keep_fraction_in_text() {
        assert_eq!(DataValue::Float(4.0).to_string(), "4.0");
        assert_eq!(format!("{:?}", DataValue::Float(4.0)), "4.0");
        assert_eq!(DataValue::Float(0.25).to_string(), "0.25");
    }

    #[test]
    fn test_to_json_value_renders_native_types_as_strings() {
        let date = NaiveDate::from_ymd_opt(1991, 3, 12).expect("date");
        assert_eq!(
            DataValue::Date(date).to_json_value(),
            serde_json::Value::String("1991-03-12".to_string())
        );
    }
}
