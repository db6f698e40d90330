//! 字符串格式验证
//!
//! 支持的格式标签是封闭集合，格式验证返回解析后的原生值

use crate::error::ErrorCode;
use crate::types::DataValue;
use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::str::FromStr;
use uuid::Uuid;

static DATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<year>\d{4})-(?P<month>\d{1,2})-(?P<day>\d{1,2})$").expect("date regex")
});

static TIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<hour>\d{1,2}):(?P<minute>\d{1,2})(?::(?P<second>\d{1,2})(?:\.(?P<microsecond>\d{1,6})\d{0,6})?)?$",
    )
    .expect("time regex")
});

static DATETIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<year>\d{4})-(?P<month>\d{1,2})-(?P<day>\d{1,2})[T ](?P<hour>\d{1,2}):(?P<minute>\d{1,2})(?::(?P<second>\d{1,2})(?:\.(?P<microsecond>\d{1,6})\d{0,6})?)?(?P<tzinfo>Z|[+-]\d{2}(?::?\d{2})?)?$",
    )
    .expect("datetime regex")
});

static UUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("uuid regex")
});

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[-!#$%&'*+/=?^_`{}|~0-9A-Za-z]+(?:\.[-!#$%&'*+/=?^_`{}|~0-9A-Za-z]+)*@(?:(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}\.?|\[[A-Fa-f0-9:.]+\])$",
    )
    .expect("email regex")
});

static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[^\s/?#]+(?:[/?#]\S*)?$").expect("url regex")
});

/// 允许的格式标签
pub const ALLOWED_FORMATS: [&str; 7] = [
    "date",
    "time",
    "datetime",
    "uuid",
    "email",
    "ipaddress",
    "url",
];

/// 字符串字段的格式标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringFormat {
    Date,
    Time,
    DateTime,
    Uuid,
    Email,
    IpAddress,
    Url,
}

impl FromStr for StringFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(StringFormat::Date),
            "time" => Ok(StringFormat::Time),
            "datetime" => Ok(StringFormat::DateTime),
            "uuid" => Ok(StringFormat::Uuid),
            "email" => Ok(StringFormat::Email),
            "ipaddress" => Ok(StringFormat::IpAddress),
            "url" => Ok(StringFormat::Url),
            other => Err(other.to_string()),
        }
    }
}

impl StringFormat {
    /// 格式标签名称
    pub fn as_str(&self) -> &'static str {
        match self {
            StringFormat::Date => "date",
            StringFormat::Time => "time",
            StringFormat::DateTime => "datetime",
            StringFormat::Uuid => "uuid",
            StringFormat::Email => "email",
            StringFormat::IpAddress => "ipaddress",
            StringFormat::Url => "url",
        }
    }

    /// 值是否已经是此格式对应的原生类型
    pub fn is_native(&self, value: &DataValue) -> bool {
        matches!(
            (self, value),
            (StringFormat::Date, DataValue::Date(_))
                | (StringFormat::Time, DataValue::Time(_))
                | (StringFormat::DateTime, DataValue::NaiveDateTime(_))
                | (StringFormat::DateTime, DataValue::DateTime(_))
                | (StringFormat::Uuid, DataValue::Uuid(_))
                | (StringFormat::IpAddress, DataValue::IpAddr(_))
        )
    }

    /// 验证并解析字符串
    pub fn validate(&self, text: &str) -> Result<DataValue, ErrorCode> {
        match self {
            StringFormat::Date => parse_date(text),
            StringFormat::Time => parse_time(text),
            StringFormat::DateTime => parse_datetime(text),
            StringFormat::Uuid => {
                if !UUID_REGEX.is_match(text) {
                    return Err(ErrorCode::Format(*self));
                }
                Uuid::parse_str(text)
                    .map(DataValue::Uuid)
                    .map_err(|_| ErrorCode::Format(*self))
            }
            StringFormat::Email => {
                if EMAIL_REGEX.is_match(text) {
                    Ok(DataValue::String(text.to_string()))
                } else {
                    Err(ErrorCode::Format(*self))
                }
            }
            StringFormat::IpAddress => text
                .parse::<IpAddr>()
                .map(DataValue::IpAddr)
                .map_err(|_| ErrorCode::Format(*self)),
            StringFormat::Url => {
                if URL_REGEX.is_match(text) {
                    Ok(DataValue::String(text.to_string()))
                } else {
                    Err(ErrorCode::Format(*self))
                }
            }
        }
    }
}

impl std::fmt::Display for StringFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn number<T: FromStr>(caps: &Captures<'_>, name: &str) -> Option<T> {
    caps.name(name).and_then(|m| m.as_str().parse().ok())
}

/// 小数秒右侧补零到微秒精度
fn microseconds(caps: &Captures<'_>) -> u32 {
    caps.name("microsecond")
        .map(|m| format!("{:0<6}", m.as_str()).parse().unwrap_or(0))
        .unwrap_or(0)
}

fn build_date(caps: &Captures<'_>) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(
        number(caps, "year")?,
        number(caps, "month")?,
        number(caps, "day")?,
    )
}

fn build_time(caps: &Captures<'_>) -> Option<NaiveTime> {
    NaiveTime::from_hms_micro_opt(
        number(caps, "hour")?,
        number(caps, "minute")?,
        number(caps, "second").unwrap_or(0),
        microseconds(caps),
    )
}

fn parse_date(text: &str) -> Result<DataValue, ErrorCode> {
    let caps = DATE_REGEX
        .captures(text)
        .ok_or(ErrorCode::Format(StringFormat::Date))?;
    build_date(&caps)
        .map(DataValue::Date)
        .ok_or(ErrorCode::InvalidValue(StringFormat::Date))
}

fn parse_time(text: &str) -> Result<DataValue, ErrorCode> {
    let caps = TIME_REGEX
        .captures(text)
        .ok_or(ErrorCode::Format(StringFormat::Time))?;
    build_time(&caps)
        .map(DataValue::Time)
        .ok_or(ErrorCode::InvalidValue(StringFormat::Time))
}

fn parse_offset(tzinfo: &str) -> Option<FixedOffset> {
    if tzinfo == "Z" {
        return FixedOffset::east_opt(0);
    }
    let sign = if tzinfo.starts_with('-') { -1 } else { 1 };
    let digits: String = tzinfo[1..].chars().filter(|c| *c != ':').collect();
    let hours: i32 = digits.get(0..2)?.parse().ok()?;
    let minutes: i32 = match digits.get(2..4) {
        Some(m) => m.parse().ok()?,
        None => 0,
    };
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn parse_datetime(text: &str) -> Result<DataValue, ErrorCode> {
    let invalid = ErrorCode::InvalidValue(StringFormat::DateTime);
    let caps = DATETIME_REGEX
        .captures(text)
        .ok_or(ErrorCode::Format(StringFormat::DateTime))?;
    let date = build_date(&caps).ok_or_else(|| invalid.clone())?;
    let time = build_time(&caps).ok_or_else(|| invalid.clone())?;
    let naive = NaiveDateTime::new(date, time);

    match caps.name("tzinfo") {
        None => Ok(DataValue::NaiveDateTime(naive)),
        Some(tz) => {
            let offset = parse_offset(tz.as_str()).ok_or_else(|| invalid.clone())?;
            offset
                .from_local_datetime(&naive)
                .single()
                .map(DataValue::DateTime)
                .ok_or(invalid)
        }
    }
}
