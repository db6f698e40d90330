//! # 配置管理模块 - 核心配置类型
//!
//! 模型级配置与配置层合并。每个模型定义最多只能有一个配置来源，
//! 合并优先级：关键字参数 > 嵌套配置 > 继承的显式配置 > 内置默认值

use crate::error::{JsonDbError, JsonDbResult};
use crate::types::DataValue;
use crate::{debug_log, i18n};
use rat_logger::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// 未声明键的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtraFields {
    /// 拒绝未声明的键
    #[default]
    Forbid,
    /// 丢弃未声明的键
    Ignore,
}

impl ExtraFields {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtraFields::Forbid => "forbid",
            ExtraFields::Ignore => "ignore",
        }
    }
}

impl FromStr for ExtraFields {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "forbid" => Ok(ExtraFields::Forbid),
            "ignore" => Ok(ExtraFields::Ignore),
            other => Err(other.to_string()),
        }
    }
}

/// 模型配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// 实例是否不可变
    pub frozen: bool,
    /// 赋值时是否重新验证
    pub validate_assignment: bool,
    /// 未声明键的处理策略
    pub extra: ExtraFields,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            frozen: false,
            validate_assignment: true,
            extra: ExtraFields::Forbid,
        }
    }
}

impl ModelConfig {
    /// 可以作为关键字参数出现的配置项
    pub fn valid_config_attrs() -> &'static [&'static str] {
        &["frozen", "validate_assignment", "extra"]
    }

    /// 创建配置构建器
    pub fn builder() -> super::builders::ModelConfigBuilder {
        super::builders::ModelConfigBuilder::new()
    }

    /// 从配置文件加载配置
    ///
    /// 根据扩展名选择 TOML 或 JSON，缺失的项取默认值
    pub fn from_file<P: AsRef<Path>>(config_path: P) -> JsonDbResult<Self> {
        let path = config_path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let config: ModelConfig = match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => toml::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
            Some("json") => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
            _ => {
                return Err(crate::jsondb_error!(
                    config,
                    i18n::message(
                        "error.config_file_format",
                        &[("path", path.display().to_string().as_str())],
                        "Unsupported configuration file format: {path}",
                    )
                ));
            }
        };

        info!("从文件加载模型配置: {:?}", path);
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, config_path: P) -> JsonDbResult<()> {
        let path = config_path.as_ref();
        let content = if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml::to_string_pretty(self)
                .map_err(|e| crate::jsondb_error!(config, format!("序列化TOML配置失败: {}", e)))?
        } else {
            serde_json::to_string_pretty(self)
                .map_err(|e| crate::jsondb_error!(config, format!("序列化JSON配置失败: {}", e)))?
        };

        std::fs::write(path, content)?;
        info!("模型配置已保存到文件: {:?}", path);
        Ok(())
    }
}

fn parse_error(message: String) -> JsonDbError {
    crate::jsondb_error!(
        config,
        i18n::message(
            "error.config_parse",
            &[("message", message.as_str())],
            "Failed to parse configuration file: {message}",
        )
    )
}

impl fmt::Display for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ModelConfig(frozen={}, validate_assignment={}, extra='{}')",
            self.frozen,
            self.validate_assignment,
            self.extra.as_str()
        )
    }
}

/// 显式设置的配置层
///
/// 只有设置过的项才参与合并，未设置的项沿用下层的值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigOverrides {
    pub frozen: Option<bool>,
    pub validate_assignment: Option<bool>,
    pub extra: Option<ExtraFields>,
}

impl ConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self.frozen.is_none() && self.validate_assignment.is_none() && self.extra.is_none()
    }

    /// 当前层优先，未设置的项取 `lower`
    pub fn or(self, lower: ConfigOverrides) -> ConfigOverrides {
        ConfigOverrides {
            frozen: self.frozen.or(lower.frozen),
            validate_assignment: self.validate_assignment.or(lower.validate_assignment),
            extra: self.extra.or(lower.extra),
        }
    }

    /// 在默认配置之上应用本层
    pub fn resolve(&self) -> ModelConfig {
        let defaults = ModelConfig::default();
        ModelConfig {
            frozen: self.frozen.unwrap_or(defaults.frozen),
            validate_assignment: self.validate_assignment.unwrap_or(defaults.validate_assignment),
            extra: self.extra.unwrap_or(defaults.extra),
        }
    }

    /// 从关键字参数设置一个配置项
    ///
    /// `key` 必须属于 [`ModelConfig::valid_config_attrs`]
    pub fn set_kwarg(&mut self, key: &str, value: &DataValue) -> JsonDbResult<()> {
        match key {
            "frozen" => {
                self.frozen = Some(
                    value
                        .as_bool()
                        .ok_or_else(|| crate::jsondb_error!(config_value, key, "boolean"))?,
                );
            }
            "validate_assignment" => {
                self.validate_assignment = Some(
                    value
                        .as_bool()
                        .ok_or_else(|| crate::jsondb_error!(config_value, key, "boolean"))?,
                );
            }
            "extra" => {
                let extra = value
                    .as_str()
                    .and_then(|s| s.parse::<ExtraFields>().ok())
                    .ok_or_else(|| crate::jsondb_error!(config_value, key, "'forbid' | 'ignore'"))?;
                self.extra = Some(extra);
            }
            other => {
                return Err(crate::jsondb_error!(
                    config,
                    format!("未知的配置项: {}", other)
                ));
            }
        }
        debug_log!("配置关键字参数: {}={}", key, value);
        Ok(())
    }
}

impl From<ModelConfig> for ConfigOverrides {
    fn from(config: ModelConfig) -> Self {
        ConfigOverrides {
            frozen: Some(config.frozen),
            validate_assignment: Some(config.validate_assignment),
            extra: Some(config.extra),
        }
    }
}

/// 子模型的显式配置覆盖父模型的显式配置
pub fn inherit_config(own: &ConfigOverrides, parent: &ConfigOverrides) -> ConfigOverrides {
    own.or(*parent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ModelConfig::default();
        assert!(!config.frozen);
        assert!(config.validate_assignment);
        assert_eq!(config.extra, ExtraFields::Forbid);
        assert_eq!(ConfigOverrides::default().resolve(), config);
    }

    #[test]
    fn test_inherit_keeps_parent_values_not_overridden() {
        let parent = ConfigOverrides {
            frozen: Some(true),
            validate_assignment: Some(false),
            extra: None,
        };
        let own = ConfigOverrides {
            validate_assignment: Some(true),
            ..ConfigOverrides::default()
        };
        let merged = inherit_config(&own, &parent).resolve();
        assert!(merged.frozen);
        assert!(merged.validate_assignment);
        assert_eq!(merged.extra, ExtraFields::Forbid);
    }

    #[test]
    fn test_kwarg_value_types() {
        let mut layer = ConfigOverrides::default();
        layer.set_kwarg("frozen", &DataValue::Bool(true)).unwrap();
        layer.set_kwarg("extra", &DataValue::from("ignore")).unwrap();
        assert_eq!(layer.frozen, Some(true));
        assert_eq!(layer.extra, Some(ExtraFields::Ignore));

        let err = layer.set_kwarg("frozen", &DataValue::from("yes")).unwrap_err();
        assert!(matches!(err, JsonDbError::InvalidConfigValue { ref key, .. } if key == "frozen"));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ModelConfig::default().to_string(),
            "ModelConfig(frozen=false, validate_assignment=true, extra='forbid')"
        );
    }
}
