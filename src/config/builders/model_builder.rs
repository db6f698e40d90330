//! # 模型配置构建器模块
//!
//! 以链式调用产生一个显式配置层，供模型定义使用

use crate::config::core::{ConfigOverrides, ExtraFields, ModelConfig};
use crate::debug_log;

/// 模型配置构建器
///
/// 只记录显式调用过的项，未调用的项在合并时沿用继承值
#[derive(Debug, Default)]
pub struct ModelConfigBuilder {
    layer: ConfigOverrides,
}

impl ModelConfigBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            layer: ConfigOverrides::default(),
        }
    }

    /// 设置实例是否不可变
    pub fn frozen(mut self, frozen: bool) -> Self {
        self.layer.frozen = Some(frozen);
        self
    }

    /// 设置赋值时是否重新验证
    pub fn validate_assignment(mut self, validate: bool) -> Self {
        self.layer.validate_assignment = Some(validate);
        self
    }

    /// 设置未声明键的处理策略
    pub fn extra(mut self, extra: ExtraFields) -> Self {
        self.layer.extra = Some(extra);
        self
    }

    /// 构建配置层
    pub fn build(self) -> ConfigOverrides {
        debug_log!("创建模型配置层: {:?}", self.layer);
        self.layer
    }

    /// 直接解析为完整配置（未设置的项取默认值）
    pub fn build_config(self) -> ModelConfig {
        self.layer.resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_only_records_explicit_values() {
        let layer = ModelConfig::builder().frozen(true).build();
        assert_eq!(layer.frozen, Some(true));
        assert_eq!(layer.validate_assignment, None);
        assert!(ModelConfigBuilder::new().build().is_empty());
    }

    #[test]
    fn test_build_config_fills_defaults() {
        let config = ModelConfig::builder()
            .validate_assignment(false)
            .extra(ExtraFields::Ignore)
            .build_config();
        assert!(!config.frozen);
        assert!(!config.validate_assignment);
        assert_eq!(config.extra, ExtraFields::Ignore);
    }
}
