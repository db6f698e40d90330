//! Model trait 定义模块
//!
//! 定义类型化模型的核心接口

use crate::error::JsonDbResult;
use crate::model::instance::ModelInstance;
use crate::model::meta::ModelMeta;
use crate::types::DataValue;
use std::collections::HashMap;
use std::sync::Arc;

/// 模型特征
///
/// 类型化模型包装一个 [`ModelInstance`]，通常由 `define_model!` 实现
pub trait Model: Sized {
    /// 获取模型元数据
    fn meta() -> Arc<ModelMeta>;

    /// 包装已验证的实例
    fn from_instance(instance: ModelInstance) -> Self;

    fn instance(&self) -> &ModelInstance;

    fn instance_mut(&mut self) -> &mut ModelInstance;

    /// 验证输入映射并创建模型
    fn new(data: HashMap<String, DataValue>) -> JsonDbResult<Self> {
        ModelInstance::new(&Self::meta(), data).map(Self::from_instance)
    }

    /// 从 JSON 对象创建模型
    fn from_json(value: serde_json::Value) -> JsonDbResult<Self> {
        ModelInstance::from_json(&Self::meta(), value).map(Self::from_instance)
    }

    /// 获取集合名
    fn collection_name() -> String {
        Self::meta().collection_name().to_string()
    }

    fn get_item(&self, key: &str) -> JsonDbResult<&DataValue> {
        self.instance().get_item(key)
    }

    fn set(&mut self, key: &str, value: impl Into<DataValue>) -> JsonDbResult<()> {
        self.instance_mut().set(key, value)
    }

    fn delete(&mut self, key: &str) -> JsonDbResult<Option<DataValue>> {
        self.instance_mut().delete(key)
    }

    /// 转换为数据映射
    fn to_data_map(&self) -> HashMap<String, DataValue> {
        self.instance().to_map()
    }

    fn to_json_value(&self) -> serde_json::Value {
        self.instance().to_json_value()
    }
}
