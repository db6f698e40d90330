//! 模型实例
//!
//! 构造时整体验证输入映射，之后以字典方式只读访问，
//! 赋值与删除都经过字段描述符

use crate::debug_log;
use crate::error::{JsonDbError, JsonDbResult, ValidationError};
use crate::model::meta::{HashStrategy, ModelMeta};
use crate::types::{json_object_to_data_map, DataValue};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// 模型实例
#[derive(Clone)]
pub struct ModelInstance {
    meta: Arc<ModelMeta>,
    data: HashMap<String, DataValue>,
}

impl ModelInstance {
    /// 验证输入映射并创建实例
    ///
    /// 所有字段错误一次性收集到 `ValidationError::Construction` 中
    pub fn new(meta: &Arc<ModelMeta>, input: HashMap<String, DataValue>) -> JsonDbResult<Self> {
        let mut data = meta.schema().validate(&input).map_err(|errors| {
            debug_log!("模型 {} 构造失败: {} 个字段错误", meta.name(), errors.len());
            JsonDbError::from(ValidationError::Construction {
                model: meta.name().to_string(),
                errors,
            })
        })?;

        // 声明了默认值的只读字段总是取默认值
        for field in meta.fields() {
            if !(field.read_only() && field.has_default()) {
                continue;
            }
            if let (Ok(name), Some(default)) = (field.name(), field.validator().common().default.clone()) {
                data.insert(name.to_string(), default);
            }
        }

        Ok(Self {
            meta: Arc::clone(meta),
            data,
        })
    }

    /// 从 JSON 对象创建实例
    pub fn from_json(meta: &Arc<ModelMeta>, value: serde_json::Value) -> JsonDbResult<Self> {
        let input = json_object_to_data_map(value).ok_or_else(|| JsonDbError::InvalidInput {
            message: format!("模型 {} 需要一个 JSON 对象", meta.name()),
        })?;
        Self::new(meta, input)
    }

    pub fn meta(&self) -> &Arc<ModelMeta> {
        &self.meta
    }

    pub fn model_name(&self) -> &str {
        self.meta.name()
    }

    /// 按键读取，键不存在时返回 `FieldNotFound`
    pub fn get_item(&self, key: &str) -> JsonDbResult<&DataValue> {
        self.data
            .get(key)
            .ok_or_else(|| crate::jsondb_error!(field_not_found, self.meta.name(), key))
    }

    pub fn get(&self, key: &str) -> Option<&DataValue> {
        self.data.get(key)
    }

    /// 按键读取，键不存在时返回 `fallback`
    pub fn get_or(&self, key: &str, fallback: impl Into<DataValue>) -> DataValue {
        match self.data.get(key) {
            Some(value) => value.clone(),
            None => fallback.into(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 按字段声明顺序迭代键值
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataValue)> + '_ {
        self.meta
            .field_names()
            .filter_map(move |name| self.data.get_key_value(name))
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(name, _)| name)
    }

    pub fn values(&self) -> impl Iterator<Item = &DataValue> + '_ {
        self.iter().map(|(_, value)| value)
    }

    /// 实例数据
    pub fn data(&self) -> &HashMap<String, DataValue> {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut HashMap<String, DataValue> {
        &mut self.data
    }

    /// 复制出一份普通映射
    pub fn to_map(&self) -> HashMap<String, DataValue> {
        self.data.clone()
    }

    pub fn to_json_value(&self) -> serde_json::Value {
        let map = self
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_json_value()))
            .collect();
        serde_json::Value::Object(map)
    }

    /// 通过字段描述符赋值
    pub fn set(&mut self, key: &str, value: impl Into<DataValue>) -> JsonDbResult<()> {
        let meta = Arc::clone(&self.meta);
        meta.field(key)?.set(self, value)
    }

    /// 通过字段描述符删除
    pub fn delete(&mut self, key: &str) -> JsonDbResult<Option<DataValue>> {
        let meta = Arc::clone(&self.meta);
        meta.field(key)?.delete(self)
    }

    /// 计算实例哈希，只有可哈希的模型才能计算
    pub fn model_hash(&self) -> JsonDbResult<u64> {
        match self.meta.hash_strategy() {
            Some(HashStrategy::Custom(hash_fn)) => Ok(hash_fn(self)),
            Some(HashStrategy::Synthesized) => {
                let mut hasher = DefaultHasher::new();
                self.meta.type_id().hash(&mut hasher);
                for name in self.meta.field_names() {
                    self.data.get(name).hash(&mut hasher);
                }
                Ok(hasher.finish())
            }
            None => Err(JsonDbError::NotHashable {
                model: self.meta.name().to_string(),
            }),
        }
    }

    /// 转换为可哈希实例
    pub fn freeze(self) -> JsonDbResult<FrozenInstance> {
        let hash = self.model_hash()?;
        Ok(FrozenInstance {
            instance: self,
            hash,
        })
    }
}

impl PartialEq for ModelInstance {
    fn eq(&self, other: &Self) -> bool {
        self.meta.type_id() == other.meta.type_id() && self.data == other.data
    }
}

impl fmt::Display for ModelInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.meta.name())?;
        let mut first = true;
        for field in self.meta.fields() {
            if !field.repr() {
                continue;
            }
            let Ok(name) = field.name() else { continue };
            let Some(value) = self.data.get(name) else { continue };
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}={:?}", name, value)?;
            first = false;
        }
        write!(f, ")")
    }
}

impl fmt::Debug for ModelInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct(self.meta.name());
        for (name, value) in self.iter() {
            debug.field(name, value);
        }
        debug.finish()
    }
}

impl Serialize for ModelInstance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.data.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value.to_json_value())?;
        }
        map.end()
    }
}

impl<'a> IntoIterator for &'a ModelInstance {
    type Item = (&'a str, &'a DataValue);
    type IntoIter = std::vec::IntoIter<(&'a str, &'a DataValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter().collect::<Vec<_>>().into_iter()
    }
}

/// 可哈希的实例
///
/// 哈希值在冻结时计算一次
#[derive(Clone, Debug)]
pub struct FrozenInstance {
    instance: ModelInstance,
    hash: u64,
}

impl FrozenInstance {
    pub fn into_inner(self) -> ModelInstance {
        self.instance
    }
}

impl Deref for FrozenInstance {
    type Target = ModelInstance;

    fn deref(&self) -> &Self::Target {
        &self.instance
    }
}

impl PartialEq for FrozenInstance {
    fn eq(&self, other: &Self) -> bool {
        self.instance == other.instance
    }
}

impl Eq for FrozenInstance {}

impl Hash for FrozenInstance {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}
