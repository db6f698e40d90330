//! 模型元数据与模型构建器
//!
//! `ModelBuilder` 合并继承链上的字段与配置，产生不可变的 `Arc<ModelMeta>`

use crate::config::{inherit_config, ConfigOverrides, ExtraFields, ModelConfig};
use crate::debug_log;
use crate::error::{JsonDbError, JsonDbResult};
use crate::model::field_types::ModelField;
use crate::model::instance::ModelInstance;
use crate::types::DataValue;
use crate::validator::Schema;
use once_cell::sync::Lazy;
use rat_logger::info;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// 自定义哈希函数
pub type HashFn = fn(&ModelInstance) -> u64;

/// 实例哈希方式
#[derive(Debug, Clone, Copy)]
pub enum HashStrategy {
    /// 模型自己定义或继承的哈希函数
    Custom(HashFn),
    /// 由模型类型标识与有序字段值合成
    Synthesized,
}

static NEXT_TYPE_ID: AtomicU64 = AtomicU64::new(1);

static ROOT: Lazy<Arc<ModelMeta>> = Lazy::new(|| {
    Arc::new(ModelMeta {
        name: "BaseModel".to_string(),
        type_id: NEXT_TYPE_ID.fetch_add(1, Ordering::Relaxed),
        collection_name: "basemodel".to_string(),
        fields: Vec::new(),
        schema: Schema::default(),
        config: ModelConfig::default(),
        config_layer: ConfigOverrides::default(),
        extra_kwargs: HashMap::new(),
        hash_strategy: None,
        base_names: Vec::new(),
    })
});

/// 模型元数据
///
/// 构建完成后不可变，可以在线程间共享
#[derive(Debug)]
pub struct ModelMeta {
    name: String,
    type_id: u64,
    collection_name: String,
    fields: Vec<ModelField>,
    schema: Schema,
    config: ModelConfig,
    config_layer: ConfigOverrides,
    extra_kwargs: HashMap<String, DataValue>,
    hash_strategy: Option<HashStrategy>,
    base_names: Vec<String>,
}

impl ModelMeta {
    /// 所有模型的隐式基类
    pub fn root() -> Arc<ModelMeta> {
        Arc::clone(&ROOT)
    }

    pub fn builder(name: &str) -> ModelBuilder {
        ModelBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 进程内唯一的模型类型标识
    pub fn type_id(&self) -> u64 {
        self.type_id
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    /// 按声明顺序排列的字段
    pub fn fields(&self) -> &[ModelField] {
        &self.fields
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.schema.names()
    }

    /// 按名称查找字段描述符
    pub fn field(&self, name: &str) -> JsonDbResult<&ModelField> {
        self.fields
            .iter()
            .find(|field| field.name().ok() == Some(name))
            .ok_or_else(|| crate::jsondb_error!(field_not_found, self.name, name))
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.schema.contains(name)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// 解析后的完整配置
    pub fn config(&self) -> ModelConfig {
        self.config
    }

    /// 显式设置过的配置层，子模型从这里继承
    pub fn config_layer(&self) -> ConfigOverrides {
        self.config_layer
    }

    /// 不属于配置项的关键字参数
    pub fn extra_kwargs(&self) -> &HashMap<String, DataValue> {
        &self.extra_kwargs
    }

    pub fn hash_strategy(&self) -> Option<HashStrategy> {
        self.hash_strategy
    }

    pub fn is_hashable(&self) -> bool {
        self.hash_strategy.is_some()
    }

    /// 直接基类的名称
    pub fn base_names(&self) -> &[String] {
        &self.base_names
    }

    pub fn is_root(&self) -> bool {
        self.type_id == ROOT.type_id
    }
}

impl fmt::Display for ModelMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<model '{}'>", self.name)
    }
}

/// 模型构建器
pub struct ModelBuilder {
    name: String,
    bases: Vec<Arc<ModelMeta>>,
    fields: Vec<(String, ModelField)>,
    config: Option<ConfigOverrides>,
    kwargs: Vec<(String, DataValue)>,
    collection: Option<String>,
    hash_fn: Option<HashFn>,
}

impl ModelBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            bases: Vec::new(),
            fields: Vec::new(),
            config: None,
            kwargs: Vec::new(),
            collection: None,
            hash_fn: None,
        }
    }

    /// 添加基类，先声明的基类在字段与配置冲突时优先
    pub fn base(mut self, base: &Arc<ModelMeta>) -> Self {
        self.bases.push(Arc::clone(base));
        self
    }

    /// 声明字段；与基类同名时覆盖基类字段但保留其位置
    pub fn field(mut self, name: &str, field: ModelField) -> Self {
        self.fields.push((name.to_string(), field));
        self
    }

    /// 嵌套配置
    pub fn config(mut self, config: ConfigOverrides) -> Self {
        self.config = Some(config);
        self
    }

    /// 关键字参数：配置项进入配置，其余原样保留
    pub fn kwarg(mut self, key: &str, value: impl Into<DataValue>) -> Self {
        self.kwargs.push((key.to_string(), value.into()));
        self
    }

    /// 集合名，不会被子模型继承
    pub fn collection(mut self, collection: &str) -> Self {
        self.collection = Some(collection.to_string());
        self
    }

    pub fn hash_fn(mut self, hash_fn: HashFn) -> Self {
        self.hash_fn = Some(hash_fn);
        self
    }

    pub fn build(self) -> JsonDbResult<Arc<ModelMeta>> {
        let bases = if self.bases.is_empty() {
            vec![ModelMeta::root()]
        } else {
            self.bases
        };

        let mut fields: Vec<ModelField> = Vec::new();
        let mut inherited_layer = ConfigOverrides::default();
        let mut hash_strategy = None;

        for base in bases.iter().rev() {
            for field in base.fields() {
                upsert(&mut fields, field.clone());
            }
            inherited_layer = inherit_config(&base.config_layer(), &inherited_layer);
            hash_strategy = base.hash_strategy();
        }

        for (name, field) in self.fields {
            let field = if field.is_bound() { field.detached() } else { field };
            field.bind(&self.name, &name);
            upsert(&mut fields, field);
        }

        let mut kwarg_layer = ConfigOverrides::default();
        let mut has_config_kwargs = false;
        let mut extra_kwargs = HashMap::new();
        for (key, value) in self.kwargs {
            if ModelConfig::valid_config_attrs().contains(&key.as_str()) {
                kwarg_layer.set_kwarg(&key, &value)?;
                has_config_kwargs = true;
            } else {
                extra_kwargs.insert(key, value);
            }
        }

        if self.config.is_some() && has_config_kwargs {
            return Err(JsonDbError::DuplicateConfig);
        }

        let own_layer = kwarg_layer.or(self.config.unwrap_or_default());
        let config_layer = inherit_config(&own_layer, &inherited_layer);
        let config = config_layer.resolve();

        let schema = Schema::new(
            fields
                .iter()
                .filter_map(|field| {
                    let name = field.name().ok()?;
                    Some((name.to_string(), field.validator().clone()))
                })
                .collect(),
            config.extra == ExtraFields::Ignore,
        );

        let hash_strategy = match self.hash_fn {
            Some(hash_fn) => Some(HashStrategy::Custom(hash_fn)),
            None if hash_strategy.is_none() && config.frozen => Some(HashStrategy::Synthesized),
            None => hash_strategy,
        };

        let collection_name = self
            .collection
            .unwrap_or_else(|| self.name.to_lowercase());

        let meta = ModelMeta {
            type_id: NEXT_TYPE_ID.fetch_add(1, Ordering::Relaxed),
            collection_name,
            fields,
            schema,
            config,
            config_layer,
            extra_kwargs,
            hash_strategy,
            base_names: bases.iter().map(|base| base.name().to_string()).collect(),
            name: self.name,
        };

        info!(
            "构建模型: {} (字段数={}, 集合={})",
            meta.name,
            meta.fields.len(),
            meta.collection_name
        );
        debug_log!("模型 {} 的配置: {}", meta.name, meta.config);

        Ok(Arc::new(meta))
    }
}

/// 同名字段原地替换，否则追加到末尾
fn upsert(fields: &mut Vec<ModelField>, field: ModelField) {
    let name = field.name().ok().map(str::to_string);
    match fields
        .iter()
        .position(|existing| existing.name().ok().map(str::to_string) == name)
    {
        Some(index) => fields[index] = field,
        None => fields.push(field),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::convenience::{integer_field, string_field};

    fn names(meta: &ModelMeta) -> Vec<&str> {
        meta.field_names().collect()
    }

    #[test]
    fn test_root_model() {
        let root = ModelMeta::root();
        assert_eq!(root.name(), "BaseModel");
        assert!(root.fields().is_empty());
        assert!(root.is_root());
        assert_eq!(root.type_id(), ModelMeta::root().type_id());
    }

    #[test]
    fn test_subclass_fields_follow_base_fields() {
        let base = ModelMeta::builder("Base")
            .field("a", string_field().build().unwrap())
            .field("b", string_field().build().unwrap())
            .build()
            .unwrap();
        let child = ModelMeta::builder("Child")
            .base(&base)
            .field("c", integer_field().build().unwrap())
            .field("a", integer_field().build().unwrap())
            .build()
            .unwrap();

        assert_eq!(names(&child), vec!["a", "b", "c"]);
        assert_eq!(child.field("a").unwrap().validator().kind_name(), "integer");
        assert_eq!(child.field("a").unwrap().owner(), Some("Child"));
        assert_eq!(child.field("b").unwrap().owner(), Some("Base"));
        assert_eq!(base.field("a").unwrap().validator().kind_name(), "string");
        assert_eq!(child.base_names(), &["Base".to_string()]);
    }

    #[test]
    fn test_collection_name() {
        let user = ModelMeta::builder("UserProfile").build().unwrap();
        assert_eq!(user.collection_name(), "userprofile");

        let named = ModelMeta::builder("User").collection("people").build().unwrap();
        let child = ModelMeta::builder("Admin").base(&named).build().unwrap();
        assert_eq!(named.collection_name(), "people");
        assert_eq!(child.collection_name(), "admin");
    }

    #[test]
    fn test_duplicate_config_sources() {
        let result = ModelMeta::builder("Dup")
            .config(ModelConfig::builder().frozen(true).build())
            .kwarg("validate_assignment", false)
            .build();
        assert!(matches!(result, Err(JsonDbError::DuplicateConfig)));
    }

    #[test]
    fn test_passthrough_kwargs_are_kept() {
        let meta = ModelMeta::builder("Tagged")
            .kwarg("frozen", true)
            .kwarg("table_hint", "archive")
            .build()
            .unwrap();
        assert!(meta.config().frozen);
        assert_eq!(meta.extra_kwargs().get("table_hint"), Some(&DataValue::from("archive")));
        assert!(!meta.extra_kwargs().contains_key("frozen"));
    }

    #[test]
    fn test_frozen_models_get_synthesized_hash() {
        let frozen = ModelMeta::builder("Point").kwarg("frozen", true).build().unwrap();
        let plain = ModelMeta::builder("Mutable").build().unwrap();
        assert!(matches!(frozen.hash_strategy(), Some(HashStrategy::Synthesized)));
        assert!(!plain.is_hashable());
        assert_ne!(frozen.type_id(), plain.type_id());
    }
}
