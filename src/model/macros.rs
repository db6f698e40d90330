//! 模型相关的宏定义
//!
//! 提供便捷的宏来定义模型和构造输入映射

/// 便捷宏：构造输入映射
///
/// ```
/// use rat_jsondb::data_map;
/// let data = data_map! { "username" => "admin", "age" => 18 };
/// assert_eq!(data.len(), 2);
/// ```
#[macro_export]
macro_rules! data_map {
    () => {
        std::collections::HashMap::<String, $crate::types::DataValue>::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = std::collections::HashMap::<String, $crate::types::DataValue>::new();
        $(
            map.insert($key.to_string(), $crate::types::DataValue::from($value));
        )+
        map
    }};
}

/// 便捷宏：定义模型
///
/// 字段写成 `名称: 字段构建器`，其后依次是可选的 `bases`、`collection`、
/// `frozen`、`validate_assignment`。声明 `frozen = true` 的模型实现 `Hash + Eq`。
///
/// `Hash + Eq` 只看本次宏调用中的 `frozen = true`：继承不可变基类的子模型在运行时
/// 同样不可变，但要在类型上可哈希，需要在子模型中再次写出 `frozen = true`。
///
/// 模型定义错误（非法格式标签、默认值验证失败等）在首次访问元数据时 panic。
#[macro_export]
macro_rules! define_model {
    (@hashable $name:ident true) => {
        impl Eq for $name {}

        impl std::hash::Hash for $name {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                if let Ok(hash) = self.instance.model_hash() {
                    state.write_u64(hash);
                }
            }
        }
    };

    (@hashable $name:ident $other:tt) => {};

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $field:ident: $field_def:expr
            ),* $(,)?
        }
        $(bases = [$($base:ty),+ $(,)?],)?
        $(collection = $collection:expr,)?
        $(frozen = $frozen:tt,)?
        $(validate_assignment = $validate_assignment:expr,)?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $name {
            instance: $crate::model::ModelInstance,
        }

        impl $crate::model::Model for $name {
            fn meta() -> std::sync::Arc<$crate::model::ModelMeta> {
                static META: $crate::once_cell::sync::OnceCell<std::sync::Arc<$crate::model::ModelMeta>> =
                    $crate::once_cell::sync::OnceCell::new();

                let meta = META.get_or_try_init(|| -> $crate::error::JsonDbResult<_> {
                    #[allow(unused_mut)]
                    let mut builder = $crate::model::ModelMeta::builder(stringify!($name));
                    $($(
                        builder = builder.base(&<$base as $crate::model::Model>::meta());
                    )+)?
                    $(
                        builder = builder.field(stringify!($field), ($field_def).build()?);
                    )*
                    $(builder = builder.collection($collection);)?
                    $(builder = builder.kwarg("frozen", $frozen);)?
                    $(builder = builder.kwarg("validate_assignment", $validate_assignment);)?
                    builder.build()
                });

                match meta {
                    Ok(meta) => std::sync::Arc::clone(meta),
                    Err(e) => panic!("模型 {} 定义失败: {}", stringify!($name), e),
                }
            }

            fn from_instance(instance: $crate::model::ModelInstance) -> Self {
                Self { instance }
            }

            fn instance(&self) -> &$crate::model::ModelInstance {
                &self.instance
            }

            fn instance_mut(&mut self) -> &mut $crate::model::ModelInstance {
                &mut self.instance
            }
        }

        impl $name {
            $(
                /// 读取字段值
                pub fn $field(&self) -> Option<&$crate::types::DataValue> {
                    self.instance.get(stringify!($field))
                }
            )*
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.instance, f)
            }
        }

        impl From<$name> for $crate::model::ModelInstance {
            fn from(model: $name) -> Self {
                model.instance
            }
        }

        $($crate::define_model!(@hashable $name $frozen);)?
    };

}
