//! 模型配置测试
//!
//! 配置文件加载、构建器与配置来源冲突

use rat_jsondb::{ExtraFields, JsonDbError, ModelConfig, ModelMeta};
use std::io::Write;
use tempfile::Builder;

#[test]
fn test_load_toml_config() {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "frozen = true\nextra = \"ignore\"").unwrap();

    let config = ModelConfig::from_file(file.path()).unwrap();
    assert!(config.frozen);
    assert!(config.validate_assignment);
    assert_eq!(config.extra, ExtraFields::Ignore);
}

#[test]
fn test_load_json_config() {
    let mut file = Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, r#"{{"validate_assignment": false}}"#).unwrap();

    let config = ModelConfig::from_file(file.path()).unwrap();
    assert!(!config.frozen);
    assert!(!config.validate_assignment);
}

#[test]
fn test_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.toml");
    let config = ModelConfig::builder().frozen(true).build_config();

    config.save_to_file(&path).unwrap();
    assert_eq!(ModelConfig::from_file(&path).unwrap(), config);
}

#[test]
fn test_unsupported_extension() {
    let file = Builder::new().suffix(".yaml").tempfile().unwrap();
    assert!(matches!(
        ModelConfig::from_file(file.path()),
        Err(JsonDbError::ConfigError { .. })
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        ModelConfig::from_file(dir.path().join("absent.toml")),
        Err(JsonDbError::IoError(_))
    ));
}

#[test]
fn test_malformed_file_is_config_error() {
    let mut file = Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, "{{ not json").unwrap();
    assert!(matches!(
        ModelConfig::from_file(file.path()),
        Err(JsonDbError::ConfigError { .. })
    ));
}

#[test]
fn test_loaded_config_applies_to_model() {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "frozen = true").unwrap();
    let config = ModelConfig::from_file(file.path()).unwrap();

    let meta = ModelMeta::builder("FromFile").config(config.into()).build().unwrap();
    assert!(meta.config().frozen);
    assert!(meta.is_hashable());
}

#[test]
fn test_duplicate_config_sources_rejected() {
    let result = ModelMeta::builder("Twice")
        .config(ModelConfig::builder().frozen(true).build())
        .kwarg("frozen", false)
        .build();
    assert!(matches!(result, Err(JsonDbError::DuplicateConfig)));

    // 非配置项的关键字参数不冲突
    let ok = ModelMeta::builder("Once")
        .config(ModelConfig::builder().frozen(true).build())
        .kwarg("label", "x")
        .build();
    assert!(ok.is_ok());
}

#[test]
fn test_valid_config_attrs() {
    let attrs = ModelConfig::valid_config_attrs();
    assert!(attrs.contains(&"frozen"));
    assert!(attrs.contains(&"validate_assignment"));
    assert_eq!(
        ModelConfig::default().to_string(),
        "ModelConfig(frozen=false, validate_assignment=true, extra='forbid')"
    );
}
