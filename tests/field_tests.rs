//! 字段约束测试
//!
//! 通过模型构造验证各类字段的约束、转换与默认值行为

use rat_jsondb::{
    boolean_field, data_map, float_field, integer_field, string_field, uuid_field, Bound, DataValue,
    ErrorCode, JsonDbError, ModelInstance, ModelMeta, StringFormat, ValidationError,
};
use std::sync::Arc;

fn single_field_model(name: &str, field: rat_jsondb::ModelField) -> Arc<ModelMeta> {
    ModelMeta::builder("Sample")
        .field(name, field)
        .build()
        .expect("模型构建失败")
}

/// 取出构造错误中指定字段的错误码
fn construction_code(result: Result<ModelInstance, JsonDbError>, field: &str) -> ErrorCode {
    match result {
        Err(JsonDbError::Validation(error @ ValidationError::Construction { .. })) => error
            .error_for(field)
            .map(|e| e.code.clone())
            .expect("字段没有错误"),
        other => panic!("期望构造错误，实际: {:?}", other),
    }
}

#[test]
fn test_string_min_length() {
    let meta = single_field_model("username", string_field().min_length(5).build().unwrap());

    let code = construction_code(ModelInstance::new(&meta, data_map! { "username" => "abc" }), "username");
    assert_eq!(code, ErrorCode::MinLength(5));

    let ok = ModelInstance::new(&meta, data_map! { "username" => "admin" }).unwrap();
    assert_eq!(ok.get_item("username").unwrap(), &DataValue::from("admin"));
}

#[test]
fn test_string_max_length() {
    let meta = single_field_model("code", string_field().max_length(3).build().unwrap());
    let code = construction_code(ModelInstance::new(&meta, data_map! { "code" => "abcd" }), "code");
    assert_eq!(code, ErrorCode::MaxLength(3));
}

#[test]
fn test_trim_whitespace_option() {
    let trimmed = single_field_model("name", string_field().build().unwrap());
    let kept = single_field_model("name", string_field().trim_whitespace(false).build().unwrap());

    let a = ModelInstance::new(&trimmed, data_map! { "name" => "  bob  " }).unwrap();
    let b = ModelInstance::new(&kept, data_map! { "name" => "  bob  " }).unwrap();
    assert_eq!(a.get_item("name").unwrap(), &DataValue::from("bob"));
    assert_eq!(b.get_item("name").unwrap(), &DataValue::from("  bob  "));
}

#[test]
fn test_allow_blank() {
    let strict = single_field_model("bio", string_field().build().unwrap());
    let code = construction_code(ModelInstance::new(&strict, data_map! { "bio" => "   " }), "bio");
    assert_eq!(code, ErrorCode::Blank);

    let blank = single_field_model("bio", string_field().allow_blank(true).build().unwrap());
    let missing = ModelInstance::new(&blank, data_map! {}).unwrap();
    assert_eq!(missing.get_item("bio").unwrap(), &DataValue::from(""));

    // allow_blank 且允许转换时 null 变成空字符串
    let coerced = ModelInstance::new(&blank, data_map! { "bio" => DataValue::Null }).unwrap();
    assert_eq!(coerced.get_item("bio").unwrap(), &DataValue::from(""));
}

#[test]
fn test_nullable_fields_default_to_null() {
    let meta = ModelMeta::builder("Profile")
        .field("nickname", string_field().nullable(true).build().unwrap())
        .field("score", integer_field().nullable(true).build().unwrap())
        .field("verified", boolean_field().nullable(true).build().unwrap())
        .build()
        .unwrap();

    let profile = ModelInstance::new(&meta, data_map! { "score" => "" }).unwrap();
    assert_eq!(profile.get_item("nickname").unwrap(), &DataValue::Null);
    assert_eq!(profile.get_item("score").unwrap(), &DataValue::Null);
    assert_eq!(profile.get_item("verified").unwrap(), &DataValue::Null);
}

#[test]
fn test_required_field_reports_missing_value() {
    let meta = single_field_model("title", string_field().build().unwrap());
    match ModelInstance::new(&meta, data_map! {}) {
        Err(JsonDbError::Validation(error)) => {
            let entry = error.error_for("title").unwrap();
            assert_eq!(entry.code, ErrorCode::Required);
            assert_eq!(entry.value, None);
            assert!(!entry.message.is_empty());
        }
        other => panic!("期望验证错误，实际: {:?}", other),
    }
}

#[test]
fn test_pattern_uses_search_semantics() {
    let meta = single_field_model("sku", string_field().pattern(r"\d{3}").build().unwrap());
    assert!(ModelInstance::new(&meta, data_map! { "sku" => "AB-123-X" }).is_ok());
    let code = construction_code(ModelInstance::new(&meta, data_map! { "sku" => "AB-12" }), "sku");
    assert_eq!(code, ErrorCode::Pattern(r"\d{3}".to_string()));
}

#[test]
fn test_date_format_returns_native_date() {
    let meta = single_field_model("birthday", string_field().fmt("date").build().unwrap());
    let ok = ModelInstance::new(&meta, data_map! { "birthday" => "1991-1-2" }).unwrap();
    assert!(matches!(ok.get_item("birthday").unwrap(), DataValue::Date(_)));

    let code = construction_code(
        ModelInstance::new(&meta, data_map! { "birthday" => "02/01/1991" }),
        "birthday",
    );
    assert_eq!(code, ErrorCode::Format(StringFormat::Date));

    let code = construction_code(
        ModelInstance::new(&meta, data_map! { "birthday" => "2021-02-30" }),
        "birthday",
    );
    assert_eq!(code, ErrorCode::InvalidValue(StringFormat::Date));
}

#[test]
fn test_email_and_uuid_formats() {
    let meta = ModelMeta::builder("Account")
        .field("email", string_field().fmt("email").build().unwrap())
        .field("id", uuid_field().build().unwrap())
        .build()
        .unwrap();

    let account = ModelInstance::new(
        &meta,
        data_map! {
            "email" => "example@gmail.com",
            "id" => "158b71a9-e817-446c-ba87-ae626c587234",
        },
    )
    .unwrap();
    assert!(matches!(account.get_item("id").unwrap(), DataValue::Uuid(_)));

    let err = ModelInstance::new(&meta, data_map! { "email" => "example.com", "id" => "nope" }).unwrap_err();
    let JsonDbError::Validation(error) = err else {
        panic!("期望验证错误");
    };
    assert_eq!(error.errors().len(), 2);
    assert_eq!(error.error_for("email").unwrap().code, ErrorCode::Format(StringFormat::Email));
    assert_eq!(error.error_for("id").unwrap().code, ErrorCode::Format(StringFormat::Uuid));
}

#[test]
fn test_time_datetime_ip_url_formats() {
    let meta = ModelMeta::builder("Event")
        .field("at", string_field().fmt("time").build().unwrap())
        .field("when", string_field().fmt("datetime").build().unwrap())
        .field("host", string_field().fmt("ipaddress").build().unwrap())
        .field("link", string_field().fmt("url").build().unwrap())
        .build()
        .unwrap();

    let event = ModelInstance::new(
        &meta,
        data_map! {
            "at" => "12:30",
            "when" => "2020-02-29T12:34:56+08:00",
            "host" => "::1",
            "link" => "https://example.com/path?q=1",
        },
    )
    .unwrap();
    assert!(matches!(event.get_item("at").unwrap(), DataValue::Time(_)));
    assert!(matches!(event.get_item("when").unwrap(), DataValue::DateTime(_)));
    assert!(matches!(event.get_item("host").unwrap(), DataValue::IpAddr(_)));
    assert_eq!(event.get_item("link").unwrap(), &DataValue::from("https://example.com/path?q=1"));
}

#[test]
fn test_unknown_format_tag_fails_at_build() {
    match string_field().fmt("text").build() {
        Err(JsonDbError::InvalidFormat { fmt, allowed }) => {
            assert_eq!(fmt, "text");
            assert!(allowed.contains(&"email"));
        }
        other => panic!("期望 InvalidFormat，实际: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_integer_inclusive_range() {
    let meta = single_field_model("age", integer_field().ge(0).le(150).build().unwrap());

    assert!(ModelInstance::new(&meta, data_map! { "age" => 0 }).is_ok());
    assert!(ModelInstance::new(&meta, data_map! { "age" => 150 }).is_ok());
    assert_eq!(
        construction_code(ModelInstance::new(&meta, data_map! { "age" => -1 }), "age"),
        ErrorCode::Minimum(Bound::Int(0))
    );
    assert_eq!(
        construction_code(ModelInstance::new(&meta, data_map! { "age" => 151 }), "age"),
        ErrorCode::Maximum(Bound::Int(150))
    );
    assert_eq!(
        construction_code(ModelInstance::new(&meta, data_map! { "age" => "1.5" }), "age"),
        ErrorCode::Integer
    );
}

#[test]
fn test_float_exclusive_range() {
    let meta = single_field_model("ratio", float_field().gt(0.0).lt(1.0).build().unwrap());

    let ok = ModelInstance::new(&meta, data_map! { "ratio" => "0.25" }).unwrap();
    assert_eq!(ok.get_item("ratio").unwrap(), &DataValue::Float(0.25));
    assert_eq!(
        construction_code(ModelInstance::new(&meta, data_map! { "ratio" => 0.0 }), "ratio"),
        ErrorCode::ExclusiveMinimum(Bound::Float(0.0))
    );
    assert_eq!(
        construction_code(ModelInstance::new(&meta, data_map! { "ratio" => 1.0 }), "ratio"),
        ErrorCode::ExclusiveMaximum(Bound::Float(1.0))
    );
}

#[test]
fn test_integer_bounds_exact_at_i64_limits() {
    let meta = single_field_model("n", integer_field().le(i64::MAX - 1).build().unwrap());

    assert!(ModelInstance::new(&meta, data_map! { "n" => i64::MAX - 1 }).is_ok());
    assert_eq!(
        construction_code(ModelInstance::new(&meta, data_map! { "n" => i64::MAX }), "n"),
        ErrorCode::Maximum(Bound::Int(i64::MAX - 1))
    );
}

#[test]
fn test_integer_overflow_is_rejected_not_saturated() {
    let meta = single_field_model("n", integer_field().build().unwrap());

    assert_eq!(
        construction_code(ModelInstance::new(&meta, data_map! { "n" => "9223372036854775808" }), "n"),
        ErrorCode::Integer
    );
    assert_eq!(
        construction_code(ModelInstance::new(&meta, data_map! { "n" => 9_223_372_036_854_775_808.0 }), "n"),
        ErrorCode::Integer
    );

    let max = ModelInstance::new(&meta, data_map! { "n" => "9223372036854775807" }).unwrap();
    assert_eq!(max.get_item("n").unwrap(), &DataValue::Int(i64::MAX));
}

#[test]
fn test_invalid_default_fails_at_build() {
    match string_field().min_length(5).default("abc").build() {
        Err(JsonDbError::Validation(ValidationError::DefaultValue(entry))) => {
            assert_eq!(entry.field, "default");
            assert_eq!(entry.value, Some(DataValue::from("abc")));
            assert_eq!(entry.code, ErrorCode::MinLength(5));
        }
        other => panic!("期望默认值错误，实际: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_read_only_field_is_forced_to_default() {
    let meta = ModelMeta::builder("Post")
        .field("title", string_field().build().unwrap())
        .field("status", string_field().default("draft").read_only(true).build().unwrap())
        .build()
        .unwrap();

    let post = ModelInstance::new(&meta, data_map! { "title" => "hello", "status" => "published" }).unwrap();
    assert_eq!(post.get_item("status").unwrap(), &DataValue::from("draft"));
}
