//! 多语言消息模块
//!
//! 使用rat_embed_lang框架提供验证消息与错误消息的多语言支持

use once_cell::sync::Lazy;
use rat_embed_lang::register_translations;
use std::collections::HashMap;

type Translations = HashMap<String, HashMap<String, String>>;

/// 翻译注册器
pub struct MessageI18n;

impl MessageI18n {
    fn insert(translations: &mut Translations, key: &str, zh: &str, en: &str, ja: &str) {
        let mut entry = HashMap::new();
        entry.insert("zh-CN".to_string(), zh.to_string());
        entry.insert("en-US".to_string(), en.to_string());
        entry.insert("ja-JP".to_string(), ja.to_string());
        translations.insert(key.to_string(), entry);
    }

    /// 注册所有翻译
    pub fn register_all_translations() {
        let mut translations = HashMap::new();
        let t = &mut translations;

        // 类型错误
        Self::insert(t, "validation.type_string", "必须是字符串。", "Must be a string.", "文字列である必要があります。");
        Self::insert(t, "validation.type_boolean", "必须是有效的布尔值。", "Must be a valid boolean.", "有効な真偽値である必要があります。");
        Self::insert(t, "validation.type_number", "必须是数字。", "Must be a number.", "数値である必要があります。");
        Self::insert(t, "validation.null", "不能为 null。", "May not be null.", "null にはできません。");
        Self::insert(t, "validation.blank", "不能为空。", "Must not be blank.", "空にはできません。");

        // 字符串约束
        Self::insert(
            t,
            "validation.min_length",
            "至少需要 {min_length} 个字符。",
            "Must have at least {min_length} characters.",
            "{min_length} 文字以上である必要があります。",
        );
        Self::insert(
            t,
            "validation.max_length",
            "不能超过 {max_length} 个字符。",
            "Must have no more than {max_length} characters.",
            "{max_length} 文字以下である必要があります。",
        );
        Self::insert(
            t,
            "validation.pattern",
            "必须匹配模式 /{pattern}/。",
            "Must match the pattern /{pattern}/.",
            "パターン /{pattern}/ に一致する必要があります。",
        );

        // 格式
        Self::insert(
            t,
            "validation.format",
            "必须是有效的 {format} 格式。",
            "Must be a valid {format} format.",
            "有効な {format} 形式である必要があります。",
        );
        Self::insert(t, "validation.format_uuid", "必须是有效的 UUID 格式。", "Must be valid UUID format.", "有効な UUID 形式である必要があります。");
        Self::insert(
            t,
            "validation.format_ipaddress",
            "必须是有效的 IPv4 或 IPv6 地址。",
            "Must be a valid IPv4 or IPv6 address format.",
            "有効な IPv4 または IPv6 アドレスである必要があります。",
        );
        Self::insert(t, "validation.format_url", "必须是有效的 URL 格式。", "Must be a valid URL format.", "有効な URL 形式である必要があります。");
        Self::insert(
            t,
            "validation.invalid_value",
            "必须是真实存在的 {format}。",
            "Must be a real {format}.",
            "実在する {format} である必要があります。",
        );

        // 数值约束
        Self::insert(t, "validation.integer", "必须是整数。", "Must be an integer.", "整数である必要があります。");
        Self::insert(t, "validation.finite", "必须是有限数。", "Must be finite.", "有限の数値である必要があります。");
        Self::insert(
            t,
            "validation.minimum",
            "必须大于或等于 {minimum}。",
            "Must be greater than or equal to {minimum}.",
            "{minimum} 以上である必要があります。",
        );
        Self::insert(
            t,
            "validation.exclusive_minimum",
            "必须大于 {exclusive_minimum}。",
            "Must be greater than {exclusive_minimum}.",
            "{exclusive_minimum} より大きい必要があります。",
        );
        Self::insert(
            t,
            "validation.maximum",
            "必须小于或等于 {maximum}。",
            "Must be less than or equal to {maximum}.",
            "{maximum} 以下である必要があります。",
        );
        Self::insert(
            t,
            "validation.exclusive_maximum",
            "必须小于 {exclusive_maximum}。",
            "Must be less than {exclusive_maximum}.",
            "{exclusive_maximum} より小さい必要があります。",
        );

        // 模式
        Self::insert(t, "validation.required", "该字段为必填项。", "This field is required.", "このフィールドは必須です。");
        Self::insert(t, "validation.invalid_property", "无效的属性名。", "Invalid property name.", "無効なプロパティ名です。");

        // 配置与模型构建
        Self::insert(
            t,
            "error.config_file_format",
            "不支持的配置文件格式: {path}",
            "Unsupported configuration file format: {path}",
            "サポートされていない設定ファイル形式: {path}",
        );
        Self::insert(
            t,
            "error.config_parse",
            "解析配置文件失败: {message}",
            "Failed to parse configuration file: {message}",
            "設定ファイルの解析に失敗しました: {message}",
        );

        register_translations(translations);
    }

    /// 初始化多语言支持
    pub fn init() {
        Lazy::force(&REGISTERED);

        // 从环境变量获取语言设置，默认为zh-CN
        let lang = std::env::var("RAT_LANG")
            .or_else(|_| std::env::var("LANG"))
            .unwrap_or_else(|_| "zh-CN".to_string());

        let normalized_lang = normalize_language_code(&lang);
        set_language(&normalized_lang);
    }
}

static REGISTERED: Lazy<()> = Lazy::new(MessageI18n::register_all_translations);

/// 取得本地化消息
///
/// 首次调用时注册翻译；找不到翻译时使用内置英文模板
pub fn message(key: &str, args: &[(&str, &str)], fallback: &str) -> String {
    Lazy::force(&REGISTERED);
    let translated = tf(key, args);
    if !translated.is_empty() && translated != key {
        return translated;
    }
    args.iter().fold(fallback.to_string(), |text, (name, value)| {
        text.replace(&format!("{{{}}}", name), value)
    })
}

/// 重新导出rat_embed_lang的核心函数
pub use rat_embed_lang::{current_language, normalize_language_code, set_language, t, tf};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_never_returns_key() {
        let text = message("validation.min_length", &[("min_length", "3")], "at least {min_length}");
        assert_ne!(text, "validation.min_length");
        assert!(text.contains('3'));
    }
}
