use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_defaults() {
    let config = RunConfig::default();
    assert!(config.cache_path.is_some());
    assert!(config.demo_scene);
    assert_eq!(config.translator.kind, TranslatorKind::Http);
    assert_eq!(config.translator.model, "gpt-4o-mini");
    assert_eq!(config.translator.timeout, Duration::from_secs(60));
}

#[test]
fn test_no_translator_without_url() {
    assert!(TranslatorConfig::default().build().is_none());
}

#[test]
fn test_translator_built_for_each_kind() {
    for kind in [TranslatorKind::Http, TranslatorKind::Chat] {
        let config = TranslatorConfig {
            kind,
            url: Some("http://127.0.0.1:9/translate".to_owned()),
            ..TranslatorConfig::default()
        };
        assert!(config.build().is_some());
    }
}

#[test]
fn test_translator_kind_parses_from_flag_value() {
    use clap::ValueEnum;

    assert_eq!(TranslatorKind::from_str("http", false), Ok(TranslatorKind::Http));
    assert_eq!(TranslatorKind::from_str("chat", false), Ok(TranslatorKind::Chat));
    assert!(TranslatorKind::from_str("grpc", false).is_err());
}
