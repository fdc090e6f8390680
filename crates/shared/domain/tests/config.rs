use serde_json::json;
use std::path::PathBuf;
use trellis_domain::config::{AppConfig, LoaderConfig, LogConfig};

#[test]
fn config_defaults_are_sane() {
    let log = LogConfig::default();
    assert_eq!(log.level, "info");
    assert!(log.console);
    assert!(log.path.is_none());
    assert_eq!(log.max_files, 10);

    let loader = LoaderConfig::default();
    assert_eq!(loader.root, PathBuf::from("."));
    assert_eq!(loader.timeout_ms, 30_000);

    let app = AppConfig::default();
    assert!(app.prefix.is_empty());
    assert!(app.application.is_null());
}

#[test]
fn app_config_deserializes() {
    let raw = json!({
        "log": { "level": "debug", "suppress": ["trellis_loader"], "show_source": true },
        "loader": { "root": "/srv/app", "timeout_ms": 500 },
        "prefix": "Custom",
        "application": "./.config/application.json"
    });

    let cfg: AppConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.log.level, "debug");
    assert_eq!(cfg.log.suppress, vec!["trellis_loader".to_owned()]);
    assert!(cfg.log.show_source);
    assert!(cfg.log.console, "unspecified fields keep their defaults");
    assert_eq!(cfg.loader.root, PathBuf::from("/srv/app"));
    assert_eq!(cfg.loader.timeout_ms, 500);
    assert_eq!(cfg.prefix, "Custom");
    assert_eq!(cfg.application, json!("./.config/application.json"));
}

#[test]
fn app_config_clones_share_until_mutated() {
    let original = AppConfig::default();
    let mut copy = original.clone();
    copy.prefix = "Custom".to_owned();

    assert!(original.prefix.is_empty());
    assert_eq!(copy.prefix, "Custom");
}
