use std::path::PathBuf;
use tempfile::TempDir;
use trellis_domain::config::AppConfig;
use trellis_kernel::config::load_config;

#[test]
fn test_loads_toml_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("trellis.toml");
    std::fs::write(
        &path,
        r#"
prefix = "Custom"
application = "./application.json"

[log]
level = "debug"
suppress = ["trellis_loader"]

[loader]
root = "/srv/trellis"
timeout_ms = 250
"#,
    )
    .unwrap();

    let config: AppConfig = load_config(Some(&path)).unwrap();

    assert_eq!(config.prefix, "Custom");
    assert_eq!(config.application, "./application.json");
    assert_eq!(config.log.level, "debug");
    assert_eq!(config.log.suppress, ["trellis_loader"]);
    assert!(config.log.console);
    assert_eq!(config.loader.root, PathBuf::from("/srv/trellis"));
    assert_eq!(config.loader.timeout_ms, 250);
}

#[test]
fn test_explicit_missing_file_is_an_error() {
    let temp = TempDir::new().unwrap();
    let err = load_config::<AppConfig>(Some(temp.path().join("absent.toml"))).unwrap_err();
    assert_eq!(err.kind(), "Config");
    assert_eq!(err.context_ref(), Some("Failed to build config"));
}
