use serde_json::{Value, json};
use tempfile::TempDir;
use trellis_domain::config::LoaderConfig;
use trellis_loader::*;

fn write(temp: &TempDir, name: &str, text: &str) {
    std::fs::write(temp.path().join(name), text).unwrap();
}

#[tokio::test]
async fn test_relative_path_is_resolved_against_root() {
    let temp = TempDir::new().unwrap();
    write(&temp, "router.json", r#"{ "path": "/users" }"#);

    let loader = DefaultLoader::builder().root(temp.path()).build().unwrap();

    assert_eq!(loader.resolve_path("./router.json").unwrap(), temp.path().join("router.json"));
    let loaded = loader.load(json!("./router.json"), Format::Json).await.unwrap();
    assert_eq!(loaded, json!({ "path": "/users" }));
}

#[tokio::test]
async fn test_text_format_returns_raw_string() {
    let temp = TempDir::new().unwrap();
    write(&temp, "banner.txt", "hello\n");

    let loader = DefaultLoader::builder().root(temp.path()).build().unwrap();
    let loaded = loader.load(json!("./banner.txt"), Format::Text).await.unwrap();

    assert_eq!(loaded, Value::String("hello\n".into()));
}

#[tokio::test]
async fn test_absolute_and_file_uris_read_the_filesystem() {
    let temp = TempDir::new().unwrap();
    write(&temp, "app.json", r#"{ "name": "abs" }"#);
    let absolute = temp.path().join("app.json").to_string_lossy().into_owned();

    let loader = DefaultLoader::builder().build().unwrap();

    let loaded = loader.load(json!(absolute.clone()), Format::Json).await.unwrap();
    assert_eq!(loaded["name"], "abs");

    let loaded = loader.load(json!(format!("file://{absolute}")), Format::Json).await.unwrap();
    assert_eq!(loaded["name"], "abs");
}

#[tokio::test]
async fn test_invalid_json_is_reported_with_reference() {
    let temp = TempDir::new().unwrap();
    write(&temp, "broken.json", "{ not json");

    let loader = DefaultLoader::builder().root(temp.path()).build().unwrap();
    let err = loader.load(json!("./broken.json"), Format::Json).await.unwrap_err();

    assert_eq!(err.kind(), "Json");
    assert!(err.context_ref().unwrap().contains("./broken.json"));
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let temp = TempDir::new().unwrap();
    let loader = DefaultLoader::builder().root(temp.path()).build().unwrap();

    let err = loader.load(json!("./absent.json"), Format::Json).await.unwrap_err();

    assert_eq!(err.kind(), "NotFound");
    assert!(err.to_string().contains("./absent.json"));
}

#[tokio::test]
async fn test_unknown_scheme_is_unsupported() {
    let loader = DefaultLoader::builder().build().unwrap();
    let err = loader.load(json!("ftp://host/file.json"), Format::Json).await.unwrap_err();
    assert_eq!(err.kind(), "Unsupported");
}

#[tokio::test]
async fn test_inline_values_pass_through_without_fetching() {
    let loader = MemoryLoader::new();

    for value in [json!("plain text"), json!(42), json!(null), json!({ "a": 1 }), json!([1, 2])] {
        assert_eq!(loader.load(value.clone(), Format::Json).await.unwrap(), value);
    }
    assert_eq!(loader.fetch_count(), 0);
}

#[tokio::test]
async fn test_load_all_resolves_every_entry() {
    let loader = MemoryLoader::new()
        .with("./db.json", r#"{ "url": "mem://" }"#)
        .with("./cache.json", r#"{ "ttl": 30 }"#);

    let mut entries = trellis_domain::Properties::new();
    entries.insert("db".into(), json!("./db.json"));
    entries.insert("cache".into(), json!("./cache.json"));
    entries.insert("inline".into(), json!({ "kept": true }));

    let loaded = loader.load_all(entries, Format::Json).await.unwrap();

    assert_eq!(loaded["db"], json!({ "url": "mem://" }));
    assert_eq!(loaded["cache"], json!({ "ttl": 30 }));
    assert_eq!(loaded["inline"], json!({ "kept": true }));
    assert_eq!(loader.fetch_count(), 2);
}

#[tokio::test]
async fn test_load_all_fails_as_a_whole() {
    let loader = MemoryLoader::new().with("./ok.json", "{}");

    let mut entries = trellis_domain::Properties::new();
    entries.insert("ok".into(), json!("./ok.json"));
    entries.insert("missing".into(), json!("./missing.json"));

    let err = loader.load_all(entries, Format::Json).await.unwrap_err();
    assert_eq!(err.kind(), "NotFound");
}

#[test]
fn test_from_config_accepts_disabled_timeout() {
    let config = LoaderConfig { root: "/srv/trellis".into(), timeout_ms: 0 };
    let loader = DefaultLoader::from_config(&config).unwrap();

    assert_eq!(
        loader.resolve_path("./app.json").unwrap(),
        std::path::Path::new("/srv/trellis").join("app.json")
    );
    assert_eq!(loader.resolve_path("app.json").unwrap_err().kind(), "Unsupported");
}
