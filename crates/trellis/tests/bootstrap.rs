use serde_json::json;
use trellis::domain::config::AppConfig;
use trellis::domain::{Request, Response};
use trellis::kernel::HandlerClass;
use trellis::{application, handlers, registry};

#[test]
fn registry_holds_builtin_handlers() {
    let registry = registry();

    assert!(registry.exists(handlers::HANDLER, ""));
    assert!(registry.exists(handlers::APPLICATION, ""));
    for name in handlers::PASS_THROUGH {
        assert!(registry.exists(name, ""), "{name} should be registered");
    }
}

#[tokio::test]
async fn prefixed_stage_replaces_builtin() {
    let mut config = AppConfig::default();
    config.prefix = "Custom".into();

    let mut registry = registry();
    registry.register(HandlerClass::new("CustomRouter"));
    let context = trellis::context_with(&config, registry).unwrap();

    let router = context.create("Router", json!({}), None).await.unwrap();
    assert_eq!(router.name(), "CustomRouter");
    let session = context.create("Session", json!({}), None).await.unwrap();
    assert_eq!(session.name(), "Session");
}

#[tokio::test]
async fn default_application_runs_end_to_end() {
    let context = trellis::context(&AppConfig::default()).unwrap();

    let mut app = context.create(handlers::APPLICATION, json!({}), None).await.unwrap();
    let log = application::prepare(app.as_mut(), context.loader(), json!({ "log": { "level": "warn" } }))
        .await
        .unwrap();
    assert_eq!(log.map(|l| l.level).as_deref(), Some("warn"));

    let mut response = Response::new();
    let envelope = context
        .invoke(app.as_mut(), &Request::default(), &mut response, json!({ "controller": { "action": "list" } }))
        .await
        .unwrap();

    assert!(envelope.is_success());
    assert_eq!(envelope.data.unwrap()["action"], "list");
    assert_eq!(response.get("application"), Some(&json!("Trellis")));
}
