use std::borrow::Cow;

#[trellis_derive::trellis_error]
pub enum DemoError {
    #[error("I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Missing entry{}: {message}", format_context(.context))]
    Missing { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read_missing() -> Result<String, DemoError> {
    let raw = std::fs::read_to_string("/definitely/not/here.json").context("reading fixture")?;
    Ok(raw)
}

#[test]
fn source_errors_convert_with_context() {
    let err = read_missing().expect_err("file must not exist");
    assert_eq!(err.kind(), "Io");
    assert_eq!(err.context_ref(), Some("reading fixture"));
    assert!(err.to_string().starts_with("I/O error (reading fixture): "));
}

#[test]
fn context_can_be_attached_after_the_fact() {
    let result: Result<(), DemoError> =
        Err(DemoError::Missing { message: "Router".into(), context: None });
    let err = result.context("resolving stack").expect_err("error expected");

    assert_eq!(err.kind(), "Missing");
    assert_eq!(err.to_string(), "Missing entry (resolving stack): Router");
}

#[test]
fn strings_fall_back_to_internal() {
    let err: DemoError = "boom".into();
    assert_eq!(err.kind(), "Internal");
    assert_eq!(err.context_ref(), None);
    assert_eq!(err.to_string(), "Internal error: boom");

    let err: DemoError = format!("boom {}", 2).into();
    assert_eq!(err.to_string(), "Internal error: boom 2");
}

#[test]
fn trellis_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/trellis_error_pass.rs");
}
