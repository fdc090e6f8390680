use std::borrow::Cow;
use trellis_derive::trellis_error;

#[trellis_error]
#[derive(Debug)]
pub enum DemoError {
    #[error("Parse error{}: {source}", format_context(.context))]
    Parse {
        #[source]
        source: std::num::ParseIntError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Rejected: {reason}")]
    Rejected { reason: String },
}

fn parse(raw: &str) -> Result<i64, DemoError> {
    raw.parse::<i64>().context("parsing count")
}

fn main() {
    let err = parse("x").unwrap_err();
    assert_eq!(err.kind(), "Parse");
    assert_eq!(err.context_ref(), Some("parsing count"));

    let rejected = DemoError::Rejected { reason: "no".to_owned() };
    assert_eq!(rejected.kind(), "Rejected");
    assert_eq!(rejected.context_ref(), None);
}
