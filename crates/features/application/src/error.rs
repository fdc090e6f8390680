use std::borrow::Cow;

/// A specialized [`ApplicationError`] enum of this crate.
#[trellis_derive::trellis_error]
pub enum ApplicationError {
    #[error("Application kernel error{}: {source}", format_context(.context))]
    Kernel { source: trellis_kernel::KernelError, context: Option<Cow<'static, str>> },

    /// An `include` entry could not be loaded.
    #[error("Application include error{}: {source}", format_context(.context))]
    Load { source: trellis_loader::LoadError, context: Option<Cow<'static, str>> },

    /// A configuration section does not match its model.
    #[error("Application config error{}: {source}", format_context(.context))]
    Config { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// A section has the wrong shape.
    #[error("Invalid application data{}: {message}", format_context(.context))]
    Invalid { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal application error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
