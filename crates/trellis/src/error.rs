use std::borrow::Cow;

/// A specialized [`TrellisError`] enum of this crate.
#[trellis_derive::trellis_error]
pub enum TrellisError {
    #[error("Loader setup failed{}: {source}", format_context(.context))]
    Loader { source: trellis_loader::LoadError, context: Option<Cow<'static, str>> },

    #[error("Context setup failed{}: {source}", format_context(.context))]
    Kernel { source: trellis_kernel::KernelError, context: Option<Cow<'static, str>> },
}
