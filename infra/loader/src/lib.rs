//! # Loader
//!
//! Resolves *deferred references* into data. A reference is a plain string that
//! stands in for content which has not been fetched yet:
//!
//! * `./config.json`, `~/app.json`: local paths, resolved against the configured
//!   root or the home directory;
//! * `file:///etc/app.json`, `https://host/app.json`, `/etc/app.json`: URIs;
//! * anything else is inline data and is passed through untouched, as is every
//!   non-string value.
//!
//! The [`Loader`] trait is the seam the kernel depends on. [`DefaultLoader`]
//! talks to the filesystem and HTTP, [`MemoryLoader`] serves embedded documents.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use trellis_loader::{Format, Loader, LoadError, MemoryLoader};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), LoadError> {
//! let loader = MemoryLoader::new().with("./router.json", r#"{ "path": "/x" }"#);
//!
//! let loaded = loader.load(json!("./router.json"), Format::Json).await?;
//! assert_eq!(loaded, json!({ "path": "/x" }));
//!
//! // Inline data is returned as-is.
//! let inline = loader.load(json!({ "path": "/y" }), Format::Json).await?;
//! assert_eq!(inline, json!({ "path": "/y" }));
//! # Ok(())
//! # }
//! ```

mod error;
mod fetch;
mod loader;
mod memory;
mod reference;

pub use error::{LoadError, LoadErrorExt};
pub use fetch::{DefaultLoader, DefaultLoaderBuilder, DefaultLoaderInner};
pub use loader::{Format, Loader};
pub use memory::MemoryLoader;
pub use reference::{Reference, is_path, is_uri};
