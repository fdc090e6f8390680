use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Custom error type for config loading.
#[trellis_derive::trellis_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Name of the config file looked up when no path is given.
pub const DEFAULT_CONFIG: &str = "trellis";

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// Layers, later wins:
/// 1. **Base File**: any format the `config` crate understands (`trellis.toml`,
///    `trellis.json`, ...). Defaults to `trellis` in the current working directory and
///    is optional, so a deployment can run on defaults and environment alone.
///    An explicitly given path must exist.
/// 2. **Environment Overrides**: variables prefixed with `TRELLIS__`; nested keys are
///    separated by double underscores (`TRELLIS__LOADER__TIMEOUT_MS` maps to
///    `loader.timeout_ms`).
///
/// # Errors
/// Returns [`ConfigError::Config`] if an explicit file is missing, a source cannot be
/// parsed, or the merged values do not match `T`.
///
/// # Example
/// ```rust
/// use trellis_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let required = path.is_some();
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(Environment::with_prefix("TRELLIS").prefix_separator("__").separator("__"));

    info!(path = %effective_path.display(), required, "Loading config");

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
