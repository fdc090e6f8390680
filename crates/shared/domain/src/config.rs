use serde::Deserialize;
use serde_json::Value;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level application configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfigInner {
    pub log: LogConfig,
    pub loader: LoaderConfig,
    /// Override prefix applied when successors are resolved (e.g. `"Custom"`).
    pub prefix: String,
    /// Data (or a reference to it) the root `Application` handler is created from.
    pub application: Value,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(flatten, default)]
    inner: Arc<AppConfigInner>,
}

impl Deref for AppConfig {
    type Target = AppConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for AppConfig {
    fn deref_mut(&mut self) -> &mut AppConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Logging output settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default level (`trace`, `debug`, `info`, `warn`, `error`, `off`).
    pub level: String,
    /// Extra filter directives, e.g. `"trellis_kernel=debug"`.
    pub filter: Option<String>,
    /// Log targets to silence entirely.
    pub suppress: Vec<String>,
    pub console: bool,
    pub colors: bool,
    pub show_date: bool,
    pub show_source: bool,
    /// Directory for rolling log files; file output is disabled when unset.
    pub path: Option<PathBuf>,
    pub max_files: usize,
    pub json: bool,
}

/// External reference loader settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directory `./` references are resolved against.
    pub root: PathBuf,
    /// Upper bound for a single fetch; `0` disables the limit.
    pub timeout_ms: u64,
}

// --- Default ---

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            filter: None,
            suppress: Vec::new(),
            console: true,
            colors: false,
            show_date: true,
            show_source: false,
            path: None,
            max_files: 10,
            json: false,
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { root: PathBuf::from("."), timeout_ms: 30_000 }
    }
}
