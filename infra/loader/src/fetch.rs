//! Filesystem and HTTP backed loader.

use crate::error::{LoadError, LoadErrorExt};
use crate::loader::Loader;
use crate::reference::Reference;
use async_trait::async_trait;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tracing::{debug, warn};
use trellis_domain::config::LoaderConfig;

/// The internal shared state of a [`DefaultLoader`].
#[derive(Debug)]
pub struct DefaultLoaderInner {
    /// Directory `./` references are resolved against.
    pub(crate) root: PathBuf,
    /// Upper bound for one fetch.
    pub(crate) timeout: Option<Duration>,
    pub(crate) client: reqwest::Client,
}

/// Loader backed by the local filesystem and an HTTP client.
///
/// The handle is reference-counted and cheap to clone.
///
/// # Example
///
/// ```rust
/// use trellis_loader::{DefaultLoader, Format, Loader, LoadError};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), LoadError> {
/// # let tmp = tempfile::tempdir().unwrap();
/// # std::fs::write(tmp.path().join("app.json"), r#"{ "name": "demo" }"#).unwrap();
/// let loader = DefaultLoader::builder().root(tmp.path()).build()?;
/// let app = loader.load("./app.json".into(), Format::Json).await?;
/// assert_eq!(app["name"], "demo");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DefaultLoader {
    inner: Arc<DefaultLoaderInner>,
}

impl Deref for DefaultLoader {
    type Target = DefaultLoaderInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DefaultLoader {
    #[must_use = "The loader is not created until you call .build()"]
    pub fn builder() -> DefaultLoaderBuilder {
        DefaultLoaderBuilder::default()
    }

    /// Builds a loader from the `loader` section of the application config.
    ///
    /// # Errors
    /// Returns [`LoadError::Http`] if the HTTP client cannot be initialized.
    pub fn from_config(config: &LoaderConfig) -> Result<Self, LoadError> {
        let builder = Self::builder().root(&config.root);
        if config.timeout_ms == 0 {
            builder.build()
        } else {
            builder.timeout(Duration::from_millis(config.timeout_ms)).build()
        }
    }

    /// Maps a `./` or `~/` reference onto the filesystem.
    ///
    /// # Errors
    /// Returns [`LoadError::Internal`] when `~/` is used but no home directory is known,
    /// and [`LoadError::Unsupported`] for anything that is not a local path.
    pub fn resolve_path(&self, raw: &str) -> Result<PathBuf, LoadError> {
        if let Some(relative) = raw.strip_prefix("./") {
            return Ok(self.root.join(relative));
        }
        if let Some(relative) = raw.strip_prefix("~/") {
            let home = dirs::home_dir().ok_or_else(|| LoadError::Internal {
                message: "home directory is unknown".into(),
                context: Some(format!("resolving \"{raw}\"").into()),
            })?;
            return Ok(home.join(relative));
        }
        Err(LoadError::Unsupported { message: raw.to_owned().into(), context: Some("not a local path".into()) })
    }

    async fn read_file(&self, path: &Path) -> Result<String, LoadError> {
        debug!(path = %path.display(), "Reading file");
        fs::read_to_string(path).await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LoadError::NotFound { message: path.display().to_string().into(), context: None }
            } else {
                LoadError::Io { source, context: Some(path.display().to_string().into()) }
            }
        })
    }

    async fn get(&self, url: &str) -> Result<String, LoadError> {
        debug!(url, "Fetching remote document");
        let response = self.client.get(url).send().await.context(format!("GET {url}"))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "Remote document unavailable");
            return Err(LoadError::Status {
                message: format!("{url} answered {status}").into(),
                context: None,
            });
        }

        response.text().await.context(format!("reading body of {url}"))
    }

    async fn fetch_uncapped(&self, reference: &Reference<'_>) -> Result<String, LoadError> {
        match *reference {
            Reference::Path(raw) => self.read_file(&self.resolve_path(raw)?).await,
            Reference::Uri(raw) if raw.starts_with('/') => self.read_file(Path::new(raw)).await,
            Reference::Uri(raw) => {
                if let Some(path) = raw.strip_prefix("file://") {
                    self.read_file(Path::new(path)).await
                } else if raw.starts_with("http://") || raw.starts_with("https://") {
                    self.get(raw).await
                } else {
                    Err(LoadError::Unsupported {
                        message: raw.to_owned().into(),
                        context: Some("unknown URI scheme".into()),
                    })
                }
            },
            Reference::Inline(raw) => Ok(raw.to_owned()),
        }
    }
}

#[async_trait]
impl Loader for DefaultLoader {
    async fn fetch(&self, reference: &Reference<'_>) -> Result<String, LoadError> {
        let Some(limit) = self.timeout else {
            return self.fetch_uncapped(reference).await;
        };

        tokio::time::timeout(limit, self.fetch_uncapped(reference)).await.map_err(|_| {
            LoadError::Timeout {
                message: format!("\"{reference}\" took longer than {}ms", limit.as_millis()).into(),
                context: None,
            }
        })?
    }
}

/// Fluent builder for [`DefaultLoader`].
#[derive(Debug, Default)]
pub struct DefaultLoaderBuilder {
    root: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl DefaultLoaderBuilder {
    #[must_use = "Sets the directory `./` references are resolved against"]
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    #[must_use = "Caps how long a single fetch may take"]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Consumes the builder and creates the loader.
    ///
    /// # Errors
    /// Returns [`LoadError::Http`] if the HTTP client cannot be initialized.
    pub fn build(self) -> Result<DefaultLoader, LoadError> {
        let client = reqwest::Client::builder().build().context("Failed to build HTTP client")?;
        let root = self.root.unwrap_or_else(|| PathBuf::from("."));

        debug!(root = %root.display(), timeout = ?self.timeout, "Loader initialized");

        Ok(DefaultLoader {
            inner: Arc::new(DefaultLoaderInner { root, timeout: self.timeout, client }),
        })
    }
}
