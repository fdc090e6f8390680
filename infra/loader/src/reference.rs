use std::fmt;

/// Classification of a raw string handed to a loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference<'a> {
    /// `./relative` or `~/home-relative` path.
    Path(&'a str),
    /// `scheme://authority/...` or an absolute `/path`.
    Uri(&'a str),
    /// Not a reference; the string is data in its own right.
    Inline(&'a str),
}

impl<'a> Reference<'a> {
    #[must_use]
    pub fn classify(raw: &'a str) -> Self {
        if is_path(raw) {
            Self::Path(raw)
        } else if is_uri(raw) {
            Self::Uri(raw)
        } else {
            Self::Inline(raw)
        }
    }

    /// Whether the string must be fetched before it can be used.
    #[must_use]
    pub const fn is_deferred(&self) -> bool {
        !matches!(self, Self::Inline(_))
    }

    #[must_use]
    pub const fn as_str(&self) -> &'a str {
        match self {
            Self::Path(raw) | Self::Uri(raw) | Self::Inline(raw) => raw,
        }
    }
}

impl fmt::Display for Reference<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True for `./` and `~/` prefixed strings.
#[must_use]
pub fn is_path(raw: &str) -> bool {
    raw.starts_with("./") || raw.starts_with("~/")
}

/// True for absolute paths and for `scheme://authority/...` URIs.
///
/// A scheme is one or more of `[A-Za-z0-9_+-]`; the authority must be followed
/// by a `/`, so `https://host` alone is inline data while `https://host/` is not.
#[must_use]
pub fn is_uri(raw: &str) -> bool {
    if raw.starts_with('/') {
        return true;
    }
    let Some((scheme, rest)) = raw.split_once("://") else {
        return false;
    };
    let scheme_ok = !scheme.is_empty()
        && scheme.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+'));
    scheme_ok && rest.char_indices().any(|(i, c)| c == '/' && i > 0)
}
