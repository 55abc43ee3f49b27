//! Path addressing: `prefix::path` values and their pure derivations.
//!
//! A [`PathAddress`] names an entity on one of several mounted backends.
//! The portion left of the first `"::"` selects the backend; the rest is the
//! backend-local path, always `/`-separated. Parsing never fails: a string
//! without a separator is simply a path with an empty prefix, and whether a
//! path actually points at anything is the backend's call, not a syntax
//! question.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Separator between the filesystem prefix and the backend-local path.
pub const FS_SEPARATOR: &str = "::";

/// What can be known about an addressed entity without asking a backend.
///
/// Implemented by [`PathAddress`] and by the backend-confirmed types that
/// carry one ([`crate::types::FileInfo`], [`crate::contents::FilesystemContents`]).
pub trait PathInfo {
    /// Which filesystem (by prefix) this path belongs to.
    fn prefix(&self) -> &str;

    /// The backend-local path, without the prefix.
    fn full_path(&self) -> &str;

    /// The canonical `prefix::path` string form.
    fn prefixed_path(&self) -> String {
        format!("{}{}{}", self.prefix(), FS_SEPARATOR, self.full_path())
    }

    /// Final path component, without any parent folders.
    fn basename(&self) -> &str {
        let trimmed = self.full_path().trim_end_matches('/');
        trimmed.rsplit('/').next().unwrap_or(trimmed)
    }

    /// Parent folder of this path; `"."` when there is no parent component.
    fn dirname(&self) -> &str {
        let trimmed = self.full_path().trim_end_matches('/');
        if trimmed.is_empty() {
            return if self.full_path().starts_with('/') { "/" } else { "." };
        }
        match trimmed.rfind('/') {
            Some(0) => "/",
            Some(pos) => &trimmed[..pos],
            None => ".",
        }
    }

    /// File extension of the final component, empty when there is none.
    ///
    /// A leading dot does not start an extension, so `".profile"` has none.
    fn extension(&self) -> &str {
        let base = self.basename();
        match base.rfind('.') {
            Some(pos) if pos > 0 => &base[pos + 1..],
            _ => "",
        }
    }
}

/// An immutable `prefix::path` value.
///
/// Every "modification" below builds a new value; the original is untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathAddress {
    prefix: String,
    path: String,
}

impl PathAddress {
    /// Split a string at the first `"::"`.
    ///
    /// Anything after that first separator is kept intact as the path, even
    /// if it contains further `"::"` sequences. A string without a separator
    /// becomes a path with an empty prefix. Any input is accepted.
    pub fn parse(s: &str) -> Self {
        match s.find(FS_SEPARATOR) {
            Some(pos) => Self {
                prefix: s[..pos].to_string(),
                path: s[pos + FS_SEPARATOR.len()..].to_string(),
            },
            None => Self {
                prefix: String::new(),
                path: s.to_string(),
            },
        }
    }

    /// Build an address from its two components.
    pub fn from_parts(prefix: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            path: path.into(),
        }
    }

    /// A new address with `child` appended below this one.
    pub fn with_child(&self, child: &str) -> Self {
        let child = child.trim_start_matches('/');
        let path = if self.path.is_empty() {
            format!("/{child}")
        } else if self.path.ends_with('/') {
            format!("{}{}", self.path, child)
        } else {
            format!("{}/{}", self.path, child)
        };
        Self {
            prefix: self.prefix.clone(),
            path,
        }
    }

    /// A new address without the file extension, if there was one.
    pub fn strip_extension(&self) -> Self {
        let ext_len = self.extension().len();
        if ext_len == 0 {
            return self.clone();
        }
        Self {
            prefix: self.prefix.clone(),
            path: self.path[..self.path.len() - ext_len - 1].to_string(),
        }
    }

    /// A new address with the file extension replaced (or added).
    pub fn with_extension(&self, extension: &str) -> Self {
        let stripped = self.strip_extension();
        let extension = extension.trim_start_matches('.');
        Self {
            prefix: stripped.prefix,
            path: format!("{}.{}", stripped.path, extension),
        }
    }

    /// The same backend-local path, addressed on a different filesystem.
    pub fn on_filesystem(&self, prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            path: self.path.clone(),
        }
    }
}

impl PathInfo for PathAddress {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn full_path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for PathAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefixed_path())
    }
}

impl From<&str> for PathAddress {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}
