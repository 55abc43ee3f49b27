//! Error type shared across the crate.
//!
//! Routine absences (a path the backend cannot describe) and invariant
//! breaches (cycles, bad seeks, ambiguous listings) travel through the same
//! enum; [`Error::is_skippable`] is how the tree-walking layer tells them
//! apart. Walks drop skippable failures and keep going, everything else is
//! surfaced to the caller.

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The backend could not describe what the path points to.
    #[error("cannot resolve '{path}': {reason}")]
    Unresolvable { path: String, reason: String },

    #[error("symlink cycle detected while resolving '{path}'")]
    SymlinkCycle { path: String },

    #[error("invalid seek position {position} (list has {len} entries)")]
    InvalidSeek { position: usize, len: usize },

    /// A listing reported the same name as both a file and a folder.
    #[error("'{name}' is tracked as both a file and a folder in '{path}'")]
    AmbiguousChildName { name: String, path: String },

    #[error("no entry named '{name}' in '{path}'")]
    NoSuchChild { name: String, path: String },

    #[error("'{path}' is not a folder")]
    NotAFolder { path: String },

    #[error("no filesystem mounted for prefix '{prefix}'")]
    UnknownPrefix { prefix: String },

    #[error("'{source_path}' and '{dest_path}' live on different filesystems")]
    CrossFilesystem {
        source_path: String,
        dest_path: String,
    },

    #[error("backend does not support {operation}")]
    Unsupported { operation: String },

    #[error("i/o failure on '{path}'")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Shorthand for the most common failure: a path nothing can be said about.
    pub fn unresolvable(path: impl ToString, reason: impl ToString) -> Self {
        Error::Unresolvable {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Failures a tree walk may treat as "not a match" and move past.
    ///
    /// Cycles, bad seeks, and ambiguous listings are never skippable; they
    /// mean an invariant is broken, not that an entry went missing.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            Error::Unresolvable { .. } | Error::NoSuchChild { .. } | Error::Io { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_failures_are_skippable() {
        assert!(Error::unresolvable("fs::/gone", "no such entry").is_skippable());
        assert!(
            Error::NoSuchChild {
                name: "x".into(),
                path: "fs::/d".into(),
            }
            .is_skippable()
        );
    }

    #[test]
    fn test_invariant_breaches_are_not_skippable() {
        assert!(
            !Error::SymlinkCycle {
                path: "fs::/loop".into()
            }
            .is_skippable()
        );
        assert!(!Error::InvalidSeek { position: 9, len: 3 }.is_skippable());
        assert!(
            !Error::AmbiguousChildName {
                name: "x".into(),
                path: "fs::/d".into(),
            }
            .is_skippable()
        );
    }

    #[test]
    fn test_messages_carry_the_offending_path() {
        let err = Error::unresolvable("fs::/missing", "no such entry");
        assert!(err.to_string().contains("fs::/missing"));
        assert!(err.to_string().contains("no such entry"));
    }
}
