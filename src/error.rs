//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `addon-packer` application. It uses the `thiserror` library to create a
//! single `Error` enum covering every anticipated failure mode of a build,
//! along with a `Result<T>` alias used throughout the crate.
//!
//! Every variant is fatal to the build in progress: nothing is retried
//! internally, and a caller that wants retries re-invokes the whole build.
//! The one recoverable failure category, a corrupt or unwritable
//! checkout-cache index, never surfaces here at all; the cache degrades to
//! empty and logs a warning instead (see [`crate::cache`]).

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for addon-packer operations
#[derive(Error, Debug)]
pub enum Error {
    /// No recognized pkgmeta file was present in the addon directory.
    ///
    /// Raised after scanning the directory for every accepted manifest
    /// filename (case-insensitively) without a match.
    #[error("no pkgmeta file found in {}", dir.display())]
    ManifestNotFound { dir: PathBuf },

    /// A pkgmeta file was found but could not be decoded.
    #[error("unable to parse pkgmeta: {0}")]
    ManifestParse(#[from] serde_yaml::Error),

    /// A VCS checkout or update failed.
    ///
    /// Carries the dependency URL and the failure output of the underlying
    /// `git`/`svn` invocation, surfaced verbatim.
    #[error("checkout failed for {url}: {message}")]
    Checkout { url: String, message: String },

    /// A filesystem read, stat, or create failed, wrapped from
    /// `std::io::Error`.
    #[error("filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),

    /// The archive writer refused an entry or failed to finalize.
    #[error("archive write error: {0}")]
    ArchiveWrite(#[from] zip::result::ZipError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
