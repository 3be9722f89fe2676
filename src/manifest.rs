//! # Manifest Schema and Parsing
//!
//! This module defines the data structures that represent an addon's
//! `.pkgmeta` manifest, as well as the logic for locating and parsing it.
//!
//! ## Key Components
//!
//! - **`Manifest`**: the decoded manifest: package name, externals, folder
//!   remaps, ignore list, and changelog configuration.
//! - **`External`**: a declared remote dependency (VCS URL plus optional
//!   revision tag).
//! - **`Changelog`**: configuration for a manually maintained changelog.
//!
//! ## Parsing
//!
//! Manifests are YAML documents with kebab-case keys. Two fields accept a
//! shorthand scalar form in addition to the full structured form: an external
//! given as a bare string is equivalent to `{url: <string>}`, and a changelog
//! given as a bare string is equivalent to
//! `{filename: <string>, markup-type: plain}`. The fallback is a single
//! two-case decode performed at parse time: the scalar form is attempted
//! first, then the structured form. Unknown keys are ignored.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Accepted manifest filenames, matched case-insensitively against directory
/// entries.
const MANIFEST_NAMES: [&str; 3] = [".pkgmeta", "pkgmeta.yaml", "pkgmeta.yml"];

/// The decoded content of an addon's pkgmeta manifest.
///
/// Externals and folder remaps are kept in `BTreeMap`s so that iteration
/// order, and therefore checkout and archive-write order, is deterministic
/// across runs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Name of the root folder inside the output archive. Never empty after
    /// loading: when the manifest omits it, the loader substitutes a
    /// caller-supplied fallback (conventionally the addon directory name).
    #[serde(rename = "package-as")]
    pub package_as: String,

    /// Manually maintained changelog configuration, if any.
    #[serde(rename = "manual-changelog")]
    pub manual_changelog: Option<Changelog>,

    /// Remote dependencies, keyed by the target path they occupy inside the
    /// output archive.
    pub externals: BTreeMap<String, External>,

    /// Folder remaps from source subpath to destination subpath.
    #[serde(rename = "move-folders")]
    pub move_folders: BTreeMap<String, String>,

    /// Paths excluded from the output archive.
    pub ignore: Vec<String>,

    /// Filename the packaging service writes the license to.
    #[serde(rename = "license-output")]
    pub license_output: String,

    /// Whether the packaging service may generate a separate no-lib archive.
    #[serde(rename = "enable-nolib-creation")]
    pub no_lib_creation: bool,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            package_as: String::new(),
            manual_changelog: None,
            externals: BTreeMap::new(),
            move_folders: BTreeMap::new(),
            ignore: Vec::new(),
            license_output: String::new(),
            // Manifests that omit the key still get the default.
            no_lib_creation: true,
        }
    }
}

impl Manifest {
    /// Decodes a manifest from the given reader.
    ///
    /// `fallback_name` replaces an omitted or empty `package-as` so the
    /// output root folder name is always populated.
    pub fn from_reader(reader: impl Read, fallback_name: &str) -> Result<Self> {
        let mut manifest: Manifest = serde_yaml::from_reader(reader)?;
        if manifest.package_as.is_empty() {
            manifest.package_as = fallback_name.to_string();
        }
        Ok(manifest)
    }

    /// Scans `dir` for a recognized manifest file and decodes it.
    ///
    /// Returns [`Error::ManifestNotFound`] when no accepted filename exists
    /// in the directory, and [`Error::ManifestParse`] when a file exists but
    /// fails to decode.
    pub fn from_directory(dir: &Path, fallback_name: &str) -> Result<Self> {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name();
            if entry.file_type()?.is_file() && is_manifest_name(&name.to_string_lossy()) {
                let file = File::open(entry.path())?;
                return Self::from_reader(file, fallback_name);
            }
        }

        Err(Error::ManifestNotFound {
            dir: dir.to_path_buf(),
        })
    }
}

fn is_manifest_name(name: &str) -> bool {
    MANIFEST_NAMES
        .iter()
        .any(|candidate| name.eq_ignore_ascii_case(candidate))
}

/// A declared remote dependency: a VCS URL and optionally a revision tag.
///
/// An empty tag means "latest on the default branch/trunk". The literal tag
/// `latest` is reserved for newest-tag resolution; it is accepted but
/// currently behaves the same as an empty tag.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "ExternalRepr")]
pub struct External {
    pub url: String,
    pub tag: String,
}

/// Two-case decode for [`External`]: a bare string is shorthand for
/// `{url: <string>}` with no tag.
#[derive(Deserialize)]
#[serde(untagged)]
enum ExternalRepr {
    Url(String),
    Full {
        url: String,
        #[serde(default)]
        tag: String,
    },
}

impl From<ExternalRepr> for External {
    fn from(repr: ExternalRepr) -> Self {
        match repr {
            ExternalRepr::Url(url) => Self {
                url,
                tag: String::new(),
            },
            ExternalRepr::Full { url, tag } => Self { url, tag },
        }
    }
}

/// Configuration for a manually maintained changelog. Descriptive only: the
/// copy pipeline does not consume it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "ChangelogRepr")]
pub struct Changelog {
    pub filename: String,
    pub markup_type: String,
}

/// Two-case decode for [`Changelog`]: a bare string is shorthand for
/// `{filename: <string>, markup-type: plain}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ChangelogRepr {
    Filename(String),
    Full {
        filename: String,
        #[serde(rename = "markup-type", default)]
        markup_type: String,
    },
}

impl From<ChangelogRepr> for Changelog {
    fn from(repr: ChangelogRepr) -> Self {
        match repr {
            ChangelogRepr::Filename(filename) => Self {
                filename,
                markup_type: "plain".to_string(),
            },
            ChangelogRepr::Full {
                filename,
                markup_type,
            } => Self {
                filename,
                markup_type,
            },
        }
    }
}
