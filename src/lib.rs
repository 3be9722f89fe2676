//! # Addon Packer Library
//!
//! This library provides the core functionality for packaging a game addon's
//! source tree into a distributable zip archive. It is designed to be used by
//! the `addon-packer` command-line tool but can also be integrated into other
//! applications that need metadata-driven addon packaging.
//!
//! ## Quick Example
//!
//! ```no_run
//! use std::fs::File;
//! use std::path::Path;
//!
//! use addon_packer::builder::Builder;
//! use addon_packer::cache::Cache;
//!
//! let mut cache = Cache::open(None);
//! let out = File::create("addon.zip").unwrap();
//! let builder = Builder::new(Path::new("."), "MyAddon", "addon.zip", &mut cache, out).unwrap();
//! builder.build().unwrap();
//! ```
//!
//! ## Core Concepts
//!
//! - **Manifest (`manifest`)**: the typed representation of an addon's
//!   `.pkgmeta` file: package name, externals, folder remaps, and ignore
//!   rules.
//! - **Folder Map (`folder_map`)**: the lookup structure that translates any
//!   source-relative path to an output path or exclusion, via longest-prefix
//!   matching.
//! - **Checkout Cache (`cache`)**: persistent working directories for
//!   dependency checkouts, one per distinct (url, tag) pair, with an index
//!   that survives across invocations.
//! - **VCS (`vcs`)**: working-copy checkout and update through the system
//!   `git`/`svn` clients.
//! - **Builder (`builder`)**: the orchestrator that checks out externals,
//!   walks the trees through the folder map, and streams included files into
//!   the archive.
//!
//! ## Execution Flow
//!
//! A build reads the manifest, constructs the folder map, then, strictly in
//! sequence, checks out and copies each external under its target path,
//! copies the primary source tree under the output root, and finalizes the
//! archive. Any fatal error aborts before finalization, leaving the caller
//! to discard the partial output.

pub mod builder;
pub mod cache;
pub mod defaults;
pub mod error;
pub mod folder_map;
pub mod manifest;
pub mod vcs;
