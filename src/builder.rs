//! # Build Orchestration
//!
//! This module drives the end-to-end packaging process: check out every
//! declared external through the cache, stream its tree into the archive
//! under the external's target path, stream the primary source tree into the
//! archive root, then finalize the archive.
//!
//! Every step is fully sequential and must succeed before the next begins.
//! On any filesystem or archive error the build aborts immediately without
//! finalizing, and the caller is responsible for discarding the
//! partially-written output.
//!
//! Traversal prunes eagerly: when the folder map excludes a directory, its
//! descendants are never visited. Files whose resolved output paths collide
//! are written last-writer-wins with no detection; externals are processed
//! in sorted target-path order with the primary tree last, so the outcome is
//! the same on every run.

use std::fs::File;
use std::io::{self, Seek, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::cache::Cache;
use crate::error::Result;
use crate::folder_map::FolderMap;
use crate::manifest::Manifest;
use crate::vcs;

/// Manages the build process for a single addon.
pub struct Builder<'a, W: Write + Seek> {
    dir: PathBuf,
    manifest: Manifest,
    cache: &'a mut Cache,
    writer: ZipWriter<W>,
    mapper: FolderMap,
}

impl<'a, W: Write + Seek> Builder<'a, W> {
    /// Creates a builder for the addon in `dir`, writing the archive to
    /// `out`.
    ///
    /// `fallback_name` names the output root folder when the manifest omits
    /// `package-as`; `output_name` is the archive's own filename, excluded
    /// from traversal so a rebuild never packages its previous output.
    /// Returns an error if no manifest could be located or decoded.
    pub fn new(
        dir: &Path,
        fallback_name: &str,
        output_name: &str,
        cache: &'a mut Cache,
        out: W,
    ) -> Result<Self> {
        let manifest = Manifest::from_directory(dir, fallback_name)?;
        let mapper = FolderMap::new(&manifest, output_name);

        Ok(Self {
            dir: dir.to_path_buf(),
            manifest,
            cache,
            writer: ZipWriter::new(out),
            mapper,
        })
    }

    /// The decoded manifest driving this build.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Builds the addon: checks out dependencies, copies source files, and
    /// finalizes the archive.
    pub fn build(mut self) -> Result<()> {
        let externals = self.manifest.externals.clone();
        for (target, external) in &externals {
            info!("Resolving dependency {} -> {}", external.url, target);
            let dir = vcs::checkout(&external.url, &external.tag, self.cache)?;
            self.copy_tree(&dir, target)?;
        }

        let dir = self.dir.clone();
        self.copy_tree(&dir, "")?;

        self.writer.finish()?;
        Ok(())
    }

    /// Recursively copies every included file under `base` into the archive,
    /// rooted at `target`.
    fn copy_tree(&mut self, base: &Path, target: &str) -> Result<()> {
        let mapper = &self.mapper;
        let writer = &mut self.writer;

        let walker = WalkDir::new(base)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                // The root always passes; an excluded directory prunes its
                // whole subtree here.
                entry.depth() == 0 || resolve_entry(mapper, base, target, entry.path()).is_some()
            });

        for entry in walker {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }

            let resolved = match resolve_entry(mapper, base, target, entry.path()) {
                Some(resolved) => resolved,
                None => continue,
            };

            debug!("Adding {} as {}", entry.path().display(), resolved);
            copy_file(writer, &resolved, entry.path())?;
        }

        Ok(())
    }
}

/// Maps an on-disk entry to its archive path, or `None` when it is excluded.
fn resolve_entry(mapper: &FolderMap, base: &Path, target: &str, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?;
    let relative = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    if target.is_empty() {
        mapper.resolve(&relative)
    } else if relative.is_empty() {
        mapper.resolve(target)
    } else {
        mapper.resolve(&format!("{}/{}", target, relative))
    }
}

/// Streams one file into the archive at `target`, releasing the handle
/// before returning.
fn copy_file<W: Write + Seek>(
    writer: &mut ZipWriter<W>,
    target: &str,
    path: &Path,
) -> Result<()> {
    writer.start_file(target, SimpleFileOptions::default())?;
    let mut file = File::open(path)?;
    io::copy(&mut file, writer)?;
    Ok(())
}
