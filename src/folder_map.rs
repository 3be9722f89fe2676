//! # Folder Map Resolution
//!
//! This module builds and queries the lookup structure that decides, for
//! every candidate path in a build, whether it is included in the output
//! archive and where it lands.
//!
//! Keys are normalized relative paths (lowercase, forward slashes). Values
//! are either a destination prefix or the exclude sentinel. Resolution walks
//! from the full path up through its ancestors until a key matches, so a
//! single mapping at a shallow path governs every descendant unless a more
//! specific mapping exists deeper in the tree.

use std::collections::HashMap;

use crate::manifest::Manifest;

/// Map value marking a path and all of its descendants as excluded.
const EXCLUDE: &str = "-";

/// Lookup structure translating source-relative paths to output paths.
///
/// Built once per build from the manifest; read-only during traversal.
#[derive(Debug, Clone)]
pub struct FolderMap {
    entries: HashMap<String, String>,
}

impl FolderMap {
    /// Creates a folder map from the manifest.
    ///
    /// The empty path (the tree root) always maps to `package-as`, and
    /// `output_name`, the archive being written, always maps to the exclude
    /// sentinel so a build never tries to include its own output.
    pub fn new(manifest: &Manifest, output_name: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(String::new(), manifest.package_as.clone());
        entries.insert(output_name.to_lowercase(), EXCLUDE.to_string());

        for (source, destination) in &manifest.move_folders {
            // Sources are conventionally written relative to the output root,
            // so a leading package-as segment is stripped before keying.
            let key = source
                .strip_prefix(&manifest.package_as)
                .unwrap_or(source)
                .trim_start_matches('/')
                .to_lowercase();
            entries.insert(key, destination.clone());
        }

        for ignored in &manifest.ignore {
            entries.insert(ignored.to_lowercase(), EXCLUDE.to_string());
        }

        Self { entries }
    }

    /// Maps a relative path to its location in the output archive.
    ///
    /// Returns `None` when the path is excluded: its final segment starts
    /// with a period, it (or its closest mapped ancestor) is mapped to the
    /// exclude sentinel, or no mapping matches at all. Otherwise returns the
    /// matched destination joined with the unmatched suffix of the original
    /// path, original casing preserved.
    pub fn resolve(&self, path: &str) -> Option<String> {
        // Dotfiles are never packaged, regardless of map contents.
        if final_segment(path).starts_with('.') {
            return None;
        }

        let normalized = path.replace('\\', "/").to_lowercase();
        let mut prefix = normalized.as_str();

        loop {
            if let Some(target) = self.entries.get(prefix) {
                if target == EXCLUDE {
                    return None;
                }

                let suffix = path
                    .get(prefix.len()..)
                    .unwrap_or("")
                    .trim_start_matches('/');
                return Some(join(target, suffix));
            }

            match prefix.rfind('/') {
                Some(index) => prefix = &prefix[..index],
                None if prefix.is_empty() => return None,
                None => prefix = "",
            }
        }
    }
}

/// The last path segment, treating both separators as boundaries.
fn final_segment(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn join(prefix: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        prefix.to_string()
    } else if prefix.is_empty() {
        suffix.to_string()
    } else {
        format!("{}/{}", prefix, suffix)
    }
}
