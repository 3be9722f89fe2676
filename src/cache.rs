//! # Checkout Cache
//!
//! Persistent working directories for dependency checkouts. Each distinct
//! `(url, tag)` pair is assigned exactly one directory under the cache root,
//! and the assignment survives across invocations through a JSON index file
//! kept alongside the directories.
//!
//! Index read and write failures are the one recoverable failure category in
//! the whole build: a corrupt or unwritable index degrades the cache to
//! "no entries known" with a warning, and the build proceeds by
//! re-allocating. Everything else, notably a failure to create an allocated
//! directory, is fatal and propagates to the caller.
//!
//! The index is read once at construction and fully rewritten after every
//! new allocation. There is no lock file: concurrent processes sharing one
//! cache root race on the index and must be serialized by the caller.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use rand::Rng;

use crate::defaults;
use crate::error::Result;

/// Name of the serialized index inside the cache root.
const INDEX_FILE: &str = "index.json";

/// Length of generated directory names.
const DIR_NAME_LEN: usize = 10;

/// Persistent directory allocator for dependency checkouts.
#[derive(Debug)]
pub struct Cache {
    root: PathBuf,
    entries: HashMap<String, String>,
}

impl Cache {
    /// Opens a cache rooted at `root`, or at the platform default cache
    /// location when no override is given, loading the previously saved
    /// index if it exists.
    pub fn open(root: Option<PathBuf>) -> Self {
        let root = root.unwrap_or_else(defaults::default_cache_root);
        let mut cache = Self {
            root,
            entries: HashMap::new(),
        };
        cache.load_index();
        cache
    }

    /// The directory all working copies and the index live under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Provides a directory for the given url/tag combination.
    ///
    /// The second return value indicates whether the directory was newly
    /// allocated (`true`) or came from a previous call (`false`). A prior
    /// success with the identical pair always yields the identical path with
    /// no further filesystem allocation.
    pub fn dir_for(&mut self, url: &str, tag: &str) -> Result<(PathBuf, bool)> {
        let key = format!("{} {}", url, tag);
        if let Some(existing) = self.entries.get(&key) {
            return Ok((self.root.join(existing), false));
        }

        loop {
            let name = random_dir_name();
            let dir = self.root.join(&name);
            if dir.exists() {
                continue;
            }

            fs::create_dir_all(&dir)?;
            self.entries.insert(key, name);
            // Recorded before returning so a crash later cannot orphan the
            // allocation.
            self.save_index();
            return Ok((dir, true));
        }
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    fn load_index(&mut self) {
        let index = self.index_path();
        if !index.exists() {
            return;
        }

        let content = match fs::read_to_string(&index) {
            Ok(content) => content,
            Err(e) => {
                warn!("Unable to read cache index {}: {}", index.display(), e);
                return;
            }
        };

        match serde_json::from_str(&content) {
            Ok(entries) => self.entries = entries,
            Err(e) => {
                warn!("Unable to deserialize cache index {}: {}", index.display(), e);
            }
        }
    }

    fn save_index(&self) {
        let serialized = match serde_json::to_string(&self.entries) {
            Ok(serialized) => serialized,
            Err(e) => {
                warn!("Unable to serialize cache index: {}", e);
                return;
            }
        };

        if let Err(e) = fs::write(self.index_path(), serialized) {
            warn!("Unable to write cache index: {}", e);
        }
    }
}

/// A random, filesystem-safe directory name. Callers probe for collisions
/// and regenerate, so uniqueness here is best-effort only.
fn random_dir_name() -> String {
    const CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    (0..DIR_NAME_LEN)
        .map(|_| CHARS[rng.gen_range(0..CHARS.len())] as char)
        .collect()
}
