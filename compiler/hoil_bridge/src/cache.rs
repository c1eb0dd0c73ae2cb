//! Persistent snippet cache.
//!
//! Maps statement text to snippet text, stored as JSON:
//!
//! ```text
//! { "version": 1, "entries": { "open the gripper": "call OpenGripper" } }
//! ```
//!
//! The file is rewritten atomically (temp file in the same directory, then
//! rename) and only when an entry was added.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::BridgeError;

const CACHE_VERSION: u32 = 1;

#[derive(Deserialize)]
struct CacheFile {
    version: u32,
    entries: BTreeMap<String, String>,
}

#[derive(Serialize)]
struct CacheFileRef<'a> {
    version: u32,
    entries: &'a BTreeMap<String, String>,
}

#[derive(Debug, Default)]
pub struct SnippetCache {
    path: Option<PathBuf>,
    entries: BTreeMap<String, String>,
    dirty: bool,
}

impl SnippetCache {
    /// A cache that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the cache stored at `path`.
    ///
    /// A missing file is an empty cache. A file that is not a valid cache is
    /// discarded with a warning and replaced on the next save.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, BridgeError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<CacheFile>(&text) {
                Ok(file) if file.version == CACHE_VERSION => file.entries,
                Ok(file) => {
                    tracing::warn!(path = %path.display(), version = file.version, "unsupported instruction cache version, starting empty");
                    BTreeMap::new()
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "instruction cache corrupt, starting empty");
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(BridgeError::CacheIo { path, source }),
        };
        tracing::debug!(path = %path.display(), entries = entries.len(), "loaded instruction cache");
        Ok(SnippetCache {
            path: Some(path),
            entries,
            dirty: false,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, statement: &str) -> Option<&str> {
        self.entries.get(statement).map(String::as_str)
    }

    pub fn insert(&mut self, statement: impl Into<String>, snippet: impl Into<String>) {
        let snippet = snippet.into();
        let statement = statement.into();
        if self.entries.get(&statement) != Some(&snippet) {
            self.entries.insert(statement, snippet);
            self.dirty = true;
        }
    }

    /// Drop an entry, e.g. one whose snippet no longer parses.
    pub fn remove(&mut self, statement: &str) {
        if self.entries.remove(statement).is_some() {
            self.dirty = true;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the cache back if anything changed.
    pub fn save(&mut self) -> Result<(), BridgeError> {
        let Some(path) = self.path.as_deref().filter(|_| self.dirty) else {
            return Ok(());
        };
        let io_err = |source| BridgeError::CacheIo {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(io_err)?;

        let mut file = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
        let contents = CacheFileRef {
            version: CACHE_VERSION,
            entries: &self.entries,
        };
        serde_json::to_writer_pretty(&mut file, &contents)?;
        file.write_all(b"\n").map_err(io_err)?;
        file.persist(path).map_err(|err| io_err(err.error))?;

        tracing::debug!(path = %path.display(), entries = self.entries.len(), "saved instruction cache");
        self.dirty = false;
        Ok(())
    }
}

/// Default cache location: `$XDG_CACHE_HOME/hoil/instructions.json`, then
/// `$HOME/.cache/hoil/instructions.json`, then the temp directory.
pub fn default_cache_path() -> PathBuf {
    if let Ok(xdg_cache) = std::env::var("XDG_CACHE_HOME") {
        return PathBuf::from(xdg_cache).join("hoil").join("instructions.json");
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".cache")
            .join("hoil")
            .join("instructions.json");
    }

    std::env::temp_dir().join("hoil-cache").join("instructions.json")
}
