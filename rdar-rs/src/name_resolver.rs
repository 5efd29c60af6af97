//! Resolution of 64-bit name hashes back to the archive paths they were computed from.
//!
//! Decoding never depends on a resolver: it is consulted once per file-info entry and a miss
//! just leaves the entry unnamed.

use crate::error::Result;
use crate::utility::dsv_file::DSVFile;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// A read-only lookup service from name hash to original path.
///
/// Implementations shared between concurrently opened archives must be safe for concurrent
/// reads; the decoder itself only ever takes `&self`.
pub trait NameResolver {
    /// Returns the path for `hash`, if known.
    fn lookup_name(&self, hash: u64) -> Option<String>;
}

/// A resolver that knows no names.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoNames;

impl NameResolver for NoNames {
    fn lookup_name(&self, _hash: u64) -> Option<String> {
        None
    }
}

impl NameResolver for HashMap<u64, String> {
    fn lookup_name(&self, hash: u64) -> Option<String> {
        self.get(&hash).cloned()
    }
}

impl<R: NameResolver + ?Sized> NameResolver for &R {
    fn lookup_name(&self, hash: u64) -> Option<String> {
        (**self).lookup_name(hash)
    }
}

impl<R: NameResolver> NameResolver for Option<R> {
    fn lookup_name(&self, hash: u64) -> Option<String> {
        self.as_ref().and_then(|r| r.lookup_name(hash))
    }
}

/// An in-memory hash dictionary, usually loaded from an `archivehashes.csv` style file.
///
/// Each row holds a path and its decimal hash, separated by a comma. An optional header row
/// (`String,Hash`) and `#` comment lines are ignored.
#[derive(Debug, Default, Clone)]
pub struct HashDictionary {
    names: HashMap<u64, String>,
}

impl HashDictionary {
    /// Creates an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a dictionary from a CSV file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let dsv = DSVFile::from_file(path.as_ref(), ",", Some("#"))?;
        let dictionary = Self::from_dsv(dsv);
        debug!(
            "Loaded {} names from {}",
            dictionary.len(),
            path.as_ref().display()
        );
        Ok(dictionary)
    }

    /// Loads a dictionary from any reader holding CSV text.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut dsv = DSVFile::with_delimiter(",", Some("#"));
        dsv.load(reader)?;
        Ok(Self::from_dsv(dsv))
    }

    fn from_dsv(dsv: DSVFile) -> Self {
        let mut dictionary = Self::new();
        for row in dsv.rows {
            let [path, hash] = row.fields.as_slice() else {
                warn!("Skipping hash dictionary line {}: expected 2 fields", row.line);
                continue;
            };
            match hash.parse::<u64>() {
                Ok(hash) => dictionary.insert(hash, path.clone()),
                // Header row
                Err(_) if hash.eq_ignore_ascii_case("hash") => {}
                Err(e) => warn!(
                    "Skipping hash dictionary line {}: bad hash {hash:?}: {e}",
                    row.line
                ),
            }
        }
        dictionary
    }

    /// Adds or replaces the name for `hash`.
    pub fn insert(&mut self, hash: u64, name: impl Into<String>) {
        self.names.insert(hash, name.into());
    }

    /// Returns the name for `hash` without cloning it.
    pub fn get(&self, hash: u64) -> Option<&str> {
        self.names.get(&hash).map(String::as_str)
    }

    /// Number of known names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the dictionary is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl NameResolver for HashDictionary {
    fn lookup_name(&self, hash: u64) -> Option<String> {
        self.get(hash).map(str::to_string)
    }
}

impl FromIterator<(u64, String)> for HashDictionary {
    fn from_iter<I: IntoIterator<Item = (u64, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}
