use crate::decode_options::DecodeOptions;
use crate::error::{RdarError, Result};
use crate::file_info_entry::FileInfoEntry;
use crate::name_resolver::NameResolver;
use crate::rdar_archive::RdarArchive;
use glob::glob;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension shared by RDAR archive files.
pub const ARCHIVE_EXTENSION: &str = "archive";

/// Every archive of a game content directory, opened together.
///
/// Archives are kept sorted by path, and lookups return the first archive that has the file.
#[derive(Debug, Default)]
pub struct ArchiveSet {
    pub archives: Vec<RdarArchive>,
}

impl ArchiveSet {
    /// Opens every `*.archive` file directly inside `dir`.
    ///
    /// Fails on the first archive that does not decode.
    pub fn load_dir<P, N>(dir: P, names: &N, options: &DecodeOptions) -> Result<Self>
    where
        P: AsRef<Path>,
        N: NameResolver + ?Sized,
    {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(RdarError::FileNotFound(format!(
                "Archive directory not found: {}",
                dir.display()
            )));
        }

        let pattern = format!(
            "{}/*.{ARCHIVE_EXTENSION}",
            glob::Pattern::escape(&dir.display().to_string())
        );
        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in glob(&pattern).map_err(|e| RdarError::InvalidData(format!("{e}")))? {
            let path = entry.map_err(|e| RdarError::Io(e.into_error()))?;
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let archives = paths
            .iter()
            .map(|path| RdarArchive::open(path, names, options))
            .collect::<Result<Vec<_>>>()?;
        debug!("Loaded {} archives from {}", archives.len(), dir.display());

        Ok(Self { archives })
    }

    /// Finds the first archive containing `name_hash`.
    pub fn find(&self, name_hash: u64) -> Option<(&RdarArchive, &FileInfoEntry)> {
        self.archives
            .iter()
            .find_map(|archive| archive.find(name_hash).map(|file| (archive, file)))
    }

    /// Finds the first archive containing a file with the resolved path `name`.
    pub fn find_by_name(&self, name: &str) -> Option<(&RdarArchive, &FileInfoEntry)> {
        self.archives
            .iter()
            .find_map(|archive| archive.find_by_name(name).map(|file| (archive, file)))
    }

    /// Total number of files across all archives, counting repeats in different archives.
    pub fn file_count(&self) -> usize {
        self.archives.iter().map(RdarArchive::file_count).sum()
    }
}
