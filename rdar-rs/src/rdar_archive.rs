use crate::decode_options::DecodeOptions;
use crate::error::Result;
use crate::file_info_entry::FileInfoEntry;
use crate::name_resolver::NameResolver;
use crate::offset_entry::OffsetEntry;
use crate::rdar_header::ArchiveHeader;
use crate::rdar_index_table::IndexTable;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::debug;

/// The decoded table of contents of one RDAR archive.
///
/// # Usage
///
/// ```no_run
/// use rdar_rs::{DecodeOptions, HashDictionary, RdarArchive};
///
/// let names = HashDictionary::from_file("archivehashes.csv").unwrap();
/// let archive = RdarArchive::open("basegame_1_engine.archive", &names, &DecodeOptions::default()).unwrap();
///
/// for file in archive.files() {
///     println!("{} {} flags={:#x}", file.name(), file.timestamp, file.flags);
/// }
/// ```
///
/// Only the index is decoded; file contents stay on disk.
#[derive(Debug, Clone)]
pub struct RdarArchive {
    /// Path the archive was opened from, if any.
    path: Option<PathBuf>,
    /// The 40-byte archive header.
    pub header: ArchiveHeader,
    /// The index region.
    pub index: IndexTable,
}

impl RdarArchive {
    /// Opens the archive at `path` and decodes its index.
    ///
    /// The file handle is released before this returns.
    pub fn open<P, N>(path: P, names: &N, options: &DecodeOptions) -> Result<Self>
    where
        P: AsRef<Path>,
        N: NameResolver + ?Sized,
    {
        let path = path.as_ref();
        debug!("Opening archive {}", path.display());
        let mut reader = BufReader::new(File::open(path)?);
        let mut archive = Self::from_reader(&mut reader, names, options)?;
        archive.path = Some(path.to_path_buf());
        Ok(archive)
    }

    /// Decodes the header at the start of `reader`, then the index at `header.table_offset`.
    pub fn from_reader<R, N>(reader: &mut R, names: &N, options: &DecodeOptions) -> Result<Self>
    where
        R: Read + Seek,
        N: NameResolver + ?Sized,
    {
        reader.seek(SeekFrom::Start(0))?;
        let header = ArchiveHeader::read(reader)?;
        reader.seek(SeekFrom::Start(header.table_offset))?;
        let index = IndexTable::read(reader, names, options)?;
        Ok(Self {
            path: None,
            header,
            index,
        })
    }

    /// The path this archive was opened from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// All files, ordered by name hash.
    pub fn files(&self) -> impl Iterator<Item = &FileInfoEntry> {
        self.index.file_info.values()
    }

    /// Number of distinct files.
    pub fn file_count(&self) -> usize {
        self.index.file_info.len()
    }

    /// Looks up a file by name hash.
    pub fn find(&self, name_hash: u64) -> Option<&FileInfoEntry> {
        self.index.get(name_hash)
    }

    /// Looks up a file by its resolved path. Only names known to the resolver at open time match.
    pub fn find_by_name(&self, name: &str) -> Option<&FileInfoEntry> {
        self.files()
            .find(|file| file.resolved_name.as_deref() == Some(name))
    }

    /// The first stored segment of `file`, if its sector index is in range.
    pub fn first_segment(&self, file: &FileInfoEntry) -> Option<&OffsetEntry> {
        self.index.offset(file.first_data_sector)
    }
}
