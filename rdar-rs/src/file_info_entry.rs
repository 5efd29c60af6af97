use crate::error::{Result, TableKind};
use crate::ext::io_ext::RecordReadExt;
use crate::file_time::FileTime;
use crate::name_resolver::NameResolver;
use byteorder::{LittleEndian, ReadBytesExt};
use std::borrow::Cow;
use std::io::{self, Read};
use tracing::trace;

/// Length of the SHA-1 digest stored with each file.
pub const DIGEST_LENGTH: usize = 20;

/// Per-file metadata from the first table of the index.
///
/// `flags` and the sector/index fields are passed through uninterpreted. `first_data_sector`
/// and `next_data_sector` index into [`crate::rdar_index_table::IndexTable::offsets`]; the
/// sentinel that ends a chain is not decided here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfoEntry {
    /// Hash of the file's logical path. Unique key of the file-info table.
    pub name_hash: u64,
    /// The path, if the name resolver knew the hash.
    pub resolved_name: Option<String>,
    /// Modification time.
    pub timestamp: FileTime,
    /// Opaque flags (compression, encryption, ...).
    pub flags: u32,
    /// Index of the file's first segment in the offset table.
    pub first_data_sector: u32,
    /// Index of the segment after the first; chain termination is not interpreted here.
    pub next_data_sector: u32,
    /// Opaque, passed through uninterpreted.
    pub first_unk_index: u32,
    /// Opaque, passed through uninterpreted.
    pub next_unk_index: u32,
    /// SHA-1 of the decompressed content. Not verified.
    pub content_digest: [u8; DIGEST_LENGTH],
}

impl FileInfoEntry {
    /// Size of a file-info record on disk.
    pub const SIZE: usize = 56;

    /// Reads record `index` of the file-info table and looks its hash up in `names`.
    pub fn read<R: Read, N: NameResolver + ?Sized>(
        reader: &mut R,
        index: u64,
        names: &N,
    ) -> Result<Self> {
        let mut entry = reader.read_record_with::<{ FileInfoEntry::SIZE }, _, _>(
            TableKind::FileInfo,
            index,
            Self::parse,
        )?;

        entry.resolved_name = names.lookup_name(entry.name_hash);
        if let Some(ref name) = entry.resolved_name {
            trace!("Resolved {} to {name}", entry.name_hash);
        }
        Ok(entry)
    }

    /// Decodes the record's fields. The name is left unresolved.
    fn parse(record: &mut &[u8]) -> io::Result<Self> {
        let name_hash = record.read_u64::<LittleEndian>()?;
        let timestamp = FileTime(record.read_i64::<LittleEndian>()?);
        let flags = record.read_u32::<LittleEndian>()?;
        let first_data_sector = record.read_u32::<LittleEndian>()?;
        let next_data_sector = record.read_u32::<LittleEndian>()?;
        let first_unk_index = record.read_u32::<LittleEndian>()?;
        let next_unk_index = record.read_u32::<LittleEndian>()?;
        let mut content_digest = [0u8; DIGEST_LENGTH];
        record.read_exact(&mut content_digest)?;

        Ok(Self {
            name_hash,
            resolved_name: None,
            timestamp,
            flags,
            first_data_sector,
            next_data_sector,
            first_unk_index,
            next_unk_index,
            content_digest,
        })
    }

    /// The resolved path, or the decimal form of the name hash when it is unknown.
    pub fn name(&self) -> Cow<'_, str> {
        match self.resolved_name.as_deref() {
            Some(name) if !name.is_empty() => Cow::Borrowed(name),
            _ => Cow::Owned(self.name_hash.to_string()),
        }
    }

    /// The content digest as lowercase hex.
    pub fn digest_hex(&self) -> String {
        hex::encode(self.content_digest)
    }
}
