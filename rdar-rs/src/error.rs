use std::fmt;

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, RdarError>;

/// Identifies the decode stage that was in progress when an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    /// The 40-byte archive header.
    Header,
    /// The 24-byte counts header at the start of the index region.
    Counts,
    /// The file-info table.
    FileInfo,
    /// The offset table.
    Offsets,
    /// The supplemental hash table.
    Hashes,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TableKind::Header => "archive header",
            TableKind::Counts => "index counts header",
            TableKind::FileInfo => "file-info table",
            TableKind::Offsets => "offset table",
            TableKind::Hashes => "hash table",
        };
        f.write_str(name)
    }
}

/// Represents all possible errors that can occur while decoding an RDAR archive index.
#[derive(Debug, Error)]
pub enum RdarError {
    /// The archive does not start with the `RDAR` signature.
    #[error("Format mismatch: expected magic 'RDAR', got {found:?}")]
    FormatMismatch {
        /// The four bytes found where the magic was expected.
        found: [u8; 4],
    },
    /// The input ended before a record was complete.
    #[error("Truncated input in {table} at entry {index}")]
    TruncatedInput {
        /// The stage being decoded.
        table: TableKind,
        /// Zero-based index of the record in progress. Always 0 for the header and counts stages.
        index: u64,
    },
    /// A file-info entry repeated a name hash while the duplicate policy forbids it.
    #[error("Duplicate file-info key {name_hash:#018x} at entry {index}")]
    DuplicateKey {
        /// The repeated name hash.
        name_hash: u64,
        /// Zero-based index of the rejected entry.
        index: u32,
    },
    /// A requested archive or file was not found.
    #[error("File not found: {0}")]
    FileNotFound(String),
    /// Auxiliary input, such as a hash dictionary, is malformed.
    #[error("Invalid data: {0}")]
    InvalidData(String),
    /// An I/O error not caused by a short read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RdarError {
    /// Returns the decode stage that failed, if the error came from decoding.
    pub fn stage(&self) -> Option<TableKind> {
        match self {
            RdarError::FormatMismatch { .. } => Some(TableKind::Header),
            RdarError::TruncatedInput { table, .. } => Some(*table),
            RdarError::DuplicateKey { .. } => Some(TableKind::FileInfo),
            _ => None,
        }
    }
}
