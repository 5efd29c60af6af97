use crate::error::{RdarError, Result, TableKind};
use crate::ext::io_ext::RecordReadExt;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};
use tracing::debug;

/// The signature every RDAR archive starts with.
pub const RDAR_MAGIC: [u8; 4] = *b"RDAR";

const HEADER_BODY_SIZE: usize = 36;

/// The fixed 40-byte preamble of an RDAR archive.
///
/// Apart from the magic, every field is carried through unvalidated: the version is not
/// checked against a supported set, and `table_offset`, `table_size` and `file_size` are
/// not compared against the real length of the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveHeader {
    /// The format version.
    pub version: u32,
    /// Byte offset of the index region.
    pub table_offset: u64,
    /// Byte length of the index region.
    pub table_size: u64,
    /// Opaque, currently unused.
    pub reserved: u64,
    /// Total size of the archive in bytes.
    pub file_size: u64,
}

impl ArchiveHeader {
    /// Size of the header on disk.
    pub const SIZE: usize = 40;

    /// Reads the header from a stream positioned at the start of the archive.
    ///
    /// On success the stream has advanced by exactly [`ArchiveHeader::SIZE`] bytes. If the
    /// magic does not match, [`RdarError::FormatMismatch`] is returned and the stream must
    /// not be read further.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let magic = reader.read_record::<4>(TableKind::Header, 0)?;
        if magic != RDAR_MAGIC {
            return Err(RdarError::FormatMismatch { found: magic });
        }

        let header = reader.read_record_with::<HEADER_BODY_SIZE, _, _>(
            TableKind::Header,
            0,
            Self::parse_body,
        )?;

        debug!(
            version = header.version,
            table_offset = header.table_offset,
            table_size = header.table_size,
            file_size = header.file_size,
            "Read RDAR header"
        );
        Ok(header)
    }

    /// Decodes the fields that follow the magic.
    fn parse_body(body: &mut &[u8]) -> io::Result<Self> {
        Ok(Self {
            version: body.read_u32::<LittleEndian>()?,
            table_offset: body.read_u64::<LittleEndian>()?,
            table_size: body.read_u64::<LittleEndian>()?,
            reserved: body.read_u64::<LittleEndian>()?,
            file_size: body.read_u64::<LittleEndian>()?,
        })
    }

    /// Writes the header in its on-disk layout.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&RDAR_MAGIC)?;
        writer.write_u32::<LittleEndian>(self.version)?;
        writer.write_u64::<LittleEndian>(self.table_offset)?;
        writer.write_u64::<LittleEndian>(self.table_size)?;
        writer.write_u64::<LittleEndian>(self.reserved)?;
        writer.write_u64::<LittleEndian>(self.file_size)?;
        Ok(())
    }
}
