use crate::error::{Result, TableKind};
use crate::ext::io_ext::RecordReadExt;
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, Read};

/// A stored segment of file data, addressed by its position in the offset table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OffsetEntry {
    /// Byte offset of the segment in the archive.
    pub offset: u64,
    /// Stored (possibly compressed) size.
    pub physical_size: u32,
    /// Uncompressed size.
    pub virtual_size: u32,
}

impl OffsetEntry {
    /// Size of an offset record on disk.
    pub const SIZE: usize = 16;

    /// Reads record `index` of the offset table.
    pub fn read<R: Read>(reader: &mut R, index: u64) -> Result<Self> {
        reader.read_record_with::<{ OffsetEntry::SIZE }, _, _>(TableKind::Offsets, index, Self::parse)
    }

    fn parse(record: &mut &[u8]) -> io::Result<Self> {
        Ok(Self {
            offset: record.read_u64::<LittleEndian>()?,
            physical_size: record.read_u32::<LittleEndian>()?,
            virtual_size: record.read_u32::<LittleEndian>()?,
        })
    }

    /// Whether the stored bytes differ in size from the content, i.e. the segment is compressed.
    pub fn is_compressed(&self) -> bool {
        self.physical_size != self.virtual_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RdarError;
    use std::io::Cursor;

    #[test]
    fn reads_offset_and_sizes() {
        let mut bytes = 0x0001_0000_0000u64.to_le_bytes().to_vec();
        bytes.extend_from_slice(&100u32.to_le_bytes());
        bytes.extend_from_slice(&250u32.to_le_bytes());

        let entry = OffsetEntry::read(&mut Cursor::new(bytes), 0).unwrap();
        assert_eq!(entry.offset, 0x0001_0000_0000);
        assert_eq!(entry.physical_size, 100);
        assert_eq!(entry.virtual_size, 250);
        assert!(entry.is_compressed());
    }

    #[test]
    fn fields_fill_the_record_exactly() {
        let record = [0u8; OffsetEntry::SIZE];
        let mut rest = &record[..];
        OffsetEntry::parse(&mut rest).unwrap();
        assert!(rest.is_empty());
        assert!(OffsetEntry::parse(&mut &record[1..]).is_err());
    }

    #[test]
    fn short_record_is_truncated() {
        let err = OffsetEntry::read(&mut Cursor::new(vec![0u8; 15]), 4).unwrap_err();
        assert!(matches!(
            err,
            RdarError::TruncatedInput {
                table: TableKind::Offsets,
                index: 4
            }
        ));
    }
}
