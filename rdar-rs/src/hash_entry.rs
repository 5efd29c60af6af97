use crate::error::{Result, TableKind};
use crate::ext::io_ext::RecordReadExt;
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, Read};

/// An entry of the supplemental hash table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashEntry {
    /// Opaque 64-bit hash, passed through uninterpreted.
    pub hash: u64,
}

impl HashEntry {
    /// Size of a hash record on disk.
    pub const SIZE: usize = 8;

    /// Reads record `index` of the hash table.
    pub fn read<R: Read>(reader: &mut R, index: u64) -> Result<Self> {
        reader.read_record_with::<{ HashEntry::SIZE }, _, _>(TableKind::Hashes, index, Self::parse)
    }

    fn parse(record: &mut &[u8]) -> io::Result<Self> {
        Ok(Self {
            hash: record.read_u64::<LittleEndian>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RdarError;
    use std::io::Cursor;

    #[test]
    fn fields_fill_the_record_exactly() {
        let record = [0u8; HashEntry::SIZE];
        let mut rest = &record[..];
        HashEntry::parse(&mut rest).unwrap();
        assert!(rest.is_empty());
        assert!(HashEntry::parse(&mut &record[1..]).is_err());
    }

    #[test]
    fn reads_little_endian_hash() {
        let mut reader = Cursor::new(0x0102_0304_0506_0708u64.to_le_bytes().to_vec());
        let entry = HashEntry::read(&mut reader, 0).unwrap();
        assert_eq!(entry.hash, 0x0102_0304_0506_0708);
        let err = HashEntry::read(&mut reader, 1).unwrap_err();
        assert!(matches!(
            err,
            RdarError::TruncatedInput {
                table: TableKind::Hashes,
                index: 1
            }
        ));
    }
}
