use crate::decode_options::{DecodeOptions, DuplicatePolicy};
use crate::error::{RdarError, Result, TableKind};
use crate::ext::io_ext::RecordReadExt;
use crate::file_info_entry::FileInfoEntry;
use crate::hash_entry::HashEntry;
use crate::name_resolver::NameResolver;
use crate::offset_entry::OffsetEntry;
use byteorder::{LittleEndian, ReadBytesExt};
use std::collections::btree_map::{BTreeMap, Entry};
use std::io::{self, Read};
use tracing::{debug, warn};

// Upper bound on up-front allocation; counts come straight from the input.
const MAX_PREALLOCATED: usize = 1 << 16;

/// The counts header at the start of the index region.
///
/// Only the three table counts drive decoding. `entry_count`, `table_byte_size` and
/// `checksum` are passed through uninterpreted; the checksum algorithm is not known, so it
/// is never recomputed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IndexCounts {
    /// Informational entry count, not checked against the tables.
    pub entry_count: u32,
    /// Informational byte size of the index, not checked against the tables.
    pub table_byte_size: u32,
    /// Stored checksum of the index. Never verified.
    pub checksum: u64,
    /// Number of file-info records that follow.
    pub file_info_count: u32,
    /// Number of offset records after the file-info table.
    pub offset_count: u32,
    /// Number of hash records after the offset table.
    pub hash_count: u32,
}

impl IndexCounts {
    /// Size of the counts header on disk.
    pub const SIZE: usize = 28;

    /// Reads the counts header.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        reader.read_record_with::<{ IndexCounts::SIZE }, _, _>(TableKind::Counts, 0, Self::parse)
    }

    fn parse(record: &mut &[u8]) -> io::Result<Self> {
        Ok(Self {
            entry_count: record.read_u32::<LittleEndian>()?,
            table_byte_size: record.read_u32::<LittleEndian>()?,
            checksum: record.read_u64::<LittleEndian>()?,
            file_info_count: record.read_u32::<LittleEndian>()?,
            offset_count: record.read_u32::<LittleEndian>()?,
            hash_count: record.read_u32::<LittleEndian>()?,
        })
    }
}

/// The decoded index region of an RDAR archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexTable {
    /// The counts header the tables were decoded from.
    pub counts: IndexCounts,
    /// File metadata keyed by name hash.
    pub file_info: BTreeMap<u64, FileInfoEntry>,
    /// Data segments, addressed by position.
    pub offsets: Vec<OffsetEntry>,
    /// The supplemental hash table.
    pub hash_table: Vec<HashEntry>,
}

impl IndexTable {
    /// Decodes the index region from a stream positioned at its start.
    ///
    /// Reads the counts header followed by exactly `file_info_count` file-info records,
    /// `offset_count` offset records and `hash_count` hash records, back to back. Every
    /// file-info hash is offered to `names`. Repeated name hashes are handled according to
    /// `options.duplicate_policy`; the offset and hash tables are never deduplicated.
    pub fn read<R, N>(reader: &mut R, names: &N, options: &DecodeOptions) -> Result<Self>
    where
        R: Read,
        N: NameResolver + ?Sized,
    {
        let counts = IndexCounts::read(reader)?;
        debug!(
            file_info = counts.file_info_count,
            offsets = counts.offset_count,
            hashes = counts.hash_count,
            checksum = counts.checksum,
            "Read index counts"
        );

        let mut file_info = BTreeMap::new();
        for index in 0..counts.file_info_count {
            let entry = FileInfoEntry::read(reader, u64::from(index), names)?;
            match file_info.entry(entry.name_hash) {
                Entry::Vacant(slot) => {
                    slot.insert(entry);
                }
                Entry::Occupied(mut slot) => match options.duplicate_policy {
                    DuplicatePolicy::KeepFirst => {
                        warn!("Dropping duplicate file entry {} at index {index}", entry.name());
                    }
                    DuplicatePolicy::KeepLast => {
                        warn!("Replacing duplicate file entry {} at index {index}", entry.name());
                        slot.insert(entry);
                    }
                    DuplicatePolicy::Error => {
                        return Err(RdarError::DuplicateKey {
                            name_hash: entry.name_hash,
                            index,
                        });
                    }
                },
            }
        }

        let mut offsets = Vec::with_capacity(preallocate(counts.offset_count));
        for index in 0..counts.offset_count {
            offsets.push(OffsetEntry::read(reader, u64::from(index))?);
        }

        let mut hash_table = Vec::with_capacity(preallocate(counts.hash_count));
        for index in 0..counts.hash_count {
            hash_table.push(HashEntry::read(reader, u64::from(index))?);
        }

        debug!(
            "Decoded index with {} files, {} offsets, {} hashes",
            file_info.len(),
            offsets.len(),
            hash_table.len()
        );

        Ok(Self {
            counts,
            file_info,
            offsets,
            hash_table,
        })
    }

    /// Looks up a file by name hash.
    pub fn get(&self, name_hash: u64) -> Option<&FileInfoEntry> {
        self.file_info.get(&name_hash)
    }

    /// The offset entry at `index`, if in range.
    pub fn offset(&self, index: u32) -> Option<&OffsetEntry> {
        self.offsets.get(usize::try_from(index).ok()?)
    }

    /// Number of file-info records dropped or replaced as duplicates.
    pub fn duplicate_count(&self) -> usize {
        self.counts.file_info_count as usize - self.file_info.len()
    }
}

fn preallocate(count: u32) -> usize {
    (count as usize).min(MAX_PREALLOCATED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name_resolver::NoNames;
    use proptest::prelude::*;
    use proptest::test_runner::TestCaseError;
    use std::collections::BTreeSet;
    use std::io::Cursor;

    fn counts_bytes(file_info: u32, offsets: u32, hashes: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&(file_info + offsets + hashes).to_le_bytes());
        bytes.extend_from_slice(&0x100u32.to_le_bytes());
        bytes.extend_from_slice(&0xABCD_EF01_2345_6789u64.to_le_bytes());
        bytes.extend_from_slice(&file_info.to_le_bytes());
        bytes.extend_from_slice(&offsets.to_le_bytes());
        bytes.extend_from_slice(&hashes.to_le_bytes());
        bytes
    }

    #[test]
    fn reads_counts_header() {
        let counts = IndexCounts::read(&mut Cursor::new(counts_bytes(1, 2, 3))).unwrap();
        assert_eq!(counts.entry_count, 6);
        assert_eq!(counts.table_byte_size, 0x100);
        assert_eq!(counts.checksum, 0xABCD_EF01_2345_6789);
        assert_eq!(counts.file_info_count, 1);
        assert_eq!(counts.offset_count, 2);
        assert_eq!(counts.hash_count, 3);
    }

    #[test]
    fn counts_fields_fill_the_record_exactly() {
        let record = [0u8; IndexCounts::SIZE];
        let mut rest = &record[..];
        IndexCounts::parse(&mut rest).unwrap();
        assert!(rest.is_empty());
        assert!(IndexCounts::parse(&mut &record[1..]).is_err());
    }

    #[test]
    fn short_counts_header_is_truncated() {
        let bytes = counts_bytes(0, 0, 0);
        let err = IndexTable::read(
            &mut Cursor::new(&bytes[..10]),
            &NoNames,
            &DecodeOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RdarError::TruncatedInput {
                table: TableKind::Counts,
                index: 0
            }
        ));
    }

    #[test]
    fn tables_are_read_back_to_back() {
        let mut bytes = counts_bytes(0, 2, 1);
        for (offset, size) in [(40u64, 10u32), (50, 20)] {
            bytes.extend_from_slice(&offset.to_le_bytes());
            bytes.extend_from_slice(&size.to_le_bytes());
            bytes.extend_from_slice(&size.to_le_bytes());
        }
        bytes.extend_from_slice(&0x77u64.to_le_bytes());
        let mut reader = Cursor::new(bytes);

        let table = IndexTable::read(&mut reader, &NoNames, &DecodeOptions::default()).unwrap();

        assert_eq!(reader.position(), (IndexCounts::SIZE + 2 * 16 + 8) as u64);
        assert_eq!(table.offsets[1].offset, 50);
        assert_eq!(table.offset(0).map(|o| o.physical_size), Some(10));
        assert_eq!(table.offset(2), None);
        assert_eq!(table.hash_table, vec![HashEntry { hash: 0x77 }]);
    }

    #[test]
    fn missing_hash_record_is_truncated() {
        let mut bytes = counts_bytes(0, 0, 2);
        bytes.extend_from_slice(&1u64.to_le_bytes());
        let err = IndexTable::read(&mut Cursor::new(bytes), &NoNames, &DecodeOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            RdarError::TruncatedInput {
                table: TableKind::Hashes,
                index: 1
            }
        ));
    }

    fn file_info_bytes(name_hash: u64, digest: u8) -> Vec<u8> {
        let mut bytes = name_hash.to_le_bytes().to_vec();
        bytes.extend_from_slice(&0i64.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 20]);
        bytes.extend_from_slice(&[digest; 20]);
        bytes
    }

    proptest! {
        #[test]
        fn file_info_len_matches_distinct_hashes(
            hashes in prop::collection::vec(0u64..16, 0..40),
            offset_count in 0u32..8,
            hash_count in 0u32..8,
        ) {
            let mut bytes = counts_bytes(hashes.len() as u32, offset_count, hash_count);
            for (i, hash) in hashes.iter().enumerate() {
                bytes.extend(file_info_bytes(*hash, i as u8));
            }
            bytes.extend(vec![0u8; offset_count as usize * OffsetEntry::SIZE]);
            bytes.extend(vec![0u8; hash_count as usize * HashEntry::SIZE]);

            let table = IndexTable::read(&mut Cursor::new(bytes), &NoNames, &DecodeOptions::default())
                .map_err(|e| TestCaseError::fail(e.to_string()))?;

            let distinct: BTreeSet<u64> = hashes.iter().copied().collect();
            let count = table.counts.file_info_count as usize;
            prop_assert!(table.file_info.len() <= count);
            prop_assert_eq!(table.file_info.len(), distinct.len());
            prop_assert_eq!(table.file_info.len() == count, distinct.len() == hashes.len());
            prop_assert_eq!(table.duplicate_count(), hashes.len() - distinct.len());
            prop_assert_eq!(table.offsets.len(), offset_count as usize);
            prop_assert_eq!(table.hash_table.len(), hash_count as usize);

            // First occurrence wins
            for (hash, entry) in &table.file_info {
                let first = hashes.iter().position(|h| h == hash).unwrap_or_default();
                prop_assert_eq!(entry.content_digest, [first as u8; 20]);
            }
        }
    }
}
