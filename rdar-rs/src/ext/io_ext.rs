use crate::error::{RdarError, TableKind};
use std::io::{self, Read};

/// A trait that reads fixed-size records from any `Read` type.
pub(crate) trait RecordReadExt: Read {
    /// Reads exactly `N` bytes for the record at `index` of `table`.
    ///
    /// A short read is reported as [`RdarError::TruncatedInput`] naming the table and index;
    /// every other I/O failure is passed through as [`RdarError::Io`].
    fn read_record<const N: usize>(
        &mut self,
        table: TableKind,
        index: u64,
    ) -> Result<[u8; N], RdarError>;

    /// Reads an `N`-byte record and decodes its fields with `parse`.
    ///
    /// `parse` consumes the record from a byte slice. If it runs past the end of the record the
    /// failure is reported against the same table and index as a short read.
    fn read_record_with<const N: usize, T, F>(
        &mut self,
        table: TableKind,
        index: u64,
        parse: F,
    ) -> Result<T, RdarError>
    where
        F: FnOnce(&mut &[u8]) -> io::Result<T>,
    {
        let record = self.read_record::<N>(table, index)?;
        let mut fields = &record[..];
        let value =
            parse(&mut fields).map_err(|_| RdarError::TruncatedInput { table, index })?;
        debug_assert!(fields.is_empty(), "{table} record has trailing bytes");
        Ok(value)
    }
}

impl<T> RecordReadExt for T
where
    T: Read,
{
    fn read_record<const N: usize>(
        &mut self,
        table: TableKind,
        index: u64,
    ) -> Result<[u8; N], RdarError> {
        let mut record = [0u8; N];
        match self.read_exact(&mut record) {
            Ok(()) => Ok(record),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Err(RdarError::TruncatedInput { table, index })
            }
            Err(e) => Err(RdarError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{LittleEndian, ReadBytesExt};
    use std::io::Cursor;

    #[test]
    fn short_read_reports_table_and_index() {
        let mut reader = Cursor::new(vec![0u8; 5]);
        let err = reader
            .read_record::<8>(TableKind::Hashes, 3)
            .unwrap_err();
        assert!(matches!(
            err,
            RdarError::TruncatedInput {
                table: TableKind::Hashes,
                index: 3
            }
        ));
    }

    #[test]
    fn full_read_advances_by_record_size() {
        let mut reader = Cursor::new((0u8..20).collect::<Vec<_>>());
        let first = reader.read_record::<8>(TableKind::Hashes, 0).unwrap();
        let second = reader.read_record::<8>(TableKind::Hashes, 1).unwrap();
        assert_eq!(first, [0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(second, [8, 9, 10, 11, 12, 13, 14, 15]);
        assert_eq!(reader.position(), 16);
    }

    #[test]
    fn overrunning_parse_keeps_table_and_index() {
        let mut reader = Cursor::new(vec![0u8; 16]);
        let err = reader
            .read_record_with::<4, _, _>(TableKind::Offsets, 9, |fields| {
                fields.read_u64::<LittleEndian>()
            })
            .unwrap_err();
        assert!(matches!(
            err,
            RdarError::TruncatedInput {
                table: TableKind::Offsets,
                index: 9
            }
        ));
        assert_eq!(err.stage(), Some(TableKind::Offsets));
    }
}
