//! The table directory at the start of every PCF file.

use std::io::{Read, Seek};

use crate::cursor::{Cursor, MAX_PREALLOC};
use crate::format::Format;
use crate::read::DecodeError;

/// The file version, "\x01fcp" when read as little-endian bytes.
pub const PCF_FILE_VERSION: u32 = u32::from_be_bytes(*b"pcf\x01");

/// The size of one directory record on disk.
const RECORD_LEN: u32 = 16;

/// The kinds of table that can appear in a PCF file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TableKind {
    Properties,
    Accelerators,
    Metrics,
    Bitmaps,
    InkMetrics,
    BdfEncodings,
    /// Scalable widths; not used by the decoder.
    SWidths,
    /// Glyph names; not used by the decoder.
    GlyphNames,
    BdfAccelerators,
    Unknown(u32),
}

impl TableKind {
    pub const fn from_raw(raw: u32) -> Self {
        match raw {
            0x001 => TableKind::Properties,
            0x002 => TableKind::Accelerators,
            0x004 => TableKind::Metrics,
            0x008 => TableKind::Bitmaps,
            0x010 => TableKind::InkMetrics,
            0x020 => TableKind::BdfEncodings,
            0x040 => TableKind::SWidths,
            0x080 => TableKind::GlyphNames,
            0x100 => TableKind::BdfAccelerators,
            other => TableKind::Unknown(other),
        }
    }

    pub const fn to_raw(self) -> u32 {
        match self {
            TableKind::Properties => 0x001,
            TableKind::Accelerators => 0x002,
            TableKind::Metrics => 0x004,
            TableKind::Bitmaps => 0x008,
            TableKind::InkMetrics => 0x010,
            TableKind::BdfEncodings => 0x020,
            TableKind::SWidths => 0x040,
            TableKind::GlyphNames => 0x080,
            TableKind::BdfAccelerators => 0x100,
            TableKind::Unknown(raw) => raw,
        }
    }
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableKind::Properties => f.write_str("properties"),
            TableKind::Accelerators => f.write_str("accelerators"),
            TableKind::Metrics => f.write_str("metrics"),
            TableKind::Bitmaps => f.write_str("bitmaps"),
            TableKind::InkMetrics => f.write_str("ink metrics"),
            TableKind::BdfEncodings => f.write_str("BDF encodings"),
            TableKind::SWidths => f.write_str("scalable widths"),
            TableKind::GlyphNames => f.write_str("glyph names"),
            TableKind::BdfAccelerators => f.write_str("BDF accelerators"),
            TableKind::Unknown(raw) => write!(f, "unknown (0x{raw:X})"),
        }
    }
}

/// A single entry in the table directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableRecord {
    pub kind: TableKind,
    pub format: Format,
    pub size: u32,
    pub offset: u32,
}

/// The list of tables in a font file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableDirectory {
    records: Vec<TableRecord>,
}

impl TableDirectory {
    /// Read the file header and table directory of a PCF file.
    pub fn load<R: Read + Seek>(stream: R) -> Result<Self, DecodeError> {
        TableDirectory::read(&mut Cursor::new(stream))
    }

    pub(crate) fn read<R: Read + Seek>(cursor: &mut Cursor<R>) -> Result<Self, DecodeError> {
        let version = cursor.read_lsb32()?;
        if version != PCF_FILE_VERSION {
            return Err(DecodeError::BadMagic(version));
        }
        let count = cursor.read_lsb32()?;
        if count > i32::MAX as u32 / RECORD_LEN {
            return Err(DecodeError::InvalidCount(count));
        }
        let mut records = Vec::with_capacity((count as usize).min(MAX_PREALLOC));
        for _ in 0..count {
            let kind = TableKind::from_raw(cursor.read_lsb32()?);
            let format = Format::new(cursor.read_lsb32()?);
            let size = cursor.read_lsb32()?;
            let offset = cursor.read_lsb32()?;
            records.push(TableRecord {
                kind,
                format,
                size,
                offset,
            });
        }
        let directory = TableDirectory { records };
        directory.warn_on_duplicates();
        log::debug!("read table directory with {count} tables");
        Ok(directory)
    }

    pub fn records(&self) -> &[TableRecord] {
        &self.records
    }

    /// Returns the first record of the given kind.
    pub fn get(&self, kind: TableKind) -> Option<&TableRecord> {
        self.records.iter().find(|record| record.kind == kind)
    }

    pub fn contains(&self, kind: TableKind) -> bool {
        self.get(kind).is_some()
    }

    /// Position the cursor at the start of the table of the given kind.
    ///
    /// Returns `Ok(None)` if there is no such table. Tables can only be
    /// visited in increasing offset order; a table that starts before the
    /// current position is an error.
    pub(crate) fn seek<R: Read + Seek>(
        &self,
        cursor: &mut Cursor<R>,
        kind: TableKind,
    ) -> Result<Option<TableRecord>, DecodeError> {
        let Some(record) = self.get(kind).copied() else {
            return Ok(None);
        };
        match cursor.advance_to(record.offset as u64) {
            Some(result) => result?,
            None => {
                return Err(DecodeError::OutOfOrderTable {
                    table: kind,
                    offset: record.offset,
                    position: cursor.position(),
                })
            }
        }
        log::debug!("{kind} table at offset {} ({} bytes)", record.offset, record.size);
        Ok(Some(record))
    }

    /// Like [`seek`](Self::seek), but a missing table is an error.
    pub(crate) fn seek_required<R: Read + Seek>(
        &self,
        cursor: &mut Cursor<R>,
        kind: TableKind,
    ) -> Result<TableRecord, DecodeError> {
        self.seek(cursor, kind)?.ok_or(DecodeError::TableIsMissing(kind))
    }

    fn warn_on_duplicates(&self) {
        for (i, record) in self.records.iter().enumerate() {
            if self.records[..i].iter().any(|prev| prev.kind == record.kind) {
                log::warn!(
                    "duplicate {} table at offset {} is ignored",
                    record.kind,
                    record.offset
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcf_test_data::PcfBuffer;

    fn directory_bytes(records: &[(u32, u32)]) -> Vec<u8> {
        let mut buf = PcfBuffer::new(false)
            .push_u32(PCF_FILE_VERSION)
            .push_u32(records.len() as u32);
        for (kind, offset) in records {
            buf = buf.push_u32(*kind).push_u32(0).push_u32(4).push_u32(*offset);
        }
        buf.into_inner()
    }

    #[test]
    fn magic_is_checked() {
        let data = PcfBuffer::new(false).push_u32(0x1234).push_u32(0).into_inner();
        let mut cursor = Cursor::new(std::io::Cursor::new(data));
        assert_eq!(
            TableDirectory::read(&mut cursor),
            Err(DecodeError::BadMagic(0x1234))
        );
    }

    #[test]
    fn count_overflow_is_rejected() {
        let data = PcfBuffer::new(false)
            .push_u32(PCF_FILE_VERSION)
            .push_u32(0x1000_0000)
            .into_inner();
        let mut cursor = Cursor::new(std::io::Cursor::new(data));
        assert_eq!(
            TableDirectory::read(&mut cursor),
            Err(DecodeError::InvalidCount(0x1000_0000))
        );
    }

    #[test]
    fn truncated_directory() {
        let mut data = directory_bytes(&[(0x1, 40), (0x4, 48)]);
        data.truncate(data.len() - 2);
        let mut cursor = Cursor::new(std::io::Cursor::new(data));
        assert_eq!(
            TableDirectory::read(&mut cursor),
            Err(DecodeError::TruncatedInput)
        );
    }

    #[test]
    fn seek_forward_only() {
        let mut data = directory_bytes(&[(0x4, 48), (0x1, 40), (0x4, 60)]);
        data.resize(64, 0);
        let mut cursor = Cursor::new(std::io::Cursor::new(data));
        let directory = TableDirectory::read(&mut cursor).unwrap();
        assert_eq!(directory.records().len(), 3);
        assert_eq!(cursor.position(), 56);

        // the first metrics record wins, and it is behind us
        assert_eq!(
            directory.seek(&mut cursor, TableKind::Metrics),
            Err(DecodeError::OutOfOrderTable {
                table: TableKind::Metrics,
                offset: 48,
                position: 56,
            })
        );
        assert_eq!(directory.seek(&mut cursor, TableKind::Bitmaps), Ok(None));
        assert_eq!(
            directory.seek_required(&mut cursor, TableKind::Bitmaps),
            Err(DecodeError::TableIsMissing(TableKind::Bitmaps))
        );
    }

    #[test]
    fn table_kinds() {
        for raw in [1, 2, 4, 8, 0x10, 0x20, 0x40, 0x80, 0x100, 0x200] {
            assert_eq!(TableKind::from_raw(raw).to_raw(), raw);
        }
        assert_eq!(TableKind::from_raw(0x200), TableKind::Unknown(0x200));
    }
}
