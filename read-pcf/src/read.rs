//! Errors produced while decoding font data

use crate::toc::TableKind;

/// An error that occurs when decoding a PCF font.
///
/// Every error is terminal for the load that produced it: no partially
/// decoded font is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Invalid file version 0x{0:08X}")]
    BadMagic(u32),
    /// A count read from the file would overflow the size of the structure
    /// it describes.
    #[error("Invalid element count {0}")]
    InvalidCount(u32),
    #[error("Unexpected end of input")]
    TruncatedInput,
    #[error("Failed to seek in input")]
    SeekFailed,
    /// The table starts before data that has already been consumed.
    #[error("the {table} table at offset {offset} is behind the read position {position}")]
    OutOfOrderTable {
        table: TableKind,
        offset: u32,
        position: u64,
    },
    #[error("Unsupported format 0x{format:08X} for the {table} table")]
    FormatMismatch { table: TableKind, format: u32 },
    #[error("the {table} table has {found} entries, expected {expected}")]
    CountMismatch {
        table: TableKind,
        expected: u32,
        found: u32,
    },
    #[error("String offset {offset} out of bounds for a pool of {len} bytes")]
    StringOutOfBounds { offset: u32, len: u32 },
    #[error(
        "Invalid encoding range: columns {first_col}..={last_col}, rows {first_row}..={last_row}"
    )]
    RangeInvalid {
        first_col: u16,
        last_col: u16,
        first_row: u16,
        last_row: u16,
    },
    #[error("the {0} table is missing")]
    TableIsMissing(TableKind),
    #[error("Malformed data: '{0}'")]
    MalformedData(&'static str),
}

impl From<std::io::Error> for DecodeError {
    fn from(err: std::io::Error) -> Self {
        log::debug!("stream error: {err}");
        DecodeError::TruncatedInput
    }
}
