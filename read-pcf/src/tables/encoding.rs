//! The BDF encodings table: a sparse map from character codes to glyphs.

use std::io::{Read, Seek};

use crate::cursor::Cursor;
use crate::format::Format;
use crate::read::DecodeError;
use crate::toc::{TableDirectory, TableKind};

/// Number of entries in one lazily allocated block of the index.
pub const SEGMENT_SIZE: usize = 128;

/// Marks a code with no glyph, both in the table and as the default char.
const NO_SUCH_CHAR: u16 = 0xffff;

type Segment = Box<[Option<u16>; SEGMENT_SIZE]>;

/// The range of character codes covered by a font.
///
/// Codes are 16 bits; the high byte is the row and the low byte the column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncodingRange {
    pub first_col: u16,
    pub last_col: u16,
    pub first_row: u16,
    pub last_row: u16,
}

impl EncodingRange {
    /// The number of columns in each row.
    pub fn cols(&self) -> usize {
        (self.last_col as usize + 1).saturating_sub(self.first_col as usize)
    }

    pub fn rows(&self) -> usize {
        (self.last_row as usize + 1).saturating_sub(self.first_row as usize)
    }

    /// The number of codes in the range.
    pub fn len(&self) -> usize {
        self.cols() * self.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The position of `code` in the range, in row-major order.
    pub fn index_of(&self, code: u16) -> Option<usize> {
        let row = code >> 8;
        let col = code & 0xff;
        if !(self.first_row..=self.last_row).contains(&row)
            || !(self.first_col..=self.last_col).contains(&col)
        {
            return None;
        }
        Some((row - self.first_row) as usize * self.cols() + (col - self.first_col) as usize)
    }

    /// The code at `index`, if it can be expressed in 16 bits.
    pub fn code_at(&self, index: usize) -> Option<u16> {
        if index >= self.len() {
            return None;
        }
        let row = self.first_row as usize + index / self.cols();
        let col = self.first_col as usize + index % self.cols();
        if row > 0xff || col > 0xff {
            return None;
        }
        Some(((row << 8) | col) as u16)
    }

    fn validate(&self) -> Result<(), DecodeError> {
        if self.first_col > self.last_col
            || self.first_row > self.last_row
            || self.last_col - self.first_col > 255
        {
            return Err(DecodeError::RangeInvalid {
                first_col: self.first_col,
                last_col: self.last_col,
                first_row: self.first_row,
                last_row: self.last_row,
            });
        }
        Ok(())
    }
}

/// Maps character codes to glyph indices.
///
/// Storage is allocated in blocks of [`SEGMENT_SIZE`] codes, and only for
/// blocks that contain at least one glyph, so a font that declares the full
/// 16-bit range but only encodes a few characters stays small.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EncodingIndex {
    range: EncodingRange,
    default_char: Option<u16>,
    all_exist: bool,
    segments: Vec<Option<Segment>>,
}

impl EncodingIndex {
    /// Read the encoding table.
    ///
    /// If `num_glyphs` is given, every entry must be a valid glyph index.
    pub(crate) fn read<R: Read + Seek>(
        cursor: &mut Cursor<R>,
        directory: &TableDirectory,
        num_glyphs: Option<usize>,
    ) -> Result<Self, DecodeError> {
        directory.seek_required(cursor, TableKind::BdfEncodings)?;
        let format = Format::new(cursor.read_lsb32()?);
        if !format.matches(Format::DEFAULT) {
            return Err(DecodeError::FormatMismatch {
                table: TableKind::BdfEncodings,
                format: format.to_u32(),
            });
        }
        let order = format.byte_order();
        let range = EncodingRange {
            first_col: cursor.read(order)?,
            last_col: cursor.read(order)?,
            first_row: cursor.read(order)?,
            last_row: cursor.read(order)?,
        };
        let default_char: u16 = cursor.read(order)?;
        range.validate()?;

        let n_codes = range.len();
        let mut index = EncodingIndex {
            range,
            default_char: (default_char != NO_SUCH_CHAR).then_some(default_char),
            all_exist: true,
            segments: Vec::new(),
        };
        index.segments.resize_with(n_codes.div_ceil(SEGMENT_SIZE), || None);
        for i in 0..n_codes {
            let glyph: u16 = cursor.read(order)?;
            if glyph == NO_SUCH_CHAR {
                index.all_exist = false;
                continue;
            }
            if num_glyphs.is_some_and(|n| glyph as usize >= n) {
                return Err(DecodeError::MalformedData("encoding refers to a missing glyph"));
            }
            let segment = index.segments[i / SEGMENT_SIZE]
                .get_or_insert_with(|| Box::new([None; SEGMENT_SIZE]));
            segment[i % SEGMENT_SIZE] = Some(glyph);
        }
        log::debug!(
            "read encoding for {n_codes} codes, {} of {} segments populated",
            index.populated_segments(),
            index.segments.len()
        );
        Ok(index)
    }

    pub fn range(&self) -> EncodingRange {
        self.range
    }

    /// The code of the default character, as stored in the file.
    ///
    /// This may lie outside the range or have no glyph, in which case the
    /// font has no default glyph.
    pub fn default_char(&self) -> Option<u16> {
        self.default_char
    }

    /// `true` if every code in the range has a glyph.
    pub fn all_exist(&self) -> bool {
        self.all_exist
    }

    /// The glyph index for `code`.
    pub fn get(&self, code: u16) -> Option<u16> {
        self.get_index(self.range.index_of(code)?)
    }

    /// The glyph index of the default character, if it has one.
    pub fn default_glyph(&self) -> Option<u16> {
        self.default_char.and_then(|code| self.get(code))
    }

    /// Every encoded `(code, glyph index)` pair, in code order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        self.segments
            .iter()
            .enumerate()
            .filter_map(|(i, segment)| segment.as_ref().map(|segment| (i, segment)))
            .flat_map(move |(i, segment)| {
                segment.iter().enumerate().filter_map(move |(j, glyph)| {
                    let code = self.range.code_at(i * SEGMENT_SIZE + j)?;
                    glyph.map(|glyph| (code, glyph))
                })
            })
    }

    /// The number of segments holding at least one glyph.
    pub fn populated_segments(&self) -> usize {
        self.segments.iter().filter(|segment| segment.is_some()).count()
    }

    fn get_index(&self, index: usize) -> Option<u16> {
        self.segments.get(index / SEGMENT_SIZE)?.as_ref()?[index % SEGMENT_SIZE]
    }
}

impl std::fmt::Debug for EncodingIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodingIndex")
            .field("range", &self.range)
            .field("default_char", &self.default_char)
            .field("all_exist", &self.all_exist)
            .field("segments", &self.segments.len())
            .field("populated", &self.populated_segments())
            .finish()
    }
}
