//! Font-wide information.

use std::io::{Read, Seek};

use crate::cursor::Cursor;
use crate::read::DecodeError;
use crate::tables::accelerators::Accelerators;
use crate::tables::encoding::{EncodingIndex, EncodingRange};
use crate::tables::properties::{Properties, PropertyValue};
use crate::toc::{TableDirectory, TableKind};

/// Everything about a font except its glyphs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontInfo {
    pub properties: Properties,
    /// Flags and bounds, from the BDF accelerators if the font has them.
    pub accelerators: Accelerators,
    pub encoding_range: EncodingRange,
    /// The code used for characters the font has no glyph for.
    pub default_char: Option<u16>,
    /// `true` if every code in `encoding_range` has a glyph.
    pub all_exist: bool,
}

impl FontInfo {
    /// Read only the font-wide information from a PCF file.
    ///
    /// This skips the metrics and bitmaps, but still validates the encoding
    /// table.
    pub fn load<R: Read + Seek>(stream: R) -> Result<Self, DecodeError> {
        let mut cursor = Cursor::new(stream);
        let directory = TableDirectory::read(&mut cursor)?;
        let properties = Properties::read(&mut cursor, &directory)?;
        let legacy = read_legacy_accelerators(&mut cursor, &directory)?;
        let encoding = EncodingIndex::read(&mut cursor, &directory, None)?;
        let accelerators = read_bdf_accelerators(&mut cursor, &directory)?.or(legacy);
        FontInfo::new(properties, accelerators, &encoding)
    }

    pub(crate) fn new(
        properties: Properties,
        accelerators: Option<Accelerators>,
        encoding: &EncodingIndex,
    ) -> Result<Self, DecodeError> {
        let accelerators =
            accelerators.ok_or(DecodeError::TableIsMissing(TableKind::Accelerators))?;
        Ok(FontInfo {
            properties,
            accelerators,
            encoding_range: encoding.range(),
            default_char: encoding.default_char(),
            all_exist: encoding.all_exist(),
        })
    }

    /// The value of the property named `name`.
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Distance from the baseline to the top of the font's cell.
    pub fn font_ascent(&self) -> i32 {
        self.accelerators.font_ascent
    }

    /// Distance from the baseline to the bottom of the font's cell.
    pub fn font_descent(&self) -> i32 {
        self.accelerators.font_descent
    }

    /// The largest advance of any glyph.
    pub fn max_advance(&self) -> i16 {
        self.accelerators.max_bounds.character_width
    }
}

/// Read the legacy accelerators, unless the BDF accelerators will replace them.
pub(crate) fn read_legacy_accelerators<R: Read + Seek>(
    cursor: &mut Cursor<R>,
    directory: &TableDirectory,
) -> Result<Option<Accelerators>, DecodeError> {
    if directory.contains(TableKind::BdfAccelerators) {
        return Ok(None);
    }
    Accelerators::read(cursor, directory, TableKind::Accelerators)?
        .ok_or(DecodeError::TableIsMissing(TableKind::Accelerators))
        .map(Some)
}

pub(crate) fn read_bdf_accelerators<R: Read + Seek>(
    cursor: &mut Cursor<R>,
    directory: &TableDirectory,
) -> Result<Option<Accelerators>, DecodeError> {
    Accelerators::read(cursor, directory, TableKind::BdfAccelerators)
}
