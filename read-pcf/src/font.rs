//! Loading a complete font.

use std::io::{Read, Seek};

use crate::cursor::Cursor;
use crate::format::{BitOrder, GlyphPad, ScanUnit};
use crate::glyph::Glyph;
use crate::info::{read_bdf_accelerators, read_legacy_accelerators, FontInfo};
use crate::options::LoadOptions;
use crate::read::DecodeError;
use crate::scalar::ByteOrder;
use crate::tables::bitmaps::GlyphBitmaps;
use crate::tables::encoding::EncodingIndex;
use crate::tables::metrics::{read_metrics, GlyphMetric};
use crate::tables::properties::{Properties, PropertyValue};
use crate::toc::{TableDirectory, TableKind};

/// Load a font, converting its bitmaps to the given layout.
///
/// This is shorthand for [`Font::load`] with the equivalent [`LoadOptions`].
pub fn load<R: Read + Seek>(
    stream: R,
    byte_order: ByteOrder,
    bit_order: BitOrder,
    glyph_pad: GlyphPad,
    scan_unit: ScanUnit,
) -> Result<Font, DecodeError> {
    Font::load(
        stream,
        LoadOptions::new(byte_order, bit_order, glyph_pad, scan_unit),
    )
}

/// A decoded bitmap font.
///
/// A font owns all of its data; glyphs borrow from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    info: FontInfo,
    metrics: Vec<GlyphMetric>,
    ink_metrics: Option<Vec<GlyphMetric>>,
    bitmaps: GlyphBitmaps,
    encoding: EncodingIndex,
    default_glyph: Option<u16>,
    options: LoadOptions,
}

impl Font {
    /// Decode a font from `stream`.
    ///
    /// Tables are read in a fixed order and the stream is never rewound, so
    /// it need only support seeking forward.
    pub fn load<R: Read + Seek>(stream: R, options: LoadOptions) -> Result<Self, DecodeError> {
        let mut cursor = Cursor::new(stream);
        let directory = TableDirectory::read(&mut cursor)?;
        let properties = Properties::read(&mut cursor, &directory)?;
        let legacy_accelerators = read_legacy_accelerators(&mut cursor, &directory)?;

        directory.seek_required(&mut cursor, TableKind::Metrics)?;
        let metrics = read_metrics(&mut cursor, TableKind::Metrics)?;
        let bitmaps = GlyphBitmaps::read(&mut cursor, &directory, &metrics, &options)?;

        let ink_metrics = match directory.seek(&mut cursor, TableKind::InkMetrics)? {
            Some(_) => {
                let ink_metrics = read_metrics(&mut cursor, TableKind::InkMetrics)?;
                if ink_metrics.len() != metrics.len() {
                    return Err(DecodeError::CountMismatch {
                        table: TableKind::InkMetrics,
                        expected: metrics.len() as u32,
                        found: ink_metrics.len() as u32,
                    });
                }
                Some(ink_metrics)
            }
            None => None,
        };

        let encoding = EncodingIndex::read(&mut cursor, &directory, Some(metrics.len()))?;
        let accelerators = read_bdf_accelerators(&mut cursor, &directory)?.or(legacy_accelerators);
        let info = FontInfo::new(properties, accelerators, &encoding)?;
        let default_glyph = encoding.default_glyph();
        log::debug!(
            "loaded font with {} glyphs, {} bytes of bitmaps",
            metrics.len(),
            bitmaps.data_len()
        );
        Ok(Font {
            info,
            metrics,
            ink_metrics,
            bitmaps,
            encoding,
            default_glyph,
            options,
        })
    }

    /// Decode a font from a byte slice.
    pub fn from_bytes(data: &[u8], options: LoadOptions) -> Result<Self, DecodeError> {
        Font::load(std::io::Cursor::new(data), options)
    }

    pub fn info(&self) -> &FontInfo {
        &self.info
    }

    /// The layout the glyph bitmaps were requested in.
    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    pub fn properties(&self) -> &Properties {
        &self.info.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.info.property(name)
    }

    pub fn num_glyphs(&self) -> usize {
        self.metrics.len()
    }

    pub fn has_ink_metrics(&self) -> bool {
        self.ink_metrics.is_some()
    }

    pub fn encoding(&self) -> &EncodingIndex {
        &self.encoding
    }

    /// The glyph for the character `code`.
    pub fn glyph(&self, code: u16) -> Option<Glyph<'_>> {
        self.glyph_by_index(self.encoding.get(code)?)
    }

    /// The glyph at `index` in the font's metrics table.
    pub fn glyph_by_index(&self, index: u16) -> Option<Glyph<'_>> {
        let i = index as usize;
        let metrics = self.metrics.get(i)?;
        let ink_metrics = self.ink_metrics.as_ref().and_then(|ink| ink.get(i));
        let data = self.bitmaps.get(i)?;
        let layout = self.options.with_scan_unit(self.bitmaps.scan_unit());
        Some(Glyph::new(index, metrics, ink_metrics, data, layout))
    }

    /// The glyph drawn for characters the font does not have.
    pub fn default_glyph(&self) -> Option<Glyph<'_>> {
        self.glyph_by_index(self.default_glyph?)
    }

    /// The glyph for `code`, or the default glyph if there is none.
    pub fn glyph_or_default(&self, code: u16) -> Option<Glyph<'_>> {
        self.glyph(code).or_else(|| self.default_glyph())
    }

    /// Every encoded character and its glyph, in code order.
    pub fn mappings(&self) -> impl Iterator<Item = (u16, Glyph<'_>)> + '_ {
        self.encoding
            .iter()
            .filter_map(|(code, index)| Some((code, self.glyph_by_index(index)?)))
    }

    /// Distance from the baseline to the top of the font's cell.
    pub fn ascent(&self) -> i32 {
        self.info.font_ascent()
    }

    /// Distance from the baseline to the bottom of the font's cell.
    pub fn descent(&self) -> i32 {
        self.info.font_descent()
    }

    /// The largest advance of any glyph.
    pub fn max_advance(&self) -> i16 {
        self.info.max_advance()
    }
}
