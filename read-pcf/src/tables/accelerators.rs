//! The accelerator tables: font-wide flags and bounds.
//!
//! There are two tables with the same layout. The legacy table predates BDF
//! and its bounds may cover unencoded glyphs; the BDF accelerators cover
//! only encoded glyphs and are preferred when present.

use std::io::{Read, Seek};

use super::metrics::GlyphMetric;
use crate::cursor::Cursor;
use crate::format::Format;
use crate::read::DecodeError;
use crate::toc::{TableDirectory, TableKind};

/// The drawing direction of a font.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DrawDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

impl DrawDirection {
    fn from_raw(raw: u8) -> Self {
        if raw == 0 {
            DrawDirection::LeftToRight
        } else {
            DrawDirection::RightToLeft
        }
    }
}

/// Flags and font-wide bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Accelerators {
    /// No glyph extends past its advance or before its origin.
    pub no_overlap: bool,
    /// All glyphs have the same metrics.
    pub constant_metrics: bool,
    pub terminal_font: bool,
    /// All glyphs have the same advance.
    pub constant_width: bool,
    /// Ink never extends outside the font's cell.
    pub ink_inside: bool,
    /// Ink metrics differ from the full metrics for some glyph.
    pub ink_metrics: bool,
    pub draw_direction: DrawDirection,
    /// Always set for decoded fonts.
    pub cachable: bool,
    pub font_ascent: i32,
    pub font_descent: i32,
    pub max_overlap: i32,
    pub min_bounds: GlyphMetric,
    pub max_bounds: GlyphMetric,
    /// Same as `min_bounds` unless the table carries ink bounds.
    pub ink_min_bounds: GlyphMetric,
    pub ink_max_bounds: GlyphMetric,
}

impl Accelerators {
    /// Read the accelerator table of the given kind, if the file has one.
    pub(crate) fn read<R: Read + Seek>(
        cursor: &mut Cursor<R>,
        directory: &TableDirectory,
        kind: TableKind,
    ) -> Result<Option<Self>, DecodeError> {
        if directory.seek(cursor, kind)?.is_none() {
            return Ok(None);
        }
        let format = Format::new(cursor.read_lsb32()?);
        let has_ink_bounds = if format.matches(Format::DEFAULT) {
            false
        } else if format.matches(Format::ACCEL_W_INKBOUNDS) {
            true
        } else {
            return Err(DecodeError::FormatMismatch {
                table: kind,
                format: format.to_u32(),
            });
        };
        let order = format.byte_order();

        let mut flag = || cursor.read_u8().map(|v| v != 0);
        let no_overlap = flag()?;
        let constant_metrics = flag()?;
        let terminal_font = flag()?;
        let constant_width = flag()?;
        let ink_inside = flag()?;
        let ink_metrics = flag()?;
        let draw_direction = DrawDirection::from_raw(cursor.read_u8()?);
        // padding
        cursor.read_u8()?;

        let font_ascent = cursor.read(order)?;
        let font_descent = cursor.read(order)?;
        let max_overlap = cursor.read(order)?;
        let min_bounds = GlyphMetric::read(cursor, order)?;
        let max_bounds = GlyphMetric::read(cursor, order)?;
        let (ink_min_bounds, ink_max_bounds) = if has_ink_bounds {
            (
                GlyphMetric::read(cursor, order)?,
                GlyphMetric::read(cursor, order)?,
            )
        } else {
            (min_bounds, max_bounds)
        };
        log::debug!("read {kind} (ink bounds: {has_ink_bounds})");
        Ok(Some(Accelerators {
            no_overlap,
            constant_metrics,
            terminal_font,
            constant_width,
            ink_inside,
            ink_metrics,
            draw_direction,
            cachable: true,
            font_ascent,
            font_descent,
            max_overlap,
            min_bounds,
            max_bounds,
            ink_min_bounds,
            ink_max_bounds,
        }))
    }
}
