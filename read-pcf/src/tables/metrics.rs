//! Glyph metrics, shared by the metrics and ink metrics tables.

use std::io::{Read, Seek};

use crate::cursor::{Cursor, MAX_PREALLOC};
use crate::format::Format;
use crate::read::DecodeError;
use crate::scalar::ByteOrder;
use crate::toc::TableKind;

/// The in-memory size of one metric, used to bound glyph counts.
const GLYPH_METRIC_LEN: u32 = 12;

/// Metrics of a single glyph, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlyphMetric {
    pub left_side_bearing: i16,
    pub right_side_bearing: i16,
    pub character_width: i16,
    pub ascent: i16,
    pub descent: i16,
    pub attributes: u16,
}

impl GlyphMetric {
    /// Width of the glyph bitmap.
    ///
    /// Negative widths, which only occur in damaged fonts, are treated as
    /// zero.
    pub fn width(&self) -> usize {
        (self.right_side_bearing as i32 - self.left_side_bearing as i32).max(0) as usize
    }

    /// Height of the glyph bitmap.
    pub fn height(&self) -> usize {
        (self.ascent as i32 + self.descent as i32).max(0) as usize
    }

    /// Read the uncompressed form: six 16-bit fields.
    pub(crate) fn read<R: Read + Seek>(
        cursor: &mut Cursor<R>,
        order: ByteOrder,
    ) -> Result<Self, DecodeError> {
        Ok(GlyphMetric {
            left_side_bearing: cursor.read(order)?,
            right_side_bearing: cursor.read(order)?,
            character_width: cursor.read(order)?,
            ascent: cursor.read(order)?,
            descent: cursor.read(order)?,
            attributes: cursor.read(order)?,
        })
    }

    /// Read the compressed form: five bytes biased by 0x80, no attributes.
    pub(crate) fn read_compressed<R: Read + Seek>(
        cursor: &mut Cursor<R>,
    ) -> Result<Self, DecodeError> {
        let mut next = || cursor.read_u8().map(|v| v as i16 - 0x80);
        Ok(GlyphMetric {
            left_side_bearing: next()?,
            right_side_bearing: next()?,
            character_width: next()?,
            ascent: next()?,
            descent: next()?,
            attributes: 0,
        })
    }
}

/// Read a metrics or ink metrics table.
///
/// The cursor must be positioned at the start of the table.
pub(crate) fn read_metrics<R: Read + Seek>(
    cursor: &mut Cursor<R>,
    table: TableKind,
) -> Result<Vec<GlyphMetric>, DecodeError> {
    let format = Format::new(cursor.read_lsb32()?);
    let order = format.byte_order();
    let compressed = if format.matches(Format::DEFAULT) {
        false
    } else if format.matches(Format::COMPRESSED_METRICS) {
        true
    } else {
        return Err(DecodeError::FormatMismatch {
            table,
            format: format.to_u32(),
        });
    };
    let count = if compressed {
        cursor.read::<u16>(order)? as u32
    } else {
        cursor.read::<u32>(order)?
    };
    if count > i32::MAX as u32 / GLYPH_METRIC_LEN {
        return Err(DecodeError::InvalidCount(count));
    }
    let mut metrics = Vec::with_capacity((count as usize).min(MAX_PREALLOC));
    for _ in 0..count {
        let metric = if compressed {
            GlyphMetric::read_compressed(cursor)?
        } else {
            GlyphMetric::read(cursor, order)?
        };
        metrics.push(metric);
    }
    log::debug!("read {count} {table} (compressed: {compressed})");
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcf_test_data::PcfBuffer;

    fn read(data: Vec<u8>) -> Result<Vec<GlyphMetric>, DecodeError> {
        let mut cursor = Cursor::new(std::io::Cursor::new(data));
        read_metrics(&mut cursor, TableKind::Metrics)
    }

    #[test]
    fn uncompressed() {
        // MSB byte order
        let data = PcfBuffer::new(true)
            .push_lsb32(0b0100)
            .push_u32(2)
            .push_i16(-1)
            .push_i16(5)
            .push_i16(6)
            .push_i16(9)
            .push_i16(2)
            .push_u16(0xabcd)
            .push_i16(0)
            .push_i16(0)
            .push_i16(4)
            .push_i16(0)
            .push_i16(0)
            .push_u16(0)
            .into_inner();
        let metrics = read(data).unwrap();
        assert_eq!(
            metrics[0],
            GlyphMetric {
                left_side_bearing: -1,
                right_side_bearing: 5,
                character_width: 6,
                ascent: 9,
                descent: 2,
                attributes: 0xabcd,
            }
        );
        assert_eq!(metrics[0].width(), 6);
        assert_eq!(metrics[0].height(), 11);
        assert_eq!(metrics[1].width(), 0);
    }

    #[test]
    fn compressed() {
        let data = PcfBuffer::new(false)
            .push_lsb32(0x100)
            .push_u16(1)
            .extend(&[0x7f, 0x85, 0x86, 0x89, 0x82])
            .into_inner();
        let metrics = read(data).unwrap();
        assert_eq!(
            metrics,
            vec![GlyphMetric {
                left_side_bearing: -1,
                right_side_bearing: 5,
                character_width: 6,
                ascent: 9,
                descent: 2,
                attributes: 0,
            }]
        );
    }

    #[test]
    fn count_overflow_rejected_before_reading() {
        let data = PcfBuffer::new(false)
            .push_lsb32(0)
            .push_u32(0x7fff_ffff)
            .into_inner();
        assert_eq!(read(data), Err(DecodeError::InvalidCount(0x7fff_ffff)));
    }

    #[test]
    fn unknown_format() {
        let data = PcfBuffer::new(false).push_lsb32(0x200).push_u32(0).into_inner();
        assert_eq!(
            read(data),
            Err(DecodeError::FormatMismatch {
                table: TableKind::Metrics,
                format: 0x200,
            })
        );
    }

    #[test]
    fn truncated_metrics() {
        let data = PcfBuffer::new(false)
            .push_lsb32(0)
            .push_u32(100_000)
            .push_i16(1)
            .into_inner();
        assert_eq!(read(data), Err(DecodeError::TruncatedInput));
    }

    #[test]
    fn negative_dimensions_clamp() {
        let metric = GlyphMetric {
            left_side_bearing: 4,
            right_side_bearing: 1,
            ascent: -3,
            descent: 1,
            ..Default::default()
        };
        assert_eq!(metric.width(), 0);
        assert_eq!(metric.height(), 0);
    }
}
