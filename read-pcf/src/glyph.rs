//! Access to a single decoded glyph.

use crate::format::{BitOrder, ScanUnit};
use crate::options::LoadOptions;
use crate::tables::bitmaps::transform::row_stride;
use crate::tables::metrics::GlyphMetric;

/// A glyph in a [`Font`](crate::Font).
///
/// This borrows its bitmap from the font; the layout of the bitmap is the
/// one the font was loaded with. The one exception is the scan unit: if
/// neither the file nor the requested layout stores bytes and bits in the
/// same order, bytes are not swapped and keep the file's scan unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph<'a> {
    index: u16,
    metrics: &'a GlyphMetric,
    ink_metrics: Option<&'a GlyphMetric>,
    data: &'a [u8],
    layout: LoadOptions,
}

impl<'a> Glyph<'a> {
    pub(crate) fn new(
        index: u16,
        metrics: &'a GlyphMetric,
        ink_metrics: Option<&'a GlyphMetric>,
        data: &'a [u8],
        layout: LoadOptions,
    ) -> Self {
        Glyph {
            index,
            metrics,
            ink_metrics,
            data,
            layout,
        }
    }

    /// The index of this glyph in the font's metrics table.
    pub fn index(&self) -> u16 {
        self.index
    }

    pub fn metrics(&self) -> &'a GlyphMetric {
        self.metrics
    }

    /// The tight bounds of the glyph's ink.
    ///
    /// Fonts without an ink metrics table return the full metrics.
    pub fn ink_metrics(&self) -> &'a GlyphMetric {
        self.ink_metrics.unwrap_or(self.metrics)
    }

    pub fn width(&self) -> usize {
        self.metrics.width()
    }

    pub fn height(&self) -> usize {
        self.metrics.height()
    }

    /// The raw bitmap: `height` rows of `stride` bytes.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// The number of bytes in each row of the bitmap.
    pub fn stride(&self) -> usize {
        row_stride(self.width(), self.layout.glyph_pad.bytes())
    }

    /// The bytes of row `y`, starting from the top of the glyph.
    pub fn row(&self, y: usize) -> Option<&'a [u8]> {
        if y >= self.height() {
            return None;
        }
        let stride = self.stride();
        self.data.get(y * stride..(y + 1) * stride)
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> + 'a {
        let stride = self.stride();
        let height = self.height();
        let data = self.data;
        (0..height).filter_map(move |y| data.get(y * stride..(y + 1) * stride))
    }

    /// `true` if the pixel at (`x`, `y`) is set.
    ///
    /// Coordinates are relative to the top left of the bitmap; pixels
    /// outside the bitmap are never set. Bytes are read in the scan unit
    /// they are actually grouped by, which may be the file's.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        if x >= self.width() {
            return false;
        }
        let Some(row) = self.row(y) else {
            return false;
        };
        let mut byte = x / 8;
        if !self.layout.orders_agree() {
            // bytes are stored reversed within each scan unit
            let unit = match self.layout.scan_unit {
                ScanUnit::Two => 2,
                ScanUnit::Four => 4,
                ScanUnit::One | ScanUnit::Eight => 1,
            };
            byte = byte - byte % unit + (unit - 1 - byte % unit);
        }
        let mask: u8 = match self.layout.bit_order {
            BitOrder::MsbFirst => 0x80 >> (x % 8),
            BitOrder::LsbFirst => 1 << (x % 8),
        };
        row.get(byte).is_some_and(|b| b & mask != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::GlyphPad;
    use crate::scalar::ByteOrder;

    const METRIC: GlyphMetric = GlyphMetric {
        left_side_bearing: 0,
        right_side_bearing: 12,
        character_width: 12,
        ascent: 2,
        descent: 0,
        attributes: 0,
    };

    #[test]
    fn msb_rows() {
        let layout = LoadOptions::new(
            ByteOrder::MsbFirst,
            BitOrder::MsbFirst,
            GlyphPad::Two,
            ScanUnit::One,
        );
        let data = [0b1000_0000, 0b0001_0000, 0x00, 0b0000_0001];
        let glyph = Glyph::new(0, &METRIC, None, &data, layout);
        assert_eq!(glyph.stride(), 2);
        assert_eq!(glyph.rows().count(), 2);
        assert!(glyph.pixel(0, 0));
        assert!(glyph.pixel(11, 0));
        assert!(!glyph.pixel(12, 0));
        assert!(!glyph.pixel(7, 1));
        assert!(!glyph.pixel(0, 2));
        assert_eq!(glyph.row(1), Some(&data[2..]));
        assert_eq!(glyph.row(2), None);
        assert_eq!(glyph.ink_metrics(), &METRIC);
    }

    #[test]
    fn lsb_bits_swapped_units() {
        // LSB bits in MSB bytes, 2 byte units: the second byte comes first
        let layout = LoadOptions::new(
            ByteOrder::MsbFirst,
            BitOrder::LsbFirst,
            GlyphPad::Two,
            ScanUnit::Two,
        );
        let data = [0b0000_1000, 0b0000_0001, 0, 0];
        let glyph = Glyph::new(0, &METRIC, None, &data, layout);
        assert!(glyph.pixel(0, 0));
        assert!(glyph.pixel(11, 0));
        assert!(!glyph.pixel(3, 0));
        assert!(!glyph.pixel(0, 1));
    }

    #[test]
    fn ink_metrics_override() {
        let ink = GlyphMetric {
            left_side_bearing: 1,
            right_side_bearing: 3,
            ..METRIC
        };
        let layout = LoadOptions::default();
        let glyph = Glyph::new(7, &METRIC, Some(&ink), &[0; 8], layout);
        assert_eq!(glyph.index(), 7);
        assert_eq!(glyph.ink_metrics().width(), 2);
        assert_eq!(glyph.width(), 12);
    }
}
