//! The in-memory bitmap layout requested by the caller.

use crate::format::{BitOrder, GlyphPad, ScanUnit};
use crate::scalar::ByteOrder;

/// How glyph bitmaps should be laid out once loaded.
///
/// Bitmaps are converted from whatever layout the file uses to this one.
/// The default is the layout used by most software rasterizers: least
/// significant bit first, rows padded to 32 bits, no byte swapping.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadOptions {
    pub byte_order: ByteOrder,
    pub bit_order: BitOrder,
    pub glyph_pad: GlyphPad,
    pub scan_unit: ScanUnit,
}

impl LoadOptions {
    pub const fn new(
        byte_order: ByteOrder,
        bit_order: BitOrder,
        glyph_pad: GlyphPad,
        scan_unit: ScanUnit,
    ) -> Self {
        LoadOptions {
            byte_order,
            bit_order,
            glyph_pad,
            scan_unit,
        }
    }

    pub const fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    pub const fn with_bit_order(mut self, bit_order: BitOrder) -> Self {
        self.bit_order = bit_order;
        self
    }

    pub const fn with_glyph_pad(mut self, glyph_pad: GlyphPad) -> Self {
        self.glyph_pad = glyph_pad;
        self
    }

    pub const fn with_scan_unit(mut self, scan_unit: ScanUnit) -> Self {
        self.scan_unit = scan_unit;
        self
    }

    /// `true` if bytes and bits are requested in the same order.
    pub(crate) fn orders_agree(&self) -> bool {
        matches!(
            (self.byte_order, self.bit_order),
            (ByteOrder::LsbFirst, BitOrder::LsbFirst) | (ByteOrder::MsbFirst, BitOrder::MsbFirst)
        )
    }
}
