//! The per-table format word and the bitmap layout parameters it encodes.

use crate::scalar::ByteOrder;

/// The order of pixels within a byte of bitmap data.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BitOrder {
    /// The leftmost pixel is the least significant bit.
    #[default]
    LsbFirst,
    /// The leftmost pixel is the most significant bit.
    MsbFirst,
}

/// The alignment, in bytes, that each bitmap row is padded to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GlyphPad {
    One,
    Two,
    #[default]
    Four,
    Eight,
}

impl GlyphPad {
    pub const ALL: [GlyphPad; 4] = [GlyphPad::One, GlyphPad::Two, GlyphPad::Four, GlyphPad::Eight];

    /// Returns the padding for a two-bit index, as stored in the format word.
    pub const fn from_index(index: u32) -> Self {
        match index & 3 {
            0 => GlyphPad::One,
            1 => GlyphPad::Two,
            2 => GlyphPad::Four,
            _ => GlyphPad::Eight,
        }
    }

    /// Returns the padding for a byte count, if it is one of 1, 2, 4 or 8.
    pub const fn from_bytes(bytes: usize) -> Option<Self> {
        match bytes {
            1 => Some(GlyphPad::One),
            2 => Some(GlyphPad::Two),
            4 => Some(GlyphPad::Four),
            8 => Some(GlyphPad::Eight),
            _ => None,
        }
    }

    /// The index of this padding in the bitmap size table.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The padding in bytes.
    pub const fn bytes(self) -> usize {
        1 << self as usize
    }
}

/// The word size used when byte-swapping bitmap data.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScanUnit {
    #[default]
    One,
    Two,
    Four,
    Eight,
}

impl ScanUnit {
    pub const fn from_index(index: u32) -> Self {
        match index & 3 {
            0 => ScanUnit::One,
            1 => ScanUnit::Two,
            2 => ScanUnit::Four,
            _ => ScanUnit::Eight,
        }
    }

    pub const fn from_bytes(bytes: usize) -> Option<Self> {
        match bytes {
            1 => Some(ScanUnit::One),
            2 => Some(ScanUnit::Two),
            4 => Some(ScanUnit::Four),
            8 => Some(ScanUnit::Eight),
            _ => None,
        }
    }

    pub const fn bytes(self) -> usize {
        1 << self as usize
    }
}

/// A table format word.
///
/// The low byte describes how the table's data is laid out (byte order, bit
/// order, glyph padding and scan unit); the remaining bits select a table
/// specific variant.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Format(u32);

impl Format {
    pub const DEFAULT: Format = Format(0x0000_0000);
    /// Accelerator table that also carries ink bounds.
    pub const ACCEL_W_INKBOUNDS: Format = Format(0x0000_0100);
    /// Metrics stored as five biased bytes per glyph.
    pub const COMPRESSED_METRICS: Format = Format(0x0000_0100);

    const FORMAT_MASK: u32 = 0xffff_ff00;
    const GLYPH_PAD_MASK: u32 = 0b11;
    const BYTE_MASK: u32 = 1 << 2;
    const BIT_MASK: u32 = 1 << 3;
    const SCAN_UNIT_SHIFT: u32 = 4;

    pub const fn new(raw: u32) -> Self {
        Format(raw)
    }

    pub const fn to_u32(self) -> u32 {
        self.0
    }

    /// `true` if the variant bits of `self` and `other` are equal.
    pub const fn matches(self, other: Format) -> bool {
        self.0 & Self::FORMAT_MASK == other.0 & Self::FORMAT_MASK
    }

    pub const fn byte_order(self) -> ByteOrder {
        if self.0 & Self::BYTE_MASK != 0 {
            ByteOrder::MsbFirst
        } else {
            ByteOrder::LsbFirst
        }
    }

    pub const fn bit_order(self) -> BitOrder {
        if self.0 & Self::BIT_MASK != 0 {
            BitOrder::MsbFirst
        } else {
            BitOrder::LsbFirst
        }
    }

    pub const fn glyph_pad(self) -> GlyphPad {
        GlyphPad::from_index(self.0 & Self::GLYPH_PAD_MASK)
    }

    pub const fn scan_unit(self) -> ScanUnit {
        ScanUnit::from_index(self.0 >> Self::SCAN_UNIT_SHIFT)
    }

    /// `true` if bytes and bits are stored in the same order.
    pub(crate) fn orders_agree(self) -> bool {
        matches!(
            (self.byte_order(), self.bit_order()),
            (ByteOrder::LsbFirst, BitOrder::LsbFirst) | (ByteOrder::MsbFirst, BitOrder::MsbFirst)
        )
    }
}

impl std::fmt::Debug for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Format")
            .field("variant", &format_args!("0x{:X}", self.0 & Self::FORMAT_MASK))
            .field("byte_order", &self.byte_order())
            .field("bit_order", &self.bit_order())
            .field("glyph_pad", &self.glyph_pad())
            .field("scan_unit", &self.scan_unit())
            .finish()
    }
}
