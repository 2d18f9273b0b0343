//! test data shared between the read-pcf crates.
//!
//! PCF fonts are generated on the fly by [`PcfBuilder`] rather than checked
//! in, so that each test can pick the byte order, bit order, padding and
//! table variants it wants to exercise.

mod builder;

pub use builder::{
    FileLayout, PcfBuilder, PcfFile, TestAccelerators, TestGlyph, TestMetric, TestProperty,
};

/// Table type values, as written in the table directory.
pub mod kind {
    pub const PROPERTIES: u32 = 1 << 0;
    pub const ACCELERATORS: u32 = 1 << 1;
    pub const METRICS: u32 = 1 << 2;
    pub const BITMAPS: u32 = 1 << 3;
    pub const INK_METRICS: u32 = 1 << 4;
    pub const BDF_ENCODINGS: u32 = 1 << 5;
    pub const SWIDTHS: u32 = 1 << 6;
    pub const GLYPH_NAMES: u32 = 1 << 7;
    pub const BDF_ACCELERATORS: u32 = 1 << 8;
}

/// The file version, stored little-endian at the start of every file.
pub const PCF_FILE_VERSION: u32 = u32::from_be_bytes(*b"pcf\x01");

/// A convenience type for generating a buffer of bytes in either byte order.
#[derive(Debug, Clone, Default)]
pub struct PcfBuffer {
    msb_first: bool,
    data: Vec<u8>,
}

impl PcfBuffer {
    /// Create an empty buffer; multi-byte values are big-endian if
    /// `msb_first` is set.
    pub fn new(msb_first: bool) -> Self {
        PcfBuffer {
            msb_first,
            data: Vec::new(),
        }
    }

    /// The current length of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer contains zero bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    pub fn push_u8(mut self, value: u8) -> Self {
        self.data.push(value);
        self
    }

    pub fn push_u16(mut self, value: u16) -> Self {
        if self.msb_first {
            self.data.extend(value.to_be_bytes());
        } else {
            self.data.extend(value.to_le_bytes());
        }
        self
    }

    pub fn push_i16(self, value: i16) -> Self {
        self.push_u16(value as u16)
    }

    pub fn push_u32(mut self, value: u32) -> Self {
        if self.msb_first {
            self.data.extend(value.to_be_bytes());
        } else {
            self.data.extend(value.to_le_bytes());
        }
        self
    }

    pub fn push_i32(self, value: i32) -> Self {
        self.push_u32(value as u32)
    }

    /// Always little-endian, as used for the file header and format words.
    pub fn push_lsb32(mut self, value: u32) -> Self {
        self.data.extend(value.to_le_bytes());
        self
    }

    pub fn extend(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self
    }

    /// Append zero bytes until the length is a multiple of `align`.
    pub fn pad_to(mut self, align: usize) -> Self {
        while self.data.len() % align != 0 {
            self.data.push(0);
        }
        self
    }
}

/// An 8x8 font with a single fully lit glyph mapped to 'A', which is also
/// the default character. Rows are padded to one byte.
pub fn single_glyph_font() -> PcfBuilder {
    let glyph = TestGlyph::from_ascii(8, &["########"; 8]);
    PcfBuilder::new(FileLayout {
        glyph_pad: 1,
        ..FileLayout::default()
    })
    .property(
        "FONT",
        TestProperty::Str("-test-block-medium-r-normal--8-80-75-75-c-80-iso8859-1".into()),
    )
    .property("PIXEL_SIZE", TestProperty::Int(8))
    .glyph(glyph)
    .encoding_range(0x41, 0x41, 0x00, 0x00)
    .map_code(0x41, 0)
    .default_char(0x41)
}

/// A small font with glyphs of assorted widths, mapped from '0' upwards.
///
/// The widths are chosen so that rows need one to five bytes, which makes
/// the font useful for exercising every padding conversion.
pub fn assorted_widths_font(layout: FileLayout) -> PcfBuilder {
    let mut builder = PcfBuilder::new(layout)
        .property("FAMILY_NAME", TestProperty::Str("Assorted".into()))
        .property("WEIGHT_NAME", TestProperty::Str("Medium".into()))
        .property("POINT_SIZE", TestProperty::Int(120))
        .property("RESOLUTION_X", TestProperty::Int(75))
        .property("FONT_ASCENT", TestProperty::Int(9))
        .property("FONT_DESCENT", TestProperty::Int(3))
        .encoding_range(0x20, 0x7e, 0x00, 0x00)
        .default_char(0x20);
    // a blank space glyph first
    builder = builder
        .glyph(TestGlyph::blank(TestMetric::new(0, 0, 4, 0, 0)))
        .map_code(0x20, 0);
    for (i, width) in [3, 7, 8, 9, 13, 16, 17, 24, 31, 33, 36].into_iter().enumerate() {
        let glyph = TestGlyph::pattern(width, 12, 9, i as u32);
        builder = builder.glyph(glyph).map_code(0x30 + i as u16, i as u16 + 1);
    }
    builder
}
