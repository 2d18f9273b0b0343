#![no_main]
use std::error::Error;

use libfuzzer_sys::{
    arbitrary::{self, Arbitrary, Unstructured},
    fuzz_target,
};
use read_pcf::{BitOrder, ByteOrder, Font, GlyphPad, LoadOptions, ScanUnit};

/// The in-memory layout to convert bitmaps to.
///
/// Exists to fulfill [Arbitrary]
#[derive(Arbitrary, Debug)]
struct LayoutRequest {
    msb_bytes: bool,
    msb_bits: bool,
    glyph_pad: u8,
    scan_unit: u8,
}

impl From<LayoutRequest> for LoadOptions {
    fn from(value: LayoutRequest) -> Self {
        LoadOptions::new(
            if value.msb_bytes {
                ByteOrder::MsbFirst
            } else {
                ByteOrder::LsbFirst
            },
            if value.msb_bits {
                BitOrder::MsbFirst
            } else {
                BitOrder::LsbFirst
            },
            GlyphPad::from_index(value.glyph_pad as u32),
            ScanUnit::from_index(value.scan_unit as u32),
        )
    }
}

fn do_layout_things(data: &[u8]) -> Result<(), Box<dyn Error>> {
    // the first few bytes pick the layout, the rest is the font
    let mut unstructured = Unstructured::new(data);
    let request: LayoutRequest = unstructured.arbitrary()?;
    let font_data = unstructured.take_rest();
    let font = Font::from_bytes(font_data, request.into())?;
    for (_code, glyph) in font.mappings() {
        for y in 0..glyph.height() {
            for x in 0..glyph.width() {
                let _ = glyph.pixel(x, y);
            }
        }
    }
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let _ = do_layout_things(data);
});
