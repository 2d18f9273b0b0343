//! Every supported combination of file and in-memory bitmap layout.

use pcf_test_data::{assorted_widths_font, FileLayout, PcfBuilder};

use crate::{BitOrder, ByteOrder, Font, GlyphPad, LoadOptions, ScanUnit};

fn file_layouts() -> impl Iterator<Item = FileLayout> {
    [false, true].into_iter().flat_map(|byte_msb| {
        [false, true].into_iter().flat_map(move |bit_msb| {
            [1, 2, 4, 8].into_iter().flat_map(move |glyph_pad| {
                [1, 2, 4].into_iter().map(move |scan_unit| FileLayout {
                    byte_msb,
                    bit_msb,
                    glyph_pad,
                    scan_unit,
                })
            })
        })
    })
}

fn load_options() -> impl Iterator<Item = LoadOptions> {
    [ByteOrder::LsbFirst, ByteOrder::MsbFirst]
        .into_iter()
        .flat_map(|byte_order| {
            [BitOrder::LsbFirst, BitOrder::MsbFirst]
                .into_iter()
                .flat_map(move |bit_order| {
                    GlyphPad::ALL.into_iter().flat_map(move |glyph_pad| {
                        [ScanUnit::One, ScanUnit::Two, ScanUnit::Four]
                            .into_iter()
                            .map(move |scan_unit| {
                                LoadOptions::new(byte_order, bit_order, glyph_pad, scan_unit)
                            })
                    })
                })
        })
}

/// Byte swapping happens before repadding, across the whole bitmap buffer,
/// so it can only produce well formed rows when the swap unit fits in both
/// paddings. When both sides want swapped bytes nothing is swapped, and the
/// file's unit has to fit instead.
fn conversion_is_exact(file: &FileLayout, options: &LoadOptions) -> bool {
    let file_swapped = file.byte_msb != file.bit_msb;
    let min_pad = file.glyph_pad.min(options.glyph_pad.bytes());
    match (file_swapped, !options.orders_agree()) {
        (true, true) => file.scan_unit <= min_pad,
        (false, true) => options.scan_unit.bytes() <= min_pad,
        _ => true,
    }
}

fn check_pixels(builder: &PcfBuilder, options: LoadOptions) {
    let layout = builder.layout();
    let font = Font::from_bytes(&builder.build().data, options)
        .unwrap_or_else(|err| panic!("{layout:?} {options:?}: {err}"));
    for (i, expected) in builder.glyphs().iter().enumerate() {
        let glyph = font.glyph_by_index(i as u16).unwrap();
        assert_eq!(glyph.data().len(), glyph.stride() * glyph.height());
        for y in 0..glyph.height() {
            for x in 0..glyph.width() {
                assert_eq!(
                    glyph.pixel(x, y),
                    expected.pixel(x, y),
                    "glyph {i} ({x}, {y}), {layout:?} -> {options:?}"
                );
            }
        }
    }
}

#[test]
fn every_layout() {
    let mut checked = 0;
    for layout in file_layouts() {
        let builder = assorted_widths_font(layout);
        for options in load_options().filter(|options| conversion_is_exact(&layout, options)) {
            check_pixels(&builder, options);
            checked += 1;
        }
    }
    // the file layouts times the load options, less the inexact swaps
    assert!(checked > 48 * 24);
}

#[test]
fn native_layout_is_unchanged() {
    for layout in file_layouts() {
        let builder = assorted_widths_font(layout);
        let options = LoadOptions::new(
            if layout.byte_msb {
                ByteOrder::MsbFirst
            } else {
                ByteOrder::LsbFirst
            },
            if layout.bit_msb {
                BitOrder::MsbFirst
            } else {
                BitOrder::LsbFirst
            },
            GlyphPad::from_bytes(layout.glyph_pad).unwrap(),
            ScanUnit::from_bytes(layout.scan_unit).unwrap(),
        );
        let font = Font::from_bytes(&builder.build().data, options).unwrap();
        let (offsets, blob) = builder.file_bitmaps();
        for (i, offset) in offsets.iter().enumerate() {
            let glyph = font.glyph_by_index(i as u16).unwrap();
            let start = *offset as usize;
            assert_eq!(glyph.data(), &blob[start..start + glyph.data().len()]);
        }
    }
}

#[test]
fn both_swapped_with_different_units() {
    // LSB bytes with MSB bits, swapped in 2 byte units
    let builder = assorted_widths_font(FileLayout {
        byte_msb: false,
        bit_msb: true,
        glyph_pad: 4,
        scan_unit: 2,
    });
    for glyph_pad in [GlyphPad::Two, GlyphPad::Four, GlyphPad::Eight] {
        let options = LoadOptions::new(
            ByteOrder::MsbFirst,
            BitOrder::LsbFirst,
            glyph_pad,
            ScanUnit::Four,
        );
        check_pixels(&builder, options);
    }
}
