//! The bitmaps table, and conversion of its contents to the requested layout.

pub mod transform;

use std::io::{Read, Seek};
use std::ops::Range;

use self::transform::{invert_bit_order, repad_glyph, row_stride, swap_four_bytes, swap_two_bytes};
use super::metrics::GlyphMetric;
use crate::cursor::{Cursor, MAX_PREALLOC};
use crate::format::{Format, GlyphPad, ScanUnit};
use crate::options::LoadOptions;
use crate::read::DecodeError;
use crate::toc::{TableDirectory, TableKind};

/// The bitmap data for every glyph, in a single buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct GlyphBitmaps {
    data: Vec<u8>,
    /// The byte range of each glyph in `data`.
    ranges: Vec<Range<usize>>,
    /// The unit bytes are grouped by when the byte and bit orders differ.
    scan_unit: ScanUnit,
}

impl GlyphBitmaps {
    /// Read the bitmaps table and convert it to the layout in `options`.
    ///
    /// `metrics` are the already decoded glyph metrics; they determine the
    /// number of glyphs and the size of each bitmap.
    pub(crate) fn read<R: Read + Seek>(
        cursor: &mut Cursor<R>,
        directory: &TableDirectory,
        metrics: &[GlyphMetric],
        options: &LoadOptions,
    ) -> Result<Self, DecodeError> {
        directory.seek_required(cursor, TableKind::Bitmaps)?;
        let format = Format::new(cursor.read_lsb32()?);
        if !format.matches(Format::DEFAULT) {
            return Err(DecodeError::FormatMismatch {
                table: TableKind::Bitmaps,
                format: format.to_u32(),
            });
        }
        let order = format.byte_order();
        let count: u32 = cursor.read(order)?;
        if count as usize != metrics.len() {
            return Err(DecodeError::CountMismatch {
                table: TableKind::Bitmaps,
                expected: metrics.len() as u32,
                found: count,
            });
        }
        let mut offsets = Vec::with_capacity((count as usize).min(MAX_PREALLOC));
        for _ in 0..count {
            offsets.push(cursor.read::<u32>(order)? as usize);
        }
        let mut sizes = [0u32; 4];
        for size in &mut sizes {
            *size = cursor.read(order)?;
        }
        let file_pad = format.glyph_pad();
        let size = sizes[file_pad.index()];
        if size > i32::MAX as u32 {
            return Err(DecodeError::InvalidCount(size));
        }
        let mut data = cursor.read_bytes(size as usize)?;
        log::debug!(
            "read {count} bitmaps ({size} bytes, {} byte padding)",
            file_pad.bytes()
        );

        let scan_unit = convert_bit_and_byte_order(&mut data, format, options);
        let (data, ranges) = if file_pad != options.glyph_pad {
            let declared = sizes[options.glyph_pad.index()] as usize;
            let (data, ranges) =
                repad(&data, &offsets, metrics, file_pad, options.glyph_pad, declared)?;
            if data.len() != declared {
                log::warn!(
                    "bitmap size table gives {declared} bytes at {} byte padding, metrics give {}",
                    options.glyph_pad.bytes(),
                    data.len()
                );
            }
            (data, ranges)
        } else {
            let ranges = glyph_ranges(data.len(), &offsets, metrics, file_pad)?;
            (data, ranges)
        };
        Ok(GlyphBitmaps {
            data,
            ranges,
            scan_unit,
        })
    }

    /// The bitmap of the glyph at `index`.
    pub(crate) fn get(&self, index: usize) -> Option<&[u8]> {
        self.ranges.get(index).and_then(|range| self.data.get(range.clone()))
    }

    /// The scan unit the bitmap bytes are grouped by.
    ///
    /// This is the requested unit, except when neither the file nor the
    /// requested layout has matching byte and bit orders: no bytes are
    /// swapped then, and they stay grouped by the file's unit.
    pub(crate) fn scan_unit(&self) -> ScanUnit {
        self.scan_unit
    }

    /// Size of the bitmap buffer, in bytes.
    pub(crate) fn data_len(&self) -> usize {
        self.data.len()
    }
}

/// Convert bit and byte order in place, as needed to go from `format` to the
/// layout requested in `options`.
///
/// Returns the scan unit the converted bytes are grouped by.
fn convert_bit_and_byte_order(data: &mut [u8], format: Format, options: &LoadOptions) -> ScanUnit {
    if format.bit_order() != options.bit_order {
        log::debug!("inverting bit order of bitmaps");
        invert_bit_order(data);
    }
    if format.orders_agree() != options.orders_agree() {
        // when the caller wants matching orders, undo the file's scan unit;
        // otherwise group bytes by the scan unit the caller asked for
        let unit = if options.orders_agree() {
            format.scan_unit()
        } else {
            options.scan_unit
        };
        match unit {
            ScanUnit::One => (),
            ScanUnit::Two => swap_two_bytes(data),
            ScanUnit::Four => swap_four_bytes(data),
            ScanUnit::Eight => log::warn!("8 byte scan units are not swapped"),
        }
        log::debug!("swapped bitmap bytes in {} byte units", unit.bytes());
    }
    if !format.orders_agree() && !options.orders_agree() {
        format.scan_unit()
    } else {
        options.scan_unit
    }
}

/// The byte range of each glyph's bitmap, checked against the buffer length.
fn glyph_ranges(
    data_len: usize,
    offsets: &[usize],
    metrics: &[GlyphMetric],
    pad: GlyphPad,
) -> Result<Vec<Range<usize>>, DecodeError> {
    offsets
        .iter()
        .zip(metrics)
        .map(|(offset, metric)| {
            let len = row_stride(metric.width(), pad.bytes()) * metric.height();
            let range = *offset..offset.saturating_add(len);
            if range.end > data_len {
                return Err(DecodeError::MalformedData("glyph bitmap outside bitmap data"));
            }
            Ok(range)
        })
        .collect()
}

/// Copy every glyph into a new buffer with rows padded to `to` bytes,
/// returning the buffer and the range of each glyph in it.
///
/// `declared` is the size the file gives for bitmaps padded to `to`; the
/// new buffer may not exceed it. Glyphs can share source bytes, so the
/// metrics alone do not bound the result.
fn repad(
    data: &[u8],
    offsets: &[usize],
    metrics: &[GlyphMetric],
    from: GlyphPad,
    to: GlyphPad,
    declared: usize,
) -> Result<(Vec<u8>, Vec<Range<usize>>), DecodeError> {
    let sources = glyph_ranges(data.len(), offsets, metrics, from)?;
    let total = metrics.iter().try_fold(0usize, |total, metric| {
        total.checked_add(row_stride(metric.width(), to.bytes()) * metric.height())
    });
    let total = match total {
        Some(total) if total <= i32::MAX as usize => total,
        _ => return Err(DecodeError::MalformedData("repadded bitmaps too large")),
    };
    if total > declared {
        return Err(DecodeError::MalformedData("repadded bitmaps exceed the declared size"));
    }
    let mut out = vec![0u8; total];
    let mut ranges = Vec::with_capacity(metrics.len());
    let mut pos = 0;
    for (source, metric) in sources.into_iter().zip(metrics) {
        let written = repad_glyph(
            &data[source],
            &mut out[pos..],
            from.bytes(),
            to.bytes(),
            metric.width(),
            metric.height(),
        );
        ranges.push(pos..pos + written);
        pos += written;
    }
    log::debug!(
        "repadded bitmaps from {} to {} bytes ({total} bytes)",
        from.bytes(),
        to.bytes()
    );
    Ok((out, ranges))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::BitOrder;
    use crate::scalar::ByteOrder;
    use crate::tables::metrics::read_metrics;
    use pcf_test_data::{assorted_widths_font, kind, FileLayout, PcfBuilder, TestGlyph};

    fn read_bitmaps(
        builder: &PcfBuilder,
        options: &LoadOptions,
    ) -> Result<GlyphBitmaps, DecodeError> {
        let file = builder.build();
        read_file(file.data, options)
    }

    fn read_file(data: Vec<u8>, options: &LoadOptions) -> Result<GlyphBitmaps, DecodeError> {
        let mut cursor = Cursor::new(std::io::Cursor::new(data));
        let directory = TableDirectory::read(&mut cursor)?;
        directory.seek_required(&mut cursor, TableKind::Metrics)?;
        let metrics = read_metrics(&mut cursor, TableKind::Metrics)?;
        GlyphBitmaps::read(&mut cursor, &directory, &metrics, options)
    }

    fn msb_options(pad: GlyphPad) -> LoadOptions {
        LoadOptions::new(ByteOrder::MsbFirst, BitOrder::MsbFirst, pad, ScanUnit::One)
    }

    #[test]
    fn native_layout_is_kept() {
        let builder = assorted_widths_font(FileLayout::default());
        let bitmaps = read_bitmaps(&builder, &msb_options(GlyphPad::Four)).unwrap();
        assert_eq!(bitmaps.ranges.len(), builder.glyphs().len());
        for (i, glyph) in builder.glyphs().iter().enumerate() {
            assert_eq!(bitmaps.get(i).unwrap(), glyph.padded_bits(4).as_slice());
        }
        let (_, blob) = builder.file_bitmaps();
        assert_eq!(bitmaps.data_len(), blob.len());
    }

    #[test]
    fn repadded_to_every_alignment() {
        let builder = assorted_widths_font(FileLayout::default());
        for pad in GlyphPad::ALL {
            let bitmaps = read_bitmaps(&builder, &msb_options(pad)).unwrap();
            for (i, glyph) in builder.glyphs().iter().enumerate() {
                assert_eq!(
                    bitmaps.get(i).unwrap(),
                    glyph.padded_bits(pad.bytes()).as_slice(),
                    "glyph {i} at pad {}",
                    pad.bytes()
                );
            }
        }
    }

    #[test]
    fn lsb_bits_are_inverted() {
        let builder = assorted_widths_font(FileLayout {
            bit_msb: false,
            byte_msb: false,
            ..Default::default()
        });
        let bitmaps = read_bitmaps(&builder, &msb_options(GlyphPad::One)).unwrap();
        for (i, glyph) in builder.glyphs().iter().enumerate() {
            assert_eq!(bitmaps.get(i).unwrap(), glyph.bits.as_slice());
        }
    }

    #[test]
    fn count_must_match_metrics() {
        let builder = assorted_widths_font(FileLayout::default());
        let mut file = builder.build();
        let count_pos = file.offset_of(kind::BITMAPS).unwrap() + 4;
        file.write_u32_at(count_pos, 3);
        assert_eq!(
            read_file(file.data, &LoadOptions::default()),
            Err(DecodeError::CountMismatch {
                table: TableKind::Bitmaps,
                expected: builder.glyphs().len() as u32,
                found: 3,
            })
        );
    }

    #[test]
    fn glyph_outside_data() {
        let builder = assorted_widths_font(FileLayout::default());
        let mut file = builder.build();
        // the offset of the last glyph
        let n_glyphs = builder.glyphs().len();
        let offset_pos = file.offset_of(kind::BITMAPS).unwrap() + 8 + 4 * (n_glyphs - 1);
        file.write_u32_at(offset_pos, 0x10000);
        for options in [msb_options(GlyphPad::Four), msb_options(GlyphPad::One)] {
            assert_eq!(
                read_file(file.data.clone(), &options),
                Err(DecodeError::MalformedData("glyph bitmap outside bitmap data"))
            );
        }
    }

    #[test]
    fn shared_offsets_cannot_outgrow_declared_size() {
        // every glyph reads the same source bytes, so the file is small
        // while the repadded buffer would grow with the glyph count
        let builder = (0..200).fold(
            PcfBuilder::new(FileLayout {
                glyph_pad: 1,
                ..Default::default()
            }),
            |builder, i| builder.glyph(TestGlyph::pattern(8, 64, 64, i)),
        );
        let mut file = builder.build();
        let bitmaps = file.offset_of(kind::BITMAPS).unwrap();
        let n_glyphs = builder.glyphs().len();
        for i in 0..n_glyphs {
            file.write_u32_at(bitmaps + 8 + 4 * i, 0);
        }
        let sizes = bitmaps + 8 + 4 * n_glyphs;
        // one glyph's worth of data at both paddings
        file.write_u32_at(sizes, 64);
        file.write_u32_at(sizes + 4 * GlyphPad::Eight.index(), 64 * 8);
        assert_eq!(
            read_file(file.data, &msb_options(GlyphPad::Eight)),
            Err(DecodeError::MalformedData("repadded bitmaps exceed the declared size"))
        );
    }

    #[test]
    fn understated_size_for_requested_padding() {
        let builder = assorted_widths_font(FileLayout::default());
        let mut file = builder.build();
        let n_glyphs = builder.glyphs().len();
        let size_pos = file.offset_of(kind::BITMAPS).unwrap() + 8 + 4 * n_glyphs;
        file.write_u32_at(size_pos + 4 * GlyphPad::Eight.index(), 1);
        assert!(read_file(file.data.clone(), &msb_options(GlyphPad::Eight)).is_err());
        // other paddings are unaffected
        assert!(read_file(file.data, &msb_options(GlyphPad::Two)).is_ok());
    }

    #[test]
    fn swap_units() {
        // MSB bits in LSB bytes: the file swapped every 4 byte unit
        let mut data = vec![1, 2, 3, 4, 5, 6, 7, 8];
        let format = Format::new(0b10_1_0_10);
        convert_bit_and_byte_order(&mut data, format, &msb_options(GlyphPad::Four));
        assert_eq!(data, vec![4, 3, 2, 1, 8, 7, 6, 5]);

        // matching orders in the file, a 2 byte scan unit requested
        let mut data = vec![1, 2, 3, 4];
        let options = msb_options(GlyphPad::Four)
            .with_byte_order(ByteOrder::LsbFirst)
            .with_scan_unit(ScanUnit::Two);
        convert_bit_and_byte_order(&mut data, Format::new(0b00_1_1_10), &options);
        assert_eq!(data, vec![2, 1, 4, 3]);

        // no swap when both sides agree
        let mut data = vec![1, 2, 3, 4];
        let format = Format::new(0b10_1_1_10);
        convert_bit_and_byte_order(&mut data, format, &msb_options(GlyphPad::Four));
        assert_eq!(data, vec![1, 2, 3, 4]);

        // nor when neither side does; the bytes keep the file's grouping
        let mut data = vec![0x80, 0x40, 0x20, 0x10];
        let options = msb_options(GlyphPad::Four)
            .with_bit_order(BitOrder::LsbFirst)
            .with_scan_unit(ScanUnit::Four);
        let unit = convert_bit_and_byte_order(&mut data, Format::new(0b01_1_0_10), &options);
        assert_eq!(data, vec![0x01, 0x02, 0x04, 0x08]);
        assert_eq!(unit, ScanUnit::Two);
    }
}
