//! Assembling complete PCF files for tests.

use std::collections::BTreeMap;

use crate::{kind, PcfBuffer, PCF_FILE_VERSION};

const COMPRESSED_METRICS: u32 = 0x100;
const ACCEL_W_INKBOUNDS: u32 = 0x100;

/// How bitmap data (and multi-byte values) are laid out in a generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileLayout {
    pub byte_msb: bool,
    pub bit_msb: bool,
    /// Row padding in bytes: 1, 2, 4 or 8.
    pub glyph_pad: usize,
    /// Scan unit in bytes: 1, 2 or 4.
    pub scan_unit: usize,
}

impl Default for FileLayout {
    /// The layout written by `bdftopcf` with no options.
    fn default() -> Self {
        FileLayout {
            byte_msb: true,
            bit_msb: true,
            glyph_pad: 4,
            scan_unit: 1,
        }
    }
}

impl FileLayout {
    pub fn format_bits(&self) -> u32 {
        (size_index(self.glyph_pad) as u32)
            | (self.byte_msb as u32) << 2
            | (self.bit_msb as u32) << 3
            | (size_index(self.scan_unit) as u32) << 4
    }
}

fn size_index(bytes: usize) -> usize {
    match bytes {
        1 => 0,
        2 => 1,
        4 => 2,
        8 => 3,
        other => panic!("unsupported size {other}"),
    }
}

/// Glyph metrics, in the order they are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestMetric {
    pub left_side_bearing: i16,
    pub right_side_bearing: i16,
    pub character_width: i16,
    pub ascent: i16,
    pub descent: i16,
    pub attributes: u16,
}

impl TestMetric {
    pub fn new(lsb: i16, rsb: i16, character_width: i16, ascent: i16, descent: i16) -> Self {
        TestMetric {
            left_side_bearing: lsb,
            right_side_bearing: rsb,
            character_width,
            ascent,
            descent,
            attributes: 0,
        }
    }

    pub fn width(&self) -> usize {
        (self.right_side_bearing as i32 - self.left_side_bearing as i32).max(0) as usize
    }

    pub fn height(&self) -> usize {
        (self.ascent as i32 + self.descent as i32).max(0) as usize
    }

    fn write(&self, buf: PcfBuffer, compressed: bool) -> PcfBuffer {
        if compressed {
            let biased = |v: i16| {
                assert!((-128..=127).contains(&v), "{v} does not fit compressed metrics");
                (v + 0x80) as u8
            };
            buf.push_u8(biased(self.left_side_bearing))
                .push_u8(biased(self.right_side_bearing))
                .push_u8(biased(self.character_width))
                .push_u8(biased(self.ascent))
                .push_u8(biased(self.descent))
        } else {
            buf.push_i16(self.left_side_bearing)
                .push_i16(self.right_side_bearing)
                .push_i16(self.character_width)
                .push_i16(self.ascent)
                .push_i16(self.descent)
                .push_u16(self.attributes)
        }
    }
}

/// A glyph: metrics plus a bitmap with MSB-first bits and rows padded to
/// a single byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestGlyph {
    pub metric: TestMetric,
    pub bits: Vec<u8>,
}

impl TestGlyph {
    /// Build a glyph from rows of `#` (lit) and any other character (unlit).
    ///
    /// The glyph has no side bearings and `ascent` rows above the baseline.
    pub fn from_ascii(ascent: i16, rows: &[&str]) -> Self {
        let width = rows.first().map(|row| row.len()).unwrap_or_default();
        let stride = width.div_ceil(8);
        let mut bits = vec![0u8; stride * rows.len()];
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), width, "ragged glyph rows");
            for (x, c) in row.chars().enumerate() {
                if c == '#' {
                    bits[y * stride + x / 8] |= 0x80 >> (x % 8);
                }
            }
        }
        let height = rows.len() as i16;
        TestGlyph {
            metric: TestMetric::new(0, width as i16, width as i16, ascent, height - ascent),
            bits,
        }
    }

    /// A glyph whose lit pixels follow a deterministic pattern.
    pub fn pattern(width: usize, height: usize, ascent: i16, seed: u32) -> Self {
        let stride = width.div_ceil(8);
        let mut bits = vec![0u8; stride * height];
        for y in 0..height {
            for x in 0..width {
                if (x as u32 * 7 + y as u32 * 3 + seed) % 5 < 2 {
                    bits[y * stride + x / 8] |= 0x80 >> (x % 8);
                }
            }
        }
        TestGlyph {
            metric: TestMetric::new(
                0,
                width as i16,
                width as i16 + 1,
                ascent,
                height as i16 - ascent,
            ),
            bits,
        }
    }

    /// An empty glyph with the given metrics.
    pub fn blank(metric: TestMetric) -> Self {
        TestGlyph {
            metric,
            bits: vec![0; metric.width().div_ceil(8) * metric.height()],
        }
    }

    /// The bitmap rows padded to `pad` bytes.
    pub fn padded_bits(&self, pad: usize) -> Vec<u8> {
        let width = self.metric.width();
        let src_stride = width.div_ceil(8);
        let dst_stride = width.div_ceil(pad * 8) * pad;
        let mut out = vec![0u8; dst_stride * self.metric.height()];
        for y in 0..self.metric.height() {
            out[y * dst_stride..y * dst_stride + src_stride]
                .copy_from_slice(&self.bits[y * src_stride..(y + 1) * src_stride]);
        }
        out
    }

    /// `true` if the pixel at (x, y) is lit.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        let stride = self.metric.width().div_ceil(8);
        self.bits[y * stride + x / 8] & (0x80 >> (x % 8)) != 0
    }
}

/// A property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestProperty {
    Str(String),
    Int(i32),
    /// A string property pointing at an arbitrary offset in the string pool.
    StringOffset(u32),
}

/// Contents of an accelerator table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestAccelerators {
    pub no_overlap: bool,
    pub constant_metrics: bool,
    pub terminal_font: bool,
    pub constant_width: bool,
    pub ink_inside: bool,
    pub ink_metrics: bool,
    pub draw_direction: u8,
    pub font_ascent: i32,
    pub font_descent: i32,
    pub max_overlap: i32,
    pub min_bounds: TestMetric,
    pub max_bounds: TestMetric,
    pub ink_bounds: Option<(TestMetric, TestMetric)>,
}

impl TestAccelerators {
    /// Accelerators with bounds computed from the given glyphs.
    pub fn from_glyphs(glyphs: &[TestGlyph], font_ascent: i32, font_descent: i32) -> Self {
        let mut min_bounds = glyphs.first().map(|g| g.metric).unwrap_or_default();
        let mut max_bounds = min_bounds;
        for metric in glyphs.iter().map(|g| &g.metric) {
            min_bounds.left_side_bearing =
                min_bounds.left_side_bearing.min(metric.left_side_bearing);
            min_bounds.right_side_bearing =
                min_bounds.right_side_bearing.min(metric.right_side_bearing);
            min_bounds.character_width = min_bounds.character_width.min(metric.character_width);
            min_bounds.ascent = min_bounds.ascent.min(metric.ascent);
            min_bounds.descent = min_bounds.descent.min(metric.descent);
            max_bounds.left_side_bearing =
                max_bounds.left_side_bearing.max(metric.left_side_bearing);
            max_bounds.right_side_bearing =
                max_bounds.right_side_bearing.max(metric.right_side_bearing);
            max_bounds.character_width = max_bounds.character_width.max(metric.character_width);
            max_bounds.ascent = max_bounds.ascent.max(metric.ascent);
            max_bounds.descent = max_bounds.descent.max(metric.descent);
        }
        let constant_width = min_bounds.character_width == max_bounds.character_width;
        TestAccelerators {
            constant_width,
            terminal_font: constant_width && min_bounds == max_bounds,
            constant_metrics: min_bounds == max_bounds,
            font_ascent,
            font_descent,
            min_bounds,
            max_bounds,
            ..Default::default()
        }
    }

    fn write(&self, layout: &FileLayout) -> PcfBuffer {
        let variant = if self.ink_bounds.is_some() {
            ACCEL_W_INKBOUNDS
        } else {
            0
        };
        let mut buf = PcfBuffer::new(layout.byte_msb)
            .push_lsb32(variant | layout.format_bits())
            .push_u8(self.no_overlap as u8)
            .push_u8(self.constant_metrics as u8)
            .push_u8(self.terminal_font as u8)
            .push_u8(self.constant_width as u8)
            .push_u8(self.ink_inside as u8)
            .push_u8(self.ink_metrics as u8)
            .push_u8(self.draw_direction)
            .push_u8(0)
            .push_i32(self.font_ascent)
            .push_i32(self.font_descent)
            .push_i32(self.max_overlap);
        buf = self.min_bounds.write(buf, false);
        buf = self.max_bounds.write(buf, false);
        if let Some((ink_min, ink_max)) = &self.ink_bounds {
            buf = ink_min.write(buf, false);
            buf = ink_max.write(buf, false);
        }
        buf
    }
}

/// Builder for a complete PCF file.
#[derive(Debug, Clone)]
pub struct PcfBuilder {
    layout: FileLayout,
    compressed_metrics: bool,
    properties: Vec<(String, TestProperty)>,
    accelerators: Option<TestAccelerators>,
    bdf_accelerators: Option<TestAccelerators>,
    glyphs: Vec<TestGlyph>,
    ink_metrics: Option<Vec<TestMetric>>,
    first_col: u16,
    last_col: u16,
    first_row: u16,
    last_row: u16,
    default_char: u16,
    mappings: BTreeMap<u16, u16>,
    raw_encoding: Option<Vec<u16>>,
    table_order: Vec<u32>,
}

impl PcfBuilder {
    pub fn new(layout: FileLayout) -> Self {
        PcfBuilder {
            layout,
            compressed_metrics: false,
            properties: Vec::new(),
            accelerators: None,
            bdf_accelerators: None,
            glyphs: Vec::new(),
            ink_metrics: None,
            first_col: 0,
            last_col: 0,
            first_row: 0,
            last_row: 0,
            default_char: 0xffff,
            mappings: BTreeMap::new(),
            raw_encoding: None,
            table_order: vec![
                kind::PROPERTIES,
                kind::ACCELERATORS,
                kind::METRICS,
                kind::BITMAPS,
                kind::INK_METRICS,
                kind::BDF_ENCODINGS,
                kind::BDF_ACCELERATORS,
            ],
        }
    }

    pub fn layout(&self) -> FileLayout {
        self.layout
    }

    pub fn with_layout(mut self, layout: FileLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn compressed_metrics(mut self, compressed: bool) -> Self {
        self.compressed_metrics = compressed;
        self
    }

    pub fn property(mut self, name: &str, value: TestProperty) -> Self {
        self.properties.push((name.to_string(), value));
        self
    }

    pub fn glyph(mut self, glyph: TestGlyph) -> Self {
        self.glyphs.push(glyph);
        self
    }

    pub fn glyphs(&self) -> &[TestGlyph] {
        &self.glyphs
    }

    /// Write an old-style accelerator table with these contents.
    pub fn accelerators(mut self, accelerators: TestAccelerators) -> Self {
        self.accelerators = Some(accelerators);
        self
    }

    /// Write a BDF accelerator table with these contents.
    pub fn bdf_accelerators(mut self, accelerators: TestAccelerators) -> Self {
        self.bdf_accelerators = Some(accelerators);
        self
    }

    pub fn ink_metrics(mut self, metrics: Vec<TestMetric>) -> Self {
        self.ink_metrics = Some(metrics);
        self
    }

    pub fn encoding_range(
        mut self,
        first_col: u16,
        last_col: u16,
        first_row: u16,
        last_row: u16,
    ) -> Self {
        self.first_col = first_col;
        self.last_col = last_col;
        self.first_row = first_row;
        self.last_row = last_row;
        self
    }

    pub fn map_code(mut self, code: u16, glyph: u16) -> Self {
        self.mappings.insert(code, glyph);
        self
    }

    pub fn default_char(mut self, code: u16) -> Self {
        self.default_char = code;
        self
    }

    /// Write these encoding entries verbatim instead of deriving them from
    /// the code mappings.
    pub fn raw_encoding(mut self, entries: Vec<u16>) -> Self {
        self.raw_encoding = Some(entries);
        self
    }

    /// Set the order in which tables are laid out in the file.
    ///
    /// Tables missing from `order` are not written.
    pub fn table_order(mut self, order: &[u32]) -> Self {
        self.table_order = order.to_vec();
        self
    }

    /// The length of the property string pool.
    pub fn string_pool_len(&self) -> usize {
        self.string_pool().0.len()
    }

    /// The encoding entries, in row-major order.
    fn encoding_entries(&self) -> Vec<u16> {
        if let Some(raw) = &self.raw_encoding {
            return raw.clone();
        }
        let mut entries = Vec::new();
        for row in self.first_row..=self.last_row {
            for col in self.first_col..=self.last_col {
                let code = (row << 8) | col;
                entries.push(self.mappings.get(&code).copied().unwrap_or(0xffff));
            }
        }
        entries
    }

    pub fn build(&self) -> PcfFile {
        let mut tables: Vec<(u32, u32, Vec<u8>)> = Vec::new();
        for &table in &self.table_order {
            let data = match table {
                kind::PROPERTIES => self.properties_table(),
                kind::ACCELERATORS => {
                    // fall back to computed accelerators if the font has no others
                    let accel = match (&self.accelerators, &self.bdf_accelerators) {
                        (Some(accel), _) => *accel,
                        (None, None) => TestAccelerators::from_glyphs(&self.glyphs, 0, 0),
                        (None, Some(_)) => continue,
                    };
                    accel.write(&self.layout).into_inner()
                }
                kind::METRICS => self.metrics_table(self.glyphs.iter().map(|g| g.metric)),
                kind::BITMAPS => self.bitmaps_table(),
                kind::INK_METRICS => match &self.ink_metrics {
                    Some(ink) => self.metrics_table(ink.iter().copied()),
                    None => continue,
                },
                kind::BDF_ENCODINGS => self.encodings_table(),
                kind::BDF_ACCELERATORS => match &self.bdf_accelerators {
                    Some(accel) => accel.write(&self.layout).into_inner(),
                    None => continue,
                },
                _ => continue,
            };
            // every table starts with its little-endian format word
            let format = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
            tables.push((table, format, data));
        }

        let header_len = 8 + 16 * tables.len();
        let mut offset = header_len;
        let mut header = PcfBuffer::new(false)
            .push_lsb32(PCF_FILE_VERSION)
            .push_lsb32(tables.len() as u32);
        let mut entries = Vec::new();
        for (table, format, data) in &tables {
            header = header
                .push_lsb32(*table)
                .push_lsb32(*format)
                .push_lsb32(data.len() as u32)
                .push_lsb32(offset as u32);
            entries.push((*table, offset as u32));
            offset += data.len().next_multiple_of(4);
        }
        let mut body = header;
        for (_, _, data) in &tables {
            body = body.extend(data).pad_to(4);
        }
        PcfFile {
            data: body.into_inner(),
            toc_len: header_len,
            tables: entries,
            msb_first: self.layout.byte_msb,
        }
    }

    fn string_pool(&self) -> (Vec<u8>, Vec<(u32, bool, u32)>) {
        let mut pool = Vec::new();
        let mut records = Vec::new();
        for (name, value) in &self.properties {
            let name_offset = pool.len() as u32;
            pool.extend(name.as_bytes());
            pool.push(0);
            let (is_string, value) = match value {
                TestProperty::Str(s) => {
                    let offset = pool.len() as u32;
                    pool.extend(s.as_bytes());
                    pool.push(0);
                    (true, offset)
                }
                TestProperty::Int(v) => (false, *v as u32),
                TestProperty::StringOffset(offset) => (true, *offset),
            };
            records.push((name_offset, is_string, value));
        }
        (pool, records)
    }

    fn properties_table(&self) -> Vec<u8> {
        let (pool, records) = self.string_pool();
        let mut buf = PcfBuffer::new(self.layout.byte_msb)
            .push_lsb32(self.layout.format_bits())
            .push_u32(records.len() as u32);
        for (name, is_string, value) in &records {
            buf = buf.push_u32(*name).push_u8(*is_string as u8).push_u32(*value);
        }
        for _ in 0..(4 - records.len() % 4) % 4 {
            buf = buf.push_u8(0);
        }
        buf.push_u32(pool.len() as u32).extend(&pool).into_inner()
    }

    fn metrics_table(&self, metrics: impl ExactSizeIterator<Item = TestMetric>) -> Vec<u8> {
        let variant = if self.compressed_metrics {
            COMPRESSED_METRICS
        } else {
            0
        };
        let mut buf = PcfBuffer::new(self.layout.byte_msb)
            .push_lsb32(variant | self.layout.format_bits());
        buf = if self.compressed_metrics {
            buf.push_u16(metrics.len() as u16)
        } else {
            buf.push_u32(metrics.len() as u32)
        };
        for metric in metrics {
            buf = metric.write(buf, self.compressed_metrics);
        }
        buf.into_inner()
    }

    /// The bitmap blob as it should appear in the file.
    pub fn file_bitmaps(&self) -> (Vec<u32>, Vec<u8>) {
        let mut offsets = Vec::new();
        let mut blob = Vec::new();
        for glyph in &self.glyphs {
            offsets.push(blob.len() as u32);
            blob.extend(glyph.padded_bits(self.layout.glyph_pad));
        }
        if !self.layout.bit_msb {
            blob.iter_mut().for_each(|b| *b = b.reverse_bits());
        }
        if self.layout.byte_msb != self.layout.bit_msb {
            let unit = self.layout.scan_unit;
            if unit > 1 {
                blob.chunks_exact_mut(unit).for_each(|chunk| chunk.reverse());
            }
        }
        (offsets, blob)
    }

    fn bitmaps_table(&self) -> Vec<u8> {
        let (offsets, blob) = self.file_bitmaps();
        let mut buf = PcfBuffer::new(self.layout.byte_msb)
            .push_lsb32(self.layout.format_bits())
            .push_u32(offsets.len() as u32);
        for offset in offsets {
            buf = buf.push_u32(offset);
        }
        for pad in [1, 2, 4, 8] {
            let size: usize = self.glyphs.iter().map(|g| g.padded_bits(pad).len()).sum();
            buf = buf.push_u32(size as u32);
        }
        buf.extend(&blob).into_inner()
    }

    fn encodings_table(&self) -> Vec<u8> {
        let mut buf = PcfBuffer::new(self.layout.byte_msb)
            .push_lsb32(self.layout.format_bits())
            .push_u16(self.first_col)
            .push_u16(self.last_col)
            .push_u16(self.first_row)
            .push_u16(self.last_row)
            .push_u16(self.default_char);
        for entry in self.encoding_entries() {
            buf = buf.push_u16(entry);
        }
        buf.into_inner()
    }
}

/// A generated font file.
#[derive(Debug, Clone)]
pub struct PcfFile {
    pub data: Vec<u8>,
    /// Length of the file header and table directory.
    pub toc_len: usize,
    tables: Vec<(u32, u32)>,
    msb_first: bool,
}

impl PcfFile {
    /// The file offset of the first table of the given type.
    pub fn offset_of(&self, kind: u32) -> Option<usize> {
        self.tables
            .iter()
            .find(|(table, _)| *table == kind)
            .map(|(_, offset)| *offset as usize)
    }

    /// Overwrite a `u32` at `pos`, in the file's byte order.
    pub fn write_u32_at(&mut self, pos: usize, value: u32) {
        let bytes = if self.msb_first {
            value.to_be_bytes()
        } else {
            value.to_le_bytes()
        };
        self.data[pos..pos + 4].copy_from_slice(&bytes);
    }

    pub fn truncated(&self, len: usize) -> Vec<u8> {
        self.data[..len.min(self.data.len())].to_vec()
    }
}
