//! Plain text output.

use std::io::{self, Write};

use read_pcf::{Font, Glyph, GlyphMetric, Properties, TableDirectory};

pub fn list_tables(out: &mut dyn Write, directory: &TableDirectory) -> io::Result<()> {
    writeln!(out, "Kind              Format      Offset  Size")?;
    writeln!(out, "--------------------------------------------")?;
    for record in directory.records() {
        writeln!(
            out,
            "{:<17} 0x{:08X}  0x{:06X} {:8}",
            record.kind.to_string(),
            record.format.to_u32(),
            record.offset,
            record.size
        )?;
    }
    Ok(())
}

pub fn print_info(out: &mut dyn Write, font: &Font) -> io::Result<()> {
    let info = font.info();
    let accel = &info.accelerators;
    let range = &info.encoding_range;
    writeln!(out, "glyphs:           {}", font.num_glyphs())?;
    writeln!(out, "ascent:           {}", accel.font_ascent)?;
    writeln!(out, "descent:          {}", accel.font_descent)?;
    writeln!(out, "max overlap:      {}", accel.max_overlap)?;
    writeln!(out, "max advance:      {}", font.max_advance())?;
    writeln!(out, "draw direction:   {:?}", accel.draw_direction)?;
    let flags = [
        ("no_overlap", accel.no_overlap),
        ("constant_metrics", accel.constant_metrics),
        ("terminal_font", accel.terminal_font),
        ("constant_width", accel.constant_width),
        ("ink_inside", accel.ink_inside),
        ("ink_metrics", accel.ink_metrics),
    ];
    let set: Vec<_> = flags.iter().filter(|(_, on)| *on).map(|(name, _)| *name).collect();
    writeln!(out, "flags:            {}", set.join(" "))?;
    writeln!(
        out,
        "columns:          0x{:02X}..=0x{:02X}",
        range.first_col, range.last_col
    )?;
    writeln!(
        out,
        "rows:             0x{:02X}..=0x{:02X}",
        range.first_row, range.last_row
    )?;
    match info.default_char {
        Some(code) => writeln!(out, "default char:     0x{code:04X}")?,
        None => writeln!(out, "default char:     none")?,
    }
    writeln!(out, "all exist:        {}", info.all_exist)?;
    writeln!(out, "ink metrics:      {}", font.has_ink_metrics())?;
    Ok(())
}

pub fn print_properties(out: &mut dyn Write, properties: &Properties) -> io::Result<()> {
    let width = properties
        .iter()
        .map(|prop| prop.name.len())
        .max()
        .unwrap_or_default();
    for prop in properties.iter() {
        writeln!(out, "{:width$}  {}", prop.name, prop.value)?;
    }
    Ok(())
}

/// Print a glyph's metrics followed by its bitmap, one text row per pixel row.
pub fn dump_glyph(out: &mut dyn Write, font: &Font, code: u16, glyph: &Glyph) -> io::Result<()> {
    writeln!(out, "Character 0x{code:04X}")?;
    writeln!(out, "Number of chars in font: {}", font.num_glyphs())?;
    writeln!(out, "Index of char in font: {}", glyph.index())?;
    writeln!(out, "Metrics:")?;
    print_metric(out, glyph.metrics())?;
    if font.has_ink_metrics() {
        writeln!(out, "Ink metrics:")?;
        print_metric(out, glyph.ink_metrics())?;
    }
    writeln!(out, "Bitmap:")?;
    for y in 0..glyph.height() {
        let row: String = (0..glyph.width())
            .map(|x| if glyph.pixel(x, y) { '#' } else { '.' })
            .collect();
        writeln!(out, "  {row}")?;
    }
    writeln!(out)
}

fn print_metric(out: &mut dyn Write, metric: &GlyphMetric) -> io::Result<()> {
    writeln!(out, "  left side bearing:  {}", metric.left_side_bearing)?;
    writeln!(out, "  right side bearing: {}", metric.right_side_bearing)?;
    writeln!(out, "  width:              {}", metric.character_width)?;
    writeln!(out, "  ascent:             {}", metric.ascent)?;
    writeln!(out, "  descent:            {}", metric.descent)?;
    writeln!(out, "  attributes:         0x{:04X}", metric.attributes)
}
