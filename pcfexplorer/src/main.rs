//! Print the contents of PCF bitmap fonts.
//!
//! By default this lists the table directory and the font-wide information.

use std::{io::Write, path::PathBuf};

use clap::Parser;
use read_pcf::{BitOrder, ByteOrder, Font, GlyphPad, LoadOptions, ScanUnit, TableDirectory};

mod print;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The PCF file to read.
    input: PathBuf,

    /// List the tables in the file.
    #[arg(short, long)]
    list: bool,

    /// Print the accelerators and encoding range.
    #[arg(short, long)]
    info: bool,

    /// Print the font properties.
    #[arg(short, long)]
    properties: bool,

    /// Dump the glyph for a character, given as a literal character,
    /// a decimal number or a hex number with a `0x` prefix.
    #[arg(short, long = "glyph", value_parser = parse_code)]
    glyphs: Vec<u16>,

    /// Dump every encoded glyph.
    #[arg(long)]
    all_glyphs: bool,

    /// Print the directory and font info as JSON.
    #[arg(long)]
    json: bool,

    /// Store bitmap bytes most significant first.
    #[arg(long)]
    msb_bytes: bool,

    /// Store the leftmost pixel in the most significant bit.
    #[arg(long)]
    msb_bits: bool,

    /// Pad bitmap rows to this many bytes.
    #[arg(long, default_value = "4", value_parser = parse_pad)]
    pad: GlyphPad,

    /// Swap bytes in units of this many bytes.
    #[arg(long, default_value = "1", value_parser = parse_scan_unit)]
    scan_unit: ScanUnit,
}

impl Args {
    fn load_options(&self) -> LoadOptions {
        LoadOptions::default()
            .with_byte_order(if self.msb_bytes {
                ByteOrder::MsbFirst
            } else {
                ByteOrder::LsbFirst
            })
            .with_bit_order(if self.msb_bits {
                BitOrder::MsbFirst
            } else {
                BitOrder::LsbFirst
            })
            .with_glyph_pad(self.pad)
            .with_scan_unit(self.scan_unit)
    }

    fn wants_glyphs(&self) -> bool {
        self.all_glyphs || !self.glyphs.is_empty()
    }
}

fn main() -> Result<(), Error> {
    env_logger::init();
    let args = Args::parse();
    let bytes = std::fs::read(&args.input)
        .map_err(|e| Error(format!("failed to read '{}': {e}", args.input.display())))?;
    let directory = TableDirectory::load(std::io::Cursor::new(&bytes)).map_err(Error::new)?;
    let font = Font::from_bytes(&bytes, args.load_options()).map_err(Error::new)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.json {
        let json = serde_json::json!({
            "tables": directory.records(),
            "info": font.info(),
        });
        let text = serde_json::to_string_pretty(&json).map_err(Error::new)?;
        writeln!(out, "{text}").map_err(Error::new)?;
        return Ok(());
    }

    let nothing_asked = !(args.list || args.info || args.properties || args.wants_glyphs());
    if args.list || nothing_asked {
        print::list_tables(&mut out, &directory).map_err(Error::new)?;
    }
    if args.info || nothing_asked {
        print::print_info(&mut out, &font).map_err(Error::new)?;
    }
    if args.properties {
        print::print_properties(&mut out, font.properties()).map_err(Error::new)?;
    }
    if args.all_glyphs {
        for (code, glyph) in font.mappings() {
            print::dump_glyph(&mut out, &font, code, &glyph).map_err(Error::new)?;
        }
    }
    for &code in &args.glyphs {
        match font.glyph(code) {
            Some(glyph) => print::dump_glyph(&mut out, &font, code, &glyph).map_err(Error::new)?,
            None => log::warn!("no glyph for character 0x{code:04X}"),
        }
    }
    Ok(())
}

fn parse_code(raw: &str) -> Result<u16, Error> {
    let parsed = if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16).ok()
    } else if raw.len() > 1 && raw.bytes().all(|b| b.is_ascii_digit()) {
        raw.parse().ok()
    } else {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => u16::try_from(c as u32).ok(),
            _ => None,
        }
    };
    parsed.ok_or_else(|| Error(format!("invalid character '{}'", raw.escape_default())))
}

fn parse_pad(raw: &str) -> Result<GlyphPad, Error> {
    raw.parse::<usize>()
        .ok()
        .and_then(GlyphPad::from_bytes)
        .ok_or_else(|| Error(format!("glyph padding must be 1, 2, 4 or 8, not '{raw}'")))
}

fn parse_scan_unit(raw: &str) -> Result<ScanUnit, Error> {
    raw.parse::<usize>()
        .ok()
        .and_then(ScanUnit::from_bytes)
        .ok_or_else(|| Error(format!("scan unit must be 1, 2, 4 or 8, not '{raw}'")))
}

#[derive(Debug, Clone)]
struct Error(String);

impl Error {
    fn new(t: impl std::fmt::Display) -> Self {
        Self(t.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_codes() {
        assert_eq!(parse_code("A").unwrap(), 0x41);
        assert_eq!(parse_code("7").unwrap(), 0x37);
        assert_eq!(parse_code("65").unwrap(), 65);
        assert_eq!(parse_code("0x2603").unwrap(), 0x2603);
        assert_eq!(parse_code("é").unwrap(), 0xe9);
        assert!(parse_code("0x10000").is_err());
        assert!(parse_code("\u{1F600}").is_err());
        assert!(parse_code("AB").is_err());
    }

    #[test]
    fn layout_flags() {
        let args = Args::parse_from(["pcfexplorer", "font.pcf", "--msb-bits", "--pad", "1"]);
        assert_eq!(
            args.load_options(),
            LoadOptions::new(
                ByteOrder::LsbFirst,
                BitOrder::MsbFirst,
                GlyphPad::One,
                ScanUnit::One
            )
        );
        assert!(Args::try_parse_from(["pcfexplorer", "font.pcf", "--pad", "3"]).is_err());
    }
}
