#![no_main]
use std::{error::Error, io::Cursor};

use libfuzzer_sys::fuzz_target;
use read_pcf::{Font, FontInfo, LoadOptions, TableDirectory};

fn do_load_things(data: &[u8]) -> Result<(), Box<dyn Error>> {
    let directory = TableDirectory::load(Cursor::new(data))?;
    let _ = directory.records().len();
    let _ = FontInfo::load(Cursor::new(data));

    let font = Font::from_bytes(data, LoadOptions::default())?;
    for (_code, glyph) in font.mappings() {
        let _ = glyph.rows().count();
        let _ = glyph.ink_metrics();
    }
    let _ = font.default_glyph();
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let _ = do_load_things(data);
});
