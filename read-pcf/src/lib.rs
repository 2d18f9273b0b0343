//! Reading PCF bitmap fonts
//!
//! This crate decodes fonts in the Portable Compiled Format, the compiled
//! bitmap font format of the X Window System, into an in-memory [`Font`]
//! that supports glyph lookup by character code and direct access to glyph
//! bitmaps.
//!
//! A PCF file is a directory of tables, each with its own byte order and
//! bitmap layout. When loading a font the caller chooses the layout they want
//! the bitmaps in (bit order, byte order, row padding and scan unit, see
//! [`LoadOptions`]) and the bitmaps are converted as they are read.
//!
//! Decoding is strict: any inconsistency in the file is reported as a
//! [`DecodeError`] and no partially decoded font is returned.
//!
//! # Example
//!
//! ```no_run
//! # let path_to_my_font_file = std::path::Path::new("");
//! use read_pcf::{Font, LoadOptions};
//! let file = std::fs::File::open(path_to_my_font_file).unwrap();
//! let font = Font::load(std::io::BufReader::new(file), LoadOptions::default())
//!     .expect("failed to read font");
//! if let Some(glyph) = font.glyph_or_default(u16::from(b'A')) {
//!     for y in 0..glyph.height() {
//!         let row: String = (0..glyph.width())
//!             .map(|x| if glyph.pixel(x, y) { '#' } else { '.' })
//!             .collect();
//!         println!("{row}");
//!     }
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod cursor;
mod font;
mod format;
mod glyph;
mod info;
mod options;
mod read;
mod scalar;
pub mod tables;
mod toc;

#[cfg(test)]
mod tests;

pub use font::{load, Font};
pub use format::{BitOrder, Format, GlyphPad, ScanUnit};
pub use glyph::Glyph;
pub use info::FontInfo;
pub use options::LoadOptions;
pub use read::DecodeError;
pub use scalar::ByteOrder;
pub use tables::accelerators::{Accelerators, DrawDirection};
pub use tables::encoding::{EncodingIndex, EncodingRange};
pub use tables::metrics::GlyphMetric;
pub use tables::properties::{Property, PropertyValue, Properties};
pub use toc::{TableDirectory, TableKind, TableRecord, PCF_FILE_VERSION};
