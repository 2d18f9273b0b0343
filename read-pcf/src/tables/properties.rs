//! The properties table: named string and integer values describing the font.

use std::io::{Read, Seek};

use crate::cursor::{Cursor, MAX_PREALLOC};
use crate::format::Format;
use crate::read::DecodeError;
use crate::toc::{TableDirectory, TableKind};

/// On-disk size of a property record: name offset, string flag, value.
const PROPERTY_RECORD_LEN: u32 = 9;

/// The value of a font property.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropertyValue {
    String(String),
    Integer(i32),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            PropertyValue::Integer(_) => None,
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            PropertyValue::Integer(v) => Some(*v),
            PropertyValue::String(_) => None,
        }
    }
}

impl std::fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyValue::String(s) => write!(f, "\"{s}\""),
            PropertyValue::Integer(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Property {
    pub name: String,
    pub value: PropertyValue,
}

/// The font's properties, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Properties(Vec<Property>);

impl Properties {
    /// Returns the value of the first property named `name`.
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.0
            .iter()
            .find(|prop| prop.name == name)
            .map(|prop| &prop.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> + '_ {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn read<R: Read + Seek>(
        cursor: &mut Cursor<R>,
        directory: &TableDirectory,
    ) -> Result<Self, DecodeError> {
        directory.seek_required(cursor, TableKind::Properties)?;
        let format = Format::new(cursor.read_lsb32()?);
        if !format.matches(Format::DEFAULT) {
            return Err(DecodeError::FormatMismatch {
                table: TableKind::Properties,
                format: format.to_u32(),
            });
        }
        let order = format.byte_order();
        let nprops: u32 = cursor.read(order)?;
        if nprops == 0 || nprops > i32::MAX as u32 / PROPERTY_RECORD_LEN {
            return Err(DecodeError::InvalidCount(nprops));
        }

        let mut records = Vec::with_capacity((nprops as usize).min(MAX_PREALLOC));
        for _ in 0..nprops {
            let name: u32 = cursor.read(order)?;
            let is_string = match cursor.read_u8()? {
                0 => false,
                1 => true,
                _ => return Err(DecodeError::MalformedData("invalid property string flag")),
            };
            let value: u32 = cursor.read(order)?;
            records.push((name, is_string, value));
        }
        // records are 9 bytes, so the array is padded back to a 4 byte boundary
        cursor.advance_by(((4 - nprops % 4) % 4) as u64)?;

        let pool_len: u32 = cursor.read(order)?;
        if pool_len > i32::MAX as u32 {
            return Err(DecodeError::InvalidCount(pool_len));
        }
        let pool = cursor.read_bytes(pool_len as usize)?;

        let properties = records
            .into_iter()
            .map(|(name, is_string, value)| {
                let name = pool_string(&pool, name)?;
                let value = if is_string {
                    PropertyValue::String(pool_string(&pool, value)?)
                } else {
                    PropertyValue::Integer(value as i32)
                };
                Ok(Property { name, value })
            })
            .collect::<Result<Vec<_>, DecodeError>>()?;
        log::debug!("read {} properties ({} byte string pool)", properties.len(), pool_len);
        Ok(Properties(properties))
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The NUL terminated string at `offset`, decoded as ISO 8859-1.
fn pool_string(pool: &[u8], offset: u32) -> Result<String, DecodeError> {
    let bytes = pool
        .get(offset as usize..)
        .filter(|bytes| !bytes.is_empty())
        .ok_or(DecodeError::StringOutOfBounds {
            offset,
            len: pool.len() as u32,
        })?;
    let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
    Ok(bytes[..end].iter().map(|b| *b as char).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcf_test_data::{kind, FileLayout, PcfBuilder, TestGlyph, TestProperty};

    fn read_properties(builder: &PcfBuilder) -> Result<Properties, DecodeError> {
        let file = builder.build();
        let mut cursor = Cursor::new(std::io::Cursor::new(file.data));
        let directory = TableDirectory::read(&mut cursor)?;
        Properties::read(&mut cursor, &directory)
    }

    fn builder(layout: FileLayout) -> PcfBuilder {
        PcfBuilder::new(layout).glyph(TestGlyph::from_ascii(1, &["#"]))
    }

    #[test]
    fn strings_and_integers() {
        for byte_msb in [false, true] {
            let layout = FileLayout {
                byte_msb,
                ..Default::default()
            };
            let props = read_properties(
                &builder(layout)
                    .property("FAMILY_NAME", TestProperty::Str("Fixed".into()))
                    .property("PIXEL_SIZE", TestProperty::Int(13))
                    .property("QUAD_WIDTH", TestProperty::Int(-7))
                    .property("NOTICE", TestProperty::Str(String::new())),
            )
            .unwrap();
            assert_eq!(props.len(), 4);
            assert_eq!(props.get("FAMILY_NAME").and_then(PropertyValue::as_str), Some("Fixed"));
            assert_eq!(props.get("PIXEL_SIZE").and_then(PropertyValue::as_integer), Some(13));
            assert_eq!(props.get("QUAD_WIDTH"), Some(&PropertyValue::Integer(-7)));
            assert_eq!(props.get("NOTICE").and_then(PropertyValue::as_str), Some(""));
            assert!(props.get("WEIGHT_NAME").is_none());
        }
    }

    #[test]
    fn padding_for_every_remainder() {
        for count in 1..=5 {
            let mut b = builder(FileLayout::default());
            for i in 0..count {
                b = b.property(&format!("P{i}"), TestProperty::Int(i));
            }
            let props = read_properties(&b).unwrap();
            let values: Vec<_> = props.iter().map(|p| p.value.as_integer().unwrap()).collect();
            assert_eq!(values, (0..count).collect::<Vec<_>>());
        }
    }

    #[test]
    fn value_offset_at_pool_end() {
        let b = builder(FileLayout::default()).property("FOO", TestProperty::StringOffset(0));
        let pool_len = b.string_pool_len() as u32;
        let b = builder(FileLayout::default())
            .property("FOO", TestProperty::StringOffset(pool_len));
        assert_eq!(
            read_properties(&b),
            Err(DecodeError::StringOutOfBounds {
                offset: pool_len,
                len: pool_len,
            })
        );
    }

    #[test]
    fn zero_properties_is_invalid() {
        let b = builder(FileLayout::default());
        assert_eq!(read_properties(&b), Err(DecodeError::InvalidCount(0)));
    }

    #[test]
    fn bad_string_flag() {
        let b = builder(FileLayout::default()).property("FOO", TestProperty::Int(1));
        let mut file = b.build();
        // format, count, name offset, then the flag
        let flag = file.offset_of(kind::PROPERTIES).unwrap() + 12;
        file.data[flag] = 2;
        let mut cursor = Cursor::new(std::io::Cursor::new(file.data));
        let directory = TableDirectory::read(&mut cursor).unwrap();
        assert_eq!(
            Properties::read(&mut cursor, &directory),
            Err(DecodeError::MalformedData("invalid property string flag"))
        );
    }

    #[test]
    fn latin1_decoding() {
        assert_eq!(pool_string(b"caf\xe9\0x", 0).unwrap(), "caf\u{e9}");
        assert_eq!(pool_string(b"abc", 1).unwrap(), "bc");
        assert!(pool_string(b"abc", 3).is_err());
    }
}
