//! Fixed-size integers as they appear in font data.

/// The order of bytes within a multi-byte value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ByteOrder {
    #[default]
    LsbFirst,
    MsbFirst,
}

impl ByteOrder {
    /// The byte order of the machine this code is running on.
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::MsbFirst
        } else {
            ByteOrder::LsbFirst
        }
    }
}

/// A scalar that can be decoded from raw bytes in either byte order.
///
/// You do not need to implement this trait directly; it is implemented for
/// the integer types that occur in PCF tables.
pub trait Scalar: Sized + Copy {
    /// The number of bytes of the encoded value.
    const RAW_BYTE_LEN: usize;

    /// Decode a value from exactly `RAW_BYTE_LEN` bytes.
    ///
    /// Returns `None` if the slice has the wrong length.
    fn read(bytes: &[u8], order: ByteOrder) -> Option<Self>;
}

macro_rules! int_scalar {
    ($ty:ty, $len:literal) => {
        impl Scalar for $ty {
            const RAW_BYTE_LEN: usize = $len;

            fn read(bytes: &[u8], order: ByteOrder) -> Option<Self> {
                let raw: [u8; $len] = bytes.try_into().ok()?;
                Some(match order {
                    ByteOrder::LsbFirst => <$ty>::from_le_bytes(raw),
                    ByteOrder::MsbFirst => <$ty>::from_be_bytes(raw),
                })
            }
        }
    };
}

int_scalar!(u8, 1);
int_scalar!(u16, 2);
int_scalar!(i16, 2);
int_scalar!(u32, 4);
int_scalar!(i32, 4);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_both_orders() {
        let bytes = [0x12, 0x34, 0x56, 0x78];
        assert_eq!(u32::read(&bytes, ByteOrder::MsbFirst), Some(0x1234_5678));
        assert_eq!(u32::read(&bytes, ByteOrder::LsbFirst), Some(0x7856_3412));
        assert_eq!(u16::read(&bytes[..2], ByteOrder::LsbFirst), Some(0x3412));
        assert_eq!(i16::read(&[0xff, 0xfe], ByteOrder::MsbFirst), Some(-2));
        assert_eq!(u8::read(&bytes[3..], ByteOrder::MsbFirst), Some(0x78));
    }

    #[test]
    fn wrong_length_is_none() {
        assert_eq!(u32::read(&[0, 1, 2], ByteOrder::LsbFirst), None);
        assert_eq!(u16::read(&[], ByteOrder::MsbFirst), None);
    }
}
