//! Conversions between bitmap layouts.
//!
//! All of these operate in place on a complete bitmap blob, except for
//! [`repad_glyph`], which copies a single glyph into a new buffer.

/// Reverse the order of bits in every byte.
pub fn invert_bit_order(data: &mut [u8]) {
    for byte in data {
        *byte = byte.reverse_bits();
    }
}

/// Swap the bytes of every 16-bit unit. A trailing odd byte is left alone.
pub fn swap_two_bytes(data: &mut [u8]) {
    for unit in data.chunks_exact_mut(2) {
        unit.swap(0, 1);
    }
}

/// Reverse the bytes of every 32-bit unit. Trailing bytes that do not make
/// up a full unit are left alone.
pub fn swap_four_bytes(data: &mut [u8]) {
    for unit in data.chunks_exact_mut(4) {
        unit.reverse();
    }
}

/// The number of bytes in one row of a glyph `width` pixels wide, with rows
/// padded to `pad` bytes.
pub fn row_stride(width: usize, pad: usize) -> usize {
    width.div_ceil(pad * 8) * pad
}

/// Copy a glyph's rows from `src` (padded to `src_pad` bytes) to `dst`
/// (padded to `dst_pad` bytes).
///
/// Each destination row receives the bytes shared by both layouts, and the
/// rest of the row is zeroed. Returns the number of bytes written to `dst`.
///
/// # Panics
///
/// Panics if either buffer is too small for a glyph of the given size.
pub fn repad_glyph(
    src: &[u8],
    dst: &mut [u8],
    src_pad: usize,
    dst_pad: usize,
    width: usize,
    height: usize,
) -> usize {
    let src_stride = row_stride(width, src_pad);
    let dst_stride = row_stride(width, dst_pad);
    let copy = src_stride.min(dst_stride);
    for row in 0..height {
        let src_row = &src[row * src_stride..][..copy];
        let dst_row = &mut dst[row * dst_stride..][..dst_stride];
        dst_row[..copy].copy_from_slice(src_row);
        dst_row[copy..].fill(0);
    }
    dst_stride * height
}
