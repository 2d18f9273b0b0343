//! A forward-only reader over a font stream.

use std::io::{Read, Seek, SeekFrom};

use crate::read::DecodeError;
use crate::scalar::{ByteOrder, Scalar};

/// Allocation made up front for arrays whose length comes from the file.
///
/// Larger arrays grow as elements are actually read, so a huge count in a
/// truncated file fails on the read rather than on the allocation.
pub(crate) const MAX_PREALLOC: usize = 4096;

/// A cursor for reading scalars out of a stream.
///
/// The cursor tracks how many bytes have been consumed, which is used to
/// validate that tables are only ever visited in increasing offset order.
pub(crate) struct Cursor<R> {
    reader: R,
    pos: u64,
}

impl<R: Read + Seek> Cursor<R> {
    pub(crate) fn new(reader: R) -> Self {
        Cursor { reader, pos: 0 }
    }

    /// The number of bytes consumed so far.
    pub(crate) fn position(&self) -> u64 {
        self.pos
    }

    pub(crate) fn read<T: Scalar>(&mut self, order: ByteOrder) -> Result<T, DecodeError> {
        let mut raw = [0u8; 8];
        let raw = &mut raw[..T::RAW_BYTE_LEN];
        self.reader.read_exact(raw)?;
        self.pos += T::RAW_BYTE_LEN as u64;
        T::read(raw, order).ok_or(DecodeError::TruncatedInput)
    }

    /// Read a little-endian `u32`, regardless of any table format.
    pub(crate) fn read_lsb32(&mut self) -> Result<u32, DecodeError> {
        self.read(ByteOrder::LsbFirst)
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, DecodeError> {
        self.read(ByteOrder::LsbFirst)
    }

    /// Read exactly `len` bytes.
    ///
    /// The buffer grows with the data actually present in the stream, so a
    /// bogus length fails with [`DecodeError::TruncatedInput`] without first
    /// reserving `len` bytes.
    pub(crate) fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, DecodeError> {
        let mut buf = Vec::with_capacity(len.min(MAX_PREALLOC));
        let read = (&mut self.reader).take(len as u64).read_to_end(&mut buf)?;
        self.pos += read as u64;
        if read != len {
            return Err(DecodeError::TruncatedInput);
        }
        Ok(buf)
    }

    /// Skip `n_bytes` of input.
    pub(crate) fn advance_by(&mut self, n_bytes: u64) -> Result<(), DecodeError> {
        if n_bytes == 0 {
            return Ok(());
        }
        let delta = i64::try_from(n_bytes).map_err(|_| DecodeError::SeekFailed)?;
        self.reader.seek(SeekFrom::Current(delta)).map_err(|err| {
            log::debug!("seek by {n_bytes} failed: {err}");
            DecodeError::SeekFailed
        })?;
        self.pos += n_bytes;
        Ok(())
    }

    /// Move forward to `offset`.
    ///
    /// Returns `None` if `offset` is behind the current position.
    pub(crate) fn advance_to(&mut self, offset: u64) -> Option<Result<(), DecodeError>> {
        let delta = offset.checked_sub(self.pos)?;
        Some(self.advance_by(delta))
    }
}
