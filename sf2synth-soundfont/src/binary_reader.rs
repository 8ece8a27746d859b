use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::io::{self, Cursor, Read};

use crate::error::SoundFontError;
use crate::four_cc::FourCC;

/// Sequential reader over an in-memory buffer.
///
/// Positions are absolute offsets into the buffer the cursor was created on.
pub struct ByteCursor<'a> {
    inner: Cursor<&'a [u8]>,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            inner: Cursor::new(data),
        }
    }

    pub fn at(data: &'a [u8], position: usize) -> Self {
        let mut cursor = Self::new(data);
        cursor.seek(position);
        cursor
    }

    pub fn position(&self) -> usize {
        self.inner.position() as usize
    }

    pub fn seek(&mut self, position: usize) {
        self.inner.set_position(position as u64);
    }

    pub fn skip(&mut self, count: usize) -> Result<(), SoundFontError> {
        let target = self.position() + count;
        if target > self.len() {
            return Err(SoundFontError::TruncatedData(self.position()));
        }
        self.seek(target);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inner.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.position())
    }

    fn wrap<T>(&self, start: usize, result: io::Result<T>) -> Result<T, SoundFontError> {
        result.map_err(|err| match err.kind() {
            io::ErrorKind::UnexpectedEof => SoundFontError::TruncatedData(start),
            _ => SoundFontError::IoError(err),
        })
    }

    pub fn read_u8(&mut self) -> Result<u8, SoundFontError> {
        let start = self.position();
        let result = self.inner.read_u8();
        self.wrap(start, result)
    }

    pub fn read_i8(&mut self) -> Result<i8, SoundFontError> {
        let start = self.position();
        let result = self.inner.read_i8();
        self.wrap(start, result)
    }

    pub fn read_u16(&mut self) -> Result<u16, SoundFontError> {
        let start = self.position();
        let result = self.inner.read_u16::<LittleEndian>();
        self.wrap(start, result)
    }

    pub fn read_i16(&mut self) -> Result<i16, SoundFontError> {
        let start = self.position();
        let result = self.inner.read_i16::<LittleEndian>();
        self.wrap(start, result)
    }

    pub fn read_u32(&mut self) -> Result<u32, SoundFontError> {
        let start = self.position();
        let result = self.inner.read_u32::<LittleEndian>();
        self.wrap(start, result)
    }

    pub fn read_u16_be(&mut self) -> Result<u16, SoundFontError> {
        let start = self.position();
        let result = self.inner.read_u16::<BigEndian>();
        self.wrap(start, result)
    }

    pub fn read_u32_be(&mut self) -> Result<u32, SoundFontError> {
        let start = self.position();
        let result = self.inner.read_u32::<BigEndian>();
        self.wrap(start, result)
    }

    pub fn read_four_cc(&mut self) -> Result<FourCC, SoundFontError> {
        let mut bytes = [0_u8; 4];
        let start = self.position();
        let result = self.inner.read_exact(&mut bytes);
        self.wrap(start, result)?;
        Ok(FourCC::new(bytes))
    }

    /// Reads a string stored in a fixed-length field, cut at the first NUL.
    pub fn read_fixed_string(&mut self, length: usize) -> Result<String, SoundFontError> {
        let start = self.position();
        let mut bytes = vec![0_u8; length];
        let result = self.inner.read_exact(&mut bytes);
        self.wrap(start, result)?;
        Ok(decode_string(&bytes))
    }
}

/// Decodes a NUL-padded string field.
pub(crate) fn decode_string(bytes: &[u8]) -> String {
    let actual = match bytes.iter().position(|&b| b == 0) {
        Some(nul) => &bytes[..nul],
        None => bytes,
    };
    String::from_utf8_lossy(actual).into_owned()
}
