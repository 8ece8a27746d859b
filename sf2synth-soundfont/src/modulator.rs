use crate::binary_reader::ByteCursor;
use crate::error::SoundFontError;
use crate::record::Record;

/// One `pmod`/`imod` record. Decoded and kept, but not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modulator {
    pub source: u16,
    pub destination: u16,
    pub amount: i16,
    pub amount_source: u16,
    pub transform: u16,
}

impl Record for Modulator {
    const SIZE: usize = 10;

    fn read(reader: &mut ByteCursor) -> Result<Self, SoundFontError> {
        Ok(Self {
            source: reader.read_u16()?,
            destination: reader.read_u16()?,
            amount: reader.read_i16()?,
            amount_source: reader.read_u16()?,
            transform: reader.read_u16()?,
        })
    }
}
