use crate::binary_reader::ByteCursor;
use crate::error::SoundFontError;
use crate::record::Record;

/// One `pbag`/`ibag` record: where a zone's generators and modulators start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneBag {
    pub generator_index: u16,
    pub modulator_index: u16,
}

impl Record for ZoneBag {
    const SIZE: usize = 4;

    fn read(reader: &mut ByteCursor) -> Result<Self, SoundFontError> {
        Ok(Self {
            generator_index: reader.read_u16()?,
            modulator_index: reader.read_u16()?,
        })
    }
}
