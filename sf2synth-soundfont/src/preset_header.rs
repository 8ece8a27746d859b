use crate::binary_reader::ByteCursor;
use crate::error::SoundFontError;
use crate::record::Record;

/// One `phdr` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetHeader {
    pub name: String,
    pub program: u16,
    pub bank: u16,
    /// First row of this preset in the preset zone table.
    pub bag_index: u16,
    pub library: u32,
    pub genre: u32,
    pub morphology: u32,
}

impl Record for PresetHeader {
    const SIZE: usize = 38;

    fn read(reader: &mut ByteCursor) -> Result<Self, SoundFontError> {
        Ok(Self {
            name: reader.read_fixed_string(20)?,
            program: reader.read_u16()?,
            bank: reader.read_u16()?,
            bag_index: reader.read_u16()?,
            library: reader.read_u32()?,
            genre: reader.read_u32()?,
            morphology: reader.read_u32()?,
        })
    }
}
