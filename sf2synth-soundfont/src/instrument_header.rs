use crate::binary_reader::ByteCursor;
use crate::error::SoundFontError;
use crate::record::Record;

/// One `inst` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentHeader {
    pub name: String,
    /// First row of this instrument in the instrument zone table.
    pub bag_index: u16,
}

impl Record for InstrumentHeader {
    const SIZE: usize = 22;

    fn read(reader: &mut ByteCursor) -> Result<Self, SoundFontError> {
        Ok(Self {
            name: reader.read_fixed_string(20)?,
            bag_index: reader.read_u16()?,
        })
    }
}
