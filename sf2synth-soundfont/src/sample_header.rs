use crate::binary_reader::ByteCursor;
use crate::error::SoundFontError;
use crate::record::Record;

/// Channel role of a sample, from the `sfSampleType` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    Mono,
    Right,
    Left,
    Linked,
    Unknown(u16),
}

/// One `shdr` record.
///
/// `start` and `end` index the 16-bit words of the `smpl` chunk. After loading,
/// `loop_start`, `loop_end` and `sample_rate` are scaled by the upsampling
/// multiplier of the sample's data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleHeader {
    pub name: String,
    pub start: u32,
    pub end: u32,
    pub loop_start: u32,
    pub loop_end: u32,
    pub sample_rate: u32,
    pub original_pitch: u8,
    pub pitch_correction: i8,
    pub sample_link: u16,
    pub sample_type: u16,
}

impl SampleHeader {
    const ROM_FLAG: u16 = 0x8000;

    pub fn kind(&self) -> SampleType {
        match self.sample_type & !SampleHeader::ROM_FLAG {
            1 => SampleType::Mono,
            2 => SampleType::Right,
            4 => SampleType::Left,
            8 => SampleType::Linked,
            other => SampleType::Unknown(other),
        }
    }

    pub fn is_rom(&self) -> bool {
        self.sample_type & SampleHeader::ROM_FLAG != 0
    }
}

impl Record for SampleHeader {
    const SIZE: usize = 46;

    fn read(reader: &mut ByteCursor) -> Result<Self, SoundFontError> {
        Ok(Self {
            name: reader.read_fixed_string(20)?,
            start: reader.read_u32()?,
            end: reader.read_u32()?,
            loop_start: reader.read_u32()?,
            loop_end: reader.read_u32()?,
            sample_rate: reader.read_u32()?,
            original_pitch: reader.read_u8()?,
            pitch_correction: reader.read_i8()?,
            sample_link: reader.read_u16()?,
            sample_type: reader.read_u16()?,
        })
    }
}
