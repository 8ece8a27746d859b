use std::io;
use thiserror::Error;

use crate::four_cc::FourCC;
use crate::load_settings::SettingsError;

/// Represents an error when loading a SoundFont or resolving one of its zones.
///
/// Every variant means the bank is malformed and cannot be used; a preset or zone
/// that simply does not exist is reported through [`crate::Resolution`] instead.
#[derive(Debug, Error)]
pub enum SoundFontError {
    #[error(transparent)]
    IoError(#[from] io::Error),
    #[error(transparent)]
    InvalidSettings(#[from] SettingsError),
    #[error("unexpected end of data at byte {0}")]
    TruncatedData(usize),
    #[error("the '{id}' chunk at byte {offset} declares {size} bytes, past the end of its parent at {end}")]
    ChunkOverrun {
        id: FourCC,
        offset: usize,
        size: u32,
        end: usize,
    },
    #[error("the chunk list ends at byte {actual}, but its parent ends at {expected}")]
    ChunkMisaligned { expected: usize, actual: usize },
    #[error("the top level must hold exactly one chunk, but held {0}")]
    InvalidTopLevel(usize),
    #[error("the type of the RIFF chunk must be '{expected}', but was '{actual}'")]
    InvalidRiffChunkType { expected: FourCC, actual: FourCC },
    #[error("the type of the LIST chunk must be '{expected}', but was '{actual}'")]
    InvalidListChunkType { expected: FourCC, actual: FourCC },
    #[error("the '{0}' chunk is not a RIFF or LIST container")]
    NotAContainer(FourCC),
    #[error("invalid sfbk structure")]
    InvalidSfbkStructure,
    #[error("the sdta list must hold exactly one 'smpl' chunk")]
    InvalidSdtaStructure,
    #[error("the pdta list must hold its nine sub-chunks in order")]
    InvalidPdtaStructure,
    #[error("the '{0}' sub-chunk was not found")]
    SubChunkNotFound(FourCC),
    #[error("the '{id}' chunk is {size} bytes long, which is not a multiple of {record_size}")]
    InvalidRecordSize {
        id: FourCC,
        size: u32,
        record_size: usize,
    },
    #[error("the zone list is invalid")]
    InvalidZoneList,
    #[error("the preset with the ID '{0}' does not end with an instrument generator")]
    InvalidPresetGenerator(usize),
    #[error("the zone of instrument '{0}' matching the note does not end with a sample ID")]
    InvalidInstrumentGenerator(usize),
    #[error("the generator of type {generator_type} holds a value of the wrong shape")]
    InvalidGeneratorValue { generator_type: u16 },
    #[error(
        "the preset with the ID '{preset_id}' contains an invalid instrument ID '{instrument_id}'"
    )]
    InvalidInstrumentId {
        preset_id: usize,
        instrument_id: usize,
    },
    #[error(
        "the instrument with the ID '{instrument_id}' contains an invalid sample ID '{sample_id}'"
    )]
    InvalidSampleId {
        instrument_id: usize,
        sample_id: usize,
    },
    #[error("the sample header with the ID '{0}' does not fit in the sample data")]
    InvalidSampleHeader(usize),
}
