use log::debug;
use std::collections::BTreeMap;
use std::io::Read;

use crate::error::SoundFontError;
use crate::four_cc::FourCC;
use crate::generator::Generator;
use crate::instrument_header::InstrumentHeader;
use crate::load_settings::LoadSettings;
use crate::modulator::Modulator;
use crate::preset_header::PresetHeader;
use crate::record::read_table;
use crate::riff::{Chunk, parse_chunks};
use crate::sample_data::{SampleData, load_samples};
use crate::sample_header::SampleHeader;
use crate::soundfont_info::SoundFontInfo;
use crate::zone_info::ZoneBag;

const PDTA_ORDER: [&[u8; 4]; 9] = [
    b"phdr", b"pbag", b"pmod", b"pgen", b"inst", b"ibag", b"imod", b"igen", b"shdr",
];

/// The decoded tables of a SoundFont bank.
///
/// Tables keep file order; row numbers are the indices the other tables refer to.
/// Nothing here is modified after loading.
#[derive(Debug, Clone)]
pub struct SoundFont {
    pub info: SoundFontInfo,
    /// Position of the `smpl` chunk payload in the loaded buffer.
    pub sample_data_offset: usize,
    pub preset_headers: Vec<PresetHeader>,
    pub preset_bags: Vec<ZoneBag>,
    pub preset_modulators: Vec<Modulator>,
    pub preset_generators: Vec<Generator>,
    pub instruments: Vec<InstrumentHeader>,
    pub instrument_bags: Vec<ZoneBag>,
    pub instrument_modulators: Vec<Modulator>,
    pub instrument_generators: Vec<Generator>,
    pub sample_headers: Vec<SampleHeader>,
    /// PCM per sample header, same indices as `sample_headers`.
    pub samples: Vec<SampleData>,
}

/// Checks the container type and sub-type of `chunk` and returns its children.
fn get_chunk_list(
    chunk: &Chunk,
    data: &[u8],
    container: FourCC,
    kind: &[u8; 4],
) -> Result<Vec<Chunk>, SoundFontError> {
    let expected = FourCC::new(*kind);
    if chunk.id != container {
        return Err(if container == FourCC::RIFF {
            SoundFontError::InvalidRiffChunkType {
                expected: FourCC::RIFF,
                actual: chunk.id,
            }
        } else {
            SoundFontError::InvalidListChunkType {
                expected: FourCC::LIST,
                actual: chunk.id,
            }
        });
    }

    let (actual, children) = chunk.children(data)?;
    if actual != expected {
        return Err(if container == FourCC::RIFF {
            SoundFontError::InvalidRiffChunkType { expected, actual }
        } else {
            SoundFontError::InvalidListChunkType { expected, actual }
        });
    }

    Ok(children)
}

impl SoundFont {
    /// Loads a SoundFont from a reader holding the whole file.
    pub fn new<R: Read>(reader: &mut R) -> Result<Self, SoundFontError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        SoundFont::parse(&data)
    }

    /// Parses a SoundFont held in memory with the default settings.
    pub fn parse(data: &[u8]) -> Result<Self, SoundFontError> {
        SoundFont::parse_with(data, &LoadSettings::default())
    }

    /// Parses a SoundFont held in memory.
    pub fn parse_with(data: &[u8], settings: &LoadSettings) -> Result<Self, SoundFontError> {
        settings.validate()?;

        let top = parse_chunks(data, 0, data.len())?;
        if top.len() != 1 {
            return Err(SoundFontError::InvalidTopLevel(top.len()));
        }

        let sections = get_chunk_list(&top[0], data, FourCC::RIFF, b"sfbk")?;
        if sections.len() != 3 {
            return Err(SoundFontError::InvalidSfbkStructure);
        }

        let info_chunks = get_chunk_list(&sections[0], data, FourCC::LIST, b"INFO")?;
        let info = SoundFontInfo::new(data, &info_chunks, settings.decode_info_versions)?;

        let sdta = get_chunk_list(&sections[1], data, FourCC::LIST, b"sdta")?;
        let smpl = match sdta.as_slice() {
            [smpl] if smpl.id == b"smpl" => *smpl,
            _ => return Err(SoundFontError::InvalidSdtaStructure),
        };

        let pdta = get_chunk_list(&sections[2], data, FourCC::LIST, b"pdta")?;
        if pdta.len() != PDTA_ORDER.len() {
            return Err(SoundFontError::InvalidPdtaStructure);
        }
        for (chunk, id) in pdta.iter().zip(PDTA_ORDER) {
            if chunk.id != id {
                return Err(SoundFontError::SubChunkNotFound(FourCC::new(*id)));
            }
        }

        let preset_headers = read_table(data, &pdta[0])?;
        let preset_bags = read_table(data, &pdta[1])?;
        let preset_modulators = read_table(data, &pdta[2])?;
        let preset_generators = read_table(data, &pdta[3])?;
        let instruments = read_table(data, &pdta[4])?;
        let instrument_bags = read_table(data, &pdta[5])?;
        let instrument_modulators = read_table(data, &pdta[6])?;
        let instrument_generators = read_table(data, &pdta[7])?;
        let mut sample_headers: Vec<SampleHeader> = read_table(data, &pdta[8])?;

        let samples = load_samples(
            data,
            &smpl,
            &mut sample_headers,
            settings.minimum_sample_rate,
        )?;

        debug!(
            "loaded {} presets, {} instruments, {} samples ({} bytes of sample data)",
            preset_headers.len(),
            instruments.len(),
            sample_headers.len(),
            smpl.size
        );

        Ok(Self {
            info,
            sample_data_offset: smpl.offset,
            preset_headers,
            preset_bags,
            preset_modulators,
            preset_generators,
            instruments,
            instrument_bags,
            instrument_modulators,
            instrument_generators,
            sample_headers,
            samples,
        })
    }

    /// The selectable presets: every header except the terminal `EOP` record.
    pub fn presets(&self) -> &[PresetHeader] {
        match self.preset_headers.split_last() {
            Some((last, rest)) if last.name == "EOP" => rest,
            _ => &self.preset_headers,
        }
    }

    /// Preset names by bank, then program.
    pub fn preset_names(&self) -> BTreeMap<u16, BTreeMap<u16, String>> {
        let mut banks: BTreeMap<u16, BTreeMap<u16, String>> = BTreeMap::new();
        for preset in self.presets() {
            banks
                .entry(preset.bank)
                .or_default()
                .insert(preset.program, preset.name.clone());
        }
        banks
    }
}
