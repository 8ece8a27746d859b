use anyhow::Result;
use log::warn;
use sf2synth::soundfont_math::{cents_to_hertz, timecents_to_seconds};
use sf2synth::{Envelope, InstrumentParams, LoopMode, MIDI_MAX, MIDI_MIN, SoundSource};
use std::collections::HashMap;

use crate::error::SoundFontError;
use crate::generator::Generator;
use crate::generator_set::GeneratorSet;
use crate::generator_type::GeneratorType;
use crate::soundfont::SoundFont;
use crate::zone::{Zone, zone_slice};
use crate::zone_info::ZoneBag;

/// Outcome of resolving a note that did not hit a format error.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found(InstrumentParams),
    /// No preset header has the requested bank and program.
    PresetNotFound,
    /// The preset's instrument has no zone covering the key and velocity.
    InstrumentZoneNotFound,
}

impl Resolution {
    pub fn found(self) -> Option<InstrumentParams> {
        match self {
            Resolution::Found(params) => Some(params),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }
}

/// Generators of the zones `bag_rows` of a bag table.
fn bag_generators<'a>(
    bags: &[ZoneBag],
    bag_rows: std::ops::Range<usize>,
    generators: &'a [Generator],
) -> Result<&'a [Generator], SoundFontError> {
    let start_of = |row: usize| match bags.get(row) {
        Some(bag) => bag.generator_index as usize,
        None => generators.len(),
    };

    let begin = start_of(bag_rows.start);
    let end = start_of(bag_rows.end);
    if begin > end || end > generators.len() {
        return Err(SoundFontError::InvalidZoneList);
    }

    Ok(&generators[begin..end])
}

fn envelope(set: &GeneratorSet, delay: u16, sustain: u16) -> Envelope {
    // The six envelope generators are laid out delay, attack, hold, decay, sustain, release.
    let time = |generator_type: u16| timecents_to_seconds(set.value(generator_type) as f64);
    Envelope {
        delay: time(delay),
        attack: time(delay + 1),
        hold: time(delay + 2),
        decay: time(delay + 3),
        sustain: set.value(sustain) as f64 / 1000.0,
        release: time(sustain + 1),
    }
}

fn address_offset(set: &GeneratorSet, fine: u16, coarse: u16) -> i64 {
    set.value(coarse) as i64 * 32768 + set.value(fine) as i64
}

/// Resolves notes against the tables of a loaded SoundFont.
///
/// Resolution never modifies the tables, so one resolver can be shared between
/// threads.
#[derive(Debug, Clone)]
pub struct ZoneResolver {
    sound_font: SoundFont,
    preset_lookup: HashMap<(u16, u16), usize>,
}

impl ZoneResolver {
    pub const DEFAULT_VELOCITY: u8 = 100;

    pub fn new(sound_font: SoundFont) -> Self {
        let mut preset_lookup = HashMap::new();
        for (i, preset) in sound_font.presets().iter().enumerate() {
            // The first header for a bank and program shadows later duplicates.
            preset_lookup.entry((preset.bank, preset.program)).or_insert(i);
        }

        Self {
            sound_font,
            preset_lookup,
        }
    }

    pub fn sound_font(&self) -> &SoundFont {
        &self.sound_font
    }

    pub fn into_inner(self) -> SoundFont {
        self.sound_font
    }

    /// Row of the first preset header with this bank and program.
    pub fn find_preset(&self, bank: u16, program: u16) -> Option<usize> {
        self.preset_lookup.get(&(bank, program)).copied()
    }

    /// All generators of all zones of a preset, in file order.
    pub fn preset_generators(&self, preset: usize) -> Result<&[Generator], SoundFontError> {
        let sf = &self.sound_font;
        let bags = zone_slice(
            &sf.preset_headers,
            preset,
            |p| p.bag_index,
            sf.preset_bags.len(),
        )?;
        bag_generators(&sf.preset_bags, bags, &sf.preset_generators)
    }

    /// The zones of an instrument, in file order.
    pub fn instrument_zones(&self, instrument: usize) -> Result<Vec<Zone<'_>>, SoundFontError> {
        let sf = &self.sound_font;
        let bags = zone_slice(
            &sf.instruments,
            instrument,
            |i| i.bag_index,
            sf.instrument_bags.len(),
        )?;

        bags.map(|row| {
            let generators =
                bag_generators(&sf.instrument_bags, row..row + 1, &sf.instrument_generators)?;
            Zone::new(generators, GeneratorType::SAMPLE_ID)
        })
        .collect()
    }

    /// Resolves a note with the default velocity.
    pub fn resolve_default(
        &self,
        bank: u16,
        program: u16,
        key: u8,
    ) -> Result<Resolution, SoundFontError> {
        self.resolve(bank, program, key, ZoneResolver::DEFAULT_VELOCITY)
    }

    /// Resolves the playback parameters of one note.
    pub fn resolve(
        &self,
        bank: u16,
        program: u16,
        key: u8,
        velocity: u8,
    ) -> Result<Resolution, SoundFontError> {
        let sf = &self.sound_font;

        let Some(preset) = self.find_preset(bank, program) else {
            warn!("preset not found: bank={bank} program={program}");
            return Ok(Resolution::PresetNotFound);
        };

        // Only the terminal generator of the preset's zones is used.
        let instrument = match self.preset_generators(preset)?.last() {
            Some(last) if last.generator_type == GeneratorType::INSTRUMENT => {
                last.amount() as usize
            }
            _ => return Err(SoundFontError::InvalidPresetGenerator(preset)),
        };
        if instrument >= sf.instruments.len() {
            return Err(SoundFontError::InvalidInstrumentId {
                preset_id: preset,
                instrument_id: instrument,
            });
        }

        let zones = self.instrument_zones(instrument)?;
        let global = zones.first().filter(|zone| zone.is_global());
        let skip = usize::from(global.is_some());

        let Some(local) = zones
            .iter()
            .skip(skip)
            .find(|zone| zone.contains(key, velocity))
        else {
            warn!(
                "instrument zone not found: bank={bank} program={program} key={key} velocity={velocity}"
            );
            return Ok(Resolution::InstrumentZoneNotFound);
        };

        let Some(sample_id) = local.link.map(usize::from) else {
            return Err(SoundFontError::InvalidInstrumentGenerator(instrument));
        };
        if sample_id >= sf.sample_headers.len() || sample_id >= sf.samples.len() {
            return Err(SoundFontError::InvalidSampleId {
                instrument_id: instrument,
                sample_id,
            });
        }

        let mut set = GeneratorSet::defaults();
        if let Some(global) = global {
            set = set.layer(&global.set);
        }
        let set = set.layer(&local.set);

        let key_range = local
            .key_range
            .or(global.and_then(|zone| zone.key_range))
            .unwrap_or((MIDI_MIN, MIDI_MAX));
        let vel_range = local
            .vel_range
            .or(global.and_then(|zone| zone.vel_range))
            .unwrap_or((MIDI_MIN, MIDI_MAX));

        let params = self.build_params(&set, sample_id, key_range, vel_range);
        Ok(Resolution::Found(params))
    }

    fn build_params(
        &self,
        set: &GeneratorSet,
        sample_id: usize,
        key_range: (u8, u8),
        vel_range: (u8, u8),
    ) -> InstrumentParams {
        let header = &self.sound_font.sample_headers[sample_id];
        let sample = &self.sound_font.samples[sample_id];
        let multiplier = sample.rate_multiplier as i64;
        let len = sample.data.len() as i64;

        // Offsets count original frames, so they scale with the upsampling.
        let place = |native: i64, fine: u16, coarse: u16| -> usize {
            (native + address_offset(set, fine, coarse) * multiplier).clamp(0, len) as usize
        };
        let origin = header.start as i64 * multiplier;

        let tune = set.value(GeneratorType::COARSE_TUNE) as f64
            + set.value(GeneratorType::FINE_TUNE) as f64 / 100.0;
        let root_key = match set.get(GeneratorType::OVERRIDING_ROOT_KEY) {
            Some(key) if (i16::from(MIDI_MIN)..=i16::from(MIDI_MAX)).contains(&key) => key as f64,
            _ => header.original_pitch as f64,
        };
        let base_pitch = tune + header.pitch_correction as f64 / 100.0 - root_key;

        InstrumentParams {
            sample_id,
            sample: sample.data.clone(),
            sample_name: header.name.clone(),
            sample_rate: header.sample_rate,
            sample_modes: LoopMode::from_sample_modes(set.value(GeneratorType::SAMPLE_MODES)),

            start: place(
                0,
                GeneratorType::START_ADDRESS_OFFSET,
                GeneratorType::START_ADDRESS_COARSE_OFFSET,
            ),
            end: place(
                len,
                GeneratorType::END_ADDRESS_OFFSET,
                GeneratorType::END_ADDRESS_COARSE_OFFSET,
            ),
            loop_start: place(
                header.loop_start as i64 - origin,
                GeneratorType::START_LOOP_ADDRESS_OFFSET,
                GeneratorType::START_LOOP_ADDRESS_COARSE_OFFSET,
            ),
            loop_end: place(
                header.loop_end as i64 - origin,
                GeneratorType::END_LOOP_ADDRESS_OFFSET,
                GeneratorType::END_LOOP_ADDRESS_COARSE_OFFSET,
            ),

            volume: envelope(
                set,
                GeneratorType::DELAY_VOLUME_ENVELOPE,
                GeneratorType::SUSTAIN_VOLUME_ENVELOPE,
            ),
            modulation: envelope(
                set,
                GeneratorType::DELAY_MODULATION_ENVELOPE,
                GeneratorType::SUSTAIN_MODULATION_ENVELOPE,
            ),

            mod_env_to_pitch: set.value(GeneratorType::MODULATION_ENVELOPE_TO_PITCH) as f64
                / 100.0,
            mod_env_to_filter_fc: set
                .value(GeneratorType::MODULATION_ENVELOPE_TO_FILTER_CUTOFF_FREQUENCY),
            initial_filter_fc: set.value(GeneratorType::INITIAL_FILTER_CUTOFF_FREQUENCY),
            initial_filter_q: set.value(GeneratorType::INITIAL_FILTER_Q),
            initial_attenuation: set.value(GeneratorType::INITIAL_ATTENUATION),
            pan: set.get(GeneratorType::PAN),
            freq_vibrato_lfo: set
                .get(GeneratorType::FREQUENCY_VIBRATO_LFO)
                .map(|cents| cents_to_hertz(cents as f64)),
            reverb_effects_send: set.value(GeneratorType::REVERB_EFFECTS_SEND),
            chorus_effects_send: set.value(GeneratorType::CHORUS_EFFECTS_SEND),
            exclusive_class: set.value(GeneratorType::EXCLUSIVE_CLASS),

            tune,
            base_pitch,
            scale_tuning: set.value(GeneratorType::SCALE_TUNING) as f64 / 100.0,

            key_range,
            vel_range,
        }
    }
}

impl From<SoundFont> for ZoneResolver {
    fn from(sound_font: SoundFont) -> Self {
        Self::new(sound_font)
    }
}

impl SoundSource for ZoneResolver {
    fn resolve(
        &self,
        bank: u16,
        program: u16,
        key: u8,
        velocity: u8,
    ) -> Result<Option<InstrumentParams>> {
        Ok(ZoneResolver::resolve(self, bank, program, key, velocity)?.found())
    }
}
