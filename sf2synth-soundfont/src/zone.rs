use sf2synth::{MIDI_MAX, MIDI_MIN};
use std::ops::Range;

use crate::error::SoundFontError;
use crate::generator::Generator;
use crate::generator_type::GeneratorType;
use crate::generator_set::GeneratorSet;

/// Rows of the finer table owned by `row` of `table`.
///
/// Each row stores only where its sub-range starts; it ends where the next row's
/// starts, or at the end of the finer table for the last row.
pub fn zone_slice<T>(
    table: &[T],
    row: usize,
    start_of: impl Fn(&T) -> u16,
    finer_len: usize,
) -> Result<Range<usize>, SoundFontError> {
    let begin = match table.get(row) {
        Some(current) => start_of(current) as usize,
        None => return Err(SoundFontError::InvalidZoneList),
    };
    let end = match table.get(row + 1) {
        Some(next) => start_of(next) as usize,
        None => finer_len,
    };

    if begin > end || end > finer_len {
        return Err(SoundFontError::InvalidZoneList);
    }

    Ok(begin..end)
}

/// The generators of one preset or instrument zone, classified by position.
#[derive(Debug, Clone)]
pub struct Zone<'a> {
    pub generators: &'a [Generator],
    pub key_range: Option<(u8, u8)>,
    pub vel_range: Option<(u8, u8)>,
    /// The instrument (preset zones) or sample (instrument zones) the zone plays.
    /// A zone without one is a global zone.
    pub link: Option<u16>,
    pub(crate) set: GeneratorSet,
}

fn range_of(generator: &Generator) -> Result<(u8, u8), SoundFontError> {
    generator
        .value
        .as_range()
        .ok_or(SoundFontError::InvalidGeneratorValue {
            generator_type: generator.generator_type,
        })
}

impl<'a> Zone<'a> {
    /// Classifies a zone whose terminal generator, if any, has type `link_type`.
    ///
    /// `keyRange` is only honored first and `velRange` only directly after it (or
    /// first when there is no `keyRange`).
    pub fn new(generators: &'a [Generator], link_type: u16) -> Result<Self, SoundFontError> {
        let mut position = 0;

        let mut key_range = None;
        if let Some(first) = generators.first() {
            if first.generator_type == GeneratorType::KEY_RANGE {
                key_range = Some(range_of(first)?);
                position = 1;
            }
        }

        let mut vel_range = None;
        if let Some(next) = generators.get(position) {
            if next.generator_type == GeneratorType::VELOCITY_RANGE {
                vel_range = Some(range_of(next)?);
            }
        }

        let link = match generators.last() {
            Some(last) if last.generator_type == link_type => Some(last.amount()),
            _ => None,
        };

        Ok(Self {
            generators,
            key_range,
            vel_range,
            link,
            set: GeneratorSet::from_generators(generators),
        })
    }

    pub fn is_global(&self) -> bool {
        self.link.is_none()
    }

    /// Whether the note falls in the zone. Missing ranges cover everything.
    pub fn contains(&self, key: u8, velocity: u8) -> bool {
        let (key_lo, key_hi) = self.key_range.unwrap_or((MIDI_MIN, MIDI_MAX));
        let (vel_lo, vel_hi) = self.vel_range.unwrap_or((MIDI_MIN, MIDI_MAX));
        (key_lo..=key_hi).contains(&key) && (vel_lo..=vel_hi).contains(&velocity)
    }
}
