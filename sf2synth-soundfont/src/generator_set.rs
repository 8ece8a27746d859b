use crate::generator::{Generator, GeneratorValue};
use crate::generator_type::GeneratorType;

/// Scalar generator values indexed by generator type, `None` where absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GeneratorSet {
    values: [Option<i16>; GeneratorType::COUNT],
}

impl GeneratorSet {
    pub(crate) fn empty() -> Self {
        Self {
            values: [None; GeneratorType::COUNT],
        }
    }

    /// Values a zone starts from before any global or local generator applies.
    pub(crate) fn defaults() -> Self {
        const INSTANT: i16 = sf2synth::soundfont_math::INSTANT_TIMECENTS;

        let mut set = GeneratorSet::empty();
        for generator_type in 0..GeneratorType::COUNT as u16 {
            set.set(generator_type, 0);
        }

        for generator_type in [
            GeneratorType::DELAY_VOLUME_ENVELOPE,
            GeneratorType::ATTACK_VOLUME_ENVELOPE,
            GeneratorType::HOLD_VOLUME_ENVELOPE,
            GeneratorType::DECAY_VOLUME_ENVELOPE,
            GeneratorType::RELEASE_VOLUME_ENVELOPE,
            GeneratorType::DELAY_MODULATION_ENVELOPE,
            GeneratorType::ATTACK_MODULATION_ENVELOPE,
            GeneratorType::HOLD_MODULATION_ENVELOPE,
            GeneratorType::DECAY_MODULATION_ENVELOPE,
            GeneratorType::RELEASE_MODULATION_ENVELOPE,
        ] {
            set.set(generator_type, INSTANT);
        }
        set.set(GeneratorType::SCALE_TUNING, 100);
        set.set(GeneratorType::INITIAL_FILTER_CUTOFF_FREQUENCY, 13500);
        set.set(GeneratorType::INITIAL_FILTER_Q, 1);

        // These stay unset so that "absent" remains observable.
        set.values[GeneratorType::PAN as usize] = None;
        set.values[GeneratorType::OVERRIDING_ROOT_KEY as usize] = None;
        set.values[GeneratorType::FREQUENCY_VIBRATO_LFO as usize] = None;

        set
    }

    /// Collects a zone's scalar generators. The first occurrence of a type wins;
    /// ranges and unknown types are skipped.
    pub(crate) fn from_generators(generators: &[Generator]) -> Self {
        let mut set = GeneratorSet::empty();
        for generator in generators {
            if let GeneratorValue::Scalar(value) = generator.value {
                if set.get(generator.generator_type).is_none() {
                    set.set(generator.generator_type, value);
                }
            }
        }
        set
    }

    fn set(&mut self, generator_type: u16, value: i16) {
        if GeneratorType::is_known(generator_type) {
            self.values[generator_type as usize] = Some(value);
        }
    }

    pub(crate) fn get(&self, generator_type: u16) -> Option<i16> {
        self.values.get(generator_type as usize).copied().flatten()
    }

    /// The value of a type that has a compiled-in default, or 0.
    pub(crate) fn value(&self, generator_type: u16) -> i16 {
        self.get(generator_type).unwrap_or(0)
    }

    /// Returns `self` with every value present in `over` replacing its own.
    pub(crate) fn layer(&self, over: &GeneratorSet) -> GeneratorSet {
        let mut values = self.values;
        for (value, over) in values.iter_mut().zip(over.values.iter()) {
            if over.is_some() {
                *value = *over;
            }
        }
        GeneratorSet { values }
    }
}
