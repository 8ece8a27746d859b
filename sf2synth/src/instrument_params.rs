use crate::LoopMode;
use crate::soundfont_math::pitch_ratio;
use std::sync::Arc;

/// One DAHDSR envelope, already converted from generator units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    /// Delay in seconds.
    pub delay: f64,
    /// Attack in seconds.
    pub attack: f64,
    /// Hold in seconds.
    pub hold: f64,
    /// Decay in seconds.
    pub decay: f64,
    /// Sustain as a mix fraction (the raw generator divided by 1000).
    pub sustain: f64,
    /// Release in seconds.
    pub release: f64,
}

/// The flat per-note playback parameters of a resolved preset zone.
///
/// A fresh record is built on every resolution; it shares the sample's PCM with the
/// bank but never refers back to the bank's tables.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentParams {
    /// Index of the sample header the zone refers to.
    pub sample_id: usize,
    /// The sample's PCM, after upsampling.
    pub sample: Arc<[i16]>,
    pub sample_name: String,
    /// Sample rate of `sample` in hertz.
    pub sample_rate: u32,
    pub sample_modes: LoopMode,

    // Playback addresses, as indices into `sample`.
    pub start: usize,
    pub end: usize,
    pub loop_start: usize,
    pub loop_end: usize,

    pub volume: Envelope,
    pub modulation: Envelope,

    /// Modulation envelope depth on pitch, in semitones.
    pub mod_env_to_pitch: f64,
    /// Modulation envelope depth on the filter cutoff, in cents.
    pub mod_env_to_filter_fc: i16,
    /// Filter cutoff in absolute cents.
    pub initial_filter_fc: i16,
    /// Filter resonance in centibels.
    pub initial_filter_q: i16,
    /// Attenuation in centibels.
    pub initial_attenuation: i16,
    /// Pan in 0.1% units, -500 (left) to 500 (right). `None` leaves it to the channel.
    pub pan: Option<i16>,
    /// Vibrato LFO frequency in hertz; `None` disables vibrato.
    pub freq_vibrato_lfo: Option<f64>,
    pub reverb_effects_send: i16,
    pub chorus_effects_send: i16,
    pub exclusive_class: i16,

    /// Coarse plus fine tuning, in semitones.
    pub tune: f64,
    /// Pitch offset of the sample, in semitones, relative to key 0.
    pub base_pitch: f64,
    /// Semitones per key (1.0 for the usual 100 cents).
    pub scale_tuning: f64,

    pub key_range: (u8, u8),
    pub vel_range: (u8, u8),
}

impl InstrumentParams {
    /// Ratio between the output and the native playback speed of the sample when
    /// it sounds at `key`. The key can be fractional for glides.
    pub fn playback_rate(&self, key: f64) -> f64 {
        pitch_ratio(key, self.base_pitch, self.scale_tuning)
    }

    /// Number of frames played before the loop or the end.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn loops(&self) -> bool {
        self.sample_modes != LoopMode::NoLoop && self.loop_end > self.loop_start
    }
}
