/// Scaling constant of the absolute-cents frequency encoding (8.176 Hz at 0 cents).
pub const CENTS_BASE_HERTZ: f64 = 8.176;

/// The smallest timecent value SoundFont generators use as "instantaneous".
pub const INSTANT_TIMECENTS: i16 = -12000;

/// Converts timecents (`1200 * log2(seconds)`) to seconds.
pub fn timecents_to_seconds(x: f64) -> f64 {
    2_f64.powf(x / 1200.0)
}

/// Converts absolute cents to hertz.
pub fn cents_to_hertz(x: f64) -> f64 {
    CENTS_BASE_HERTZ * timecents_to_seconds(x)
}

/// Playback rate of a sample played at `key`, given the sample's base pitch in
/// semitones and the scale tuning factor (1.0 = 100 cents per key).
pub fn pitch_ratio(key: f64, base_pitch: f64, scale_tuning: f64) -> f64 {
    2_f64.powf((key + base_pitch) * scale_tuning / 12.0)
}
