use thiserror::Error;

/// Represents an error in the settings used to load a SoundFont.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("the minimum sample rate must be between 8000 and 192000, but was {0}")]
    MinimumSampleRateOutOfRange(u32),
}

/// Specifies how a SoundFont is loaded.
#[derive(Debug, Clone)]
pub struct LoadSettings {
    /// Samples recorded below this rate are upsampled by repeated doubling until
    /// they reach it.
    pub minimum_sample_rate: u32,
    /// The value indicating whether the `ifil` and `iver` INFO entries are
    /// decoded as `major.minor` versions rather than read as text.
    pub decode_info_versions: bool,
}

impl LoadSettings {
    const DEFAULT_MINIMUM_SAMPLE_RATE: u32 = 22050;
    const DEFAULT_DECODE_INFO_VERSIONS: bool = true;

    pub fn new() -> Self {
        Self {
            minimum_sample_rate: LoadSettings::DEFAULT_MINIMUM_SAMPLE_RATE,
            decode_info_versions: LoadSettings::DEFAULT_DECODE_INFO_VERSIONS,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), SettingsError> {
        LoadSettings::check_minimum_sample_rate(self.minimum_sample_rate)?;

        Ok(())
    }

    fn check_minimum_sample_rate(value: u32) -> Result<(), SettingsError> {
        if !(8_000..=192_000).contains(&value) {
            return Err(SettingsError::MinimumSampleRateOutOfRange(value));
        }

        Ok(())
    }
}

impl Default for LoadSettings {
    fn default() -> Self {
        Self::new()
    }
}
