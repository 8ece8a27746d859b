use crate::binary_reader::ByteCursor;
use crate::error::SoundFontError;
use crate::generator_type::GeneratorType;

/// The amount of a generator: a signed scalar or an inclusive byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorValue {
    Scalar(i16),
    Range { lo: u8, hi: u8 },
}

impl GeneratorValue {
    pub fn as_scalar(&self) -> Option<i16> {
        match *self {
            GeneratorValue::Scalar(value) => Some(value),
            GeneratorValue::Range { .. } => None,
        }
    }

    pub fn as_range(&self) -> Option<(u8, u8)> {
        match *self {
            GeneratorValue::Range { lo, hi } => Some((lo, hi)),
            GeneratorValue::Scalar(_) => None,
        }
    }
}

/// One `pgen`/`igen` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generator {
    pub generator_type: u16,
    pub value: GeneratorValue,
}

impl Generator {
    pub const SIZE: usize = 4;

    /// Builds a generator, checking the value's shape against the type.
    pub fn new(generator_type: u16, value: GeneratorValue) -> Result<Self, SoundFontError> {
        let is_range = matches!(value, GeneratorValue::Range { .. });
        if is_range != GeneratorType::is_range(generator_type) {
            return Err(SoundFontError::InvalidGeneratorValue { generator_type });
        }
        Ok(Self {
            generator_type,
            value,
        })
    }

    pub(crate) fn read(reader: &mut ByteCursor) -> Result<Self, SoundFontError> {
        let generator_type = reader.read_u16()?;
        let amount = reader.read_u16()?;

        // Ranges keep the low bound in the least significant byte.
        let value = if GeneratorType::is_range(generator_type) {
            GeneratorValue::Range {
                lo: (amount & 0xFF) as u8,
                hi: (amount >> 8) as u8,
            }
        } else {
            GeneratorValue::Scalar(amount as i16)
        };

        Ok(Self {
            generator_type,
            value,
        })
    }

    /// The raw 16-bit amount, as stored in the file.
    pub fn amount(&self) -> u16 {
        match self.value {
            GeneratorValue::Scalar(value) => value as u16,
            GeneratorValue::Range { lo, hi } => lo as u16 | (hi as u16) << 8,
        }
    }
}
