pub mod soundfont_math;

mod instrument_params;
mod loop_mode;
mod sound_source;

pub use self::instrument_params::{Envelope, InstrumentParams};
pub use self::loop_mode::LoopMode;
pub use self::sound_source::SoundSource;

/// The lowest MIDI key or velocity.
pub const MIDI_MIN: u8 = 0;

/// The highest MIDI key or velocity.
pub const MIDI_MAX: u8 = 127;
