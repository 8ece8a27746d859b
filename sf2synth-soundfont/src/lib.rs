mod error;

mod binary_reader;
mod four_cc;
mod record;
pub mod riff;

mod generator;
mod generator_set;
mod generator_type;
mod instrument_header;
mod load_settings;
mod modulator;
mod preset_header;
mod sample_data;
mod sample_header;
mod soundfont;
mod soundfont_info;
mod zone;
mod zone_info;
mod zone_resolver;

pub use self::binary_reader::ByteCursor;
pub use self::error::SoundFontError;
pub use self::four_cc::FourCC;
pub use self::generator::{Generator, GeneratorValue};
pub use self::generator_type::GeneratorType;
pub use self::instrument_header::InstrumentHeader;
pub use self::load_settings::{LoadSettings, SettingsError};
pub use self::modulator::Modulator;
pub use self::preset_header::PresetHeader;
pub use self::sample_data::SampleData;
pub use self::sample_header::{SampleHeader, SampleType};
pub use self::soundfont::SoundFont;
pub use self::soundfont_info::SoundFontInfo;
pub use self::zone::{Zone, zone_slice};
pub use self::zone_info::ZoneBag;
pub use self::zone_resolver::{Resolution, ZoneResolver};
