mod decoder;
mod link;
mod listener;
mod midifile;
mod midifile_player;

pub use self::decoder::MidiDecoder;
pub use self::link::{LINK_PATCH, LINK_READY, LinkError, LinkMessage, WebMidiLink};
pub use self::listener::{EventRecorder, ListenerSet, MidiEvent, MidiListener};
pub use self::midifile::{MidiFile, TimedMessage, encode_message};
pub use self::midifile_player::MidiFilePlayer;
