use crate::decoder::MidiDecoder;
use crate::midifile::{MidiFile, TimedMessage};

/// Replays a MIDI file into a decoder as a clock advances.
pub struct MidiFilePlayer {
    decoder: MidiDecoder,
    midi_file: MidiFile,
    current_time: f64,
    msg_index: usize,
}

impl MidiFilePlayer {
    pub fn new(mut decoder: MidiDecoder, midi_file: MidiFile) -> Self {
        decoder.reset();
        Self {
            decoder,
            midi_file,
            current_time: 0.0,
            msg_index: 0,
        }
    }

    /// Moves the clock forward and dispatches every message whose time has come.
    /// Returns how many messages were dispatched.
    pub fn advance(&mut self, seconds: f64) -> usize {
        self.current_time += seconds;
        let start = self.msg_index;
        while let Some(TimedMessage { time, bytes }) = self.midi_file.messages.get(self.msg_index) {
            if *time > self.current_time {
                break;
            }
            self.decoder.process_midi_message(bytes);
            self.msg_index += 1;
        }
        self.msg_index - start
    }

    /// Starts over from the beginning of the file.
    pub fn rewind(&mut self) {
        self.decoder.reset();
        self.current_time = 0.0;
        self.msg_index = 0;
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn end_of_sequence(&self) -> bool {
        self.msg_index == self.midi_file.messages.len()
    }

    pub fn decoder(&mut self) -> &mut MidiDecoder {
        &mut self.decoder
    }
}
