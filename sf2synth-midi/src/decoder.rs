use log::trace;
use midly::MidiMessage;
use midly::live::LiveEvent;

use crate::listener::{ListenerSet, MidiListener};

const CHANNELS: usize = 16;
const MAX_MASTER_VOLUME: f64 = (0x4000 - 1) as f64;

/// Turns raw MIDI messages into [`MidiListener`] calls.
///
/// The decoder keeps the selected registered parameter number of each channel,
/// so messages must be fed from one thread in arrival order.
#[derive(Default)]
pub struct MidiDecoder {
    rpn_msb: [u8; CHANNELS],
    rpn_lsb: [u8; CHANNELS],
    listeners: ListenerSet,
}

impl MidiDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listener(listener: impl MidiListener + 'static) -> Self {
        let mut decoder = Self::new();
        decoder.add_listener(listener);
        decoder
    }

    pub fn add_listener(&mut self, listener: impl MidiListener + 'static) {
        self.listeners.push(listener);
    }

    /// Clears the RPN selection of every channel.
    pub fn reset(&mut self) {
        self.rpn_msb = [0; CHANNELS];
        self.rpn_lsb = [0; CHANNELS];
    }

    /// The `(msb, lsb)` RPN selected on `channel`.
    pub fn rpn(&self, channel: u8) -> (u8, u8) {
        let channel = channel as usize % CHANNELS;
        (self.rpn_msb[channel], self.rpn_lsb[channel])
    }

    /// Decodes one complete message (status byte first). Unsupported or
    /// malformed messages are dropped.
    pub fn process_midi_message(&mut self, message: &[u8]) {
        if self.listeners.is_empty() {
            return;
        }

        let Some(&status) = message.first() else {
            trace!("ignored empty MIDI message");
            return;
        };
        if status == 0xF0 {
            self.process_system_exclusive(message);
            return;
        }

        // Data bytes are masked to 7 bits, so a stray high bit never drops the event.
        let mut framed = [0_u8; 3];
        let len = message.len().min(framed.len());
        framed[..len].copy_from_slice(&message[..len]);
        for byte in &mut framed[1..len] {
            *byte &= 0x7F;
        }

        match LiveEvent::parse(&framed[..len]) {
            Ok(LiveEvent::Midi { channel, message }) => {
                self.process_channel_message(channel.as_int(), message)
            }
            Ok(other) => trace!("ignored MIDI event {other:?}"),
            Err(err) => trace!("ignored malformed MIDI message {message:02X?}: {err}"),
        }
    }

    fn process_channel_message(&mut self, channel: u8, message: MidiMessage) {
        let ch = channel as usize;
        match message {
            MidiMessage::NoteOff { key, vel } => {
                self.listeners.note_off(channel, key.as_int(), vel.as_int())
            }
            MidiMessage::NoteOn { key, vel } => {
                if vel.as_int() > 0 {
                    self.listeners.note_on(channel, key.as_int(), vel.as_int())
                } else {
                    self.listeners.note_off(channel, key.as_int(), 0)
                }
            }
            MidiMessage::Controller { controller, value } => {
                let value = value.as_int();
                match controller.as_int() {
                    0x06 => {
                        if (self.rpn_msb[ch], self.rpn_lsb[ch]) == (0, 0) {
                            self.listeners.pitch_bend_sensitivity(channel, value)
                        }
                    }
                    0x07 => self.listeners.volume_change(channel, value),
                    0x0A => self.listeners.panpot_change(channel, value),
                    // Bank select is applied by whoever resolves the program.
                    0x20 => (),
                    0x64 => self.rpn_lsb[ch] = value,
                    0x65 => self.rpn_msb[ch] = value,
                    0x78 => self.listeners.all_sound_off(channel),
                    0x79 => self.listeners.reset_all_control(channel),
                    other => trace!("ignored controller {other:#04X} on channel {channel}"),
                }
            }
            MidiMessage::ProgramChange { program } => {
                self.listeners.program_change(channel, program.as_int())
            }
            MidiMessage::PitchBend { bend } => self.listeners.pitch_bend(channel, bend.0.as_int()),
            other => trace!("ignored {other:?} on channel {channel}"),
        }
    }

    fn process_system_exclusive(&mut self, message: &[u8]) {
        // F0 7F <device> 04 01 <lsb> <msb>: realtime master volume.
        match message {
            [0xF0, 0x7F, _, 0x04, 0x01, lsb, msb, ..] => {
                let volume = (*lsb as u16 & 0x7F) + ((*msb as u16 & 0x7F) << 7);
                self.listeners
                    .set_master_volume(volume as f64 / MAX_MASTER_VOLUME);
            }
            _ => trace!("ignored system exclusive message {message:02X?}"),
        }
    }
}
