use std::cell::RefCell;
use std::rc::Rc;

/// Receives the events decoded from a MIDI stream.
///
/// Every method has an empty default body, so a listener only implements the
/// events it cares about. Channels are `0..16`.
pub trait MidiListener {
    fn note_on(&mut self, _channel: u8, _key: u8, _velocity: u8) {}
    fn note_off(&mut self, _channel: u8, _key: u8, _velocity: u8) {}
    /// `volume` is normalized to `0.0..=1.0`.
    fn set_master_volume(&mut self, _volume: f64) {}
    fn program_change(&mut self, _channel: u8, _program: u8) {}
    fn volume_change(&mut self, _channel: u8, _volume: u8) {}
    fn panpot_change(&mut self, _channel: u8, _panpot: u8) {}
    /// `value` is the 14-bit bend, centered on `0x2000`.
    fn pitch_bend(&mut self, _channel: u8, _value: u16) {}
    fn pitch_bend_sensitivity(&mut self, _channel: u8, _semitones: u8) {}
    fn all_sound_off(&mut self, _channel: u8) {}
    fn reset_all_control(&mut self, _channel: u8) {}
}

/// Forwards every event to each registered listener, in registration order.
#[derive(Default)]
pub struct ListenerSet {
    listeners: Vec<Box<dyn MidiListener>>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, listener: impl MidiListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    fn each(&mut self, mut f: impl FnMut(&mut dyn MidiListener)) {
        for listener in &mut self.listeners {
            f(listener.as_mut());
        }
    }
}

impl MidiListener for ListenerSet {
    fn note_on(&mut self, channel: u8, key: u8, velocity: u8) {
        self.each(|l| l.note_on(channel, key, velocity));
    }

    fn note_off(&mut self, channel: u8, key: u8, velocity: u8) {
        self.each(|l| l.note_off(channel, key, velocity));
    }

    fn set_master_volume(&mut self, volume: f64) {
        self.each(|l| l.set_master_volume(volume));
    }

    fn program_change(&mut self, channel: u8, program: u8) {
        self.each(|l| l.program_change(channel, program));
    }

    fn volume_change(&mut self, channel: u8, volume: u8) {
        self.each(|l| l.volume_change(channel, volume));
    }

    fn panpot_change(&mut self, channel: u8, panpot: u8) {
        self.each(|l| l.panpot_change(channel, panpot));
    }

    fn pitch_bend(&mut self, channel: u8, value: u16) {
        self.each(|l| l.pitch_bend(channel, value));
    }

    fn pitch_bend_sensitivity(&mut self, channel: u8, semitones: u8) {
        self.each(|l| l.pitch_bend_sensitivity(channel, semitones));
    }

    fn all_sound_off(&mut self, channel: u8) {
        self.each(|l| l.all_sound_off(channel));
    }

    fn reset_all_control(&mut self, channel: u8) {
        self.each(|l| l.reset_all_control(channel));
    }
}

/// One decoded event, mirroring the methods of [`MidiListener`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    MasterVolume(f64),
    ProgramChange { channel: u8, program: u8 },
    VolumeChange { channel: u8, volume: u8 },
    PanpotChange { channel: u8, panpot: u8 },
    PitchBend { channel: u8, value: u16 },
    PitchBendSensitivity { channel: u8, semitones: u8 },
    AllSoundOff { channel: u8 },
    ResetAllControl { channel: u8 },
}

/// A listener that appends every event to a log shared by all its clones.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Rc<RefCell<Vec<MidiEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<MidiEvent> {
        self.events.borrow().clone()
    }

    /// Empties the log and returns what it held.
    pub fn take(&self) -> Vec<MidiEvent> {
        self.events.borrow_mut().drain(..).collect()
    }

    fn record(&self, event: MidiEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl MidiListener for EventRecorder {
    fn note_on(&mut self, channel: u8, key: u8, velocity: u8) {
        self.record(MidiEvent::NoteOn {
            channel,
            key,
            velocity,
        });
    }

    fn note_off(&mut self, channel: u8, key: u8, velocity: u8) {
        self.record(MidiEvent::NoteOff {
            channel,
            key,
            velocity,
        });
    }

    fn set_master_volume(&mut self, volume: f64) {
        self.record(MidiEvent::MasterVolume(volume));
    }

    fn program_change(&mut self, channel: u8, program: u8) {
        self.record(MidiEvent::ProgramChange { channel, program });
    }

    fn volume_change(&mut self, channel: u8, volume: u8) {
        self.record(MidiEvent::VolumeChange { channel, volume });
    }

    fn panpot_change(&mut self, channel: u8, panpot: u8) {
        self.record(MidiEvent::PanpotChange { channel, panpot });
    }

    fn pitch_bend(&mut self, channel: u8, value: u16) {
        self.record(MidiEvent::PitchBend { channel, value });
    }

    fn pitch_bend_sensitivity(&mut self, channel: u8, semitones: u8) {
        self.record(MidiEvent::PitchBendSensitivity { channel, semitones });
    }

    fn all_sound_off(&mut self, channel: u8) {
        self.record(MidiEvent::AllSoundOff { channel });
    }

    fn reset_all_control(&mut self, channel: u8) {
        self.record(MidiEvent::ResetAllControl { channel });
    }
}
