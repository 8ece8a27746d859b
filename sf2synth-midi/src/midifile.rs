use anyhow::{Result, anyhow};
use midly::MidiMessage;
use midly::num::u4;
use std::{collections::VecDeque, io::Read};

/// A channel message of a MIDI file, as raw bytes, with its time in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedMessage {
    pub time: f64,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
struct TempoChange {
    time: f64,
    us_per_beat: f64,
}

/// The channel messages of a Standard MIDI File, merged across tracks in time order.
#[derive(Debug, Clone, Default)]
pub struct MidiFile {
    pub(crate) messages: Vec<TimedMessage>,
}

/// Re-encodes a channel message as the bytes a live MIDI port would carry.
pub fn encode_message(channel: u4, message: MidiMessage) -> Vec<u8> {
    let ch = channel.as_int();
    match message {
        MidiMessage::NoteOff { key, vel } => vec![0x80 | ch, key.as_int(), vel.as_int()],
        MidiMessage::NoteOn { key, vel } => vec![0x90 | ch, key.as_int(), vel.as_int()],
        MidiMessage::Aftertouch { key, vel } => vec![0xA0 | ch, key.as_int(), vel.as_int()],
        MidiMessage::Controller { controller, value } => {
            vec![0xB0 | ch, controller.as_int(), value.as_int()]
        }
        MidiMessage::ProgramChange { program } => vec![0xC0 | ch, program.as_int()],
        MidiMessage::ChannelAftertouch { vel } => vec![0xD0 | ch, vel.as_int()],
        MidiMessage::PitchBend { bend } => {
            let value = bend.0.as_int();
            vec![0xE0 | ch, (value & 0x7F) as u8, (value >> 7) as u8]
        }
    }
}

impl MidiFile {
    pub fn new<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buf = vec![];
        reader.read_to_end(&mut buf)?;
        MidiFile::parse(&buf)
    }

    pub fn parse(data: &[u8]) -> Result<Self> {
        let smf = midly::Smf::parse(data)?;
        let ticks_per_beat = match smf.header.timing {
            midly::Timing::Metrical(tpb) => tpb.as_int() as f64,
            midly::Timing::Timecode(..) => return Err(anyhow!("Timecode is not supported")),
        };

        // Tempo changes live in the first track and apply to the other tracks at
        // the same absolute times.
        let mut tempo_changes: Vec<TempoChange> = vec![];
        let mut tracks = vec![];
        for track in smf.tracks {
            let first_track = tracks.is_empty();
            let mut time = 0.0;
            let mut us_per_beat = 500_000.0;
            let mut tempo_idx = 0;
            let mut messages = VecDeque::new();
            for event in track {
                if !first_track {
                    while tempo_idx < tempo_changes.len() && tempo_changes[tempo_idx].time <= time {
                        us_per_beat = tempo_changes[tempo_idx].us_per_beat;
                        tempo_idx += 1;
                    }
                }
                let midly::TrackEvent { delta, kind } = event;
                let delta_beats = delta.as_int() as f64 / ticks_per_beat;
                time += delta_beats * us_per_beat / 1_000_000.0;
                match kind {
                    midly::TrackEventKind::Meta(midly::MetaMessage::Tempo(tempo)) if first_track => {
                        us_per_beat = tempo.as_int() as f64;
                        tempo_changes.push(TempoChange { time, us_per_beat });
                    }
                    midly::TrackEventKind::Midi { channel, message } => {
                        messages.push_back(TimedMessage {
                            time,
                            bytes: encode_message(channel, message),
                        });
                    }
                    _ => (),
                }
            }
            tracks.push(messages);
        }

        let mut messages = vec![];
        // Merge by repeatedly taking the track whose next message is earliest.
        while let Some(which) = tracks
            .iter()
            .enumerate()
            .filter_map(|(i, track)| track.front().map(|message| (i, message.time)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
        {
            if let Some(message) = tracks[which].pop_front() {
                messages.push(message);
            }
        }

        Ok(Self { messages })
    }

    pub fn messages(&self) -> &[TimedMessage] {
        &self.messages
    }

    /// Get the length of the MIDI file in seconds.
    pub fn length(&self) -> f64 {
        self.messages.last().map_or(0.0, |message| message.time)
    }
}
