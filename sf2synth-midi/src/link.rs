//! The text messages of the WebMidiLink protocol.
//!
//! A host page drives the synthesizer with comma-separated strings: `midi,90,40,7f`
//! carries one MIDI message in hexadecimal, `link,...` messages negotiate patches.

use log::warn;
use std::str::FromStr;
use thiserror::Error;

use crate::decoder::MidiDecoder;

/// Announced to the host once a bank is loaded.
pub const LINK_READY: &str = "link,ready";
/// The reply to a patch request. Patches are not supported, so it carries none.
pub const LINK_PATCH: &str = "link,patch";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    #[error("unknown message type '{0}'")]
    UnknownType(String),
    #[error("unknown link command '{0}'")]
    UnknownCommand(String),
    #[error("'{0}' is not a hexadecimal byte")]
    InvalidByte(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkMessage {
    Midi(Vec<u8>),
    RequestPatch,
    SetPatch,
}

impl FromStr for LinkMessage {
    type Err = LinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split(',');
        match fields.next().unwrap_or_default() {
            "midi" => fields
                .map(|field| {
                    let field = field.trim();
                    u8::from_str_radix(field, 16)
                        .map_err(|_| LinkError::InvalidByte(field.to_string()))
                })
                .collect::<Result<Vec<u8>, _>>()
                .map(LinkMessage::Midi),
            "link" => match fields.next().unwrap_or_default() {
                "reqpatch" => Ok(LinkMessage::RequestPatch),
                "setpatch" => Ok(LinkMessage::SetPatch),
                command => Err(LinkError::UnknownCommand(command.to_string())),
            },
            kind => Err(LinkError::UnknownType(kind.to_string())),
        }
    }
}

/// Answers WebMidiLink messages, feeding MIDI payloads into a decoder.
pub struct WebMidiLink {
    decoder: MidiDecoder,
}

impl WebMidiLink {
    pub fn new(decoder: MidiDecoder) -> Self {
        Self { decoder }
    }

    pub fn decoder(&mut self) -> &mut MidiDecoder {
        &mut self.decoder
    }

    /// Handles one message and returns the reply to post back to the host, if any.
    pub fn handle(&mut self, message: &str) -> Result<Option<&'static str>, LinkError> {
        let message = message.parse::<LinkMessage>().inspect_err(|err| {
            warn!("rejected WebMidiLink message '{message}': {err}");
        })?;

        match message {
            LinkMessage::Midi(bytes) => {
                self.decoder.process_midi_message(&bytes);
                Ok(None)
            }
            LinkMessage::RequestPatch => Ok(Some(LINK_PATCH)),
            LinkMessage::SetPatch => Ok(None),
        }
    }
}
