use crate::InstrumentParams;
use anyhow::Result;

/// A bank of sampled instruments the voice renderer can ask for notes.
pub trait SoundSource {
    /// Resolves the parameters for one note. `Ok(None)` means the bank has nothing
    /// to play for this combination and the note should be dropped silently.
    fn resolve(
        &self,
        bank: u16,
        program: u16,
        key: u8,
        velocity: u8,
    ) -> Result<Option<InstrumentParams>>;
}
