use crate::binary_reader::{ByteCursor, decode_string};
use crate::error::SoundFontError;
use crate::four_cc::FourCC;
use crate::riff::Chunk;

/// Field names of the well-known INFO sub-chunks.
const INFO_NAMES: [(&[u8; 4], &str); 11] = [
    (b"ifil", "version"),
    (b"isng", "sound_engine"),
    (b"INAM", "name"),
    (b"irom", "rom_name"),
    (b"iver", "rom_version"),
    (b"ICRD", "creation_date"),
    (b"IENG", "engineer"),
    (b"IPRD", "product"),
    (b"ICOP", "copyright"),
    (b"ICMT", "comment"),
    (b"ISFT", "software"),
];

fn field_name(id: FourCC) -> String {
    INFO_NAMES
        .iter()
        .find(|(tag, _)| id == **tag)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| id.to_string())
}

/// The entries of the INFO list, keyed by field name, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoundFontInfo {
    entries: Vec<(String, String)>,
}

impl SoundFontInfo {
    pub(crate) fn new(
        data: &[u8],
        chunks: &[Chunk],
        decode_versions: bool,
    ) -> Result<Self, SoundFontError> {
        let mut entries = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let is_version = chunk.id == b"ifil" || chunk.id == b"iver";
            let value = if decode_versions && is_version && chunk.size >= 4 {
                let mut reader = ByteCursor::at(data, chunk.offset);
                let major = reader.read_u16()?;
                let minor = reader.read_u16()?;
                format!("{major}.{minor}")
            } else {
                decode_string(chunk.data(data))
            };
            entries.push((field_name(chunk.id), value));
        }

        Ok(Self { entries })
    }

    /// Looks up a field by name (`"name"`, `"copyright"`, ...) or by raw tag.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    pub fn name(&self) -> Option<&str> {
        self.get("name")
    }

    pub fn version(&self) -> Option<&str> {
        self.get("version")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
