//! Nested-chunk (RIFF) framing.
//!
//! A chunk is an 8-byte header (four-character ID, little-endian payload size)
//! followed by the payload and, when the size is odd, one pad byte. `RIFF` and
//! `LIST` chunks start their payload with a four-character type followed by
//! child chunks.

use std::io::{self, Write};

use crate::binary_reader::ByteCursor;
use crate::error::SoundFontError;
use crate::four_cc::FourCC;

const HEADER_SIZE: usize = 8;

/// One chunk of a RIFF tree. `offset` is the position of the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub id: FourCC,
    pub offset: usize,
    pub size: u32,
}

impl Chunk {
    /// Position just past the payload (pad byte excluded).
    pub fn end(&self) -> usize {
        self.offset + self.size as usize
    }

    pub fn data<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        &data[self.offset..self.end()]
    }

    /// Reads the type and the children of a `RIFF` or `LIST` chunk.
    pub fn children(&self, data: &[u8]) -> Result<(FourCC, Vec<Chunk>), SoundFontError> {
        if !self.id.is_container() {
            return Err(SoundFontError::NotAContainer(self.id));
        }
        if self.size < 4 {
            return Err(SoundFontError::TruncatedData(self.offset));
        }

        let kind = ByteCursor::at(data, self.offset).read_four_cc()?;
        let children = parse_chunks(data, self.offset + 4, self.end())?;
        Ok((kind, children))
    }
}

/// Splits `data[start..end]` into consecutive chunks.
///
/// The chunks must tile the range exactly. A missing pad byte after an odd-sized
/// final chunk is tolerated.
pub fn parse_chunks(data: &[u8], start: usize, end: usize) -> Result<Vec<Chunk>, SoundFontError> {
    if end > data.len() || start > end {
        return Err(SoundFontError::TruncatedData(data.len().min(end)));
    }

    let mut chunks = Vec::new();
    let mut cursor = ByteCursor::at(data, start);

    while cursor.position() < end {
        let header = cursor.position();
        if header + HEADER_SIZE > end {
            return Err(SoundFontError::ChunkMisaligned {
                expected: end,
                actual: header,
            });
        }

        let id = cursor.read_four_cc()?;
        let size = cursor.read_u32()?;
        let offset = cursor.position();

        let payload_end = offset + size as usize;
        if payload_end > end {
            return Err(SoundFontError::ChunkOverrun {
                id,
                offset,
                size,
                end,
            });
        }

        let next = if size % 2 == 1 && payload_end < end {
            payload_end + 1
        } else {
            payload_end
        };

        chunks.push(Chunk { id, offset, size });
        cursor.seek(next);
    }

    if cursor.position() != end {
        return Err(SoundFontError::ChunkMisaligned {
            expected: end,
            actual: cursor.position(),
        });
    }

    Ok(chunks)
}

/// Writes one chunk, including the pad byte of an odd-sized payload.
pub fn write_chunk(w: &mut impl Write, id: FourCC, payload: &[u8]) -> io::Result<()> {
    w.write_all(id.as_bytes())?;
    w.write_all(&(payload.len() as u32).to_le_bytes())?;
    w.write_all(payload)?;
    if payload.len() % 2 == 1 {
        w.write_all(&[0])?;
    }
    Ok(())
}

/// Writes a `RIFF` or `LIST` container around already serialized children.
pub fn write_list(
    w: &mut impl Write,
    container: FourCC,
    kind: FourCC,
    children: &[u8],
) -> io::Result<()> {
    let mut payload = Vec::with_capacity(children.len() + 4);
    payload.extend_from_slice(kind.as_bytes());
    payload.extend_from_slice(children);
    write_chunk(w, container, &payload)
}
