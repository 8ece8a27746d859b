use crate::binary_reader::ByteCursor;
use crate::error::SoundFontError;
use crate::generator::Generator;
use crate::riff::Chunk;

/// A fixed-width record of one of the `pdta` tables.
pub(crate) trait Record: Sized {
    const SIZE: usize;

    fn read(reader: &mut ByteCursor) -> Result<Self, SoundFontError>;
}

impl Record for Generator {
    const SIZE: usize = Generator::SIZE;

    fn read(reader: &mut ByteCursor) -> Result<Self, SoundFontError> {
        Generator::read(reader)
    }
}

/// Decodes every record of a table chunk, in file order.
pub(crate) fn read_table<T: Record>(data: &[u8], chunk: &Chunk) -> Result<Vec<T>, SoundFontError> {
    if chunk.size as usize % T::SIZE != 0 {
        return Err(SoundFontError::InvalidRecordSize {
            id: chunk.id,
            size: chunk.size,
            record_size: T::SIZE,
        });
    }

    let count = chunk.size as usize / T::SIZE;
    let mut reader = ByteCursor::at(data, chunk.offset);
    let mut records = Vec::with_capacity(count);
    for _ in 0..count {
        records.push(T::read(&mut reader)?);
    }

    Ok(records)
}
