//! Assembles small SoundFont images in memory.

#![allow(dead_code)]

use sf2synth_soundfont::FourCC;
use sf2synth_soundfont::riff::{write_chunk, write_list};

pub type Zone = Vec<(u16, u16)>;

pub fn range(lo: u8, hi: u8) -> u16 {
    lo as u16 | (hi as u16) << 8
}

pub fn signed(value: i16) -> u16 {
    value as u16
}

pub struct TestSample {
    pub name: String,
    pub pcm: Vec<i16>,
    /// Loop points relative to the first frame of the sample.
    pub loop_start: u32,
    pub loop_end: u32,
    pub sample_rate: u32,
    pub original_pitch: u8,
    pub pitch_correction: i8,
}

impl TestSample {
    pub fn new(name: &str, pcm: Vec<i16>, sample_rate: u32) -> Self {
        let len = pcm.len() as u32;
        Self {
            name: name.to_string(),
            pcm,
            loop_start: 0,
            loop_end: len,
            sample_rate,
            original_pitch: 60,
            pitch_correction: 0,
        }
    }
}

#[derive(Default)]
pub struct Sf2Builder {
    pub name: String,
    pub presets: Vec<(String, u16, u16, Vec<Zone>)>,
    pub instruments: Vec<(String, Vec<Zone>)>,
    pub samples: Vec<TestSample>,
    /// Leading silence in the sample pool, so sample starts are not zero.
    pub pool_padding: usize,
}

fn id(tag: &[u8; 4]) -> FourCC {
    FourCC::new(*tag)
}

fn name20(name: &str) -> [u8; 20] {
    let mut field = [0_u8; 20];
    for (dst, src) in field.iter_mut().zip(name.bytes().take(19)) {
        *dst = src;
    }
    field
}

fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    write_chunk(&mut out, id(tag), payload).unwrap();
    out
}

fn list(kind: &[u8; 4], children: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    write_list(&mut out, FourCC::LIST, id(kind), children).unwrap();
    out
}

/// Writes bag and generator tables for `objects`, returning each object's first bag row.
fn zones(objects: &[&[Zone]], bags: &mut Vec<u8>, gens: &mut Vec<u8>) -> Vec<u16> {
    let mut first_bags = Vec::new();
    let mut bag_count = 0_u16;
    let mut gen_count = 0_u16;
    for zones in objects {
        first_bags.push(bag_count);
        for zone in zones.iter() {
            bags.extend_from_slice(&gen_count.to_le_bytes());
            bags.extend_from_slice(&0_u16.to_le_bytes());
            bag_count += 1;
            for &(generator_type, amount) in zone {
                gens.extend_from_slice(&generator_type.to_le_bytes());
                gens.extend_from_slice(&amount.to_le_bytes());
                gen_count += 1;
            }
        }
    }
    // Terminal bag and generator records.
    bags.extend_from_slice(&gen_count.to_le_bytes());
    bags.extend_from_slice(&0_u16.to_le_bytes());
    gens.extend_from_slice(&[0; 4]);
    first_bags.push(bag_count);
    first_bags
}

impl Sf2Builder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn preset(mut self, name: &str, bank: u16, program: u16, zones: Vec<Zone>) -> Self {
        self.presets.push((name.to_string(), bank, program, zones));
        self
    }

    pub fn instrument(mut self, name: &str, zones: Vec<Zone>) -> Self {
        self.instruments.push((name.to_string(), zones));
        self
    }

    pub fn sample(mut self, sample: TestSample) -> Self {
        self.samples.push(sample);
        self
    }

    pub fn info(&self) -> Vec<u8> {
        let mut info = chunk(b"ifil", &[2, 0, 1, 0]);
        let mut inam = self.name.as_bytes().to_vec();
        inam.push(0);
        info.extend(chunk(b"INAM", &inam));
        list(b"INFO", &info)
    }

    pub fn sdta(&self) -> Vec<u8> {
        let mut smpl = vec![0_u8; 2 * self.pool_padding];
        for sample in &self.samples {
            for frame in &sample.pcm {
                smpl.extend_from_slice(&frame.to_le_bytes());
            }
        }
        list(b"sdta", &chunk(b"smpl", &smpl))
    }

    pub fn pdta_chunks(&self) -> Vec<Vec<u8>> {
        let mut pbag = Vec::new();
        let mut pgen = Vec::new();
        let preset_zones: Vec<&[Zone]> = self.presets.iter().map(|p| p.3.as_slice()).collect();
        let preset_bags = zones(&preset_zones, &mut pbag, &mut pgen);

        let mut phdr = Vec::new();
        for (i, (name, bank, program, _)) in self.presets.iter().enumerate() {
            phdr.extend_from_slice(&name20(name));
            phdr.extend_from_slice(&program.to_le_bytes());
            phdr.extend_from_slice(&bank.to_le_bytes());
            phdr.extend_from_slice(&preset_bags[i].to_le_bytes());
            phdr.extend_from_slice(&[0; 12]);
        }
        phdr.extend_from_slice(&name20("EOP"));
        phdr.extend_from_slice(&[0; 4]);
        phdr.extend_from_slice(&preset_bags[self.presets.len()].to_le_bytes());
        phdr.extend_from_slice(&[0; 12]);

        let mut ibag = Vec::new();
        let mut igen = Vec::new();
        let instrument_zones: Vec<&[Zone]> =
            self.instruments.iter().map(|i| i.1.as_slice()).collect();
        let instrument_bags = zones(&instrument_zones, &mut ibag, &mut igen);

        let mut inst = Vec::new();
        for (i, (name, _)) in self.instruments.iter().enumerate() {
            inst.extend_from_slice(&name20(name));
            inst.extend_from_slice(&instrument_bags[i].to_le_bytes());
        }
        inst.extend_from_slice(&name20("EOI"));
        inst.extend_from_slice(&instrument_bags[self.instruments.len()].to_le_bytes());

        let mut shdr = Vec::new();
        let mut position = self.pool_padding as u32;
        for sample in &self.samples {
            let len = sample.pcm.len() as u32;
            shdr.extend_from_slice(&name20(&sample.name));
            for value in [
                position,
                position + len,
                position + sample.loop_start,
                position + sample.loop_end,
                sample.sample_rate,
            ] {
                shdr.extend_from_slice(&value.to_le_bytes());
            }
            shdr.push(sample.original_pitch);
            shdr.push(sample.pitch_correction as u8);
            shdr.extend_from_slice(&0_u16.to_le_bytes());
            shdr.extend_from_slice(&1_u16.to_le_bytes());
            position += len;
        }
        shdr.extend_from_slice(&name20("EOS"));
        shdr.extend_from_slice(&[0; 26]);

        let modulators = vec![0_u8; 10];
        vec![
            chunk(b"phdr", &phdr),
            chunk(b"pbag", &pbag),
            chunk(b"pmod", &modulators),
            chunk(b"pgen", &pgen),
            chunk(b"inst", &inst),
            chunk(b"ibag", &ibag),
            chunk(b"imod", &modulators),
            chunk(b"igen", &igen),
            chunk(b"shdr", &shdr),
        ]
    }

    pub fn pdta(&self) -> Vec<u8> {
        list(b"pdta", &self.pdta_chunks().concat())
    }

    /// Wraps already serialized sections in the `RIFF`/`sfbk` container.
    pub fn riff(kind: &[u8; 4], sections: &[Vec<u8>]) -> Vec<u8> {
        let mut out = Vec::new();
        write_list(&mut out, FourCC::RIFF, id(kind), &sections.concat()).unwrap();
        out
    }

    pub fn build(&self) -> Vec<u8> {
        Sf2Builder::riff(b"sfbk", &[self.info(), self.sdta(), self.pdta()])
    }
}
