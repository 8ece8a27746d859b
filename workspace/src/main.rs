use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use sf2synth::InstrumentParams;
use sf2synth_midi::{MidiDecoder, MidiFile, MidiFilePlayer, MidiListener};
use sf2synth_soundfont::{LoadSettings, Resolution, SoundFont, ZoneResolver};
use std::cell::Cell;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::rc::Rc;

const PERCUSSION_CHANNEL: u8 = 9;
const PERCUSSION_BANK: u16 = 128;
/// Clock step used when replaying a MIDI file.
const TICK_SECONDS: f64 = 0.01;

#[derive(Parser)]
#[command(name = "sf2synth")]
#[command(author, version, about = "Inspect a SoundFont and resolve notes against it", long_about = None)]
struct Args {
    /// The SoundFont (.sf2) to load
    soundfont: PathBuf,

    /// Replay a MIDI file, resolving every note against the bank
    #[arg(short, long)]
    midi: Option<PathBuf>,

    #[arg(long, default_value = "0")]
    bank: u16,

    #[arg(short, long, default_value = "0")]
    program: u16,

    #[arg(short, long, default_value = "60")]
    key: u8,

    #[arg(long, default_value = "100")]
    velocity: u8,

    /// Samples below this rate are upsampled on load
    #[arg(long, default_value = "22050")]
    min_sample_rate: u32,

    /// Print the whole preset table
    #[arg(long)]
    list: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let data = std::fs::read(&args.soundfont)
        .with_context(|| format!("cannot read {}", args.soundfont.display()))?;

    let settings = LoadSettings {
        minimum_sample_rate: args.min_sample_rate,
        ..LoadSettings::new()
    };
    let sound_font = SoundFont::parse_with(&data, &settings)
        .with_context(|| format!("cannot load {}", args.soundfont.display()))?;

    print_info(&sound_font, args.list);

    let resolver = Rc::new(ZoneResolver::new(sound_font));
    match resolver.resolve(args.bank, args.program, args.key, args.velocity)? {
        Resolution::Found(params) => print_params(&params),
        Resolution::PresetNotFound => {
            println!("no preset at bank {} program {}", args.bank, args.program)
        }
        Resolution::InstrumentZoneNotFound => println!(
            "no zone covers key {} velocity {}",
            args.key, args.velocity
        ),
    }

    if let Some(path) = &args.midi {
        replay(resolver, path)?;
    }

    Ok(())
}

fn print_info(sound_font: &SoundFont, list: bool) {
    for (field, value) in sound_font.info.iter() {
        println!("{field:>14}: {value}");
    }
    println!(
        "{} presets, {} instruments, {} samples",
        sound_font.presets().len(),
        sound_font.instruments.len().saturating_sub(1),
        sound_font.sample_headers.len().saturating_sub(1)
    );

    if list {
        for (bank, programs) in sound_font.preset_names() {
            for (program, name) in programs {
                println!("{bank:03}:{program:03} {name}");
            }
        }
    }
}

fn print_params(params: &InstrumentParams) {
    println!("sample      : {} (#{})", params.sample_name, params.sample_id);
    println!(
        "frames      : {}..{} loop {}..{} ({:?})",
        params.start, params.end, params.loop_start, params.loop_end, params.sample_modes
    );
    println!("sample rate : {} Hz", params.sample_rate);
    println!(
        "pitch       : tune {:+.2} base {:+.2} scale {:.2}",
        params.tune, params.base_pitch, params.scale_tuning
    );
    println!(
        "volume env  : delay {:.3}s attack {:.3}s hold {:.3}s decay {:.3}s sustain {:.3} release {:.3}s",
        params.volume.delay,
        params.volume.attack,
        params.volume.hold,
        params.volume.decay,
        params.volume.sustain,
        params.volume.release
    );
    println!(
        "filter      : fc {} q {} attenuation {}",
        params.initial_filter_fc, params.initial_filter_q, params.initial_attenuation
    );
    if let Some(pan) = params.pan {
        println!("pan         : {pan}");
    }
}

/// Resolves every note-on of a MIDI stream, following program changes.
struct NoteResolver {
    resolver: Rc<ZoneResolver>,
    programs: [u8; 16],
    resolved: Rc<Cell<usize>>,
    missed: Rc<Cell<usize>>,
}

impl NoteResolver {
    fn bank(channel: u8) -> u16 {
        if channel == PERCUSSION_CHANNEL {
            PERCUSSION_BANK
        } else {
            0
        }
    }
}

impl MidiListener for NoteResolver {
    fn note_on(&mut self, channel: u8, key: u8, velocity: u8) {
        let program = self.programs[channel as usize];
        let bank = NoteResolver::bank(channel);
        match self.resolver.resolve(bank, program as u16, key, velocity) {
            Ok(Resolution::Found(params)) => {
                debug!(
                    "ch{channel} key {key} -> '{}' at rate {:.4}",
                    params.sample_name,
                    params.playback_rate(key as f64)
                );
                self.resolved.set(self.resolved.get() + 1);
            }
            Ok(_) => self.missed.set(self.missed.get() + 1),
            Err(err) => {
                warn!("ch{channel} key {key}: {err}");
                self.missed.set(self.missed.get() + 1);
            }
        }
    }

    fn program_change(&mut self, channel: u8, program: u8) {
        self.programs[channel as usize] = program;
    }

    fn reset_all_control(&mut self, channel: u8) {
        self.programs[channel as usize] = 0;
    }
}

fn replay(resolver: Rc<ZoneResolver>, path: &Path) -> Result<()> {
    let mut file =
        File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let midi_file = MidiFile::new(&mut file)?;
    info!(
        "replaying {} ({:.1}s, {} messages)",
        path.display(),
        midi_file.length(),
        midi_file.messages().len()
    );

    let resolved = Rc::new(Cell::new(0));
    let missed = Rc::new(Cell::new(0));
    let decoder = MidiDecoder::with_listener(NoteResolver {
        resolver,
        programs: [0; 16],
        resolved: resolved.clone(),
        missed: missed.clone(),
    });

    let mut player = MidiFilePlayer::new(decoder, midi_file);
    while !player.end_of_sequence() {
        player.advance(TICK_SECONDS);
    }

    println!(
        "{}: {} notes resolved, {} without a matching zone",
        path.display(),
        resolved.get(),
        missed.get()
    );
    Ok(())
}
