mod common;

use common::{Sf2Builder, TestSample, range, signed};
use sf2synth::{LoopMode, SoundSource};
use sf2synth_soundfont::{GeneratorType, Resolution, SoundFont, SoundFontError, ZoneResolver};

fn resolver(builder: &Sf2Builder) -> ZoneResolver {
    ZoneResolver::new(SoundFont::parse(&builder.build()).unwrap())
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn layered() -> Sf2Builder {
    Sf2Builder::new("Layered")
        .preset("Lead", 0, 0, vec![vec![(GeneratorType::INSTRUMENT, 0)]])
        .instrument(
            "Lead",
            vec![
                vec![
                    (GeneratorType::PAN, signed(10)),
                    (GeneratorType::ATTACK_VOLUME_ENVELOPE, signed(1200)),
                ],
                vec![
                    (GeneratorType::KEY_RANGE, range(60, 72)),
                    (GeneratorType::SAMPLE_ID, 0),
                ],
                vec![
                    (GeneratorType::KEY_RANGE, range(0, 59)),
                    (GeneratorType::VELOCITY_RANGE, range(0, 63)),
                    (GeneratorType::PAN, signed(-5)),
                    (GeneratorType::SAMPLE_ID, 1),
                ],
            ],
        )
        .sample(TestSample::new("High", vec![0; 8], 44100))
        .sample(TestSample::new("Low", vec![0; 8], 44100))
}

#[test]
fn global_zone_values_apply_unless_overridden() {
    let resolver = resolver(&layered());

    let high = resolver.resolve(0, 0, 64, 100).unwrap().found().unwrap();
    assert_eq!(high.sample_name, "High");
    assert_eq!(high.pan, Some(10));
    assert_close(high.volume.attack, 2.0);
    assert_eq!(high.key_range, (60, 72));
    assert_eq!(high.vel_range, (0, 127));

    let low = resolver.resolve(0, 0, 40, 30).unwrap().found().unwrap();
    assert_eq!(low.sample_name, "Low");
    assert_eq!(low.pan, Some(-5));
    assert_close(low.volume.attack, 2.0);
    assert_eq!(low.vel_range, (0, 63));
}

#[test]
fn key_and_velocity_ranges_are_inclusive() {
    let resolver = resolver(&layered());

    for key in [60, 72] {
        let found = resolver.resolve(0, 0, key, 100).unwrap().found().unwrap();
        assert_eq!(found.sample_name, "High");
    }
    assert_eq!(
        resolver.resolve(0, 0, 73, 100).unwrap(),
        Resolution::InstrumentZoneNotFound
    );
    assert_eq!(
        resolver.resolve(0, 0, 59, 100).unwrap(),
        Resolution::InstrumentZoneNotFound
    );

    let low = resolver.resolve(0, 0, 59, 63).unwrap().found().unwrap();
    assert_eq!(low.sample_name, "Low");
    assert!(resolver.resolve(0, 0, 59, 0).unwrap().is_found());
    assert!(resolver.resolve(0, 0, 60, 0).unwrap().is_found());
    assert!(resolver.resolve(0, 0, 60, 127).unwrap().is_found());
}

#[test]
fn unknown_presets_are_not_found() {
    let resolver = resolver(&layered());
    assert_eq!(
        resolver.resolve(1, 0, 60, 100).unwrap(),
        Resolution::PresetNotFound
    );
    assert_eq!(
        resolver.resolve(0, 1, 60, 100).unwrap(),
        Resolution::PresetNotFound
    );
}

#[test]
fn the_terminal_preset_is_not_selectable() {
    let builder = Sf2Builder::new("Empty")
        .preset("Only", 0, 5, vec![vec![(GeneratorType::INSTRUMENT, 0)]])
        .instrument("Only", vec![vec![(GeneratorType::SAMPLE_ID, 0)]])
        .sample(TestSample::new("Only", vec![0; 4], 44100));
    let resolver = resolver(&builder);

    assert_eq!(resolver.find_preset(0, 0), None);
    assert_eq!(resolver.find_preset(0, 5), Some(0));
}

#[test]
fn first_matching_preset_wins() {
    let builder = Sf2Builder::new("Duplicates")
        .preset("First", 0, 0, vec![vec![(GeneratorType::INSTRUMENT, 0)]])
        .preset("Second", 0, 0, vec![vec![(GeneratorType::INSTRUMENT, 1)]])
        .instrument("A", vec![vec![(GeneratorType::SAMPLE_ID, 0)]])
        .instrument("B", vec![vec![(GeneratorType::SAMPLE_ID, 1)]])
        .sample(TestSample::new("A", vec![0; 4], 44100))
        .sample(TestSample::new("B", vec![0; 4], 44100));
    let resolver = resolver(&builder);

    assert_eq!(resolver.find_preset(0, 0), Some(0));
    let found = resolver.resolve_default(0, 0, 60).unwrap().found().unwrap();
    assert_eq!(found.sample_name, "A");
}

#[test]
fn the_last_preset_generator_selects_the_instrument() {
    let builder = Sf2Builder::new("Zones")
        .preset(
            "Split",
            0,
            0,
            vec![
                vec![(GeneratorType::INSTRUMENT, 0)],
                vec![(GeneratorType::INSTRUMENT, 1)],
            ],
        )
        .instrument("A", vec![vec![(GeneratorType::SAMPLE_ID, 0)]])
        .instrument("B", vec![vec![(GeneratorType::SAMPLE_ID, 1)]])
        .sample(TestSample::new("A", vec![0; 4], 44100))
        .sample(TestSample::new("B", vec![0; 4], 44100));
    let resolver = resolver(&builder);

    let found = resolver.resolve(0, 0, 60, 100).unwrap().found().unwrap();
    assert_eq!(found.sample_name, "B");
    assert_eq!(found.sample_id, 1);
}

#[test]
fn computes_pitch_and_envelopes() {
    let mut sample = TestSample::new("Tone", vec![0; 8], 44100);
    sample.original_pitch = 60;
    sample.pitch_correction = -10;
    let builder = Sf2Builder::new("Pitch")
        .preset("Tone", 0, 0, vec![vec![(GeneratorType::INSTRUMENT, 0)]])
        .instrument(
            "Tone",
            vec![vec![
                (GeneratorType::FREQUENCY_VIBRATO_LFO, 0),
                (GeneratorType::SUSTAIN_VOLUME_ENVELOPE, signed(500)),
                (GeneratorType::COARSE_TUNE, signed(2)),
                (GeneratorType::FINE_TUNE, signed(50)),
                (GeneratorType::SAMPLE_ID, 0),
            ]],
        )
        .sample(sample);
    let params = resolver(&builder)
        .resolve(0, 0, 60, 100)
        .unwrap()
        .found()
        .unwrap();

    assert_close(params.tune, 2.5);
    assert_close(params.base_pitch, 2.5 - 0.1 - 60.0);
    assert_close(params.scale_tuning, 1.0);
    assert_close(params.playback_rate(60.0), 2_f64.powf(2.4 / 12.0));

    assert_close(params.volume.sustain, 0.5);
    assert_close(params.volume.release, 2_f64.powf(-10.0));
    assert_close(params.volume.delay, 2_f64.powf(-10.0));
    assert_close(params.modulation.sustain, 0.0);
    assert_close(params.freq_vibrato_lfo.unwrap(), 8.176);
    assert_eq!(params.pan, None);

    assert_eq!(params.initial_filter_fc, 13500);
    assert_eq!(params.initial_filter_q, 1);
    assert_eq!(params.key_range, (0, 127));
    assert_eq!(params.sample_rate, 44100);
}

#[test]
fn overriding_root_key_replaces_the_original_pitch() {
    let builder = Sf2Builder::new("Root")
        .preset("Tone", 0, 0, vec![vec![(GeneratorType::INSTRUMENT, 0)]])
        .instrument(
            "Tone",
            vec![
                vec![
                    (GeneratorType::KEY_RANGE, range(0, 63)),
                    (GeneratorType::OVERRIDING_ROOT_KEY, 72),
                    (GeneratorType::SAMPLE_ID, 0),
                ],
                vec![
                    (GeneratorType::KEY_RANGE, range(64, 127)),
                    (GeneratorType::OVERRIDING_ROOT_KEY, signed(-1)),
                    (GeneratorType::SAMPLE_ID, 0),
                ],
            ],
        )
        .sample(TestSample::new("Tone", vec![0; 8], 44100));
    let resolver = resolver(&builder);

    let low = resolver.resolve(0, 0, 60, 100).unwrap().found().unwrap();
    assert_close(low.base_pitch, -72.0);
    assert_close(low.playback_rate(72.0), 1.0);

    let high = resolver.resolve(0, 0, 80, 100).unwrap().found().unwrap();
    assert_close(high.base_pitch, -60.0);
}

#[test]
fn loop_points_are_relative_to_the_sample() {
    let mut sample = TestSample::new("Loop", vec![0; 8], 44100);
    sample.loop_start = 2;
    sample.loop_end = 6;
    let mut builder = Sf2Builder::new("Loops")
        .preset("Loop", 0, 0, vec![vec![(GeneratorType::INSTRUMENT, 0)]])
        .instrument(
            "Loop",
            vec![vec![
                (GeneratorType::START_LOOP_ADDRESS_OFFSET, 1),
                (GeneratorType::END_LOOP_ADDRESS_OFFSET, signed(-1)),
                (GeneratorType::END_ADDRESS_OFFSET, 100),
                (GeneratorType::SAMPLE_MODES, 1),
                (GeneratorType::SAMPLE_ID, 0),
            ]],
        )
        .sample(sample);
    builder.pool_padding = 10;
    let params = resolver(&builder)
        .resolve(0, 0, 60, 100)
        .unwrap()
        .found()
        .unwrap();

    assert_eq!(params.start, 0);
    assert_eq!(params.end, 8);
    assert_eq!(params.loop_start, 3);
    assert_eq!(params.loop_end, 5);
    assert_eq!(params.sample_modes, LoopMode::Continuous);
    assert!(params.loops());
    assert_eq!(params.len(), 8);
}

#[test]
fn address_offsets_follow_upsampling() {
    let mut sample = TestSample::new("Slow", vec![0; 8], 11025);
    sample.loop_start = 2;
    sample.loop_end = 6;
    let mut builder = Sf2Builder::new("Slow")
        .preset("Slow", 0, 0, vec![vec![(GeneratorType::INSTRUMENT, 0)]])
        .instrument(
            "Slow",
            vec![vec![
                (GeneratorType::START_LOOP_ADDRESS_OFFSET, 1),
                (GeneratorType::END_LOOP_ADDRESS_OFFSET, signed(-1)),
                (GeneratorType::SAMPLE_ID, 0),
            ]],
        )
        .sample(sample);
    builder.pool_padding = 4;
    let params = resolver(&builder)
        .resolve(0, 0, 60, 100)
        .unwrap()
        .found()
        .unwrap();

    assert_eq!(params.sample_rate, 22050);
    assert_eq!(params.sample.len(), 16);
    assert_eq!(params.end, 16);
    assert_eq!(params.loop_start, 6);
    assert_eq!(params.loop_end, 10);
    assert_eq!(params.sample_modes, LoopMode::NoLoop);
    assert!(!params.loops());
}

#[test]
fn a_preset_without_an_instrument_is_malformed() {
    let builder = Sf2Builder::new("Broken")
        .preset("Broken", 0, 0, vec![vec![(GeneratorType::PAN, 0)]])
        .instrument("Unused", vec![vec![(GeneratorType::SAMPLE_ID, 0)]])
        .sample(TestSample::new("Unused", vec![0; 4], 44100));

    assert!(matches!(
        resolver(&builder).resolve(0, 0, 60, 100),
        Err(SoundFontError::InvalidPresetGenerator(0))
    ));
}

#[test]
fn a_matching_zone_without_a_sample_is_malformed() {
    let builder = Sf2Builder::new("Broken")
        .preset("Broken", 0, 0, vec![vec![(GeneratorType::INSTRUMENT, 0)]])
        .instrument(
            "Broken",
            vec![
                vec![(GeneratorType::PAN, 0)],
                vec![
                    (GeneratorType::KEY_RANGE, range(0, 127)),
                    (GeneratorType::PAN, signed(3)),
                ],
            ],
        )
        .sample(TestSample::new("Unused", vec![0; 4], 44100));

    assert!(matches!(
        resolver(&builder).resolve(0, 0, 60, 100),
        Err(SoundFontError::InvalidInstrumentGenerator(0))
    ));
}

#[test]
fn dangling_references_are_malformed() {
    let builder = Sf2Builder::new("Dangling")
        .preset("NoInstrument", 0, 0, vec![vec![(GeneratorType::INSTRUMENT, 5)]])
        .preset("NoSample", 0, 1, vec![vec![(GeneratorType::INSTRUMENT, 0)]])
        .instrument("NoSample", vec![vec![(GeneratorType::SAMPLE_ID, 9)]])
        .sample(TestSample::new("Unused", vec![0; 4], 44100));
    let resolver = resolver(&builder);

    assert!(matches!(
        resolver.resolve(0, 0, 60, 100),
        Err(SoundFontError::InvalidInstrumentId {
            preset_id: 0,
            instrument_id: 5
        })
    ));
    assert!(matches!(
        resolver.resolve(0, 1, 60, 100),
        Err(SoundFontError::InvalidSampleId {
            instrument_id: 0,
            sample_id: 9
        })
    ));
}

#[test]
fn every_preset_of_a_well_formed_bank_resolves() {
    let builder = layered()
        .preset("Lead 2", 0, 1, vec![vec![(GeneratorType::INSTRUMENT, 0)]])
        .preset("Drums", 128, 0, vec![vec![(GeneratorType::INSTRUMENT, 0)]]);
    let resolver = resolver(&builder);

    for preset in resolver.sound_font().presets() {
        for key in 0..=127 {
            for velocity in [0, 63, 64, 127] {
                let result = resolver.resolve(preset.bank, preset.program, key, velocity);
                assert!(result.is_ok(), "{} key {key}: {result:?}", preset.name);
            }
        }
    }
}

#[test]
fn resolution_is_repeatable() {
    let resolver = resolver(&layered());
    let first = resolver.resolve(0, 0, 64, 100).unwrap();
    let second = resolver.resolve(0, 0, 64, 100).unwrap();
    assert_eq!(first, second);
}

#[test]
fn resolves_through_the_sound_source_trait() {
    let source: Box<dyn SoundSource> = Box::new(ZoneResolver::from(
        SoundFont::parse(&layered().build()).unwrap(),
    ));

    let params = source.resolve(0, 0, 64, 100).unwrap();
    assert_eq!(params.map(|p| p.sample_name), Some("High".to_string()));
    assert!(source.resolve(3, 3, 64, 100).unwrap().is_none());
}
