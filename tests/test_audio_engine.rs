//! Integration tests for the audio engine state machine.
//!
//! Tests cover:
//! - At most one continuous voice, with cleanup on replace
//! - Enable/disable side effects
//! - The layered success cue
//! - Permanent degraded mode when the synth is unavailable
//! - Failure of a synth after startup

mod common;

use common::*;
use mood_journal::audio::{
    AudioEngine, AudioError, CueSpec, SoftwareSynth, ToneSpec, ToneSynth, Voice,
};
use mood_journal::mood::{Mood, Sound};
use mood_journal::storage::{KeyValueStore, CURRENT_SOUND_KEY, SOUND_ENABLED_KEY};
use std::cell::Cell;
use std::rc::Rc;

#[test]
fn test_replacing_a_tone_leaves_one_voice() {
    let storage = storage();
    let mut engine = engine(&storage);

    engine.play_sound(&Sound::Mood(Mood::Rain));
    engine.play_sound(&Sound::Mood(Mood::Dreamy));

    assert_eq!(engine.playing(), Some(&Sound::Mood(Mood::Dreamy)));
    let tones = engine.synth().unwrap().active_tones();
    assert_eq!(tones.len(), 1);
    assert_eq!(tones[0].0, ToneSpec::for_mood(Mood::Dreamy));
}

#[test]
fn test_rapid_selection_changes_do_not_leak() {
    let storage = storage();
    let mut engine = engine(&storage);

    for _ in 0..50 {
        for mood in Mood::ALL {
            engine.play_sound(&Sound::Mood(mood));
        }
    }
    assert_eq!(engine.synth().unwrap().active_tones().len(), 1);
    assert_eq!(engine.playing(), Some(&Sound::Mood(Mood::Calm)));
}

#[test]
fn test_disable_then_enable_resumes_current_sound() {
    let storage = storage();
    let mut engine = engine(&storage);
    engine.set_current_sound(Sound::Mood(Mood::Calm));
    assert_eq!(engine.playing(), Some(&Sound::Mood(Mood::Calm)));

    engine.set_sound_enabled(false);
    assert_eq!(engine.playing(), None);
    assert!(engine.synth().unwrap().active_tones().is_empty());
    assert_eq!(storage.get(SOUND_ENABLED_KEY).unwrap().as_deref(), Some("false"));

    engine.set_sound_enabled(true);
    assert_eq!(engine.playing(), Some(&Sound::Mood(Mood::Calm)));
    assert_eq!(
        engine.synth().unwrap().active_tones()[0].0,
        ToneSpec::for_mood(Mood::Calm)
    );
}

#[test]
fn test_success_cue_layers_over_tone_and_ends_itself() {
    let storage = storage();
    let mut engine = engine(&storage);
    engine.play_sound(&Sound::Mood(Mood::Dark));

    engine.play_sound(&Sound::Success);

    assert_eq!(engine.playing(), Some(&Sound::Mood(Mood::Dark)));
    assert_eq!(engine.current_sound(), &Sound::Mood(Mood::Ambient));
    assert_eq!(engine.synth().unwrap().active_tones().len(), 1);
    assert_eq!(engine.synth().unwrap().active_cues(), 1);

    render(&mut engine, CueSpec::SUCCESS.duration_secs);

    assert_eq!(engine.synth().unwrap().active_cues(), 0);
    assert_eq!(engine.playing(), Some(&Sound::Mood(Mood::Dark)));
    assert!(!storage.contains(CURRENT_SOUND_KEY));
}

#[test]
fn test_unavailable_audio_degrades_to_no_ops() {
    let storage = storage();
    let mut engine = unavailable_engine(&storage);

    assert!(engine.audio_error());
    assert!(!engine.is_available());

    for mood in Mood::ALL {
        engine.play_sound(&Sound::Mood(mood));
    }
    engine.play_sound(&Sound::Success);
    engine.resume();
    engine.stop_all_sounds();
    engine.disable();
    engine.stop_all_sounds();
    engine.enable();

    assert_eq!(engine.playing(), None);
    assert!(engine.audio_error());
}

#[test]
fn test_settings_still_persist_without_audio() {
    let storage = storage();
    let mut engine = unavailable_engine(&storage);
    engine.set_current_sound(Sound::Mood(Mood::Rain));
    engine.set_volume(0.8);
    drop(engine);

    let engine = unavailable_engine(&storage);
    assert_eq!(engine.current_sound(), &Sound::Mood(Mood::Rain));
    assert_eq!(engine.volume(), 0.8);
}

#[test]
fn test_drop_closes_the_synth() {
    let storage = storage();
    let probe = Rc::new(Cell::new(false));
    {
        let closed = Rc::clone(&probe);
        let mut engine = AudioEngine::new(Rc::clone(&storage), move || {
            Ok(FlakySynth {
                fail_after: usize::MAX,
                started: 0,
                closed,
            })
        });
        engine.play_sound(&Sound::Mood(Mood::Calm));
    }
    assert!(probe.get());
}

#[test]
fn test_failed_synthesis_disables_audio_for_good() {
    let storage = storage();
    let closed = Rc::new(Cell::new(false));
    let probe = Rc::clone(&closed);
    let mut engine = AudioEngine::new(Rc::clone(&storage), move || {
        Ok(FlakySynth {
            fail_after: 1,
            started: 0,
            closed,
        })
    });

    engine.play_sound(&Sound::Mood(Mood::Ambient));
    assert_eq!(engine.playing(), Some(&Sound::Mood(Mood::Ambient)));

    engine.play_sound(&Sound::Mood(Mood::Rain));
    assert!(engine.audio_error());
    assert!(!engine.is_available());
    assert_eq!(engine.playing(), None);
    assert!(probe.get());

    engine.play_sound(&Sound::Mood(Mood::Calm));
    assert_eq!(engine.playing(), None);
}

#[test]
fn test_engine_with_config_disabled_output_is_unavailable() {
    use mood_journal::config::{AudioConfig, AudioOutput};

    let storage = storage();
    let config = AudioConfig {
        output: AudioOutput::None,
        ..AudioConfig::default()
    };
    let engine: Engine = AudioEngine::new(Rc::clone(&storage), || SoftwareSynth::open(&config));
    assert!(engine.audio_error());
}

/// Starts `fail_after` voices, then fails every synthesis call.
struct FlakySynth {
    fail_after: usize,
    started: usize,
    closed: Rc<Cell<bool>>,
}

struct NullVoice;

impl Voice for NullVoice {
    fn set_gain(&mut self, _gain: f32) {}
}

impl ToneSynth for FlakySynth {
    type Voice = NullVoice;

    fn start_tone(&mut self, _tone: &ToneSpec, _gain: f32) -> Result<NullVoice, AudioError> {
        if self.started >= self.fail_after {
            return Err(AudioError::Unavailable("device lost".into()));
        }
        self.started += 1;
        Ok(NullVoice)
    }

    fn play_cue(&mut self, _cue: &CueSpec, _gain: f32) -> Result<(), AudioError> {
        Ok(())
    }

    fn close(&mut self) {
        self.closed.set(true);
    }
}
