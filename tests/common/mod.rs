#![allow(dead_code)]

use mood_journal::audio::{AudioEngine, AudioError, SoftwareSynth};
use mood_journal::journal::JournalStore;
use mood_journal::preferences::Preferences;
use mood_journal::storage::MemoryStore;
use std::rc::Rc;

pub type Storage = Rc<MemoryStore>;
pub type Engine = AudioEngine<Storage, SoftwareSynth>;

pub const TEST_SAMPLE_RATE: u32 = 8_000;

pub fn storage() -> Storage {
    Rc::new(MemoryStore::new())
}

pub fn journal(storage: &Storage) -> JournalStore<Storage> {
    JournalStore::load(Rc::clone(storage))
}

pub fn engine(storage: &Storage) -> Engine {
    AudioEngine::new(Rc::clone(storage), || {
        SoftwareSynth::with_sample_rate(TEST_SAMPLE_RATE)
    })
}

pub fn unavailable_engine(storage: &Storage) -> Engine {
    AudioEngine::new(Rc::clone(storage), || {
        Err(AudioError::Unavailable("no audio device in tests".into()))
    })
}

pub fn prefs(storage: &Storage) -> Preferences<Storage> {
    Preferences::load(Rc::clone(storage))
}

/// Advances the synth by `secs` of audio.
pub fn render(engine: &mut Engine, secs: f32) {
    if let Some(synth) = engine.synth_mut() {
        let frames = (secs * synth.sample_rate() as f32).round() as usize;
        let mut out = vec![0.0f32; frames];
        synth.render(&mut out);
    }
}
