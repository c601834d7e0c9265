//! What each screen does in response to the user. Rendering lives in `ui`;
//! the stores are handed in by the caller.

use crate::audio::{AudioEngine, AudioError, SoftwareSynth, ToneSynth};
use crate::journal::{JournalEntry, JournalStore, SaveOutcome};
use crate::mood::{Mood, Sound};
use crate::preferences::{FontFamily, Preferences};
use crate::prompts::{random_quote, MemoryPrompt, Quote};
use crate::storage::KeyValueStore;
use chrono::Local;
use std::path::{Path, PathBuf};

pub const VOLUME_STEP: f32 = 0.05;
pub const BOUNCE_SECS: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Journal,
    Memories,
    Settings,
    Quit,
}

pub struct HomeScreen {
    pub quote: &'static Quote,
}

impl HomeScreen {
    pub fn open() -> Self {
        HomeScreen {
            quote: random_quote(),
        }
    }
}

/// The editor plus the list of previous entries.
pub struct JournalScreen {
    mood: Mood,
    filter: String,
}

impl JournalScreen {
    pub fn open<K: KeyValueStore, S: ToneSynth>(
        audio: &mut AudioEngine<K, S>,
        prefs: &Preferences<K>,
    ) -> Self {
        if !audio.audio_error() {
            audio.play_sound(&Sound::Mood(Mood::Ambient));
        }
        JournalScreen {
            mood: prefs.theme(),
            filter: String::new(),
        }
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_filter(&mut self, query: &str) {
        self.filter = query.to_string();
    }

    /// The entry list, newest first, narrowed to the filter when one is set.
    pub fn visible_entries<'a, K: KeyValueStore>(
        &self,
        journal: &'a JournalStore<K>,
    ) -> Vec<&'a JournalEntry> {
        let query = self.filter.trim();
        if query.is_empty() {
            return journal.entries_newest_first().collect();
        }
        let mut hits = journal.search(query);
        hits.reverse();
        hits
    }

    pub fn change_mood<K: KeyValueStore, S: ToneSynth>(
        &mut self,
        audio: &mut AudioEngine<K, S>,
        prefs: &mut Preferences<K>,
        mood: Mood,
    ) {
        self.mood = mood;
        prefs.set_theme(mood);
        audio.play_sound(&Sound::Mood(mood));
    }

    /// Loads an entry into the editor and switches to its mood.
    pub fn edit_entry<K: KeyValueStore, S: ToneSynth>(
        &mut self,
        journal: &mut JournalStore<K>,
        audio: &mut AudioEngine<K, S>,
        prefs: &mut Preferences<K>,
        id: &str,
    ) -> bool {
        match journal.begin_edit(id) {
            Some(mood) => {
                self.change_mood(audio, prefs, mood);
                true
            }
            None => false,
        }
    }

    pub fn cancel_edit<K: KeyValueStore>(&self, journal: &mut JournalStore<K>) {
        journal.reset_editor();
    }

    /// Saves the draft under the selected mood and chimes on success.
    pub fn save<K: KeyValueStore, S: ToneSynth>(
        &self,
        journal: &mut JournalStore<K>,
        audio: &mut AudioEngine<K, S>,
    ) -> SaveOutcome {
        let outcome = journal.save_current(self.mood);
        if matches!(outcome, SaveOutcome::Created(_) | SaveOutcome::Updated(_)) {
            audio.play_sound(&Sound::Success);
        }
        outcome
    }

    pub fn delete_entry<K: KeyValueStore>(&self, journal: &mut JournalStore<K>, id: &str) -> bool {
        journal.delete(id)
    }
}

pub struct MemoriesScreen;

impl MemoriesScreen {
    pub fn open<K: KeyValueStore, S: ToneSynth>(audio: &mut AudioEngine<K, S>) -> Self {
        if !audio.audio_error() {
            audio.play_sound(&Sound::Mood(Mood::Ambient));
        }
        MemoriesScreen
    }

    /// Starts a fresh draft answering `prompt` and moves to the editor.
    pub fn select<K: KeyValueStore, S: ToneSynth>(
        &self,
        journal: &mut JournalStore<K>,
        audio: &mut AudioEngine<K, S>,
        prefs: &mut Preferences<K>,
        prompt: &MemoryPrompt,
    ) -> Screen {
        journal.set_draft("", prompt.prompt);
        prefs.set_theme(prompt.mood);
        audio.play_sound(&Sound::Mood(prompt.mood));
        Screen::Journal
    }
}

pub struct SettingsScreen;

impl SettingsScreen {
    pub fn toggle_sound<K: KeyValueStore, S: ToneSynth>(&self, audio: &mut AudioEngine<K, S>) {
        let enabled = !audio.sound_enabled();
        audio.set_sound_enabled(enabled);
    }

    pub fn select_sound<K: KeyValueStore, S: ToneSynth>(
        &self,
        audio: &mut AudioEngine<K, S>,
        mood: Mood,
    ) {
        audio.set_current_sound(Sound::Mood(mood));
    }

    pub fn nudge_volume<K: KeyValueStore, S: ToneSynth>(
        &self,
        audio: &mut AudioEngine<K, S>,
        steps: i32,
    ) {
        let volume = audio.volume() + VOLUME_STEP * steps as f32;
        // Snap to the step grid so repeated nudges do not drift.
        audio.set_volume((volume / VOLUME_STEP).round() * VOLUME_STEP);
    }

    pub fn set_vibe<K: KeyValueStore, S: ToneSynth>(
        &self,
        audio: &mut AudioEngine<K, S>,
        prefs: &mut Preferences<K>,
        mood: Mood,
    ) {
        prefs.set_theme(mood);
        if audio.sound_enabled() && !audio.audio_error() {
            audio.play_sound(&Sound::Mood(mood));
        }
    }

    /// Removes every entry and the draft, then returns to the home screen.
    /// The caller confirms with the user first.
    pub fn clear_entries<K: KeyValueStore>(&self, journal: &mut JournalStore<K>) -> Screen {
        journal.clear_all();
        Screen::Home
    }

    pub fn toggle_font<K: KeyValueStore>(&self, prefs: &mut Preferences<K>) -> FontFamily {
        let font = prefs.font().toggled();
        prefs.set_font(font);
        font
    }

    /// Writes the current soundscape to a timestamped WAV file in `dir`.
    pub fn bounce<K: KeyValueStore>(
        &self,
        audio: &AudioEngine<K, SoftwareSynth>,
        dir: &Path,
    ) -> Result<PathBuf, AudioError> {
        let synth = audio
            .synth()
            .ok_or_else(|| AudioError::Unavailable("no synthesizer to bounce".into()))?;
        let path = dir.join(format!(
            "soundscape-{}.wav",
            Local::now().format("%Y%m%d-%H%M%S")
        ));
        synth.bounce_to_wav(&path, BOUNCE_SECS)?;
        Ok(path)
    }
}
