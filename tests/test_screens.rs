//! Integration tests for the screen controllers.
//!
//! Tests cover:
//! - Picking a memory prompt starts a themed draft
//! - Saving chimes over the running tone
//! - Editing an entry adopts its mood
//! - Settings changes persist and drive playback
//! - Filtering the entry list and clearing the journal

mod common;

use common::*;
use mood_journal::journal::SaveOutcome;
use mood_journal::mood::{Mood, Sound};
use mood_journal::preferences::FontFamily;
use mood_journal::prompts::find_prompt;
use mood_journal::screens::{
    JournalScreen, MemoriesScreen, Screen, SettingsScreen, BOUNCE_SECS,
};
use mood_journal::storage::{KeyValueStore, DRAFT_KEY, ENTRIES_KEY, THEME_KEY};
use pretty_assertions::assert_eq;

#[test]
fn test_memory_prompt_starts_themed_draft() {
    let storage = storage();
    let mut journal = journal(&storage);
    let mut audio = engine(&storage);
    let mut prefs = prefs(&storage);
    journal.set_draft("leftover text", "");

    let memories = MemoriesScreen::open(&mut audio);
    assert_eq!(audio.playing(), Some(&Sound::Mood(Mood::Ambient)));

    let prompt = find_prompt("solitude").unwrap();
    let next = memories.select(&mut journal, &mut audio, &mut prefs, prompt);

    assert_eq!(next, Screen::Journal);
    assert_eq!(journal.current_content(), "");
    assert_eq!(journal.current_prompt(), prompt.prompt);
    assert_eq!(prefs.theme(), Mood::Dark);
    assert_eq!(audio.playing(), Some(&Sound::Mood(Mood::Dark)));
    assert_eq!(storage.get(THEME_KEY).unwrap().as_deref(), Some("dark"));

    let screen = JournalScreen::open(&mut audio, &prefs);
    assert_eq!(screen.mood(), Mood::Dark);
}

#[test]
fn test_save_chimes_and_keeps_tone() {
    let storage = storage();
    let mut journal = journal(&storage);
    let mut audio = engine(&storage);
    let mut prefs = prefs(&storage);

    let mut screen = JournalScreen::open(&mut audio, &prefs);
    screen.change_mood(&mut audio, &mut prefs, Mood::Rain);
    journal.set_current_content("Listening to the gutters overflow.");

    let SaveOutcome::Created(id) = screen.save(&mut journal, &mut audio) else {
        panic!("expected a new entry");
    };
    assert_eq!(journal.get(&id).unwrap().mood, Mood::Rain);
    assert_eq!(audio.playing(), Some(&Sound::Mood(Mood::Rain)));
    assert_eq!(audio.synth().unwrap().active_cues(), 1);
}

#[test]
fn test_rejected_save_stays_silent() {
    let storage = storage();
    let mut journal = journal(&storage);
    let mut audio = engine(&storage);
    let prefs = prefs(&storage);

    let screen = JournalScreen::open(&mut audio, &prefs);
    journal.set_current_content("   ");

    assert_eq!(screen.save(&mut journal, &mut audio), SaveOutcome::Rejected);
    assert_eq!(audio.synth().unwrap().active_cues(), 0);
    assert!(journal.is_empty());
}

#[test]
fn test_edit_entry_switches_mood_and_updates_in_place() {
    let storage = storage();
    let mut journal = journal(&storage);
    let mut audio = engine(&storage);
    let mut prefs = prefs(&storage);
    let id = journal.create("stormy night", Mood::Dark, None).unwrap();

    let mut screen = JournalScreen::open(&mut audio, &prefs);
    assert!(screen.edit_entry(&mut journal, &mut audio, &mut prefs, &id));
    assert_eq!(screen.mood(), Mood::Dark);
    assert_eq!(audio.playing(), Some(&Sound::Mood(Mood::Dark)));
    assert_eq!(journal.current_content(), "stormy night");

    journal.set_current_content("stormy night, then calm");
    assert_eq!(
        screen.save(&mut journal, &mut audio),
        SaveOutcome::Updated(id.clone())
    );
    assert_eq!(journal.len(), 1);
    assert_eq!(journal.editing_entry_id(), None);

    assert!(!screen.edit_entry(&mut journal, &mut audio, &mut prefs, "missing"));
}

#[test]
fn test_deleting_the_edited_entry_resets_editor() {
    let storage = storage();
    let mut journal = journal(&storage);
    let mut audio = engine(&storage);
    let mut prefs = prefs(&storage);
    let id = journal.create("to be removed", Mood::Calm, None).unwrap();

    let mut screen = JournalScreen::open(&mut audio, &prefs);
    screen.edit_entry(&mut journal, &mut audio, &mut prefs, &id);
    assert!(screen.delete_entry(&mut journal, &id));

    assert_eq!(journal.editing_entry_id(), None);
    assert_eq!(journal.current_content(), "");
}

#[test]
fn test_screens_skip_playback_without_audio() {
    let storage = storage();
    let mut journal = journal(&storage);
    let mut audio = unavailable_engine(&storage);
    let mut prefs = prefs(&storage);

    let memories = MemoriesScreen::open(&mut audio);
    let prompt = find_prompt("gratitude").unwrap();
    memories.select(&mut journal, &mut audio, &mut prefs, prompt);
    assert_eq!(prefs.theme(), Mood::Calm);

    let screen = JournalScreen::open(&mut audio, &prefs);
    journal.set_current_content("still saved");
    assert!(matches!(
        screen.save(&mut journal, &mut audio),
        SaveOutcome::Created(_)
    ));
    assert_eq!(audio.playing(), None);
}

#[test]
fn test_settings_sound_controls() {
    let storage = storage();
    let mut audio = engine(&storage);
    let settings = SettingsScreen;

    settings.select_sound(&mut audio, Mood::Dreamy);
    assert_eq!(audio.current_sound(), &Sound::Mood(Mood::Dreamy));
    assert_eq!(audio.playing(), Some(&Sound::Mood(Mood::Dreamy)));

    settings.toggle_sound(&mut audio);
    assert!(!audio.sound_enabled());
    assert_eq!(audio.playing(), None);

    settings.toggle_sound(&mut audio);
    assert_eq!(audio.playing(), Some(&Sound::Mood(Mood::Dreamy)));

    settings.nudge_volume(&mut audio, 1);
    assert!((audio.volume() - 0.35).abs() < 1e-4);
    for _ in 0..40 {
        settings.nudge_volume(&mut audio, -1);
    }
    assert_eq!(audio.volume(), 0.0);
}

#[test]
fn test_settings_vibe_and_font() {
    let storage = storage();
    let mut audio = engine(&storage);
    let mut prefs = prefs(&storage);
    let settings = SettingsScreen;

    settings.set_vibe(&mut audio, &mut prefs, Mood::Calm);
    assert_eq!(prefs.theme(), Mood::Calm);
    assert_eq!(audio.playing(), Some(&Sound::Mood(Mood::Calm)));
    assert_eq!(audio.current_sound(), &Sound::Mood(Mood::Ambient));

    assert_eq!(settings.toggle_font(&mut prefs), FontFamily::Sans);
    assert_eq!(prefs.font(), FontFamily::Sans);
    let reloaded = mood_journal::preferences::Preferences::load(std::rc::Rc::clone(&storage));
    assert_eq!(reloaded.font(), FontFamily::Sans);
    assert_eq!(reloaded.theme(), Mood::Calm);
}

#[test]
fn test_bounce_writes_wav() -> Result<(), Box<dyn std::error::Error>> {
    let storage = storage();
    let mut audio = engine(&storage);
    audio.play_sound(&Sound::Mood(Mood::Ambient));
    let dir = tempfile::tempdir()?;

    let path = SettingsScreen.bounce(&audio, dir.path())?;

    let reader = hound::WavReader::open(&path)?;
    assert_eq!(reader.spec().sample_rate, TEST_SAMPLE_RATE);
    assert_eq!(reader.len(), (BOUNCE_SECS * TEST_SAMPLE_RATE as f32) as u32);
    // Bouncing renders a copy; the live voice is untouched.
    assert_eq!(audio.synth().unwrap().active_tones().len(), 1);
    Ok(())
}

#[test]
fn test_bounce_without_audio_fails() {
    let storage = storage();
    let audio = unavailable_engine(&storage);
    let dir = tempfile::tempdir().unwrap();
    assert!(SettingsScreen.bounce(&audio, dir.path()).is_err());
}

#[test]
fn test_editor_starts_in_dark_theme() {
    let storage = storage();
    let mut audio = engine(&storage);
    let prefs = prefs(&storage);

    let screen = JournalScreen::open(&mut audio, &prefs);
    assert_eq!(screen.mood(), Mood::Dark);
    assert!(!storage.contains(THEME_KEY));
}

#[test]
fn test_filter_narrows_entry_list() {
    let storage = storage();
    let mut journal = journal(&storage);
    let mut audio = engine(&storage);
    let prefs = prefs(&storage);
    journal.create("Rain on the window", Mood::Rain, None);
    journal.create("A calm evening", Mood::Calm, None);
    journal.create("More rain today", Mood::Rain, None);

    let mut screen = JournalScreen::open(&mut audio, &prefs);
    let all: Vec<_> = screen
        .visible_entries(&journal)
        .into_iter()
        .map(|e| e.content.as_str())
        .collect();
    assert_eq!(all, vec!["More rain today", "A calm evening", "Rain on the window"]);

    screen.set_filter("RAIN");
    let hits: Vec<_> = screen
        .visible_entries(&journal)
        .into_iter()
        .map(|e| e.content.as_str())
        .collect();
    assert_eq!(hits, vec!["More rain today", "Rain on the window"]);

    screen.set_filter("  ");
    assert_eq!(screen.visible_entries(&journal).len(), 3);
}

#[test]
fn test_clear_entries_wipes_journal_and_goes_home() {
    let storage = storage();
    let mut journal = journal(&storage);
    journal.create("one", Mood::Calm, None);
    journal.create("two", Mood::Dark, None);
    journal.set_draft("unfinished", "");

    let next = SettingsScreen.clear_entries(&mut journal);

    assert_eq!(next, Screen::Home);
    assert!(journal.is_empty());
    assert_eq!(journal.current_content(), "");
    assert!(!storage.contains(ENTRIES_KEY));
    assert!(!storage.contains(DRAFT_KEY));
}

#[test]
fn test_editing_entry_with_foreign_mood() {
    let storage = storage();
    storage
        .set(
            ENTRIES_KEY,
            r#"[{"id":"9","content":"bright","date":"2024-06-10T06:13:20.000Z","mood":"light"}]"#,
        )
        .unwrap();
    let mut journal = journal(&storage);
    let mut audio = engine(&storage);
    let mut prefs = prefs(&storage);

    let mut screen = JournalScreen::open(&mut audio, &prefs);
    assert!(screen.edit_entry(&mut journal, &mut audio, &mut prefs, "9"));
    assert_eq!(screen.mood(), Mood::Dark);
    assert_eq!(audio.playing(), Some(&Sound::Mood(Mood::Dark)));
}
