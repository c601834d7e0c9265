use color_eyre::eyre::{eyre, Result, WrapErr};
use mood_journal::audio::{AudioEngine, SoftwareSynth};
use mood_journal::config::Config;
use mood_journal::journal::JournalStore;
use mood_journal::logging;
use mood_journal::preferences::Preferences;
use mood_journal::storage::FileStore;
use mood_journal::ui::{Stores, UI};
use std::rc::Rc;

fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::load().wrap_err("Failed to load configuration")?;
    let data_dir = config.data_dir()?;
    logging::setup(&config.log_path()?, config.log_filter.as_deref())
        .map_err(|e| eyre!("Failed to set up logging: {}", e))?;
    tracing::info!(data_dir = ?data_dir, "Starting mood journal");

    let storage = Rc::new(FileStore::open(&data_dir).wrap_err("Failed to open journal storage")?);
    let audio_config = config.audio.clone();
    let mut audio = AudioEngine::new(Rc::clone(&storage), || SoftwareSynth::open(&audio_config));
    audio.resume();

    let mut stores = Stores {
        journal: JournalStore::load(Rc::clone(&storage)),
        audio,
        prefs: Preferences::load(Rc::clone(&storage)),
        data_dir,
    };

    let mut ui = UI::new()?;
    ui.run(&mut stores)?;
    drop(ui);

    tracing::info!(entries = stores.journal.len(), "Shutting down");
    Ok(())
}
