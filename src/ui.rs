use crate::audio::{AudioEngine, SoftwareSynth};
use crate::journal::{JournalEntry, JournalStore, SaveOutcome};
use crate::mood::{EntryMood, Mood, Sound};
use crate::preferences::{FontFamily, Preferences};
use crate::prompts::MEMORY_PROMPTS;
use crate::screens::{
    HomeScreen, JournalScreen, MemoriesScreen, Screen, SettingsScreen, VOLUME_STEP,
};
use crate::storage::KeyValueStore;
use chrono::Local;
use color_eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Sparkline, Wrap},
    Terminal,
};
use std::{
    io::{stdout, Stdout},
    path::PathBuf,
    time::{Duration, Instant},
};
use unicode_width::UnicodeWidthStr;

const TICK: Duration = Duration::from_millis(50);
const MONITOR_BARS: usize = 48;

/// Everything the screens operate on, built once in `main`.
pub struct Stores<K: KeyValueStore> {
    pub journal: JournalStore<K>,
    pub audio: AudioEngine<K, SoftwareSynth>,
    pub prefs: Preferences<K>,
    pub data_dir: PathBuf,
}

/// Pulls samples from the synth in real time and keeps a coarse envelope
/// for the waveform monitor.
struct Monitor {
    last_pull: Instant,
    buffer: Vec<f32>,
    levels: Vec<u64>,
}

impl Monitor {
    fn new() -> Self {
        Monitor {
            last_pull: Instant::now(),
            buffer: Vec::new(),
            levels: Vec::new(),
        }
    }

    fn pull<K: KeyValueStore>(&mut self, audio: &mut AudioEngine<K, SoftwareSynth>) {
        let elapsed = self.last_pull.elapsed().min(Duration::from_millis(500));
        self.last_pull = Instant::now();

        let Some(synth) = audio.synth_mut() else {
            self.levels.clear();
            return;
        };
        let frames = (elapsed.as_secs_f32() * synth.sample_rate() as f32) as usize;
        if frames == 0 {
            return;
        }
        self.buffer.resize(frames, 0.0);
        synth.render(&mut self.buffer);

        let chunk = (frames / MONITOR_BARS).max(1);
        self.levels = self
            .buffer
            .chunks(chunk)
            .take(MONITOR_BARS)
            .map(|c| {
                let peak = c.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
                (peak * 500.0).min(100.0) as u64
            })
            .collect();
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Focus {
    Editor,
    Entries,
    Filter,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum SettingsRow {
    Sound,
    AmbientSound,
    Volume,
    Vibe,
    Font,
    Bounce,
    ClearEntries,
}

const SETTINGS_ROWS: [SettingsRow; 7] = [
    SettingsRow::Sound,
    SettingsRow::AmbientSound,
    SettingsRow::Volume,
    SettingsRow::Vibe,
    SettingsRow::Font,
    SettingsRow::Bounce,
    SettingsRow::ClearEntries,
];

pub struct UI {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    monitor: Monitor,
    cursor_visible: bool,
    last_cursor_update: Instant,
}

impl UI {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        Ok(UI {
            terminal,
            monitor: Monitor::new(),
            cursor_visible: true,
            last_cursor_update: Instant::now(),
        })
    }

    pub fn run<K: KeyValueStore>(&mut self, stores: &mut Stores<K>) -> Result<()> {
        let mut screen = Screen::Home;
        loop {
            screen = match screen {
                Screen::Home => self.home(stores)?,
                Screen::Journal => self.journal(stores)?,
                Screen::Memories => self.memories(stores)?,
                Screen::Settings => self.settings(stores)?,
                Screen::Quit => return Ok(()),
            };
            tracing::debug!(?screen, "Navigating");
        }
    }

    /// Waits one tick for a key press while keeping the audio flowing.
    fn next_key<K: KeyValueStore>(&mut self, stores: &mut Stores<K>) -> Result<Option<KeyEvent>> {
        self.monitor.pull(&mut stores.audio);
        if self.last_cursor_update.elapsed() >= Duration::from_millis(500) {
            self.cursor_visible = !self.cursor_visible;
            self.last_cursor_update = Instant::now();
        }

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(Some(key));
                }
            }
        }
        Ok(None)
    }

    fn home<K: KeyValueStore>(&mut self, stores: &mut Stores<K>) -> Result<Screen> {
        let home = HomeScreen::open();

        loop {
            let theme = stores.prefs.theme();
            let status = audio_status(&stores.audio);
            let levels = &self.monitor.levels;
            self.terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(6),
                        Constraint::Length(5),
                        Constraint::Length(3),
                    ])
                    .split(f.area());

                f.render_widget(title("Mood Journal", theme), chunks[0]);

                let quote = Paragraph::new(vec![
                    Line::from(Span::styled(
                        format!("\"{}\"", home.quote.text),
                        Style::default().add_modifier(Modifier::ITALIC),
                    )),
                    Line::from(""),
                    Line::from(Span::styled(
                        format!("- {}", home.quote.author),
                        Style::default().fg(Color::Gray),
                    )),
                ])
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Today"));
                f.render_widget(quote, chunks[1]);

                f.render_widget(monitor(levels, theme, &status), chunks[2]);

                let controls = Line::from(vec![
                    Span::raw("Press "),
                    Span::styled("j", Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(" to write, "),
                    Span::styled("m", Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(" for memories, "),
                    Span::styled("s", Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(" for settings, "),
                    Span::styled("q", Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(" to quit"),
                ]);
                f.render_widget(instructions(controls), chunks[3]);
            })?;

            if let Some(key) = self.next_key(stores)? {
                match key.code {
                    KeyCode::Char('j') => return Ok(Screen::Journal),
                    KeyCode::Char('m') => return Ok(Screen::Memories),
                    KeyCode::Char('s') => return Ok(Screen::Settings),
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(Screen::Quit),
                    _ => {}
                }
            }
        }
    }

    fn journal<K: KeyValueStore>(&mut self, stores: &mut Stores<K>) -> Result<Screen> {
        let mut screen = JournalScreen::open(&mut stores.audio, &stores.prefs);
        let mut focus = Focus::Editor;
        let mut selected_index = 0usize;
        let mut cursor = stores.journal.current_content().len();
        let mut pending_delete: Option<String> = None;
        let mut message = String::new();

        loop {
            let entries: Vec<JournalEntry> = screen
                .visible_entries(&stores.journal)
                .into_iter()
                .cloned()
                .collect();
            let filter = screen.filter().to_string();
            selected_index = selected_index.min(entries.len().saturating_sub(1));
            let content = stores.journal.current_content().to_string();
            let prompt = stores.journal.current_prompt().to_string();
            let editing = stores.journal.editing_entry_id().is_some();
            let mood = screen.mood();
            let font = stores.prefs.font();
            let status = audio_status(&stores.audio);
            let cursor_visible = self.cursor_visible && focus == Focus::Editor;

            self.terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(8),
                        Constraint::Min(6),
                        Constraint::Length(1),
                        Constraint::Length(3),
                    ])
                    .split(f.area());

                let heading = format!(
                    "{}  ·  {}{}",
                    Local::now().format("%B %-d, %Y"),
                    mood.label(),
                    if editing { "  ·  Editing entry" } else { "" }
                );
                f.render_widget(title(&heading, mood), chunks[0]);

                let shown = if cursor_visible {
                    let mut with_cursor = content.clone();
                    with_cursor.insert(cursor, '|');
                    with_cursor
                } else {
                    content.clone()
                };
                let editor_title = if prompt.is_empty() {
                    "Begin writing your thoughts...".to_string()
                } else {
                    format!("\"{prompt}\"")
                };
                let editor = Paragraph::new(shown)
                    .style(entry_style(font))
                    .wrap(Wrap { trim: false })
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_style(focus_style(focus == Focus::Editor, mood))
                            .title(editor_title),
                    );
                f.render_widget(editor, chunks[1]);

                let width = chunks[2].width.saturating_sub(6) as usize;
                let items: Vec<ListItem> = entries
                    .iter()
                    .map(|e| {
                        let mut lines = vec![Line::from(vec![
                            Span::styled(
                                format!("[{}] ", e.date.with_timezone(&Local).format("%Y-%m-%d %H:%M")),
                                Style::default().fg(entry_color(&e.mood)),
                            ),
                            Span::styled(
                                truncate(e.headline(), width.saturating_sub(19)),
                                entry_style(font),
                            ),
                        ])];
                        if let Some(prompt) = &e.prompt {
                            lines.push(Line::from(Span::styled(
                                truncate(&format!("  \"{prompt}\""), width),
                                Style::default().fg(Color::Gray),
                            )));
                        }
                        ListItem::new(lines)
                    })
                    .collect();
                let list_title = match (focus, filter.is_empty()) {
                    (Focus::Filter, _) => format!("Search: {filter}|"),
                    (_, true) => "Previous entries".to_string(),
                    (_, false) => format!("Previous entries matching \"{filter}\""),
                };
                let list = List::new(items)
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_style(focus_style(focus != Focus::Editor, mood))
                            .title(list_title),
                    )
                    .highlight_style(Style::default().add_modifier(Modifier::BOLD))
                    .highlight_symbol("> ");
                let selected = (focus == Focus::Entries && !entries.is_empty()).then_some(selected_index);
                f.render_stateful_widget(
                    list,
                    chunks[2],
                    &mut ListState::default().with_selected(selected),
                );

                let line = if pending_delete.is_some() {
                    Line::from(Span::styled(
                        "Delete this entry? This cannot be undone. (y/n)",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(vec![
                        Span::styled(message.as_str(), Style::default().fg(Color::Green)),
                        Span::raw("  "),
                        Span::styled(status.as_str(), Style::default().fg(Color::DarkGray)),
                    ])
                };
                f.render_widget(Paragraph::new(line).alignment(Alignment::Center), chunks[3]);

                let help = match (focus, editing) {
                    (Focus::Editor, true) => {
                        "Ctrl+S: Update, Ctrl+T: Mood, Tab: Entries, Esc: Cancel edit"
                    }
                    (Focus::Editor, false) => "Ctrl+S: Save, Ctrl+T: Mood, Tab: Entries, Esc: Home",
                    (Focus::Entries, _) => {
                        "Up/Down: Navigate, e: Edit, d: Delete, /: Search, Tab: Editor, Esc: Home"
                    }
                    (Focus::Filter, _) => "Type to search, Enter: Done, Esc: Clear search",
                };
                f.render_widget(instructions(Line::from(help)), chunks[4]);
            })?;

            let Some(key) = self.next_key(stores)? else {
                continue;
            };
            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

            if let Some(id) = pending_delete.take() {
                if key.code == KeyCode::Char('y') && screen.delete_entry(&mut stores.journal, &id) {
                    message = "Entry deleted".into();
                    cursor = cursor.min(stores.journal.current_content().len());
                }
                continue;
            }

            match (focus, key.code) {
                (Focus::Filter, KeyCode::Enter) => focus = Focus::Entries,
                (Focus::Filter, KeyCode::Esc) => {
                    screen.set_filter("");
                    focus = Focus::Entries;
                }
                (Focus::Filter, KeyCode::Backspace) => {
                    let mut query = filter;
                    query.pop();
                    screen.set_filter(&query);
                    selected_index = 0;
                }
                (Focus::Filter, KeyCode::Char(c)) if !ctrl => {
                    let mut query = filter;
                    query.push(c);
                    screen.set_filter(&query);
                    selected_index = 0;
                }
                (Focus::Filter, _) => {}
                (_, KeyCode::Tab) => {
                    focus = match focus {
                        Focus::Editor => Focus::Entries,
                        Focus::Entries | Focus::Filter => Focus::Editor,
                    };
                }
                (_, KeyCode::Char('s')) if ctrl => {
                    message = match screen.save(&mut stores.journal, &mut stores.audio) {
                        SaveOutcome::Created(_) => "Entry saved".into(),
                        SaveOutcome::Updated(_) => "Entry updated".into(),
                        SaveOutcome::Rejected => "Nothing to save yet".into(),
                        SaveOutcome::NotFound(_) => "That entry no longer exists".into(),
                    };
                    cursor = stores.journal.current_content().len();
                }
                (_, KeyCode::Char('t')) if ctrl => {
                    let next = screen.mood().next_in(&Mood::THEMES);
                    screen.change_mood(&mut stores.audio, &mut stores.prefs, next);
                }
                (Focus::Editor, KeyCode::Esc) => {
                    if editing {
                        screen.cancel_edit(&mut stores.journal);
                        cursor = 0;
                        message = "Edit cancelled".into();
                    } else {
                        return Ok(Screen::Home);
                    }
                }
                (Focus::Editor, code) if !ctrl => {
                    let mut content = content;
                    if edit_text(&mut content, &mut cursor, code) {
                        stores.journal.set_current_content(&content);
                    }
                }
                (Focus::Entries, KeyCode::Esc) => return Ok(Screen::Home),
                (Focus::Entries, KeyCode::Up) => selected_index = selected_index.saturating_sub(1),
                (Focus::Entries, KeyCode::Down) => {
                    if selected_index + 1 < entries.len() {
                        selected_index += 1;
                    }
                }
                (Focus::Entries, KeyCode::Char('e')) => {
                    if let Some(entry) = entries.get(selected_index) {
                        screen.edit_entry(
                            &mut stores.journal,
                            &mut stores.audio,
                            &mut stores.prefs,
                            &entry.id,
                        );
                        cursor = stores.journal.current_content().len();
                        focus = Focus::Editor;
                        message.clear();
                    }
                }
                (Focus::Entries, KeyCode::Char('/')) => focus = Focus::Filter,
                (Focus::Entries, KeyCode::Char('d')) => {
                    pending_delete = entries.get(selected_index).map(|e| e.id.clone());
                }
                _ => {}
            }
        }
    }

    fn memories<K: KeyValueStore>(&mut self, stores: &mut Stores<K>) -> Result<Screen> {
        let screen = MemoriesScreen::open(&mut stores.audio);
        let mut selected_index = 0usize;

        loop {
            let highlighted = MEMORY_PROMPTS[selected_index].mood;
            let status = audio_status(&stores.audio);
            self.terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(10),
                        Constraint::Length(1),
                        Constraint::Length(3),
                    ])
                    .split(f.area());

                f.render_widget(title("Memories", highlighted), chunks[0]);

                let items: Vec<ListItem> = MEMORY_PROMPTS
                    .iter()
                    .map(|p| {
                        ListItem::new(vec![
                            Line::from(Span::styled(
                                format!("{} {}", p.icon, p.title),
                                Style::default()
                                    .fg(mood_color(p.mood))
                                    .add_modifier(Modifier::BOLD),
                            )),
                            Line::from(Span::raw(format!("   {}", p.prompt))),
                        ])
                    })
                    .collect();
                let list = List::new(items)
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .title("Choose a memory to explore"),
                    )
                    .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
                    .highlight_symbol("> ");
                f.render_stateful_widget(
                    list,
                    chunks[1],
                    &mut ListState::default().with_selected(Some(selected_index)),
                );

                f.render_widget(
                    Paragraph::new(status.as_str())
                        .style(Style::default().fg(Color::DarkGray))
                        .alignment(Alignment::Center),
                    chunks[2],
                );
                f.render_widget(
                    instructions(Line::from("Up/Down: Navigate, Enter: Write, Esc: Home")),
                    chunks[3],
                );
            })?;

            if let Some(key) = self.next_key(stores)? {
                match key.code {
                    KeyCode::Up => selected_index = selected_index.saturating_sub(1),
                    KeyCode::Down => {
                        if selected_index + 1 < MEMORY_PROMPTS.len() {
                            selected_index += 1;
                        }
                    }
                    KeyCode::Enter => {
                        return Ok(screen.select(
                            &mut stores.journal,
                            &mut stores.audio,
                            &mut stores.prefs,
                            &MEMORY_PROMPTS[selected_index],
                        ));
                    }
                    KeyCode::Esc => return Ok(Screen::Home),
                    _ => {}
                }
            }
        }
    }

    fn settings<K: KeyValueStore>(&mut self, stores: &mut Stores<K>) -> Result<Screen> {
        let screen = SettingsScreen;
        let mut selected_index = 0usize;
        let mut message = String::new();
        let mut confirm_clear = false;

        loop {
            let audio = &stores.audio;
            let theme = stores.prefs.theme();
            let rows: Vec<(String, String)> = SETTINGS_ROWS
                .iter()
                .map(|row| match row {
                    SettingsRow::Sound => (
                        "Sound".to_string(),
                        if audio.sound_enabled() { "On" } else { "Off" }.to_string(),
                    ),
                    SettingsRow::AmbientSound => {
                        ("Ambient sound".to_string(), format!("< {} >", audio.current_sound()))
                    }
                    SettingsRow::Volume => ("Volume".to_string(), volume_bar(audio.volume())),
                    SettingsRow::Vibe => ("Vibe".to_string(), format!("< {} >", theme.label())),
                    SettingsRow::Font => (
                        "Font style".to_string(),
                        match stores.prefs.font() {
                            FontFamily::Serif => "< Serif >".to_string(),
                            FontFamily::Sans => "< Sans >".to_string(),
                        },
                    ),
                    SettingsRow::Bounce => (
                        "Bounce soundscape".to_string(),
                        "Enter: write a WAV file".to_string(),
                    ),
                    SettingsRow::ClearEntries => (
                        "Clear all entries".to_string(),
                        format!("Enter: delete {} entries", stores.journal.len()),
                    ),
                })
                .collect();
            let status = audio_status(audio);
            let levels = &self.monitor.levels;

            self.terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(8),
                        Constraint::Length(5),
                        Constraint::Length(1),
                        Constraint::Length(3),
                    ])
                    .split(f.area());

                f.render_widget(title("Settings", theme), chunks[0]);

                let items: Vec<ListItem> = rows
                    .iter()
                    .map(|(label, value)| {
                        ListItem::new(Line::from(vec![
                            Span::styled(format!("{label:<20}"), Style::default().fg(Color::Gray)),
                            Span::raw(value.as_str()),
                        ]))
                    })
                    .collect();
                let list = List::new(items)
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .title("Customize your journaling experience"),
                    )
                    .highlight_style(Style::default().add_modifier(Modifier::BOLD))
                    .highlight_symbol("> ");
                f.render_stateful_widget(
                    list,
                    chunks[1],
                    &mut ListState::default().with_selected(Some(selected_index)),
                );

                f.render_widget(monitor(levels, theme, &status), chunks[2]);
                let line = if confirm_clear {
                    Paragraph::new(
                        "Are you sure you want to clear all journal entries? This cannot be undone. (y/n)",
                    )
                    .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                } else {
                    Paragraph::new(message.as_str()).style(Style::default().fg(Color::Green))
                };
                f.render_widget(line.alignment(Alignment::Center), chunks[3]);
                f.render_widget(
                    instructions(Line::from(
                        "Up/Down: Navigate, Left/Right: Change, Enter/Space: Toggle, Esc: Home",
                    )),
                    chunks[4],
                );
            })?;

            let Some(key) = self.next_key(stores)? else {
                continue;
            };
            if confirm_clear {
                confirm_clear = false;
                if key.code == KeyCode::Char('y') {
                    return Ok(screen.clear_entries(&mut stores.journal));
                }
                continue;
            }

            let row = SETTINGS_ROWS[selected_index];
            match key.code {
                KeyCode::Up => selected_index = selected_index.saturating_sub(1),
                KeyCode::Down => {
                    if selected_index + 1 < SETTINGS_ROWS.len() {
                        selected_index += 1;
                    }
                }
                KeyCode::Esc => return Ok(Screen::Home),
                KeyCode::Left | KeyCode::Right => {
                    let forward = key.code == KeyCode::Right;
                    match row {
                        SettingsRow::Sound => screen.toggle_sound(&mut stores.audio),
                        SettingsRow::AmbientSound => {
                            let current = match stores.audio.current_sound() {
                                Sound::Mood(mood) => *mood,
                                _ => Mood::Ambient,
                            };
                            let next = if forward {
                                current.next_in(&Mood::ALL)
                            } else {
                                current.previous_in(&Mood::ALL)
                            };
                            screen.select_sound(&mut stores.audio, next);
                        }
                        SettingsRow::Volume => {
                            screen.nudge_volume(&mut stores.audio, if forward { 1 } else { -1 })
                        }
                        SettingsRow::Vibe => {
                            let next = if forward {
                                theme.next_in(&Mood::THEMES)
                            } else {
                                theme.previous_in(&Mood::THEMES)
                            };
                            screen.set_vibe(&mut stores.audio, &mut stores.prefs, next);
                        }
                        SettingsRow::Font => {
                            screen.toggle_font(&mut stores.prefs);
                        }
                        SettingsRow::Bounce | SettingsRow::ClearEntries => {}
                    }
                }
                KeyCode::Enter | KeyCode::Char(' ') => match row {
                    SettingsRow::Sound => screen.toggle_sound(&mut stores.audio),
                    SettingsRow::Font => {
                        screen.toggle_font(&mut stores.prefs);
                    }
                    SettingsRow::Bounce => {
                        message = match screen.bounce(&stores.audio, &stores.data_dir) {
                            Ok(path) => format!("Wrote {}", path.display()),
                            Err(err) => {
                                tracing::error!(%err, "Bounce failed");
                                format!("Could not bounce: {err}")
                            }
                        };
                    }
                    SettingsRow::ClearEntries => confirm_clear = true,
                    _ => {}
                },
                _ => {}
            }
        }
    }
}

impl Drop for UI {
    fn drop(&mut self) {
        if let Err(err) = disable_raw_mode() {
            tracing::error!(%err, "Failed to leave raw mode");
        }
        if let Err(err) = stdout().execute(LeaveAlternateScreen) {
            tracing::error!(%err, "Failed to leave alternate screen");
        }
    }
}

fn title(text: &str, mood: Mood) -> Paragraph<'static> {
    Paragraph::new(text.to_string())
        .style(
            Style::default()
                .fg(mood_color(mood))
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM))
}

fn instructions(line: Line<'_>) -> Paragraph<'_> {
    Paragraph::new(line)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
}

fn monitor<'a>(levels: &'a [u64], mood: Mood, status: &str) -> Sparkline<'a> {
    Sparkline::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(status.to_string()),
        )
        .data(levels)
        .max(100)
        .style(Style::default().fg(mood_color(mood)))
}

fn audio_status<K: KeyValueStore>(audio: &AudioEngine<K, SoftwareSynth>) -> String {
    if audio.audio_error() {
        "Audio unavailable".to_string()
    } else if !audio.sound_enabled() {
        "Sound off".to_string()
    } else {
        match audio.playing() {
            Some(sound) => format!("Playing {sound} at {:.0}%", audio.volume() * 100.0),
            None => "Silent".to_string(),
        }
    }
}

fn volume_bar(volume: f32) -> String {
    let steps = (1.0 / VOLUME_STEP).round() as usize;
    let filled = ((volume / VOLUME_STEP).round() as usize).min(steps);
    format!(
        "[{}{}] {:.0}%",
        "#".repeat(filled),
        " ".repeat(steps - filled),
        volume * 100.0
    )
}

fn mood_color(mood: Mood) -> Color {
    match mood {
        Mood::Ambient => Color::Blue,
        Mood::Rain => Color::LightBlue,
        Mood::Dreamy => Color::Magenta,
        Mood::Dark => Color::Gray,
        Mood::Calm => Color::Cyan,
    }
}

fn entry_color(mood: &EntryMood) -> Color {
    match mood.known() {
        Some(mood) => mood_color(mood),
        None => Color::White,
    }
}

fn focus_style(focused: bool, mood: Mood) -> Style {
    if focused {
        Style::default().fg(mood_color(mood))
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn entry_style(font: FontFamily) -> Style {
    match font {
        FontFamily::Serif => Style::default().add_modifier(Modifier::ITALIC),
        FontFamily::Sans => Style::default(),
    }
}

/// Cuts `text` to at most `width` terminal columns, marking the cut.
fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    for c in text.chars() {
        if out.width() + c.to_string().width() + 1 > width {
            break;
        }
        out.push(c);
    }
    out.push('…');
    out
}

/// Applies an editing key to `content`. `cursor` is a byte offset that always
/// sits on a char boundary. Returns whether the content changed.
fn edit_text(content: &mut String, cursor: &mut usize, code: KeyCode) -> bool {
    match code {
        KeyCode::Char(c) => {
            content.insert(*cursor, c);
            *cursor += c.len_utf8();
            true
        }
        KeyCode::Enter => {
            content.insert(*cursor, '\n');
            *cursor += 1;
            true
        }
        KeyCode::Backspace => match content[..*cursor].chars().next_back() {
            Some(c) => {
                *cursor -= c.len_utf8();
                content.remove(*cursor);
                true
            }
            None => false,
        },
        KeyCode::Delete => {
            if *cursor < content.len() {
                content.remove(*cursor);
                true
            } else {
                false
            }
        }
        KeyCode::Left => {
            if let Some(c) = content[..*cursor].chars().next_back() {
                *cursor -= c.len_utf8();
            }
            false
        }
        KeyCode::Right => {
            if let Some(c) = content[*cursor..].chars().next() {
                *cursor += c.len_utf8();
            }
            false
        }
        KeyCode::Home => {
            *cursor = line_start(content, *cursor);
            false
        }
        KeyCode::End => {
            *cursor = line_end(content, *cursor);
            false
        }
        KeyCode::Up => {
            let start = line_start(content, *cursor);
            if start > 0 {
                let column = content[start..*cursor].chars().count();
                let prev_start = line_start(content, start - 1);
                *cursor = offset_at_column(content, prev_start, start - 1, column);
            }
            false
        }
        KeyCode::Down => {
            let end = line_end(content, *cursor);
            if end < content.len() {
                let column = content[line_start(content, *cursor)..*cursor].chars().count();
                let next_start = end + 1;
                let next_end = line_end(content, next_start);
                *cursor = offset_at_column(content, next_start, next_end, column);
            }
            false
        }
        _ => false,
    }
}

fn line_start(content: &str, cursor: usize) -> usize {
    content[..cursor].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

fn line_end(content: &str, cursor: usize) -> usize {
    content[cursor..]
        .find('\n')
        .map(|i| cursor + i)
        .unwrap_or(content.len())
}

/// Byte offset of `column` chars into the line `start..end`, clamped to the
/// line's end.
fn offset_at_column(content: &str, start: usize, end: usize, column: usize) -> usize {
    content[start..end]
        .char_indices()
        .nth(column)
        .map(|(i, _)| start + i)
        .unwrap_or(end)
}
