//! A mood-driven personal journal for the terminal.
//!
//! The journal ([`journal::JournalStore`]) and the ambient sound
//! ([`audio::AudioEngine`]) are two independent stores over the same
//! [`storage::KeyValueStore`]. The screens in [`screens`] orchestrate them;
//! [`ui`] draws everything with ratatui.

pub mod audio;
pub mod config;
pub mod journal;
pub mod logging;
pub mod mood;
pub mod preferences;
pub mod prompts;
pub mod screens;
pub mod storage;
pub mod ui;
