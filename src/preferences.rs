//! Presentation preferences: the visual theme and the entry font style.

use crate::mood::Mood;
use crate::storage::{KeyValueStore, FONT_FAMILY_KEY, THEME_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontFamily {
    #[default]
    Serif,
    Sans,
}

impl FontFamily {
    pub fn as_str(self) -> &'static str {
        match self {
            FontFamily::Serif => "serif",
            FontFamily::Sans => "sans",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            FontFamily::Serif => FontFamily::Sans,
            FontFamily::Sans => FontFamily::Serif,
        }
    }
}

pub const DEFAULT_THEME: Mood = Mood::DEFAULT_THEME;

pub struct Preferences<K: KeyValueStore> {
    storage: K,
    theme: Mood,
    font: FontFamily,
}

impl<K: KeyValueStore> Preferences<K> {
    pub fn load(storage: K) -> Self {
        let theme = storage
            .get(THEME_KEY)
            .ok()
            .flatten()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_THEME);
        let font = match storage.get(FONT_FAMILY_KEY).ok().flatten().as_deref() {
            Some("sans") => FontFamily::Sans,
            _ => FontFamily::Serif,
        };
        Preferences {
            storage,
            theme,
            font,
        }
    }

    pub fn theme(&self) -> Mood {
        self.theme
    }

    pub fn font(&self) -> FontFamily {
        self.font
    }

    pub fn set_theme(&mut self, theme: Mood) {
        self.theme = theme;
        if let Err(err) = self.storage.set(THEME_KEY, theme.as_str()) {
            tracing::error!(%err, "Failed to save theme");
        }
    }

    pub fn set_font(&mut self, font: FontFamily) {
        self.font = font;
        if let Err(err) = self.storage.set(FONT_FAMILY_KEY, font.as_str()) {
            tracing::error!(%err, "Failed to save font preference");
        }
    }
}
