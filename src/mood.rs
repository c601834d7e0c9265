use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A mood doubles as the visual theme and the timbre of the ambient tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Ambient,
    Rain,
    Dreamy,
    Dark,
    Calm,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown mood {0:?}")]
pub struct UnknownMood(pub String);

impl Mood {
    pub const ALL: [Mood; 5] = [Mood::Ambient, Mood::Rain, Mood::Dreamy, Mood::Dark, Mood::Calm];

    /// Moods offered by the editor and the vibe picker.
    pub const THEMES: [Mood; 3] = [Mood::Dreamy, Mood::Dark, Mood::Calm];

    /// Theme used before the user picks one, and for entries whose mood is
    /// not one of ours.
    pub const DEFAULT_THEME: Mood = Mood::Dark;

    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Ambient => "ambient",
            Mood::Rain => "rain",
            Mood::Dreamy => "dreamy",
            Mood::Dark => "dark",
            Mood::Calm => "calm",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mood::Ambient => "Ambient",
            Mood::Rain => "Rain",
            Mood::Dreamy => "Dreamy",
            Mood::Dark => "Dark",
            Mood::Calm => "Calm",
        }
    }

    /// Cycles through `choices`, starting over after the last one.
    pub fn next_in(self, choices: &[Mood]) -> Mood {
        let pos = choices.iter().position(|m| *m == self);
        match pos {
            Some(i) => choices[(i + 1) % choices.len()],
            None => choices.first().copied().unwrap_or(self),
        }
    }

    pub fn previous_in(self, choices: &[Mood]) -> Mood {
        let pos = choices.iter().position(|m| *m == self);
        match pos {
            Some(0) | None => choices.last().copied().unwrap_or(self),
            Some(i) => choices[i - 1],
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownMood(s.to_string()))
    }
}

/// The mood recorded on a journal entry.
///
/// Older data may carry mood ids this build does not know (the browser app
/// could store its `light` theme). Those are kept verbatim so that rewriting
/// the entry list never loses them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntryMood {
    Known(Mood),
    Other(String),
}

impl EntryMood {
    pub fn known(&self) -> Option<Mood> {
        match self {
            EntryMood::Known(mood) => Some(*mood),
            EntryMood::Other(_) => None,
        }
    }

    /// The mood to edit this entry under.
    pub fn theme(&self) -> Mood {
        self.known().unwrap_or(Mood::DEFAULT_THEME)
    }

    pub fn as_str(&self) -> &str {
        match self {
            EntryMood::Known(mood) => mood.as_str(),
            EntryMood::Other(id) => id,
        }
    }
}

impl From<Mood> for EntryMood {
    fn from(mood: Mood) -> Self {
        EntryMood::Known(mood)
    }
}

impl From<String> for EntryMood {
    fn from(id: String) -> Self {
        match id.parse::<Mood>() {
            Ok(mood) => EntryMood::Known(mood),
            Err(_) => EntryMood::Other(id),
        }
    }
}

impl From<EntryMood> for String {
    fn from(mood: EntryMood) -> Self {
        match mood {
            EntryMood::Known(mood) => mood.as_str().to_string(),
            EntryMood::Other(id) => id,
        }
    }
}

impl PartialEq<Mood> for EntryMood {
    fn eq(&self, other: &Mood) -> bool {
        self.known() == Some(*other)
    }
}

impl fmt::Display for EntryMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything the audio engine can be asked to play.
///
/// `Other` keeps an unrecognized id read back from storage; it plays the
/// default tone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Sound {
    Mood(Mood),
    Success,
    Other(String),
}

impl Sound {
    pub const SUCCESS_ID: &'static str = "success";

    pub fn parse(id: &str) -> Sound {
        if id == Self::SUCCESS_ID {
            return Sound::Success;
        }
        match id.parse::<Mood>() {
            Ok(mood) => Sound::Mood(mood),
            Err(_) => Sound::Other(id.to_string()),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Sound::Mood(mood) => mood.as_str(),
            Sound::Success => Self::SUCCESS_ID,
            Sound::Other(id) => id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Sound::Success)
    }
}

impl From<Mood> for Sound {
    fn from(mood: Mood) -> Self {
        Sound::Mood(mood)
    }
}

impl fmt::Display for Sound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
