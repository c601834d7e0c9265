use crate::mood::{EntryMood, Mood};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub content: String,
    pub date: DateTime<Utc>,
    pub mood: EntryMood,
    #[serde(
        default,
        deserialize_with = "non_empty_prompt",
        skip_serializing_if = "Option::is_none"
    )]
    pub prompt: Option<String>,
}

fn non_empty_prompt<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.filter(|p| !p.is_empty()))
}

impl JournalEntry {
    pub fn new(id: String, content: String, mood: Mood, prompt: Option<String>) -> Self {
        JournalEntry {
            id,
            content,
            date: Utc::now(),
            mood: mood.into(),
            prompt: prompt.filter(|p| !p.is_empty()),
        }
    }

    /// First line of the content, for list views.
    pub fn headline(&self) -> &str {
        self.content.lines().next().unwrap_or("")
    }

    pub(crate) fn apply(&mut self, patch: EntryPatch) {
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(mood) = patch.mood {
            self.mood = mood.into();
        }
        if let Some(prompt) = patch.prompt {
            self.prompt = prompt.filter(|p| !p.is_empty());
        }
    }
}

/// Fields an update may change. `id` and `date` are deliberately absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPatch {
    pub content: Option<String>,
    pub mood: Option<Mood>,
    /// `Some(None)` clears the prompt.
    pub prompt: Option<Option<String>>,
}

impl EntryPatch {
    pub fn content(content: impl Into<String>) -> Self {
        EntryPatch {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn with_mood(mut self, mood: Mood) -> Self {
        self.mood = Some(mood);
        self
    }

    pub fn with_prompt(mut self, prompt: Option<String>) -> Self {
        self.prompt = Some(prompt);
        self
    }
}

/// The unsaved in-progress entry, as persisted under the draft key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
}
