use crate::journal::entry::{Draft, EntryPatch, JournalEntry};
use crate::mood::Mood;
use crate::storage::{KeyValueStore, DRAFT_KEY, ENTRIES_BACKUP_KEY, ENTRIES_KEY};
use chrono::Utc;

/// What happened when the editor's content was saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(String),
    Updated(String),
    /// The content was blank; nothing changed.
    Rejected,
    /// The entry being edited no longer exists.
    NotFound(String),
}

/// Journal entries plus the single in-progress draft.
///
/// Every mutation rewrites the whole entry list to storage. Storage failures
/// are logged and otherwise ignored: the in-memory state is authoritative for
/// the rest of the session.
pub struct JournalStore<K: KeyValueStore> {
    storage: K,
    entries: Vec<JournalEntry>,
    current_content: String,
    current_prompt: String,
    editing_entry_id: Option<String>,
}

impl<K: KeyValueStore> JournalStore<K> {
    /// Loads entries and the draft. Missing or malformed values fall back to
    /// empty defaults; a malformed record is skipped on its own.
    pub fn load(storage: K) -> Self {
        let entries = load_entries(&storage);

        let draft = match storage.get(DRAFT_KEY) {
            Ok(Some(serialized)) => match serde_json::from_str::<Draft>(&serialized) {
                Ok(draft) => Some(draft),
                Err(err) => {
                    tracing::warn!(%err, "Stored draft is malformed, ignoring it");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(%err, "Could not read draft, ignoring it");
                None
            }
        };
        let (current_content, current_prompt) = draft
            .map(|d| (d.content, d.prompt))
            .unwrap_or_default();

        tracing::debug!(entries = entries.len(), "Loaded journal");
        JournalStore {
            storage,
            entries,
            current_content,
            current_prompt,
            editing_entry_id: None,
        }
    }

    /// Entries in creation order.
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn entries_newest_first(&self) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&JournalEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn current_content(&self) -> &str {
        &self.current_content
    }

    pub fn current_prompt(&self) -> &str {
        &self.current_prompt
    }

    pub fn editing_entry_id(&self) -> Option<&str> {
        self.editing_entry_id.as_deref()
    }

    /// Appends a new entry and clears the draft. Returns `None` without
    /// touching anything when the content is blank.
    pub fn create(&mut self, content: &str, mood: Mood, prompt: Option<&str>) -> Option<String> {
        if content.trim().is_empty() {
            return None;
        }

        let id = self.next_id();
        let entry = JournalEntry::new(
            id.clone(),
            content.to_string(),
            mood,
            prompt.map(str::to_string),
        );
        self.entries.push(entry);
        self.save_entries();

        self.current_content.clear();
        self.current_prompt.clear();
        self.remove_draft();

        tracing::debug!(%id, %mood, "Created entry");
        Some(id)
    }

    /// Merges `patch` into the entry. Returns `false` for an unknown id.
    pub fn update(&mut self, id: &str, patch: EntryPatch) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else {
            tracing::debug!(%id, "Update of unknown entry ignored");
            return false;
        };
        entry.apply(patch);
        self.save_entries();
        true
    }

    /// Removes the entry. Deleting the entry under edit also resets the
    /// editor. Returns `false` for an unknown id.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        let removed = self.entries.len() != before;
        if removed {
            self.save_entries();
        }

        if self.editing_entry_id.as_deref() == Some(id) {
            self.reset_editor();
        }
        removed
    }

    /// Replaces the draft and writes it through immediately.
    pub fn set_draft(&mut self, content: &str, prompt: &str) {
        self.current_content = content.to_string();
        self.current_prompt = prompt.to_string();

        let draft = Draft {
            content: self.current_content.clone(),
            prompt: self.current_prompt.clone(),
            last_updated: Utc::now(),
        };
        match serde_json::to_string(&draft) {
            Ok(serialized) => {
                if let Err(err) = self.storage.set(DRAFT_KEY, &serialized) {
                    tracing::error!(%err, "Failed to save draft");
                }
            }
            Err(err) => tracing::error!(%err, "Failed to serialize draft"),
        }
    }

    pub fn set_current_content(&mut self, content: &str) {
        let prompt = std::mem::take(&mut self.current_prompt);
        self.set_draft(content, &prompt);
    }

    pub fn set_current_prompt(&mut self, prompt: &str) {
        let content = std::mem::take(&mut self.current_content);
        self.set_draft(&content, prompt);
    }

    pub fn reset_editor(&mut self) {
        self.current_content.clear();
        self.current_prompt.clear();
        self.editing_entry_id = None;
        self.remove_draft();
    }

    /// Loads an existing entry into the draft and starts an editing session.
    /// Returns the entry's mood so the caller can switch theme and sound.
    pub fn begin_edit(&mut self, id: &str) -> Option<Mood> {
        let entry = self.get(id)?;
        let (content, prompt, mood) = (
            entry.content.clone(),
            entry.prompt.clone().unwrap_or_default(),
            entry.mood.theme(),
        );
        self.set_draft(&content, &prompt);
        self.editing_entry_id = Some(id.to_string());
        Some(mood)
    }

    /// Saves the draft, either as a new entry or onto the entry under edit,
    /// then resets the editor.
    pub fn save_current(&mut self, mood: Mood) -> SaveOutcome {
        if self.current_content.trim().is_empty() {
            return SaveOutcome::Rejected;
        }

        let content = self.current_content.clone();
        let prompt = Some(self.current_prompt.clone()).filter(|p| !p.is_empty());

        let outcome = match self.editing_entry_id.clone() {
            Some(id) => {
                let patch = EntryPatch::content(content)
                    .with_mood(mood)
                    .with_prompt(prompt);
                if self.update(&id, patch) {
                    SaveOutcome::Updated(id)
                } else {
                    tracing::warn!(%id, "Entry under edit disappeared before saving");
                    return SaveOutcome::NotFound(id);
                }
            }
            None => match self.create(&content, mood, prompt.as_deref()) {
                Some(id) => SaveOutcome::Created(id),
                None => return SaveOutcome::Rejected,
            },
        };

        self.reset_editor();
        outcome
    }

    /// Drops every entry and the draft, in memory and in storage.
    pub fn clear_all(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        if let Err(err) = self.storage.remove(ENTRIES_KEY) {
            tracing::error!(%err, "Failed to remove journal entries");
        }
        self.reset_editor();
        tracing::info!(count, "Cleared journal");
    }

    /// Case-insensitive search over content and prompt.
    pub fn search(&self, query: &str) -> Vec<&JournalEntry> {
        let query = query.to_lowercase();
        self.entries
            .iter()
            .filter(|e| {
                e.content.to_lowercase().contains(&query)
                    || e.prompt
                        .as_deref()
                        .is_some_and(|p| p.to_lowercase().contains(&query))
            })
            .collect()
    }

    /// Millisecond timestamp, bumped past any id already in use.
    fn next_id(&self) -> String {
        let mut candidate = Utc::now().timestamp_millis();
        while self.entries.iter().any(|e| e.id == candidate.to_string()) {
            candidate += 1;
        }
        candidate.to_string()
    }

    fn save_entries(&self) {
        let serialized = match serde_json::to_string(&self.entries) {
            Ok(serialized) => serialized,
            Err(err) => {
                tracing::error!(%err, "Failed to serialize journal entries");
                return;
            }
        };
        if let Err(err) = self.storage.set(ENTRIES_KEY, &serialized) {
            tracing::error!(%err, "Failed to save journal entries");
        }
    }

    fn remove_draft(&self) {
        if let Err(err) = self.storage.remove(DRAFT_KEY) {
            tracing::error!(%err, "Failed to clear draft");
        }
    }
}

fn load_entries<K: KeyValueStore>(storage: &K) -> Vec<JournalEntry> {
    let serialized = match storage.get(ENTRIES_KEY) {
        Ok(Some(serialized)) => serialized,
        Ok(None) => return Vec::new(),
        Err(err) => {
            tracing::warn!(%err, "Could not read journal entries, starting empty");
            return Vec::new();
        }
    };

    let records = match serde_json::from_str::<Vec<serde_json::Value>>(&serialized) {
        Ok(records) => records,
        Err(err) => {
            tracing::warn!(%err, "Stored journal entries are malformed, starting empty");
            back_up_entries(storage, &serialized);
            return Vec::new();
        }
    };

    let total = records.len();
    let entries: Vec<JournalEntry> = records
        .into_iter()
        .filter_map(|record| match serde_json::from_value(record) {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(%err, "Skipping malformed journal entry");
                None
            }
        })
        .collect();
    if entries.len() != total {
        back_up_entries(storage, &serialized);
    }
    entries
}

/// Keeps the unreadable list around, since the next save overwrites it.
fn back_up_entries<K: KeyValueStore>(storage: &K, serialized: &str) {
    match storage.set(ENTRIES_BACKUP_KEY, serialized) {
        Ok(()) => tracing::warn!(key = ENTRIES_BACKUP_KEY, "Backed up unreadable journal entries"),
        Err(err) => tracing::error!(%err, "Failed to back up unreadable journal entries"),
    }
}
