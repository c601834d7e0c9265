pub mod entry;
pub mod store;

pub use entry::{Draft, EntryPatch, JournalEntry};
pub use store::{JournalStore, SaveOutcome};
