//! Persisted playthrough results and their summaries

mod record;
mod store;
mod summary;

pub use record::{PlaythroughRecord, RecordKey};
pub use store::ResultStore;
pub use summary::{DifficultyStats, Summary};
