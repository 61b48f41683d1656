// TaskMaster - Task list state container with pluggable key-value persistence

pub mod config;
pub mod filter;
pub mod models;
pub mod storage;
pub mod store;
pub mod theme;

// Re-export main types for convenience
pub use config::{Backend, Config};
pub use filter::FilterCriterion;
pub use models::{Task, TaskStats};
pub use storage::{FileStorage, MemoryStorage, SqliteStorage, Storage};
pub use store::{TASKS_KEY, TaskStore};
pub use theme::{DARK_MODE_KEY, ThemePreference};
