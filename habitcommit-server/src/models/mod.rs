//! Domain models with validation at construction
//!
//! Request bodies are decoded into all-optional structs and converted into
//! the `New*` types with `TryFrom`; a failed conversion is a
//! `ValidationError`, never a panic.

pub mod commit;
pub mod habit;
pub mod validation;

pub use commit::{Commit, CreateCommitRequest, NewCommit};
pub use habit::{CreateHabitRequest, Habit, HabitChanges, NewHabit, UpdateHabitRequest};
pub use validation::ValidationError;
