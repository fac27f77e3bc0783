//! Commit records: one check-in per habit per date

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{Required, ValidationError};

/// Stored commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub id: String,
    pub habit_id: String,
    /// Opaque date string, matched exactly
    pub date: String,
    pub timestamp: String,
}

/// POST /commits body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommitRequest {
    pub id: Option<String>,
    pub habit_id: Option<String>,
    pub date: Option<String>,
    pub timestamp: Option<String>,
}

/// Validated commit ready for insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCommit {
    pub id: String,
    pub habit_id: String,
    pub date: String,
    /// Filled by the store when absent
    pub timestamp: Option<String>,
}

impl TryFrom<CreateCommitRequest> for NewCommit {
    type Error = ValidationError;

    fn try_from(req: CreateCommitRequest) -> Result<Self, Self::Error> {
        let mut required = Required::default();
        let id = required.take("id", req.id);
        let habit_id = required.take("habitId", req.habit_id);
        let date = required.take("date", req.date);
        required.finish()?;

        Ok(Self {
            id,
            habit_id,
            date,
            timestamp: req.timestamp.filter(|ts| !ts.is_empty()),
        })
    }
}
