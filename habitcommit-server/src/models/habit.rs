//! Habit records and the request bodies that create or change them

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{Required, ValidationError};

/// Stored habit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub color: String,
    pub created_at: String,
}

/// POST /habits body. Every field is optional at the wire level so that a
/// missing field is reported as a validation error, not a decode failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHabitRequest {
    pub id: Option<String>,
    pub name: Option<String>,
    pub color: Option<String>,
    pub created_at: Option<String>,
}

/// PUT /habits/{id} body
#[derive(Debug, Default, Deserialize)]
pub struct UpdateHabitRequest {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Validated habit ready for insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHabit {
    pub id: String,
    pub name: String,
    pub color: String,
    /// Filled by the store when absent
    pub created_at: Option<String>,
}

/// Validated name/color replacement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitChanges {
    pub name: String,
    pub color: String,
}

impl TryFrom<CreateHabitRequest> for NewHabit {
    type Error = ValidationError;

    fn try_from(req: CreateHabitRequest) -> Result<Self, Self::Error> {
        let mut required = Required::default();
        let id = required.take("id", req.id);
        let name = required.take("name", req.name);
        let color = required.take("color", req.color);
        required.finish()?;

        Ok(Self {
            id,
            name,
            color,
            created_at: req.created_at.filter(|ts| !ts.is_empty()),
        })
    }
}

impl TryFrom<UpdateHabitRequest> for HabitChanges {
    type Error = ValidationError;

    fn try_from(req: UpdateHabitRequest) -> Result<Self, Self::Error> {
        let mut required = Required::default();
        let name = required.take("name", req.name);
        let color = required.take("color", req.color);
        required.finish()?;

        Ok(Self { name, color })
    }
}
