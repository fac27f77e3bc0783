//! Validation errors raised while turning request bodies into domain values

use std::fmt;

/// Validation error for incoming payloads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more required fields were absent or empty
    MissingFields { fields: Vec<&'static str> },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFields { fields } => {
                write!(f, "Missing required fields: {}", fields.join(", "))
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Collects required fields, remembering every one that is missing so the
/// caller gets a single error listing all of them.
#[derive(Debug, Default)]
pub(crate) struct Required {
    missing: Vec<&'static str>,
}

impl Required {
    /// Take a required field. Absent and empty strings both count as missing.
    pub(crate) fn take(&mut self, field: &'static str, value: Option<String>) -> String {
        match value {
            Some(v) if !v.is_empty() => v,
            _ => {
                self.missing.push(field);
                String::new()
            }
        }
    }

    pub(crate) fn finish(self) -> Result<(), ValidationError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields {
                fields: self.missing,
            })
        }
    }
}
