//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// A client name contained a character outside `a-z`, `0-9`, `_`, `-`.
    #[error("invalid character {found:?} in client name {value:?}")]
    InvalidClientName { value: String, found: char },

    /// A time string was not in strict `HH:MM` form.
    #[error("invalid time {value:?}, expected HH:MM")]
    InvalidClock { value: String },

    /// Hours or minutes were out of range.
    #[error("time {hours}:{minutes} is out of range")]
    ClockOutOfRange { hours: u32, minutes: u32 },

    /// A count or rate that must be positive was zero.
    #[error("{field} must be positive")]
    NotPositive { field: &'static str },

    /// A count exceeded its upper bound.
    #[error("{field} must be at most {max}")]
    TooLarge { field: &'static str, max: u32 },

    /// The club would close before (or when) it opens.
    #[error("closing time {close} must be after opening time {open}")]
    ClosesBeforeOpening { open: String, close: String },
}

/// A validated client name.
///
/// Names are non-empty and use only lowercase latin letters, digits, `_` and `-`.
/// Ordering is plain byte-wise lexicographic order, which is the order clients
/// are swept out at closing time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientName(String);

impl ClientName {
    /// Creates a new name after validation.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::Empty {
                field: "client name",
            });
        }
        if let Some(found) = name
            .chars()
            .find(|c| !matches!(c, 'a'..='z' | '0'..='9' | '_' | '-'))
        {
            return Err(ValidationError::InvalidClientName { value: name, found });
        }
        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ClientName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClientName> for String {
    fn from(name: ClientName) -> Self {
        name.0
    }
}

impl fmt::Display for ClientName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ClientName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A table number as written in the input.
///
/// Any `u32` is representable so that out-of-range requests can reach the
/// processor and be rejected there; valid tables are `1..=table_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(u32);

impl TableId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// Zero-based slot in the table registry, if the id lies in `1..=table_count`.
    pub(crate) fn index(self, table_count: u32) -> Option<usize> {
        if (1..=table_count).contains(&self.0) {
            usize::try_from(self.0 - 1).ok()
        } else {
            None
        }
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
