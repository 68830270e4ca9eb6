//! Calendar-day keys
//!
//! Energy reset and the daily bonus are gated on the calendar day, not on
//! elapsed time. A `DateKey` is the day in `YYYY-MM-DD` form, compared by
//! plain string equality: a malformed or foreign key simply compares unequal
//! to any stored key, which forces a safe energy reset instead of an error.
//!
//! Keys are taken from the UTC clock with no timezone normalization against
//! the store, matching the original client behavior. Players near midnight
//! or hopping timezones can see an early or late day roll.

use serde::{Deserialize, Serialize};

/// A calendar-day key (`YYYY-MM-DD`), or empty for "never"
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(String);

impl DateKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Today's key from the UTC clock
    pub fn today() -> Self {
        Self(chrono::Utc::now().format("%Y-%m-%d").to_string())
    }

    /// The empty key, used for "never happened"
    pub fn none() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DateKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}
