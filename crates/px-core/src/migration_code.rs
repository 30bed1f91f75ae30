//! Migration code resolution from Propel migration type names.
//!
//! Propel names every generated migration class `PropelMigration_<timestamp>`.
//! The digits are the migration's identity: they are written into the header
//! of every extracted file and searched for when deduplicating slots.

use regex::Regex;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;
use std::sync::OnceLock;

/// Numeric identifier of a migration, kept as the exact digit string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MigrationCode(String);

impl MigrationCode {
    /// Create a code from a digit string, returning `None` unless it is one
    /// or more ASCII digits.
    pub fn try_new(digits: impl Into<String>) -> Option<Self> {
        let s = digits.into();
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(s))
        } else {
            None
        }
    }

    /// Return the digits as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether both codes denote the same number, ignoring leading zeros.
    pub fn same_number(&self, other: &Self) -> bool {
        self.significant() == other.significant()
    }

    fn significant(&self) -> &str {
        let trimmed = self.0.trim_start_matches('0');
        if trimmed.is_empty() {
            "0"
        } else {
            trimmed
        }
    }
}

/// Numeric order without overflow: shorter significant digits sort first.
impl Ord for MigrationCode {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (self.significant(), other.significant());
        a.len()
            .cmp(&b.len())
            .then_with(|| a.cmp(b))
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for MigrationCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for MigrationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for MigrationCode {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for MigrationCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for MigrationCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

fn type_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"PropelMigration_([0-9]+)$").expect("valid regex literal"))
}

/// Extract the migration code from a type name such as
/// `App\Migrations\PropelMigration_1500000000`.
///
/// The pattern is anchored at the end of the name only, so namespace or
/// module prefixes are allowed. Returns `None` when the name does not end in
/// `PropelMigration_<digits>`.
pub fn resolve_migration_code(type_name: &str) -> Option<MigrationCode> {
    type_name_pattern()
        .captures(type_name)
        .and_then(|captures| captures.get(1))
        .and_then(|digits| MigrationCode::try_new(digits.as_str()))
}

#[cfg(test)]
#[path = "migration_code_test.rs"]
mod tests;
