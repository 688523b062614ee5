//! Error types for the garden core
//!
//! - Cell decoding from the stored document format
//! - Predicate faults raised while checking a rule
//! - Catalog construction errors

use crate::types::AchievementId;

/// Failure to decode a stored cell record
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CellDecodeError {
    /// Level outside `0..=4`
    #[error("invalid cell level: {0}")]
    InvalidLevel(u8),

    /// An earned cell is missing one of its reward fields
    #[error("earned cell is missing field `{0}`")]
    MissingField(&'static str),
}

/// Fault raised by a rule predicate
///
/// A fault never aborts an evaluation pass; the affected cell is left empty
/// and the fault is reported alongside the outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredicateError {
    /// The snapshot lacks an input the rule depends on
    #[error("snapshot is missing `{0}`")]
    MissingInput(&'static str),

    /// The snapshot holds data the rule cannot interpret
    #[error("invalid snapshot: {0}")]
    Invalid(String),
}

/// Catalog construction errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Two rules target the same achievement
    #[error("duplicate rule for achievement: {0}")]
    DuplicateRule(AchievementId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        assert_eq!(
            CellDecodeError::InvalidLevel(7).to_string(),
            "invalid cell level: 7"
        );
        assert_eq!(
            PredicateError::MissingInput("gardenDays").to_string(),
            "snapshot is missing `gardenDays`"
        );
        assert_eq!(
            CatalogError::DuplicateRule(AchievementId::FiveDayStreak).to_string(),
            "duplicate rule for achievement: Reach a 5-day streak"
        );
    }
}
