//! Activity errors

/// Routine operation failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActivityError {
    /// No routine with that name
    #[error("unknown routine: {0}")]
    UnknownRoutine(String),

    /// Routine exists but is still locked
    #[error("routine is locked: {name} ({condition})")]
    RoutineLocked {
        /// Routine name
        name: String,
        /// Unlock hint
        condition: String,
    },
}
