//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the item tree rules.
/// The plain conversions never produce them; only strict builds do.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("orphaned child item {id}: no group with id {}", display_pid(.pid))]
    OrphanedChild { id: i64, pid: Option<i64> },
}

fn display_pid(pid: &Option<i64>) -> String {
    pid.map(|p| p.to_string())
        .unwrap_or_else(|| "<none>".to_string())
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
