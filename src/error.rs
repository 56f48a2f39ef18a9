// ============================================================================
// Matching Errors
// Error taxonomy shared by the store, ledger, ingress and engine
// ============================================================================

use crate::domain::OrderId;
use thiserror::Error;

/// Errors returned by order submission and book queries.
///
/// Caller errors (`InvalidRequest`, `DuplicateOrder`, `RecordNotFound`) are never
/// retried internally. `StoreUnavailable` means the submission was not accepted
/// and the whole submission may be retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// Malformed order request
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// An order with this id is already resting in the book
    #[error("order already exists: {0}")]
    DuplicateOrder(OrderId),

    /// No resting order with this id
    #[error("record not found: {0}")]
    RecordNotFound(OrderId),

    /// Side is neither buy nor sell
    #[error("invalid order side: {0}")]
    InvalidSide(String),

    /// Underlying storage failed; nothing from the submission was applied
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl MatchError {
    /// Whether the error was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            MatchError::InvalidRequest(_)
                | MatchError::DuplicateOrder(_)
                | MatchError::RecordNotFound(_)
        )
    }
}

/// Result type alias for matching operations
pub type MatchResult<T> = Result<T, MatchError>;
