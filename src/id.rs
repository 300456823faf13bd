//! Task id generation.
//!
//! The wheel does not mint ids itself; it delegates to an [`IdProvider`]
//! collaborator. The provider must return strings that are unique with
//! negligible collision probability across restarts on the same host —
//! how it achieves that (host fingerprints, sequence counters, randomness)
//! is entirely its own business.
//!
//! [`UlidProvider`] is the default: ULIDs are time-ordered and carry 80 bits
//! of randomness, which satisfies the uniqueness contract without any host
//! identity derivation.

use thiserror::Error;
use ulid::Ulid;

/// Failure of the id-generation collaborator.
///
/// Registration is aborted when this occurs; no partial state is left behind.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct IdError(pub String);

/// Source of unique task identifiers.
///
/// Implementations must be cheap to call from the registration path and safe
/// to share across threads.
pub trait IdProvider: Send + Sync + 'static {
    /// Returns the next unique id.
    fn next_id(&self) -> Result<String, IdError>;
}

/// Default ULID-backed id provider.
///
/// # Example
/// ```
/// use tickwheel::{IdProvider, UlidProvider};
///
/// let ids = UlidProvider;
/// let a = ids.next_id().unwrap();
/// let b = ids.next_id().unwrap();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct UlidProvider;

impl IdProvider for UlidProvider {
    fn next_id(&self) -> Result<String, IdError> {
        Ok(Ulid::new().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ulid_ids_are_unique_and_non_empty() {
        let ids = UlidProvider;
        let a = ids.next_id().unwrap();
        let b = ids.next_id().unwrap();
        assert!(!a.is_empty());
        assert_ne!(a, b);
    }
}
