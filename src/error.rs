//! Error type shared by every fallible operation in the crate.

use thiserror::Error;

/// Errors raised by the transform engine and its collaborators.
///
/// Accuracy shortfalls of an adaptive transform are *not* errors: they are
/// reported through the `bool` returned by `initialize` / `transform`, leaving
/// degraded but valid results in place.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    /// Malformed construction or initialization parameters (range ordering,
    /// positivity, minimum counts, parity constraints).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Out-of-range argument to a per-call accessor (mu outside [-1, 1],
    /// r outside the r grid, ell outside [0, ell_max] or of the wrong parity).
    #[error("domain error: {0}")]
    Domain(String),

    /// Accessor invoked before the state it reads has been built.
    #[error("not initialized: {0}")]
    NotInitialized(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let e = Error::Domain("correlation: r out of range".to_string());
        assert_eq!(e.to_string(), "domain error: correlation: r out of range");
        let e = Error::NotInitialized("correlation".to_string());
        assert!(e.to_string().starts_with("not initialized"));
    }
}
