//! Unified error handling for quantforge
//!
//! Each module owns a small `thiserror` enum (`ValidationError`,
//! `DispatchError`, `LoggingError`). `ForgeError` folds them together and
//! sorts every failure into a category:
//! - User errors (bad parameters or configuration, fix the input)
//! - Recoverable errors (the device cannot run this shape, try another kernel)
//! - Internal errors (bugs)

use std::fmt;

use crate::dispatch::DispatchError;
use crate::logging::LoggingError;
use crate::quantize::ValidationError;

/// Unified error type for quantforge
#[derive(Debug, thiserror::Error)]
pub enum ForgeError {
    // ========== Operation Errors ==========
    /// Quantize parameters rejected before planning
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Dispatch planning failed
    #[error("Dispatch planning failed: {0}")]
    Dispatch(#[from] DispatchError),

    // ========== Configuration Errors ==========
    /// Invalid planner configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Logging could not be initialized
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    // ========== Internal Errors ==========
    /// Invocation could not be serialized
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ForgeError {
    /// Categorize the error for handling decisions
    ///
    /// A kernel selector can fall back to another implementation on
    /// `Recoverable`, surface `User` errors to the graph builder and report
    /// `Internal` ones as bugs.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ForgeError::Validation(_)
            | ForgeError::InvalidConfiguration(_)
            | ForgeError::Logging(_)
            | ForgeError::Dispatch(DispatchError::InvalidDeviceLimits) => ErrorCategory::User,

            ForgeError::Dispatch(DispatchError::NoDivisorFound { .. })
            | ForgeError::Dispatch(DispatchError::WorkGroupLimitTooSmall { .. }) => {
                ErrorCategory::Recoverable
            }

            ForgeError::Dispatch(DispatchError::LayoutOrderMismatch { .. })
            | ForgeError::Dispatch(DispatchError::InvalidAxisOrder { .. })
            | ForgeError::Serialization(_) => ErrorCategory::Internal,
        }
    }

    /// Another kernel may still handle the operation.
    pub fn is_recoverable(&self) -> bool {
        matches!(self.category(), ErrorCategory::Recoverable)
    }

    pub fn is_user_error(&self) -> bool {
        matches!(self.category(), ErrorCategory::User)
    }

    pub fn is_internal_error(&self) -> bool {
        matches!(self.category(), ErrorCategory::Internal)
    }
}

/// Error category for handling decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Invalid parameters or configuration
    User,
    /// Unsupported on this device; fall back to another kernel
    Recoverable,
    /// Indicates a bug
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::User => write!(f, "User"),
            ErrorCategory::Recoverable => write!(f, "Recoverable"),
            ErrorCategory::Internal => write!(f, "Internal"),
        }
    }
}

// Helper type alias for Results using ForgeError
pub type ForgeResult<T> = std::result::Result<T, ForgeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::Datatype;

    fn no_divisor() -> ForgeError {
        DispatchError::NoDivisorFound {
            axis: 0,
            global: 1031,
            budget: 256,
        }
        .into()
    }

    #[test]
    fn test_error_categories() {
        // User errors
        assert_eq!(
            ForgeError::from(ValidationError::ArityMismatch {
                expected: 9,
                actual: 8
            })
            .category(),
            ErrorCategory::User
        );
        assert_eq!(
            ForgeError::from(DispatchError::InvalidDeviceLimits).category(),
            ErrorCategory::User
        );

        // Recoverable errors
        assert_eq!(no_divisor().category(), ErrorCategory::Recoverable);
        assert_eq!(
            ForgeError::from(DispatchError::WorkGroupLimitTooSmall {
                limit: 16,
                required: 32
            })
            .category(),
            ErrorCategory::Recoverable
        );

        // Internal errors
        assert_eq!(
            ForgeError::from(DispatchError::LayoutOrderMismatch {
                expected: 3,
                actual: 2
            })
            .category(),
            ErrorCategory::Internal
        );
        let bad_json = serde_json::from_str::<u8>("x").unwrap_err();
        assert_eq!(
            ForgeError::from(bad_json).category(),
            ErrorCategory::Internal
        );
    }

    #[test]
    fn test_predicates() {
        assert!(no_divisor().is_recoverable());
        assert!(!no_divisor().is_user_error());

        let user = ForgeError::from(ValidationError::UnsupportedOutputType(Datatype::Int32));
        assert!(user.is_user_error());
        assert!(!user.is_recoverable());

        let internal = ForgeError::from(DispatchError::InvalidAxisOrder {
            order: vec![0, 0, 1],
        });
        assert!(internal.is_internal_error());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            no_divisor().to_string(),
            "Dispatch planning failed: no local size candidate divides global size 1031 on axis 0 (budget 256)"
        );
        assert_eq!(
            ForgeError::InvalidConfiguration("empty table".to_string()).to_string(),
            "Invalid configuration: empty table"
        );
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::User.to_string(), "User");
        assert_eq!(ErrorCategory::Recoverable.to_string(), "Recoverable");
        assert_eq!(ErrorCategory::Internal.to_string(), "Internal");
    }
}
