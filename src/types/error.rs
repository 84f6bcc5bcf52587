//! Error types for the trade workflow
//!
//! Every transition either succeeds or fails synchronously with one of these
//! variants. Idempotent no-ops are successes, not errors.
//!
//! # Error Categories
//!
//! - **Authorization**: the caller does not hold the role a transition needs
//! - **Input**: wrong argument count, unparseable amounts, rates or dates
//! - **State**: a referenced record is missing or a precondition is not met
//! - **Settlement guards**: duplicate or already-settled payment requests
//! - **Arithmetic**: balance transfers that would overflow
//! - **Infrastructure**: store, codec, configuration and I/O failures

use thiserror::Error;

/// Main error type for the trade workflow
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkflowError {
    /// The caller's role predicate failed
    #[error("Caller not authorized for {operation}: requires {required}. Access denied.")]
    AccessDenied {
        /// Operation that was attempted
        operation: String,
        /// Human-readable list of roles that would have been accepted
        required: String,
    },

    /// Wrong argument count or an unparseable numeric/date field
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the problem
        message: String,
    },

    /// A referenced record is absent
    #[error("No record found for {record} of trade {trade}")]
    NotFound {
        /// Kind of record that was looked up
        record: String,
        /// Trade identifier (or fixed key name for participant records)
        trade: String,
    },

    /// A status, location or marker precondition is not met
    #[error("Trade {trade}: {reason}")]
    InvalidState {
        /// Trade identifier
        trade: String,
        /// Which precondition failed
        reason: String,
    },

    /// The payment or advance payment has already been settled
    #[error("Trade {trade}: {what} already settled")]
    AlreadySettled {
        /// Trade identifier
        trade: String,
        /// Which settlement
        what: String,
    },

    /// A request that would duplicate an earlier one
    #[error("Trade {trade}: duplicate request ({reason})")]
    DuplicateRequest {
        /// Trade identifier
        trade: String,
        /// Why the request counts as a duplicate
        reason: String,
    },

    /// Trade amount exceeds the caller's authorized limit
    #[error("Caller trade limit authorization is set at {limit}, requested {amount}. Access denied.")]
    LimitExceeded {
        /// Configured limit for the caller
        limit: i64,
        /// Requested trade amount
        amount: i64,
    },

    /// The payment requestor is not the current L/C beneficiary
    #[error("Trade {trade}: payment requestor and L/C beneficiary do not match")]
    RoleMismatch {
        /// Trade identifier
        trade: String,
    },

    /// Balance or amount arithmetic would overflow
    #[error("Arithmetic overflow in {operation} for trade {trade}")]
    ArithmeticOverflow {
        /// Operation that overflowed
        operation: String,
        /// Trade identifier
        trade: String,
    },

    /// The function name is not part of the transition surface
    #[error("Invalid invoke function name '{name}'")]
    UnknownFunction {
        /// The unrecognised function name
        name: String,
    },

    /// The record store failed to read or write a key
    #[error("Record store error on '{key}': {message}")]
    Store {
        /// Key being accessed
        key: String,
        /// Description of the failure
        message: String,
    },

    /// A stored value could not be encoded or decoded
    #[error("Codec error: {message}")]
    Codec {
        /// Description of the failure
        message: String,
    },

    /// The workflow configuration could not be loaded
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the failure
        message: String,
    },

    /// I/O error while reading scripts or configuration
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },
}

impl From<std::io::Error> for WorkflowError {
    fn from(error: std::io::Error) -> Self {
        WorkflowError::Io {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for WorkflowError {
    fn from(error: serde_json::Error) -> Self {
        WorkflowError::Codec {
            message: error.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for WorkflowError {
    fn from(error: serde_yaml::Error) -> Self {
        WorkflowError::Config {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for WorkflowError {
    fn from(error: csv::Error) -> Self {
        let line = error
            .position()
            .map(|pos| format!(" at line {}", pos.line()))
            .unwrap_or_default();

        WorkflowError::InvalidArgument {
            message: format!("CSV parse error{}: {}", line, error),
        }
    }
}

// Helper functions for creating common errors

impl WorkflowError {
    /// Create an AccessDenied error
    pub fn access_denied(operation: &str, required: &str) -> Self {
        WorkflowError::AccessDenied {
            operation: operation.to_string(),
            required: required.to_string(),
        }
    }

    /// Create an InvalidArgument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        WorkflowError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an InvalidArgument error for a wrong argument count
    pub fn argument_count(function: &str, expected: &str, found: usize) -> Self {
        WorkflowError::InvalidArgument {
            message: format!(
                "Incorrect number of arguments for {}. Expecting {}. Found {}",
                function, expected, found
            ),
        }
    }

    /// Create a NotFound error
    pub fn not_found(record: &str, trade: &str) -> Self {
        WorkflowError::NotFound {
            record: record.to_string(),
            trade: trade.to_string(),
        }
    }

    /// Create an InvalidState error
    pub fn invalid_state(trade: &str, reason: &str) -> Self {
        WorkflowError::InvalidState {
            trade: trade.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an AlreadySettled error
    pub fn already_settled(trade: &str, what: &str) -> Self {
        WorkflowError::AlreadySettled {
            trade: trade.to_string(),
            what: what.to_string(),
        }
    }

    /// Create a DuplicateRequest error
    pub fn duplicate_request(trade: &str, reason: &str) -> Self {
        WorkflowError::DuplicateRequest {
            trade: trade.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a LimitExceeded error
    pub fn limit_exceeded(limit: i64, amount: i64) -> Self {
        WorkflowError::LimitExceeded { limit, amount }
    }

    /// Create a RoleMismatch error
    pub fn role_mismatch(trade: &str) -> Self {
        WorkflowError::RoleMismatch {
            trade: trade.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, trade: &str) -> Self {
        WorkflowError::ArithmeticOverflow {
            operation: operation.to_string(),
            trade: trade.to_string(),
        }
    }

    /// Create an UnknownFunction error
    pub fn unknown_function(name: &str) -> Self {
        WorkflowError::UnknownFunction {
            name: name.to_string(),
        }
    }

    /// Create a Store error
    pub fn store(key: &str, message: impl Into<String>) -> Self {
        WorkflowError::Store {
            key: key.to_string(),
            message: message.into(),
        }
    }
}
