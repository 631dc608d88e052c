//! Error types for the pairing mock.
//!
//! Uses `thiserror` for structured errors. Every variant is a logical outcome
//! of the pairing state machine; none of them is transient, so there is no
//! retry classification.

/// Errors from the pairing state machine.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PairingError {
    /// No retained record carries this user code.
    #[error("Code not found: {code}")]
    NotFound {
        /// The code as submitted (normalized to uppercase)
        code: String,
    },

    /// Redemption attempted for a device code that is not authorized.
    #[error("Device is not authorized")]
    NotAuthorized,

    /// Every user code is held by a live pairing.
    #[error("No free user code after {attempts} attempts")]
    CodeSpaceExhausted {
        /// Candidates drawn before giving up
        attempts: usize,
    },
}

impl PairingError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(code: impl Into<String>) -> Self {
        Self::NotFound { code: code.into() }
    }

    /// OAuth-style error code used in JSON error bodies.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::NotAuthorized => "not_authorized",
            Self::CodeSpaceExhausted { .. } => "code_space_exhausted",
        }
    }
}

/// Result type alias for pairing operations.
pub type PairingResult<T> = Result<T, PairingError>;
