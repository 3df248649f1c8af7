// file: src/error.rs
// version: 1.0.0
// guid: 3f1c9a52-6d0e-4b7a-9e21-5c8d7f04a1b6

use thiserror::Error;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, PiInfoError>;

/// Errors that are allowed to escape the core.
///
/// Environmental failures (a missing tool, odd tool output) never show up
/// here; they are recovered by the provider. What remains is malformed
/// static input: the board revision code, unit selectors and configuration.
#[derive(Error, Debug)]
pub enum PiInfoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid revision code: {0:?}")]
    InvalidRevisionCode(String),

    #[error("Unknown legacy revision code: 0x{0:04X}")]
    UnknownLegacyRevision(u32),

    #[error("Board revision code unavailable: {0}")]
    RevisionCodeUnavailable(String),

    #[error("Requested unknown CPU frequency unit: {0}")]
    InvalidFrequencyUnit(String),

    #[error("Requested unknown RAM volume unit: {0}")]
    InvalidMemoryUnit(String),

    #[error("Logging error: {0}")]
    Logging(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl PiInfoError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new invalid revision code error
    pub fn invalid_revision_code(code: impl Into<String>) -> Self {
        Self::InvalidRevisionCode(code.into())
    }

    /// Create a new revision unavailable error
    pub fn revision_unavailable(msg: impl Into<String>) -> Self {
        Self::RevisionCodeUnavailable(msg.into())
    }

    /// Create a new invalid frequency unit error
    pub fn invalid_frequency_unit(unit: impl Into<String>) -> Self {
        Self::InvalidFrequencyUnit(unit.into())
    }

    /// Create a new invalid memory unit error
    pub fn invalid_memory_unit(unit: impl Into<String>) -> Self {
        Self::InvalidMemoryUnit(unit.into())
    }

    /// Create a new logging error
    pub fn logging(msg: impl Into<String>) -> Self {
        Self::Logging(msg.into())
    }

    /// Whether the error comes from bad static input that must abort startup
    pub fn is_fatal_identity_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRevisionCode(_)
                | Self::UnknownLegacyRevision(_)
                | Self::RevisionCodeUnavailable(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_revision_display_is_hex() {
        let err = PiInfoError::UnknownLegacyRevision(0x1A);
        assert_eq!(err.to_string(), "Unknown legacy revision code: 0x001A");
    }

    #[test]
    fn test_identity_errors_are_fatal() {
        assert!(PiInfoError::invalid_revision_code("zz").is_fatal_identity_error());
        assert!(PiInfoError::revision_unavailable("no line").is_fatal_identity_error());
        assert!(!PiInfoError::invalid_frequency_unit("THz").is_fatal_identity_error());
    }
}
