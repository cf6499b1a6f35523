//! Error types for the mechanics engine.

/// Errors that can occur during mechanics operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MechError {
    /// A configuration was rejected at setup.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An attribute value was not a finite number.
    #[error("invalid attribute '{name}': {value}")]
    InvalidAttribute {
        /// Name of the offending attribute.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// Convenience result type for mechanics operations.
pub type MechResult<T> = Result<T, MechError>;
