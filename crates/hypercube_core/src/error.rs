use thiserror::Error;

#[derive(Error, Debug)]
pub enum HypercubeError {
    /// Unrecognized button, face, axis or rotation text from the command layer.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Action attempted while busy, solved, or in an incompatible mode.
    #[error("Precondition violation: {0}")]
    PreconditionViolation(String),

    #[error("Solve mismatch: expected {expected}, got {actual}")]
    SolveMismatch { expected: String, actual: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HypercubeError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        HypercubeError::InvalidInput(msg.into())
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        HypercubeError::PreconditionViolation(msg.into())
    }

    /// Every failure in the core is either rejected at the boundary or cleared
    /// through the recovery state. Only configuration problems need the caller.
    pub fn is_recoverable(&self) -> bool {
        match self {
            HypercubeError::InvalidInput(_) => true,
            HypercubeError::PreconditionViolation(_) => true,
            HypercubeError::SolveMismatch { .. } => true,
            HypercubeError::Config(_) => false,
            HypercubeError::Json(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, HypercubeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_are_recoverable() {
        assert!(HypercubeError::invalid_input("JUMP").is_recoverable());
        assert!(HypercubeError::precondition("busy").is_recoverable());
        assert!(HypercubeError::SolveMismatch {
            expected: "+X".into(),
            actual: "-X".into()
        }
        .is_recoverable());
        assert!(!HypercubeError::Config("bad".into()).is_recoverable());
    }

    #[test]
    fn test_display_messages() {
        let err = HypercubeError::invalid_input("'JUMP' is not a valid button");
        assert_eq!(err.to_string(), "Invalid input: 'JUMP' is not a valid button");
    }
}
