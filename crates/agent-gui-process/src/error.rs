use thiserror::Error;

/// Errors from application-identifier resolution.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProcessError {
    /// No running process qualified. Carries the original identifier
    /// verbatim so the caller can report exactly what failed.
    #[error("Application not found: {0}")]
    NotFound(String),
    /// Empty, whitespace-only, or absurdly long identifier. Rejected before
    /// any search runs.
    #[error("Invalid application identifier: {0:?}")]
    InvalidIdentifier(String),
    /// `PID:` syntax with a missing, non-numeric or non-positive number.
    /// Malformed PID syntax never falls back to a name search.
    #[error("Invalid PID syntax: {0:?}")]
    InvalidPid(String),
}

impl ProcessError {
    /// Returns a helpful suggestion for resolving the error.
    pub fn suggestion(&self) -> String {
        match self {
            ProcessError::NotFound(_) => {
                "Run 'apps' to list running applications. Names match case-insensitively and tolerate small typos.".to_string()
            }
            ProcessError::InvalidIdentifier(_) => {
                "Pass an application name, a bundle identifier, or PID:<number>.".to_string()
            }
            ProcessError::InvalidPid(_) => {
                "PID syntax is PID:<positive integer>, e.g. PID:1234.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_carries_identifier_verbatim() {
        let err = ProcessError::NotFound("NoSuchApp12345".into());
        assert!(err.to_string().contains("NoSuchApp12345"));
    }
}
