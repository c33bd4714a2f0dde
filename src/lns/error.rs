//! Error types raised by the search and its collaborators.

/// A solution violates the feasibility constraints of its instance.
///
/// Returned by [`LnsSolution::verify`](super::LnsSolution::verify) and
/// fatal to the running search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSolution {
    message: String,
}

impl InvalidSolution {
    #[inline]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for InvalidSolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid solution: {}", self.message)
    }
}

impl std::error::Error for InvalidSolution {}

/// A destroy or repair procedure failed on a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorError {
    operator: String,
    message: String,
}

impl OperatorError {
    #[inline]
    pub fn new(operator: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operator: operator.into(),
            message: message.into(),
        }
    }

    /// Name of the operator that failed.
    #[inline]
    pub fn operator(&self) -> &str {
        &self.operator
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for OperatorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Operator '{}' failed: {}", self.operator, self.message)
    }
}

impl std::error::Error for OperatorError {}

/// Any failure that aborts an LNS run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LnsError {
    /// A configuration failed validation.
    InvalidConfig(String),
    /// The engine was built without any operator pair.
    EmptyOperators,
    /// An accepted incumbent failed verification.
    InvalidSolution(InvalidSolution),
    /// Destroy or repair failed; the iteration's neighborhood is void.
    OperatorFailure(OperatorError),
}

impl std::fmt::Display for LnsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LnsError::InvalidConfig(msg) => write!(f, "Invalid configuration: {msg}"),
            LnsError::EmptyOperators => write!(f, "At least one operator pair is required"),
            LnsError::InvalidSolution(e) => e.fmt(f),
            LnsError::OperatorFailure(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for LnsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LnsError::InvalidSolution(e) => Some(e),
            LnsError::OperatorFailure(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InvalidSolution> for LnsError {
    fn from(e: InvalidSolution) -> Self {
        LnsError::InvalidSolution(e)
    }
}

impl From<OperatorError> for LnsError {
    fn from(e: OperatorError) -> Self {
        LnsError::OperatorFailure(e)
    }
}
