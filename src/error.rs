/// Result type for code generation and decoding
pub type CodingResult<T> = Result<T, CodingError>;

/// Rejected preconditions. Every check runs before any work is done, so an
/// error never comes with a partially built matrix.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodingError {
    #[error("domain error: {0}")]
    Domain(String),

    #[error("unsupported scheme: hamiltonian codes exist for k = 3, 4, 5 (got k = {0})")]
    UnsupportedScheme(usize),

    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    Shape {
        context: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl CodingError {
    pub(crate) fn domain(msg: impl Into<String>) -> Self {
        CodingError::Domain(msg.into())
    }

    /// Fails with `Shape` unless `actual == expected`
    pub(crate) fn check_len(
        context: &'static str,
        expected: usize,
        actual: usize,
    ) -> CodingResult<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(CodingError::Shape {
                context,
                expected,
                actual,
            })
        }
    }
}
