/// A failed read against the catalog.
///
/// This is the only failure kind the engine knows about. Connection errors,
/// non-success statuses and undecodable bodies all collapse into it; the
/// reason string is for display only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct TransportError {
    reason: String,
}

impl TransportError {
    /// Create an error with a human-readable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The reason shown to the user.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_reason_verbatim() {
        let err = TransportError::new("Failed to fetch products");
        assert_eq!(err.to_string(), "Failed to fetch products");
        assert_eq!(err.reason(), "Failed to fetch products");
    }
}
