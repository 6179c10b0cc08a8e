//! Diagnostic context containing the information available about a failed call.

/// Context provided to rules for analyzing a failed call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticContext {
    /// Key of the network the call targeted
    pub network_key: Option<String>,

    /// Human name of the network the caller expected to reach
    pub expected_network: Option<String>,

    /// The error message of the failure
    pub error_message: String,
}

impl DiagnosticContext {
    pub fn new(error_message: impl Into<String>) -> Self {
        Self {
            error_message: error_message.into(),
            ..Self::default()
        }
    }

    pub fn with_network(mut self, network_key: impl Into<String>) -> Self {
        self.network_key = Some(network_key.into());
        self
    }

    pub fn with_expected_network(mut self, expected_network: impl Into<String>) -> Self {
        self.expected_network = Some(expected_network.into());
        self
    }

    /// Checks if the error message contains a specific pattern (case-insensitive).
    pub fn error_contains(&self, pattern: &str) -> bool {
        self.error_message.to_lowercase().contains(&pattern.to_lowercase())
    }

    /// Checks if the error message contains at least one of the patterns (case-insensitive).
    pub fn error_contains_any(&self, patterns: &[&str]) -> bool {
        patterns.iter().any(|x| self.error_contains(x))
    }
}
