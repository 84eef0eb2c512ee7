//! Configuration for the diff engine

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Deadline substituted when a zero timeout is requested.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Default cost of an empty edit operation, used by `cleanup_efficiency`.
pub const DEFAULT_EDIT_COST: usize = 4;

/// Configuration for diff computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffConfig {
    /// Run a line-level pre-pass when both inputs exceed 100 code points.
    /// Faster on large texts, slightly less optimal.
    pub check_lines: bool,

    /// Time budget for the search. `None` disables the deadline entirely
    /// (and with it the half-match heuristic, which only exists to save
    /// time); `Some(Duration::ZERO)` selects [`DEFAULT_TIMEOUT`]. When the
    /// deadline expires mid-search the result is still well formed, just
    /// not minimal.
    pub timeout: Option<Duration>,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffConfig {
    /// Create a new default configuration.
    pub fn new() -> Self {
        Self {
            check_lines: false,
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }

    /// Enable or disable the line-mode speedup.
    pub fn with_check_lines(mut self, check_lines: bool) -> Self {
        self.check_lines = check_lines;
        self
    }

    /// Set the time budget.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// A configuration tuned for large inputs: line-mode pre-pass with the
    /// default deadline.
    pub fn fast() -> Self {
        Self {
            check_lines: true,
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }

    /// A configuration that always searches for an optimal diff: no
    /// deadline, no heuristics.
    pub fn thorough() -> Self {
        Self {
            check_lines: false,
            timeout: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DiffConfig::default();
        assert!(!config.check_lines);
        assert_eq!(config.timeout, Some(DEFAULT_TIMEOUT));
    }

    #[test]
    fn test_builder_pattern() {
        let config = DiffConfig::new()
            .with_check_lines(true)
            .with_timeout(Some(Duration::from_millis(100)));
        assert!(config.check_lines);
        assert_eq!(config.timeout, Some(Duration::from_millis(100)));
    }

    #[test]
    fn test_thorough_has_no_deadline() {
        assert_eq!(DiffConfig::thorough().timeout, None);
        assert!(DiffConfig::fast().check_lines);
    }
}
