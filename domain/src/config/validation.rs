//! Configuration validation results.
//!
//! Validators return a list of [`ConfigIssue`]s instead of failing on the
//! first problem, so every mistake in a config file is reported at once.
//!
//! ```
//! use relay_domain::config::{ConfigIssue, ConfigIssueCode, Severity};
//!
//! let issue = ConfigIssue::error(
//!     ConfigIssueCode::ZeroLimit,
//!     "execution.max_rounds",
//!     "must be at least 1",
//! );
//! assert_eq!(issue.severity, Severity::Error);
//! assert_eq!(issue.to_string(), "execution.max_rounds: must be at least 1");
//! ```

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: startup is aborted.
    Error,
    /// Non-fatal: the value works but is probably not what was intended.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A limit that must be positive is zero.
    ZeroLimit,
    /// A required string value is empty.
    EmptyValue,
    /// A URL does not start with `http://` or `https://`.
    InvalidUrl,
    /// Backoff cap is below the initial backoff.
    InvertedBackoff,
    /// A value is allowed but unusually large.
    ExcessiveValue,
}

/// A detected issue in a configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    /// Dotted key path (e.g. `"execution.max_rounds"`)
    pub field: String,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn warning(
        code: ConfigIssueCode,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_severity() {
        let warn = ConfigIssue::warning(
            ConfigIssueCode::ExcessiveValue,
            "execution.max_concurrent_tools",
            "very high",
        );
        assert_eq!(warn.severity, Severity::Warning);
        assert!(!warn.is_error());

        let err = ConfigIssue::error(ConfigIssueCode::EmptyValue, "model.model", "empty");
        assert!(err.is_error());
        assert_eq!(err.code, ConfigIssueCode::EmptyValue);
    }
}
