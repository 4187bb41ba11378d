//! Output format value object

use serde::{Deserialize, Serialize};

/// How a finished conversation is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Final answer only (default)
    #[default]
    Text,
    /// Answer, round count and stop cause as a JSON object
    Json,
    /// Every transcript message, one JSON object per line
    Transcript,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_text() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&OutputFormat::Transcript).unwrap(),
            "\"transcript\""
        );
        let format: OutputFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, OutputFormat::Json);
    }
}
