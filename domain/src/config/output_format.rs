//! Output format value object

use serde::{Deserialize, Serialize};

/// How a decision brief is rendered for the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable brief (default)
    #[default]
    Brief,
    /// Full transcript followed by the brief
    Full,
    /// Brief as JSON
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_brief() {
        assert_eq!(OutputFormat::default(), OutputFormat::Brief);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&OutputFormat::Full).unwrap();
        assert_eq!(json, "\"full\"");
        let format: OutputFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, OutputFormat::Json);
    }
}
