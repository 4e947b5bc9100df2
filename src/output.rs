//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{Model, ModelVersion};

/// Trait for human-readable key-value output.
///
/// Implemented by resource types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for Model {
    fn pretty_print(&self) -> String {
        let header = format!("Model: {}", self.model_ref());
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![header, divider];

        if let Some(ref description) = self.description {
            lines.push(format!("Description:    {}", description));
        }

        lines.push(format!(
            "Visibility:     {}",
            self.visibility.as_deref().unwrap_or("unknown")
        ));
        lines.push(format!("Runs:           {}", self.run_count));

        if let Some(ref version) = self.latest_version {
            lines.push(format!("Latest Version: {}", version.id));
        }

        if let Some(ref github) = self.github_url {
            lines.push(format!("GitHub:         {}", github));
        }

        if let Some(ref paper) = self.paper_url {
            lines.push(format!("Paper:          {}", paper));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for ModelVersion {
    fn pretty_print(&self) -> String {
        let header = format!("Version: {}", self.id);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![header, divider];

        if let Some(ref created) = self.created_at {
            lines.push(format!("Created:        {}", created.format("%Y-%m-%d %H:%M:%S UTC")));
        }

        if let Some(ref cog) = self.cog_version {
            lines.push(format!("Cog Version:    {}", cog));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_pretty_print_format() {
        let model: Model = serde_json::from_str(
            r#"{"owner":"acme","name":"upscaler","visibility":"private","run_count":12,"latest_version":{"id":"v1"}}"#,
        )
        .unwrap();

        let output = model.pretty_print();
        assert!(output.starts_with("Model: acme/upscaler"));
        assert!(output.contains("Visibility:     private"));
        assert!(output.contains("Runs:           12"));
        assert!(output.contains("Latest Version: v1"));
        assert!(!output.contains("GitHub:"));
    }

    #[test]
    fn test_version_pretty_print_format() {
        let version: ModelVersion = serde_json::from_str(
            r#"{"id":"abc","created_at":"2024-03-01T10:00:00Z","cog_version":"0.9.4"}"#,
        )
        .unwrap();

        let output = version.pretty_print();
        assert!(output.starts_with("Version: abc"));
        assert!(output.contains("Created:        2024-03-01 10:00:00 UTC"));
        assert!(output.contains("Cog Version:    0.9.4"));
    }
}
