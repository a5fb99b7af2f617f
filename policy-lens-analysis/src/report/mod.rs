//! Report rendering (human-readable text and stable JSON).

mod json;
mod text;

use crate::error::PolicyLensResult;
use crate::types::{BoundaryReport, ComponentGraph, OverlapReport};

/// Output format selected by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Render an overlap report in the requested format.
pub fn render_overlap(report: &OverlapReport, format: OutputFormat) -> PolicyLensResult<String> {
    match format {
        OutputFormat::Text => Ok(text::render_overlap(report)),
        OutputFormat::Json => json::render(report),
    }
}

/// Render a boundary report in the requested format.
pub fn render_boundaries(
    report: &BoundaryReport,
    format: OutputFormat,
) -> PolicyLensResult<String> {
    match format {
        OutputFormat::Text => Ok(text::render_boundaries(report)),
        OutputFormat::Json => json::render(report),
    }
}

/// Render a component graph: a fenced Mermaid block in text mode, the
/// graph structure in JSON mode.
pub fn render_diagram(graph: &ComponentGraph, format: OutputFormat) -> PolicyLensResult<String> {
    match format {
        OutputFormat::Text => Ok(text::render_diagram(graph)),
        OutputFormat::Json => json::render(graph),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ActionOverlap, OverlapResult};

    fn sample_report() -> OverlapReport {
        OverlapReport {
            file: "maintenance.toml".to_string(),
            statement_count: 2,
            overlaps: vec![OverlapResult {
                first: 0,
                second: 1,
                first_sid: Some("Wide".to_string()),
                second_sid: None,
                actions: vec![ActionOverlap {
                    first_pattern: "s3:Get*".to_string(),
                    second_pattern: "s3:GetObject".to_string(),
                }],
                resources_overlap: true,
                conditions_overlap: true,
            }],
        }
    }

    #[test]
    fn test_json_and_text_carry_the_same_findings() {
        let report = sample_report();
        let text = render_overlap(&report, OutputFormat::Text).expect("text");
        let json = render_overlap(&report, OutputFormat::Json).expect("json");

        let parsed: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
        let overlaps = parsed["overlaps"].as_array().expect("overlaps array");
        assert_eq!(overlaps.len(), report.overlaps.len());
        assert_eq!(overlaps[0]["first"], 0);
        assert_eq!(overlaps[0]["second"], 1);
        assert_eq!(overlaps[0]["actions"][0]["first_pattern"], "s3:Get*");

        assert!(text.contains("s3:Get*"));
        assert!(text.contains("s3:GetObject"));
        assert!(text.contains("statement 0 (Wide)"));
    }

    #[test]
    fn test_json_is_deterministic() {
        let report = sample_report();
        let first = render_overlap(&report, OutputFormat::Json).expect("json");
        let second = render_overlap(&report, OutputFormat::Json).expect("json");
        assert_eq!(first, second);
    }
}
