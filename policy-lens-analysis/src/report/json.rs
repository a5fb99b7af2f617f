//! Stable JSON rendering of report structures.

use serde::Serialize;

use crate::error::PolicyLensResult;

/// Pretty-print a report. Field names and ordering come from the report
/// structure itself, so the output is diff-friendly in automation.
pub(crate) fn render<T: Serialize>(report: &T) -> PolicyLensResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
