//! Human-readable text rendering, colorized for terminals.

use std::fmt::Write as _;

use colored::Colorize;

use crate::types::{
    BoundaryReport, ComponentGraph, Discrepancy, Grant, LifecycleStage, OverlapReport, Severity,
};

pub(crate) fn render_overlap(report: &OverlapReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}",
        "Policy Overlap Report:".bold(),
        report.file.cyan()
    );
    let _ = writeln!(out, "  statements analyzed: {}", report.statement_count);
    let _ = writeln!(out);
    if report.overlaps.is_empty() {
        let _ = writeln!(
            out,
            "{}",
            "No overlapping actions found between statements.".green().bold()
        );
        return out;
    }

    let _ = writeln!(
        out,
        "{}",
        format!(
            "Found {} overlapping statement pair(s)",
            report.overlaps.len()
        )
        .yellow()
        .bold()
    );
    for overlap in &report.overlaps {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "  {} <-> {}",
            describe_statement(overlap.first, overlap.first_sid.as_deref()).cyan(),
            describe_statement(overlap.second, overlap.second_sid.as_deref()).cyan()
        );
        for pair in &overlap.actions {
            let _ = writeln!(
                out,
                "    {} <-> {}",
                pair.first_pattern.red(),
                pair.second_pattern.red()
            );
        }
        let _ = writeln!(
            out,
            "    resources overlap: {}",
            yes_no(overlap.resources_overlap)
        );
        let _ = writeln!(
            out,
            "    conditions overlap: {}",
            yes_no(overlap.conditions_overlap)
        );
    }
    out
}

pub(crate) fn render_boundaries(report: &BoundaryReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Permission Boundary Report".bold());
    let stages: Vec<&str> = report.stages.iter().map(|stage| stage.as_str()).collect();
    let _ = writeln!(out, "  loaded stages: {}", stages.join(", ").cyan());

    for diff in &report.diffs {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{} <-> {}",
            diff.first.as_str().cyan().bold(),
            diff.second.as_str().cyan().bold()
        );
        render_grant_group(&mut out, &format!("only in {}", diff.first), &diff.only_in_first);
        render_grant_group(
            &mut out,
            &format!("only in {}", diff.second),
            &diff.only_in_second,
        );
        let _ = writeln!(out, "  shared: {} grant(s)", diff.shared.len());
    }

    let _ = writeln!(out);
    if report.findings.is_empty() {
        let _ = writeln!(out, "{}", "All boundaries are consistent!".green().bold());
        return out;
    }

    for severity in [Severity::High, Severity::Medium, Severity::Low] {
        let findings: Vec<&Discrepancy> = report
            .findings
            .iter()
            .filter(|finding| finding.severity == severity)
            .collect();
        if findings.is_empty() {
            continue;
        }
        let heading = format!(
            "{} PRIORITY ({} finding(s))",
            severity.as_str().to_uppercase(),
            findings.len()
        );
        let heading = match severity {
            Severity::High => heading.red().bold(),
            Severity::Medium => heading.yellow().bold(),
            Severity::Low => heading.blue().bold(),
        };
        let _ = writeln!(out, "{heading}");
        for finding in findings {
            let _ = writeln!(out, "  {} {}", finding.effect, finding.action.red());
            let _ = writeln!(
                out,
                "    present in: {}",
                join_stages(&finding.present_in).green()
            );
            let _ = writeln!(
                out,
                "    missing from: {}",
                join_stages(&finding.missing_from).red()
            );
            if !finding.note.is_empty() {
                let _ = writeln!(out, "    {}", finding.note.dimmed());
            }
        }
        let _ = writeln!(out);
    }

    let high = count_by(report, Severity::High);
    let medium = count_by(report, Severity::Medium);
    let low = count_by(report, Severity::Low);
    let _ = writeln!(
        out,
        "{} {} (high: {high}, medium: {medium}, low: {low})",
        "Total discrepancies:".bold(),
        report.findings.len()
    );
    out
}

pub(crate) fn render_diagram(graph: &ComponentGraph) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "```mermaid");
    let _ = writeln!(out, "graph TD");

    for component in &graph.components {
        let _ = writeln!(
            out,
            "  {}[\"{}<br/>{}\"]",
            component.name, component.name, component.file
        );
    }
    let _ = writeln!(out);

    for edge in &graph.edges {
        let _ = writeln!(out, "  {} --> {}", edge.from, edge.to);
    }
    let _ = writeln!(out);

    let infra: Vec<&str> = graph
        .components
        .iter()
        .filter(|component| component.kind.as_deref() != Some("container_image"))
        .map(|component| component.name.as_str())
        .collect();
    let images: Vec<&str> = graph
        .components
        .iter()
        .filter(|component| component.kind.as_deref() == Some("container_image"))
        .map(|component| component.name.as_str())
        .collect();
    if !infra.is_empty() {
        let _ = writeln!(out, "  class {} infraClass;", infra.join(","));
    }
    if !images.is_empty() {
        let _ = writeln!(out, "  class {} imageClass;", images.join(","));
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  classDef infraClass fill:#D6B0FC,stroke:#8040BF,color:#000;"
    );
    let _ = writeln!(
        out,
        "  classDef imageClass fill:#FCA04A,stroke:#CC803A,color:#000;"
    );
    let _ = writeln!(out, "```");
    out
}

fn render_grant_group(out: &mut String, label: &str, grants: &[Grant]) {
    let _ = writeln!(out, "  {label} ({}):", grants.len());
    for grant in grants {
        let _ = writeln!(
            out,
            "    {} {} on {}",
            grant.effect,
            grant.action.red(),
            grant.resource
        );
    }
}

fn describe_statement(index: usize, sid: Option<&str>) -> String {
    match sid {
        Some(sid) => format!("statement {index} ({sid})"),
        None => format!("statement {index}"),
    }
}

fn join_stages(stages: &[LifecycleStage]) -> String {
    stages
        .iter()
        .map(|stage| stage.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn count_by(report: &BoundaryReport, severity: Severity) -> usize {
    report
        .findings
        .iter()
        .filter(|finding| finding.severity == severity)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        BoundaryDiff, Component, DependencyEdge, Effect, LifecycleStage,
    };

    #[test]
    fn test_boundary_text_groups_findings_by_severity() {
        let report = BoundaryReport {
            stages: vec![LifecycleStage::Provision, LifecycleStage::Maintenance],
            diffs: vec![BoundaryDiff {
                first: LifecycleStage::Provision,
                second: LifecycleStage::Maintenance,
                only_in_first: vec![],
                only_in_second: vec![Grant {
                    action: "logs:DeleteLogGroup".to_string(),
                    resource: "*".to_string(),
                    effect: Effect::Allow,
                }],
                shared: vec![],
            }],
            findings: vec![Discrepancy {
                action: "logs:DeleteLogGroup".to_string(),
                effect: Effect::Allow,
                present_in: vec![LifecycleStage::Maintenance],
                missing_from: vec![LifecycleStage::Provision],
                severity: Severity::High,
                note: "Maintenance allows this but provision/deprovision do not!".to_string(),
            }],
        };
        let text = render_boundaries(&report);
        assert!(text.contains("HIGH PRIORITY (1 finding(s))"));
        assert!(text.contains("logs:DeleteLogGroup"));
        assert!(text.contains("Total discrepancies: 1"));
    }

    #[test]
    fn test_consistent_boundaries_say_so() {
        let report = BoundaryReport {
            stages: vec![LifecycleStage::Provision, LifecycleStage::Deprovision],
            diffs: vec![],
            findings: vec![],
        };
        assert!(render_boundaries(&report).contains("All boundaries are consistent!"));
    }

    #[test]
    fn test_diagram_is_a_fenced_mermaid_block() {
        let graph = ComponentGraph {
            components: vec![
                Component {
                    name: "api".to_string(),
                    kind: Some("container_image".to_string()),
                    file: "api.toml".to_string(),
                },
                Component {
                    name: "network".to_string(),
                    kind: Some("terraform_module".to_string()),
                    file: "network.toml".to_string(),
                },
            ],
            edges: vec![DependencyEdge {
                from: "network".to_string(),
                to: "api".to_string(),
            }],
        };
        let text = render_diagram(&graph);
        assert!(text.starts_with("```mermaid\ngraph TD\n"));
        assert!(text.contains("  network --> api"));
        assert!(text.contains("  class network infraClass;"));
        assert!(text.contains("  class api imageClass;"));
        assert!(text.trim_end().ends_with("```"));
    }
}
