//! Shared data model: policy documents, grants, and report structures.
//!
//! Everything here is created per invocation, held in memory for one
//! command, and discarded on exit. Report structures derive `Serialize`
//! and define the stable JSON output schema; field order in the source
//! is the field order on the wire.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Statement effect. TOML documents use the lowercase spelling,
/// boundary JSON documents use IAM's `Allow`/`Deny`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    #[default]
    #[serde(alias = "Allow")]
    Allow,
    #[serde(alias = "Deny")]
    Deny,
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => f.write_str("allow"),
            Self::Deny => f.write_str("deny"),
        }
    }
}

/// One policy statement from a permission document. Immutable once parsed.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyStatement {
    /// Optional statement identifier, mirrored into overlap results.
    #[serde(default)]
    pub sid: Option<String>,
    #[serde(default)]
    pub effect: Effect,
    /// Action patterns; `*` is treated as a prefix wildcard.
    #[serde(default, deserialize_with = "crate::parsing::string_or_list")]
    pub actions: Vec<String>,
    /// Resource patterns; absent means unrestricted.
    #[serde(
        default = "default_resources",
        deserialize_with = "crate::parsing::string_or_list"
    )]
    pub resources: Vec<String>,
    /// Opaque condition block; compared only for equality.
    #[serde(default)]
    pub condition: Option<toml::value::Table>,
}

fn default_resources() -> Vec<String> {
    vec!["*".to_string()]
}

/// An ordered sequence of policy statements loaded from one TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PermissionDocument {
    #[serde(default, rename = "statement")]
    pub statements: Vec<PolicyStatement>,
}

/// Application lifecycle stage. The variant order is the canonical
/// stage ordering used everywhere boundaries are listed or paired.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStage {
    Provision,
    Deprovision,
    Maintenance,
    Breakglass,
}

impl LifecycleStage {
    /// All stages in canonical order.
    pub const ALL: [Self; 4] = [
        Self::Provision,
        Self::Deprovision,
        Self::Maintenance,
        Self::Breakglass,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Provision => "provision",
            Self::Deprovision => "deprovision",
            Self::Maintenance => "maintenance",
            Self::Breakglass => "breakglass",
        }
    }
}

impl fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One grant from a boundary document. The action is stored in
/// normalized form (lowercase service prefix), so grant equality is
/// normalization-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Grant {
    pub action: String,
    pub resource: String,
    pub effect: Effect,
}

/// A boundary document for one lifecycle stage, flattened to its grant set.
#[derive(Debug, Clone)]
pub struct BoundaryDocument {
    pub stage: LifecycleStage,
    pub grants: BTreeSet<Grant>,
}

/// A pair of action patterns, one per statement, that denote at least
/// one common concrete action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOverlap {
    pub first_pattern: String,
    pub second_pattern: String,
}

/// Overlap between two allow statements, identified by statement index.
#[derive(Debug, Clone, Serialize)]
pub struct OverlapResult {
    pub first: usize,
    pub second: usize,
    pub first_sid: Option<String>,
    pub second_sid: Option<String>,
    pub actions: Vec<ActionOverlap>,
    pub resources_overlap: bool,
    pub conditions_overlap: bool,
}

/// Overlap analysis of one permission document.
#[derive(Debug, Clone, Serialize)]
pub struct OverlapReport {
    pub file: String,
    pub statement_count: usize,
    /// Ordered by ascending `(first, second)` index pair.
    pub overlaps: Vec<OverlapResult>,
}

impl OverlapReport {
    /// Whether the analysis produced any findings.
    pub fn has_findings(&self) -> bool {
        !self.overlaps.is_empty()
    }
}

/// Grant-set difference between two lifecycle stages.
#[derive(Debug, Clone, Serialize)]
pub struct BoundaryDiff {
    pub first: LifecycleStage,
    pub second: LifecycleStage,
    pub only_in_first: Vec<Grant>,
    pub only_in_second: Vec<Grant>,
    pub shared: Vec<Grant>,
}

/// Finding severity for boundary discrepancies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action allowed (or denied) in some stages but missing from others.
#[derive(Debug, Clone, Serialize)]
pub struct Discrepancy {
    /// Normalized action pattern.
    pub action: String,
    pub effect: Effect,
    pub present_in: Vec<LifecycleStage>,
    pub missing_from: Vec<LifecycleStage>,
    pub severity: Severity,
    pub note: String,
}

/// Boundary comparison across all discovered lifecycle stages.
#[derive(Debug, Clone, Serialize)]
pub struct BoundaryReport {
    pub stages: Vec<LifecycleStage>,
    /// Every stage pair in canonical order.
    pub diffs: Vec<BoundaryDiff>,
    /// Per-grant discrepancies, sorted by `(action, effect)`.
    pub findings: Vec<Discrepancy>,
}

impl BoundaryReport {
    /// Whether any finding warrants a non-zero exit.
    pub fn has_high_findings(&self) -> bool {
        self.findings
            .iter()
            .any(|finding| finding.severity == Severity::High)
    }
}

/// One component node in the dependency graph.
#[derive(Debug, Clone, Serialize)]
pub struct Component {
    pub name: String,
    /// Component type from the TOML file, when present.
    pub kind: Option<String>,
    /// Source file name the component was read from.
    pub file: String,
}

/// Directed dependency: `from` produces outputs consumed by `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyEdge {
    pub from: String,
    pub to: String,
}

/// Component dependency graph extracted from a components directory.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentGraph {
    pub components: Vec<Component>,
    pub edges: Vec<DependencyEdge>,
}
