//! This crate provides the core analysis logic for policy-lens:
//! - permission TOML and boundary JSON document parsing
//! - overlapping-action detection across policy statements
//! - permission boundary comparison across lifecycle stages
//! - component dependency graphs and report rendering
//!

mod commands;
mod error;
mod matching;
mod parsing;
mod report;
mod types;

// Re-exports for a small, focused public API
pub use commands::PolicyLensService;
pub use error::{PolicyLensError, PolicyLensResult};
pub use matching::{action_patterns_overlap, normalize_action};
pub use parsing::{discover_boundaries, load_boundary_document, load_permission_document};
pub use report::{render_boundaries, render_diagram, render_overlap, OutputFormat};
pub use types::{
    ActionOverlap, BoundaryDiff, BoundaryDocument, BoundaryReport, Component, ComponentGraph,
    DependencyEdge, Discrepancy, Effect, Grant, LifecycleStage, OverlapReport, OverlapResult,
    PermissionDocument, PolicyStatement, Severity,
};
