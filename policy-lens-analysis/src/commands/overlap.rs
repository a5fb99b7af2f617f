//! Overlap analysis across policy statements in one permission document.

use crate::error::PolicyLensResult;
use crate::matching;
use crate::parsing;
use crate::types::{
    ActionOverlap, Effect, OverlapReport, OverlapResult, PermissionDocument, PolicyStatement,
};

impl super::service::PolicyLensService {
    /// Check a permission document for overlapping IAM actions between
    /// allow statements.
    ///
    /// `permission_file` is the file name of a permission TOML document,
    /// resolved under `permissions/` in the app directory.
    pub fn check_overlap(&self, permission_file: &str) -> PolicyLensResult<OverlapReport> {
        let path = self.permissions_dir().join(permission_file);
        log::debug!("analyzing permission document {}", path.display());
        let document = parsing::load_permission_document(&path)?;
        let overlaps = find_overlaps(&document);
        Ok(OverlapReport {
            file: permission_file.to_string(),
            statement_count: document.statements.len(),
            overlaps,
        })
    }
}

/// Find overlapping allow-statement pairs, ordered by ascending index pair.
fn find_overlaps(document: &PermissionDocument) -> Vec<OverlapResult> {
    let statements = &document.statements;
    let mut results = Vec::new();
    for (first, a) in statements.iter().enumerate() {
        if a.effect != Effect::Allow {
            continue;
        }
        for (offset, b) in statements[first + 1..].iter().enumerate() {
            if b.effect != Effect::Allow {
                continue;
            }
            let actions = overlapping_actions(a, b);
            if actions.is_empty() {
                continue;
            }
            results.push(OverlapResult {
                first,
                second: first + 1 + offset,
                first_sid: a.sid.clone(),
                second_sid: b.sid.clone(),
                actions,
                resources_overlap: matching::pattern_sets_overlap(&a.resources, &b.resources),
                conditions_overlap: conditions_overlap(a, b),
            });
        }
    }
    results
}

/// Action-pattern pairs from the two statements that denote at least one
/// common concrete action, in input order.
fn overlapping_actions(a: &PolicyStatement, b: &PolicyStatement) -> Vec<ActionOverlap> {
    let mut pairs = Vec::new();
    for first_pattern in &a.actions {
        for second_pattern in &b.actions {
            if matching::action_patterns_overlap(first_pattern, second_pattern) {
                pairs.push(ActionOverlap {
                    first_pattern: first_pattern.clone(),
                    second_pattern: second_pattern.clone(),
                });
            }
        }
    }
    pairs
}

/// Condition blocks are opaque: two statements' scopes overlap when
/// either statement is unconditional or the blocks are equal.
fn conditions_overlap(a: &PolicyStatement, b: &PolicyStatement) -> bool {
    match (&a.condition, &b.condition) {
        (None, _) | (_, None) => true,
        (Some(x), Some(y)) => x == y,
    }
}
