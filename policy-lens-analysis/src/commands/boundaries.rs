//! Lifecycle boundary comparison.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{PolicyLensError, PolicyLensResult};
use crate::parsing;
use crate::types::{
    BoundaryDiff, BoundaryDocument, BoundaryReport, Discrepancy, Effect, LifecycleStage, Severity,
};

impl super::service::PolicyLensService {
    /// Compare permission boundaries across the discovered lifecycle stages.
    ///
    /// Boundary documents are found by their fixed per-stage file names
    /// under `permissions/`; at least two stages must be present.
    pub fn check_boundaries(&self) -> PolicyLensResult<BoundaryReport> {
        let permissions_dir = self.permissions_dir();
        if !permissions_dir.is_dir() {
            return Err(PolicyLensError::not_found(format!(
                "no permissions/ directory under {}",
                self.app_dir.display()
            )));
        }
        let documents = parsing::discover_boundaries(&permissions_dir)?;
        log::debug!("comparing {} boundary documents", documents.len());
        Ok(compare(&documents))
    }
}

fn compare(documents: &[BoundaryDocument]) -> BoundaryReport {
    let mut diffs = Vec::new();
    for (index, first) in documents.iter().enumerate() {
        for second in &documents[index + 1..] {
            diffs.push(diff_boundaries(first, second));
        }
    }
    BoundaryReport {
        stages: documents.iter().map(|document| document.stage).collect(),
        diffs,
        findings: classify_discrepancies(documents),
    }
}

/// Grant-set difference between two stages. Grant ordering within each
/// group follows the grants' natural order.
fn diff_boundaries(first: &BoundaryDocument, second: &BoundaryDocument) -> BoundaryDiff {
    BoundaryDiff {
        first: first.stage,
        second: second.stage,
        only_in_first: first.grants.difference(&second.grants).cloned().collect(),
        only_in_second: second.grants.difference(&first.grants).cloned().collect(),
        shared: first.grants.intersection(&second.grants).cloned().collect(),
    }
}

/// Flag every `(action, effect)` key that is present in some loaded
/// stages but missing from others.
///
/// Severity: a grant that maintenance has but neither provision nor
/// deprovision does is the dangerous case; breakglass-only grants are
/// expected; everything else is worth a look.
fn classify_discrepancies(documents: &[BoundaryDocument]) -> Vec<Discrepancy> {
    let loaded: Vec<LifecycleStage> = documents.iter().map(|document| document.stage).collect();

    let mut presence: BTreeMap<(String, Effect), BTreeSet<LifecycleStage>> = BTreeMap::new();
    for document in documents {
        for grant in &document.grants {
            presence
                .entry((grant.action.clone(), grant.effect))
                .or_default()
                .insert(document.stage);
        }
    }

    let mut findings = Vec::new();
    for ((action, effect), present_in) in presence {
        let missing_from: Vec<LifecycleStage> = loaded
            .iter()
            .copied()
            .filter(|stage| !present_in.contains(stage))
            .collect();
        if missing_from.is_empty() {
            continue;
        }

        let maintenance_only = present_in.contains(&LifecycleStage::Maintenance)
            && !present_in.contains(&LifecycleStage::Provision)
            && !present_in.contains(&LifecycleStage::Deprovision);
        let breakglass_only =
            present_in.len() == 1 && present_in.contains(&LifecycleStage::Breakglass);

        let (severity, note) = if maintenance_only {
            (
                Severity::High,
                "Maintenance allows this but provision/deprovision do not!",
            )
        } else if breakglass_only {
            (
                Severity::Low,
                "Breakglass-only (expected for emergency access)",
            )
        } else if missing_from.contains(&LifecycleStage::Provision)
            || missing_from.contains(&LifecycleStage::Deprovision)
        {
            (Severity::Medium, "Missing from core lifecycle boundaries")
        } else {
            (Severity::Medium, "")
        };

        findings.push(Discrepancy {
            action,
            effect,
            present_in: present_in.into_iter().collect(),
            missing_from,
            severity,
            note: note.to_string(),
        });
    }
    findings
}
