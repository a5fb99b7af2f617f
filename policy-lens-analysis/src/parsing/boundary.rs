//! Boundary JSON document loading and per-stage discovery.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PolicyLensError, PolicyLensResult};
use crate::matching::normalize_action;
use crate::types::{BoundaryDocument, Effect, Grant, LifecycleStage};

const BOUNDARY_SUFFIX: &str = "_boundary.json";

/// Boundary document path for a stage, e.g. `provision_boundary.json`.
fn boundary_path(permissions_dir: &Path, stage: LifecycleStage) -> PathBuf {
    permissions_dir.join(format!("{stage}{BOUNDARY_SUFFIX}"))
}

/// Discover boundary documents by their fixed per-stage file names.
///
/// Returns the documents in canonical stage order. At least two stages
/// must be present, otherwise there is nothing to compare.
pub fn discover_boundaries(permissions_dir: &Path) -> PolicyLensResult<Vec<BoundaryDocument>> {
    let mut documents = Vec::new();
    let mut missing = Vec::new();
    for stage in LifecycleStage::ALL {
        let path = boundary_path(permissions_dir, stage);
        if path.is_file() {
            documents.push(load_boundary_document(&path, stage)?);
        } else {
            log::debug!("no boundary document for {stage}: {}", path.display());
            missing.push(stage.as_str());
        }
    }
    if documents.len() < 2 {
        return Err(PolicyLensError::not_found(format!(
            "found {} boundary file(s) under {}, need at least two to compare (missing: {})",
            documents.len(),
            permissions_dir.display(),
            missing.join(", ")
        )));
    }
    Ok(documents)
}

/// Load one boundary document, flattening its statements into a set of
/// normalized grants. A statement without a `Resource` grants `*`.
pub fn load_boundary_document(
    path: &Path,
    stage: LifecycleStage,
) -> PolicyLensResult<BoundaryDocument> {
    let raw = fs::read_to_string(path)?;
    let policy: RawPolicy =
        serde_json::from_str(&raw).map_err(|err| PolicyLensError::parse(path, err))?;

    let mut grants = BTreeSet::new();
    for statement in &policy.statement {
        for action in &statement.action {
            let action = normalize_action(action);
            if statement.resource.is_empty() {
                grants.insert(Grant {
                    action,
                    resource: "*".to_string(),
                    effect: statement.effect,
                });
            } else {
                for resource in &statement.resource {
                    grants.insert(Grant {
                        action: action.clone(),
                        resource: resource.clone(),
                        effect: statement.effect,
                    });
                }
            }
        }
    }
    Ok(BoundaryDocument { stage, grants })
}

/// IAM policy-document shape used by boundary files.
#[derive(Debug, Deserialize)]
struct RawPolicy {
    #[serde(rename = "Statement", default)]
    statement: Vec<RawStatement>,
}

#[derive(Debug, Deserialize)]
struct RawStatement {
    #[serde(rename = "Effect", default)]
    effect: Effect,
    #[serde(rename = "Action", default, deserialize_with = "super::string_or_list")]
    action: Vec<String>,
    #[serde(rename = "Resource", default, deserialize_with = "super::string_or_list")]
    resource: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_boundary(dir: &Path, stage: LifecycleStage, contents: &str) {
        fs::write(boundary_path(dir, stage), contents).expect("write boundary file");
    }

    const PROVISION: &str = r#"{
        "Version": "2012-10-17",
        "Statement": [
            {"Effect": "Allow", "Action": ["s3:GetObject", "S3:PutObject"], "Resource": "arn:aws:s3:::state/*"},
            {"Effect": "Deny", "Action": "iam:*"}
        ]
    }"#;

    #[test]
    fn test_load_flattens_statements_into_grants() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_boundary(dir.path(), LifecycleStage::Provision, PROVISION);

        let document = load_boundary_document(
            &boundary_path(dir.path(), LifecycleStage::Provision),
            LifecycleStage::Provision,
        )
        .expect("load");

        assert_eq!(document.stage, LifecycleStage::Provision);
        let grants: Vec<&Grant> = document.grants.iter().collect();
        assert_eq!(grants.len(), 3);
        // Service prefix normalized, missing Resource defaulted to "*".
        assert!(document.grants.contains(&Grant {
            action: "s3:PutObject".to_string(),
            resource: "arn:aws:s3:::state/*".to_string(),
            effect: Effect::Allow,
        }));
        assert!(document.grants.contains(&Grant {
            action: "iam:*".to_string(),
            resource: "*".to_string(),
            effect: Effect::Deny,
        }));
    }

    #[test]
    fn test_discover_returns_stages_in_canonical_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_boundary(dir.path(), LifecycleStage::Breakglass, PROVISION);
        write_boundary(dir.path(), LifecycleStage::Provision, PROVISION);
        write_boundary(dir.path(), LifecycleStage::Maintenance, PROVISION);

        let documents = discover_boundaries(dir.path()).expect("discover");
        let stages: Vec<LifecycleStage> = documents.iter().map(|d| d.stage).collect();
        assert_eq!(
            stages,
            vec![
                LifecycleStage::Provision,
                LifecycleStage::Maintenance,
                LifecycleStage::Breakglass,
            ]
        );
    }

    #[test]
    fn test_discover_requires_at_least_two_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_boundary(dir.path(), LifecycleStage::Provision, PROVISION);

        let result = discover_boundaries(dir.path());
        match result {
            Err(PolicyLensError::NotFound(message)) => {
                assert!(message.contains("need at least two"), "message: {message}");
                assert!(message.contains("deprovision"), "message: {message}");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_boundary(dir.path(), LifecycleStage::Provision, "{\"Statement\": [");
        write_boundary(dir.path(), LifecycleStage::Deprovision, PROVISION);

        let result = discover_boundaries(dir.path());
        assert!(matches!(result, Err(PolicyLensError::Parse { .. })));
    }

    #[test]
    fn test_effect_defaults_to_allow() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_boundary(
            dir.path(),
            LifecycleStage::Provision,
            r#"{"Statement": [{"Action": "s3:GetObject"}]}"#,
        );
        let document = load_boundary_document(
            &boundary_path(dir.path(), LifecycleStage::Provision),
            LifecycleStage::Provision,
        )
        .expect("load");
        let grant = document.grants.iter().next().expect("one grant");
        assert_eq!(grant.effect, Effect::Allow);
    }
}
