//! Permission TOML document loading.

use std::fs;
use std::path::Path;

use crate::error::{PolicyLensError, PolicyLensResult};
use crate::types::PermissionDocument;

/// Load and validate a permission document from a TOML file.
pub fn load_permission_document(path: &Path) -> PolicyLensResult<PermissionDocument> {
    if !path.is_file() {
        return Err(PolicyLensError::not_found(format!(
            "permission file not found: {}",
            path.display()
        )));
    }
    let raw = fs::read_to_string(path)?;
    let document: PermissionDocument =
        toml::from_str(&raw).map_err(|err| PolicyLensError::parse(path, err))?;
    validate(&document, path)?;
    Ok(document)
}

/// A parsed document can still be unusable: every statement needs at
/// least one action, and empty patterns match nothing.
fn validate(document: &PermissionDocument, path: &Path) -> PolicyLensResult<()> {
    for (index, statement) in document.statements.iter().enumerate() {
        if statement.actions.is_empty() {
            return Err(PolicyLensError::validation(
                path,
                format!("statement {index} has no actions"),
            ));
        }
        for pattern in statement.actions.iter().chain(statement.resources.iter()) {
            if pattern.trim().is_empty() {
                return Err(PolicyLensError::validation(
                    path,
                    format!("statement {index} contains an empty pattern"),
                ));
            }
        }
    }
    Ok(())
}
