//! Component dependency graph extraction.
//!
//! Components reference each other's outputs in their variables with
//! `.platform.components.<name>.outputs` expressions; every such
//! reference becomes an edge in the graph.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::{PolicyLensError, PolicyLensResult};
use crate::types::{Component, ComponentGraph, DependencyEdge};

const REFERENCE_PATTERN: &str = r"\.platform\.components\.([a-zA-Z0-9_-]+)\.outputs";

impl super::service::PolicyLensService {
    /// Build the component dependency graph from a directory of
    /// component TOML files.
    ///
    /// Files are read in sorted name order; files without a `name` field
    /// are skipped, and references to unknown components are dropped.
    pub fn generate_diagram(&self, components_dir: &Path) -> PolicyLensResult<ComponentGraph> {
        if !components_dir.is_dir() {
            return Err(PolicyLensError::not_found(format!(
                "components directory not found: {}",
                components_dir.display()
            )));
        }
        let mut files: Vec<PathBuf> = fs::read_dir(components_dir)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|extension| extension == "toml"))
            .collect();
        files.sort();
        if files.is_empty() {
            return Err(PolicyLensError::not_found(format!(
                "no TOML files found in {}",
                components_dir.display()
            )));
        }

        let reference = Regex::new(REFERENCE_PATTERN).expect("reference pattern is valid");

        let mut components = Vec::new();
        let mut dependencies: Vec<BTreeSet<String>> = Vec::new();
        for path in &files {
            let raw = fs::read_to_string(path)?;
            let value: toml::Value =
                toml::from_str(&raw).map_err(|err| PolicyLensError::parse(path, err))?;

            let Some(name) = value.get("name").and_then(toml::Value::as_str) else {
                log::debug!("skipping {}: no component name", path.display());
                continue;
            };
            let kind = value
                .get("type")
                .and_then(toml::Value::as_str)
                .map(str::to_string);

            let mut references = BTreeSet::new();
            if let Some(vars) = value.get("vars").and_then(toml::Value::as_table) {
                for var in vars.values() {
                    if let Some(text) = var.as_str() {
                        collect_references(&reference, text, &mut references);
                    }
                }
            }
            if let Some(var_files) = value.get("var_file").and_then(toml::Value::as_array) {
                for var_file in var_files {
                    let Some(contents) = var_file.get("contents").and_then(toml::Value::as_str)
                    else {
                        continue;
                    };
                    let full_path = path.parent().unwrap_or(components_dir).join(contents);
                    if full_path.is_file() {
                        collect_references(&reference, &fs::read_to_string(&full_path)?, &mut references);
                    } else {
                        log::warn!(
                            "var_file {} not found for component {name}",
                            full_path.display()
                        );
                    }
                }
            }

            components.push(Component {
                name: name.to_string(),
                kind,
                file: file_name(path),
            });
            dependencies.push(references);
        }

        let known: BTreeSet<&str> = components
            .iter()
            .map(|component| component.name.as_str())
            .collect();
        let mut edges = Vec::new();
        for (component, references) in components.iter().zip(&dependencies) {
            for dependency in references {
                if known.contains(dependency.as_str()) {
                    edges.push(DependencyEdge {
                        from: dependency.clone(),
                        to: component.name.clone(),
                    });
                }
            }
        }

        Ok(ComponentGraph { components, edges })
    }
}

fn collect_references(pattern: &Regex, text: &str, references: &mut BTreeSet<String>) {
    for captures in pattern.captures_iter(text) {
        if let Some(name) = captures.get(1) {
            references.insert(name.as_str().to_string());
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::PolicyLensService;

    fn service_for(dir: &Path) -> PolicyLensService {
        PolicyLensService::new(dir.to_path_buf()).expect("service")
    }

    fn write_components(dir: &Path) {
        fs::write(
            dir.join("network.toml"),
            r#"
name = "network"
type = "terraform_module"
"#,
        )
        .expect("write network.toml");
        fs::write(
            dir.join("api.toml"),
            r#"
name = "api"
type = "container_image"

[vars]
vpc_id = "{{ .platform.components.network.outputs.vpc_id }}"
external = "{{ .platform.components.unknown.outputs.id }}"
"#,
        )
        .expect("write api.toml");
    }

    #[test]
    fn test_graph_nodes_and_edges() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_components(dir.path());

        let graph = service_for(dir.path())
            .generate_diagram(dir.path())
            .expect("diagram");

        // Sorted file order: api.toml before network.toml.
        let names: Vec<&str> = graph
            .components
            .iter()
            .map(|component| component.name.as_str())
            .collect();
        assert_eq!(names, vec!["api", "network"]);

        // The reference to the unknown component is dropped.
        assert_eq!(
            graph.edges,
            vec![DependencyEdge {
                from: "network".to_string(),
                to: "api".to_string(),
            }]
        );
    }

    #[test]
    fn test_var_file_references_contribute_edges() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("storage.toml"),
            "name = \"storage\"\ntype = \"terraform_module\"\n",
        )
        .expect("write storage.toml");
        fs::write(
            dir.path().join("worker.tfvars"),
            "bucket = \"{{ .platform.components.storage.outputs.bucket }}\"\n",
        )
        .expect("write worker.tfvars");
        fs::write(
            dir.path().join("worker.toml"),
            r#"
name = "worker"
type = "container_image"

[[var_file]]
contents = "worker.tfvars"
"#,
        )
        .expect("write worker.toml");

        let graph = service_for(dir.path())
            .generate_diagram(dir.path())
            .expect("diagram");
        assert_eq!(
            graph.edges,
            vec![DependencyEdge {
                from: "storage".to_string(),
                to: "worker".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_var_file_is_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("worker.toml"),
            "name = \"worker\"\n\n[[var_file]]\ncontents = \"absent.tfvars\"\n",
        )
        .expect("write worker.toml");

        let graph = service_for(dir.path())
            .generate_diagram(dir.path())
            .expect("diagram");
        assert_eq!(graph.components.len(), 1);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_file_without_name_is_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("anonymous.toml"), "type = \"x\"\n").expect("write toml");
        fs::write(dir.path().join("named.toml"), "name = \"named\"\n").expect("write toml");

        let graph = service_for(dir.path())
            .generate_diagram(dir.path())
            .expect("diagram");
        assert_eq!(graph.components.len(), 1);
        assert_eq!(graph.components[0].name, "named");
    }

    #[test]
    fn test_empty_directory_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = service_for(dir.path()).generate_diagram(dir.path());
        assert!(matches!(result, Err(PolicyLensError::NotFound(_))));
    }

    #[test]
    fn test_malformed_component_toml_aborts() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("broken.toml"), "name = [").expect("write toml");
        let result = service_for(dir.path()).generate_diagram(dir.path());
        assert!(matches!(result, Err(PolicyLensError::Parse { .. })));
    }
}
