//! Permission and boundary document loading.

mod boundary;
mod permission;

pub use boundary::{discover_boundaries, load_boundary_document};
pub use permission::load_permission_document;

use serde::{Deserialize, Deserializer};

/// Accept either a single string or a list of strings. IAM policy
/// documents allow both forms for `Action` and `Resource`, and the
/// permission TOML format keeps the same flexibility.
pub(crate) fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        One(String),
        Many(Vec<String>),
    }

    Ok(match StringOrList::deserialize(deserializer)? {
        StringOrList::One(value) => vec![value],
        StringOrList::Many(values) => values,
    })
}
