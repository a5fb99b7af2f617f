//! Policy-lens service layer.
//!
//! The service holds the resolved app configuration directory and
//! provides the high-level operations (overlap analysis, boundary
//! comparison, diagram generation) used by the CLI adapter.

use std::path::PathBuf;

use crate::error::{PolicyLensError, PolicyLensResult};

/// Main service struct, rooted at the app configuration directory.
pub struct PolicyLensService {
    pub(crate) app_dir: PathBuf,
}

impl PolicyLensService {
    /// Create a new service instance for the given app directory.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the directory does not exist.
    pub fn new(app_dir: PathBuf) -> PolicyLensResult<Self> {
        if !app_dir.is_dir() {
            return Err(PolicyLensError::not_found(format!(
                "app directory not found: {}",
                app_dir.display()
            )));
        }
        Ok(Self { app_dir })
    }

    /// The `permissions/` directory all policy documents resolve under.
    pub(crate) fn permissions_dir(&self) -> PathBuf {
        self.app_dir.join("permissions")
    }

    // check_overlap() is implemented in overlap.rs
    // check_boundaries() is implemented in boundaries.rs
    // generate_diagram() is implemented in diagram.rs
}
