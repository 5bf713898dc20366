//! Repository preflight using git2.

use std::path::{Path, PathBuf};

use git2::Repository;

use crate::error::VcsError;

/// Check that `path` is inside a non-bare git work tree.
///
/// Returns the work tree root on success.
pub fn ensure_repository(path: &Path) -> Result<PathBuf, VcsError> {
    let repo = Repository::discover(path).map_err(VcsError::NotARepository)?;
    repo.workdir()
        .map(Path::to_path_buf)
        .ok_or(VcsError::BareRepository)
}
