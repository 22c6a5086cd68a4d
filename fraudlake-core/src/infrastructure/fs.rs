// fraudlake-core/src/infrastructure/fs.rs

use crate::infrastructure::error::InfrastructureError;
use std::io::Write;
use std::path::Path;

/// Write content to a file atomically through a temporary sibling file.
///
/// The run report must never be observable half-written by the
/// orchestrator, so we write next to the target and persist via rename.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = path.parent().unwrap_or_else(|| Path::new("."));

    // Same directory as the target so the rename stays on one filesystem
    let mut temp_file = tempfile::NamedTempFile::new_in(parent).map_err(InfrastructureError::Io)?;

    temp_file
        .write_all(content.as_ref())
        .map_err(InfrastructureError::Io)?;

    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}

/// Create the parent directory of an export target if it is missing.
///
/// DuckDB's `COPY ... TO` fails on a missing directory; snapshot paths
/// come from configuration and the landing/bronze/silver/gold folders
/// may not exist on a fresh deployment.
pub fn ensure_parent_dir<P: AsRef<Path>>(path: P) -> Result<(), InfrastructureError> {
    if let Some(parent) = path.as_ref().parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(InfrastructureError::Io)?;
    }
    Ok(())
}
