//! # Serializer
//!
//! Applies a [`TransformationPlan`] to the original source and writes the
//! result back. Untouched regions are copied byte-for-byte from the input;
//! only the edited spans differ. The file replacement is atomic: the result
//! is written to a temporary file in the same directory and renamed over the
//! target, so an interrupted invocation leaves the original intact.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::errors::Result;
use crate::mutator::TransformationPlan;
use crate::tree::SourceTree;

/// Serialize the transformed source. A plan with no edits reproduces the
/// tree's source exactly (round-trip fidelity).
pub fn serialize(tree: &SourceTree, plan: &TransformationPlan) -> Result<String> {
    plan.apply(tree.source())
}

/// Atomically replace `path` with `content`.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    let tmp_path = path.with_file_name(format!(".{file_name}.recast-tmp"));

    fs::write(&tmp_path, content)?;
    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err.into());
    }

    info!(path = %path.display(), bytes = content.len(), "wrote refactored file");
    Ok(())
}
