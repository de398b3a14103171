//! Shared result types for applied refactorings.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One edited region of the target file, in byte offsets of the original
/// source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeSpan {
    pub start: usize,
    pub end: usize,
    pub new_text: String,
}

/// Summary of a successful (or previewed) transformation, emitted on
/// `--json` and logged otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeReport {
    pub file_path: String,
    pub recipe: String,
    pub changes: Vec<ChangeSpan>,
    /// SHA-256 of the file before the transformation
    pub old_hash: String,
    /// SHA-256 of the file after the transformation
    pub new_hash: String,
    /// True when `--dry-run` kept the file untouched
    pub dry_run: bool,
}

impl ChangeReport {
    pub fn new(
        file_path: &str,
        recipe: &str,
        changes: Vec<ChangeSpan>,
        old_source: &str,
        new_source: &str,
        dry_run: bool,
    ) -> Self {
        Self {
            file_path: file_path.to_string(),
            recipe: recipe.to_string(),
            changes,
            old_hash: format!("{:x}", Sha256::digest(old_source.as_bytes())),
            new_hash: format!("{:x}", Sha256::digest(new_source.as_bytes())),
            dry_run,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.old_hash == self.new_hash
    }
}
