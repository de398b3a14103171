//! # recast
//!
//! Catalog-driven refactoring for Python source files. One invocation runs a
//! strict sequential pipeline over a single file:
//!
//! ```text
//! addressing string -> locator -> navigator -> analyzer -> mutator -> serializer
//! ```
//!
//! The engine parses the file into a tree-sitter concrete syntax tree,
//! resolves the addressed target, classifies identifier bindings in the
//! affected region, plans a set of non-overlapping byte-span edits, and
//! splices them into the original text. Untouched regions are preserved
//! byte-for-byte, and the file is only replaced after the whole pipeline has
//! succeeded.

pub mod analysis;
pub mod emit;
pub mod errors;
pub mod kinds;
pub mod locator;
pub mod mutator;
pub mod navigator;
pub mod recipes;
pub mod tree;
pub mod types;

use std::fs;

use tracing::info;

use crate::errors::{RefactorError, Result};
use crate::locator::TargetReference;
use crate::recipes::RecipeParams;
use crate::tree::SourceTree;
use crate::types::{ChangeReport, ChangeSpan};

/// Options of one engine invocation.
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Plan and serialize, but print instead of writing the file
    pub dry_run: bool,
}

/// Result of one engine invocation.
#[derive(Debug)]
pub struct ApplyOutcome {
    pub report: ChangeReport,
    /// The fully serialized file content after the transformation
    pub output: String,
}

/// Run one refactoring end-to-end: read, parse, locate, analyze, mutate,
/// serialize, write. On any error the target file is left untouched.
pub fn apply(
    recipe_name: &str,
    address: &str,
    params: &RecipeParams,
    options: &ApplyOptions,
) -> Result<ApplyOutcome> {
    let entry = recipes::lookup(recipe_name).ok_or_else(|| {
        RefactorError::Addressing(format!("unknown refactoring '{recipe_name}'"))
    })?;

    let reference = TargetReference::parse(address)?;
    let source = fs::read_to_string(&reference.file_path)?;
    let tree = SourceTree::parse(&source)?;

    let plan = entry.recipe.plan(&tree, &reference, params)?;
    let output = emit::serialize(&tree, &plan)?;

    let changes: Vec<ChangeSpan> = plan
        .edits()
        .iter()
        .map(|edit| ChangeSpan {
            start: edit.span.start,
            end: edit.span.end,
            new_text: edit.text.clone(),
        })
        .collect();
    let report = ChangeReport::new(
        &reference.file_path.display().to_string(),
        recipe_name,
        changes,
        &source,
        &output,
        options.dry_run,
    );

    if !options.dry_run && !report.is_noop() {
        emit::write_atomic(&reference.file_path, &output)?;
    }
    info!(
        recipe = recipe_name,
        edits = report.changes.len(),
        dry_run = options.dry_run,
        "refactoring complete"
    );

    Ok(ApplyOutcome { report, output })
}
