//! Simplifying-method-calls recipes: renames and signature changes.

use tracing::debug;

use super::{require, Recipe, RecipeParams};
use crate::errors::{RefactorError, Result};
use crate::locator::TargetReference;
use crate::mutator::{self, RenameScope, TransformationPlan};
use crate::navigator;
use crate::tree::SourceTree;

/// Rename a method and every file-local call site.
pub struct RenameMethod;

impl Recipe for RenameMethod {
    fn name(&self) -> &'static str {
        "rename-method"
    }

    fn plan(
        &self,
        tree: &SourceTree,
        reference: &TargetReference,
        params: &RecipeParams,
    ) -> Result<TransformationPlan> {
        let new_name = require(&params.name, "--name", self.name())?;
        rename_method_to(tree, reference, new_name)
    }
}

/// Rename a method to its underscore-private form, taking it out of the
/// class's public surface.
pub struct HideMethod;

impl Recipe for HideMethod {
    fn name(&self) -> &'static str {
        "hide-method"
    }

    fn plan(
        &self,
        tree: &SourceTree,
        reference: &TargetReference,
        _params: &RecipeParams,
    ) -> Result<TransformationPlan> {
        let method = reference.method_name.as_deref().ok_or_else(|| {
            RefactorError::Addressing(
                "address must name a method (file::Class::method)".to_string(),
            )
        })?;
        if method.starts_with('_') {
            return Err(RefactorError::TargetNotFound(format!(
                "method '{method}' is already private"
            )));
        }
        rename_method_to(tree, reference, &format!("_{method}"))
    }
}

fn rename_method_to(
    tree: &SourceTree,
    reference: &TargetReference,
    new_name: &str,
) -> Result<TransformationPlan> {
    let target = navigator::resolve_function(tree, reference)?;
    let class = target.class.ok_or_else(|| {
        RefactorError::TargetNotFound("rename needs a class method target".to_string())
    })?;
    let old = reference.method_name.as_deref().ok_or_else(|| {
        RefactorError::Addressing("address must name a method (file::Class::method)".to_string())
    })?;

    debug!(old, new = new_name, "renaming method");
    mutator::rename_binding(tree, RenameScope::Method { class }, old, new_name)
}

/// Append a defaulted parameter to a method's signature.
pub struct AddParameter;

impl Recipe for AddParameter {
    fn name(&self) -> &'static str {
        "add-parameter"
    }

    fn plan(
        &self,
        tree: &SourceTree,
        reference: &TargetReference,
        params: &RecipeParams,
    ) -> Result<TransformationPlan> {
        let param_name = require(&params.name, "--name", self.name())?;
        let default = params.default.as_deref().unwrap_or("None");
        let target = navigator::resolve_function(tree, reference)?;
        mutator::add_parameter(tree, &target, param_name, default)
    }
}

/// Remove a parameter and rewrite file-local call sites.
pub struct RemoveParameter;

impl Recipe for RemoveParameter {
    fn name(&self) -> &'static str {
        "remove-parameter"
    }

    fn plan(
        &self,
        tree: &SourceTree,
        reference: &TargetReference,
        params: &RecipeParams,
    ) -> Result<TransformationPlan> {
        let param_name = require(&params.name, "--name", self.name())?;
        let target = navigator::resolve_function(tree, reference)?;
        mutator::remove_parameter(tree, &target, param_name)
    }
}
