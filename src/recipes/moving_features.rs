//! Moving-features recipes: relocating members between classes and hiding
//! collaborators behind delegating methods.

use tracing::debug;

use super::{require, Recipe, RecipeParams};
use crate::errors::{RefactorError, Result};
use crate::locator::TargetReference;
use crate::mutator::{self, parameters_text, TransformationPlan};
use crate::navigator::{
    self, body_of, find_class, find_method_in_class, resolve_class, self_field_assignments,
    statements_of,
};
use crate::tree::SourceTree;

/// Move a method to another class, leaving a delegating wrapper behind.
pub struct MoveMethod;

impl Recipe for MoveMethod {
    fn name(&self) -> &'static str {
        "move-method"
    }

    fn plan(
        &self,
        tree: &SourceTree,
        reference: &TargetReference,
        params: &RecipeParams,
    ) -> Result<TransformationPlan> {
        let dest_name = require(&params.to, "--to", self.name())?;
        let target = navigator::resolve_function(tree, reference)?;
        let source_class = target.class.as_ref().ok_or_else(|| {
            RefactorError::TargetNotFound("move-method needs a class method target".to_string())
        })?;
        let dest_class = find_class(tree, dest_name).ok_or_else(|| {
            RefactorError::TargetNotFound(format!("class '{dest_name}'"))
        })?;

        let holder = match &params.field {
            Some(field) => field.clone(),
            None => navigator::find_holder_field(source_class, dest_name).ok_or_else(|| {
                RefactorError::TargetNotFound(format!(
                    "no field of '{}' holds a '{dest_name}' instance; pass --field",
                    reference.class_name.as_deref().unwrap_or("?")
                ))
            })?,
        };

        debug!(recipe = self.name(), holder = %holder, to = dest_name, "moving method");
        mutator::move_method(tree, source_class, &dest_class, &target.function, &holder)
    }
}

/// Move a field's initialization to another class and redirect access
/// through the holder field.
pub struct MoveField;

impl Recipe for MoveField {
    fn name(&self) -> &'static str {
        "move-field"
    }

    fn plan(
        &self,
        tree: &SourceTree,
        reference: &TargetReference,
        params: &RecipeParams,
    ) -> Result<TransformationPlan> {
        let dest_name = require(&params.to, "--to", self.name())?;
        let source_class = resolve_class(tree, reference)?;
        let field = reference.method_name.as_deref().ok_or_else(|| {
            RefactorError::Addressing(
                "address must name a field (file::Class::field)".to_string(),
            )
        })?;

        let dest_class = find_class(tree, dest_name).ok_or_else(|| {
            RefactorError::TargetNotFound(format!("class '{dest_name}'"))
        })?;

        let source_init = find_method_in_class(&source_class, "__init__").ok_or_else(|| {
            RefactorError::TargetNotFound("source class has no __init__".to_string())
        })?;
        let assignment_lhs = self_field_assignments(&source_init, field)
            .into_iter()
            .next()
            .ok_or_else(|| RefactorError::TargetNotFound(format!("field '{field}'")))?;
        let assignment = assignment_lhs.parent().ok_or_else(|| {
            RefactorError::TargetNotFound(format!("field '{field}'"))
        })?;

        let dest_init = find_method_in_class(&dest_class, "__init__").ok_or_else(|| {
            RefactorError::TargetNotFound(format!("class '{dest_name}' has no __init__"))
        })?;
        if !self_field_assignments(&dest_init, field).is_empty() {
            return Err(RefactorError::NameConflict {
                name: field.to_string(),
                line: tree.first_line(&dest_init),
            });
        }

        let holder = match &params.field {
            Some(holder) => holder.clone(),
            None => navigator::find_holder_field(&source_class, dest_name).ok_or_else(|| {
                RefactorError::TargetNotFound(format!(
                    "no field holds a '{dest_name}' instance; pass --field"
                ))
            })?,
        };

        let mut plan = TransformationPlan::new();

        // Delete the initialization line in the source __init__.
        let value = mutator::assignment_value(&assignment)?;
        let line_start = tree.line_start_offset(tree.first_line(&assignment));
        let line_end = tree.line_start_offset(tree.last_line(&assignment) + 1);
        plan.delete(line_start..line_end);

        // Re-create it at the end of the destination __init__.
        let dest_body = body_of(&dest_init).ok_or_else(|| {
            RefactorError::TargetNotFound("__init__ has no body".to_string())
        })?;
        let anchor = statements_of(&dest_body).into_iter().last().ok_or_else(|| {
            RefactorError::TargetNotFound("__init__ body is empty".to_string())
        })?;
        let indent = tree.node_indent(&anchor).to_string();
        let offset = tree.line_start_offset(tree.last_line(&anchor) + 1);
        plan.insert(offset, format!("{indent}self.{field} = {}\n", value.text()));

        // Remaining source-class accesses reach the field through the holder.
        mutator::redirect_field_access(
            &source_class,
            field,
            &holder,
            assignment.range().start..assignment.range().end,
            &mut plan,
        );
        Ok(plan)
    }
}

/// Add a delegating method so clients stop reaching through a collaborator
/// field.
pub struct HideDelegate;

impl Recipe for HideDelegate {
    fn name(&self) -> &'static str {
        "hide-delegate"
    }

    fn plan(
        &self,
        tree: &SourceTree,
        reference: &TargetReference,
        params: &RecipeParams,
    ) -> Result<TransformationPlan> {
        let holder = require(&params.field, "--field", self.name())?;
        let method_name = require(&params.name, "--name", self.name())?;
        let class_node = resolve_class(tree, reference)?;

        // Copy the delegate method's signature when the collaborator class
        // is defined in this file; otherwise forward everything.
        let params_text = navigator::holder_class_name(&class_node, holder)
            .and_then(|delegate_class| find_class(tree, &delegate_class))
            .and_then(|delegate| find_method_in_class(&delegate, method_name))
            .map(|method| parameters_text(&method))
            .unwrap_or_else(|| "self, *args, **kwargs".to_string());

        let mut plan = TransformationPlan::new();
        mutator::append_delegating_wrapper(
            tree,
            &class_node,
            method_name,
            &params_text,
            holder,
            &mut plan,
        )?;
        Ok(plan)
    }
}
