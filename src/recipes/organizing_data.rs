//! Organizing-data recipes: properties over raw fields, named constants
//! over magic numbers.

use super::{require, Recipe, RecipeParams};
use crate::errors::{RefactorError, Result};
use crate::locator::TargetReference;
use crate::mutator::{self, RenameScope, TransformationPlan};
use crate::navigator::{find_method_in_class, resolve_class, self_field_assignments};
use crate::tree::{PyNode, SourceTree};

/// Replace direct access to a public field with a property backed by an
/// underscore-private attribute. Every in-class access moves to the private
/// name; external readers keep the public spelling, now served by the
/// property.
pub struct EncapsulateField;

impl Recipe for EncapsulateField {
    fn name(&self) -> &'static str {
        "encapsulate-field"
    }

    fn plan(
        &self,
        tree: &SourceTree,
        reference: &TargetReference,
        _params: &RecipeParams,
    ) -> Result<TransformationPlan> {
        let class_node = resolve_class(tree, reference)?;
        let field = field_segment(reference)?;
        let private = format!("_{field}");

        let mut plan = mutator::rename_binding(
            tree,
            RenameScope::Field {
                class: class_node.clone(),
            },
            field,
            &private,
        )?;
        append_property(tree, &class_node, field, &private, &mut plan)?;
        Ok(plan)
    }
}

/// Route the class's own access to a field through a property, touching only
/// the `__init__` backing store. The original spelling keeps working inside
/// and outside the class.
pub struct SelfEncapsulateField;

impl Recipe for SelfEncapsulateField {
    fn name(&self) -> &'static str {
        "self-encapsulate-field"
    }

    fn plan(
        &self,
        tree: &SourceTree,
        reference: &TargetReference,
        _params: &RecipeParams,
    ) -> Result<TransformationPlan> {
        let class_node = resolve_class(tree, reference)?;
        let field = field_segment(reference)?;
        let private = format!("_{field}");

        if !self_field_assignments(&class_node, &private).is_empty() {
            return Err(RefactorError::NameConflict {
                name: private,
                line: tree.first_line(&class_node),
            });
        }

        let init = find_method_in_class(&class_node, "__init__").ok_or_else(|| {
            RefactorError::TargetNotFound("class has no __init__".to_string())
        })?;
        let sites = self_field_assignments(&init, field);
        if sites.is_empty() {
            return Err(RefactorError::TargetNotFound(format!("field '{field}'")));
        }

        let mut plan = TransformationPlan::new();
        for site in sites {
            // `site` is the attribute node's name side; rewrite just the
            // attribute identifier to the private spelling.
            if let Some(attr) = site
                .children()
                .filter(|c| c.kind() == crate::kinds::IDENTIFIER)
                .last()
            {
                plan.replace(attr.range().start..attr.range().end, private.clone());
            }
        }
        append_property(tree, &class_node, field, &private, &mut plan)?;
        Ok(plan)
    }
}

fn append_property<'t>(
    tree: &'t SourceTree,
    class_node: &PyNode<'t>,
    field: &str,
    private: &str,
    plan: &mut TransformationPlan,
) -> Result<()> {
    mutator::ensure_no_callable(tree, Some(class_node), field)?;

    let method_indent = format!("{}{}", tree.node_indent(class_node), tree.indent_unit());
    let body_indent = format!("{method_indent}{}", tree.indent_unit());
    let block = format!(
        "\n{method_indent}@property\n\
         {method_indent}def {field}(self):\n\
         {body_indent}return self.{private}\n\
         \n\
         {method_indent}@{field}.setter\n\
         {method_indent}def {field}(self, value):\n\
         {body_indent}self.{private} = value\n"
    );
    mutator::append_to_class_body(tree, class_node, block, plan)
}

/// Name a literal as a module-level symbolic constant and replace each
/// occurrence in the addressed scope.
pub struct ReplaceMagicNumber;

impl Recipe for ReplaceMagicNumber {
    fn name(&self) -> &'static str {
        "replace-magic-number-with-symbolic-constant"
    }

    fn plan(
        &self,
        tree: &SourceTree,
        reference: &TargetReference,
        params: &RecipeParams,
    ) -> Result<TransformationPlan> {
        let constant = require(&params.name, "--name", self.name())?;
        let value = require(&params.value, "--value", self.name())?;

        let mut plan = mutator::insert_module_constant(tree, constant, value)?;

        // Scope the replacement to the addressed class when one is named,
        // otherwise sweep the whole module.
        let replaced = match &reference.class_name {
            Some(_) => {
                let class_node = resolve_class(tree, reference)?;
                mutator::replace_literal(&class_node, value, constant, &mut plan)
            }
            None => mutator::replace_literal(&tree.root(), value, constant, &mut plan),
        };

        if replaced == 0 {
            return Err(RefactorError::TargetNotFound(format!(
                "literal '{value}' does not occur in the addressed scope"
            )));
        }
        Ok(plan)
    }
}

fn field_segment<'r>(reference: &'r TargetReference) -> Result<&'r str> {
    reference.method_name.as_deref().ok_or_else(|| {
        RefactorError::Addressing("address must name a field (file::Class::field)".to_string())
    })
}
