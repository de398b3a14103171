//! Simplifying-conditionals recipes.

use super::{composing_methods::line_span, require, Recipe, RecipeParams};
use crate::analysis::{collect_write_targets, expression_reads};
use crate::errors::{RefactorError, Result};
use crate::kinds;
use crate::locator::TargetReference;
use crate::mutator::{self, TransformationPlan};
use crate::navigator::{self, body_of, parameter_names, select_statements};
use crate::tree::SourceTree;

/// Extract the condition of an `if` into a named predicate method, leaving
/// the branch structure in place.
pub struct DecomposeConditional;

impl Recipe for DecomposeConditional {
    fn name(&self) -> &'static str {
        "decompose-conditional"
    }

    fn plan(
        &self,
        tree: &SourceTree,
        reference: &TargetReference,
        params: &RecipeParams,
    ) -> Result<TransformationPlan> {
        let predicate = require(&params.name, "--name", self.name())?;
        let (line_start, line_end) = line_span(reference)?;

        let target = navigator::resolve_function(tree, reference)?;
        let body = body_of(&target.function).ok_or_else(|| {
            RefactorError::TargetNotFound("function has no body".to_string())
        })?;
        let selected = select_statements(tree, &body, line_start, line_end)?;
        let conditional = selected
            .iter()
            .find(|s| s.kind() == kinds::IF_STATEMENT)
            .ok_or_else(|| {
                RefactorError::TargetNotFound(
                    "no conditional statement in the addressed lines".to_string(),
                )
            })?;
        let condition = conditional.children().nth(1).ok_or_else(|| {
            RefactorError::TargetNotFound("conditional has no condition".to_string())
        })?;

        mutator::ensure_no_callable(tree, target.class.as_ref(), predicate)?;

        // Locals and parameters the condition reads travel as arguments;
        // member references resolve through self at the destination.
        let scope_names: Vec<String> = {
            let mut names: Vec<String> = parameter_names(&target.function)
                .iter()
                .map(|p| p.text().to_string())
                .filter(|n| n != "self")
                .collect();
            collect_write_targets(&body, &mut names);
            names
        };
        let args: Vec<String> = expression_reads(&condition)
            .into_iter()
            .filter(|name| scope_names.iter().any(|s| s == name))
            .collect();
        let arg_list = args.join(", ");

        let call = match &target.class {
            Some(_) => format!("self.{predicate}({arg_list})"),
            None => format!("{predicate}({arg_list})"),
        };

        let mut plan = TransformationPlan::new();
        plan.replace(condition.range().start..condition.range().end, call);

        let def_indent = tree.node_indent(&target.function).to_string();
        let body_indent = format!("{def_indent}{}", tree.indent_unit());
        let mut def_params: Vec<&str> = Vec::new();
        if target.class.is_some() {
            def_params.push("self");
        }
        def_params.extend(args.iter().map(String::as_str));
        let def_text = format!(
            "\n{def_indent}def {predicate}({}):\n{body_indent}return {}\n",
            def_params.join(", "),
            condition.text()
        );

        match &target.class {
            Some(class_node) => {
                mutator::append_to_class_body(tree, class_node, def_text, &mut plan)?;
            }
            None => {
                let offset = tree.line_start_offset(tree.last_line(&target.function) + 1);
                plan.insert(offset, def_text);
            }
        }
        Ok(plan)
    }
}
