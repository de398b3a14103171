//! Composing-methods recipes: extract, inline and query temporaries.

use tracing::debug;

use super::{require, resolve_function_and_symbol, Recipe, RecipeParams};
use crate::analysis::{classify_range, collect_write_targets};
use crate::errors::{RefactorError, Result};
use crate::kinds;
use crate::locator::TargetReference;
use crate::mutator::{
    self, assignment_value, ensure_no_callable, TransformationPlan,
};
use crate::navigator::{
    self, body_of, parameter_names, select_statements, SymbolSite,
};
use crate::tree::{PyNode, SourceTree};

/// Extract a statement range into a new method (or function), wiring free
/// variables through parameters and return values.
pub struct ExtractMethod;

impl Recipe for ExtractMethod {
    fn name(&self) -> &'static str {
        "extract-method"
    }

    fn plan(
        &self,
        tree: &SourceTree,
        reference: &TargetReference,
        params: &RecipeParams,
    ) -> Result<TransformationPlan> {
        let new_name = require(&params.name, "--name", self.name())?;
        let (line_start, line_end) = line_span(reference)?;

        let target = navigator::resolve_function(tree, reference)?;
        let body = body_of(&target.function).ok_or_else(|| {
            RefactorError::TargetNotFound("function has no body".to_string())
        })?;
        let selected = select_statements(tree, &body, line_start, line_end)?;
        let classification = classify_range(&target, &selected);

        debug!(recipe = self.name(), name = new_name, "extracting statement range");
        mutator::extract_to_callable(tree, &target, &selected, &classification, new_name)
    }
}

/// Introduce an explaining variable for the expression at a single line.
pub struct ExtractVariable;

impl Recipe for ExtractVariable {
    fn name(&self) -> &'static str {
        "extract-variable"
    }

    fn plan(
        &self,
        tree: &SourceTree,
        reference: &TargetReference,
        params: &RecipeParams,
    ) -> Result<TransformationPlan> {
        let var_name = require(&params.name, "--name", self.name())?;
        let (line_start, line_end) = line_span(reference)?;

        let target = navigator::resolve_function(tree, reference)?;
        let body = body_of(&target.function).ok_or_else(|| {
            RefactorError::TargetNotFound("function has no body".to_string())
        })?;
        let selected = select_statements(tree, &body, line_start, line_end)?;
        let stmt = &selected[0];

        // Refuse to shadow an existing binding in the function.
        let mut bound = Vec::new();
        collect_write_targets(&body, &mut bound);
        bound.extend(
            parameter_names(&target.function)
                .iter()
                .map(|p| p.text().to_string()),
        );
        if bound.iter().any(|b| b == var_name) {
            return Err(RefactorError::NameConflict {
                name: var_name.to_string(),
                line: tree.first_line(&target.function),
            });
        }

        let expr = explained_expression(stmt).ok_or_else(|| {
            RefactorError::TargetNotFound(
                "statement has no expression to extract".to_string(),
            )
        })?;

        let indent = tree.node_indent(stmt).to_string();
        let mut plan = TransformationPlan::new();
        plan.insert(
            tree.line_start_offset(tree.first_line(stmt)),
            format!("{indent}{var_name} = {}\n", expr.text()),
        );
        plan.replace(expr.range().start..expr.range().end, var_name);
        Ok(plan)
    }
}

/// The expression worth naming within a statement: an assignment's
/// right-hand side, a conditional's condition, a return's value, or the
/// bare expression itself.
fn explained_expression<'t>(stmt: &PyNode<'t>) -> Option<PyNode<'t>> {
    match &*stmt.kind() {
        kinds::EXPRESSION_STATEMENT => {
            let inner = stmt.children().next()?;
            let inner_kind = inner.kind().to_string();
            if matches!(
                inner_kind.as_str(),
                kinds::ASSIGNMENT | kinds::AUGMENTED_ASSIGNMENT
            ) {
                assignment_value(&inner).ok()
            } else {
                Some(inner)
            }
        }
        kinds::IF_STATEMENT | kinds::WHILE_STATEMENT => stmt.children().nth(1),
        kinds::RETURN_STATEMENT => stmt.children().nth(1),
        _ => None,
    }
}

/// Replace every read of a single-assignment temporary with its initializer
/// and delete the temporary.
pub struct InlineTemp;

impl Recipe for InlineTemp {
    fn name(&self) -> &'static str {
        "inline-temp"
    }

    fn plan(
        &self,
        tree: &SourceTree,
        reference: &TargetReference,
        _params: &RecipeParams,
    ) -> Result<TransformationPlan> {
        let (target, symbol) = resolve_function_and_symbol(tree, reference)?;
        let assignment = match navigator::find_symbol_site(&target.function, &symbol)? {
            SymbolSite::Assignment(node) => node,
            SymbolSite::Parameter(_) => {
                return Err(RefactorError::TargetNotFound(format!(
                    "'{symbol}' is a parameter, not a temporary"
                )));
            }
        };
        mutator::inline_temp(tree, &target.function, &assignment, &symbol)
    }
}

/// Replace a temporary with a query method returning its initializer.
pub struct ReplaceTempWithQuery;

impl Recipe for ReplaceTempWithQuery {
    fn name(&self) -> &'static str {
        "replace-temp-with-query"
    }

    fn plan(
        &self,
        tree: &SourceTree,
        reference: &TargetReference,
        params: &RecipeParams,
    ) -> Result<TransformationPlan> {
        let (target, symbol) = resolve_function_and_symbol(tree, reference)?;
        let query_name = params.name.as_deref().unwrap_or(&symbol);

        let assignment = match navigator::find_symbol_site(&target.function, &symbol)? {
            SymbolSite::Assignment(node) => node,
            SymbolSite::Parameter(_) => {
                return Err(RefactorError::TargetNotFound(format!(
                    "'{symbol}' is a parameter, not a temporary"
                )));
            }
        };

        ensure_no_callable(tree, target.class.as_ref(), query_name)?;

        let value = assignment_value(&assignment)?;
        let call = match &target.class {
            Some(_) => format!("self.{query_name}()"),
            None => format!("{query_name}()"),
        };
        let mut plan =
            mutator::retire_temp(tree, &target.function, &assignment, &symbol, &call)?;

        // The query method holds the retired initializer.
        let def_indent = tree.node_indent(&target.function).to_string();
        let body_indent = format!("{def_indent}{}", tree.indent_unit());
        let receiver = if target.class.is_some() { "self" } else { "" };
        let def_text = format!(
            "\n{def_indent}def {query_name}({receiver}):\n{body_indent}return {}\n",
            value.text()
        );
        match &target.class {
            Some(class_node) => {
                mutator::append_to_class_body(tree, class_node, def_text, &mut plan)?;
            }
            None => {
                // Module-level: insert after the enclosing function.
                let offset = tree.line_start_offset(tree.last_line(&target.function) + 1);
                plan.insert(offset, def_text);
            }
        }
        Ok(plan)
    }
}

pub(crate) fn line_span(reference: &TargetReference) -> Result<(u32, u32)> {
    match (reference.line_start, reference.line_end) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(RefactorError::Addressing(
            "address must carry a line span (#L<start>[-L<end>])".to_string(),
        )),
    }
}
