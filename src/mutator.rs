//! # Tree Mutator
//!
//! Structural transformation primitives. Each primitive inspects the tree
//! and appends byte-span edits to a [`TransformationPlan`]; the original
//! tree is never modified, so a failed precondition leaves nothing to roll
//! back. The plan is applied to the source text by the serializer, which
//! preserves every untouched byte.
//!
//! Primitives are independent and composable; the calling recipe decides
//! which to combine. Name-conflict checks happen here, before any edit is
//! recorded, so a refused transformation produces an empty diff.

use std::ops::Range;

use tracing::debug;

use crate::analysis::{collect_write_targets, BindingClassification};
use crate::errors::{RefactorError, Result};
use crate::kinds;
use crate::navigator::{
    body_of, find_method_in_class, find_module_function, name_of, parameter_names, statements_of,
    FunctionTarget,
};
use crate::tree::{PyNode, SourceTree};

/// One byte-span splice. A pure insertion has an empty span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub span: Range<usize>,
    pub text: String,
}

/// An ordered set of non-overlapping edits against one source file.
#[derive(Debug, Default)]
pub struct TransformationPlan {
    edits: Vec<Edit>,
}

impl TransformationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, at: usize, text: impl Into<String>) {
        self.edits.push(Edit {
            span: at..at,
            text: text.into(),
        });
    }

    pub fn replace(&mut self, span: Range<usize>, text: impl Into<String>) {
        self.edits.push(Edit {
            span,
            text: text.into(),
        });
    }

    pub fn delete(&mut self, span: Range<usize>) {
        self.edits.push(Edit {
            span,
            text: String::new(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    /// Splice all edits into `source`. Overlapping spans are a bug in the
    /// calling recipe and surface as [`RefactorError::MutationConflict`].
    pub fn apply(&self, source: &str) -> Result<String> {
        let mut ordered: Vec<&Edit> = self.edits.iter().collect();
        ordered.sort_by_key(|e| (e.span.start, e.span.end));

        for pair in ordered.windows(2) {
            if pair[0].span.end > pair[1].span.start {
                return Err(RefactorError::MutationConflict {
                    first: (pair[0].span.start, pair[0].span.end),
                    second: (pair[1].span.start, pair[1].span.end),
                });
            }
        }

        let mut output = String::with_capacity(source.len());
        let mut cursor = 0usize;
        for edit in ordered {
            output.push_str(&source[cursor..edit.span.start]);
            output.push_str(&edit.text);
            cursor = edit.span.end;
        }
        output.push_str(&source[cursor..]);
        Ok(output)
    }
}

/// Re-indent a block of lines from one base indentation to another,
/// preserving relative depth. Blank lines pass through untouched.
pub fn reindent(block: &str, from: &str, to: &str) -> String {
    if from == to {
        return block.to_string();
    }
    block
        .split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else if let Some(rest) = line.strip_prefix(from) {
                format!("{to}{rest}")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Byte offset for inserting a new line-aligned block after `node`, plus a
/// prefix needed when the file lacks a trailing newline.
fn insertion_point_after(tree: &SourceTree, node: &PyNode<'_>) -> (usize, String) {
    let offset = tree.line_start_offset(tree.last_line(node) + 1);
    if offset == tree.source().len() && !tree.source().ends_with('\n') {
        (offset, "\n".to_string())
    } else {
        (offset, String::new())
    }
}

/// The class-body (or module) statement that lexically contains `function`,
/// i.e. its `decorated_definition` wrapper when decorated.
fn enclosing_statement<'t>(scope_body: &PyNode<'t>, function: &PyNode<'t>) -> Option<PyNode<'t>> {
    statements_of(scope_body).into_iter().find(|stmt| {
        stmt.range().start <= function.range().start && function.range().end <= stmt.range().end
    })
}

/// Refuse to introduce `name` into a class (or module) scope that already
/// defines it.
pub fn ensure_no_callable<'t>(
    tree: &'t SourceTree,
    class: Option<&PyNode<'t>>,
    name: &str,
) -> Result<()> {
    let existing = match class {
        Some(class_node) => find_method_in_class(class_node, name),
        None => find_module_function(tree, name),
    };
    if let Some(node) = existing {
        return Err(RefactorError::NameConflict {
            name: name.to_string(),
            line: tree.first_line(&node),
        });
    }
    Ok(())
}

/// Extract a statement range into a new callable defined after the
/// enclosing one.
///
/// The parameter list is `free_inbound` in first-use order; `free_outbound`
/// names are returned (a bare tuple when more than one) and captured by
/// assignment at the call site. Member references need no plumbing because
/// the new callable stays on the same class when one is present.
pub fn extract_to_callable<'t>(
    tree: &'t SourceTree,
    target: &FunctionTarget<'t>,
    selected: &[PyNode<'t>],
    classification: &BindingClassification,
    new_name: &str,
) -> Result<TransformationPlan> {
    ensure_no_callable(tree, target.class.as_ref(), new_name)?;

    let (first, last) = (
        selected.first().expect("non-empty selection"),
        selected.last().expect("non-empty selection"),
    );
    let mut plan = TransformationPlan::new();

    let args = classification.free_inbound.join(", ");
    let callee = match &target.class {
        Some(_) => format!("self.{new_name}({args})"),
        None => format!("{new_name}({args})"),
    };
    let call_stmt = if classification.free_outbound.is_empty() {
        callee
    } else {
        format!("{} = {}", classification.free_outbound.join(", "), callee)
    };
    plan.replace(first.range().start..last.range().end, call_stmt);

    let def_indent = tree.node_indent(&target.function).to_string();
    let body_indent = format!("{def_indent}{}", tree.indent_unit());
    let mut params: Vec<&str> = Vec::new();
    if target.class.is_some() {
        params.push("self");
    }
    params.extend(classification.free_inbound.iter().map(String::as_str));

    let original_indent = tree.node_indent(first).to_string();
    let body = reindent(tree.lines_of_span(first, last), &original_indent, &body_indent);

    let mut def_text = String::new();
    def_text.push('\n');
    def_text.push_str(&format!("{def_indent}def {new_name}({}):\n", params.join(", ")));
    def_text.push_str(&body);
    def_text.push('\n');
    if !classification.free_outbound.is_empty() {
        def_text.push_str(&format!(
            "{body_indent}return {}\n",
            classification.free_outbound.join(", ")
        ));
    }

    let scope_body = match &target.class {
        Some(class_node) => body_of(class_node),
        None => Some(tree.root()),
    }
    .ok_or_else(|| RefactorError::TargetNotFound("enclosing scope has no body".to_string()))?;
    let anchor = enclosing_statement(&scope_body, &target.function).ok_or_else(|| {
        RefactorError::TargetNotFound("enclosing definition not found in scope".to_string())
    })?;
    let (offset, prefix) = insertion_point_after(tree, &anchor);
    plan.insert(offset, format!("{prefix}{def_text}"));

    debug!(name = new_name, params = ?params, "planned extraction");
    Ok(plan)
}

/// Move a method from one class to another, leaving a delegating wrapper at
/// the original site that forwards through `holder` (the source-class field
/// carrying the destination instance).
///
/// Inside the moved body, references that already went through the holder
/// (`self.<holder>.x`) collapse to direct accesses (`self.x`), which keeps
/// them valid in the new scope.
pub fn move_method<'t>(
    tree: &'t SourceTree,
    source_class: &PyNode<'t>,
    dest_class: &PyNode<'t>,
    method: &PyNode<'t>,
    holder: &str,
) -> Result<TransformationPlan> {
    let method_name = name_of(method).ok_or_else(|| {
        RefactorError::TargetNotFound("method has no name".to_string())
    })?;
    ensure_no_callable(tree, Some(dest_class), &method_name)?;

    let source_body = body_of(source_class).ok_or_else(|| {
        RefactorError::TargetNotFound("source class has no body".to_string())
    })?;
    let wrapper = enclosing_statement(&source_body, method).ok_or_else(|| {
        RefactorError::TargetNotFound("method not found in class body".to_string())
    })?;

    let mut plan = TransformationPlan::new();
    let method_indent = tree.node_indent(&wrapper).to_string();
    let inner_indent = format!("{method_indent}{}", tree.indent_unit());

    // Delegating wrapper replaces the method at its original position.
    let params_text = parameters_text(method);
    let forward_args = parameter_names(method)
        .iter()
        .map(|p| p.text().to_string())
        .filter(|p| p != "self")
        .collect::<Vec<_>>()
        .join(", ");
    let delegation = format!(
        "def {method_name}({params_text}):\n{inner_indent}return self.{holder}.{method_name}({forward_args})"
    );
    plan.replace(wrapper.range().start..wrapper.range().end, delegation);

    // The moved definition lands at the end of the destination class body.
    let dest_indent = format!("{}{}", tree.node_indent(dest_class), tree.indent_unit());
    let moved = reindent(
        tree.lines_of_span(&wrapper, &wrapper),
        &method_indent,
        &dest_indent,
    );
    let moved = moved.replace(&format!("self.{holder}."), "self.");

    let dest_body = body_of(dest_class).ok_or_else(|| {
        RefactorError::TargetNotFound("destination class has no body".to_string())
    })?;
    let dest_anchor = statements_of(&dest_body)
        .into_iter()
        .last()
        .ok_or_else(|| RefactorError::TargetNotFound("destination class is empty".to_string()))?;
    let (offset, prefix) = insertion_point_after(tree, &dest_anchor);
    plan.insert(offset, format!("{prefix}\n{moved}\n"));

    Ok(plan)
}

/// Append a delegating wrapper method to a class: `name` forwards to
/// `self.<holder>.<name>`. `params_text` is the full parameter list
/// including `self`.
pub fn append_delegating_wrapper<'t>(
    tree: &'t SourceTree,
    class_node: &PyNode<'t>,
    name: &str,
    params_text: &str,
    holder: &str,
    plan: &mut TransformationPlan,
) -> Result<()> {
    ensure_no_callable(tree, Some(class_node), name)?;

    let forward_args = params_text
        .split(',')
        .map(|p| {
            p.trim()
                .split([':', '='])
                .next()
                .unwrap_or("")
                .trim()
                .to_string()
        })
        .filter(|p| !p.is_empty() && p != "self")
        .collect::<Vec<_>>()
        .join(", ");

    let method_indent = format!("{}{}", tree.node_indent(class_node), tree.indent_unit());
    let inner_indent = format!("{method_indent}{}", tree.indent_unit());
    let wrapper = format!(
        "\n{method_indent}def {name}({params_text}):\n{inner_indent}return self.{holder}.{name}({forward_args})\n"
    );

    append_to_class_body(tree, class_node, wrapper, plan)
}

/// Insert a pre-rendered block after the last statement of a class body.
pub fn append_to_class_body<'t>(
    tree: &'t SourceTree,
    class_node: &PyNode<'t>,
    text: String,
    plan: &mut TransformationPlan,
) -> Result<()> {
    let body = body_of(class_node).ok_or_else(|| {
        RefactorError::TargetNotFound("class has no body".to_string())
    })?;
    let anchor = statements_of(&body)
        .into_iter()
        .last()
        .ok_or_else(|| RefactorError::TargetNotFound("class body is empty".to_string()))?;
    let (offset, prefix) = insertion_point_after(tree, &anchor);
    plan.insert(offset, format!("{prefix}{text}"));
    Ok(())
}

/// Scope of a rename.
pub enum RenameScope<'t> {
    /// A method of a class: the definition plus every file-local
    /// `<expr>.<name>` call site.
    Method { class: PyNode<'t> },
    /// An instance field: `self.<name>` accesses within the class only.
    Field { class: PyNode<'t> },
    /// A local binding within one function.
    Local { function: PyNode<'t> },
}

/// Rename a binding and every resolvable file-local reference to it.
/// Cross-file call sites are out of scope; the engine only guarantees
/// file-locality.
pub fn rename_binding<'t>(
    tree: &'t SourceTree,
    scope: RenameScope<'t>,
    old: &str,
    new: &str,
) -> Result<TransformationPlan> {
    let mut plan = TransformationPlan::new();
    match scope {
        RenameScope::Method { class } => {
            if let Some(existing) = find_method_in_class(&class, new) {
                return Err(RefactorError::NameConflict {
                    name: new.to_string(),
                    line: tree.first_line(&existing),
                });
            }
            let method = find_method_in_class(&class, old).ok_or_else(|| {
                RefactorError::TargetNotFound(format!("method '{old}'"))
            })?;
            let def_name = method
                .children()
                .find(|c| c.kind() == kinds::IDENTIFIER)
                .ok_or_else(|| RefactorError::TargetNotFound("method has no name".to_string()))?;
            plan.replace(def_name.range().start..def_name.range().end, new);

            let mut sites = Vec::new();
            collect_attribute_references(&tree.root(), old, &mut sites);
            for site in sites {
                plan.replace(site.range().start..site.range().end, new);
            }
        }
        RenameScope::Field { class } => {
            let existing = attribute_reference_exists(&class, new);
            if existing {
                return Err(RefactorError::NameConflict {
                    name: new.to_string(),
                    line: tree.first_line(&class),
                });
            }
            let mut sites = Vec::new();
            collect_self_attribute_references(&class, old, &mut sites);
            if sites.is_empty() {
                return Err(RefactorError::TargetNotFound(format!("field '{old}'")));
            }
            for site in sites {
                plan.replace(site.range().start..site.range().end, new);
            }
        }
        RenameScope::Local { function } => {
            let body = body_of(&function).ok_or_else(|| {
                RefactorError::TargetNotFound("function has no body".to_string())
            })?;
            let mut bound = Vec::new();
            collect_write_targets(&body, &mut bound);
            bound.extend(
                parameter_names(&function)
                    .iter()
                    .map(|p| p.text().to_string()),
            );
            if bound.iter().any(|b| b == new) {
                return Err(RefactorError::NameConflict {
                    name: new.to_string(),
                    line: tree.first_line(&function),
                });
            }

            let mut sites = Vec::new();
            collect_variable_identifiers(&body, old, &mut sites);
            for param in parameter_names(&function) {
                if param.text() == old {
                    sites.push(param);
                }
            }
            if sites.is_empty() {
                return Err(RefactorError::TargetNotFound(format!("binding '{old}'")));
            }
            for site in sites {
                plan.replace(site.range().start..site.range().end, new);
            }
        }
    }
    Ok(plan)
}

/// Inline a single-assignment temporary: replace every later read with the
/// initializer expression and delete the assignment statement.
pub fn inline_temp<'t>(
    tree: &'t SourceTree,
    function: &PyNode<'t>,
    assignment: &PyNode<'t>,
    symbol: &str,
) -> Result<TransformationPlan> {
    let value = assignment_value(assignment)?;
    let value_text = if kinds::is_atomic_expression(&value.kind()) {
        value.text().to_string()
    } else {
        format!("({})", value.text())
    };
    retire_temp(tree, function, assignment, symbol, &value_text)
}

/// The right-hand side of an assignment node.
pub fn assignment_value<'t>(assignment: &PyNode<'t>) -> Result<PyNode<'t>> {
    assignment
        .children()
        .last()
        .ok_or_else(|| RefactorError::TargetNotFound("assignment has no value".to_string()))
}

/// Remove a single-assignment temporary: delete its binding statement and
/// replace every other reference with `replacement`. Refuses temporaries
/// that are reassigned, since the replacement expression would then be
/// stale at some read sites.
pub fn retire_temp<'t>(
    tree: &'t SourceTree,
    function: &PyNode<'t>,
    assignment: &PyNode<'t>,
    symbol: &str,
    replacement: &str,
) -> Result<TransformationPlan> {
    let body = body_of(function).ok_or_else(|| {
        RefactorError::TargetNotFound("function has no body".to_string())
    })?;

    let mut assignment_count = 0usize;
    count_assignments_to(&body, symbol, &mut assignment_count);
    if assignment_count > 1 {
        return Err(RefactorError::TargetNotFound(format!(
            "symbol '{symbol}' is assigned more than once"
        )));
    }

    let mut plan = TransformationPlan::new();

    // Delete the whole assignment line, newline included.
    let stmt = assignment
        .parent()
        .filter(|p| p.kind() == kinds::EXPRESSION_STATEMENT)
        .unwrap_or_else(|| assignment.clone());
    let line_start = tree.line_start_offset(tree.first_line(&stmt));
    let line_end = tree.line_start_offset(tree.last_line(&stmt) + 1);
    plan.delete(line_start..line_end);

    let mut reads = Vec::new();
    collect_variable_identifiers(&body, symbol, &mut reads);
    let mut replaced = 0usize;
    for site in reads {
        // Skip the assignment target itself.
        if site.range().start >= assignment.range().start
            && site.range().end <= assignment.range().end
        {
            continue;
        }
        plan.replace(site.range().start..site.range().end, replacement.to_string());
        replaced += 1;
    }

    if replaced == 0 {
        return Err(RefactorError::TargetNotFound(format!(
            "symbol '{symbol}' has no references to inline"
        )));
    }
    Ok(plan)
}

/// A named entry of a parameter list: the node to splice and its name.
struct ParamEntry<'t> {
    node: PyNode<'t>,
    name: String,
}

fn parameter_entries<'t>(function: &PyNode<'t>) -> Vec<ParamEntry<'t>> {
    let Some(params) = function.children().find(|c| c.kind() == kinds::PARAMETERS) else {
        return Vec::new();
    };
    let mut entries = Vec::new();
    for param in params.children() {
        let kind = param.kind().to_string();
        if kind == kinds::IDENTIFIER {
            let name = param.text().to_string();
            entries.push(ParamEntry { node: param, name });
        } else if matches!(
            kind.as_str(),
            kinds::TYPED_PARAMETER | kinds::DEFAULT_PARAMETER | kinds::TYPED_DEFAULT_PARAMETER
        ) {
            if let Some(ident) = param.clone().children().find(|c| c.kind() == kinds::IDENTIFIER) {
                entries.push(ParamEntry {
                    name: ident.text().to_string(),
                    node: param,
                });
            }
        }
    }
    entries
}

/// Append a parameter to a function's signature. The parameter always gets a
/// default so existing call sites stay valid.
pub fn add_parameter<'t>(
    tree: &'t SourceTree,
    target: &FunctionTarget<'t>,
    name: &str,
    default: &str,
) -> Result<TransformationPlan> {
    let entries = parameter_entries(&target.function);
    if let Some(existing) = entries.iter().find(|e| e.name == name) {
        return Err(RefactorError::NameConflict {
            name: name.to_string(),
            line: tree.first_line(&existing.node),
        });
    }

    let params = target
        .function
        .children()
        .find(|c| c.kind() == kinds::PARAMETERS)
        .ok_or_else(|| RefactorError::TargetNotFound("function has no parameter list".to_string()))?;

    let text = if entries.is_empty() {
        format!("{name}={default}")
    } else {
        format!(", {name}={default}")
    };
    let mut plan = TransformationPlan::new();
    plan.insert(params.range().end - 1, text);
    Ok(plan)
}

/// Remove a parameter from a function's signature and rewrite file-local
/// call sites: matching keyword arguments are dropped, and positional
/// arguments are dropped by index.
pub fn remove_parameter<'t>(
    tree: &'t SourceTree,
    target: &FunctionTarget<'t>,
    name: &str,
) -> Result<TransformationPlan> {
    let entries = parameter_entries(&target.function);
    let position = entries
        .iter()
        .position(|e| e.name == name)
        .ok_or_else(|| RefactorError::TargetNotFound(format!("parameter '{name}'")))?;

    let mut plan = TransformationPlan::new();
    plan.delete(list_entry_span(&entries, position));

    // Argument index as callers see it: `self` is bound by the receiver.
    let callee_index = position
        - entries[..position]
            .iter()
            .filter(|e| e.name == "self")
            .count();

    let method_name = name_of(&target.function).ok_or_else(|| {
        RefactorError::TargetNotFound("function has no name".to_string())
    })?;
    let mut calls = Vec::new();
    collect_calls_to(
        &tree.root(),
        &method_name,
        target.class.is_some(),
        &mut calls,
    );
    for call in calls {
        let Some(arguments) = call.children().find(|c| c.kind() == kinds::ARGUMENT_LIST) else {
            continue;
        };
        let args: Vec<PyNode<'_>> = arguments
            .children()
            .filter(|c| !matches!(&*c.kind(), "(" | ")" | ","))
            .collect();

        if let Some(kw_pos) = args.iter().position(|a| {
            a.kind() == kinds::KEYWORD_ARGUMENT
                && a.children()
                    .next()
                    .is_some_and(|n| n.kind() == kinds::IDENTIFIER && n.text() == name)
        }) {
            plan.delete(argument_span(&args, kw_pos));
        } else if callee_index < args.len()
            && args[callee_index].kind() != kinds::KEYWORD_ARGUMENT
        {
            plan.delete(argument_span(&args, callee_index));
        }
    }

    Ok(plan)
}

/// Deletion span for one entry of a comma-separated list, swallowing the
/// neighbouring comma.
fn list_entry_span(entries: &[ParamEntry<'_>], index: usize) -> Range<usize> {
    let entry = &entries[index];
    if index > 0 {
        entries[index - 1].node.range().end..entry.node.range().end
    } else if entries.len() > 1 {
        entry.node.range().start..entries[index + 1].node.range().start
    } else {
        entry.node.range()
    }
}

fn argument_span(args: &[PyNode<'_>], index: usize) -> Range<usize> {
    let entry = &args[index];
    if index > 0 {
        args[index - 1].range().end..entry.range().end
    } else if args.len() > 1 {
        entry.range().start..args[index + 1].range().start
    } else {
        entry.range()
    }
}

/// Calls whose callee is `<expr>.<name>` (methods) or a bare `name`
/// (module functions).
fn collect_calls_to<'t>(
    node: &PyNode<'t>,
    name: &str,
    method_style: bool,
    calls: &mut Vec<PyNode<'t>>,
) {
    if node.kind() == kinds::CALL {
        if let Some(callee) = node.children().next() {
            let matches_name = if method_style {
                callee.kind() == kinds::ATTRIBUTE
                    && callee
                        .children()
                        .filter(|c| c.kind() == kinds::IDENTIFIER)
                        .last()
                        .is_some_and(|attr| attr.text() == name)
            } else {
                callee.kind() == kinds::IDENTIFIER && callee.text() == name
            };
            if matches_name {
                calls.push(node.clone());
            }
        }
    }
    for child in node.children() {
        collect_calls_to(&child, name, method_style, calls);
    }
}

/// Rewrite `self.<field>` accesses within a class to go through a holder:
/// `self.<holder>.<field>`. Sites inside `skip` (typically the deleted
/// initialization) are left alone.
pub fn redirect_field_access(
    class_node: &PyNode<'_>,
    field: &str,
    holder: &str,
    skip: Range<usize>,
    plan: &mut TransformationPlan,
) {
    let mut sites = Vec::new();
    collect_self_attribute_references(class_node, field, &mut sites);
    for site in sites {
        let Some(attribute) = site.parent() else {
            continue;
        };
        let span = attribute.range();
        if span.start >= skip.start && span.end <= skip.end {
            continue;
        }
        plan.replace(span.start..span.end, format!("self.{holder}.{field}"));
    }
}

/// Introduce a module-level constant before the first non-import statement.
pub fn insert_module_constant(
    tree: &SourceTree,
    name: &str,
    value: &str,
) -> Result<TransformationPlan> {
    let root = tree.root();
    // Only module-level assignments count as conflicts; a same-named local
    // inside a function shadows the constant without clashing.
    for stmt in statements_of(&root) {
        if stmt.kind() != kinds::EXPRESSION_STATEMENT {
            continue;
        }
        let Some(assign) = stmt.children().find(|c| c.kind() == kinds::ASSIGNMENT) else {
            continue;
        };
        if let Some(left) = assign.children().next() {
            if left.kind() == kinds::IDENTIFIER && left.text() == name {
                return Err(RefactorError::NameConflict {
                    name: name.to_string(),
                    line: tree.first_line(&assign),
                });
            }
        }
    }

    let anchor = statements_of(&root)
        .into_iter()
        .find(|stmt| {
            !matches!(
                &*stmt.kind(),
                "import_statement" | "import_from_statement" | "future_import_statement"
            ) && !is_docstring(stmt)
        })
        .ok_or_else(|| RefactorError::TargetNotFound("module has no statements".to_string()))?;

    let mut plan = TransformationPlan::new();
    let offset = tree.line_start_offset(tree.first_line(&anchor));
    plan.insert(offset, format!("{name} = {value}\n\n"));
    Ok(plan)
}

fn is_docstring(stmt: &PyNode<'_>) -> bool {
    stmt.kind() == kinds::EXPRESSION_STATEMENT
        && stmt
            .children()
            .next()
            .is_some_and(|c| c.kind() == kinds::STRING)
}

/// Replace every literal occurrence of `value` within `scope` by `name`.
pub fn replace_literal(
    scope: &PyNode<'_>,
    value: &str,
    name: &str,
    plan: &mut TransformationPlan,
) -> usize {
    let mut sites = Vec::new();
    collect_literals(scope, value, &mut sites);
    for site in &sites {
        plan.replace(site.range().start..site.range().end, name);
    }
    sites.len()
}

fn collect_literals<'t>(node: &PyNode<'t>, value: &str, sites: &mut Vec<PyNode<'t>>) {
    if matches!(&*node.kind(), kinds::INTEGER | kinds::FLOAT) && node.text() == value {
        sites.push(node.clone());
    }
    for child in node.children() {
        collect_literals(&child, value, sites);
    }
}

fn count_assignments_to(node: &PyNode<'_>, symbol: &str, count: &mut usize) {
    if matches!(&*node.kind(), kinds::ASSIGNMENT | kinds::AUGMENTED_ASSIGNMENT) {
        if let Some(left) = node.children().next() {
            if left.kind() == kinds::IDENTIFIER && left.text() == symbol {
                *count += 1;
            }
        }
    }
    for child in node.children() {
        count_assignments_to(&child, symbol, count);
    }
}

/// Attribute-name identifiers of every `<expr>.<name>` access in the tree.
fn collect_attribute_references<'t>(node: &PyNode<'t>, name: &str, sites: &mut Vec<PyNode<'t>>) {
    if node.kind() == kinds::ATTRIBUTE {
        let children: Vec<PyNode<'t>> = node.children().collect();
        if let Some(attr) = children
            .iter()
            .skip(1)
            .filter(|c| c.kind() == kinds::IDENTIFIER)
            .last()
        {
            if attr.text() == name {
                sites.push(attr.clone());
            }
        }
        if let Some(object) = children.first() {
            collect_attribute_references(object, name, sites);
        }
        return;
    }
    for child in node.children() {
        collect_attribute_references(&child, name, sites);
    }
}

/// Attribute-name identifiers of `self.<name>` accesses only.
fn collect_self_attribute_references<'t>(
    node: &PyNode<'t>,
    name: &str,
    sites: &mut Vec<PyNode<'t>>,
) {
    if node.kind() == kinds::ATTRIBUTE {
        let children: Vec<PyNode<'t>> = node.children().collect();
        let is_self = children
            .first()
            .is_some_and(|o| o.kind() == kinds::IDENTIFIER && o.text() == "self");
        if is_self {
            if let Some(attr) = children
                .iter()
                .skip(1)
                .filter(|c| c.kind() == kinds::IDENTIFIER)
                .last()
            {
                if attr.text() == name {
                    sites.push(attr.clone());
                }
            }
        }
    }
    for child in node.children() {
        collect_self_attribute_references(&child, name, sites);
    }
}

fn attribute_reference_exists(node: &PyNode<'_>, name: &str) -> bool {
    let mut sites = Vec::new();
    collect_self_attribute_references(node, name, &mut sites);
    !sites.is_empty()
}

/// Identifier nodes in variable position (not attribute names, not keyword
/// argument names, not definition names) matching `name`.
fn collect_variable_identifiers<'t>(node: &PyNode<'t>, name: &str, sites: &mut Vec<PyNode<'t>>) {
    match &*node.kind() {
        kinds::ATTRIBUTE => {
            if let Some(object) = node.children().next() {
                collect_variable_identifiers(&object, name, sites);
            }
        }
        kinds::KEYWORD_ARGUMENT => {
            if let Some(value) = node.children().last() {
                collect_variable_identifiers(&value, name, sites);
            }
        }
        kinds::FUNCTION_DEFINITION | kinds::CLASS_DEFINITION => {}
        kinds::IDENTIFIER => {
            if node.text() == name {
                sites.push(node.clone());
            }
        }
        _ => {
            for child in node.children() {
                collect_variable_identifiers(&child, name, sites);
            }
        }
    }
}

/// The parameter list text of a function, without the surrounding parens.
pub fn parameters_text(function: &PyNode<'_>) -> String {
    function
        .children()
        .find(|c| c.kind() == kinds::PARAMETERS)
        .map(|p| {
            let text = p.text().to_string();
            text.trim_start_matches('(')
                .trim_end_matches(')')
                .to_string()
        })
        .unwrap_or_default()
}
