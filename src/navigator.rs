//! # Tree Navigator
//!
//! Resolves a [`TargetReference`] against a parsed [`SourceTree`]: the class
//! node, the method node within it, the statements covered by a line span,
//! or a single symbol binding site. Read-only traversal; all failures are
//! [`RefactorError::TargetNotFound`] naming the missing segment.

use crate::errors::{RefactorError, Result};
use crate::kinds;
use crate::locator::TargetReference;
use crate::tree::{PyNode, SourceTree};

/// A resolved function or method together with its enclosing class, if any.
pub struct FunctionTarget<'t> {
    /// `class_definition` node; `None` for module-level functions
    pub class: Option<PyNode<'t>>,
    /// `function_definition` node
    pub function: PyNode<'t>,
}

/// Where a symbol is bound inside a function.
pub enum SymbolSite<'t> {
    /// `assignment` node whose left-hand side is the symbol
    Assignment(PyNode<'t>),
    /// parameter node in the function's parameter list
    Parameter(PyNode<'t>),
}

/// Strip a `decorated_definition` wrapper, yielding the inner definition.
pub fn unwrap_decorated<'t>(node: PyNode<'t>) -> PyNode<'t> {
    if node.kind() == kinds::DECORATED_DEFINITION {
        if let Some(inner) = node.children().find(|c| {
            c.kind() == kinds::CLASS_DEFINITION || c.kind() == kinds::FUNCTION_DEFINITION
        }) {
            return inner;
        }
    }
    node
}

/// The name of a class or function definition node.
pub fn name_of(def_node: &PyNode<'_>) -> Option<String> {
    def_node
        .children()
        .find(|c| c.kind() == kinds::IDENTIFIER)
        .map(|n| n.text().to_string())
}

/// The `block` body of a class or function definition.
pub fn body_of<'t>(def_node: &PyNode<'t>) -> Option<PyNode<'t>> {
    def_node.children().find(|c| c.kind() == kinds::BLOCK)
}

/// The statements of a block, in source order, skipping interleaved comments.
pub fn statements_of<'t>(block: &PyNode<'t>) -> Vec<PyNode<'t>> {
    block
        .children()
        .filter(|c| c.kind() != kinds::COMMENT)
        .collect()
}

/// Find a top-level class by exact name, first match in source order.
/// Duplicate definitions later in the file are unreachable by address.
pub fn find_class<'t>(tree: &'t SourceTree, name: &str) -> Option<PyNode<'t>> {
    tree.root()
        .children()
        .map(unwrap_decorated)
        .filter(|n| n.kind() == kinds::CLASS_DEFINITION)
        .find(|n| name_of(n).as_deref() == Some(name))
}

/// Find a top-level function by exact name.
pub fn find_module_function<'t>(tree: &'t SourceTree, name: &str) -> Option<PyNode<'t>> {
    tree.root()
        .children()
        .map(unwrap_decorated)
        .filter(|n| n.kind() == kinds::FUNCTION_DEFINITION)
        .find(|n| name_of(n).as_deref() == Some(name))
}

/// Find a method inside a class body, descending through decorators.
pub fn find_method_in_class<'t>(class_node: &PyNode<'t>, name: &str) -> Option<PyNode<'t>> {
    let body = body_of(class_node)?;
    body.children()
        .map(unwrap_decorated)
        .filter(|n| n.kind() == kinds::FUNCTION_DEFINITION)
        .find(|n| name_of(n).as_deref() == Some(name))
}

/// Resolve the function or method a reference addresses.
///
/// With both class and method segments, both must exist. A lone second
/// segment is tried as a class first, then as a module-level function, since
/// the addressing grammar cannot distinguish the two positionally.
pub fn resolve_function<'t>(
    tree: &'t SourceTree,
    reference: &TargetReference,
) -> Result<FunctionTarget<'t>> {
    match (&reference.class_name, &reference.method_name) {
        (Some(class_name), Some(method_name)) => {
            let class = find_class(tree, class_name).ok_or_else(|| {
                RefactorError::TargetNotFound(format!("class '{class_name}'"))
            })?;
            let function = find_method_in_class(&class, method_name).ok_or_else(|| {
                RefactorError::TargetNotFound(format!(
                    "method '{method_name}' in class '{class_name}'"
                ))
            })?;
            Ok(FunctionTarget {
                class: Some(class),
                function,
            })
        }
        (Some(name), None) => {
            let function = find_module_function(tree, name).ok_or_else(|| {
                RefactorError::TargetNotFound(format!("function '{name}'"))
            })?;
            Ok(FunctionTarget {
                class: None,
                function,
            })
        }
        _ => Err(RefactorError::TargetNotFound(
            "address names no function or method".to_string(),
        )),
    }
}

/// Resolve the class a reference addresses, for class-scoped recipes.
pub fn resolve_class<'t>(
    tree: &'t SourceTree,
    reference: &TargetReference,
) -> Result<PyNode<'t>> {
    let class_name = reference
        .class_name
        .as_deref()
        .ok_or_else(|| RefactorError::TargetNotFound("address names no class".to_string()))?;
    find_class(tree, class_name)
        .ok_or_else(|| RefactorError::TargetNotFound(format!("class '{class_name}'")))
}

/// Select the statements of a body covered by an inclusive 1-based line span.
///
/// A statement is included when any of its lines overlap the span: its last
/// line is `>= line_start` and its first line is `<= line_end`. Statements
/// are never split mid-statement, so an end line falling inside a compound
/// statement extends the selection to that statement's end.
pub fn select_statements<'t>(
    tree: &SourceTree,
    body: &PyNode<'t>,
    line_start: u32,
    line_end: u32,
) -> Result<Vec<PyNode<'t>>> {
    let selected: Vec<PyNode<'t>> = statements_of(body)
        .into_iter()
        .filter(|stmt| {
            tree.last_line(stmt) >= line_start && tree.first_line(stmt) <= line_end
        })
        .collect();

    if selected.is_empty() {
        return Err(RefactorError::TargetNotFound("empty selection".to_string()));
    }
    Ok(selected)
}

/// Parameter name nodes of a function, in declaration order, including
/// `self` when present.
pub fn parameter_names<'t>(function: &PyNode<'t>) -> Vec<PyNode<'t>> {
    let Some(params) = function
        .children()
        .find(|c| c.kind() == kinds::PARAMETERS)
    else {
        return Vec::new();
    };

    let mut names = Vec::new();
    for param in params.children() {
        let kind = param.kind().to_string();
        if kind == kinds::IDENTIFIER {
            names.push(param);
        } else if matches!(
            kind.as_str(),
            kinds::TYPED_PARAMETER | kinds::DEFAULT_PARAMETER | kinds::TYPED_DEFAULT_PARAMETER
        ) {
            if let Some(name) = param.children().find(|c| c.kind() == kinds::IDENTIFIER) {
                names.push(name);
            }
        }
    }
    names
}

/// Find where `symbol` is bound within a function: the first assignment to
/// it, or the parameter declaring it.
pub fn find_symbol_site<'t>(function: &PyNode<'t>, symbol: &str) -> Result<SymbolSite<'t>> {
    for param in parameter_names(function) {
        if param.text() == symbol {
            return Ok(SymbolSite::Parameter(param));
        }
    }

    let body = body_of(function).ok_or_else(|| {
        RefactorError::TargetNotFound("function has no body".to_string())
    })?;
    if let Some(assignment) = find_assignment_to(&body, symbol) {
        return Ok(SymbolSite::Assignment(assignment));
    }

    Err(RefactorError::TargetNotFound(format!("symbol '{symbol}'")))
}

/// Depth-first search for an `assignment` whose left-hand side is exactly
/// the given identifier.
pub fn find_assignment_to<'t>(node: &PyNode<'t>, symbol: &str) -> Option<PyNode<'t>> {
    if node.kind() == kinds::ASSIGNMENT {
        if let Some(left) = node.children().next() {
            if left.kind() == kinds::IDENTIFIER && left.text() == symbol {
                return Some(node.clone());
            }
        }
    }
    for child in node.children() {
        if let Some(found) = find_assignment_to(&child, symbol) {
            return Some(found);
        }
    }
    None
}

/// All assignments to `self.<field>` inside a node, returned as the
/// `attribute` nodes on the left-hand side.
pub fn self_field_assignments<'t>(node: &PyNode<'t>, field: &str) -> Vec<PyNode<'t>> {
    let mut sites = Vec::new();
    collect_self_field_assignments(node, field, &mut sites);
    sites
}

fn collect_self_field_assignments<'t>(
    node: &PyNode<'t>,
    field: &str,
    sites: &mut Vec<PyNode<'t>>,
) {
    if node.kind() == kinds::ASSIGNMENT {
        if let Some(left) = node.children().next() {
            if is_self_attribute(&left, field) {
                sites.push(left);
            }
        }
    }
    for child in node.children() {
        collect_self_field_assignments(&child, field, sites);
    }
}

/// Find the field of `class_node` that holds an instance of
/// `collaborator_class`, by scanning `__init__` for
/// `self.<field> = <CollaboratorClass>(...)`.
pub fn find_holder_field(class_node: &PyNode<'_>, collaborator_class: &str) -> Option<String> {
    let init = find_method_in_class(class_node, "__init__")?;
    let body = body_of(&init)?;
    let mut result = None;
    scan_holder_assignments(&body, &mut |field, class_name| {
        if class_name == collaborator_class && result.is_none() {
            result = Some(field.to_string());
        }
    });
    result
}

/// The class a holder field is constructed from, read off
/// `self.<holder> = <Class>(...)` in `__init__`.
pub fn holder_class_name(class_node: &PyNode<'_>, holder: &str) -> Option<String> {
    let init = find_method_in_class(class_node, "__init__")?;
    let body = body_of(&init)?;
    let mut result = None;
    scan_holder_assignments(&body, &mut |field, class_name| {
        if field == holder && result.is_none() {
            result = Some(class_name.to_string());
        }
    });
    result
}

fn scan_holder_assignments(node: &PyNode<'_>, visit: &mut impl FnMut(&str, &str)) {
    if node.kind() == kinds::ASSIGNMENT {
        let children: Vec<PyNode<'_>> = node.children().collect();
        if let (Some(left), Some(right)) = (children.first(), children.last()) {
            if left.kind() == kinds::ATTRIBUTE && right.kind() == kinds::CALL {
                let field = left
                    .children()
                    .filter(|c| c.kind() == kinds::IDENTIFIER)
                    .last()
                    .map(|n| n.text().to_string());
                let is_self = left
                    .children()
                    .next()
                    .is_some_and(|o| o.kind() == kinds::IDENTIFIER && o.text() == "self");
                let callee = right
                    .children()
                    .next()
                    .filter(|c| c.kind() == kinds::IDENTIFIER)
                    .map(|n| n.text().to_string());
                if let (true, Some(field), Some(callee)) = (is_self, field, callee) {
                    visit(&field, &callee);
                }
            }
        }
    }
    for child in node.children() {
        scan_holder_assignments(&child, visit);
    }
}

/// Whether a node is an attribute access `self.<name>`.
pub fn is_self_attribute(node: &PyNode<'_>, name: &str) -> bool {
    if node.kind() != kinds::ATTRIBUTE {
        return false;
    }
    let children: Vec<PyNode<'_>> = node.children().collect();
    let object = children.first();
    let attr = children
        .iter()
        .skip(1)
        .filter(|c| c.kind() == kinds::IDENTIFIER)
        .last();
    matches!(object, Some(o) if o.kind() == kinds::IDENTIFIER && o.text() == "self")
        && matches!(attr, Some(a) if a.text() == name)
}
