//! # Reference Analyzer
//!
//! Classifies every identifier referenced within a selected statement range
//! against its enclosing scope. The four result sets drive parameter and
//! return-value synthesis when code moves to a new scope: reads of names
//! bound outside become parameters, in-range bindings that later code reads
//! become return values, and `self.<attr>` accesses are tracked separately
//! because they need no plumbing when the destination is a method of the
//! same class.

use std::collections::HashSet;

use tracing::debug;

use crate::kinds;
use crate::navigator::{body_of, parameter_names, statements_of, FunctionTarget};
use crate::tree::PyNode;

/// Result of reference analysis over a selected node range.
///
/// The sets are disjoint and, together, cover every variable-like identifier
/// used in the range (Python builtins, keywords and module-global names are
/// not variables for this purpose). Each set preserves first-use order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingClassification {
    /// Assigned within the range and not used after it
    pub locally_bound: Vec<String>,
    /// Read within the range but bound outside it; parameters of an
    /// extracted scope
    pub free_inbound: Vec<String>,
    /// Assigned within the range and read after it; return values of an
    /// extracted scope
    pub free_outbound: Vec<String>,
    /// `self.<attr>` accesses, by attribute name
    pub member_references: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Read,
    Write,
}

/// Classify every identifier used in `selected` against the enclosing
/// function scope. `selected` must be top-level statements of the function's
/// body, in source order.
pub fn classify_range(
    target: &FunctionTarget<'_>,
    selected: &[PyNode<'_>],
) -> BindingClassification {
    let params: Vec<String> = parameter_names(&target.function)
        .iter()
        .map(|p| p.text().to_string())
        .filter(|name| name != "self")
        .collect();

    let (assigned_before, reads_after) = scope_context(target, selected);

    let mut events: Vec<(String, Event)> = Vec::new();
    let mut members: Vec<String> = Vec::new();
    for stmt in selected {
        collect_events(stmt, &mut events, &mut members);
    }

    let mut classification = BindingClassification::default();
    let mut seen: HashSet<String> = HashSet::new();
    let written: HashSet<&str> = events
        .iter()
        .filter(|(_, e)| *e == Event::Write)
        .map(|(n, _)| n.as_str())
        .collect();

    for (name, event) in &events {
        if !seen.insert(name.clone()) {
            continue;
        }
        let bound_outside = params.iter().any(|p| p == name) || assigned_before.contains(name);
        match event {
            Event::Read => {
                if bound_outside {
                    classification.free_inbound.push(name.clone());
                } else if written.contains(name.as_str()) {
                    // Read-before-write of a name only this range binds; the
                    // read is the user's latent bug, the binding is still
                    // local to the range.
                    push_local_or_outbound(&mut classification, name, &reads_after);
                }
                // Otherwise the name resolves at module scope (import,
                // module function, class); it stays reachable from any
                // destination scope and is not a variable here.
            }
            Event::Write => {
                push_local_or_outbound(&mut classification, name, &reads_after);
            }
        }
    }

    let mut member_seen = HashSet::new();
    for member in members {
        if member_seen.insert(member.clone()) {
            classification.member_references.push(member);
        }
    }

    debug!(
        inbound = ?classification.free_inbound,
        outbound = ?classification.free_outbound,
        local = ?classification.locally_bound,
        members = ?classification.member_references,
        "classified selected range"
    );
    classification
}

fn push_local_or_outbound(
    classification: &mut BindingClassification,
    name: &str,
    reads_after: &HashSet<String>,
) {
    if reads_after.contains(name) {
        classification.free_outbound.push(name.to_string());
    } else {
        classification.locally_bound.push(name.to_string());
    }
}

/// Names assigned before the range and names read after it, within the same
/// function body.
fn scope_context(
    target: &FunctionTarget<'_>,
    selected: &[PyNode<'_>],
) -> (HashSet<String>, HashSet<String>) {
    let mut assigned_before = HashSet::new();
    let mut reads_after = HashSet::new();

    let (Some(first), Some(last)) = (selected.first(), selected.last()) else {
        return (assigned_before, reads_after);
    };
    let Some(body) = body_of(&target.function) else {
        return (assigned_before, reads_after);
    };

    for stmt in statements_of(&body) {
        if stmt.range().end <= first.range().start {
            let mut targets = Vec::new();
            collect_write_targets(&stmt, &mut targets);
            assigned_before.extend(targets);
        } else if stmt.range().start >= last.range().end {
            let mut events = Vec::new();
            let mut members = Vec::new();
            collect_events(&stmt, &mut events, &mut members);
            reads_after.extend(
                events
                    .into_iter()
                    .filter(|(_, e)| *e == Event::Read)
                    .map(|(n, _)| n),
            );
        }
    }

    (assigned_before, reads_after)
}

/// Record reads, writes and member accesses in evaluation order.
///
/// Assignment right-hand sides are walked before their targets so that
/// `x = x + 1` registers the read of `x` first; augmented assignments read
/// their target before writing it.
fn collect_events(node: &PyNode<'_>, events: &mut Vec<(String, Event)>, members: &mut Vec<String>) {
    match &*node.kind() {
        kinds::ASSIGNMENT => {
            let children: Vec<PyNode<'_>> = node.children().collect();
            if let Some(right) = children.last() {
                if children.len() > 1 {
                    collect_events(right, events, members);
                }
            }
            if let Some(left) = children.first() {
                collect_targets_as_writes(left, events, members);
            }
        }
        kinds::AUGMENTED_ASSIGNMENT => {
            let children: Vec<PyNode<'_>> = node.children().collect();
            if let Some(left) = children.first() {
                if left.kind() == kinds::IDENTIFIER {
                    record_identifier(left, Event::Read, events);
                } else {
                    collect_events(left, events, members);
                }
            }
            if let Some(right) = children.last() {
                if children.len() > 1 {
                    collect_events(right, events, members);
                }
            }
            if let Some(left) = children.first() {
                collect_targets_as_writes(left, events, members);
            }
        }
        kinds::FOR_STATEMENT => {
            // for <target> in <iterable>: <body> - iterable is evaluated
            // first, then the target is bound on each iteration.
            let children: Vec<PyNode<'_>> = node.children().collect();
            let mut target_seen = false;
            for child in &children {
                match &*child.kind() {
                    kinds::IDENTIFIER | kinds::PATTERN_LIST | kinds::TUPLE_PATTERN
                        if !target_seen =>
                    {
                        target_seen = true;
                        continue;
                    }
                    kinds::BLOCK => continue,
                    _ => collect_events(child, events, members),
                }
            }
            if let Some(target) = children.iter().find(|c| {
                matches!(
                    &*c.kind(),
                    kinds::IDENTIFIER | kinds::PATTERN_LIST | kinds::TUPLE_PATTERN
                )
            }) {
                collect_targets_as_writes(target, events, members);
            }
            if let Some(block) = children.iter().find(|c| c.kind() == kinds::BLOCK) {
                collect_events(block, events, members);
            }
        }
        kinds::ATTRIBUTE => {
            let children: Vec<PyNode<'_>> = node.children().collect();
            match children.first() {
                Some(object) if object.kind() == kinds::IDENTIFIER && object.text() == "self" => {
                    if let Some(attr) = children
                        .iter()
                        .skip(1)
                        .filter(|c| c.kind() == kinds::IDENTIFIER)
                        .last()
                    {
                        members.push(attr.text().to_string());
                    }
                }
                Some(object) => {
                    // Only the base object is a variable reference; the
                    // attribute name belongs to another namespace.
                    collect_events(object, events, members);
                }
                None => {}
            }
        }
        kinds::KEYWORD_ARGUMENT => {
            // name=value: the name is not a variable reference.
            if let Some(value) = node.children().last() {
                collect_events(&value, events, members);
            }
        }
        kinds::IDENTIFIER => {
            record_identifier(node, Event::Read, events);
        }
        kinds::STRING => {
            // Only f-string interpolations contain expressions.
            for child in node.children() {
                if child.kind() == "interpolation" {
                    collect_events(&child, events, members);
                }
            }
        }
        kinds::FUNCTION_DEFINITION | kinds::CLASS_DEFINITION => {
            // A nested definition binds its name in this scope; its interior
            // is a different scope and is not analyzed.
            if let Some(name) = node.children().find(|c| c.kind() == kinds::IDENTIFIER) {
                record_identifier(&name, Event::Write, events);
            }
        }
        kinds::COMMENT => {}
        _ => {
            for child in node.children() {
                collect_events(&child, events, members);
            }
        }
    }
}

fn record_identifier(node: &PyNode<'_>, event: Event, events: &mut Vec<(String, Event)>) {
    let name = node.text().to_string();
    if kinds::is_builtin_identifier(&name) {
        return;
    }
    events.push((name, event));
}

/// Record assignment-target names as writes. Attribute and subscript targets
/// mutate existing objects rather than binding names; their bases are reads
/// (and `self.<attr>` targets are member references).
fn collect_targets_as_writes(
    node: &PyNode<'_>,
    events: &mut Vec<(String, Event)>,
    members: &mut Vec<String>,
) {
    match &*node.kind() {
        kinds::IDENTIFIER => record_identifier(node, Event::Write, events),
        kinds::PATTERN_LIST | kinds::TUPLE_PATTERN => {
            for child in node.children() {
                collect_targets_as_writes(&child, events, members);
            }
        }
        kinds::ATTRIBUTE | kinds::SUBSCRIPT => collect_events(node, events, members),
        _ => {}
    }
}

/// Variable names read by an expression, in evaluation order, excluding
/// builtins and `self.<attr>` member accesses. Used when a single expression
/// (a condition, a subexpression) moves to a new scope.
pub fn expression_reads(node: &PyNode<'_>) -> Vec<String> {
    let mut events = Vec::new();
    let mut members = Vec::new();
    collect_events(node, &mut events, &mut members);
    let mut seen = HashSet::new();
    events
        .into_iter()
        .filter(|(_, e)| *e == Event::Read)
        .map(|(n, _)| n)
        .filter(|n| seen.insert(n.clone()))
        .collect()
}

/// Names bound by a statement (plain, augmented and loop targets).
pub fn collect_write_targets(node: &PyNode<'_>, targets: &mut Vec<String>) {
    match &*node.kind() {
        kinds::ASSIGNMENT | kinds::AUGMENTED_ASSIGNMENT => {
            if let Some(left) = node.children().next() {
                collect_identifier_names(&left, targets);
            }
        }
        kinds::FOR_STATEMENT => {
            if let Some(target) = node.children().find(|c| {
                matches!(
                    &*c.kind(),
                    kinds::IDENTIFIER | kinds::PATTERN_LIST | kinds::TUPLE_PATTERN
                )
            }) {
                collect_identifier_names(&target, targets);
            }
            for child in node.children().filter(|c| c.kind() == kinds::BLOCK) {
                collect_write_targets(&child, targets);
            }
        }
        _ => {
            for child in node.children() {
                collect_write_targets(&child, targets);
            }
        }
    }
}

fn collect_identifier_names(node: &PyNode<'_>, names: &mut Vec<String>) {
    match &*node.kind() {
        kinds::IDENTIFIER => names.push(node.text().to_string()),
        kinds::PATTERN_LIST | kinds::TUPLE_PATTERN => {
            for child in node.children() {
                collect_identifier_names(&child, names);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::TargetReference;
    use crate::navigator::{resolve_function, select_statements};
    use crate::tree::SourceTree;

    fn classify(source: &str, address: &str) -> BindingClassification {
        let tree = SourceTree::parse(source).unwrap();
        let reference = TargetReference::parse(address).unwrap();
        let target = resolve_function(&tree, &reference).unwrap();
        let body = body_of(&target.function).unwrap();
        let selected = select_statements(
            &tree,
            &body,
            reference.line_start.unwrap(),
            reference.line_end.unwrap(),
        )
        .unwrap();
        classify_range(&target, &selected)
    }

    #[test]
    fn test_inbound_free_variable() {
        let source = r#"class Order:
    def print_owing(self, quantity):
        tax = quantity * 2
        print(tax)
"#;
        let c = classify(source, "f.py::Order::print_owing#L3-L4");
        assert_eq!(c.free_inbound, vec!["quantity"]);
        assert!(c.free_outbound.is_empty());
        // tax is bound in-range and unused afterwards
        assert_eq!(c.locally_bound, vec!["tax"]);
    }

    #[test]
    fn test_outbound_value() {
        let source = r#"def price():
    base_price = 10 * 2
    discount = 1
    return base_price - discount
"#;
        let c = classify(source, "f.py::price#L2-L2");
        assert_eq!(c.free_outbound, vec!["base_price"]);
        assert!(c.free_inbound.is_empty());
        assert!(c.locally_bound.is_empty());
    }

    #[test]
    fn test_member_references_are_separate() {
        let source = r#"class Order:
    def total(self):
        amount = self.quantity * self.price
        return amount
"#;
        let c = classify(source, "f.py::Order::total#L3-L3");
        assert_eq!(c.member_references, vec!["quantity", "price"]);
        assert_eq!(c.free_outbound, vec!["amount"]);
        assert!(c.free_inbound.is_empty());
    }

    #[test]
    fn test_first_use_order_read_then_write() {
        // x is read before being reassigned; it was bound before the range,
        // so the first use (a read) classifies it as inbound.
        let source = r#"def f():
    x = 1
    x = x + 1
    print(x)
"#;
        let c = classify(source, "f.py::f#L3-L3");
        assert_eq!(c.free_inbound, vec!["x"]);
        assert!(c.locally_bound.is_empty());
        assert!(c.free_outbound.is_empty());
    }

    #[test]
    fn test_write_first_then_used_after_is_outbound() {
        let source = r#"def f():
    y = 2
    z = y * 3
    return z
"#;
        let c = classify(source, "f.py::f#L2-L3");
        assert_eq!(c.free_outbound, vec!["z"]);
        assert_eq!(c.locally_bound, vec!["y"]);
    }

    #[test]
    fn test_partition_invariant() {
        let source = r#"def f(items):
    count = 0
    total = 0
    for item in items:
        total += item
        count = count + 1
    average = total / count
    return average
"#;
        let c = classify(source, "f.py::f#L4-L6");
        let mut all: Vec<&String> = c
            .locally_bound
            .iter()
            .chain(&c.free_inbound)
            .chain(&c.free_outbound)
            .collect();
        let total = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), total, "classification sets must be disjoint");

        // items is read but bound by the parameter list; total and count are
        // read-first (bound before the range) and used afterwards.
        assert!(c.free_inbound.contains(&"items".to_string()));
        assert!(c.free_inbound.contains(&"total".to_string()));
        assert!(c.free_inbound.contains(&"count".to_string()));
        assert!(c.locally_bound.contains(&"item".to_string()));
    }

    #[test]
    fn test_builtins_not_classified() {
        let source = r#"def f(values):
    longest = max(len(v) for v in values)
    return longest
"#;
        let c = classify(source, "f.py::f#L2-L2");
        assert!(!c.free_inbound.contains(&"max".to_string()));
        assert!(!c.free_inbound.contains(&"len".to_string()));
        assert!(c.free_inbound.contains(&"values".to_string()));
    }
}
