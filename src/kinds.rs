//! Tree-sitter-python node kind names used by the engine.
//!
//! Dispatch on node kind happens by matching these constants, so a grammar
//! rename only has to be absorbed here.

pub const MODULE: &str = "module";
pub const CLASS_DEFINITION: &str = "class_definition";
pub const FUNCTION_DEFINITION: &str = "function_definition";
pub const DECORATED_DEFINITION: &str = "decorated_definition";
pub const BLOCK: &str = "block";
pub const PARAMETERS: &str = "parameters";
pub const TYPED_PARAMETER: &str = "typed_parameter";
pub const DEFAULT_PARAMETER: &str = "default_parameter";
pub const TYPED_DEFAULT_PARAMETER: &str = "typed_default_parameter";
pub const IDENTIFIER: &str = "identifier";
pub const ATTRIBUTE: &str = "attribute";
pub const CALL: &str = "call";
pub const ARGUMENT_LIST: &str = "argument_list";
pub const KEYWORD_ARGUMENT: &str = "keyword_argument";
pub const EXPRESSION_STATEMENT: &str = "expression_statement";
pub const ASSIGNMENT: &str = "assignment";
pub const AUGMENTED_ASSIGNMENT: &str = "augmented_assignment";
pub const RETURN_STATEMENT: &str = "return_statement";
pub const IF_STATEMENT: &str = "if_statement";
pub const WHILE_STATEMENT: &str = "while_statement";
pub const FOR_STATEMENT: &str = "for_statement";
pub const PATTERN_LIST: &str = "pattern_list";
pub const TUPLE_PATTERN: &str = "tuple_pattern";
pub const COMMENT: &str = "comment";
pub const INTEGER: &str = "integer";
pub const FLOAT: &str = "float";
pub const STRING: &str = "string";
pub const PARENTHESIZED_EXPRESSION: &str = "parenthesized_expression";
pub const SUBSCRIPT: &str = "subscript";
pub const ERROR: &str = "ERROR";

/// Kinds that read as a single atom at a call/reference site and therefore
/// never need parentheses when substituted into another expression.
pub fn is_atomic_expression(kind: &str) -> bool {
    matches!(
        kind,
        IDENTIFIER
            | ATTRIBUTE
            | CALL
            | SUBSCRIPT
            | INTEGER
            | FLOAT
            | STRING
            | PARENTHESIZED_EXPRESSION
            | "true"
            | "false"
            | "none"
            | "list"
            | "dictionary"
            | "tuple"
            | "set"
    )
}

/// Python keywords and builtins that are never classified as variables.
///
/// Mirrors the variable-reference filter of the binding analyzer: module
/// builtins stay reachable from any scope, so they are neither parameters
/// nor return values of an extracted callable.
pub fn is_builtin_identifier(name: &str) -> bool {
    matches!(
        name,
        "print"
            | "len"
            | "str"
            | "int"
            | "float"
            | "bool"
            | "list"
            | "dict"
            | "set"
            | "tuple"
            | "range"
            | "enumerate"
            | "zip"
            | "map"
            | "filter"
            | "sorted"
            | "reversed"
            | "sum"
            | "min"
            | "max"
            | "abs"
            | "round"
            | "open"
            | "isinstance"
            | "issubclass"
            | "super"
            | "type"
            | "repr"
            | "hash"
            | "id"
            | "iter"
            | "next"
            | "getattr"
            | "setattr"
            | "hasattr"
            | "True"
            | "False"
            | "None"
            | "self"
            | "cls"
            | "Exception"
            | "ValueError"
            | "TypeError"
            | "KeyError"
            | "IndexError"
            | "AttributeError"
            | "RuntimeError"
            | "StopIteration"
            | "NotImplementedError"
    )
}
