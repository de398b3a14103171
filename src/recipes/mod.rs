//! # Refactoring Catalog
//!
//! Thin consumers of the core engine, one module per catalog category. A
//! recipe validates its named parameters, resolves the target through the
//! navigator, classifies references where needed, and composes mutation
//! primitives into a [`TransformationPlan`]. No recipe touches the
//! filesystem; reading and writing the target file belongs to the CLI
//! boundary.

pub mod composing_methods;
pub mod moving_features;
pub mod organizing_data;
pub mod simplifying_conditionals;
pub mod simplifying_method_calls;

use crate::errors::{RefactorError, Result};
use crate::locator::TargetReference;
use crate::mutator::TransformationPlan;
use crate::navigator::{self, FunctionTarget};
use crate::tree::SourceTree;

/// Named parameters a recipe receives from the CLI, passed through opaquely.
#[derive(Debug, Clone, Default)]
pub struct RecipeParams {
    /// `--name`: new method/variable/constant name
    pub name: Option<String>,
    /// `--to`: destination class
    pub to: Option<String>,
    /// `--field`: field holding a collaborator instance
    pub field: Option<String>,
    /// `--value`: literal value, e.g. the magic number to replace
    pub value: Option<String>,
    /// `--default`: default value for a new parameter
    pub default: Option<String>,
}

/// One transformation from the catalog.
pub trait Recipe: Sync {
    fn name(&self) -> &'static str;

    /// Build the edit plan for one invocation. Pure with respect to the
    /// filesystem.
    fn plan(
        &self,
        tree: &SourceTree,
        reference: &TargetReference,
        params: &RecipeParams,
    ) -> Result<TransformationPlan>;
}

/// A catalog entry: recipe plus the metadata `--list` prints.
pub struct RecipeEntry {
    pub name: &'static str,
    pub category: &'static str,
    pub summary: &'static str,
    pub recipe: &'static dyn Recipe,
}

/// The immutable recipe registry, built from static registration data.
pub static CATALOG: &[RecipeEntry] = &[
    RecipeEntry {
        name: "extract-method",
        category: "composing-methods",
        summary: "extract a statement range into a new method",
        recipe: &composing_methods::ExtractMethod,
    },
    RecipeEntry {
        name: "extract-variable",
        category: "composing-methods",
        summary: "introduce an explaining variable for an expression",
        recipe: &composing_methods::ExtractVariable,
    },
    RecipeEntry {
        name: "inline-temp",
        category: "composing-methods",
        summary: "replace a temporary with its initializer expression",
        recipe: &composing_methods::InlineTemp,
    },
    RecipeEntry {
        name: "replace-temp-with-query",
        category: "composing-methods",
        summary: "replace a temporary with a query method",
        recipe: &composing_methods::ReplaceTempWithQuery,
    },
    RecipeEntry {
        name: "move-method",
        category: "moving-features",
        summary: "move a method to another class, delegating from the original",
        recipe: &moving_features::MoveMethod,
    },
    RecipeEntry {
        name: "move-field",
        category: "moving-features",
        summary: "move a field's initialization to another class",
        recipe: &moving_features::MoveField,
    },
    RecipeEntry {
        name: "hide-delegate",
        category: "moving-features",
        summary: "add a delegating method hiding a collaborator",
        recipe: &moving_features::HideDelegate,
    },
    RecipeEntry {
        name: "encapsulate-field",
        category: "organizing-data",
        summary: "replace direct field access with a property",
        recipe: &organizing_data::EncapsulateField,
    },
    RecipeEntry {
        name: "self-encapsulate-field",
        category: "organizing-data",
        summary: "route the class's own field access through a property",
        recipe: &organizing_data::SelfEncapsulateField,
    },
    RecipeEntry {
        name: "replace-magic-number-with-symbolic-constant",
        category: "organizing-data",
        summary: "name a literal as a module-level constant",
        recipe: &organizing_data::ReplaceMagicNumber,
    },
    RecipeEntry {
        name: "rename-method",
        category: "simplifying-method-calls",
        summary: "rename a method and its file-local call sites",
        recipe: &simplifying_method_calls::RenameMethod,
    },
    RecipeEntry {
        name: "add-parameter",
        category: "simplifying-method-calls",
        summary: "append a defaulted parameter to a method",
        recipe: &simplifying_method_calls::AddParameter,
    },
    RecipeEntry {
        name: "remove-parameter",
        category: "simplifying-method-calls",
        summary: "drop a parameter and rewrite file-local call sites",
        recipe: &simplifying_method_calls::RemoveParameter,
    },
    RecipeEntry {
        name: "hide-method",
        category: "simplifying-method-calls",
        summary: "rename a method to its underscore-private form",
        recipe: &simplifying_method_calls::HideMethod,
    },
    RecipeEntry {
        name: "decompose-conditional",
        category: "simplifying-conditionals",
        summary: "extract a condition into a named predicate method",
        recipe: &simplifying_conditionals::DecomposeConditional,
    },
];

pub fn lookup(name: &str) -> Option<&'static RecipeEntry> {
    CATALOG.iter().find(|entry| entry.name == name)
}

/// Require a named parameter, reporting the missing flag.
pub(crate) fn require<'a>(param: &'a Option<String>, flag: &str, recipe: &str) -> Result<&'a str> {
    param.as_deref().ok_or_else(|| {
        RefactorError::Addressing(format!("recipe '{recipe}' requires {flag}"))
    })
}

/// Resolve addresses of the form `file::Class::method::symbol` or
/// `file::function::symbol`, where the shorter form is ambiguous between a
/// class method and a module function with a symbol.
pub(crate) fn resolve_function_and_symbol<'t>(
    tree: &'t SourceTree,
    reference: &TargetReference,
) -> Result<(FunctionTarget<'t>, String)> {
    if let Some(symbol) = &reference.symbol_name {
        let target = navigator::resolve_function(tree, reference)?;
        return Ok((target, symbol.clone()));
    }

    match (&reference.class_name, &reference.method_name) {
        (Some(first), Some(second)) => {
            if navigator::find_class(tree, first).is_some() {
                // `Class::method` with no symbol segment: the recipe needed
                // one, so the address is incomplete rather than unresolved.
                Err(RefactorError::Addressing(
                    "address must name a symbol (file::Class::method::symbol)".to_string(),
                ))
            } else if let Some(function) = navigator::find_module_function(tree, first) {
                Ok((
                    FunctionTarget {
                        class: None,
                        function,
                    },
                    second.clone(),
                ))
            } else {
                Err(RefactorError::TargetNotFound(format!(
                    "class or function '{first}'"
                )))
            }
        }
        _ => Err(RefactorError::Addressing(
            "address must name a symbol (file::Class::method::symbol)".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_names_are_unique() {
        let mut names: Vec<&str> = CATALOG.iter().map(|e| e.name).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_lookup_known_and_unknown() {
        assert!(lookup("extract-method").is_some());
        assert!(lookup("explode-method").is_none());
    }

    #[test]
    fn test_entry_names_match_recipe_names() {
        for entry in CATALOG {
            assert_eq!(entry.name, entry.recipe.name());
        }
    }
}
