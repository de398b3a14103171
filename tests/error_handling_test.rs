//! Error-path tests: every failure leaves the target file byte-identical to
//! its pre-invocation state, and each failure class maps to its own error
//! kind and exit code.

use std::fs;
use std::path::PathBuf;

use recast::errors::RefactorError;
use recast::recipes::RecipeParams;
use recast::{apply, ApplyOptions};

fn write_fixture(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn named(name: &str) -> RecipeParams {
    RecipeParams {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

#[test]
fn test_malformed_address_fails_before_touching_filesystem() {
    // The file does not exist; an addressing failure must surface before
    // any read is attempted.
    let err = apply(
        "extract-method",
        "no_such_file.py::Class::method#L5-L3",
        &named("x"),
        &ApplyOptions::default(),
    )
    .unwrap_err();

    match err {
        RefactorError::Addressing(msg) => assert!(msg.contains("invalid line range")),
        other => panic!("expected addressing error, got {other:?}"),
    }
}

#[test]
fn test_unknown_recipe_is_reported() {
    let err = apply(
        "explode-method",
        "f.py::C::m#L1",
        &RecipeParams::default(),
        &ApplyOptions::default(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("unknown refactoring"));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_missing_target_file_is_io_error() {
    let err = apply(
        "extract-method",
        "definitely_missing.py::C::m#L1-L2",
        &named("x"),
        &ApplyOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, RefactorError::Io(_)));
}

#[test]
fn test_target_not_found_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let source = "class Order:\n    def total(self):\n        return 1\n";
    let path = write_fixture(&dir, "order.py", source);

    let address = format!("{}::Customer::total#L3", path.display());
    let err = apply(
        "extract-method",
        &address,
        &named("x"),
        &ApplyOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(err, RefactorError::TargetNotFound(_)));
    assert!(err.to_string().contains("class 'Customer'"));
    assert_eq!(err.exit_code(), 3);
    assert_eq!(fs::read_to_string(&path).unwrap(), source);
}

#[test]
fn test_empty_line_selection() {
    let dir = tempfile::tempdir().unwrap();
    let source = "class Order:\n    def total(self):\n        return 1\n";
    let path = write_fixture(&dir, "order.py", source);

    let address = format!("{}::Order::total#L80-L90", path.display());
    let err = apply(
        "extract-method",
        &address,
        &named("x"),
        &ApplyOptions::default(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("empty selection"));
}

#[test]
fn test_parse_error_reports_position_and_preserves_file() {
    let dir = tempfile::tempdir().unwrap();
    let source = "def broken(:\n    pass\n";
    let path = write_fixture(&dir, "broken.py", source);

    let address = format!("{}::broken#L1", path.display());
    let err = apply(
        "extract-method",
        &address,
        &named("x"),
        &ApplyOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(err, RefactorError::Parse { .. }));
    assert_eq!(err.exit_code(), 6);
    assert_eq!(fs::read_to_string(&path).unwrap(), source);
}

#[test]
fn test_missing_required_flag() {
    let dir = tempfile::tempdir().unwrap();
    let source = "class Order:\n    def total(self):\n        return 1\n";
    let path = write_fixture(&dir, "order.py", source);

    let address = format!("{}::Order::total#L3", path.display());
    let err = apply(
        "extract-method",
        &address,
        &RecipeParams::default(),
        &ApplyOptions::default(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("requires --name"));
    assert_eq!(fs::read_to_string(&path).unwrap(), source);
}

#[test]
fn test_inline_temp_refuses_reassigned_temporary() {
    let dir = tempfile::tempdir().unwrap();
    let source = r#"def f():
    temp = 1
    temp = 2
    return temp
"#;
    let path = write_fixture(&dir, "f.py", source);

    let address = format!("{}::f::temp", path.display());
    let err = apply(
        "inline-temp",
        &address,
        &RecipeParams::default(),
        &ApplyOptions::default(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("assigned more than once"));
    assert_eq!(fs::read_to_string(&path).unwrap(), source);
}

#[test]
fn test_rename_conflict_reports_existing_line() {
    let dir = tempfile::tempdir().unwrap();
    let source = r#"class Customer:
    def charge(self, amount):
        return amount

    def bill(self, amount):
        return amount
"#;
    let path = write_fixture(&dir, "customer.py", source);

    let address = format!("{}::Customer::charge", path.display());
    let err = apply(
        "rename-method",
        &address,
        &named("bill"),
        &ApplyOptions::default(),
    )
    .unwrap_err();

    match err {
        RefactorError::NameConflict { name, line } => {
            assert_eq!(name, "bill");
            assert_eq!(line, 5);
        }
        other => panic!("expected name conflict, got {other:?}"),
    }
    assert_eq!(fs::read_to_string(&path).unwrap(), source);
}
