//! End-to-end coverage for the recipe catalog beyond extract-method: each
//! recipe runs against a real file on disk and the full output is checked.

use std::fs;
use std::path::PathBuf;

use recast::recipes::RecipeParams;
use recast::{apply, ApplyOptions};

fn write_fixture(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_inline_temp() {
    let dir = tempfile::tempdir().unwrap();
    let source = r#"class Order:
    def price(self):
        base_price = self.quantity * self.item_price
        if base_price > 1000:
            return base_price * 0.95
        return base_price * 0.98
"#;
    let path = write_fixture(&dir, "order.py", source);

    let address = format!("{}::Order::price::base_price", path.display());
    apply(
        "inline-temp",
        &address,
        &RecipeParams::default(),
        &ApplyOptions::default(),
    )
    .unwrap();

    let expected = r#"class Order:
    def price(self):
        if (self.quantity * self.item_price) > 1000:
            return (self.quantity * self.item_price) * 0.95
        return (self.quantity * self.item_price) * 0.98
"#;
    assert_eq!(fs::read_to_string(&path).unwrap(), expected);
}

#[test]
fn test_replace_temp_with_query() {
    let dir = tempfile::tempdir().unwrap();
    let source = r#"class Order:
    def price(self):
        base_price = self.quantity * self.item_price
        return base_price * 0.98
"#;
    let path = write_fixture(&dir, "order.py", source);

    let address = format!("{}::Order::price::base_price", path.display());
    apply(
        "replace-temp-with-query",
        &address,
        &RecipeParams::default(),
        &ApplyOptions::default(),
    )
    .unwrap();

    let expected = r#"class Order:
    def price(self):
        return self.base_price() * 0.98

    def base_price(self):
        return self.quantity * self.item_price
"#;
    assert_eq!(fs::read_to_string(&path).unwrap(), expected);
}

#[test]
fn test_extract_variable() {
    let dir = tempfile::tempdir().unwrap();
    let source = r#"def price(quantity, item_price):
    return quantity * item_price * 1.05
"#;
    let path = write_fixture(&dir, "price.py", source);

    let address = format!("{}::price#L2", path.display());
    apply(
        "extract-variable",
        &address,
        &RecipeParams {
            name: Some("base".to_string()),
            ..Default::default()
        },
        &ApplyOptions::default(),
    )
    .unwrap();

    let expected = r#"def price(quantity, item_price):
    base = quantity * item_price * 1.05
    return base
"#;
    assert_eq!(fs::read_to_string(&path).unwrap(), expected);
}

#[test]
fn test_rename_method_rewrites_call_sites() {
    let dir = tempfile::tempdir().unwrap();
    let source = r#"class Customer:
    def charge(self, amount):
        return amount * 2


class Billing:
    def run(self, customer):
        return customer.charge(10)
"#;
    let path = write_fixture(&dir, "billing.py", source);

    let address = format!("{}::Customer::charge", path.display());
    apply(
        "rename-method",
        &address,
        &RecipeParams {
            name: Some("bill".to_string()),
            ..Default::default()
        },
        &ApplyOptions::default(),
    )
    .unwrap();

    let expected = r#"class Customer:
    def bill(self, amount):
        return amount * 2


class Billing:
    def run(self, customer):
        return customer.bill(10)
"#;
    assert_eq!(fs::read_to_string(&path).unwrap(), expected);
}

#[test]
fn test_hide_method() {
    let dir = tempfile::tempdir().unwrap();
    let source = r#"class Report:
    def format_row(self, row):
        return str(row)

    def render(self, rows):
        return [self.format_row(r) for r in rows]
"#;
    let path = write_fixture(&dir, "report.py", source);

    let address = format!("{}::Report::format_row", path.display());
    apply(
        "hide-method",
        &address,
        &RecipeParams::default(),
        &ApplyOptions::default(),
    )
    .unwrap();

    let refactored = fs::read_to_string(&path).unwrap();
    assert!(refactored.contains("def _format_row(self, row):"));
    assert!(refactored.contains("self._format_row(r)"));
    assert!(!refactored.contains("def format_row"));
}

#[test]
fn test_add_parameter_with_default() {
    let dir = tempfile::tempdir().unwrap();
    let source = r#"class Customer:
    def charge(self, amount):
        return amount
"#;
    let path = write_fixture(&dir, "customer.py", source);

    let address = format!("{}::Customer::charge", path.display());
    apply(
        "add-parameter",
        &address,
        &RecipeParams {
            name: Some("tax".to_string()),
            default: Some("0".to_string()),
            ..Default::default()
        },
        &ApplyOptions::default(),
    )
    .unwrap();

    let refactored = fs::read_to_string(&path).unwrap();
    assert!(refactored.contains("def charge(self, amount, tax=0):"));
}

#[test]
fn test_remove_parameter_rewrites_call_sites() {
    let dir = tempfile::tempdir().unwrap();
    let source = r#"class Printer:
    def emit(self, text, flush):
        print(text)


def run(p):
    p.emit("hi", True)
    p.emit("bye", flush=False)
"#;
    let path = write_fixture(&dir, "printer.py", source);

    let address = format!("{}::Printer::emit", path.display());
    apply(
        "remove-parameter",
        &address,
        &RecipeParams {
            name: Some("flush".to_string()),
            ..Default::default()
        },
        &ApplyOptions::default(),
    )
    .unwrap();

    let expected = r#"class Printer:
    def emit(self, text):
        print(text)


def run(p):
    p.emit("hi")
    p.emit("bye")
"#;
    assert_eq!(fs::read_to_string(&path).unwrap(), expected);
}

#[test]
fn test_move_method_leaves_delegating_wrapper() {
    let dir = tempfile::tempdir().unwrap();
    let source = r#"class Account:
    def __init__(self):
        self.account_type = AccountType()
        self.days_overdrawn = 3

    def overdraft_charge(self, days):
        return self.account_type.premium_rate * days


class AccountType:
    def __init__(self):
        self.premium_rate = 2
"#;
    let path = write_fixture(&dir, "account.py", source);

    let address = format!("{}::Account::overdraft_charge", path.display());
    apply(
        "move-method",
        &address,
        &RecipeParams {
            to: Some("AccountType".to_string()),
            ..Default::default()
        },
        &ApplyOptions::default(),
    )
    .unwrap();

    let expected = r#"class Account:
    def __init__(self):
        self.account_type = AccountType()
        self.days_overdrawn = 3

    def overdraft_charge(self, days):
        return self.account_type.overdraft_charge(days)


class AccountType:
    def __init__(self):
        self.premium_rate = 2

    def overdraft_charge(self, days):
        return self.premium_rate * days
"#;
    assert_eq!(fs::read_to_string(&path).unwrap(), expected);
}

#[test]
fn test_hide_delegate_copies_delegate_signature() {
    let dir = tempfile::tempdir().unwrap();
    let source = r#"class Department:
    def __init__(self, manager):
        self.manager_name = manager

    def manager(self):
        return self.manager_name


class Person:
    def __init__(self):
        self.department = Department("alice")
"#;
    let path = write_fixture(&dir, "person.py", source);

    let address = format!("{}::Person", path.display());
    apply(
        "hide-delegate",
        &address,
        &RecipeParams {
            name: Some("manager".to_string()),
            field: Some("department".to_string()),
            ..Default::default()
        },
        &ApplyOptions::default(),
    )
    .unwrap();

    let refactored = fs::read_to_string(&path).unwrap();
    assert!(refactored.contains("    def manager(self):\n        return self.department.manager()"));
}

#[test]
fn test_encapsulate_field() {
    let dir = tempfile::tempdir().unwrap();
    let source = r#"class Person:
    def __init__(self, name):
        self.name = name

    def greet(self):
        return "hi " + self.name
"#;
    let path = write_fixture(&dir, "person.py", source);

    let address = format!("{}::Person::name", path.display());
    apply(
        "encapsulate-field",
        &address,
        &RecipeParams::default(),
        &ApplyOptions::default(),
    )
    .unwrap();

    let expected = r#"class Person:
    def __init__(self, name):
        self._name = name

    def greet(self):
        return "hi " + self._name

    @property
    def name(self):
        return self._name

    @name.setter
    def name(self, value):
        self._name = value
"#;
    assert_eq!(fs::read_to_string(&path).unwrap(), expected);
}

#[test]
fn test_self_encapsulate_field_keeps_internal_reads_public() {
    let dir = tempfile::tempdir().unwrap();
    let source = r#"class Person:
    def __init__(self, name):
        self.name = name

    def greet(self):
        return "hi " + self.name
"#;
    let path = write_fixture(&dir, "person.py", source);

    let address = format!("{}::Person::name", path.display());
    apply(
        "self-encapsulate-field",
        &address,
        &RecipeParams::default(),
        &ApplyOptions::default(),
    )
    .unwrap();

    let refactored = fs::read_to_string(&path).unwrap();
    // Backing store is private, the read in greet still goes through the
    // property.
    assert!(refactored.contains("self._name = name"));
    assert!(refactored.contains("return \"hi \" + self.name"));
    assert!(refactored.contains("@property"));
}

#[test]
fn test_replace_magic_number() {
    let dir = tempfile::tempdir().unwrap();
    let source = r#"def convert(m):
    return m * 1.61


def back(km):
    return km / 1.61
"#;
    let path = write_fixture(&dir, "convert.py", source);

    let address = format!("{}", path.display());
    apply(
        "replace-magic-number-with-symbolic-constant",
        &address,
        &RecipeParams {
            name: Some("KM_PER_MILE".to_string()),
            value: Some("1.61".to_string()),
            ..Default::default()
        },
        &ApplyOptions::default(),
    )
    .unwrap();

    let expected = r#"KM_PER_MILE = 1.61

def convert(m):
    return m * KM_PER_MILE


def back(km):
    return km / KM_PER_MILE
"#;
    assert_eq!(fs::read_to_string(&path).unwrap(), expected);
}

#[test]
fn test_move_field() {
    let dir = tempfile::tempdir().unwrap();
    let source = r#"class Account:
    def __init__(self):
        self.account_type = AccountType()
        self.interest_rate = 4

    def interest(self, amount):
        return amount * self.interest_rate


class AccountType:
    def __init__(self):
        self.label = "basic"
"#;
    let path = write_fixture(&dir, "account.py", source);

    let address = format!("{}::Account::interest_rate", path.display());
    apply(
        "move-field",
        &address,
        &RecipeParams {
            to: Some("AccountType".to_string()),
            ..Default::default()
        },
        &ApplyOptions::default(),
    )
    .unwrap();

    let expected = r#"class Account:
    def __init__(self):
        self.account_type = AccountType()

    def interest(self, amount):
        return amount * self.account_type.interest_rate


class AccountType:
    def __init__(self):
        self.label = "basic"
        self.interest_rate = 4
"#;
    assert_eq!(fs::read_to_string(&path).unwrap(), expected);
}

#[test]
fn test_decompose_conditional() {
    let dir = tempfile::tempdir().unwrap();
    let source = r#"class HeatingPlan:
    def charge(self, date, quantity):
        if date.month < 3 or date.month > 10:
            total = quantity * self.winter_rate
        else:
            total = quantity * self.summer_rate
        return total
"#;
    let path = write_fixture(&dir, "plan.py", source);

    let address = format!("{}::HeatingPlan::charge#L3", path.display());
    apply(
        "decompose-conditional",
        &address,
        &RecipeParams {
            name: Some("is_off_season".to_string()),
            ..Default::default()
        },
        &ApplyOptions::default(),
    )
    .unwrap();

    let refactored = fs::read_to_string(&path).unwrap();
    assert!(refactored.contains("if self.is_off_season(date):"));
    assert!(refactored.contains("    def is_off_season(self, date):\n        return date.month < 3 or date.month > 10"));
}
