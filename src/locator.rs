//! # Target Locator
//!
//! Parses addressing strings like `file.py::Class::method#L10-L15` into a
//! structured [`TargetReference`]. Pure function of its input; the file is
//! not touched here.
//!
//! Grammar:
//!
//! ```text
//! <file_path>[::<class>[::<method>[::<symbol>]]][#L<start>[-L<end>]]
//! ```

use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;

use crate::errors::{RefactorError, Result};

/// A structured refactoring target address.
///
/// Constructed once per invocation from the raw addressing string, immutable
/// afterwards, and consumed by the tree navigator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetReference {
    pub file_path: PathBuf,
    pub class_name: Option<String>,
    pub method_name: Option<String>,
    pub symbol_name: Option<String>,
    /// 1-based, inclusive
    pub line_start: Option<u32>,
    /// 1-based, inclusive; always >= `line_start` when set
    pub line_end: Option<u32>,
}

impl TargetReference {
    /// Parse a raw addressing string.
    ///
    /// A single line suffix `#L10` sets both ends of the span to 10; a range
    /// `#L10-L15` sets them independently.
    pub fn parse(raw: &str) -> Result<Self> {
        // Isolate the optional line-range suffix first so `#` never collides
        // with path or name segments.
        let (path_part, line_suffix) = match raw.split_once('#') {
            Some((head, tail)) => (head, Some(tail)),
            None => (raw, None),
        };

        let (line_start, line_end) = match line_suffix {
            Some(suffix) => parse_line_suffix(suffix)?,
            None => (None, None),
        };

        let segments: Vec<&str> = path_part.split("::").collect();
        if segments.len() > 4 {
            return Err(RefactorError::Addressing(format!(
                "too many path segments in '{raw}'"
            )));
        }
        if segments[0].is_empty() {
            return Err(RefactorError::Addressing(format!(
                "missing file path in '{raw}'"
            )));
        }

        let named = |idx: usize| -> Option<String> {
            segments
                .get(idx)
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
        };

        // Segments are positional: file, class, method, symbol. A target like
        // `file.py::calculate` addresses a module-level function, which the
        // navigator resolves when the class lookup comes up empty.
        let reference = TargetReference {
            file_path: PathBuf::from(segments[0]),
            class_name: named(1),
            method_name: named(2),
            symbol_name: named(3),
            line_start,
            line_end,
        };

        if reference.symbol_name.is_some() && reference.method_name.is_none() {
            return Err(RefactorError::Addressing(format!(
                "symbol segment requires a method segment in '{raw}'"
            )));
        }

        Ok(reference)
    }

    pub fn has_line_span(&self) -> bool {
        self.line_start.is_some()
    }
}

fn line_suffix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^L(\d+)(?:-L(\d+))?$").unwrap())
}

fn parse_line_suffix(suffix: &str) -> Result<(Option<u32>, Option<u32>)> {
    let captures = line_suffix_regex().captures(suffix).ok_or_else(|| {
        RefactorError::Addressing(format!("invalid line range '#{suffix}'"))
    })?;

    let start: u32 = captures[1]
        .parse()
        .map_err(|_| RefactorError::Addressing(format!("invalid line range '#{suffix}'")))?;
    let end: u32 = match captures.get(2) {
        Some(m) => m
            .as_str()
            .parse()
            .map_err(|_| RefactorError::Addressing(format!("invalid line range '#{suffix}'")))?,
        None => start,
    };

    if start == 0 || end < start {
        return Err(RefactorError::Addressing(format!(
            "invalid line range '#{suffix}'"
        )));
    }

    Ok((Some(start), Some(end)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_only() {
        let r = TargetReference::parse("src/order.py").unwrap();
        assert_eq!(r.file_path, PathBuf::from("src/order.py"));
        assert!(r.class_name.is_none());
        assert!(r.method_name.is_none());
        assert!(!r.has_line_span());
    }

    #[test]
    fn test_full_address() {
        let r = TargetReference::parse("order.py::Order::print_owing::amount#L10-L15").unwrap();
        assert_eq!(r.class_name.as_deref(), Some("Order"));
        assert_eq!(r.method_name.as_deref(), Some("print_owing"));
        assert_eq!(r.symbol_name.as_deref(), Some("amount"));
        assert_eq!(r.line_start, Some(10));
        assert_eq!(r.line_end, Some(15));
    }

    #[test]
    fn test_single_line_sets_both_ends() {
        let r = TargetReference::parse("order.py::Order::print_owing#L10").unwrap();
        assert_eq!(r.line_start, Some(10));
        assert_eq!(r.line_end, Some(10));
    }

    #[test]
    fn test_parsing_is_deterministic() {
        let a = TargetReference::parse("order.py::Order::print_owing#L6-L8").unwrap();
        let b = TargetReference::parse("order.py::Order::print_owing#L6-L8").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = TargetReference::parse("file.py::Class::method#L5-L3").unwrap_err();
        assert!(matches!(err, RefactorError::Addressing(_)));
        assert!(err.to_string().contains("invalid line range"));
    }

    #[test]
    fn test_non_numeric_range_rejected() {
        let err = TargetReference::parse("file.py::Class::method#Lten").unwrap_err();
        assert!(matches!(err, RefactorError::Addressing(_)));
    }

    #[test]
    fn test_zero_line_rejected() {
        let err = TargetReference::parse("file.py#L0").unwrap_err();
        assert!(matches!(err, RefactorError::Addressing(_)));
    }

    #[test]
    fn test_too_many_segments() {
        let err = TargetReference::parse("a.py::B::c::d::e").unwrap_err();
        assert!(err.to_string().contains("too many path segments"));
    }

    #[test]
    fn test_missing_file_path() {
        let err = TargetReference::parse("::Order::total").unwrap_err();
        assert!(err.to_string().contains("missing file path"));
    }

    #[test]
    fn test_symbol_requires_method() {
        // Four segments with an empty method slot cannot address a symbol.
        let err = TargetReference::parse("a.py::Order::::temp").unwrap_err();
        assert!(matches!(err, RefactorError::Addressing(_)));
    }

    #[test]
    fn test_module_level_function() {
        let r = TargetReference::parse("calc.py::compute_total#L3-L4").unwrap();
        // Second segment is positionally a class name; the navigator falls
        // back to module-level function lookup when no class matches.
        assert_eq!(r.class_name.as_deref(), Some("compute_total"));
        assert_eq!(r.line_start, Some(3));
    }
}
