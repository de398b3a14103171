//! # Source Tree
//!
//! Owns one parsed Python file for the duration of a single refactoring
//! invocation: the raw source text, the concrete syntax tree, and the line
//! offset table used to convert between the 1-based line numbers of the
//! addressing scheme and byte offsets.
//!
//! Round-trip fidelity is structural: transformations splice byte ranges of
//! the original text, so every untouched byte survives unchanged and an
//! empty edit plan reproduces the input exactly.

use ast_grep_core::tree_sitter::StrDoc;
use ast_grep_core::{AstGrep, Node};
use ast_grep_language::SupportLang as Language;

use crate::errors::{RefactorError, Result};
use crate::kinds;

/// A node of the parsed Python tree, borrowing from the owning [`SourceTree`].
pub type PyNode<'t> = Node<'t, StrDoc<Language>>;

/// One parsed source file.
pub struct SourceTree {
    source: String,
    ast: AstGrep<StrDoc<Language>>,
    /// Byte offset of the start of each 1-based line
    line_offsets: Vec<usize>,
}

impl SourceTree {
    /// Parse Python source. Fails with [`RefactorError::Parse`] if the
    /// grammar reports an error anywhere in the tree.
    pub fn parse(source: &str) -> Result<Self> {
        let ast = AstGrep::new(source, Language::Python);

        if let Some((line, column)) = first_error_position(&ast.root()) {
            return Err(RefactorError::Parse {
                line,
                column,
                message: "invalid syntax".to_string(),
            });
        }

        let mut line_offsets = vec![0usize];
        for (idx, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_offsets.push(idx + 1);
            }
        }

        Ok(Self {
            source: source.to_string(),
            ast,
            line_offsets,
        })
    }

    pub fn root(&self) -> PyNode<'_> {
        self.ast.root()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn line_count(&self) -> u32 {
        self.line_offsets.len() as u32
    }

    /// First line of a node, 1-based.
    pub fn first_line(&self, node: &PyNode<'_>) -> u32 {
        node.start_pos().line() as u32 + 1
    }

    /// Last line of a node, 1-based, inclusive.
    pub fn last_line(&self, node: &PyNode<'_>) -> u32 {
        node.end_pos().line() as u32 + 1
    }

    /// Byte offset of the start of a 1-based line. Offsets past the last
    /// line clamp to the end of the source.
    pub fn line_start_offset(&self, line: u32) -> usize {
        self.line_offsets
            .get(line.saturating_sub(1) as usize)
            .copied()
            .unwrap_or(self.source.len())
    }

    /// The leading whitespace of the line a node starts on.
    pub fn node_indent(&self, node: &PyNode<'_>) -> &str {
        let line_start = self.line_start_offset(self.first_line(node));
        let rest = &self.source[line_start..];
        let end = rest
            .find(|c: char| c != ' ' && c != '\t')
            .unwrap_or(rest.len());
        &rest[..end]
    }

    /// Detect the file's indent unit from the first indented line; falls
    /// back to four spaces for flat files.
    pub fn indent_unit(&self) -> String {
        for window in self.line_offsets.windows(2) {
            let line = &self.source[window[0]..window[1]];
            let indent_len = line
                .find(|c: char| c != ' ' && c != '\t')
                .unwrap_or(line.len());
            if indent_len > 0 && !line[indent_len..].trim_start().is_empty() {
                return line[..indent_len].to_string();
            }
        }
        "    ".to_string()
    }

    /// The raw text block covering the given nodes, from the start of the
    /// first node's line through the end of the last node, without the
    /// trailing newline.
    pub fn lines_of_span(&self, first: &PyNode<'_>, last: &PyNode<'_>) -> &str {
        let start = self.line_start_offset(self.first_line(first));
        let end = last.range().end;
        &self.source[start..end]
    }
}

fn first_error_position(node: &PyNode<'_>) -> Option<(u32, u32)> {
    if node.kind() == kinds::ERROR {
        let pos = node.start_pos();
        return Some((pos.line() as u32 + 1, pos.column(node) as u32 + 1));
    }
    for child in node.children() {
        if let Some(found) = first_error_position(&child) {
            return Some(found);
        }
    }
    None
}
