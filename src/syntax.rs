//! Pattern AST and fragment utilities
//!
//! The compiler's output is an [`Expr`] tree built from five node kinds.
//! Rendering an `Expr` produces pattern text for the execution engine, in
//! which every [`Expr::Capture`] becomes exactly one group, numbered in
//! pre-order. Slot 0 is the engine's implicit whole-match group, so a
//! capture with slot 0 renders without parentheses.
//!
//! Fragments are parsed with the engine's own syntax tree
//! ([`regex_syntax::ast`]); [`transform`] rewrites that tree in place and
//! [`strip_captures`] uses it to turn any group a fragment declares into a
//! plain non-capturing group.

use regex_syntax::ast::{print::Printer, Ast, Flags, GroupKind};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::options::Options;

/// A node of the composed pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expr {
    /// Opaque pattern text in engine syntax, free of capturing groups
    Fragment(String),

    /// Children matched one after another
    Concat(Vec<Expr>),

    /// A numbered capture around a child
    Capture {
        /// Capture slot, equal to the engine's group index
        slot: usize,
        /// Field or schema name, informational only
        name: String,
        /// The captured expression
        expr: Box<Expr>,
    },

    /// The child may be absent (`?`)
    Optional(Box<Expr>),

    /// The first child that matches wins
    Alternation(Vec<Expr>),
}

impl Expr {
    /// The empty match
    pub fn empty() -> Self {
        Expr::Concat(Vec::new())
    }

    /// A fragment node
    pub fn fragment(text: impl Into<String>) -> Self {
        Expr::Fragment(text.into())
    }

    /// Wrap `expr` in a capture with the given slot
    pub fn capture(slot: usize, name: impl Into<String>, expr: Expr) -> Self {
        Expr::Capture {
            slot,
            name: name.into(),
            expr: Box::new(expr),
        }
    }

    /// Make `expr` optional
    pub fn optional(expr: Expr) -> Self {
        Expr::Optional(Box::new(expr))
    }

    /// Direct children of this node
    pub fn children(&self) -> &[Expr] {
        match self {
            Expr::Fragment(_) => &[],
            Expr::Concat(exprs) | Expr::Alternation(exprs) => exprs,
            Expr::Capture { expr, .. } | Expr::Optional(expr) => std::slice::from_ref(&**expr),
        }
    }

    /// Visit every node in pre-order
    pub fn walk<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(&'a Expr),
    {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }

    /// All captures as `(slot, name)` pairs, in pre-order
    pub fn captures(&self) -> Vec<(usize, &str)> {
        let mut out = Vec::new();
        self.walk(&mut |node| {
            if let Expr::Capture { slot, name, .. } = node {
                out.push((*slot, name.as_str()));
            }
        });
        out
    }

    /// Number of capture nodes in the tree
    pub fn capture_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |node| {
            if matches!(node, Expr::Capture { .. }) {
                count += 1;
            }
        });
        count
    }

    /// Render the tree as engine pattern text
    pub fn render(&self) -> String {
        self.render_with(false)
    }

    /// Render the tree for an engine running with greed swapped (`U` flag)
    ///
    /// The flag applies to the whole pattern, but only fragments should be
    /// affected by it. With `swap_greed` set, structural optionals render as
    /// `??`, which the engine then reads as greedy.
    pub fn render_with(&self, swap_greed: bool) -> String {
        let mut out = String::new();
        self.render_into(&mut out, swap_greed);
        out
    }

    fn render_into(&self, out: &mut String, swap_greed: bool) {
        match self {
            Expr::Fragment(text) => {
                if !text.is_empty() {
                    out.push_str("(?:");
                    out.push_str(text);
                    out.push(')');
                }
            }
            Expr::Concat(exprs) => {
                for expr in exprs {
                    expr.render_into(out, swap_greed);
                }
            }
            Expr::Capture { slot: 0, expr, .. } => expr.render_into(out, swap_greed),
            Expr::Capture { expr, .. } => {
                out.push('(');
                expr.render_into(out, swap_greed);
                out.push(')');
            }
            Expr::Optional(expr) => {
                out.push_str("(?:");
                expr.render_into(out, swap_greed);
                out.push_str(if swap_greed { ")??" } else { ")?" });
            }
            Expr::Alternation(exprs) => {
                out.push_str("(?:");
                for (i, expr) in exprs.iter().enumerate() {
                    if i > 0 {
                        out.push('|');
                    }
                    expr.render_into(out, swap_greed);
                }
                out.push(')');
            }
        }
    }

    /// Serialize the tree to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize a tree from JSON
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Apply `f` to every node of `ast`, children before their parent
pub fn transform<F>(ast: &mut Ast, f: &mut F)
where
    F: FnMut(&mut Ast),
{
    match ast {
        Ast::Group(group) => transform(&mut group.ast, f),
        Ast::Repetition(rep) => transform(&mut rep.ast, f),
        Ast::Alternation(alt) => {
            for child in alt.asts.iter_mut() {
                transform(child, f);
            }
        }
        Ast::Concat(concat) => {
            for child in concat.asts.iter_mut() {
                transform(child, f);
            }
        }
        _ => {}
    }
    f(ast);
}

/// Rewrite every capturing group in `ast` as a non-capturing group
pub fn strip_captures(ast: &mut Ast) {
    transform(ast, &mut |node| {
        if let Ast::Group(group) = node {
            if matches!(
                group.kind,
                GroupKind::CaptureIndex(_) | GroupKind::CaptureName { .. }
            ) {
                let span = group.span;
                group.kind = GroupKind::NonCapturing(Flags {
                    span,
                    items: Vec::new(),
                });
            }
        }
    });
}

/// Parse a fragment, strip its captures and return the normalized text
///
/// The normalized text is also run through the engine's translator so that
/// errors it would only report later (unknown Unicode classes, invalid
/// ranges) are attributed to the fragment. On failure the parser's message
/// is returned.
pub fn normalize_fragment(pattern: &str, options: &Options) -> Result<String, String> {
    let mut ast = options
        .ast_parser()
        .parse(pattern)
        .map_err(|e| e.kind().to_string())?;

    strip_captures(&mut ast);

    let mut text = String::new();
    Printer::new()
        .print(&ast, &mut text)
        .map_err(|e| e.to_string())?;

    options
        .hir_parser()
        .parse(&text)
        .map_err(|e| syntax_message(&e))?;

    Ok(text)
}

fn syntax_message(err: &regex_syntax::Error) -> String {
    match err {
        regex_syntax::Error::Parse(e) => e.kind().to_string(),
        regex_syntax::Error::Translate(e) => e.kind().to_string(),
        other => other.to_string(),
    }
}
