//! Stencil pretty printer
//!
//! Renders a compiled stencil as an indented tree, one line per slot, which
//! is the quickest way to see which capture group feeds which field.
//!
//! ```text
//! DotExpr @0
//!   _ separator
//!   head @1 Text
//!   tail @2
//!     DotName @3
//!       dot @4 Text
//!       name @5 Text
//! ```

use std::fmt::Write;

use crate::stencil::{FieldStencil, Stencil, StructStencil, UnionStencil};

/// Stencil pretty printer
pub struct StencilPrinter {
    /// Indentation string
    indent: String,
    /// Maximum depth to print
    max_depth: Option<usize>,
}

impl StencilPrinter {
    /// Create a new stencil printer
    pub fn new() -> Self {
        Self {
            indent: "  ".to_string(),
            max_depth: None,
        }
    }

    /// Set the indentation string
    pub fn indent(mut self, indent: &str) -> Self {
        self.indent = indent.to_string();
        self
    }

    /// Set the maximum depth to print
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Print a struct stencil
    pub fn print(&self, stencil: &StructStencil) -> String {
        let mut output = String::new();
        self.print_struct(stencil, 0, &mut output);
        output
    }

    fn truncated(&self, depth: usize, output: &mut String) -> bool {
        match self.max_depth {
            Some(max) if depth > max => {
                let _ = writeln!(output, "{}...", self.indent.repeat(depth));
                true
            }
            _ => false,
        }
    }

    fn print_struct(&self, stencil: &StructStencil, depth: usize, output: &mut String) {
        if self.truncated(depth, output) {
            return;
        }
        let indent = self.indent.repeat(depth);
        let _ = writeln!(output, "{}{} @{}", indent, stencil.name(), stencil.slot());
        for field in stencil.fields() {
            self.print_field(field, depth + 1, output);
        }
    }

    fn print_field(&self, field: &FieldStencil, depth: usize, output: &mut String) {
        if self.truncated(depth, output) {
            return;
        }
        let indent = self.indent.repeat(depth);

        let Some(slot) = field.slot() else {
            let _ = writeln!(output, "{}{} separator", indent, field.name());
            return;
        };

        match field.child() {
            None if field.is_position() => {
                let _ = writeln!(output, "{}{} @{} Pos", indent, field.name(), slot);
            }
            None => {
                let repr = field
                    .repr()
                    .map(|r| format!(" {:?}", r))
                    .unwrap_or_default();
                let _ = writeln!(output, "{}{} @{}{}", indent, field.name(), slot, repr);
            }
            Some(Stencil::Struct(child)) => {
                let _ = writeln!(output, "{}{} @{}", indent, field.name(), slot);
                self.print_struct(child, depth + 1, output);
            }
            Some(Stencil::Union(union)) => {
                let _ = writeln!(
                    output,
                    "{}{} @{} union {}",
                    indent,
                    field.name(),
                    slot,
                    union.capability()
                );
                self.print_union(union, depth + 1, output);
            }
        }
    }

    fn print_union(&self, union: &UnionStencil, depth: usize, output: &mut String) {
        for variant in union.variants() {
            self.print_struct(variant.stencil(), depth, output);
        }
    }
}

impl Default for StencilPrinter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Compiler;
    use crate::schema::{Descriptor, Schema, SchemaBuilder};
    use crate::submatch::Pos;

    #[derive(Default)]
    struct DotName {
        dot: String,
        name: String,
    }

    impl Schema for DotName {
        fn descriptor() -> Descriptor {
            SchemaBuilder::<Self>::new("DotName")
                .scalar("dot", r"\.", |v| &mut v.dot)
                .scalar("name", r"\w+", |v| &mut v.name)
                .build()
        }
    }

    #[derive(Default)]
    struct DotExpr {
        at: Pos,
        head: String,
        tail: Option<DotName>,
    }

    impl Schema for DotExpr {
        fn descriptor() -> Descriptor {
            SchemaBuilder::<Self>::new("DotExpr")
                .separator("^")
                .pos("at", |v| &mut v.at)
                .scalar("head", r"\w+", |v| &mut v.head)
                .optional("tail", "?", |v| &mut v.tail)
                .build()
        }
    }

    #[test]
    fn test_stencil_printer() {
        let (stencil, _) = Compiler::new().compile(&DotExpr::descriptor()).unwrap();
        let printed = StencilPrinter::new().print(&stencil);
        let expected = "\
DotExpr @0
  _ separator
  at @1 Pos
  head @2 Text
  tail @3
    DotName @4
      dot @5 Text
      name @6 Text
";
        assert_eq!(printed, expected);
        assert_eq!(stencil.to_string(), expected);
    }

    #[test]
    fn test_stencil_printer_max_depth() {
        let (stencil, _) = Compiler::new().compile(&DotExpr::descriptor()).unwrap();
        let printed = StencilPrinter::new().indent("\t").max_depth(1).print(&stencil);
        assert!(printed.contains("\ttail @3\n\t\t...\n"));
        assert!(!printed.contains("DotName"));
    }
}
