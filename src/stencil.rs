//! Stencils
//!
//! A stencil mirrors a schema after compilation: every captured field knows
//! its slot, and every nested or polymorphic field carries the stencil of its
//! child. Stencils hold no per-match state and are shared freely between
//! matches and threads.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use crate::schema::{Access, Holder, UnionHolder};
use crate::submatch::Submatch;
use crate::union::VariantEntry;

/// Destination representation of a scalar field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Repr {
    /// `String`
    Text,
    /// `Vec<u8>`
    Bytes,
    /// [`Submatch`]
    Submatch,
    /// `Option<String>`
    OptionalText,
    /// `Option<Vec<u8>>`
    OptionalBytes,
    /// `Option<Submatch>`
    OptionalSubmatch,
    /// `()`: the match is required but nothing is stored
    Ignore,
}

impl Repr {
    /// The representation of a destination type, if supported
    pub fn of(type_id: TypeId) -> Option<Repr> {
        let table = [
            (TypeId::of::<String>(), Repr::Text),
            (TypeId::of::<Vec<u8>>(), Repr::Bytes),
            (TypeId::of::<Submatch>(), Repr::Submatch),
            (TypeId::of::<Option<String>>(), Repr::OptionalText),
            (TypeId::of::<Option<Vec<u8>>>(), Repr::OptionalBytes),
            (TypeId::of::<Option<Submatch>>(), Repr::OptionalSubmatch),
            (TypeId::of::<()>(), Repr::Ignore),
        ];
        table
            .iter()
            .find(|(id, _)| *id == type_id)
            .map(|(_, repr)| *repr)
    }
}

/// Borrowed view of a child stencil
#[derive(Debug, Clone, Copy)]
pub enum Stencil<'a> {
    /// A nested composite
    Struct(&'a StructStencil),
    /// A polymorphic slot
    Union(&'a UnionStencil),
}

/// Compiled layout of one composite type
#[derive(Clone)]
pub struct StructStencil {
    pub(crate) name: &'static str,
    pub(crate) slot: usize,
    pub(crate) fields: Vec<FieldStencil>,
}

impl StructStencil {
    /// Schema name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Envelope slot
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Field stencils in declaration order
    pub fn fields(&self) -> &[FieldStencil] {
        &self.fields
    }

    /// Every allocated slot with a dotted destination path, in slot order
    ///
    /// The envelope of the stencil itself is listed under its schema name.
    pub fn slots(&self) -> Vec<(String, usize)> {
        let mut out = Vec::new();
        self.collect_slots(self.name.to_string(), &mut out);
        out
    }

    /// Number of slots allocated beneath and including this stencil
    pub fn slot_count(&self) -> usize {
        self.slots().len()
    }

    fn collect_slots(&self, path: String, out: &mut Vec<(String, usize)>) {
        out.push((path.clone(), self.slot));
        for field in &self.fields {
            let field_path = format!("{}.{}", path, field.name);
            if let Some(slot) = field.slot {
                out.push((field_path.clone(), slot));
            }
            match &field.kind {
                FieldKind::Nested { child, .. } => child.collect_slots(field_path, out),
                FieldKind::Union { child, .. } => {
                    for variant in &child.variants {
                        let variant_path = format!("{}.{}", field_path, variant.stencil.name);
                        variant.stencil.collect_slots(variant_path, out);
                    }
                }
                _ => {}
            }
        }
    }
}

impl PartialEq for StructStencil {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.slot == other.slot && self.fields == other.fields
    }
}

impl fmt::Debug for StructStencil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructStencil")
            .field("name", &self.name)
            .field("slot", &self.slot)
            .field("fields", &self.fields)
            .finish()
    }
}

impl fmt::Display for StructStencil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::debug::StencilPrinter::new().print(self))
    }
}

/// Compiled layout of one field
#[derive(Clone)]
pub struct FieldStencil {
    pub(crate) name: &'static str,
    pub(crate) slot: Option<usize>,
    pub(crate) kind: FieldKind,
}

impl FieldStencil {
    /// Field name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Capture slot, `None` for hidden separators
    pub fn slot(&self) -> Option<usize> {
        self.slot
    }

    /// Scalar representation, for scalar fields
    pub fn repr(&self) -> Option<Repr> {
        match &self.kind {
            FieldKind::Scalar { repr, .. } => Some(*repr),
            _ => None,
        }
    }

    /// Whether the field records a position
    pub fn is_position(&self) -> bool {
        matches!(self.kind, FieldKind::Position { .. })
    }

    /// Child stencil of a nested or polymorphic field
    pub fn child(&self) -> Option<Stencil<'_>> {
        match &self.kind {
            FieldKind::Nested { child, .. } => Some(Stencil::Struct(child)),
            FieldKind::Union { child, .. } => Some(Stencil::Union(child)),
            _ => None,
        }
    }
}

impl PartialEq for FieldStencil {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.slot == other.slot && self.kind == other.kind
    }
}

impl fmt::Debug for FieldStencil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldStencil")
            .field("name", &self.name)
            .field("slot", &self.slot)
            .field("kind", &self.kind)
            .finish()
    }
}

/// What a field stencil writes to, with the accessors it needs
#[derive(Clone)]
pub(crate) enum FieldKind {
    Separator,
    Scalar {
        access: Arc<dyn Access>,
        repr: Repr,
        type_name: &'static str,
    },
    Position {
        access: Arc<dyn Access>,
    },
    Nested {
        access: Arc<dyn Access>,
        holder: Arc<dyn Holder>,
        child: StructStencil,
    },
    Union {
        access: Arc<dyn Access>,
        holder: Arc<dyn UnionHolder>,
        child: UnionStencil,
    },
}

impl PartialEq for FieldKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldKind::Separator, FieldKind::Separator) => true,
            (FieldKind::Scalar { repr: a, .. }, FieldKind::Scalar { repr: b, .. }) => a == b,
            (FieldKind::Position { .. }, FieldKind::Position { .. }) => true,
            (FieldKind::Nested { child: a, .. }, FieldKind::Nested { child: b, .. }) => a == b,
            (FieldKind::Union { child: a, .. }, FieldKind::Union { child: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Separator => f.write_str("Separator"),
            FieldKind::Scalar { repr, .. } => f.debug_tuple("Scalar").field(repr).finish(),
            FieldKind::Position { .. } => f.write_str("Position"),
            FieldKind::Nested { child, .. } => f.debug_tuple("Nested").field(child).finish(),
            FieldKind::Union { child, .. } => f.debug_tuple("Union").field(child).finish(),
        }
    }
}

/// Compiled layout of a polymorphic slot
#[derive(Clone)]
pub struct UnionStencil {
    pub(crate) capability: &'static str,
    pub(crate) variants: Vec<VariantStencil>,
}

impl UnionStencil {
    /// Capability name
    pub fn capability(&self) -> &'static str {
        self.capability
    }

    /// Variants in registration order
    pub fn variants(&self) -> &[VariantStencil] {
        &self.variants
    }
}

impl PartialEq for UnionStencil {
    fn eq(&self, other: &Self) -> bool {
        self.capability == other.capability && self.variants == other.variants
    }
}

impl fmt::Debug for UnionStencil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnionStencil")
            .field("capability", &self.capability)
            .field("variants", &self.variants)
            .finish()
    }
}

/// One variant of a [`UnionStencil`]
#[derive(Clone)]
pub struct VariantStencil {
    pub(crate) entry: Arc<VariantEntry>,
    pub(crate) stencil: StructStencil,
}

impl VariantStencil {
    /// Struct stencil of the variant's schema
    pub fn stencil(&self) -> &StructStencil {
        &self.stencil
    }

    /// Full Rust name of the variant's schema type
    pub fn type_name(&self) -> &'static str {
        self.entry.name()
    }
}

impl PartialEq for VariantStencil {
    fn eq(&self, other: &Self) -> bool {
        self.entry.type_id() == other.entry.type_id() && self.stencil == other.stencil
    }
}

impl fmt::Debug for VariantStencil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantStencil")
            .field("type_name", &self.entry.name())
            .field("stencil", &self.stencil)
            .finish()
    }
}
