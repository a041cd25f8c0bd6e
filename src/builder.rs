//! Schema compiler
//!
//! Lowers a [`Descriptor`] into a [`StructStencil`] and an [`Expr`] in one
//! structural recursion. Capture slots are handed out in pre-order: a
//! composite's envelope before its fields, a nested or polymorphic field's own
//! capture before the child it wraps. Because the rendered pattern opens its
//! groups in the same order, slot `i` is the engine's group `i`.

use std::any::TypeId;
use std::sync::Arc;

use crate::error::CompileError;
use crate::options::Options;
use crate::schema::{Binding, Cardinality, Descriptor, FieldDescriptor, Role, Visibility};
use crate::stencil::{FieldKind, FieldStencil, Repr, StructStencil, UnionStencil, VariantStencil};
use crate::syntax::{normalize_fragment, Expr};
use crate::union::{read_global, UnionEntry, UnionRegistry};

/// Where polymorphic fields look up their variants
#[derive(Clone, Copy)]
enum Unions<'r> {
    Global,
    Local(&'r UnionRegistry),
}

impl Unions<'_> {
    fn get(&self, capability: TypeId) -> Option<Arc<UnionEntry>> {
        match self {
            // The guard is released before any variant is compiled, so a
            // descriptor may itself touch the registry.
            Unions::Global => read_global().get(capability),
            Unions::Local(registry) => registry.get(capability),
        }
    }
}

/// Output of a full compilation
pub(crate) struct Compiled {
    pub(crate) stencil: StructStencil,
    pub(crate) expr: Expr,
    pub(crate) regex: regex::Regex,
}

/// Lowers descriptors into stencils and pattern trees
///
/// # Example
///
/// ```rust
/// use restructure::{Compiler, Descriptor, Schema, SchemaBuilder};
///
/// #[derive(Default)]
/// struct Word {
///     text: String,
/// }
///
/// impl Schema for Word {
///     fn descriptor() -> Descriptor {
///         SchemaBuilder::<Self>::new("Word")
///             .scalar("text", r"\w+", |v| &mut v.text)
///             .build()
///     }
/// }
///
/// let (stencil, expr) = Compiler::new().compile(&Word::descriptor()).unwrap();
/// assert_eq!(stencil.slot_count(), 2);
/// assert_eq!(expr.render(), r"((?:\w+))");
/// ```
pub struct Compiler<'r> {
    options: Options,
    unions: Unions<'r>,
    next_slot: usize,
    path: Vec<TypeId>,
}

impl Compiler<'static> {
    /// A compiler with default options, resolving unions in the process-wide
    /// registry
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// A compiler with the given options, resolving unions in the
    /// process-wide registry
    pub fn with_options(options: Options) -> Self {
        Self {
            options,
            unions: Unions::Global,
            next_slot: 0,
            path: Vec::new(),
        }
    }
}

impl Default for Compiler<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> Compiler<'r> {
    /// A compiler resolving unions in `registry` instead of the process-wide one
    pub fn with_registry(options: Options, registry: &'r UnionRegistry) -> Self {
        Self {
            options,
            unions: Unions::Local(registry),
            next_slot: 0,
            path: Vec::new(),
        }
    }

    /// Lower `descriptor` into its stencil and pattern tree
    ///
    /// The root envelope always receives slot 0.
    pub fn compile(mut self, descriptor: &Descriptor) -> Result<(StructStencil, Expr), CompileError> {
        self.compile_struct(descriptor)
    }

    /// Lower `descriptor`, render it and build the engine regex
    pub(crate) fn build(self, descriptor: &Descriptor) -> Result<Compiled, CompileError> {
        let options = self.options;
        let (stencil, expr) = self.compile(descriptor)?;
        let pattern = expr.render_with(options.swap_greed);

        let regex = options
            .build_regex(&pattern)
            .map_err(|e| CompileError::Engine {
                schema: descriptor.name().to_string(),
                message: e.to_string(),
            })?;

        let slots = expr.capture_count();
        if regex.captures_len() != slots {
            return Err(CompileError::SlotCountMismatch {
                schema: descriptor.name().to_string(),
                slots,
                groups: regex.captures_len(),
            });
        }

        log_debug!(
            "compiled {} into {} slots: {}",
            descriptor.name(),
            slots,
            pattern
        );

        Ok(Compiled {
            stencil,
            expr,
            regex,
        })
    }

    fn allocate(&mut self) -> usize {
        let slot = self.next_slot;
        self.next_slot += 1;
        slot
    }

    fn compile_struct(
        &mut self,
        descriptor: &Descriptor,
    ) -> Result<(StructStencil, Expr), CompileError> {
        if self.path.contains(&descriptor.type_id()) {
            return Err(CompileError::RecursiveSchema {
                schema: descriptor.name().to_string(),
            });
        }
        self.path.push(descriptor.type_id());

        let slot = self.allocate();
        let mut fields = Vec::with_capacity(descriptor.fields().len());
        let mut exprs = Vec::with_capacity(descriptor.fields().len());

        for field in descriptor.fields() {
            if let Some((stencil, expr)) = self.compile_field(descriptor, field)? {
                fields.push(stencil);
                exprs.push(expr);
            }
        }

        self.path.pop();

        let stencil = StructStencil {
            name: descriptor.name(),
            slot,
            fields,
        };
        let expr = Expr::capture(slot, descriptor.name(), Expr::Concat(exprs));
        Ok((stencil, expr))
    }

    fn compile_field(
        &mut self,
        owner: &Descriptor,
        field: &FieldDescriptor,
    ) -> Result<Option<(FieldStencil, Expr)>, CompileError> {
        match field.role() {
            Role::Scalar => self.compile_scalar(owner, field),
            Role::Position => Ok(self.compile_position(field)),
            Role::Nested => self.compile_nested(owner, field),
            Role::Union => self.compile_union(owner, field),
        }
    }

    fn compile_scalar(
        &mut self,
        owner: &Descriptor,
        field: &FieldDescriptor,
    ) -> Result<Option<(FieldStencil, Expr)>, CompileError> {
        if field.fragment().is_empty() {
            return Ok(None);
        }

        let text = normalize_fragment(field.fragment(), &self.options).map_err(|message| {
            CompileError::PatternSyntax {
                schema: owner.name().to_string(),
                field: field.name().to_string(),
                pattern: field.fragment().to_string(),
                message,
            }
        })?;

        let binding = match (&field.binding, field.visibility()) {
            (Binding::Scalar {
                access,
                type_id,
                type_name,
            }, Visibility::Public) => Some((access, *type_id, *type_name)),
            _ => None,
        };

        let Some((access, type_id, type_name)) = binding else {
            let stencil = FieldStencil {
                name: field.name(),
                slot: None,
                kind: FieldKind::Separator,
            };
            return Ok(Some((stencil, Expr::Fragment(text))));
        };

        let repr = Repr::of(type_id).ok_or_else(|| CompileError::UnsupportedFieldType {
            schema: owner.name().to_string(),
            field: field.name().to_string(),
            type_name,
        })?;

        let slot = self.allocate();
        let stencil = FieldStencil {
            name: field.name(),
            slot: Some(slot),
            kind: FieldKind::Scalar {
                access: Arc::clone(access),
                repr,
                type_name,
            },
        };
        Ok(Some((stencil, Expr::capture(slot, field.name(), Expr::Fragment(text)))))
    }

    fn compile_position(&mut self, field: &FieldDescriptor) -> Option<(FieldStencil, Expr)> {
        let Binding::Position { access } = &field.binding else {
            return None;
        };
        if field.visibility() == Visibility::Hidden {
            return None;
        }

        let slot = self.allocate();
        let stencil = FieldStencil {
            name: field.name(),
            slot: Some(slot),
            kind: FieldKind::Position {
                access: Arc::clone(access),
            },
        };
        Some((stencil, Expr::capture(slot, field.name(), Expr::empty())))
    }

    fn compile_nested(
        &mut self,
        owner: &Descriptor,
        field: &FieldDescriptor,
    ) -> Result<Option<(FieldStencil, Expr)>, CompileError> {
        let Binding::Nested {
            access,
            holder,
            describe,
            child,
        } = &field.binding
        else {
            return Ok(None);
        };

        let cardinality = cardinality(owner, field)?;
        if cardinality == Cardinality::Optional && !holder.nullable() {
            return Err(CompileError::MisplacedOptionalMarker {
                schema: owner.name().to_string(),
                field: field.name().to_string(),
            });
        }

        // Checked before describing the child so a self-referential type never
        // builds its own descriptor.
        if self.path.contains(child) {
            return Err(CompileError::RecursiveSchema {
                schema: owner.name().to_string(),
            });
        }

        let slot = self.allocate();
        let (stencil, expr) = self.compile_struct(&describe())?;
        let expr = match cardinality {
            Cardinality::Optional => Expr::optional(expr),
            Cardinality::Required => expr,
        };

        let field_stencil = FieldStencil {
            name: field.name(),
            slot: Some(slot),
            kind: FieldKind::Nested {
                access: Arc::clone(access),
                holder: Arc::clone(holder),
                child: stencil,
            },
        };
        Ok(Some((field_stencil, Expr::capture(slot, field.name(), expr))))
    }

    fn compile_union(
        &mut self,
        owner: &Descriptor,
        field: &FieldDescriptor,
    ) -> Result<Option<(FieldStencil, Expr)>, CompileError> {
        let Binding::Union {
            access,
            holder,
            capability,
            capability_name,
        } = &field.binding
        else {
            return Ok(None);
        };

        let cardinality = cardinality(owner, field)?;
        let entry = self
            .unions
            .get(*capability)
            .ok_or_else(|| CompileError::UnregisteredCapability {
                schema: owner.name().to_string(),
                field: field.name().to_string(),
                capability: *capability_name,
            })?;

        let slot = self.allocate();
        let mut variants = Vec::with_capacity(entry.variants().len());
        let mut alternatives = Vec::with_capacity(entry.variants().len());
        for variant in entry.variants() {
            let (stencil, expr) = self.compile_struct(&variant.descriptor())?;
            variants.push(VariantStencil {
                entry: Arc::clone(variant),
                stencil,
            });
            alternatives.push(expr);
        }

        let expr = match cardinality {
            Cardinality::Optional => Expr::optional(Expr::Alternation(alternatives)),
            Cardinality::Required => Expr::Alternation(alternatives),
        };

        let field_stencil = FieldStencil {
            name: field.name(),
            slot: Some(slot),
            kind: FieldKind::Union {
                access: Arc::clone(access),
                holder: Arc::clone(holder),
                child: UnionStencil {
                    capability: *capability_name,
                    variants,
                },
            },
        };
        Ok(Some((field_stencil, Expr::capture(slot, field.name(), expr))))
    }
}

fn cardinality(owner: &Descriptor, field: &FieldDescriptor) -> Result<Cardinality, CompileError> {
    Cardinality::from_marker(field.marker()).ok_or_else(|| CompileError::InvalidMarker {
        schema: owner.name().to_string(),
        field: field.name().to_string(),
        marker: field.marker().to_string(),
    })
}
