//! Schema descriptors
//!
//! A [`Descriptor`] lists the fields of a composite type in declaration
//! order. Each field has a fragment, a [`Role`], a [`Visibility`] and, for
//! nested and polymorphic fields, a cardinality marker. Descriptors are
//! declared with [`SchemaBuilder`] (or generated by `#[derive(Schema)]`) and
//! carry type-erased accessors through which the inflator reaches each
//! destination field.
//!
//! # Example
//!
//! ```rust
//! use restructure::{Descriptor, Schema, SchemaBuilder};
//!
//! #[derive(Default)]
//! struct DotName {
//!     dot: String,
//!     name: String,
//! }
//!
//! #[derive(Default)]
//! struct DotExpr {
//!     head: String,
//!     tail: Option<DotName>,
//! }
//!
//! impl Schema for DotName {
//!     fn descriptor() -> Descriptor {
//!         SchemaBuilder::<Self>::new("DotName")
//!             .scalar("dot", r"\.", |v| &mut v.dot)
//!             .scalar("name", r"\w+", |v| &mut v.name)
//!             .build()
//!     }
//! }
//!
//! impl Schema for DotExpr {
//!     fn descriptor() -> Descriptor {
//!         SchemaBuilder::<Self>::new("DotExpr")
//!             .separator("^")
//!             .scalar("head", r"\w+", |v| &mut v.head)
//!             .optional("tail", "?", |v| &mut v.tail)
//!             .separator("$")
//!             .build()
//!     }
//! }
//! ```

use std::any::{Any, TypeId};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::submatch::Pos;
use crate::union::Capability;

/// A composite type that can be compiled into a pattern
///
/// Implement by hand with [`SchemaBuilder`] or with `#[derive(Schema)]`.
pub trait Schema: Default + Send + 'static {
    /// Describe the fields of this type, in declaration order
    fn descriptor() -> Descriptor;
}

/// How a field is compiled and inflated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// A span captured into a scalar destination
    Scalar,
    /// A zero-width marker recording a byte offset
    Position,
    /// A nested composite
    Nested,
    /// A polymorphic slot holding one registered variant
    Union,
}

/// Whether a field produces output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Captured and written to the destination
    Public,
    /// Must match but is never captured
    Hidden,
}

/// Declared cardinality of a nested or polymorphic field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// The region must be present whenever the parent matches
    Required,
    /// The region may be entirely absent
    Optional,
}

impl Cardinality {
    /// Marker text for optional fields
    pub const OPTIONAL_MARKER: &'static str = "?";

    /// Parse a cardinality marker, `""` or `"?"`
    pub fn from_marker(marker: &str) -> Option<Cardinality> {
        match marker {
            "" => Some(Cardinality::Required),
            Self::OPTIONAL_MARKER => Some(Cardinality::Optional),
            _ => None,
        }
    }
}

/// Compile-time description of a composite type
#[derive(Clone)]
pub struct Descriptor {
    name: &'static str,
    type_id: TypeId,
    type_name: &'static str,
    fields: Vec<FieldDescriptor>,
}

impl Descriptor {
    /// Schema name used in errors and as the envelope capture name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Identity of the described type
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Full Rust name of the described type
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }
}

impl std::fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Descriptor")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish()
    }
}

/// One field of a [`Descriptor`]
#[derive(Clone)]
pub struct FieldDescriptor {
    name: &'static str,
    fragment: String,
    role: Role,
    visibility: Visibility,
    marker: String,
    pub(crate) binding: Binding,
}

impl FieldDescriptor {
    /// Field name, also the capture name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Pattern fragment; empty for structural, nested and polymorphic fields
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// The field's role
    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether the field is captured
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Cardinality marker as declared, `""` or `"?"` when well formed
    pub fn marker(&self) -> &str {
        &self.marker
    }
}

impl std::fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("fragment", &self.fragment)
            .field("role", &self.role)
            .field("visibility", &self.visibility)
            .field("marker", &self.marker)
            .finish()
    }
}

// ============================================================================
// Type-erased access
// ============================================================================

/// Reaches one field of an owner value
pub(crate) trait Access: Send + Sync {
    fn get<'a>(&self, owner: &'a mut dyn Any) -> Option<&'a mut dyn Any>;
}

struct Accessor<S, T> {
    get: fn(&mut S) -> &mut T,
}

impl<S: 'static, T: 'static> Access for Accessor<S, T> {
    fn get<'a>(&self, owner: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        let owner = owner.downcast_mut::<S>()?;
        let field: &mut dyn Any = (self.get)(owner);
        Some(field)
    }
}

/// Allocates a nested composite inside its holder
pub(crate) trait Holder: Send + Sync {
    /// Whether the holder can represent absence
    fn nullable(&self) -> bool;

    /// Return the composite, allocating it if the holder is empty
    fn ensure<'a>(&self, slot: &'a mut dyn Any) -> Option<&'a mut dyn Any>;
}

struct Required<T>(PhantomData<fn() -> T>);

impl<T: Schema> Holder for Required<T> {
    fn nullable(&self) -> bool {
        false
    }

    fn ensure<'a>(&self, slot: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        let value: &mut dyn Any = slot.downcast_mut::<T>()?;
        Some(value)
    }
}

struct Nullable<T>(PhantomData<fn() -> T>);

impl<T: Schema> Holder for Nullable<T> {
    fn nullable(&self) -> bool {
        true
    }

    fn ensure<'a>(&self, slot: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        let holder = slot.downcast_mut::<Option<T>>()?;
        let value: &mut dyn Any = holder.get_or_insert_with(T::default);
        Some(value)
    }
}

struct NullableBox<T>(PhantomData<fn() -> T>);

impl<T: Schema> Holder for NullableBox<T> {
    fn nullable(&self) -> bool {
        true
    }

    fn ensure<'a>(&self, slot: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        let holder = slot.downcast_mut::<Option<Box<T>>>()?;
        let value: &mut dyn Any = &mut **holder.get_or_insert_with(Box::<T>::default);
        Some(value)
    }
}

/// Stores a wrapped variant into a polymorphic field
pub(crate) trait UnionHolder: Send + Sync {
    fn assign(&self, slot: &mut dyn Any, value: Box<dyn Any>) -> bool;
}

struct Choice<C>(PhantomData<fn() -> C>);

impl<C: Capability> UnionHolder for Choice<C> {
    fn assign(&self, slot: &mut dyn Any, value: Box<dyn Any>) -> bool {
        match (slot.downcast_mut::<Option<C>>(), value.downcast::<C>()) {
            (Some(holder), Ok(value)) => {
                *holder = Some(*value);
                true
            }
            _ => false,
        }
    }
}

/// The accessor attached to a field, by role
#[derive(Clone)]
pub(crate) enum Binding {
    /// Separators and structural fields reach nothing
    Detached,
    Scalar {
        access: Arc<dyn Access>,
        type_id: TypeId,
        type_name: &'static str,
    },
    Position {
        access: Arc<dyn Access>,
    },
    Nested {
        access: Arc<dyn Access>,
        holder: Arc<dyn Holder>,
        describe: fn() -> Descriptor,
        child: TypeId,
    },
    Union {
        access: Arc<dyn Access>,
        holder: Arc<dyn UnionHolder>,
        capability: TypeId,
        capability_name: &'static str,
    },
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for the [`Descriptor`] of a schema type `S`
///
/// Fields are appended in call order, which is concatenation order.
pub struct SchemaBuilder<S> {
    name: &'static str,
    fields: Vec<FieldDescriptor>,
    _owner: PhantomData<fn() -> S>,
}

impl<S: Schema> SchemaBuilder<S> {
    /// Start describing `S` under the given schema name
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
            _owner: PhantomData,
        }
    }

    fn push(
        mut self,
        name: &'static str,
        fragment: String,
        role: Role,
        visibility: Visibility,
        marker: String,
        binding: Binding,
    ) -> Self {
        self.fields.push(FieldDescriptor {
            name,
            fragment,
            role,
            visibility,
            marker,
            binding,
        });
        self
    }

    /// A hidden fragment that must match but is not captured
    pub fn separator(self, fragment: impl Into<String>) -> Self {
        self.push(
            "_",
            fragment.into(),
            Role::Scalar,
            Visibility::Hidden,
            String::new(),
            Binding::Detached,
        )
    }

    /// A captured scalar field
    ///
    /// Supported destinations are `String`, `Vec<u8>`, [`Submatch`], the
    /// `Option` of each of those, and `()` (match required, nothing stored).
    /// Other types are rejected when the schema is compiled. An empty
    /// fragment declares a structural field that is neither compiled nor
    /// captured.
    ///
    /// [`Submatch`]: crate::Submatch
    pub fn scalar<T: Send + 'static>(
        self,
        name: &'static str,
        fragment: impl Into<String>,
        access: fn(&mut S) -> &mut T,
    ) -> Self {
        let binding = Binding::Scalar {
            access: Arc::new(Accessor { get: access }),
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        };
        self.push(
            name,
            fragment.into(),
            Role::Scalar,
            Visibility::Public,
            String::new(),
            binding,
        )
    }

    /// A zero-width position marker
    pub fn pos(self, name: &'static str, access: fn(&mut S) -> &mut Pos) -> Self {
        let binding = Binding::Position {
            access: Arc::new(Accessor { get: access }),
        };
        self.push(
            name,
            String::new(),
            Role::Position,
            Visibility::Public,
            String::new(),
            binding,
        )
    }

    /// A nested composite held directly, which cannot be absent
    ///
    /// `marker` is the declared cardinality; `"?"` is rejected at compile
    /// time because a bare `T` has no absent state.
    pub fn nested<T: Schema>(
        self,
        name: &'static str,
        marker: &str,
        access: fn(&mut S) -> &mut T,
    ) -> Self {
        let binding = Binding::Nested {
            access: Arc::new(Accessor { get: access }),
            holder: Arc::new(Required::<T>(PhantomData)),
            describe: T::descriptor,
            child: TypeId::of::<T>(),
        };
        self.push(
            name,
            String::new(),
            Role::Nested,
            Visibility::Public,
            marker.to_string(),
            binding,
        )
    }

    /// A nested composite held in an `Option`
    ///
    /// With marker `"?"` the region may be absent and the field stays `None`;
    /// with `""` the composite is required and allocated on every match.
    pub fn optional<T: Schema>(
        self,
        name: &'static str,
        marker: &str,
        access: fn(&mut S) -> &mut Option<T>,
    ) -> Self {
        let binding = Binding::Nested {
            access: Arc::new(Accessor { get: access }),
            holder: Arc::new(Nullable::<T>(PhantomData)),
            describe: T::descriptor,
            child: TypeId::of::<T>(),
        };
        self.push(
            name,
            String::new(),
            Role::Nested,
            Visibility::Public,
            marker.to_string(),
            binding,
        )
    }

    /// A nested composite held in an `Option<Box<T>>`
    ///
    /// Behaves like [`optional`](Self::optional). Self-referential types
    /// need the indirection to be sized, although the compiler rejects a
    /// schema that actually reaches itself.
    pub fn boxed<T: Schema>(
        self,
        name: &'static str,
        marker: &str,
        access: fn(&mut S) -> &mut Option<Box<T>>,
    ) -> Self {
        let binding = Binding::Nested {
            access: Arc::new(Accessor { get: access }),
            holder: Arc::new(NullableBox::<T>(PhantomData)),
            describe: T::descriptor,
            child: TypeId::of::<T>(),
        };
        self.push(
            name,
            String::new(),
            Role::Nested,
            Visibility::Public,
            marker.to_string(),
            binding,
        )
    }

    /// A polymorphic field holding one variant of capability `C`
    ///
    /// `C` must be registered before the schema is compiled.
    pub fn union<C: Capability>(
        self,
        name: &'static str,
        marker: &str,
        access: fn(&mut S) -> &mut Option<C>,
    ) -> Self {
        let binding = Binding::Union {
            access: Arc::new(Accessor { get: access }),
            holder: Arc::new(Choice::<C>(PhantomData)),
            capability: TypeId::of::<C>(),
            capability_name: C::name(),
        };
        self.push(
            name,
            String::new(),
            Role::Union,
            Visibility::Public,
            marker.to_string(),
            binding,
        )
    }

    /// Finish the descriptor
    pub fn build(self) -> Descriptor {
        Descriptor {
            name: self.name,
            type_id: TypeId::of::<S>(),
            type_name: std::any::type_name::<S>(),
            fields: self.fields,
        }
    }
}
