//! Union registry
//!
//! A capability is a sum type whose shape is decided by which of its variant
//! schemas matched. The registry maps each capability to its closed, ordered
//! list of variants. Registration order is the order in which the compiled
//! alternation tries them, so it decides ties.
//!
//! The process-wide registry is populated once at startup, before any schema
//! referring to the capability is compiled, and only read afterwards.
//!
//! # Example
//!
//! ```rust
//! use restructure::{register_union, Capability, Descriptor, Schema, SchemaBuilder, Variant};
//!
//! #[derive(Default)]
//! struct Digits {
//!     digits: String,
//! }
//!
//! impl Schema for Digits {
//!     fn descriptor() -> Descriptor {
//!         SchemaBuilder::<Self>::new("Digits")
//!             .scalar("digits", "[0-9]+", |v| &mut v.digits)
//!             .build()
//!     }
//! }
//!
//! enum Literal {
//!     Int(Digits),
//! }
//!
//! impl Capability for Literal {}
//!
//! register_union::<Literal>([Variant::new(Literal::Int)]);
//! assert!(restructure::is_registered::<Literal>());
//! ```

use hashbrown::HashMap;
use std::any::{Any, TypeId};
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard};

use crate::error::UnionError;
use crate::schema::{Descriptor, Schema};

// ============================================================================
// Capability and variants
// ============================================================================

/// A polymorphic type whose value is one of a closed set of schemas
///
/// Usually an enum with one single-field tuple variant per schema, which
/// `#[derive(Capability)]` implements this trait for.
pub trait Capability: Send + 'static {
    /// Name used in errors and logs
    fn name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

type Wrap = dyn Fn(Box<dyn Any>) -> Option<Box<dyn Any>> + Send + Sync;

/// A registered variant with its type erased
pub struct VariantEntry {
    name: &'static str,
    type_id: TypeId,
    describe: fn() -> Descriptor,
    instantiate: fn() -> Box<dyn Any>,
    wrap: Box<Wrap>,
}

impl VariantEntry {
    /// Full Rust name of the variant's schema type
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Identity of the variant's schema type
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The variant's descriptor
    pub fn descriptor(&self) -> Descriptor {
        (self.describe)()
    }

    /// A default instance of the variant's schema type
    pub(crate) fn instantiate(&self) -> Box<dyn Any> {
        (self.instantiate)()
    }

    /// Convert an inflated variant into its capability
    pub(crate) fn wrap(&self, value: Box<dyn Any>) -> Option<Box<dyn Any>> {
        (self.wrap)(value)
    }
}

impl std::fmt::Debug for VariantEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariantEntry")
            .field("name", &self.name)
            .finish()
    }
}

fn instantiate<T: Schema>() -> Box<dyn Any> {
    Box::new(T::default())
}

/// One variant of capability `C`
pub struct Variant<C> {
    entry: VariantEntry,
    _capability: PhantomData<fn() -> C>,
}

impl<C: Capability> Variant<C> {
    /// A variant built from schema `T` with the constructor `ctor`
    ///
    /// Enum tuple-variant constructors fit directly: `Variant::new(Contact::Phone)`.
    pub fn new<T: Schema>(ctor: fn(T) -> C) -> Self {
        let wrap = move |value: Box<dyn Any>| -> Option<Box<dyn Any>> {
            let value = value.downcast::<T>().ok()?;
            let wrapped: Box<dyn Any> = Box::new(ctor(*value));
            Some(wrapped)
        };
        Self {
            entry: VariantEntry {
                name: std::any::type_name::<T>(),
                type_id: TypeId::of::<T>(),
                describe: T::descriptor,
                instantiate: instantiate::<T>,
                wrap: Box::new(wrap),
            },
            _capability: PhantomData,
        }
    }
}

/// The registered variants of one capability
#[derive(Debug)]
pub struct UnionEntry {
    capability: &'static str,
    variants: Vec<Arc<VariantEntry>>,
}

impl UnionEntry {
    /// Name of the capability
    pub fn capability(&self) -> &'static str {
        self.capability
    }

    /// Variants in registration order
    pub fn variants(&self) -> &[Arc<VariantEntry>] {
        &self.variants
    }

    /// Variant type names in registration order
    pub fn variant_names(&self) -> Vec<&'static str> {
        self.variants.iter().map(|v| v.name()).collect()
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Table from capability type to its ordered variant list
#[derive(Debug, Default)]
pub struct UnionRegistry {
    unions: HashMap<TypeId, Arc<UnionEntry>>,
}

impl UnionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the variants of capability `C`
    ///
    /// Fails if `C` is already registered, if no variants are given, or if a
    /// schema appears twice in the list.
    pub fn register<C: Capability>(
        &mut self,
        variants: impl IntoIterator<Item = Variant<C>>,
    ) -> Result<(), UnionError> {
        let capability = C::name();
        let key = TypeId::of::<C>();
        if self.unions.contains_key(&key) {
            return Err(UnionError::DuplicateRegistration { capability });
        }

        let mut entries: Vec<Arc<VariantEntry>> = Vec::new();
        for variant in variants {
            if entries.iter().any(|e| e.type_id == variant.entry.type_id) {
                return Err(UnionError::DuplicateVariant {
                    capability,
                    variant: variant.entry.name,
                });
            }
            entries.push(Arc::new(variant.entry));
        }
        if entries.is_empty() {
            return Err(UnionError::EmptyVariantList { capability });
        }

        log_debug!(
            "registered union {} with variants {:?}",
            capability,
            entries.iter().map(|e| e.name).collect::<Vec<_>>()
        );

        self.unions.insert(
            key,
            Arc::new(UnionEntry {
                capability,
                variants: entries,
            }),
        );
        Ok(())
    }

    /// The entry for capability `C`, if registered
    pub fn lookup<C: Capability>(&self) -> Option<Arc<UnionEntry>> {
        self.get(TypeId::of::<C>())
    }

    /// The entry for a capability by type identity
    pub fn get(&self, capability: TypeId) -> Option<Arc<UnionEntry>> {
        self.unions.get(&capability).cloned()
    }

    /// Whether capability `C` is registered
    pub fn contains<C: Capability>(&self) -> bool {
        self.unions.contains_key(&TypeId::of::<C>())
    }

    /// Number of registered capabilities
    pub fn len(&self) -> usize {
        self.unions.len()
    }

    /// Whether no capability is registered
    pub fn is_empty(&self) -> bool {
        self.unions.is_empty()
    }
}

// ============================================================================
// Global Registry Functions
// ============================================================================

/// Process-wide registry
static UNION_REGISTRY: OnceLock<RwLock<UnionRegistry>> = OnceLock::new();

fn global_registry() -> &'static RwLock<UnionRegistry> {
    UNION_REGISTRY.get_or_init(|| RwLock::new(UnionRegistry::new()))
}

/// Read access to the process-wide registry
pub(crate) fn read_global() -> RwLockReadGuard<'static, UnionRegistry> {
    global_registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Register the variants of capability `C` in the process-wide registry
pub fn try_register_union<C: Capability>(
    variants: impl IntoIterator<Item = Variant<C>>,
) -> Result<(), UnionError> {
    global_registry()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(variants)
}

/// Register the variants of capability `C`, aborting on misuse
///
/// Meant for startup code, where a bad registration is a programming error.
///
/// # Panics
///
/// Panics if `C` is already registered, if `variants` is empty, or if a
/// schema is listed twice.
pub fn register_union<C: Capability>(variants: impl IntoIterator<Item = Variant<C>>) {
    if let Err(err) = try_register_union(variants) {
        panic!("{}", err);
    }
}

/// The process-wide entry for capability `C`, if registered
pub fn lookup_union<C: Capability>() -> Option<Arc<UnionEntry>> {
    read_global().lookup::<C>()
}

/// Whether capability `C` is registered process-wide
pub fn is_registered<C: Capability>() -> bool {
    read_global().contains::<C>()
}
