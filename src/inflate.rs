//! Match inflation
//!
//! Walks a [`StructStencil`] in lockstep with the offsets of one engine match
//! and writes every matched field into a destination value. Fields whose slot
//! did not participate in the match keep their previous value, and nested or
//! polymorphic fields whose child envelope did not match are left absent.

use std::any::Any;

use crate::error::MatchError;
use crate::stencil::{FieldKind, FieldStencil, Repr, StructStencil, UnionStencil};
use crate::submatch::{Pos, Region, Submatch};

/// Offsets of one match of a compiled pattern, one entry per slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<'t> {
    input: &'t str,
    regions: Vec<Option<Region>>,
}

impl<'t> Match<'t> {
    /// A match over `input` with the given per-slot regions
    pub fn new(input: &'t str, regions: Vec<Option<Region>>) -> Self {
        Self { input, regions }
    }

    pub(crate) fn from_captures(input: &'t str, captures: &regex::Captures<'t>) -> Self {
        let regions = captures.iter().map(|m| m.map(Region::from)).collect();
        Self { input, regions }
    }

    pub(crate) fn from_locations(input: &'t str, locations: &regex::CaptureLocations) -> Self {
        let regions = (0..locations.len())
            .map(|slot| locations.get(slot).map(|(begin, end)| Region::new(begin, end)))
            .collect();
        Self { input, regions }
    }

    /// The matched input
    pub fn input(&self) -> &'t str {
        self.input
    }

    /// Region of a slot, `None` when the slot did not participate
    pub fn get(&self, slot: usize) -> Option<Region> {
        self.regions.get(slot).copied().flatten()
    }

    /// Whether a slot participated in the match
    pub fn is_matched(&self, slot: usize) -> bool {
        self.get(slot).is_some()
    }

    /// Region of the whole match
    pub fn region(&self) -> Option<Region> {
        self.get(0)
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether the match has no slots
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Populate `dest` from `m` according to `stencil`
///
/// `dest` must be the type `stencil` was compiled from. On error the
/// inflation stops and writes already made are kept.
pub fn inflate(stencil: &StructStencil, m: &Match<'_>, dest: &mut dyn Any) -> Result<(), MatchError> {
    inflate_struct(stencil, m, dest)
}

fn inflate_struct(
    stencil: &StructStencil,
    m: &Match<'_>,
    dest: &mut dyn Any,
) -> Result<(), MatchError> {
    if !m.is_matched(stencil.slot) {
        return Ok(());
    }
    for field in &stencil.fields {
        inflate_field(stencil, field, m, dest)?;
    }
    Ok(())
}

fn inflate_field(
    owner: &StructStencil,
    field: &FieldStencil,
    m: &Match<'_>,
    dest: &mut dyn Any,
) -> Result<(), MatchError> {
    let Some(slot) = field.slot else {
        return Ok(());
    };
    let mismatch = || MatchError::DestinationTypeMismatch {
        expected: owner.name,
    };

    match &field.kind {
        FieldKind::Separator => Ok(()),

        FieldKind::Scalar {
            access,
            repr,
            type_name,
        } => {
            let Some(region) = m.get(slot) else {
                return Ok(());
            };
            let target = access.get(dest).ok_or_else(mismatch)?;
            store(target, *repr, region, m.input).ok_or_else(|| {
                MatchError::UnsupportedFieldRepresentation {
                    field: field.name.to_string(),
                    type_name: *type_name,
                }
            })
        }

        FieldKind::Position { access } => {
            let Some(region) = m.get(slot) else {
                return Ok(());
            };
            let target = access.get(dest).ok_or_else(mismatch)?;
            let pos = target.downcast_mut::<Pos>().ok_or_else(|| {
                MatchError::UnsupportedFieldRepresentation {
                    field: field.name.to_string(),
                    type_name: std::any::type_name::<Pos>(),
                }
            })?;
            *pos = Pos(region.begin);
            Ok(())
        }

        FieldKind::Nested {
            access,
            holder,
            child,
        } => {
            if !m.is_matched(child.slot) {
                return Ok(());
            }
            let target = access.get(dest).ok_or_else(mismatch)?;
            let inner = holder
                .ensure(target)
                .ok_or(MatchError::DestinationTypeMismatch {
                    expected: child.name,
                })?;
            inflate_struct(child, m, inner)
        }

        FieldKind::Union {
            access,
            holder,
            child,
        } => {
            let Some(value) = inflate_variant(child, m)? else {
                return Ok(());
            };
            let target = access.get(dest).ok_or_else(mismatch)?;
            if holder.assign(target, value) {
                Ok(())
            } else {
                Err(MatchError::DestinationTypeMismatch {
                    expected: child.capability,
                })
            }
        }
    }
}

/// Inflate the first variant, in registration order, whose envelope matched
fn inflate_variant(
    union: &UnionStencil,
    m: &Match<'_>,
) -> Result<Option<Box<dyn Any>>, MatchError> {
    let Some(variant) = union
        .variants
        .iter()
        .find(|v| m.is_matched(v.stencil.slot))
    else {
        return Ok(None);
    };

    let mut value = variant.entry.instantiate();
    inflate_struct(&variant.stencil, m, &mut *value)?;
    let wrapped = variant
        .entry
        .wrap(value)
        .ok_or(MatchError::DestinationTypeMismatch {
            expected: variant.entry.name(),
        })?;
    Ok(Some(wrapped))
}

/// Write a span into a scalar destination; `None` if the destination is not
/// of the expected representation
fn store(target: &mut dyn Any, repr: Repr, region: Region, input: &str) -> Option<()> {
    let text = input.get(region.begin..region.end)?;
    match repr {
        Repr::Text => *target.downcast_mut::<String>()? = text.to_string(),
        Repr::Bytes => *target.downcast_mut::<Vec<u8>>()? = text.as_bytes().to_vec(),
        Repr::Submatch => {
            *target.downcast_mut::<Submatch>()? = Submatch::from_region(region, input.as_bytes())
        }
        Repr::OptionalText => *target.downcast_mut::<Option<String>>()? = Some(text.to_string()),
        Repr::OptionalBytes => {
            *target.downcast_mut::<Option<Vec<u8>>>()? = Some(text.as_bytes().to_vec())
        }
        Repr::OptionalSubmatch => {
            *target.downcast_mut::<Option<Submatch>>()? =
                Some(Submatch::from_region(region, input.as_bytes()))
        }
        Repr::Ignore => {
            target.downcast_mut::<()>()?;
        }
    }
    Some(())
}
