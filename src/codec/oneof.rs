//! Oneof alternatives.
//!
//! A oneof has no wire presence of its own: each alternative is a regular
//! field with its own tag, and at most one of them appears in an encoded
//! message. The natural Rust shape is an enum, so an alternative's
//! descriptor carries two accessors: a projection that yields the payload
//! only while the enum holds this alternative, and an assignment that
//! swaps the enum over to it.
//!
//! When several alternatives of the same oneof show up in one stream, the
//! last one wins, because each decode replaces the union wholesale.

use super::{flags, Field, Value};
use crate::error::DecodeError;
use crate::io::{Sink, Source};
use crate::wire::WireType;

/// Descriptor for one alternative of a oneof.
pub struct OneofField<M, V> {
    tag: u32,
    index: usize,
    flags: u32,
    name: &'static str,
    project: fn(&M) -> Option<&V>,
    assign: fn(&mut M, V),
}

/// Builds a [`OneofField`] descriptor with the default encoding.
///
/// `index` is the alternative's position within the union, mirroring the
/// order of the enum's variants.
pub const fn oneof_field<M, V>(
    tag: u32,
    index: usize,
    name: &'static str,
    project: fn(&M) -> Option<&V>,
    assign: fn(&mut M, V),
) -> OneofField<M, V> {
    oneof_field_with(tag, index, name, flags::NONE, project, assign)
}

/// Builds a [`OneofField`] descriptor with explicit encoding flags.
pub const fn oneof_field_with<M, V>(
    tag: u32,
    index: usize,
    name: &'static str,
    flags: u32,
    project: fn(&M) -> Option<&V>,
    assign: fn(&mut M, V),
) -> OneofField<M, V> {
    OneofField {
        tag,
        index,
        flags,
        name,
        project,
        assign,
    }
}

impl<M, V> OneofField<M, V> {
    /// The alternative's position within its union.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<M, V: Value> Field<M> for OneofField<M, V> {
    fn tag(&self) -> u32 {
        self.tag
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn encode(&self, msg: &M, out: &mut dyn Sink) {
        // Nothing to emit unless the union currently holds this
        // alternative.
        if let Some(value) = (self.project)(msg) {
            value.encode(self.tag, self.flags, false, out);
        }
    }

    fn decode(
        &self,
        msg: &mut M,
        wire_type: WireType,
        src: &mut dyn Source,
    ) -> Result<(), DecodeError> {
        let mut value = V::default();
        value.decode_into(wire_type, self.flags, src)?;
        (self.assign)(msg, value);
        Ok(())
    }
}
