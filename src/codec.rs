//! Per-type serializer capabilities and field descriptors.
//!
//! Every type that can appear as a field value implements [`Value`]. A
//! message associates its fields with tags through [`Message::FIELDS`],
//! and the field descriptors in that list drive both directions of the
//! codec.

pub mod delimited;
pub mod enumeration;
pub mod map;
pub mod message;
pub mod oneof;
pub mod optional;
pub mod repeated;
pub mod scalar;

use crate::error::DecodeError;
use crate::io::{Sink, Source};
use crate::wire::WireType;

/// Field encoding flags.
///
/// A flag set selects among the compatible wire encodings of an in-memory
/// type: zigzag mapping for signed integers, fixed-width little-endian for
/// 32/64-bit integers. Only a handful of combinations are legal per type;
/// the rest are programmer errors caught by debug assertions.
pub mod flags {
    /// Default encoding for the type: plain varint, fixed for floats,
    /// length-delimited for strings and messages.
    pub const NONE: u32 = 0;
    /// Apply the zigzag mapping before varint encoding (`sint32`/`sint64`).
    pub const SIGNED: u32 = 1;
    /// Fixed-width little-endian encoding (`fixed32`/`fixed64`, and with
    /// [`SIGNED`] the `sfixed` variants).
    pub const FIXED: u32 = 1 << 1;
}

/// A type that knows how to put itself on the protobuf wire and back.
///
/// `encode` covers the whole field record: default elision, the field key,
/// and the payload. `decode_into` is handed the observed wire type (the key
/// has already been consumed) and merges the payload into `self` with
/// protobuf semantics: scalars overwrite, repeated fields append, maps
/// insert.
pub trait Value: Default {
    /// Whether this type has a packed wire form and implements the
    /// `*_packed` pair below. Repeated fields consult this to pick between
    /// one length-delimited record for the whole array and one record per
    /// element.
    const PACKABLE: bool = false;

    /// Encode this value as a complete field record.
    ///
    /// A value equal to its protobuf default is elided entirely, key
    /// included, unless `force` is set. Map entries force their key and
    /// value so zeros survive the round trip.
    fn encode(&self, tag: u32, flags: u32, force: bool, out: &mut dyn Sink);

    /// Decode a payload of the observed wire type into `self`.
    ///
    /// Fails with [`DecodeError::InvalidWireType`] when the observed wire
    /// type does not match what `flags` selects for this type.
    fn decode_into(
        &mut self,
        wire_type: WireType,
        flags: u32,
        src: &mut dyn Source,
    ) -> Result<(), DecodeError>;

    /// Encode just the packed payload, no key, no elision.
    ///
    /// Only called when [`Value::PACKABLE`] is true.
    fn encode_packed(&self, flags: u32, out: &mut dyn Sink) {
        let _ = (flags, out);
        unreachable!("type does not support packed encoding");
    }

    /// Decode one packed element from a length-scoped source.
    ///
    /// Only called when [`Value::PACKABLE`] is true.
    fn decode_packed(&mut self, flags: u32, src: &mut dyn Source) -> Result<(), DecodeError> {
        let _ = (flags, src);
        unreachable!("type does not support packed encoding");
    }
}

/// Checks an observed wire type against the one the field expects.
#[inline]
pub(crate) fn expect_wire_type(observed: WireType, expected: WireType) -> Result<(), DecodeError> {
    if observed == expected {
        Ok(())
    } else {
        Err(DecodeError::InvalidWireType {
            value: observed.into_val(),
        })
    }
}

pub use enumeration::Enumeration;
pub use map::{map_field, map_field_with, MapContainer, MapField};
pub use message::{field, field_with, Field, Fields, Message, PlainField};
pub use oneof::{oneof_field, oneof_field_with, OneofField};
