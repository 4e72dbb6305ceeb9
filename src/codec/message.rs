//! Message descriptors and the message-level codec.
//!
//! A message type describes itself with an ordered list of field
//! descriptors. Encoding walks the list in order; decoding reads field
//! keys off the wire and offers each one to the list, skipping payloads
//! no descriptor claims.

use super::{expect_wire_type, flags, Value};
use crate::error::DecodeError;
use crate::io::{LimitedSource, SizeSink, Sink, Source};
use crate::util::CastFrom;
use crate::varint::Varint;
use crate::wire::{self, WireType};

/// The ordered field descriptors of one message type.
pub type Fields<M> = &'static [&'static dyn Field<M>];

/// A type that encodes and decodes as a protobuf message.
///
/// Field tags should be unique within one message; the codec does not
/// enforce this, and decoding hands a payload to the first descriptor
/// whose tag matches.
///
/// # Example
///
/// ```
/// use tagwire::{field, Fields, Message};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Message for Point {
///     const FIELDS: Fields<Self> = &[
///         &field(1, "x", |p: &Point| &p.x, |p: &mut Point| &mut p.x),
///         &field(2, "y", |p: &Point| &p.y, |p: &mut Point| &mut p.y),
///     ];
/// }
///
/// let bytes = tagwire::serialize_to_bytes(&Point { x: 150, y: 0 });
/// assert_eq!(bytes, [0x08, 0x96, 0x01]); // y is default and elided
///
/// let point: Point = tagwire::parse_from_bytes(&bytes).unwrap();
/// assert_eq!(point, Point { x: 150, y: 0 });
/// ```
pub trait Message: Default + 'static {
    /// Field descriptors in declaration order.
    const FIELDS: Fields<Self>;
}

/// One field of a message: a tag bound to an accessor.
///
/// Object safe so a message's descriptor list can mix field shapes
/// (plain, oneof alternative, map) behind one vtable.
pub trait Field<M> {
    /// The field's tag number.
    fn tag(&self) -> u32;

    /// The field's name, for diagnostics.
    fn name(&self) -> &'static str;

    /// Emit this field from `msg`, key included. Default values emit
    /// nothing.
    fn encode(&self, msg: &M, out: &mut dyn Sink);

    /// Decode a payload whose key matched this field's tag.
    fn decode(
        &self,
        msg: &mut M,
        wire_type: WireType,
        src: &mut dyn Source,
    ) -> Result<(), DecodeError>;
}

/// Descriptor for a plain member field: scalar, string, bytes, embedded
/// message, `Option`, or `Vec`.
pub struct PlainField<M, V> {
    tag: u32,
    flags: u32,
    name: &'static str,
    get: fn(&M) -> &V,
    get_mut: fn(&mut M) -> &mut V,
}

/// Builds a [`PlainField`] descriptor with the default encoding.
pub const fn field<M, V>(
    tag: u32,
    name: &'static str,
    get: fn(&M) -> &V,
    get_mut: fn(&mut M) -> &mut V,
) -> PlainField<M, V> {
    field_with(tag, name, flags::NONE, get, get_mut)
}

/// Builds a [`PlainField`] descriptor with explicit encoding flags.
pub const fn field_with<M, V>(
    tag: u32,
    name: &'static str,
    flags: u32,
    get: fn(&M) -> &V,
    get_mut: fn(&mut M) -> &mut V,
) -> PlainField<M, V> {
    PlainField {
        tag,
        flags,
        name,
        get,
        get_mut,
    }
}

impl<M, V: Value> Field<M> for PlainField<M, V> {
    fn tag(&self) -> u32 {
        self.tag
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn encode(&self, msg: &M, out: &mut dyn Sink) {
        (self.get)(msg).encode(self.tag, self.flags, false, out);
    }

    fn decode(
        &self,
        msg: &mut M,
        wire_type: WireType,
        src: &mut dyn Source,
    ) -> Result<(), DecodeError> {
        (self.get_mut)(msg).decode_into(wire_type, self.flags, src)
    }
}

/// Encodes the body of `msg` (no key, no length prefix) into the sink.
pub fn encode_message<M: Message>(msg: &M, out: &mut dyn Sink) {
    for field in M::FIELDS {
        field.encode(msg, out);
    }
}

/// Decodes message fields from `src` into `msg` until end-of-stream.
///
/// End-of-stream between fields terminates successfully; end-of-stream
/// inside a key or payload is an error. Unknown tags have their payload
/// consumed and dropped.
pub fn decode_message<M: Message>(msg: &mut M, src: &mut dyn Source) -> Result<(), DecodeError> {
    while let Some((tag, wire_type)) = wire::decode_key(src)? {
        match M::FIELDS.iter().find(|field| field.tag() == tag) {
            Some(field) => field.decode(msg, wire_type, src)?,
            None => wire::skip_field(wire_type, src)?,
        }
    }
    Ok(())
}

/// Encodes `msg` as a length-delimited field record.
///
/// The body is measured with a [`SizeSink`] first so the length prefix can
/// precede it. A message whose body measures zero (every field default) is
/// elided entirely unless `force` is set.
pub fn encode_embedded<M: Message>(tag: u32, msg: &M, force: bool, out: &mut dyn Sink) {
    let mut sizer = SizeSink::new();
    encode_message(msg, &mut sizer);

    if !force && sizer.is_empty() {
        return;
    }

    wire::encode_key(tag, WireType::LengthDelimited, out);
    u64::cast_from(sizer.len()).encode_varint(out);
    encode_message(msg, out);
}

/// Decodes a length-delimited field record into `msg`.
///
/// The body is read through a [`LimitedSource`] scoped to the length
/// prefix, so the embedded decoder cannot wander into sibling fields.
pub fn decode_embedded<M: Message>(
    msg: &mut M,
    wire_type: WireType,
    src: &mut dyn Source,
) -> Result<(), DecodeError> {
    expect_wire_type(wire_type, WireType::LengthDelimited)?;
    let len = wire::decode_len(src)?;

    let mut limited = LimitedSource::new(src, len);
    decode_message(msg, &mut limited)?;

    // Budget left over means the parent stream ended before delivering the
    // promised body.
    if limited.available() > 0 {
        return Err(DecodeError::UnexpectedEof);
    }
    Ok(())
}

/// Implements [`Value`] for message types so they can appear as embedded
/// fields, inside `Option`/`Vec`, as map values, and as oneof alternatives.
///
/// ```ignore
/// impl Message for Inner { /* ... */ }
/// tagwire::embed_messages!(Inner);
/// ```
#[macro_export]
macro_rules! embed_messages {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::Value for $ty {
            fn encode(
                &self,
                tag: u32,
                flags: u32,
                force: bool,
                out: &mut dyn $crate::Sink,
            ) {
                debug_assert_eq!(
                    flags,
                    $crate::flags::NONE,
                    "embedded messages take no encoding flags"
                );
                $crate::codec::message::encode_embedded(tag, self, force, out);
            }

            fn decode_into(
                &mut self,
                wire_type: $crate::WireType,
                _flags: u32,
                src: &mut dyn $crate::Source,
            ) -> ::core::result::Result<(), $crate::DecodeError> {
                $crate::codec::message::decode_embedded(self, wire_type, src)
            }
        }
    )+};
}

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;

    use super::*;
    use crate::io::SliceSource;
    use crate::{parse_from_bytes, serialize_to_bytes};

    /// `message PhoneNumber { string number = 1; int32 kind = 2; }`
    #[derive(Debug, Clone, PartialEq, Default)]
    struct PhoneNumber {
        number: String,
        kind: i32,
    }

    impl Message for PhoneNumber {
        const FIELDS: Fields<Self> = &[
            &field(1, "number", |m: &PhoneNumber| &m.number, |m: &mut PhoneNumber| {
                &mut m.number
            }),
            &field(2, "kind", |m: &PhoneNumber| &m.kind, |m: &mut PhoneNumber| {
                &mut m.kind
            }),
        ];
    }

    crate::embed_messages!(PhoneNumber);

    /// `message Person { string name = 1; PhoneNumber phone = 2; }`
    #[derive(Debug, Clone, PartialEq, Default)]
    struct Person {
        name: String,
        phone: PhoneNumber,
    }

    impl Message for Person {
        const FIELDS: Fields<Self> = &[
            &field(1, "name", |m: &Person| &m.name, |m: &mut Person| &mut m.name),
            &field(2, "phone", |m: &Person| &m.phone, |m: &mut Person| &mut m.phone),
        ];
    }

    #[test]
    fn test_nested_message_roundtrip() {
        let person = Person {
            name: "Alice".to_string(),
            phone: PhoneNumber {
                number: "555-1234".to_string(),
                kind: 1,
            },
        };

        let buf = serialize_to_bytes(&person);
        let decoded: Person = parse_from_bytes(&buf).unwrap();
        assert_eq!(decoded, person);
    }

    #[test]
    fn test_default_message_is_empty() {
        let buf = serialize_to_bytes(&Person::default());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_empty_nested_message_elided() {
        // The phone is all defaults, so not even its key appears.
        let person = Person {
            name: "Bob".to_string(),
            phone: PhoneNumber::default(),
        };

        let buf = serialize_to_bytes(&person);
        assert_eq!(buf, b"\x0a\x03Bob");
    }

    #[test]
    fn test_unknown_fields_skipped() {
        // Records the decoder has no descriptor for: a varint at tag 9 and
        // a length-delimited blob at tag 10, followed by a known field.
        let mut buf = Vec::new();
        wire::encode_key(9, WireType::Varint, &mut buf);
        300u64.encode_varint(&mut buf);
        wire::encode_key(10, WireType::LengthDelimited, &mut buf);
        buf.extend_from_slice(b"\x04junk");

        let person = Person {
            name: "Carol".to_string(),
            ..Person::default()
        };
        encode_message(&person, &mut buf);

        let decoded: Person = parse_from_bytes(&buf).unwrap();
        assert_eq!(decoded.name, "Carol");
    }

    #[test]
    fn test_wire_type_mismatch_aborts() {
        // Tag 2 (phone) with a varint payload instead of length-delimited.
        let mut buf = Vec::new();
        wire::encode_key(2, WireType::Varint, &mut buf);
        5u64.encode_varint(&mut buf);

        let err = parse_from_bytes::<Person>(&buf).unwrap_err();
        assert_eq!(err, DecodeError::InvalidWireType { value: 0 });
    }

    #[test]
    fn test_truncated_embedded_body() {
        let person = Person {
            name: "Dave".to_string(),
            phone: PhoneNumber {
                number: "x".to_string(),
                kind: 2,
            },
        };
        let buf = serialize_to_bytes(&person);

        // Chop off the tail of the embedded message body.
        let err = parse_from_bytes::<Person>(&buf[..buf.len() - 2]).unwrap_err();
        assert_eq!(err, DecodeError::UnexpectedEof);
    }

    #[test]
    fn test_decode_message_merges_in_place() {
        let mut person = Person {
            name: "Eve".to_string(),
            ..Person::default()
        };

        // A second record for tag 2 merges into the existing aggregate.
        let mut buf = Vec::new();
        let phone = PhoneNumber {
            number: "777".to_string(),
            kind: 3,
        };
        encode_embedded(2, &phone, false, &mut buf);

        decode_message(&mut person, &mut SliceSource::new(&buf)).unwrap();
        assert_eq!(person.name, "Eve");
        assert_eq!(person.phone, phone);
    }
}
