//! Descriptor-driven codec for the Protocol Buffers binary wire format.
//!
//! Instead of generating code from `.proto` files, a message type lists
//! its own field descriptors: each one binds a tag number, an encoding
//! flag set, and a pair of accessors. The codec walks that list to emit
//! standard proto3 wire bytes and to parse them back, with default
//! elision, packed repeated fields, maps, oneofs, and embedded messages.
//!
//! I/O happens through the two traits in [`io`]: a [`Sink`] that accepts
//! byte slices and a [`Source`] that yields them. No files, no schema
//! registry, no RPC; the crate is purely in-process.

#![no_std]
#![deny(clippy::as_conversions)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod codec;
pub mod error;
pub mod io;
pub mod varint;
pub mod wire;

mod util;

use alloc::vec::Vec;

pub use codec::{
    field, field_with, flags, map_field, map_field_with, oneof_field, oneof_field_with,
    Enumeration, Field, Fields, MapContainer, MapField, Message, OneofField, PlainField, Value,
};
pub use error::DecodeError;
pub use io::{LimitedSource, SizeSink, Sink, SliceSource, Source};
pub use wire::WireType;

/// Encodes `value` into the provided sink.
pub fn serialize_into<M: Message>(value: &M, out: &mut dyn Sink) {
    codec::message::encode_message(value, out);
}

/// Encodes `value` into a freshly allocated buffer.
pub fn serialize_to_bytes<M: Message>(value: &M) -> Vec<u8> {
    let mut out = Vec::new();
    serialize_into(value, &mut out);
    out
}

/// Returns the number of bytes [`serialize_to_bytes`] would produce,
/// without producing them.
pub fn encoded_len<M: Message>(value: &M) -> usize {
    let mut sizer = SizeSink::new();
    serialize_into(value, &mut sizer);
    sizer.len()
}

/// Decodes fields from `src` into `value` until end-of-stream.
///
/// Fields already present in `value` follow protobuf merge semantics:
/// scalars are overwritten, repeated fields appended, map entries
/// inserted.
pub fn parse_into<M: Message>(value: &mut M, src: &mut dyn Source) -> Result<(), DecodeError> {
    codec::message::decode_message(value, src)
}

/// Decodes a message from a byte buffer.
pub fn parse_from_bytes<M: Message>(bytes: &[u8]) -> Result<M, DecodeError> {
    let mut value = M::default();
    parse_into(&mut value, &mut SliceSource::new(bytes))?;
    Ok(value)
}
