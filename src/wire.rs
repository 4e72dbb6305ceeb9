//! Wire format primitives for Google's Protocol Buffers, aka
//! [protobuf](https://protobuf.dev).
//!
//! Every field in an encoded message is preceded by a key: the varint
//! `(tag << 3) | wire_type`. This module covers the key, the fixed-width
//! scalar encodings, and skipping over fields the decoder does not know.

// This module uses `as` casts which have been reviewed for correctness.
#![allow(clippy::as_conversions)]

use crate::error::DecodeError;
use crate::io::{read_byte, Sink, Source};
use crate::varint::Varint;

/// Minimum value of a protobuf tag.
pub const MINIMUM_TAG: u32 = 1;
/// Maximum value of a protobuf tag.
pub const MAXIMUM_TAG: u32 = (1 << 29) - 1;

/// Denotes the shape of a field's payload in an encoded message.
///
/// Follows the "Message Structure" section of
/// <https://protobuf.dev/programming-guides/encoding>.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum WireType {
    /// Variable length integer.
    ///
    /// Used for: `int32`, `int64`, `uint32`, `uint64`, `sint32`, `sint64`,
    /// `bool`, `enum`.
    Varint = 0,
    /// 64-bit little-endian value.
    ///
    /// Used for: `fixed64`, `sfixed64`, `double`.
    Fixed64 = 1,
    /// Length-prefixed bytes.
    ///
    /// Used for: `string`, `bytes`, embedded messages, packed `repeated`
    /// fields, map entries.
    LengthDelimited = 2,
    /// Group start (deprecated).
    StartGroup = 3,
    /// Group end (deprecated).
    EndGroup = 4,
    /// 32-bit little-endian value.
    ///
    /// Used for: `fixed32`, `sfixed32`, `float`.
    Fixed32 = 5,
}

impl WireType {
    /// Try to decode a [`WireType`] from the low three bits of a field key.
    #[inline]
    fn try_from_val(value: u8) -> Result<Self, DecodeError> {
        match value {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::Fixed64),
            2 => Ok(WireType::LengthDelimited),
            3 => Ok(WireType::StartGroup),
            4 => Ok(WireType::EndGroup),
            5 => Ok(WireType::Fixed32),
            _ => Err(DecodeError::InvalidWireType { value }),
        }
    }

    /// Return the raw value for this [`WireType`].
    #[inline]
    pub const fn into_val(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for WireType {
    type Error = DecodeError;

    #[inline]
    fn try_from(value: u8) -> Result<Self, DecodeError> {
        WireType::try_from_val(value)
    }
}

/// Encodes the provided tag and wire type as a protobuf field key.
#[inline]
pub fn encode_key(tag: u32, wire_type: WireType, out: &mut dyn Sink) {
    debug_assert!(
        (MINIMUM_TAG..=MAXIMUM_TAG).contains(&tag),
        "field tag {tag} out of range"
    );
    ((tag << 3) | u32::from(wire_type.into_val())).encode_varint(out);
}

/// Decodes the next field key, returning `Ok(None)` on a clean
/// end-of-stream.
///
/// A stream that ends *inside* a key is an error: the distinction is what
/// lets message decoding treat end-of-stream between fields as successful
/// termination while still rejecting truncated input.
pub fn decode_key(src: &mut dyn Source) -> Result<Option<(u32, WireType)>, DecodeError> {
    let first = match read_byte(src) {
        Some(byte) => byte,
        None => return Ok(None),
    };
    let raw = u32::decode_varint_continue(first, src)?;

    let wire_type = WireType::try_from_val((raw & 0b111) as u8)?;
    let tag = raw >> 3;
    if tag < MINIMUM_TAG {
        return Err(DecodeError::InvalidTag);
    }

    Ok(Some((tag, wire_type)))
}

/// Decodes the length prefix of a length-delimited field.
#[inline]
pub fn decode_len(src: &mut dyn Source) -> Result<usize, DecodeError> {
    let len = u64::decode_varint(src)?;
    usize::try_from(len).map_err(|_| DecodeError::LengthOverflow { value: len })
}

/// Writes a `fixed32`-shaped value as 4 little-endian bytes.
#[inline]
pub fn write_fixed32(value: u32, out: &mut dyn Sink) {
    out.write(&value.to_le_bytes());
}

/// Writes a `fixed64`-shaped value as 8 little-endian bytes.
#[inline]
pub fn write_fixed64(value: u64, out: &mut dyn Sink) {
    out.write(&value.to_le_bytes());
}

/// Reads 4 little-endian bytes.
#[inline]
pub fn read_fixed32(src: &mut dyn Source) -> Result<u32, DecodeError> {
    let mut buf = [0u8; 4];
    if src.read(&mut buf) != 4 {
        return Err(DecodeError::UnexpectedEof);
    }
    Ok(u32::from_le_bytes(buf))
}

/// Reads 8 little-endian bytes.
#[inline]
pub fn read_fixed64(src: &mut dyn Source) -> Result<u64, DecodeError> {
    let mut buf = [0u8; 8];
    if src.read(&mut buf) != 8 {
        return Err(DecodeError::UnexpectedEof);
    }
    Ok(u64::from_le_bytes(buf))
}

/// Skips over a field's payload based on its wire type.
///
/// Unknown fields keep messages forwards compatible; the decoder consumes
/// their payload so the stream stays synchronized for the fields that
/// follow.
pub fn skip_field(wire_type: WireType, src: &mut dyn Source) -> Result<(), DecodeError> {
    match wire_type {
        WireType::Varint => {
            u64::decode_varint(src)?;
            Ok(())
        }
        WireType::Fixed64 => {
            read_fixed64(src)?;
            Ok(())
        }
        WireType::LengthDelimited => {
            let len = decode_len(src)?;
            discard(src, len)
        }
        WireType::StartGroup | WireType::EndGroup => Err(DecodeError::DeprecatedGroupEncoding),
        WireType::Fixed32 => {
            read_fixed32(src)?;
            Ok(())
        }
    }
}

/// Reads and drops `len` bytes.
fn discard(src: &mut dyn Source, mut len: usize) -> Result<(), DecodeError> {
    let mut scratch = [0u8; 64];
    while len > 0 {
        let want = len.min(scratch.len());
        let n = src.read(&mut scratch[..want]);
        if n == 0 {
            return Err(DecodeError::UnexpectedEof);
        }
        len -= n;
    }
    Ok(())
}
