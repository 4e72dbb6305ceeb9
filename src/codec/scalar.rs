//! Scalar types: integers, bool, floats.
//!
//! Integers pick their wire encoding from the descriptor's flags: plain
//! varint by default, zigzag varint under [`flags::SIGNED`], little-endian
//! fixed under [`flags::FIXED`]. Floats always use their fixed encoding.

// This module uses `as` casts which have been reviewed for correctness:
// sign extension and truncation here are the wire format's bit contract.
#![allow(clippy::as_conversions)]

use core::num::FpCategory;

use super::{expect_wire_type, flags, Value};
use crate::error::DecodeError;
use crate::io::{Sink, Source};
use crate::varint::{
    zigzag_decode_32, zigzag_decode_64, zigzag_encode_32, zigzag_encode_64, Varint,
};
use crate::wire::{self, WireType};

fn uint32_wire_type(flags: u32) -> WireType {
    debug_assert!(
        flags == flags::NONE || flags == flags::FIXED,
        "unsupported flags for uint32: {flags}"
    );
    if flags & flags::FIXED != 0 {
        WireType::Fixed32
    } else {
        WireType::Varint
    }
}

fn uint64_wire_type(flags: u32) -> WireType {
    debug_assert!(
        flags == flags::NONE || flags == flags::FIXED,
        "unsupported flags for uint64: {flags}"
    );
    if flags & flags::FIXED != 0 {
        WireType::Fixed64
    } else {
        WireType::Varint
    }
}

fn int32_wire_type(flags: u32) -> WireType {
    debug_assert!(
        flags == flags::NONE || flags == flags::SIGNED || flags == (flags::SIGNED | flags::FIXED),
        "unsupported flags for int32: {flags}"
    );
    if flags & flags::FIXED != 0 {
        WireType::Fixed32
    } else {
        WireType::Varint
    }
}

fn int64_wire_type(flags: u32) -> WireType {
    debug_assert!(
        flags == flags::NONE || flags == flags::SIGNED || flags == (flags::SIGNED | flags::FIXED),
        "unsupported flags for int64: {flags}"
    );
    if flags & flags::FIXED != 0 {
        WireType::Fixed64
    } else {
        WireType::Varint
    }
}

impl Value for u64 {
    const PACKABLE: bool = true;

    #[inline]
    fn encode(&self, tag: u32, flags: u32, force: bool, out: &mut dyn Sink) {
        if !force && *self == 0 {
            return;
        }
        wire::encode_key(tag, uint64_wire_type(flags), out);
        self.encode_packed(flags, out);
    }

    #[inline]
    fn decode_into(
        &mut self,
        wire_type: WireType,
        flags: u32,
        src: &mut dyn Source,
    ) -> Result<(), DecodeError> {
        expect_wire_type(wire_type, uint64_wire_type(flags))?;
        self.decode_packed(flags, src)
    }

    #[inline]
    fn encode_packed(&self, flags: u32, out: &mut dyn Sink) {
        if flags & flags::FIXED != 0 {
            wire::write_fixed64(*self, out);
        } else {
            self.encode_varint(out);
        }
    }

    #[inline]
    fn decode_packed(&mut self, flags: u32, src: &mut dyn Source) -> Result<(), DecodeError> {
        *self = if flags & flags::FIXED != 0 {
            wire::read_fixed64(src)?
        } else {
            u64::decode_varint(src)?
        };
        Ok(())
    }
}

impl Value for u32 {
    const PACKABLE: bool = true;

    #[inline]
    fn encode(&self, tag: u32, flags: u32, force: bool, out: &mut dyn Sink) {
        if !force && *self == 0 {
            return;
        }
        wire::encode_key(tag, uint32_wire_type(flags), out);
        self.encode_packed(flags, out);
    }

    #[inline]
    fn decode_into(
        &mut self,
        wire_type: WireType,
        flags: u32,
        src: &mut dyn Source,
    ) -> Result<(), DecodeError> {
        expect_wire_type(wire_type, uint32_wire_type(flags))?;
        self.decode_packed(flags, src)
    }

    #[inline]
    fn encode_packed(&self, flags: u32, out: &mut dyn Sink) {
        if flags & flags::FIXED != 0 {
            wire::write_fixed32(*self, out);
        } else {
            self.encode_varint(out);
        }
    }

    #[inline]
    fn decode_packed(&mut self, flags: u32, src: &mut dyn Source) -> Result<(), DecodeError> {
        *self = if flags & flags::FIXED != 0 {
            wire::read_fixed32(src)?
        } else {
            u32::decode_varint(src)?
        };
        Ok(())
    }
}

impl Value for i64 {
    const PACKABLE: bool = true;

    #[inline]
    fn encode(&self, tag: u32, flags: u32, force: bool, out: &mut dyn Sink) {
        if !force && *self == 0 {
            return;
        }
        wire::encode_key(tag, int64_wire_type(flags), out);
        self.encode_packed(flags, out);
    }

    #[inline]
    fn decode_into(
        &mut self,
        wire_type: WireType,
        flags: u32,
        src: &mut dyn Source,
    ) -> Result<(), DecodeError> {
        expect_wire_type(wire_type, int64_wire_type(flags))?;
        self.decode_packed(flags, src)
    }

    #[inline]
    fn encode_packed(&self, flags: u32, out: &mut dyn Sink) {
        if flags & flags::SIGNED != 0 {
            if flags & flags::FIXED != 0 {
                wire::write_fixed64(*self as u64, out);
            } else {
                zigzag_encode_64(*self).encode_varint(out);
            }
        } else {
            (*self as u64).encode_varint(out);
        }
    }

    #[inline]
    fn decode_packed(&mut self, flags: u32, src: &mut dyn Source) -> Result<(), DecodeError> {
        *self = if flags & flags::SIGNED != 0 {
            if flags & flags::FIXED != 0 {
                wire::read_fixed64(src)? as i64
            } else {
                zigzag_decode_64(u64::decode_varint(src)?)
            }
        } else {
            u64::decode_varint(src)? as i64
        };
        Ok(())
    }
}

impl Value for i32 {
    const PACKABLE: bool = true;

    #[inline]
    fn encode(&self, tag: u32, flags: u32, force: bool, out: &mut dyn Sink) {
        if !force && *self == 0 {
            return;
        }
        wire::encode_key(tag, int32_wire_type(flags), out);
        self.encode_packed(flags, out);
    }

    #[inline]
    fn decode_into(
        &mut self,
        wire_type: WireType,
        flags: u32,
        src: &mut dyn Source,
    ) -> Result<(), DecodeError> {
        expect_wire_type(wire_type, int32_wire_type(flags))?;
        self.decode_packed(flags, src)
    }

    #[inline]
    fn encode_packed(&self, flags: u32, out: &mut dyn Sink) {
        if flags & flags::SIGNED != 0 {
            if flags & flags::FIXED != 0 {
                wire::write_fixed32(*self as u32, out);
            } else {
                zigzag_encode_32(*self).encode_varint(out);
            }
        } else {
            // Negative values sign-extend to a ten-byte varint.
            (*self as i64 as u64).encode_varint(out);
        }
    }

    #[inline]
    fn decode_packed(&mut self, flags: u32, src: &mut dyn Source) -> Result<(), DecodeError> {
        *self = if flags & flags::SIGNED != 0 {
            if flags & flags::FIXED != 0 {
                wire::read_fixed32(src)? as i32
            } else {
                zigzag_decode_32(u32::decode_varint(src)?)
            }
        } else {
            u64::decode_varint(src)? as i32
        };
        Ok(())
    }
}

impl Value for bool {
    const PACKABLE: bool = true;

    #[inline]
    fn encode(&self, tag: u32, flags: u32, force: bool, out: &mut dyn Sink) {
        debug_assert_eq!(flags, flags::NONE, "bool takes no encoding flags");
        if !force && !*self {
            return;
        }
        wire::encode_key(tag, WireType::Varint, out);
        self.encode_packed(flags, out);
    }

    #[inline]
    fn decode_into(
        &mut self,
        wire_type: WireType,
        flags: u32,
        src: &mut dyn Source,
    ) -> Result<(), DecodeError> {
        expect_wire_type(wire_type, WireType::Varint)?;
        self.decode_packed(flags, src)
    }

    #[inline]
    fn encode_packed(&self, _flags: u32, out: &mut dyn Sink) {
        u32::from(*self).encode_varint(out);
    }

    #[inline]
    fn decode_packed(&mut self, _flags: u32, src: &mut dyn Source) -> Result<(), DecodeError> {
        *self = u64::decode_varint(src)? != 0;
        Ok(())
    }
}

impl Value for f32 {
    const PACKABLE: bool = true;

    #[inline]
    fn encode(&self, tag: u32, flags: u32, force: bool, out: &mut dyn Sink) {
        debug_assert_eq!(flags, flags::NONE, "float takes no encoding flags");
        // Positive and negative zero are the default; NaN and infinities
        // are not and must hit the wire.
        if !force && self.classify() == FpCategory::Zero {
            return;
        }
        wire::encode_key(tag, WireType::Fixed32, out);
        self.encode_packed(flags, out);
    }

    #[inline]
    fn decode_into(
        &mut self,
        wire_type: WireType,
        flags: u32,
        src: &mut dyn Source,
    ) -> Result<(), DecodeError> {
        expect_wire_type(wire_type, WireType::Fixed32)?;
        self.decode_packed(flags, src)
    }

    #[inline]
    fn encode_packed(&self, _flags: u32, out: &mut dyn Sink) {
        wire::write_fixed32(self.to_bits(), out);
    }

    #[inline]
    fn decode_packed(&mut self, _flags: u32, src: &mut dyn Source) -> Result<(), DecodeError> {
        *self = f32::from_bits(wire::read_fixed32(src)?);
        Ok(())
    }
}

impl Value for f64 {
    const PACKABLE: bool = true;

    #[inline]
    fn encode(&self, tag: u32, flags: u32, force: bool, out: &mut dyn Sink) {
        debug_assert_eq!(flags, flags::NONE, "double takes no encoding flags");
        if !force && self.classify() == FpCategory::Zero {
            return;
        }
        wire::encode_key(tag, WireType::Fixed64, out);
        self.encode_packed(flags, out);
    }

    #[inline]
    fn decode_into(
        &mut self,
        wire_type: WireType,
        flags: u32,
        src: &mut dyn Source,
    ) -> Result<(), DecodeError> {
        expect_wire_type(wire_type, WireType::Fixed64)?;
        self.decode_packed(flags, src)
    }

    #[inline]
    fn encode_packed(&self, _flags: u32, out: &mut dyn Sink) {
        wire::write_fixed64(self.to_bits(), out);
    }

    #[inline]
    fn decode_packed(&mut self, _flags: u32, src: &mut dyn Source) -> Result<(), DecodeError> {
        *self = f64::from_bits(wire::read_fixed64(src)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::io::SliceSource;
    use crate::wire::decode_key;

    #[track_caller]
    fn roundtrip<T: Value + PartialEq + core::fmt::Debug>(value: T, flags: u32) {
        let mut buf = Vec::new();
        value.encode(1, flags, true, &mut buf);

        let mut src = SliceSource::new(&buf);
        let (tag, wire_type) = decode_key(&mut src).unwrap().unwrap();
        assert_eq!(tag, 1);

        let mut decoded = T::default();
        decoded.decode_into(wire_type, flags, &mut src).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_varint_roundtrip() {
        roundtrip(0u32, flags::NONE);
        roundtrip(127u32, flags::NONE);
        roundtrip(128u32, flags::NONE);
        roundtrip(u32::MAX, flags::NONE);

        roundtrip(0u64, flags::NONE);
        roundtrip(u64::MAX, flags::NONE);

        roundtrip(0i32, flags::NONE);
        roundtrip(-1i32, flags::NONE);
        roundtrip(i32::MIN, flags::NONE);
        roundtrip(i32::MAX, flags::NONE);

        roundtrip(0i64, flags::NONE);
        roundtrip(-1i64, flags::NONE);
        roundtrip(i64::MIN, flags::NONE);
        roundtrip(i64::MAX, flags::NONE);

        roundtrip(true, flags::NONE);
        roundtrip(false, flags::NONE);
    }

    #[test]
    fn test_zigzag_roundtrip() {
        for value in [0i32, 1, -1, i32::MIN, i32::MAX] {
            roundtrip(value, flags::SIGNED);
        }
        for value in [0i64, 1, -1, i64::MIN, i64::MAX] {
            roundtrip(value, flags::SIGNED);
        }
    }

    #[test]
    fn test_fixed_roundtrip() {
        roundtrip(0u32, flags::FIXED);
        roundtrip(u32::MAX, flags::FIXED);
        roundtrip(0u64, flags::FIXED);
        roundtrip(u64::MAX, flags::FIXED);

        roundtrip(i32::MIN, flags::SIGNED | flags::FIXED);
        roundtrip(i32::MAX, flags::SIGNED | flags::FIXED);
        roundtrip(i64::MIN, flags::SIGNED | flags::FIXED);
        roundtrip(i64::MAX, flags::SIGNED | flags::FIXED);
    }

    #[test]
    fn test_float_roundtrip() {
        for value in [0.0f32, -0.0, 1.0, -1.0, f32::MIN, f32::MAX, f32::INFINITY] {
            roundtrip(value, flags::NONE);
        }
        for value in [0.0f64, -0.0, 1.0, -1.0, f64::MIN, f64::MAX, f64::INFINITY] {
            roundtrip(value, flags::NONE);
        }
    }

    #[test]
    fn test_default_elision() {
        let mut buf = Vec::new();
        0i32.encode(1, flags::NONE, false, &mut buf);
        0u64.encode(2, flags::NONE, false, &mut buf);
        false.encode(3, flags::NONE, false, &mut buf);
        0.0f64.encode(4, flags::NONE, false, &mut buf);
        (-0.0f32).encode(5, flags::NONE, false, &mut buf);
        0i32.encode(6, flags::SIGNED | flags::FIXED, false, &mut buf);
        assert!(buf.is_empty());

        // NaN is not the default and must be emitted.
        let mut buf = Vec::new();
        f64::NAN.encode(1, flags::NONE, false, &mut buf);
        assert_eq!(buf.len(), 9);
    }

    #[test]
    fn test_forced_zero_is_emitted() {
        let mut buf = Vec::new();
        0i32.encode(1, flags::NONE, true, &mut buf);
        assert_eq!(buf, [0x08, 0x00]);
    }

    #[test]
    fn test_int32_vectors() {
        // Field 1, value 150: the classic encoding-guide example.
        let mut buf = Vec::new();
        150i32.encode(1, flags::NONE, false, &mut buf);
        assert_eq!(buf, [0x08, 0x96, 0x01]);

        // sint32 -1 zigzags to 1.
        let mut buf = Vec::new();
        (-1i32).encode(1, flags::SIGNED, false, &mut buf);
        assert_eq!(buf, [0x08, 0x01]);

        // Plain -1 sign-extends to ten bytes.
        let mut buf = Vec::new();
        (-1i32).encode(1, flags::NONE, false, &mut buf);
        assert_eq!(
            buf,
            [0x08, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01]
        );
    }

    #[test]
    fn test_wire_type_mismatch() {
        let mut src = SliceSource::new(&[0x01, 0x02, 0x03, 0x04]);
        let mut value = 0i32;
        let err = value
            .decode_into(WireType::Fixed32, flags::NONE, &mut src)
            .unwrap_err();
        assert_eq!(err, DecodeError::InvalidWireType { value: 5 });
    }
}
