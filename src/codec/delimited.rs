//! Length-delimited scalar types: strings and byte blobs.

use alloc::string::String;
use alloc::vec::Vec;

use super::{expect_wire_type, flags, Value};
use crate::error::DecodeError;
use crate::io::{Sink, Source};
use crate::util::CastFrom;
use crate::varint::Varint;
use crate::wire::{self, WireType};

/// Cap on the chunk size used while reading a length-delimited payload.
///
/// A hostile length prefix can claim gigabytes; reading in bounded chunks
/// means allocation only ever grows as fast as real bytes arrive.
const READ_CHUNK: usize = 4096;

/// Reads exactly `len` payload bytes, in bounded chunks.
pub(crate) fn read_delimited(src: &mut dyn Source, len: usize) -> Result<Vec<u8>, DecodeError> {
    let mut data = Vec::with_capacity(len.min(READ_CHUNK));
    let mut remaining = len;
    while remaining > 0 {
        let chunk = remaining.min(READ_CHUNK);
        let start = data.len();
        data.resize(start + chunk, 0);
        let n = src.read(&mut data[start..]);
        if n == 0 {
            return Err(DecodeError::UnexpectedEof);
        }
        data.truncate(start + n);
        remaining -= n;
    }
    Ok(data)
}

fn encode_bytes(tag: u32, payload: &[u8], force: bool, out: &mut dyn Sink) {
    if !force && payload.is_empty() {
        return;
    }
    wire::encode_key(tag, WireType::LengthDelimited, out);
    u64::cast_from(payload.len()).encode_varint(out);
    out.write(payload);
}

impl Value for String {
    fn encode(&self, tag: u32, flags: u32, force: bool, out: &mut dyn Sink) {
        debug_assert_eq!(flags, flags::NONE, "string takes no encoding flags");
        encode_bytes(tag, self.as_bytes(), force, out);
    }

    fn decode_into(
        &mut self,
        wire_type: WireType,
        _flags: u32,
        src: &mut dyn Source,
    ) -> Result<(), DecodeError> {
        expect_wire_type(wire_type, WireType::LengthDelimited)?;
        let len = wire::decode_len(src)?;
        let data = read_delimited(src, len)?;
        *self = String::from_utf8(data).map_err(|_| DecodeError::InvalidUtf8)?;
        Ok(())
    }
}

impl Value for bytes::Bytes {
    fn encode(&self, tag: u32, flags: u32, force: bool, out: &mut dyn Sink) {
        debug_assert_eq!(flags, flags::NONE, "bytes takes no encoding flags");
        encode_bytes(tag, self, force, out);
    }

    fn decode_into(
        &mut self,
        wire_type: WireType,
        _flags: u32,
        src: &mut dyn Source,
    ) -> Result<(), DecodeError> {
        expect_wire_type(wire_type, WireType::LengthDelimited)?;
        let len = wire::decode_len(src)?;
        *self = bytes::Bytes::from(read_delimited(src, len)?);
        Ok(())
    }
}
