//! Repeated fields.
//!
//! A repeated field of a packable element type (anything with a fixed or
//! varint payload) is emitted packed: a single key, a length prefix
//! measured by a sizing pass, then the concatenated element payloads.
//! Strings, bytes, and embedded messages cannot pack and fall back to one
//! keyed record per element.

use alloc::vec::Vec;

use super::Value;
use crate::error::DecodeError;
use crate::io::{LimitedSource, SizeSink, Sink, Source};
use crate::util::CastFrom;
use crate::varint::Varint;
use crate::wire::{self, WireType};

impl<T: Value> Value for Vec<T> {
    fn encode(&self, tag: u32, flags: u32, _force: bool, out: &mut dyn Sink) {
        if self.is_empty() {
            return;
        }

        if T::PACKABLE {
            wire::encode_key(tag, WireType::LengthDelimited, out);

            let mut sizer = SizeSink::new();
            for item in self {
                item.encode_packed(flags, &mut sizer);
            }
            u64::cast_from(sizer.len()).encode_varint(out);

            for item in self {
                item.encode_packed(flags, out);
            }
        } else {
            // One record per element, forced: an empty string or empty
            // message is still an element and must occupy a record.
            for item in self {
                item.encode(tag, flags, true, out);
            }
        }
    }

    fn decode_into(
        &mut self,
        wire_type: WireType,
        flags: u32,
        src: &mut dyn Source,
    ) -> Result<(), DecodeError> {
        if T::PACKABLE && wire_type == WireType::LengthDelimited {
            let len = wire::decode_len(src)?;
            let mut limited = LimitedSource::new(src, len);
            while limited.available() > 0 {
                let mut item = T::default();
                item.decode_packed(flags, &mut limited)?;
                self.push(item);
            }
            Ok(())
        } else {
            // Unpacked record, one element per key occurrence.
            let mut item = T::default();
            item.decode_into(wire_type, flags, src)?;
            self.push(item);
            Ok(())
        }
    }
}
