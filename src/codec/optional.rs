//! Optional fields.
//!
//! `None` emits nothing at all. A populated optional defers to the inner
//! type's encoding, default elision included, so `Some(0)` also leaves no
//! bytes behind and comes back as `None`. Presence on the wire is what
//! flips the option to `Some` during decoding.

use super::Value;
use crate::error::DecodeError;
use crate::io::{Sink, Source};
use crate::wire::WireType;

impl<T: Value> Value for Option<T> {
    #[inline]
    fn encode(&self, tag: u32, flags: u32, force: bool, out: &mut dyn Sink) {
        if let Some(value) = self {
            value.encode(tag, flags, force, out);
        }
    }

    #[inline]
    fn decode_into(
        &mut self,
        wire_type: WireType,
        flags: u32,
        src: &mut dyn Source,
    ) -> Result<(), DecodeError> {
        let mut value = T::default();
        value.decode_into(wire_type, flags, src)?;
        *self = Some(value);
        Ok(())
    }
}
