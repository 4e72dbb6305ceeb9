//! Map fields.
//!
//! A protobuf map is sugar for `repeated Entry { K key = 1; V value = 2; }`
//! where each entry is its own length-delimited record. Keys and values are
//! emitted with `force` set: zero is a perfectly good map key or value and
//! must survive the round trip, so default elision is suspended inside an
//! entry.

use alloc::collections::BTreeMap;

#[cfg(feature = "std")]
use core::hash::Hash;
#[cfg(feature = "std")]
use std::collections::HashMap;

use super::{expect_wire_type, flags, Field, Value};
use crate::error::DecodeError;
use crate::io::{LimitedSource, SizeSink, Sink, Source};
use crate::util::CastFrom;
use crate::varint::Varint;
use crate::wire::{self, WireType};

/// Tag of the key field inside a map entry.
const KEY_TAG: u32 = 1;
/// Tag of the value field inside a map entry.
const VALUE_TAG: u32 = 2;

/// An associative container usable as a protobuf map field.
///
/// Abstracts over `BTreeMap` and `HashMap` so descriptors do not care
/// which one a message uses. Entries are emitted in the container's
/// natural iteration order.
pub trait MapContainer: Default {
    type Key: Value;
    type Val: Value;

    /// Inserts one decoded entry. Duplicate keys are last-one-wins.
    fn insert_entry(&mut self, key: Self::Key, value: Self::Val);

    /// Visits every entry in the container's natural order.
    fn for_each_entry(&self, visit: &mut dyn FnMut(&Self::Key, &Self::Val));
}

impl<K, V> MapContainer for BTreeMap<K, V>
where
    K: Value + Ord,
    V: Value,
{
    type Key = K;
    type Val = V;

    fn insert_entry(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    fn for_each_entry(&self, visit: &mut dyn FnMut(&K, &V)) {
        for (key, value) in self {
            visit(key, value);
        }
    }
}

#[cfg(feature = "std")]
impl<K, V> MapContainer for HashMap<K, V>
where
    K: Value + Hash + Eq,
    V: Value,
{
    type Key = K;
    type Val = V;

    fn insert_entry(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    fn for_each_entry(&self, visit: &mut dyn FnMut(&K, &V)) {
        for (key, value) in self {
            visit(key, value);
        }
    }
}

/// Descriptor for a map field.
///
/// Unlike plain fields a map descriptor carries two flag sets, one for the
/// key encoding and one for the value encoding.
pub struct MapField<M, C: MapContainer> {
    tag: u32,
    key_flags: u32,
    value_flags: u32,
    name: &'static str,
    get: fn(&M) -> &C,
    get_mut: fn(&mut M) -> &mut C,
}

/// Builds a [`MapField`] descriptor with default key and value encodings.
pub const fn map_field<M, C: MapContainer>(
    tag: u32,
    name: &'static str,
    get: fn(&M) -> &C,
    get_mut: fn(&mut M) -> &mut C,
) -> MapField<M, C> {
    map_field_with(tag, name, flags::NONE, flags::NONE, get, get_mut)
}

/// Builds a [`MapField`] descriptor with explicit key and value flags.
pub const fn map_field_with<M, C: MapContainer>(
    tag: u32,
    name: &'static str,
    key_flags: u32,
    value_flags: u32,
    get: fn(&M) -> &C,
    get_mut: fn(&mut M) -> &mut C,
) -> MapField<M, C> {
    MapField {
        tag,
        key_flags,
        value_flags,
        name,
        get,
        get_mut,
    }
}

/// Emits one entry body: forced key at tag 1, forced value at tag 2.
fn encode_entry<K: Value, V: Value>(
    key: &K,
    value: &V,
    key_flags: u32,
    value_flags: u32,
    out: &mut dyn Sink,
) {
    key.encode(KEY_TAG, key_flags, true, out);
    value.encode(VALUE_TAG, value_flags, true, out);
}

impl<M, C: MapContainer> Field<M> for MapField<M, C> {
    fn tag(&self) -> u32 {
        self.tag
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn encode(&self, msg: &M, out: &mut dyn Sink) {
        (self.get)(msg).for_each_entry(&mut |key, value| {
            wire::encode_key(self.tag, WireType::LengthDelimited, out);

            let mut sizer = SizeSink::new();
            encode_entry(key, value, self.key_flags, self.value_flags, &mut sizer);
            u64::cast_from(sizer.len()).encode_varint(out);

            encode_entry(key, value, self.key_flags, self.value_flags, out);
        });
    }

    fn decode(
        &self,
        msg: &mut M,
        wire_type: WireType,
        src: &mut dyn Source,
    ) -> Result<(), DecodeError> {
        expect_wire_type(wire_type, WireType::LengthDelimited)?;
        let len = wire::decode_len(src)?;
        let mut limited = LimitedSource::new(src, len);

        // An entry that omits its key or value field leaves the default.
        let mut key = C::Key::default();
        let mut value = C::Val::default();

        while let Some((tag, wire_type)) = wire::decode_key(&mut limited)? {
            match tag {
                KEY_TAG => key.decode_into(wire_type, self.key_flags, &mut limited)?,
                VALUE_TAG => value.decode_into(wire_type, self.value_flags, &mut limited)?,
                _ => wire::skip_field(wire_type, &mut limited)?,
            }
        }
        if limited.available() > 0 {
            return Err(DecodeError::UnexpectedEof);
        }

        (self.get_mut)(msg).insert_entry(key, value);
        Ok(())
    }
}
