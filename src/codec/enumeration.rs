//! Enumerations.
//!
//! Protobuf enums travel as plain varints of their underlying integer.
//! The [`enumeration!`](crate::enumeration) macro declares a Rust enum
//! together with its wire conversions; the first variant must be the zero
//! value and doubles as the default, per proto3.

/// Conversion between an enum and its underlying wire integer.
pub trait Enumeration: Copy + Default {
    /// Converts from the wire integer. Unknown values map to the zero
    /// variant: a fieldless Rust enum has nowhere to keep an arbitrary
    /// discriminant.
    fn from_raw(raw: i32) -> Self;

    /// The underlying wire integer.
    fn into_raw(self) -> i32;
}

/// Declares a protobuf enumeration.
///
/// Expands to the enum itself plus [`Default`], [`Enumeration`], and
/// [`Value`](crate::Value) impls. The first variant must be `= 0`.
///
/// ```
/// tagwire::enumeration! {
///     pub enum Corpus {
///         Universal = 0,
///         Web = 1,
///         Images = 2,
///     }
/// }
///
/// assert_eq!(Corpus::default(), Corpus::Universal);
/// ```
#[macro_export]
macro_rules! enumeration {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(#[$first_meta:meta])*
            $first:ident = $first_value:literal
            $(, $(#[$var_meta:meta])* $variant:ident = $value:literal)*
            $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[repr(i32)]
        $vis enum $name {
            $(#[$first_meta])*
            $first = $first_value,
            $($(#[$var_meta])* $variant = $value,)*
        }

        const _: () = assert!(
            $first_value == 0,
            "the first enumeration variant must be the zero value"
        );

        impl ::core::default::Default for $name {
            fn default() -> Self {
                Self::$first
            }
        }

        impl $crate::Enumeration for $name {
            fn from_raw(raw: i32) -> Self {
                match raw {
                    $($value => Self::$variant,)*
                    _ => Self::$first,
                }
            }

            #[allow(clippy::as_conversions)]
            fn into_raw(self) -> i32 {
                self as i32
            }
        }

        impl $crate::Value for $name {
            const PACKABLE: bool = true;

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
                    "enums take no encoding flags"
                );
                $crate::Value::encode(
                    &$crate::Enumeration::into_raw(*self),
                    tag,
                    flags,
                    force,
                    out,
                );
            }

            fn decode_into(
                &mut self,
                wire_type: $crate::WireType,
                flags: u32,
                src: &mut dyn $crate::Source,
            ) -> ::core::result::Result<(), $crate::DecodeError> {
                let mut raw = 0i32;
                $crate::Value::decode_into(&mut raw, wire_type, flags, src)?;
                *self = $crate::Enumeration::from_raw(raw);
                Ok(())
            }

            fn encode_packed(&self, flags: u32, out: &mut dyn $crate::Sink) {
                $crate::Value::encode_packed(&$crate::Enumeration::into_raw(*self), flags, out);
            }

            fn decode_packed(
                &mut self,
                flags: u32,
                src: &mut dyn $crate::Source,
            ) -> ::core::result::Result<(), $crate::DecodeError> {
                let mut raw = 0i32;
                $crate::Value::decode_packed(&mut raw, flags, src)?;
                *self = $crate::Enumeration::from_raw(raw);
                Ok(())
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use crate::codec::{flags, Value};
    use crate::io::SliceSource;
    use crate::wire::{decode_key, WireType};
    use crate::Enumeration;

    crate::enumeration! {
        enum Corpus {
            Universal = 0,
            Web = 1,
            Images = 2,
            News = 4,
        }
    }

    #[test]
    fn test_default_is_first_variant() {
        assert_eq!(Corpus::default(), Corpus::Universal);
        assert_eq!(Corpus::Universal.into_raw(), 0);
        assert_eq!(Corpus::News.into_raw(), 4);
    }

    #[test]
    fn test_enum_roundtrip() {
        for value in [Corpus::Universal, Corpus::Web, Corpus::Images, Corpus::News] {
            let mut buf = Vec::new();
            value.encode(1, flags::NONE, true, &mut buf);

            let mut src = SliceSource::new(&buf);
            let (_, wire_type) = decode_key(&mut src).unwrap().unwrap();
            let mut decoded = Corpus::default();
            decoded.decode_into(wire_type, flags::NONE, &mut src).unwrap();
            assert_eq!(decoded, value);
        }
    }

    #[test]
    fn test_zero_variant_elided() {
        let mut buf = Vec::new();
        Corpus::Universal.encode(1, flags::NONE, false, &mut buf);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_unknown_value_maps_to_zero() {
        // Raw value 3 has no variant.
        let mut decoded = Corpus::Web;
        let mut src = SliceSource::new(&[0x03]);
        decoded
            .decode_into(WireType::Varint, flags::NONE, &mut src)
            .unwrap();
        assert_eq!(decoded, Corpus::Universal);
    }

    #[test]
    fn test_packed_enums() {
        let values = alloc::vec![Corpus::Web, Corpus::Universal, Corpus::News];
        let mut buf = Vec::new();
        values.encode(2, flags::NONE, false, &mut buf);
        // Single key, length 3, one byte per value.
        assert_eq!(buf, [0x12, 0x03, 0x01, 0x00, 0x04]);

        let mut src = SliceSource::new(&buf);
        let (_, wire_type) = decode_key(&mut src).unwrap().unwrap();
        let mut decoded: Vec<Corpus> = Vec::new();
        decoded.decode_into(wire_type, flags::NONE, &mut src).unwrap();
        assert_eq!(decoded, values);
    }
}
