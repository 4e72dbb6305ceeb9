use core::fmt;

/// Reasons a decode can fail.
///
/// Encoding is infallible; every error here originates while reading the
/// wire format. The variants are deliberately small and `Copy` so decode
/// hot paths can return them in registers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The low three bits of a field key held a value outside `0..=5`.
    InvalidWireType { value: u8 },
    /// A field key decoded to tag 0, which the wire format reserves.
    InvalidTag,
    /// A varint ran past its maximum byte count without terminating.
    InvalidVarint,
    /// The source ended in the middle of a field.
    UnexpectedEof,
    /// A length prefix does not fit in platform addressable memory.
    LengthOverflow { value: u64 },
    /// A `string` field held bytes that are not valid UTF-8.
    InvalidUtf8,
    /// Wire types 3 and 4 (groups) are deprecated and unsupported.
    DeprecatedGroupEncoding,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::InvalidWireType { value } => {
                write!(f, "invalid 'wire type' value: {value}")
            }
            DecodeError::InvalidTag => {
                write!(f, "field tag out of range")
            }
            DecodeError::InvalidVarint => {
                write!(f, "malformed varint")
            }
            DecodeError::UnexpectedEof => {
                write!(f, "unexpected end of input")
            }
            DecodeError::LengthOverflow { value } => {
                write!(
                    f,
                    "length prefix {value} exceeds platform addressable memory"
                )
            }
            DecodeError::InvalidUtf8 => {
                write!(f, "invalid UTF-8 in string field")
            }
            DecodeError::DeprecatedGroupEncoding => {
                write!(f, "deprecated group encoding not supported")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}
