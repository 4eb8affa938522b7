//
// Copyright 2026 DATO Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

use std::fmt::{self, Display};

pub type Result<T> = std::result::Result<T, Error>;

/// The length-field class a write-time overflow was detected in.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum LengthClass {
    KeyLength,
    ObjectSize,
    ArrayLength,
    ValueLength,
}

impl Display for LengthClass {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LengthClass::KeyLength => formatter.write_str("key length"),
            LengthClass::ObjectSize => formatter.write_str("object size"),
            LengthClass::ArrayLength => formatter.write_str("array length"),
            LengthClass::ValueLength => formatter.write_str("value length"),
        }
    }
}

/// The specific reason a buffer was rejected as malformed.
///
/// Every parse failure collapses to a single observable "malformed
/// buffer" error kind at the top level; this enum is the diagnostic
/// detail behind that kind, kept around for error messages even though
/// callers usually only care that parsing failed.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum MalformedKind {
    /// The buffer is too short to hold a header.
    TruncatedHeader,
    /// The magic prefix bytes did not match the expected prefix.
    PrefixMismatch,
    /// The config-id byte does not name a config this reader accepts.
    UnknownConfig(u8),
    /// The buffer is too short to hold the root offset slot.
    TruncatedRoot,
    /// The root offset does not leave room for a minimal value body.
    InvalidRootOffset,
    /// A pointer dereference (key or value) fell outside the buffer.
    OffsetOutOfBounds,
    /// A type tag byte did not name one of the 17 known value types.
    UnknownTypeTag(u8),
    /// A container's declared length does not fit in the buffer.
    TruncatedContainer,
    /// A string's declared length does not leave room for its NUL.
    TruncatedString,
    /// A Vector/VectorArray's declared subtype did not match the
    /// caller's requested element type.
    SubtypeMismatch { expected: u8, found: u8 },
    /// A Vector/VectorArray's declared element count did not match the
    /// caller's expectation.
    ElementCountMismatch { expected: u8, found: u8 },
}

impl Display for MalformedKind {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MalformedKind::TruncatedHeader => formatter.write_str("buffer too short for a DATO header"),
            MalformedKind::PrefixMismatch => formatter.write_str("magic prefix does not match"),
            MalformedKind::UnknownConfig(id) => write!(formatter, "unknown length-encoding config id {}", id),
            MalformedKind::TruncatedRoot => formatter.write_str("buffer too short for the root offset slot"),
            MalformedKind::InvalidRootOffset => formatter.write_str("root offset leaves no room for a value body"),
            MalformedKind::OffsetOutOfBounds => formatter.write_str("offset falls outside the buffer"),
            MalformedKind::UnknownTypeTag(t) => write!(formatter, "unknown value type tag {}", t),
            MalformedKind::TruncatedContainer => formatter.write_str("container length exceeds the buffer"),
            MalformedKind::TruncatedString => formatter.write_str("string length exceeds the buffer"),
            MalformedKind::SubtypeMismatch { expected, found } => {
                write!(formatter, "expected vector subtype {}, found {}", expected, found)
            }
            MalformedKind::ElementCountMismatch { expected, found } => {
                write!(formatter, "expected {} vector elements, found {}", expected, found)
            }
        }
    }
}

/// A DATO reader or writer error.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Error {
    /// The buffer being read is malformed in some way; see `MalformedKind`.
    Malformed(MalformedKind),
    /// A value was coerced to a type its tag does not match.
    TypeMismatch { expected: &'static str, found: &'static str },
    /// A length value did not fit in the field's chosen encoding.
    LengthOverflow { class: LengthClass, value: u32 },
    /// A map or array requested more entries than fit in a `u32`.
    TooManyEntries,
}

impl Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Malformed(kind) => write!(formatter, "malformed buffer: {}", kind),
            Error::TypeMismatch { expected, found } => {
                write!(formatter, "expected a {} value, found {}", expected, found)
            }
            Error::LengthOverflow { class, value } => {
                write!(formatter, "{} {} does not fit in its configured encoding", class, value)
            }
            Error::TooManyEntries => formatter.write_str("entry count exceeds u32::MAX"),
        }
    }
}

impl std::error::Error for Error {}
