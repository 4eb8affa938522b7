//
// Copyright 2026 DATO Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # Length codec.
//!
//! A DATO buffer's four length-bearing field classes (key length,
//! object size, array length, value length) are each independently
//! encoded as one of four widths (`U8`, `U16`, `U32`, `U8X32`). The
//! header's config-id byte names a preset mapping from field class to
//! width; this module implements the four widths plus the five
//! presets and a runtime-dispatched `AdaptiveConfig` for readers that
//! don't know their config at compile time.

use crate::error::{Error, LengthClass, MalformedKind};
use crate::layout::round_up;
use crate::primitive;

/// One of the four length-field widths a config may choose for a
/// given field class.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Encoding {
    U8,
    U16,
    U32,
    U8X32,
}

impl Encoding {
    /// Reads a length value at `pos`, returning the value and the
    /// number of bytes the field occupied.
    pub fn read(self, buf: &[u8], pos: usize) -> Result<(u32, usize), Error> {
        match self {
            Encoding::U8 => Ok((primitive::read_u8(buf, pos)? as u32, 1)),
            Encoding::U16 => Ok((primitive::read_u16(buf, pos)? as u32, 2)),
            Encoding::U32 => Ok((primitive::read_u32(buf, pos)?, 4)),
            Encoding::U8X32 => {
                let tag = primitive::read_u8(buf, pos)?;
                if tag == 0xFF {
                    let value = primitive::read_u32(buf, pos + 1)?;
                    Ok((value, 5))
                } else {
                    Ok((tag as u32, 1))
                }
            }
        }
    }

    /// The width in bytes this encoding would use to write `value`.
    /// Constant for every encoding except `U8X32`.
    pub fn width_for(self, value: u32) -> usize {
        match self {
            Encoding::U8 => 1,
            Encoding::U16 => 2,
            Encoding::U32 => 4,
            Encoding::U8X32 => {
                if value < 0xFF {
                    1
                } else {
                    5
                }
            }
        }
    }

    /// Appends `value` at the current end of `out`, failing if it
    /// overflows a fixed-width encoding. Returns the number of bytes
    /// written.
    pub fn write(self, out: &mut Vec<u8>, value: u32, class: LengthClass) -> Result<usize, Error> {
        match self {
            Encoding::U8 => {
                if value > 0xFF {
                    return Err(Error::LengthOverflow { class, value });
                }
                primitive::write_u8(out, value as u8);
                Ok(1)
            }
            Encoding::U16 => {
                if value > 0xFFFF {
                    return Err(Error::LengthOverflow { class, value });
                }
                primitive::write_u16(out, value as u16);
                Ok(2)
            }
            Encoding::U32 => {
                primitive::write_u32(out, value);
                Ok(4)
            }
            Encoding::U8X32 => {
                if value < 0xFF {
                    primitive::write_u8(out, value as u8);
                    Ok(1)
                } else {
                    primitive::write_u8(out, 0xFF);
                    primitive::write_u32(out, value);
                    Ok(5)
                }
            }
        }
    }

    /// Writes `value` followed by `prefix`'s bytes, padding with zero
    /// bytes *before* the length field so that the first byte after
    /// `prefix` lands on a multiple of `align`. `align <= 1` disables
    /// padding. Returns the
    /// position in `out` where the payload (the byte after `prefix`)
    /// begins.
    pub fn write_aligned(
        self,
        out: &mut Vec<u8>,
        value: u32,
        prefix: &[u8],
        align: u32,
        class: LengthClass,
    ) -> Result<usize, Error> {
        let field_width = self.width_for(value);
        let pad = if align > 1 {
            let fixed = field_width + prefix.len();
            let start = out.len();
            let unaligned_payload_pos = start + fixed;
            round_up(unaligned_payload_pos as u32, align) as usize - unaligned_payload_pos
        } else {
            0
        };
        primitive::write_zeroes(out, pad);
        self.write(out, value, class)?;
        out.extend_from_slice(prefix);
        Ok(out.len())
    }
}

/// A length-encoding preset: which `Encoding` each of the four field
/// classes uses. Implemented once per monomorphic preset
/// (`Config0`..`Config4`) and once more for the runtime-dispatched
/// `AdaptiveConfig`.
pub trait FieldConfig: Copy {
    fn identifier(&self) -> u8;
    fn key_length(&self) -> Encoding;
    fn object_size(&self) -> Encoding;
    fn array_length(&self) -> Encoding;
    fn value_length(&self) -> Encoding;
}

macro_rules! define_config {
    ($name:ident, $id:expr, $key:expr, $obj:expr, $arr:expr, $val:expr) => {
        #[doc = concat!("Length-encoding preset ", stringify!($id), ".")]
        #[derive(Copy, Clone, Default, Eq, PartialEq, Debug)]
        pub struct $name;

        impl FieldConfig for $name {
            fn identifier(&self) -> u8 {
                $id
            }
            fn key_length(&self) -> Encoding {
                $key
            }
            fn object_size(&self) -> Encoding {
                $obj
            }
            fn array_length(&self) -> Encoding {
                $arr
            }
            fn value_length(&self) -> Encoding {
                $val
            }
        }
    };
}

define_config!(Config0, 0, Encoding::U32, Encoding::U32, Encoding::U32, Encoding::U32);
define_config!(Config1, 1, Encoding::U32, Encoding::U32, Encoding::U32, Encoding::U8X32);
define_config!(Config2, 2, Encoding::U8X32, Encoding::U8X32, Encoding::U8X32, Encoding::U8X32);
define_config!(Config3, 3, Encoding::U8, Encoding::U8, Encoding::U32, Encoding::U32);
define_config!(Config4, 4, Encoding::U8, Encoding::U8, Encoding::U8X32, Encoding::U8X32);

/// A `FieldConfig` chosen at runtime from a header's config-id byte,
/// for callers that cannot fix their config at compile time.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct AdaptiveConfig {
    id: u8,
    key_length: Encoding,
    object_size: Encoding,
    array_length: Encoding,
    value_length: Encoding,
}

impl AdaptiveConfig {
    /// Resolves `id` against the five known presets.
    pub fn from_id(id: u8) -> Result<AdaptiveConfig, Error> {
        let (key_length, object_size, array_length, value_length) = match id {
            0 => (Encoding::U32, Encoding::U32, Encoding::U32, Encoding::U32),
            1 => (Encoding::U32, Encoding::U32, Encoding::U32, Encoding::U8X32),
            2 => (Encoding::U8X32, Encoding::U8X32, Encoding::U8X32, Encoding::U8X32),
            3 => (Encoding::U8, Encoding::U8, Encoding::U32, Encoding::U32),
            4 => (Encoding::U8, Encoding::U8, Encoding::U8X32, Encoding::U8X32),
            other => return Err(Error::Malformed(MalformedKind::UnknownConfig(other))),
        };
        Ok(AdaptiveConfig {
            id,
            key_length,
            object_size,
            array_length,
            value_length,
        })
    }
}

impl FieldConfig for AdaptiveConfig {
    fn identifier(&self) -> u8 {
        self.id
    }
    fn key_length(&self) -> Encoding {
        self.key_length
    }
    fn object_size(&self) -> Encoding {
        self.object_size
    }
    fn array_length(&self) -> Encoding {
        self.array_length
    }
    fn value_length(&self) -> Encoding {
        self.value_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u8_round_trips_and_overflows() {
        let mut out = Vec::new();
        Encoding::U8.write(&mut out, 200, LengthClass::KeyLength).unwrap();
        assert_eq!(Encoding::U8.read(&out, 0).unwrap(), (200, 1));
        assert!(Encoding::U8.write(&mut out, 256, LengthClass::KeyLength).is_err());
    }

    #[test]
    fn u16_round_trips_and_overflows() {
        let mut out = Vec::new();
        Encoding::U16.write(&mut out, 60000, LengthClass::ObjectSize).unwrap();
        assert_eq!(Encoding::U16.read(&out, 0).unwrap(), (60000, 2));
        assert!(Encoding::U16.write(&mut out, 70000, LengthClass::ObjectSize).is_err());
    }

    #[test]
    fn u8x32_uses_short_form_below_0xff() {
        let mut out = Vec::new();
        Encoding::U8X32.write(&mut out, 254, LengthClass::ArrayLength).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(Encoding::U8X32.read(&out, 0).unwrap(), (254, 1));
    }

    #[test]
    fn u8x32_escapes_at_0xff_and_above() {
        let mut out = Vec::new();
        Encoding::U8X32.write(&mut out, 255, LengthClass::ArrayLength).unwrap();
        assert_eq!(out.len(), 5);
        assert_eq!(Encoding::U8X32.read(&out, 0).unwrap(), (255, 5));

        let mut out2 = Vec::new();
        Encoding::U8X32.write(&mut out2, 100_000, LengthClass::ArrayLength).unwrap();
        assert_eq!(Encoding::U8X32.read(&out2, 0).unwrap(), (100_000, 5));
    }

    #[test]
    fn write_aligned_pads_so_payload_after_prefix_is_aligned() {
        let mut out = vec![0u8; 1]; // start unaligned
        let prefix = [9u8, 9u8];
        let payload_pos = Encoding::U32
            .write_aligned(&mut out, 10, &prefix, 4, LengthClass::ValueLength)
            .unwrap();
        assert_eq!(payload_pos % 4, 0);
        // last two bytes before payload_pos must be the prefix
        assert_eq!(&out[payload_pos - 2..payload_pos], &prefix);
    }

    #[test]
    fn write_aligned_accounts_for_u8x32_actual_width() {
        let mut out = vec![0u8; 3];
        let payload_pos = Encoding::U8X32
            .write_aligned(&mut out, 100_000, &[], 4, LengthClass::ValueLength)
            .unwrap();
        assert_eq!(payload_pos % 4, 0);
    }

    #[test]
    fn write_aligned_with_align_one_never_pads() {
        let mut out = vec![0u8; 3];
        let before = out.len();
        let payload_pos = Encoding::U8.write_aligned(&mut out, 5, &[], 1, LengthClass::KeyLength).unwrap();
        assert_eq!(payload_pos, before + 1);
    }

    #[test]
    fn presets_match_the_config_table() {
        let c0 = Config0::default();
        assert_eq!(c0.identifier(), 0);
        assert_eq!(c0.key_length(), Encoding::U32);
        assert_eq!(c0.value_length(), Encoding::U32);

        let c2 = Config2::default();
        assert_eq!(c2.key_length(), Encoding::U8X32);
        assert_eq!(c2.object_size(), Encoding::U8X32);

        let c3 = Config3::default();
        assert_eq!(c3.key_length(), Encoding::U8);
        assert_eq!(c3.array_length(), Encoding::U32);

        let c4 = Config4::default();
        assert_eq!(c4.object_size(), Encoding::U8);
        assert_eq!(c4.array_length(), Encoding::U8X32);
    }

    #[test]
    fn adaptive_config_matches_each_preset() {
        for id in 0..=4u8 {
            let adaptive = AdaptiveConfig::from_id(id).unwrap();
            assert_eq!(adaptive.identifier(), id);
        }
        let adaptive0 = AdaptiveConfig::from_id(0).unwrap();
        assert_eq!(adaptive0.key_length(), Config0::default().key_length());
        let adaptive4 = AdaptiveConfig::from_id(4).unwrap();
        assert_eq!(adaptive4.array_length(), Config4::default().array_length());
    }

    #[test]
    fn adaptive_config_rejects_unknown_id() {
        assert!(AdaptiveConfig::from_id(5).is_err());
    }
}
