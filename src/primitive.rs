//
// Copyright 2026 DATO Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # Primitive scalar codec.
//!
//! Little-endian fixed-width load/store against an absolute byte
//! position, plus the small arithmetic helpers (`round_up`, zero-fill)
//! shared by the reader and writer. Reads are wrapped `nom` parsers in
//! the style of `de::parser::utils`, but specialized to little-endian
//! and indexed by absolute position rather than threaded through a
//! `nom` remaining-slice.

use crate::error::{Error, MalformedKind};
use crate::layout::round_up;
use nom::number::complete::{
    le_f32, le_f64, le_i16, le_i32, le_i64, le_i8, le_u16, le_u32, le_u64, le_u8,
};
use nom::IResult;

fn slice_at(buf: &[u8], pos: usize, len: usize) -> Result<&[u8], Error> {
    let end = pos
        .checked_add(len)
        .ok_or(Error::Malformed(MalformedKind::OffsetOutOfBounds))?;
    buf.get(pos..end)
        .ok_or(Error::Malformed(MalformedKind::OffsetOutOfBounds))
}

macro_rules! read_fn {
    ($name:ident, $t:ty, $parser:ident, $size:expr) => {
        /// Reads a little-endian
        #[doc = stringify!($t)]
        /// at an absolute buffer position.
        pub fn $name(buf: &[u8], pos: usize) -> Result<$t, Error> {
            let slice = slice_at(buf, pos, $size)?;
            let result: IResult<&[u8], $t> = $parser(slice);
            match result {
                Ok((_, value)) => Ok(value),
                Err(_) => Err(Error::Malformed(MalformedKind::OffsetOutOfBounds)),
            }
        }
    };
}

read_fn!(read_u8, u8, le_u8, 1);
read_fn!(read_u16, u16, le_u16, 2);
read_fn!(read_u32, u32, le_u32, 4);
read_fn!(read_u64, u64, le_u64, 8);
read_fn!(read_i8, i8, le_i8, 1);
read_fn!(read_i16, i16, le_i16, 2);
read_fn!(read_i32, i32, le_i32, 4);
read_fn!(read_i64, i64, le_i64, 8);
read_fn!(read_f32, f32, le_f32, 4);
read_fn!(read_f64, f64, le_f64, 8);

/// Reads a byte slice of `len` bytes at an absolute position, bounds-checked.
pub fn read_bytes(buf: &[u8], pos: usize, len: usize) -> Result<&[u8], Error> {
    slice_at(buf, pos, len)
}

/// Appends a little-endian encoding of `value` to `out`.
pub fn write_u8(out: &mut Vec<u8>, value: u8) {
    out.push(value);
}

pub fn write_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

pub fn write_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

pub fn write_u64(out: &mut Vec<u8>, value: u64) {
    out.extend_from_slice(&value.to_le_bytes());
}

pub fn write_i32(out: &mut Vec<u8>, value: i32) {
    out.extend_from_slice(&value.to_le_bytes());
}

pub fn write_i64(out: &mut Vec<u8>, value: i64) {
    out.extend_from_slice(&value.to_le_bytes());
}

pub fn write_f32(out: &mut Vec<u8>, value: f32) {
    out.extend_from_slice(&value.to_le_bytes());
}

pub fn write_f64(out: &mut Vec<u8>, value: f64) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Appends `n` zero bytes.
pub fn write_zeroes(out: &mut Vec<u8>, n: usize) {
    out.resize(out.len() + n, 0);
}

/// Appends zero bytes until `out.len()` reaches `target`. A no-op if
/// `out` is already at or past `target`.
pub fn write_zeroes_until(out: &mut Vec<u8>, target: usize) {
    if out.len() < target {
        out.resize(target, 0);
    }
}

/// Appends zero bytes until `out.len()` is a multiple of `align`
/// (0/1 are treated as "no padding").
pub fn pad_to_align(out: &mut Vec<u8>, align: u32) {
    if align <= 1 {
        return;
    }
    let target = round_up(out.len() as u32, align) as usize;
    write_zeroes_until(out, target);
}
