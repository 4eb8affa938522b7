//
// Copyright 2026 DATO Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # The full-walk visitor contract.
//!
//! `Visitor` receives one event per value reachable from a
//! `DynamicAccessor::iterate` call. Every method has a default no-op
//! body so an implementor only overrides the events it cares about,
//! the way a dump/debug visitor would only care about a handful.

use crate::layout::{Subtype, ValueType};

/// Receives one event per value during a full buffer walk.
///
/// Containers are bracketed: a map emits `begin_map`, then one
/// `begin_*_key`/`end_*_key` pair per entry (around the entry's
/// value events), then `end_map`; an array emits `begin_array`, then
/// one `begin_array_index`/`end_array_index` pair per element, then
/// `end_array`.
pub trait Visitor {
    fn begin_map(&mut self, _map_type: ValueType, _len: u32) {}
    fn end_map(&mut self, _map_type: ValueType) {}

    fn begin_string_key(&mut self, _key: &[u8]) {}
    fn end_string_key(&mut self) {}

    fn begin_int_key(&mut self, _key: u32) {}
    fn end_int_key(&mut self) {}

    fn begin_array(&mut self, _len: u32) {}
    fn end_array(&mut self) {}

    fn begin_array_index(&mut self, _index: u32) {}
    fn end_array_index(&mut self) {}

    fn on_value_null(&mut self) {}
    fn on_value_bool(&mut self, _value: bool) {}
    fn on_value_s32(&mut self, _value: i32) {}
    fn on_value_u32(&mut self, _value: u32) {}
    fn on_value_f32(&mut self, _value: f32) {}
    fn on_value_s64(&mut self, _value: i64) {}
    fn on_value_u64(&mut self, _value: u64) {}
    fn on_value_f64(&mut self, _value: f64) {}

    /// `String8` — one byte per code unit.
    fn on_value_string8(&mut self, _bytes: &[u8]) {}
    /// `String16` — little-endian `u16` code units.
    fn on_value_string16(&mut self, _units: &[u16]) {}
    /// `String32` — little-endian `u32` code units.
    fn on_value_string32(&mut self, _units: &[u32]) {}

    fn on_value_byte_array(&mut self, _data: &[u8]) {}

    /// Raw little-endian element bytes; `subtype`/`elem_count` name
    /// the type and length the caller should interpret them as.
    fn on_value_vector(&mut self, _subtype: Subtype, _elem_count: u8, _data: &[u8]) {}

    /// As `on_value_vector`, with an outer `length` of `elem_count`-
    /// sized tuples.
    fn on_value_vector_array(&mut self, _subtype: Subtype, _elem_count: u8, _data: &[u8], _length: u32) {}

    /// Reached only for a type tag this crate does not recognize
    /// (outside 0..=16); see DESIGN.md for why normal traversal never
    /// reaches this in Checked mode.
    fn on_unknown_value(&mut self, _type_tag: u8, _embedded: u32, _buffer: &[u8]) {}
}
