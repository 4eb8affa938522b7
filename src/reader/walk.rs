//
// Copyright 2026 DATO Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # The visitor-driven full walk.
//!
//! `DynamicAccessor::iterate` dispatches on the accessor's type tag
//! and re-enters for every container element.

use crate::error::Error;
use crate::layout::{Subtype, ValueType};
use crate::length::FieldConfig;
use crate::primitive;
use crate::reader::accessor::DynamicAccessor;
use crate::visitor::Visitor;

impl<'a, C: FieldConfig> DynamicAccessor<'a, C> {
    /// Walks this value and everything reachable from it, invoking
    /// one visitor event per value.
    pub fn iterate<V: Visitor>(&self, visitor: &mut V) -> Result<(), Error> {
        match self.get_type() {
            ValueType::Null => visitor.on_value_null(),
            ValueType::Bool => visitor.on_value_bool(self.as_bool()?),
            ValueType::S32 => visitor.on_value_s32(self.as_s32()?),
            ValueType::U32 => visitor.on_value_u32(self.as_u32()?),
            ValueType::F32 => visitor.on_value_f32(self.as_f32()?),
            ValueType::S64 => visitor.on_value_s64(self.as_s64()?),
            ValueType::U64 => visitor.on_value_u64(self.as_u64()?),
            ValueType::F64 => visitor.on_value_f64(self.as_f64()?),

            ValueType::Array => {
                let array = self.as_array()?;
                visitor.begin_array(array.len());
                for i in 0..array.len() {
                    visitor.begin_array_index(i);
                    array.get(i)?.iterate(visitor)?;
                    visitor.end_array_index();
                }
                visitor.end_array();
            }

            ValueType::StringMap => {
                let map = self.as_string_map()?;
                visitor.begin_map(ValueType::StringMap, map.len());
                for i in 0..map.len() {
                    let key = map.key_string(i)?;
                    visitor.begin_string_key(key);
                    map.value_at(i)?.iterate(visitor)?;
                    visitor.end_string_key();
                }
                visitor.end_map(ValueType::StringMap);
            }

            ValueType::IntMap => {
                let map = self.as_int_map()?;
                visitor.begin_map(ValueType::IntMap, map.len());
                for i in 0..map.len() {
                    let key = map.key_int(i)?;
                    visitor.begin_int_key(key);
                    map.value_at(i)?.iterate(visitor)?;
                    visitor.end_int_key();
                }
                visitor.end_map(ValueType::IntMap);
            }

            ValueType::String8 => {
                let s = self.as_string8()?;
                visitor.on_value_string8(s.as_bytes()?);
            }
            ValueType::String16 => {
                let s = self.as_string16()?;
                let mut units = Vec::with_capacity(s.len() as usize);
                for i in 0..s.len() {
                    units.push(s.get(i)?);
                }
                visitor.on_value_string16(&units);
            }
            ValueType::String32 => {
                let s = self.as_string32()?;
                let mut units = Vec::with_capacity(s.len() as usize);
                for i in 0..s.len() {
                    units.push(s.get(i)?);
                }
                visitor.on_value_string32(&units);
            }

            ValueType::ByteArray => visitor.on_value_byte_array(self.as_byte_array()?),

            ValueType::Vector => {
                let (subtype, elem_count, data) = self.vector_raw_parts()?;
                visitor.on_value_vector(subtype, elem_count, data);
            }

            ValueType::VectorArray => {
                let (subtype, elem_count, data, length) = self.vector_array_raw_parts()?;
                visitor.on_value_vector_array(subtype, elem_count, data, length);
            }
        }
        Ok(())
    }

    /// Raw `(subtype, elemCount, element bytes)` for a `Vector`,
    /// without committing to a concrete `VectorElement` type — used by
    /// `iterate` to hand the visitor untyped bytes exactly as
    /// `OnValueVector` describes.
    fn vector_raw_parts(&self) -> Result<(Subtype, u8, &'a [u8]), Error> {
        let buf = self.reader().buf;
        let pos = self.raw() as usize;
        let subtype = Subtype::from_tag(primitive::read_u8(buf, pos)?)?;
        let elem_count = primitive::read_u8(buf, pos + 1)?;
        let data = primitive::read_bytes(buf, pos + 2, elem_count as usize * subtype.element_size() as usize)?;
        Ok((subtype, elem_count, data))
    }

    fn vector_array_raw_parts(&self) -> Result<(Subtype, u8, &'a [u8], u32), Error> {
        let buf = self.reader().buf;
        let pos = self.raw() as usize;
        let subtype = Subtype::from_tag(primitive::read_u8(buf, pos)?)?;
        let elem_count = primitive::read_u8(buf, pos + 1)?;
        let (length, width) = self.reader().config.value_length().read(buf, pos + 2)?;
        let data_pos = pos + 2 + width;
        let total = length as usize * elem_count as usize * subtype.element_size() as usize;
        let data = primitive::read_bytes(buf, data_pos, total)?;
        Ok((subtype, elem_count, data, length))
    }
}
