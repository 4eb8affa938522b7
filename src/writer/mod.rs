//
// Copyright 2026 DATO Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # Writer core.
//!
//! `Writer<C>` incrementally appends to a grow-only byte buffer and
//! hands back small `ValueRef`/`KeyRef` handles the caller threads
//! into a containing `Array`/`StringMap`/`IntMap` write. Nothing is
//! ever rewritten except the header's root slot (`set_root`).

pub mod dedup;
pub mod sort;

use crate::error::{Error, LengthClass};
use crate::layout::{round_up, Flags, ValueType, VectorElement, DEFAULT_PREFIX};
use crate::length::{AdaptiveConfig, Config0, FieldConfig};
use crate::primitive;
use dedup::DedupTable;

/// A key's location, for both key kinds. For a string
/// key, `pos` is the offset of its length prefix and `data_pos`/
/// `data_len` bound its raw bytes; for an integer key, `pos` is the
/// key's value itself and `data_pos`/`data_len` are unused.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct KeyRef {
    pub pos: u32,
    pub data_pos: u32,
    pub data_len: u32,
}

/// A written value's type and payload-or-offset.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ValueRef {
    pub ty: ValueType,
    pub pos: u32,
}

/// One map entry pending assembly into a `StringMap`/`IntMap` body.
#[derive(Copy, Clone, Debug)]
pub struct EntryRef {
    pub key: KeyRef,
    pub value: ValueRef,
}

impl EntryRef {
    pub fn for_int_key(key: u32, value: ValueRef) -> EntryRef {
        EntryRef {
            key: KeyRef {
                pos: key,
                data_pos: 0,
                data_len: 0,
            },
            value,
        }
    }

    pub fn for_string_key(key: KeyRef, value: ValueRef) -> EntryRef {
        EntryRef { key, value }
    }
}

/// Construction options for `Writer::new`: magic prefix, header flags,
/// and whether repeated string keys should be deduplicated.
#[derive(Copy, Clone, Debug)]
pub struct WriterOptions {
    pub prefix: &'static [u8],
    pub flags: u8,
    pub skip_duplicate_keys: bool,
}

impl Default for WriterOptions {
    fn default() -> WriterOptions {
        WriterOptions {
            prefix: DEFAULT_PREFIX,
            flags: Flags::ALIGNED | Flags::REL_CONT_VAL_REFS,
            skip_duplicate_keys: true,
        }
    }
}

/// An incrementally-built DATO buffer under length-encoding config `C`.
pub struct Writer<C: FieldConfig> {
    builder: Vec<u8>,
    config: C,
    flags: Flags,
    root_type_pos: usize,
    root_slot_pos: usize,
    dedup: Option<DedupTable>,
}

impl<C: FieldConfig> Writer<C> {
    /// Writes the header (prefix, config id, flags, a placeholder root
    /// type/offset) and returns a writer ready to append values.
    pub fn new(config: C, options: WriterOptions) -> Writer<C> {
        let mut builder = Vec::new();
        builder.extend_from_slice(options.prefix);
        primitive::write_u8(&mut builder, config.identifier());
        primitive::write_u8(&mut builder, options.flags);
        let flags = Flags::new(options.flags);

        let root_type_pos = builder.len();
        primitive::write_u8(&mut builder, ValueType::Null.tag());
        if flags.aligned() {
            primitive::pad_to_align(&mut builder, 4);
        }
        let root_slot_pos = builder.len();
        primitive::write_u32(&mut builder, 0);

        Writer {
            builder,
            config,
            flags,
            root_type_pos,
            root_slot_pos,
            dedup: if options.skip_duplicate_keys {
                Some(DedupTable::new())
            } else {
                None
            },
        }
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// The buffer assembled so far. Only valid to hand to a `Reader`
    /// after `set_root` has been called exactly once.
    pub fn get_data(&self) -> &[u8] {
        &self.builder
    }

    /// Overwrites the reserved root-type and root-offset header slots.
    pub fn set_root(&mut self, value: ValueRef) {
        self.builder[self.root_type_pos] = value.ty.tag();
        self.builder[self.root_slot_pos..self.root_slot_pos + 4].copy_from_slice(&value.pos.to_le_bytes());
    }

    fn pad_for_alignment(&mut self, fixed_bytes_after_pad: u32, align: u32) {
        if !self.flags.aligned() || align <= 1 {
            return;
        }
        let start = self.builder.len() as u32;
        let target = round_up(start + fixed_bytes_after_pad, align);
        let pad = target - start - fixed_bytes_after_pad;
        primitive::write_zeroes(&mut self.builder, pad as usize);
    }

    pub fn write_null(&mut self) -> ValueRef {
        ValueRef {
            ty: ValueType::Null,
            pos: 0,
        }
    }

    pub fn write_bool(&mut self, value: bool) -> ValueRef {
        ValueRef {
            ty: ValueType::Bool,
            pos: value as u32,
        }
    }

    pub fn write_s32(&mut self, value: i32) -> ValueRef {
        ValueRef {
            ty: ValueType::S32,
            pos: value as u32,
        }
    }

    pub fn write_u32(&mut self, value: u32) -> ValueRef {
        ValueRef {
            ty: ValueType::U32,
            pos: value,
        }
    }

    pub fn write_f32(&mut self, value: f32) -> ValueRef {
        ValueRef {
            ty: ValueType::F32,
            pos: value.to_bits(),
        }
    }

    pub fn write_s64(&mut self, value: i64) -> ValueRef {
        self.pad_for_alignment(8, 8);
        let pos = self.builder.len() as u32;
        primitive::write_i64(&mut self.builder, value);
        ValueRef {
            ty: ValueType::S64,
            pos,
        }
    }

    pub fn write_u64(&mut self, value: u64) -> ValueRef {
        self.pad_for_alignment(8, 8);
        let pos = self.builder.len() as u32;
        primitive::write_u64(&mut self.builder, value);
        ValueRef {
            ty: ValueType::U64,
            pos,
        }
    }

    pub fn write_f64(&mut self, value: f64) -> ValueRef {
        self.pad_for_alignment(8, 8);
        let pos = self.builder.len() as u32;
        primitive::write_f64(&mut self.builder, value);
        ValueRef {
            ty: ValueType::F64,
            pos,
        }
    }

    /// Writes a string key, reusing a prior identical key's storage
    /// when deduplication is enabled.
    pub fn write_string_key(&mut self, key: &[u8]) -> Result<KeyRef, Error> {
        if let Some(dedup) = &self.dedup {
            if let Some(existing) = dedup.lookup(&self.builder, key) {
                return Ok(existing);
            }
        }

        let pos = self.builder.len() as u32;
        self.config.key_length().write(&mut self.builder, key.len() as u32, LengthClass::KeyLength)?;
        let data_pos = self.builder.len() as u32;
        self.builder.extend_from_slice(key);
        self.builder.push(0);

        let key_ref = KeyRef {
            pos,
            data_pos,
            data_len: key.len() as u32,
        };
        if let Some(dedup) = &mut self.dedup {
            dedup.insert(&self.builder, key_ref);
        }
        Ok(key_ref)
    }

    pub fn write_string8(&mut self, bytes: &[u8]) -> Result<ValueRef, Error> {
        let width = self.config.value_length().width_for(bytes.len() as u32) as u32;
        self.pad_for_alignment(width, 1);
        let pos = self.builder.len() as u32;
        self.config.value_length().write(&mut self.builder, bytes.len() as u32, LengthClass::ValueLength)?;
        self.builder.extend_from_slice(bytes);
        self.builder.push(0);
        Ok(ValueRef {
            ty: ValueType::String8,
            pos,
        })
    }

    pub fn write_string16(&mut self, units: &[u16]) -> Result<ValueRef, Error> {
        let width = self.config.value_length().width_for(units.len() as u32) as u32;
        self.pad_for_alignment(width, 2);
        let pos = self.builder.len() as u32;
        self.config.value_length().write(&mut self.builder, units.len() as u32, LengthClass::ValueLength)?;
        for &unit in units {
            primitive::write_u16(&mut self.builder, unit);
        }
        primitive::write_u16(&mut self.builder, 0);
        Ok(ValueRef {
            ty: ValueType::String16,
            pos,
        })
    }

    pub fn write_string32(&mut self, units: &[u32]) -> Result<ValueRef, Error> {
        let width = self.config.value_length().width_for(units.len() as u32) as u32;
        self.pad_for_alignment(width, 4);
        let pos = self.builder.len() as u32;
        self.config.value_length().write(&mut self.builder, units.len() as u32, LengthClass::ValueLength)?;
        for &unit in units {
            primitive::write_u32(&mut self.builder, unit);
        }
        primitive::write_u32(&mut self.builder, 0);
        Ok(ValueRef {
            ty: ValueType::String32,
            pos,
        })
    }

    /// `align` is the caller's chosen alignment for the byte body.
    pub fn write_byte_array(&mut self, data: &[u8], align: u32) -> Result<ValueRef, Error> {
        let width = self.config.value_length().width_for(data.len() as u32) as u32;
        self.pad_for_alignment(width, align);
        let pos = self.builder.len() as u32;
        self.config.value_length().write(&mut self.builder, data.len() as u32, LengthClass::ValueLength)?;
        self.builder.extend_from_slice(data);
        Ok(ValueRef {
            ty: ValueType::ByteArray,
            pos,
        })
    }

    pub fn write_vector<T: VectorElement>(&mut self, values: &[T]) -> Result<ValueRef, Error> {
        if values.len() > u8::MAX as usize {
            return Err(Error::LengthOverflow {
                class: LengthClass::ValueLength,
                value: values.len() as u32,
            });
        }
        let elem_size = T::SUBTYPE.element_size();
        self.pad_for_alignment(2, elem_size);
        let pos = self.builder.len() as u32;
        primitive::write_u8(&mut self.builder, T::SUBTYPE.tag());
        primitive::write_u8(&mut self.builder, values.len() as u8);
        for value in values {
            self.builder.extend_from_slice(&value.to_le_bytes_vec());
        }
        Ok(ValueRef {
            ty: ValueType::Vector,
            pos,
        })
    }

    /// `rows` must all share the same length (the vector's element
    /// count); that length becomes the stored `elemCount`.
    pub fn write_vector_array<T: VectorElement>(&mut self, rows: &[&[T]]) -> Result<ValueRef, Error> {
        let elem_count = rows.first().map(|r| r.len()).unwrap_or(0);
        if elem_count > u8::MAX as usize {
            return Err(Error::LengthOverflow {
                class: LengthClass::ValueLength,
                value: elem_count as u32,
            });
        }
        if rows.len() as u64 > u32::MAX as u64 {
            return Err(Error::TooManyEntries);
        }
        let elem_size = T::SUBTYPE.element_size();
        let length = rows.len() as u32;
        let field_width = self.config.value_length().width_for(length) as u32;
        self.pad_for_alignment(2 + field_width, elem_size);

        let pos = self.builder.len() as u32;
        primitive::write_u8(&mut self.builder, T::SUBTYPE.tag());
        primitive::write_u8(&mut self.builder, elem_count as u8);
        self.config.value_length().write(&mut self.builder, length, LengthClass::ValueLength)?;
        for row in rows {
            for value in row.iter() {
                self.builder.extend_from_slice(&value.to_le_bytes_vec());
            }
        }
        Ok(ValueRef {
            ty: ValueType::VectorArray,
            pos,
        })
    }

    pub fn write_array(&mut self, values: &[ValueRef]) -> Result<ValueRef, Error> {
        if values.len() as u64 > u32::MAX as u64 {
            return Err(Error::TooManyEntries);
        }
        let n = values.len() as u32;
        let field_width = self.config.array_length().width_for(n) as u32;
        self.pad_for_alignment(field_width, 4);
        let pos = self.builder.len() as u32;
        self.config.array_length().write(&mut self.builder, n, LengthClass::ArrayLength)?;
        let arrpos = self.builder.len() as u32;

        for value in values {
            let resolved = self.resolve_outgoing_ref(arrpos, *value);
            primitive::write_u32(&mut self.builder, resolved);
        }
        for value in values {
            primitive::write_u8(&mut self.builder, value.ty.tag());
        }
        Ok(ValueRef {
            ty: ValueType::Array,
            pos,
        })
    }

    pub fn write_string_map(&mut self, entries: &mut [EntryRef]) -> Result<ValueRef, Error> {
        if self.flags.sorted_keys() {
            sort::sort_string_entries(entries, &self.builder);
        }
        self.write_map_body(entries, ValueType::StringMap)
    }

    pub fn write_int_map(&mut self, entries: &mut [EntryRef]) -> Result<ValueRef, Error> {
        if self.flags.sorted_keys() {
            sort::sort_int_entries(entries);
        }
        self.write_map_body(entries, ValueType::IntMap)
    }

    fn write_map_body(&mut self, entries: &[EntryRef], map_type: ValueType) -> Result<ValueRef, Error> {
        if entries.len() as u64 > u32::MAX as u64 {
            return Err(Error::TooManyEntries);
        }
        let n = entries.len() as u32;
        let field_width = self.config.object_size().width_for(n) as u32;
        self.pad_for_alignment(field_width, 4);
        let pos = self.builder.len() as u32;
        self.config.object_size().write(&mut self.builder, n, LengthClass::ObjectSize)?;
        let objpos = self.builder.len() as u32;

        for entry in entries {
            primitive::write_u32(&mut self.builder, entry.key.pos);
        }
        for entry in entries {
            let resolved = self.resolve_outgoing_ref(objpos, entry.value);
            primitive::write_u32(&mut self.builder, resolved);
        }
        for entry in entries {
            primitive::write_u8(&mut self.builder, entry.value.ty.tag());
        }
        Ok(ValueRef { ty: map_type, pos })
    }

    fn resolve_outgoing_ref(&self, container_offset: u32, value: ValueRef) -> u32 {
        if self.flags.relative_container_value_refs() && value.ty.is_reference() {
            container_offset.wrapping_sub(value.pos)
        } else {
            value.pos
        }
    }
}

impl Writer<Config0> {
    pub fn new_default(options: WriterOptions) -> Writer<Config0> {
        Writer::new(Config0::default(), options)
    }
}

impl Writer<AdaptiveConfig> {
    pub fn new_adaptive(config_id: u8, options: WriterOptions) -> Result<Writer<AdaptiveConfig>, Error> {
        let config = AdaptiveConfig::from_id(config_id)?;
        Ok(Writer::new(config, options))
    }
}
