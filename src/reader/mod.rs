//
// Copyright 2026 DATO Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # Reader core.
//!
//! `Reader` borrows a buffer and validates its header; every further
//! operation goes through a `DynamicAccessor` it hands out. Slices
//! are only ever taken on demand, never decoded into an owned tree
//! up front: the caller gets a cheap accessor and re-enters it lazily.

pub mod accessor;
pub mod walk;

pub use accessor::{ArrayAccessor, DynamicAccessor, MapAccessor, StringAccessor, VectorAccessor, VectorArrayAccessor};

use crate::error::{Error, MalformedKind};
use crate::layout::{root_slot_offset, Flags, ValueType, DEFAULT_PREFIX};
use crate::length::{AdaptiveConfig, Config0, FieldConfig};
use crate::primitive;

/// Construction options for `Reader::init`: the expected magic prefix
/// bytes, and a mask of flag bits to ignore rather than reject.
#[derive(Copy, Clone, Debug)]
pub struct ReaderOptions {
    pub prefix: &'static [u8],
    /// Flag bits to mask out of the header's flags byte before use.
    pub ignore_flags: u8,
}

impl Default for ReaderOptions {
    fn default() -> ReaderOptions {
        ReaderOptions {
            prefix: DEFAULT_PREFIX,
            ignore_flags: 0,
        }
    }
}

/// A validated, borrowed view over a DATO buffer under a specific
/// length-encoding config `C`.
///
/// `Reader` is small and `Copy` (when `C` is) so that `DynamicAccessor`
/// can hold one by value and be freely copied.
#[derive(Copy, Clone, Debug)]
pub struct Reader<'a, C: FieldConfig> {
    pub(crate) buf: &'a [u8],
    pub(crate) config: C,
    pub(crate) flags: Flags,
    root_type: ValueType,
    root_payload: u32,
}

/// A `Reader` whose config is resolved from the header's config-id
/// byte at construction time, for callers that don't know their config
/// at compile time.
pub type DynamicReader<'a> = Reader<'a, AdaptiveConfig>;

impl<'a, C: FieldConfig> Reader<'a, C> {
    /// Validates `buf`'s header against `config` and `options`.
    pub fn init(buf: &'a [u8], config: C, options: ReaderOptions) -> Result<Reader<'a, C>, Error> {
        let prefix = options.prefix;
        let header_min = prefix.len() + 3;
        if buf.len() < header_min {
            return Err(Error::Malformed(MalformedKind::TruncatedHeader));
        }
        if &buf[..prefix.len()] != prefix {
            return Err(Error::Malformed(MalformedKind::PrefixMismatch));
        }

        let config_id = buf[prefix.len()];
        if config_id != config.identifier() {
            return Err(Error::Malformed(MalformedKind::UnknownConfig(config_id)));
        }

        let flags = Flags::new(buf[prefix.len() + 1] & !options.ignore_flags);
        let root_type = ValueType::from_tag(buf[prefix.len() + 2])?;

        let slot = root_slot_offset(prefix.len(), flags.aligned());
        if slot + 4 > buf.len() {
            return Err(Error::Malformed(MalformedKind::TruncatedRoot));
        }
        let root_payload = primitive::read_u32(buf, slot)?;

        if root_type.is_reference() && root_payload as usize >= buf.len() {
            return Err(Error::Malformed(MalformedKind::InvalidRootOffset));
        }

        Ok(Reader {
            buf,
            config,
            flags,
            root_type,
            root_payload,
        })
    }

    /// Returns the root value as a `DynamicAccessor`.
    pub fn get_root(&self) -> DynamicAccessor<'a, C> {
        DynamicAccessor::new(*self, self.root_payload, self.root_type)
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn config(&self) -> &C {
        &self.config
    }
}

impl<'a> Reader<'a, AdaptiveConfig> {
    /// Convenience constructor that reads the config id straight out
    /// of the header rather than requiring the caller to already know
    /// it.
    pub fn init_adaptive(buf: &'a [u8], options: ReaderOptions) -> Result<Reader<'a, AdaptiveConfig>, Error> {
        let prefix = options.prefix;
        if buf.len() < prefix.len() + 1 {
            return Err(Error::Malformed(MalformedKind::TruncatedHeader));
        }
        let config_id = buf[prefix.len()];
        let config = AdaptiveConfig::from_id(config_id)?;
        Reader::init(buf, config, options)
    }
}

impl<'a> Reader<'a, Config0> {
    /// Convenience constructor for the default preset.
    pub fn init_default(buf: &'a [u8], options: ReaderOptions) -> Result<Reader<'a, Config0>, Error> {
        Reader::init(buf, Config0::default(), options)
    }
}
