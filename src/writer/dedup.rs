//
// Copyright 2026 DATO Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # Key deduplication table.
//!
//! A custom open-addressed hash table so repeated `write_string_key`
//! calls with the same bytes share one length-prefixed copy in the
//! builder.

use crate::writer::KeyRef;

const INITIAL_CAPACITY: usize = 16;
const MAX_LOAD_NUMERATOR: usize = 4;
const MAX_LOAD_DENOMINATOR: usize = 5;

/// Hashes `key` with an FNV-1a-like fold, subsampling every
/// `len/32`-th byte once the string is longer than 32 bytes, so
/// hashing cost is bounded regardless of key length.
fn hash_key(key: &[u8]) -> u32 {
    const FNV_OFFSET: u32 = 0x811c_9dc5;
    const FNV_PRIME: u32 = 0x0100_0193;

    let mut hash = FNV_OFFSET;
    if key.len() > 32 {
        let step = key.len() / 32;
        let mut i = 0;
        while i < key.len() {
            hash ^= key[i] as u32;
            hash = hash.wrapping_mul(FNV_PRIME);
            i += step;
        }
    } else {
        for &byte in key {
            hash ^= byte as u32;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    }
    hash
}

#[derive(Copy, Clone)]
struct Slot {
    key: KeyRef,
    hash: u32,
}

/// Because entries reference key bytes by offset into the writer's
/// growing builder, every lookup re-slices `builder[data_pos..]`
/// rather than caching a pointer — a cached pointer would dangle
/// across a `Vec` reallocation.
pub struct DedupTable {
    slots: Vec<Option<Slot>>,
    count: usize,
}

impl DedupTable {
    pub fn new() -> DedupTable {
        DedupTable {
            slots: vec![None; INITIAL_CAPACITY],
            count: 0,
        }
    }

    fn key_bytes<'a>(builder: &'a [u8], key: &KeyRef) -> &'a [u8] {
        &builder[key.data_pos as usize..key.data_pos as usize + key.data_len as usize]
    }

    fn probe_index(&self, builder: &[u8], key: &[u8], hash: u32) -> (usize, bool) {
        let mask = self.slots.len() - 1;
        let mut index = hash as usize & mask;
        loop {
            match &self.slots[index] {
                None => return (index, false),
                Some(slot) => {
                    if slot.hash == hash
                        && slot.key.data_len as usize == key.len()
                        && Self::key_bytes(builder, &slot.key) == key
                    {
                        return (index, true);
                    }
                }
            }
            index = (index + 1) & mask;
        }
    }

    /// Looks up `key` by `(hash, len)` then `memcmp`, returning the
    /// already-written `KeyRef` on a hit.
    pub fn lookup(&self, builder: &[u8], key: &[u8]) -> Option<KeyRef> {
        let hash = hash_key(key);
        let (index, found) = self.probe_index(builder, key, hash);
        if found {
            self.slots[index].map(|slot| slot.key)
        } else {
            None
        }
    }

    /// Records a freshly written key, growing the table first if load
    /// factor would exceed 4/5.
    pub fn insert(&mut self, builder: &[u8], key: KeyRef) {
        if (self.count + 1) * MAX_LOAD_DENOMINATOR > self.slots.len() * MAX_LOAD_NUMERATOR {
            self.grow();
        }
        let bytes = Self::key_bytes(builder, &key);
        let hash = hash_key(bytes);
        let mask = self.slots.len() - 1;
        let mut index = hash as usize & mask;
        while self.slots[index].is_some() {
            index = (index + 1) & mask;
        }
        self.slots[index] = Some(Slot { key, hash });
        self.count += 1;
    }

    fn grow(&mut self) {
        let new_capacity = self.slots.len() * 2;
        let old_slots = std::mem::replace(&mut self.slots, vec![None; new_capacity]);
        let mask = new_capacity - 1;
        for slot in old_slots.into_iter().flatten() {
            let mut index = slot.hash as usize & mask;
            while self.slots[index].is_some() {
                index = (index + 1) & mask;
            }
            self.slots[index] = Some(slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder_with(keys: &[&[u8]]) -> (Vec<u8>, Vec<KeyRef>) {
        let mut builder = Vec::new();
        let mut refs = Vec::new();
        for key in keys {
            let pos = builder.len() as u32;
            builder.push(key.len() as u8);
            let data_pos = builder.len() as u32;
            builder.extend_from_slice(key);
            builder.push(0);
            refs.push(KeyRef {
                pos,
                data_pos,
                data_len: key.len() as u32,
            });
        }
        (builder, refs)
    }

    #[test]
    fn lookup_misses_on_an_empty_table() {
        let table = DedupTable::new();
        let (builder, _refs) = builder_with(&[]);
        assert!(table.lookup(&builder, b"abc").is_none());
    }

    #[test]
    fn insert_then_lookup_finds_the_same_key_ref() {
        let (builder, refs) = builder_with(&[b"abc"]);
        let mut table = DedupTable::new();
        table.insert(&builder, refs[0]);
        let found = table.lookup(&builder, b"abc").unwrap();
        assert_eq!(found, refs[0]);
    }

    #[test]
    fn lookup_distinguishes_different_keys_with_same_hash_bucket() {
        let (builder, refs) = builder_with(&[b"abc", b"xyz", b"longer-key-name"]);
        let mut table = DedupTable::new();
        for r in &refs {
            table.insert(&builder, *r);
        }
        assert_eq!(table.lookup(&builder, b"abc").unwrap(), refs[0]);
        assert_eq!(table.lookup(&builder, b"xyz").unwrap(), refs[1]);
        assert_eq!(table.lookup(&builder, b"longer-key-name").unwrap(), refs[2]);
        assert!(table.lookup(&builder, b"absent").is_none());
    }

    #[test]
    fn grows_past_initial_capacity_without_losing_entries() {
        let keys: Vec<Vec<u8>> = (0..100u32).map(|i| format!("key-{}", i).into_bytes()).collect();
        let key_slices: Vec<&[u8]> = keys.iter().map(|k| k.as_slice()).collect();
        let (builder, refs) = builder_with(&key_slices);

        let mut table = DedupTable::new();
        for r in &refs {
            table.insert(&builder, *r);
        }
        assert!(table.slots.len() > INITIAL_CAPACITY);
        for (i, key) in key_slices.iter().enumerate() {
            assert_eq!(table.lookup(&builder, key).unwrap(), refs[i]);
        }
    }
}
