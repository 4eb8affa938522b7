//
// Copyright 2026 DATO Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # Map-entry sort routines.
//!
//! Two algorithms, one per key kind: int keys compare by unsigned
//! value, string keys compare lexicographically with a shorter-first
//! tie-break.

use crate::writer::EntryRef;
use std::cmp::Ordering;

const INSERTION_SORT_THRESHOLD: usize = 16;

/// Sorts `entries` by their `u32` int key: insertion sort at or below
/// 16 entries, LSD radix sort (four 8-bit passes) above.
pub fn sort_int_entries(entries: &mut [EntryRef]) {
    if entries.len() <= INSERTION_SORT_THRESHOLD {
        insertion_sort_by(entries, |a, b| a.key.pos.cmp(&b.key.pos));
    } else {
        radix_sort_u32(entries);
    }
}

fn insertion_sort_by<F: Fn(&EntryRef, &EntryRef) -> Ordering>(entries: &mut [EntryRef], cmp: F) {
    for i in 1..entries.len() {
        let mut j = i;
        while j > 0 && cmp(&entries[j - 1], &entries[j]) == Ordering::Greater {
            entries.swap(j - 1, j);
            j -= 1;
        }
    }
}

fn radix_sort_u32(entries: &mut [EntryRef]) {
    let n = entries.len();
    let mut src = entries.to_vec();
    let mut dst = src.clone();

    for pass in 0..4 {
        let shift = pass * 8;
        let mut counts = [0usize; 256];
        for entry in &src {
            let bucket = ((entry.key.pos >> shift) & 0xFF) as usize;
            counts[bucket] += 1;
        }
        let mut total = 0;
        for count in counts.iter_mut() {
            let old = *count;
            *count = total;
            total += old;
        }
        for entry in &src {
            let bucket = ((entry.key.pos >> shift) & 0xFF) as usize;
            dst[counts[bucket]] = *entry;
            counts[bucket] += 1;
        }
        std::mem::swap(&mut src, &mut dst);
    }

    entries[..n].copy_from_slice(&src);
}

fn key_bytes<'a>(entry: &EntryRef, builder: &'a [u8]) -> &'a [u8] {
    &builder[entry.key.data_pos as usize..entry.key.data_pos as usize + entry.key.data_len as usize]
}

/// Byte at `depth` within `entry`'s key, or `-1` once the key is
/// exhausted — the sentinel that makes a shorter key compare less
/// than any key sharing its prefix.
fn byte_at(entry: &EntryRef, builder: &[u8], depth: usize) -> i32 {
    let bytes = key_bytes(entry, builder);
    if depth < bytes.len() {
        bytes[depth] as i32
    } else {
        -1
    }
}

/// Sorts `entries` by their string key: insertion sort at or below a
/// small threshold, three-way string quicksort above.
pub fn sort_string_entries(entries: &mut [EntryRef], builder: &[u8]) {
    let n = entries.len();
    if n <= INSERTION_SORT_THRESHOLD {
        insertion_sort_strings(entries, builder);
    } else {
        quicksort3_strings(entries, builder, 0, n as isize - 1, 0);
    }
}

fn insertion_sort_strings(entries: &mut [EntryRef], builder: &[u8]) {
    for i in 1..entries.len() {
        let mut j = i;
        while j > 0 && key_bytes(&entries[j - 1], builder).cmp(key_bytes(&entries[j], builder)) == Ordering::Greater {
            entries.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Ternary (3-way) string quicksort, partitioning on the byte at
/// `depth` and recursing into the equal partition at `depth + 1`.
fn quicksort3_strings(entries: &mut [EntryRef], builder: &[u8], lo: isize, hi: isize, depth: usize) {
    if hi <= lo {
        return;
    }
    if (hi - lo + 1) as usize <= INSERTION_SORT_THRESHOLD {
        insertion_sort_strings(&mut entries[lo as usize..=hi as usize], builder);
        return;
    }

    let pivot = byte_at(&entries[lo as usize], builder, depth);
    let mut lt = lo;
    let mut gt = hi;
    let mut i = lo + 1;
    while i <= gt {
        let current = byte_at(&entries[i as usize], builder, depth);
        match current.cmp(&pivot) {
            Ordering::Less => {
                entries.swap(lt as usize, i as usize);
                lt += 1;
                i += 1;
            }
            Ordering::Greater => {
                entries.swap(i as usize, gt as usize);
                gt -= 1;
            }
            Ordering::Equal => i += 1,
        }
    }

    quicksort3_strings(entries, builder, lo, lt - 1, depth);
    if pivot >= 0 {
        quicksort3_strings(entries, builder, lt, gt, depth + 1);
    }
    quicksort3_strings(entries, builder, gt + 1, hi, depth);
}
