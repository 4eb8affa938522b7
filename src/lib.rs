//
// Copyright 2026 DATO Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! A native Rust reader and writer for the DATO binary container
//! format: a self-describing, compact, zero-parse format for
//! hierarchical structured data.
//!
//! A DATO buffer is a single immutable byte sequence. [`Reader`]
//! validates its header once and hands back a [`DynamicAccessor`] for
//! the root value; every further read is a cheap, bounds-checked
//! offset lookup against the original buffer — no intermediate tree is
//! ever built. [`Writer`] is the converse: it appends values to a
//! grow-only buffer and returns small [`ValueRef`]/[`KeyRef`] handles
//! the caller threads into a containing array or map.
//!
//! ```
//! use dato::layout::ValueType;
//! use dato::reader::{Reader, ReaderOptions};
//! use dato::writer::{Writer, WriterOptions};
//!
//! let mut writer = Writer::new_default(WriterOptions::default());
//! let root = writer.write_u32(42);
//! writer.set_root(root);
//! let buf = writer.get_data().to_vec();
//!
//! let reader = Reader::init_default(&buf, ReaderOptions::default()).unwrap();
//! let root = reader.get_root();
//! assert_eq!(root.get_type(), ValueType::U32);
//! assert_eq!(root.as_u32().unwrap(), 42);
//! ```

pub mod error;
pub mod layout;
pub mod length;
pub mod primitive;
pub mod reader;
pub mod visitor;
pub mod writer;

pub use error::{Error, Result};
pub use reader::{DynamicReader, Reader, ReaderOptions};
pub use visitor::Visitor;
pub use writer::{EntryRef, KeyRef, ValueRef, Writer, WriterOptions};
