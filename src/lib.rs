/***************************************************************************************************
 * Copyright (c) 2021-2023, Qualcomm Innovation Center, Inc. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice (including the next
 * paragraph) shall be included in all copies or substantial portions of the
 * Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
/***************************************************************************************************
 * cbor_cursor module definition
 *
 * A bounded, cursor-based CBOR (RFC 8949) decoder aimed at embedded targets where the
 * programmer wants low-level control over traversal without paying for a tree or an
 * allocator.
 **************************************************************************************************/

#![no_std]
#![warn(missing_docs)]

//! # cbor_cursor
//!
//! `cbor_cursor` decodes a CBOR-encoded buffer through a single traversal cursor rather
//! than building a tree: the cursor tracks one reader position plus a bounded stack of
//! the map/array/byte-string-wrapped regions currently entered, and hands back one
//! [`types::Item`] at a time with [`decoder::DecodeContext::get_next_raw`].
//!
//! The typical use case is a standardized CBOR-based protocol - COSE
//! [RFC 9052](https://datatracker.ietf.org/doc/rfc9052/), CWT, or an EAT - where the
//! caller already knows the shape it expects and wants to read it with no heap
//! allocation and a predictable, bounded stack depth.
//!
//! ## Features
//!
//! - A single cursor, not a tree: `EnterMap`/`EnterArray`/`EnterBstrWrapped` push a
//!   bounded region, `ExitMap`/`ExitArray`/`ExitBstrWrapped` pop it, skipping any unread
//!   remainder.
//! - A *sticky* error: the first error latches, and every subsequent call becomes a
//!   no-op returning it, so a caller can chain many `Get*` calls and check for failure
//!   once at the end.
//! - Map search by label (integer or text), with duplicate-label detection, that never
//!   disturbs the map's own sequential read position.
//! - A tag-matching policy (`MatchTag`/`MatchContentType`/`MatchEither`) and a numeric
//!   conversion ladder spanning all eight of CBOR's numeric representations.
//!
//! ## Example
//!
//! ```
//! use cbor_cursor::decoder::DecodeContext;
//! use cbor_cursor::getters;
//!
//! fn decode(input: &[u8]) -> Result<(i64, &str), cbor_cursor::error::CBORError> {
//!     let mut ctx = DecodeContext::new(input);
//!     ctx.enter_map()?;
//!     let id = getters::get_int64_in_map_n(&mut ctx, 1)?;
//!     let name = getters::get_text_in_map_n(&mut ctx, 2)?;
//!     ctx.exit_map()?;
//!     ctx.finish()?;
//!     Ok((id, name))
//! }
//! ```

#[cfg(any(feature = "full", test))]
extern crate std;

#[cfg(all(not(feature = "std"), not(test)))]
extern crate core as std;

#[cfg(any(feature = "float", test))]
extern crate half;

#[cfg(any(feature = "full", test))]
extern crate chrono;

pub(crate) mod ast;
pub(crate) mod constants;
pub(crate) mod convert;
pub(crate) mod cursor;
pub(crate) mod decode;
pub(crate) mod mapsearch;
pub(crate) mod nesting;
pub(crate) mod tagspec;
pub(crate) mod utils;

/// The `error` module contains the sticky, flat `CBORError` type used throughout this
/// crate.
pub mod error;

/// The `types` module exports the item model every getter and the cursor itself operate
/// over: the raw [`types::CBOR`] shape, the richer [`types::Item`] (shape plus tags plus
/// an optional map label), and the supporting [`types::CBORType`]/[`types::Label`]/
/// [`types::TagList`].
pub mod types {
    pub use super::ast::{CBORType, Item, Label, TagList, CBOR};
}

/// The `decoder` module exports the traversal cursor itself, and the region-kind/tag
/// matching types a caller needs to name when entering a region or matching a tag.
pub mod decoder {
    pub use super::cursor::DecodeContext;
    pub use super::nesting::RegionKind;
    pub use super::tagspec::{TagRequirement, TagSpec};
}

/// The `getters` module exports every typed getter: strict (`GetX`), converting
/// (`GetXConvert`/`GetXConvertAll`), and tag-interpreting (`GetDateString`, `GetURI`,
/// `GetBinaryUUID`, ...) forms, each available at the cursor or by map label. Requires the
/// `combinators` feature.
#[cfg(any(feature = "combinators", test))]
pub mod getters;

/// The `mapsearch` module exports the map-search operations directly, for callers that
/// want a raw [`types::Item`] rather than a typed getter's interpretation of it. Requires
/// the `combinators` feature.
#[cfg(any(feature = "combinators", test))]
pub mod mapsearch_api {
    pub use super::mapsearch::{
        get_item_in_map_n, get_item_in_map_sz, get_items_in_map, get_items_in_map_with_callback,
        MapQuery,
    };
}

/// Constants describing CBOR's wire format, the IANA tag registry this crate recognizes,
/// and the bitmasks used by the `GetXConvert` getter family.
pub mod constants_api {
    pub use super::constants::{convert, tag, MAX_MAP_QUERY_LABELS, MAX_NESTING, MAX_TAGS_PER_ITEM};
}
