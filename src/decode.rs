/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
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
 * Low-level CBOR item parser
 *
 * This is the "raw reader" the cursor is built over: given a byte slice and a starting
 * index, read exactly one CBOR head (major type, argument, and - for strings - its
 * payload bytes), and return the index of whatever follows.
 *
 * Unlike a tree-building decoder, `parse_item` never descends into an array or map's
 * children - it returns only the declared count, leaving the cursor (`crate::cursor`)
 * to decide whether and how to visit them. This is what makes bounded, re-enterable
 * traversal possible without an allocator.
 **************************************************************************************************/
use crate::ast::{TagList, CBOR};
use crate::constants::*;
use crate::error::{CBORError, Result};
use crate::utils::within;

use std::convert::TryInto;
use std::mem::size_of;
use std::str::from_utf8;

#[cfg(feature = "float")]
use half::f16;

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/***************************************************************************************************
 * Integer parsing assistance
 **************************************************************************************************/

/// Value obtained by reading an unsigned value, retaining original representation.
#[derive(Debug)]
pub(crate) enum AnyUnsigned {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
}

impl AnyUnsigned {
    /// Convert `AnyUnsigned` into a `usize`. Always succeeds on a 64-bit host.
    #[cfg_attr(feature = "trace", trace)]
    fn as_usize(&self) -> usize {
        match *self {
            Self::U8(v) => v as usize,
            Self::U16(v) => v as usize,
            Self::U32(v) => v as usize,
            Self::U64(v) => v as usize,
        }
    }

    /// Convert `AnyUnsigned` into a `u64`. Always succeeds.
    #[cfg_attr(feature = "trace", trace)]
    fn as_u64(&self) -> u64 {
        match *self {
            Self::U8(v) => v as u64,
            Self::U16(v) => v as u64,
            Self::U32(v) => v as u64,
            Self::U64(v) => v,
        }
    }

    /// Convert `AnyUnsigned` into a `CBOR::Simple` value (or one of the dedicated
    /// simple-value variants). Follows RFC 8949's rules for simple values: 20..23 have
    /// particular meanings; 24..31 are illegal; all other values 0..255 are legal.
    #[cfg_attr(feature = "trace", trace)]
    fn try_into_simple<'buf>(&self) -> Result<CBOR<'buf>> {
        match *self {
            Self::U8(v) => match v {
                0..=19 => Ok(CBOR::Simple(v)),
                20 => Ok(CBOR::False),
                21 => Ok(CBOR::True),
                22 => Ok(CBOR::Null),
                23 => Ok(CBOR::Undefined),
                24..=31 => Err(CBORError::MalformedEncoding),
                v => Ok(CBOR::Simple(v)),
            },
            _ => Err(CBORError::MalformedEncoding),
        }
    }
}

/// Parse an unsigned integer value (the MT/AI argument-reading rule shared by every
/// major type).
///
/// On entry the `start` index is assumed to identify an MT/AI byte within `buf`. On
/// return, the second element of the result is the index of the byte following the
/// argument.
#[cfg_attr(feature = "trace", trace)]
pub(crate) fn parse_unsigned(buf: &[u8], start_index: usize) -> Result<(usize, AnyUnsigned)> {
    if !within(buf, start_index, 0) {
        return Err(CBORError::HitEnd);
    }
    let ai = buf[start_index] & AI_MASK;
    if ai <= PAYLOAD_AI_BITS {
        Ok((start_index + size_of::<u8>(), AnyUnsigned::U8(ai)))
    } else if ai == PAYLOAD_ONE_BYTE {
        let (next_index, item_slice) = read_extent(buf, start_index + 1, size_of::<u8>())?;
        let bytes: [u8; 1] = item_slice.try_into().map_err(|_| CBORError::BadSliceLength)?;
        Ok((next_index, AnyUnsigned::U8(u8::from_be_bytes(bytes))))
    } else if ai == PAYLOAD_TWO_BYTES {
        let (next_index, item_slice) = read_extent(buf, start_index + 1, size_of::<u16>())?;
        let bytes: [u8; 2] = item_slice.try_into().map_err(|_| CBORError::BadSliceLength)?;
        Ok((next_index, AnyUnsigned::U16(u16::from_be_bytes(bytes))))
    } else if ai == PAYLOAD_FOUR_BYTES {
        let (next_index, item_slice) = read_extent(buf, start_index + 1, size_of::<u32>())?;
        let bytes: [u8; 4] = item_slice.try_into().map_err(|_| CBORError::BadSliceLength)?;
        Ok((next_index, AnyUnsigned::U32(u32::from_be_bytes(bytes))))
    } else if ai == PAYLOAD_EIGHT_BYTES {
        let (next_index, item_slice) = read_extent(buf, start_index + 1, size_of::<u64>())?;
        let bytes: [u8; 8] = item_slice.try_into().map_err(|_| CBORError::BadSliceLength)?;
        Ok((next_index, AnyUnsigned::U64(u64::from_be_bytes(bytes))))
    } else {
        // AI 28..30 are reserved; AI 31 (indefinite length) is not supported by this
        // decoder core.
        Err(CBORError::MalformedEncoding)
    }
}

/***************************************************************************************************
 * Float parse helpers
 **************************************************************************************************/

#[cfg(feature = "float")]
#[cfg_attr(feature = "trace", trace)]
fn parse_f64(buf: &[u8], start_index: usize) -> Result<(usize, f64)> {
    let (next_index, item_slice) = read_extent(buf, start_index + 1, size_of::<f64>())?;
    let bytes: [u8; 8] = item_slice.try_into().map_err(|_| CBORError::BadSliceLength)?;
    Ok((next_index, f64::from_be_bytes(bytes)))
}

#[cfg(feature = "float")]
#[cfg_attr(feature = "trace", trace)]
fn parse_f32(buf: &[u8], start_index: usize) -> Result<(usize, f32)> {
    let (next_index, item_slice) = read_extent(buf, start_index + 1, size_of::<f32>())?;
    let bytes: [u8; 4] = item_slice.try_into().map_err(|_| CBORError::BadSliceLength)?;
    Ok((next_index, f32::from_be_bytes(bytes)))
}

#[cfg(feature = "float")]
#[cfg_attr(feature = "trace", trace)]
fn parse_f16(buf: &[u8], start_index: usize) -> Result<(usize, f16)> {
    let (next_index, item_slice) = read_extent(buf, start_index + 1, size_of::<u16>())?;
    let bytes: [u8; 2] = item_slice.try_into().map_err(|_| CBORError::BadSliceLength)?;
    Ok((next_index, f16::from_be_bytes(bytes)))
}

/***************************************************************************************************
 * Byte/text string helper
 **************************************************************************************************/

/// Parse a byte-string payload starting at `start_index`, which should indicate the
/// MT/AI byte for the item.
#[cfg_attr(feature = "trace", trace)]
pub(crate) fn parse_bytestring(buf: &[u8], start_index: usize) -> Result<(usize, &[u8])> {
    let (start_bstr_index, value) = parse_unsigned(buf, start_index)?;
    let length = value.as_usize();
    read_extent(buf, start_bstr_index, length)
}

/***************************************************************************************************
 * Single-item (non-recursive) parser
 *
 * `parse_item_shallow` parses exactly one item's own header and payload. For arrays and
 * maps it reads only the declared count - it does not look at, skip, or validate the
 * children. That is the cursor's job.
 **************************************************************************************************/
#[cfg_attr(feature = "trace", trace)]
pub(crate) fn parse_item_shallow(buf: &[u8], start_index: usize) -> Result<(usize, CBOR)> {
    if !within(buf, start_index, 0) {
        return Err(CBORError::HitEnd);
    }
    let mt_ai_byte = buf[start_index];
    match mt_ai_byte {
        0x00..=0x1b => {
            let (next, v) = parse_unsigned(buf, start_index)?;
            Ok((next, CBOR::UInt(v.as_u64())))
        }
        0x20..=0x3b => {
            let (next, v) = parse_unsigned(buf, start_index)?;
            Ok((next, CBOR::NInt(v.as_u64())))
        }
        0x40..=0x5b => {
            let (next, bytes) = parse_bytestring(buf, start_index)?;
            Ok((next, CBOR::Bstr(bytes)))
        }
        0x60..=0x7b => {
            let (next, bytes) = parse_bytestring(buf, start_index)?;
            match from_utf8(bytes) {
                Ok(s) => Ok((next, CBOR::Tstr(s))),
                Err(_) => Err(CBORError::Utf8Error),
            }
        }
        0x80..=0x9b => {
            let (next, v) = parse_unsigned(buf, start_index)?;
            Ok((next, CBOR::Array(v.as_usize())))
        }
        0xa0..=0xbb => {
            let (next, v) = parse_unsigned(buf, start_index)?;
            Ok((next, CBOR::Map(v.as_usize())))
        }
        0xc0..=0xdb => Err(CBORError::NotImplemented), // tags are peeled off by the caller
        0x5f | 0x7f | 0x9f | 0xbf => Err(CBORError::NotImplemented), // indefinite length
        0xff => Err(CBORError::BadBreak),
        0xe0..=0xf8 => {
            let (next, v) = parse_unsigned(buf, start_index)?;
            Ok((next, v.try_into_simple()?))
        }
        #[cfg(feature = "float")]
        0xf9 => {
            let (next, v) = parse_f16(buf, start_index)?;
            Ok((next, CBOR::Float16(v)))
        }
        #[cfg(feature = "float")]
        0xfa => {
            let (next, v) = parse_f32(buf, start_index)?;
            Ok((next, CBOR::Float32(v)))
        }
        #[cfg(feature = "float")]
        0xfb => {
            let (next, v) = parse_f64(buf, start_index)?;
            Ok((next, CBOR::Float64(v)))
        }
        #[cfg(not(feature = "float"))]
        0xf9..=0xfb => Err(CBORError::FloatDisabled),
        _ => Err(CBORError::BadType7),
    }
}

/// Read a tag chain (zero or more major-type-6 bytes) followed by one shallow item.
/// Returns the tags in wire order (outermost first) and the final item's raw shape.
#[cfg_attr(feature = "trace", trace)]
pub(crate) fn parse_tagged_item(buf: &[u8], start_index: usize) -> Result<(usize, TagList, CBOR)> {
    let mut tags = TagList::new();
    let mut index = start_index;
    while within(buf, index, 0) && (0xc0..=0xdb).contains(&buf[index]) {
        let (next_index, tag_value) = parse_unsigned(buf, index)?;
        tags.push(tag_value.as_u64())
            .map_err(|_| CBORError::TooManyTags)?;
        index = next_index;
    }
    let (next_index, item) = parse_item_shallow(buf, index)?;
    Ok((next_index, tags, item))
}

/***************************************************************************************************
 * Skip helper
 *
 * Advances past one complete item - tag chain, payload, and (recursively) any array or
 * map children - without materializing any of it. Used by `Exit*` to jump past an
 * unread remainder of a bounded region, and by the map search to skip over values while
 * scanning for a label.
 **************************************************************************************************/
#[cfg_attr(feature = "trace", trace)]
pub(crate) fn skip_item(buf: &[u8], start_index: usize) -> Result<usize> {
    let (next_index, _tags, item) = parse_tagged_item(buf, start_index)?;
    match item {
        CBOR::Array(n) => skip_items(buf, next_index, n),
        CBOR::Map(n) => skip_items(buf, next_index, n * 2),
        _ => Ok(next_index),
    }
}

/// Skip `n_items` complete items in sequence, starting at `start_index`, returning the
/// index of whatever follows the last of them.
#[cfg_attr(feature = "trace", trace)]
fn skip_items(buf: &[u8], start_index: usize, n_items: usize) -> Result<usize> {
    let mut next_index = start_index;
    for _ in 0..n_items {
        next_index = skip_item(buf, next_index)?;
    }
    Ok(next_index)
}

/***************************************************************************************************
 * Other helpers
 **************************************************************************************************/

/// Return the index of whatever follows, and a slice over, the `length` bytes starting
/// at `start` in `buf`.
#[cfg_attr(feature = "trace", trace)]
pub(crate) fn read_extent(buf: &[u8], start: usize, length: usize) -> Result<(usize, &[u8])> {
    if within(buf, start, length) {
        Ok((start + length, &buf[start..start + length]))
    } else {
        Err(CBORError::HitEnd)
    }
}
