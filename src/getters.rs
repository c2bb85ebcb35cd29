/***************************************************************************************************
 * Copyright (c) 2021-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all copies or
 * substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
/***************************************************************************************************
 * Typed getters
 *
 * Every getter family comes in three shapes: at the cursor (reads the next item),
 * `_in_map_n` (by integer label), `_in_map_sz` (by text label). The `_n`/`_sz` forms are
 * built over `crate::mapsearch` and never disturb the map's sequential read position.
 *
 * Numeric getters split further into a strict form (only the item's native
 * representation is accepted) and a `_convert` form taking a `convert_mask` built from
 * `crate::constants::convert` describing which of CBOR's eight numeric representations
 * the caller is willing to accept.
 **************************************************************************************************/
use crate::ast::{CBORType, Item, Label, CBOR};
use crate::constants::convert as cvt;
use crate::convert;
use crate::cursor::DecodeContext;
use crate::error::{CBORError, Result};
use crate::mapsearch;
use crate::nesting::RegionKind;
use crate::tagspec::{TagRequirement, TagSpec};

use std::convert::TryFrom;

#[cfg(feature = "full")]
use chrono::{DateTime, FixedOffset, Utc};

/***************************************************************************************************
 * Shared plumbing
 ***************************************************************************************************/

fn at_cursor<'buf>(ctx: &mut DecodeContext<'buf>) -> Result<Item<'buf>> {
    ctx.get_next_raw()
}

fn in_map_n<'buf>(
    ctx: &mut DecodeContext<'buf>,
    label: i64,
    type_filter: CBORType,
) -> Result<Item<'buf>> {
    mapsearch::get_item_in_map_n(ctx, label, type_filter)
}

fn in_map_sz<'buf>(
    ctx: &mut DecodeContext<'buf>,
    label: &'buf str,
    type_filter: CBORType,
) -> Result<Item<'buf>> {
    mapsearch::get_item_in_map_sz(ctx, label, type_filter)
}

/// As `at_cursor`, but also returns the buffer offset of the item's first child - needed
/// by the `_convert*` getters so a decimal-fraction/bigfloat source can be entered as an
/// array without re-reading its header.
fn at_cursor_with_pos<'buf>(ctx: &mut DecodeContext<'buf>) -> Result<(Item<'buf>, usize)> {
    let item = ctx.get_next_raw()?;
    let pos = ctx.raw_pos();
    Ok((item, pos))
}

/// As `in_map_n`, but also returns the buffer offset of the found item's first child. See
/// `at_cursor_with_pos`.
fn in_map_n_with_pos<'buf>(
    ctx: &mut DecodeContext<'buf>,
    label: i64,
    type_filter: CBORType,
) -> Result<(Item<'buf>, usize)> {
    ctx.get_error().map_or(Ok(()), Err)?;
    mapsearch::scan_map(ctx, Label::Int(label), type_filter)
}

/// As `in_map_sz`, but also returns the buffer offset of the found item's first child. See
/// `at_cursor_with_pos`.
fn in_map_sz_with_pos<'buf>(
    ctx: &mut DecodeContext<'buf>,
    label: &'buf str,
    type_filter: CBORType,
) -> Result<(Item<'buf>, usize)> {
    ctx.get_error().map_or(Ok(()), Err)?;
    mapsearch::scan_map(ctx, Label::Text(label), type_filter)
}

/***************************************************************************************************
 * Integers
 ***************************************************************************************************/

fn int64_strict(item: &Item) -> Result<i64> {
    match item.value {
        CBOR::UInt(v) => i64::try_from(v).map_err(|_| CBORError::ConversionUnderOverflow),
        CBOR::NInt(v) => {
            if v > i64::MAX as u64 {
                Err(CBORError::ConversionUnderOverflow)
            } else {
                Ok(-1 - v as i64)
            }
        }
        _ => Err(CBORError::UnexpectedType),
    }
}

fn uint64_strict(item: &Item) -> Result<u64> {
    match item.value {
        CBOR::UInt(v) => Ok(v),
        CBOR::NInt(_) => Err(CBORError::NumberSignConversion),
        _ => Err(CBORError::UnexpectedType),
    }
}

fn int64_convert<'buf>(
    ctx: &mut DecodeContext<'buf>,
    item: &Item<'buf>,
    content_start: usize,
    mask: u32,
) -> Result<i64> {
    match item.value {
        CBOR::UInt(v) if mask & cvt::UINT64 != 0 => {
            i64::try_from(v).map_err(|_| CBORError::ConversionUnderOverflow)
        }
        CBOR::NInt(v) if mask & cvt::INT64 != 0 => {
            if v > i64::MAX as u64 {
                Err(CBORError::ConversionUnderOverflow)
            } else {
                Ok(-1 - v as i64)
            }
        }
        #[cfg(feature = "float")]
        CBOR::Float16(v) if mask & cvt::FLOAT != 0 => convert::f64_to_i64_round(f64::from(v)),
        #[cfg(feature = "float")]
        CBOR::Float32(v) if mask & cvt::FLOAT != 0 => convert::f64_to_i64_round(v as f64),
        #[cfg(feature = "float")]
        CBOR::Float64(v) if mask & cvt::DOUBLE != 0 => convert::f64_to_i64_round(v),
        CBOR::Bstr(bytes) if item.semantic_type() == CBORType::PosBignum && mask & cvt::BIG_NUM != 0 => {
            let v = bignum_bytes_to_u64(bytes)?;
            convert::bignum_to_i64(v, false)
        }
        CBOR::Bstr(bytes) if item.semantic_type() == CBORType::NegBignum && mask & cvt::BIG_NUM != 0 => {
            let v = bignum_bytes_to_u64(bytes)?;
            convert::bignum_to_i64(v, true)
        }
        CBOR::Array(_)
            if item.semantic_type() == CBORType::DecimalFraction
                && mask & cvt::DECIMAL_FRACTION != 0 =>
        {
            fractional_convert_i64(ctx, item, content_start, 10)
        }
        CBOR::Array(_) if item.semantic_type() == CBORType::BigFloat && mask & cvt::BIGFLOAT != 0 => {
            fractional_convert_i64(ctx, item, content_start, 2)
        }
        _ => Err(CBORError::UnexpectedType),
    }
}

fn uint64_convert<'buf>(
    ctx: &mut DecodeContext<'buf>,
    item: &Item<'buf>,
    content_start: usize,
    mask: u32,
) -> Result<u64> {
    match item.value {
        CBOR::UInt(v) if mask & cvt::UINT64 != 0 => Ok(v),
        CBOR::NInt(_) if mask & cvt::INT64 != 0 => Err(CBORError::NumberSignConversion),
        #[cfg(feature = "float")]
        CBOR::Float16(v) if mask & cvt::FLOAT != 0 => convert::f64_to_u64_round(f64::from(v)),
        #[cfg(feature = "float")]
        CBOR::Float32(v) if mask & cvt::FLOAT != 0 => convert::f64_to_u64_round(v as f64),
        #[cfg(feature = "float")]
        CBOR::Float64(v) if mask & cvt::DOUBLE != 0 => convert::f64_to_u64_round(v),
        CBOR::Bstr(bytes) if item.semantic_type() == CBORType::PosBignum && mask & cvt::BIG_NUM != 0 => {
            bignum_bytes_to_u64(bytes)
        }
        CBOR::Bstr(_) if item.semantic_type() == CBORType::NegBignum && mask & cvt::BIG_NUM != 0 => {
            Err(CBORError::NumberSignConversion)
        }
        CBOR::Array(_)
            if item.semantic_type() == CBORType::DecimalFraction
                && mask & cvt::DECIMAL_FRACTION != 0 =>
        {
            fractional_convert_u64(ctx, item, content_start, 10)
        }
        CBOR::Array(_) if item.semantic_type() == CBORType::BigFloat && mask & cvt::BIGFLOAT != 0 => {
            fractional_convert_u64(ctx, item, content_start, 2)
        }
        _ => Err(CBORError::UnexpectedType),
    }
}

fn bignum_bytes_to_u64(bytes: &[u8]) -> Result<u64> {
    if bytes.len() > 8 {
        return Err(CBORError::ConversionUnderOverflow);
    }
    let mut acc: u64 = 0;
    for &b in bytes {
        acc = acc
            .checked_shl(8)
            .and_then(|v| v.checked_add(b as u64))
            .ok_or(CBORError::ConversionUnderOverflow)?;
    }
    Ok(acc)
}

macro_rules! int_getters {
    ($strict_at:ident, $strict_n:ident, $strict_sz:ident,
     $convert_at:ident, $convert_n:ident, $convert_sz:ident,
     $convert_all_at:ident, $ty:ty, $strict_fn:path, $convert_fn:path, $content_ty:expr) => {
        pub fn $strict_at<'buf>(ctx: &mut DecodeContext<'buf>) -> Result<$ty> {
            let item = at_cursor(ctx)?;
            $strict_fn(&item).map_err(|e| ctx.latch_pub(e))
        }
        pub fn $strict_n<'buf>(ctx: &mut DecodeContext<'buf>, label: i64) -> Result<$ty> {
            let item = in_map_n(ctx, label, $content_ty)?;
            $strict_fn(&item).map_err(|e| ctx.latch_pub(e))
        }
        pub fn $strict_sz<'buf>(ctx: &mut DecodeContext<'buf>, label: &'buf str) -> Result<$ty> {
            let item = in_map_sz(ctx, label, $content_ty)?;
            $strict_fn(&item).map_err(|e| ctx.latch_pub(e))
        }
        pub fn $convert_at<'buf>(ctx: &mut DecodeContext<'buf>, mask: u32) -> Result<$ty> {
            let (item, pos) = at_cursor_with_pos(ctx)?;
            $convert_fn(ctx, &item, pos, mask).map_err(|e| ctx.latch_pub(e))
        }
        pub fn $convert_n<'buf>(ctx: &mut DecodeContext<'buf>, label: i64, mask: u32) -> Result<$ty> {
            // A decimal-fraction/bigfloat source needs to enter its array to read the
            // exponent/mantissa; restore the cursor to its pre-lookup position afterwards
            // so this never disturbs the map's own sequential read position.
            let saved = ctx.raw_pos();
            let (item, pos) = in_map_n_with_pos(ctx, label, CBORType::Any)?;
            let result = $convert_fn(ctx, &item, pos, mask).map_err(|e| ctx.latch_pub(e));
            ctx.set_pos(saved);
            result
        }
        pub fn $convert_sz<'buf>(ctx: &mut DecodeContext<'buf>, label: &'buf str, mask: u32) -> Result<$ty> {
            let saved = ctx.raw_pos();
            let (item, pos) = in_map_sz_with_pos(ctx, label, CBORType::Any)?;
            let result = $convert_fn(ctx, &item, pos, mask).map_err(|e| ctx.latch_pub(e));
            ctx.set_pos(saved);
            result
        }
        pub fn $convert_all_at<'buf>(ctx: &mut DecodeContext<'buf>) -> Result<$ty> {
            $convert_at(ctx, cvt::ALL)
        }
    };
}

int_getters!(
    get_int64, get_int64_in_map_n, get_int64_in_map_sz,
    get_int64_convert, get_int64_convert_in_map_n, get_int64_convert_in_map_sz,
    get_int64_convert_all, i64, int64_strict, int64_convert, CBORType::Any
);

int_getters!(
    get_uint64, get_uint64_in_map_n, get_uint64_in_map_sz,
    get_uint64_convert, get_uint64_convert_in_map_n, get_uint64_convert_in_map_sz,
    get_uint64_convert_all, u64, uint64_strict, uint64_convert, CBORType::Any
);

/***************************************************************************************************
 * Double
 ***************************************************************************************************/

#[cfg(feature = "float")]
fn double_convert(item: &Item, mask: u32) -> Result<f64> {
    match item.value {
        CBOR::UInt(v) if mask & cvt::UINT64 != 0 => Ok(v as f64),
        CBOR::NInt(v) if mask & cvt::INT64 != 0 => Ok(-1.0 - v as f64),
        CBOR::Float16(v) if mask & cvt::FLOAT != 0 => Ok(f64::from(v)),
        CBOR::Float32(v) if mask & cvt::FLOAT != 0 => Ok(v as f64),
        CBOR::Float64(v) if mask & cvt::DOUBLE != 0 => Ok(v),
        _ => Err(CBORError::UnexpectedType),
    }
}

#[cfg(feature = "float")]
pub fn get_double_convert<'buf>(ctx: &mut DecodeContext<'buf>, mask: u32) -> Result<f64> {
    let item = at_cursor(ctx)?;
    double_convert(&item, mask).map_err(|e| ctx.latch_pub(e))
}

#[cfg(feature = "float")]
pub fn get_double_convert_in_map_n<'buf>(
    ctx: &mut DecodeContext<'buf>,
    label: i64,
    mask: u32,
) -> Result<f64> {
    let item = in_map_n(ctx, label, CBORType::Any)?;
    double_convert(&item, mask).map_err(|e| ctx.latch_pub(e))
}

#[cfg(feature = "float")]
pub fn get_double_convert_in_map_sz<'buf>(
    ctx: &mut DecodeContext<'buf>,
    label: &'buf str,
    mask: u32,
) -> Result<f64> {
    let item = in_map_sz(ctx, label, CBORType::Any)?;
    double_convert(&item, mask).map_err(|e| ctx.latch_pub(e))
}

#[cfg(feature = "float")]
pub fn get_double<'buf>(ctx: &mut DecodeContext<'buf>) -> Result<f64> {
    let item = at_cursor(ctx)?;
    match item.value {
        CBOR::Float64(v) => Ok(v),
        _ => Err(ctx.latch_pub(CBORError::UnexpectedType)),
    }
}

/***************************************************************************************************
 * Bytes / text / bool
 ***************************************************************************************************/

pub fn get_bytes<'buf>(ctx: &mut DecodeContext<'buf>) -> Result<&'buf [u8]> {
    match at_cursor(ctx)?.value {
        CBOR::Bstr(b) => Ok(b),
        _ => Err(ctx.latch_pub(CBORError::UnexpectedType)),
    }
}

pub fn get_bytes_in_map_n<'buf>(ctx: &mut DecodeContext<'buf>, label: i64) -> Result<&'buf [u8]> {
    match in_map_n(ctx, label, CBORType::Bstr)?.value {
        CBOR::Bstr(b) => Ok(b),
        _ => Err(ctx.latch_pub(CBORError::UnexpectedType)),
    }
}

pub fn get_bytes_in_map_sz<'buf>(
    ctx: &mut DecodeContext<'buf>,
    label: &'buf str,
) -> Result<&'buf [u8]> {
    match in_map_sz(ctx, label, CBORType::Bstr)?.value {
        CBOR::Bstr(b) => Ok(b),
        _ => Err(ctx.latch_pub(CBORError::UnexpectedType)),
    }
}

pub fn get_text<'buf>(ctx: &mut DecodeContext<'buf>) -> Result<&'buf str> {
    match at_cursor(ctx)?.value {
        CBOR::Tstr(s) => Ok(s),
        _ => Err(ctx.latch_pub(CBORError::UnexpectedType)),
    }
}

pub fn get_text_in_map_n<'buf>(ctx: &mut DecodeContext<'buf>, label: i64) -> Result<&'buf str> {
    match in_map_n(ctx, label, CBORType::Tstr)?.value {
        CBOR::Tstr(s) => Ok(s),
        _ => Err(ctx.latch_pub(CBORError::UnexpectedType)),
    }
}

pub fn get_text_in_map_sz<'buf>(
    ctx: &mut DecodeContext<'buf>,
    label: &'buf str,
) -> Result<&'buf str> {
    match in_map_sz(ctx, label, CBORType::Tstr)?.value {
        CBOR::Tstr(s) => Ok(s),
        _ => Err(ctx.latch_pub(CBORError::UnexpectedType)),
    }
}

pub fn get_bool<'buf>(ctx: &mut DecodeContext<'buf>) -> Result<bool> {
    match at_cursor(ctx)?.value {
        CBOR::True => Ok(true),
        CBOR::False => Ok(false),
        _ => Err(ctx.latch_pub(CBORError::UnexpectedType)),
    }
}

pub fn get_bool_in_map_n<'buf>(ctx: &mut DecodeContext<'buf>, label: i64) -> Result<bool> {
    match in_map_n(ctx, label, CBORType::Any)?.value {
        CBOR::True => Ok(true),
        CBOR::False => Ok(false),
        _ => Err(ctx.latch_pub(CBORError::UnexpectedType)),
    }
}

pub fn get_bool_in_map_sz<'buf>(ctx: &mut DecodeContext<'buf>, label: &'buf str) -> Result<bool> {
    match in_map_sz(ctx, label, CBORType::Any)?.value {
        CBOR::True => Ok(true),
        CBOR::False => Ok(false),
        _ => Err(ctx.latch_pub(CBORError::UnexpectedType)),
    }
}

/***************************************************************************************************
 * Tag-wrapped text/byte interpretations: date string, URI, base64(url), regex, MIME,
 * binary UUID. Each takes a caller-supplied `TagRequirement` naming how strictly the
 * registered tag is required over the expected raw shape.
 ***************************************************************************************************/

fn tagged_text<'buf>(
    item: &Item<'buf>,
    requirement: TagRequirement,
    tagged: CBORType,
) -> Result<&'buf str> {
    TagSpec::single(requirement, tagged, CBORType::Tstr).matches(item)?;
    match item.value {
        CBOR::Tstr(s) => Ok(s),
        _ => Err(CBORError::UnexpectedType),
    }
}

fn tagged_bytes<'buf>(
    item: &Item<'buf>,
    requirement: TagRequirement,
    tagged: CBORType,
) -> Result<&'buf [u8]> {
    TagSpec::single(requirement, tagged, CBORType::Bstr).matches(item)?;
    match item.value {
        CBOR::Bstr(b) => Ok(b),
        _ => Err(CBORError::UnexpectedType),
    }
}

macro_rules! tagged_text_getters {
    ($at:ident, $n:ident, $sz:ident, $tagged:expr) => {
        pub fn $at<'buf>(ctx: &mut DecodeContext<'buf>, requirement: TagRequirement) -> Result<&'buf str> {
            let item = at_cursor(ctx)?;
            tagged_text(&item, requirement, $tagged).map_err(|e| ctx.latch_pub(e))
        }
        pub fn $n<'buf>(
            ctx: &mut DecodeContext<'buf>,
            label: i64,
            requirement: TagRequirement,
        ) -> Result<&'buf str> {
            let item = in_map_n(ctx, label, CBORType::Any)?;
            tagged_text(&item, requirement, $tagged).map_err(|e| ctx.latch_pub(e))
        }
        pub fn $sz<'buf>(
            ctx: &mut DecodeContext<'buf>,
            label: &'buf str,
            requirement: TagRequirement,
        ) -> Result<&'buf str> {
            let item = in_map_sz(ctx, label, CBORType::Any)?;
            tagged_text(&item, requirement, $tagged).map_err(|e| ctx.latch_pub(e))
        }
    };
}

tagged_text_getters!(get_date_string, get_date_string_in_map_n, get_date_string_in_map_sz, CBORType::DateString);
tagged_text_getters!(get_uri, get_uri_in_map_n, get_uri_in_map_sz, CBORType::Uri);
tagged_text_getters!(get_base64, get_base64_in_map_n, get_base64_in_map_sz, CBORType::Base64);
tagged_text_getters!(get_base64_url, get_base64_url_in_map_n, get_base64_url_in_map_sz, CBORType::Base64Url);
tagged_text_getters!(get_regex, get_regex_in_map_n, get_regex_in_map_sz, CBORType::Regex);
tagged_text_getters!(get_mime, get_mime_in_map_n, get_mime_in_map_sz, CBORType::Mime);

pub fn get_binary_uuid<'buf>(
    ctx: &mut DecodeContext<'buf>,
    requirement: TagRequirement,
) -> Result<&'buf [u8]> {
    let item = at_cursor(ctx)?;
    tagged_bytes(&item, requirement, CBORType::Uuid).map_err(|e| ctx.latch_pub(e))
}

pub fn get_binary_uuid_in_map_n<'buf>(
    ctx: &mut DecodeContext<'buf>,
    label: i64,
    requirement: TagRequirement,
) -> Result<&'buf [u8]> {
    let item = in_map_n(ctx, label, CBORType::Any)?;
    tagged_bytes(&item, requirement, CBORType::Uuid).map_err(|e| ctx.latch_pub(e))
}

pub fn get_binary_uuid_in_map_sz<'buf>(
    ctx: &mut DecodeContext<'buf>,
    label: &'buf str,
    requirement: TagRequirement,
) -> Result<&'buf [u8]> {
    let item = in_map_sz(ctx, label, CBORType::Any)?;
    tagged_bytes(&item, requirement, CBORType::Uuid).map_err(|e| ctx.latch_pub(e))
}

/***************************************************************************************************
 * Positive/negative bignum
 ***************************************************************************************************/

/// A bignum's raw big-endian magnitude, with a flag for whether it was tag 3 (negative,
/// representing `-1 - n`) rather than tag 2 (positive).
#[derive(Debug, Clone, Copy)]
pub struct Bignum<'buf> {
    pub magnitude: &'buf [u8],
    pub negative: bool,
}

fn bignum_from_item<'buf>(item: &Item<'buf>) -> Result<Bignum<'buf>> {
    match (item.semantic_type(), item.value) {
        (CBORType::PosBignum, CBOR::Bstr(b)) => Ok(Bignum { magnitude: b, negative: false }),
        (CBORType::NegBignum, CBOR::Bstr(b)) => Ok(Bignum { magnitude: b, negative: true }),
        _ => Err(CBORError::UnexpectedType),
    }
}

pub fn get_bignum<'buf>(ctx: &mut DecodeContext<'buf>) -> Result<Bignum<'buf>> {
    let item = at_cursor(ctx)?;
    bignum_from_item(&item).map_err(|e| ctx.latch_pub(e))
}

pub fn get_bignum_in_map_n<'buf>(ctx: &mut DecodeContext<'buf>, label: i64) -> Result<Bignum<'buf>> {
    let item = in_map_n(ctx, label, CBORType::Any)?;
    bignum_from_item(&item).map_err(|e| ctx.latch_pub(e))
}

pub fn get_bignum_in_map_sz<'buf>(
    ctx: &mut DecodeContext<'buf>,
    label: &'buf str,
) -> Result<Bignum<'buf>> {
    let item = in_map_sz(ctx, label, CBORType::Any)?;
    bignum_from_item(&item).map_err(|e| ctx.latch_pub(e))
}

/***************************************************************************************************
 * Decimal fraction / bigfloat
 *
 * Both are wire-encoded as a 2-element array `[exponent, mantissa]` (tag 4: base 10, tag
 * 5: base 2), with mantissa either a native integer or a bignum (tag 2/3). Reading one
 * means entering that array, so these getters take the cursor through a full
 * Enter/Exit, not just a single `GetNextRaw`.
 ***************************************************************************************************/

fn read_exponent<'buf>(ctx: &mut DecodeContext<'buf>) -> Result<i64> {
    let item = ctx.get_next_raw()?;
    int64_strict(&item).map_err(|e| ctx.latch_pub(e))
}

fn read_mantissa_i64<'buf>(ctx: &mut DecodeContext<'buf>) -> Result<i64> {
    let item = ctx.get_next_raw()?;
    match bignum_from_item(&item) {
        Ok(big) => {
            let magnitude = bignum_bytes_to_u64(big.magnitude).map_err(|e| ctx.latch_pub(e))?;
            convert::bignum_to_i64(magnitude, big.negative).map_err(|e| ctx.latch_pub(e))
        }
        Err(_) => int64_strict(&item).map_err(|e| ctx.latch_pub(e)),
    }
}

/// Read the `[exponent, mantissa]` body of an already-entered decimal-fraction/bigfloat
/// array and exit it, scaling the result to an exact `i64`.
fn read_fraction_body<'buf>(ctx: &mut DecodeContext<'buf>, base: i64) -> Result<i64> {
    let exp = read_exponent(ctx)?;
    let mantissa = read_mantissa_i64(ctx)?;
    ctx.exit_array()?;
    convert::scaled_integer_i64(mantissa, exp, base)
}

fn fractional_i64<'buf>(
    ctx: &mut DecodeContext<'buf>,
    want_tag: CBORType,
    base: i64,
) -> Result<i64> {
    ctx.enter_checked(RegionKind::Array, |item| {
        if item.semantic_type() == want_tag {
            Ok(())
        } else {
            Err(CBORError::ExpectedTag)
        }
    })?;
    read_fraction_body(ctx, base).map_err(|e| ctx.latch_pub(e))
}

/// As `fractional_i64`, for a decimal-fraction/bigfloat item the caller already holds
/// (e.g. from `int64_convert`/`uint64_convert`'s mask-driven dispatch) rather than one
/// read fresh from the cursor - used by the `GetXConvert`/`GetXConvertAll` family so a
/// tag-4/5 source is honored under `cvt::DECIMAL_FRACTION`/`cvt::BIGFLOAT` exactly as it
/// is through the dedicated `GetDecimalFraction`/`GetBigFloat` getters.
fn fractional_convert_i64<'buf>(
    ctx: &mut DecodeContext<'buf>,
    item: &Item<'buf>,
    content_start: usize,
    base: i64,
) -> Result<i64> {
    ctx.enter_region_at(RegionKind::Array, item, content_start)?;
    read_fraction_body(ctx, base)
}

/// As `fractional_convert_i64`, for an unsigned destination - rejects a negative result
/// with `NumberSignConversion`, matching the sign-rejection arms elsewhere in
/// `uint64_convert`.
fn fractional_convert_u64<'buf>(
    ctx: &mut DecodeContext<'buf>,
    item: &Item<'buf>,
    content_start: usize,
    base: i64,
) -> Result<u64> {
    let v = fractional_convert_i64(ctx, item, content_start, base)?;
    u64::try_from(v).map_err(|_| CBORError::NumberSignConversion)
}

/// Read a decimal fraction (tag 4) as an exact `i64`. A non-zero value whose magnitude
/// is not integral - including one that scales below one in absolute value - fails with
/// `ConversionUnderOverflow` rather than being rounded or truncated (see
/// `crate::convert::scaled_integer_i64`).
pub fn get_decimal_fraction_i64<'buf>(ctx: &mut DecodeContext<'buf>) -> Result<i64> {
    fractional_i64(ctx, CBORType::DecimalFraction, 10)
}

/// Read a bigfloat (tag 5) as its nearest integral `i64`.
pub fn get_big_float_i64<'buf>(ctx: &mut DecodeContext<'buf>) -> Result<i64> {
    fractional_i64(ctx, CBORType::BigFloat, 2)
}

/// A decimal fraction/bigfloat's mantissa, preserved at full precision rather than
/// narrowed through `crate::convert::scaled_integer_i64`: either a native integer, or a
/// bignum borrowing its big-endian magnitude straight from the input buffer.
#[derive(Debug, Clone, Copy)]
pub enum Mantissa<'buf> {
    Int(i64),
    Big(Bignum<'buf>),
}

/// An unscaled `mantissa * base^exponent` pair, returned without collapsing the
/// mantissa to an `i64` - the counterpart of `get_decimal_fraction_i64`/
/// `get_big_float_i64` for callers whose mantissa does not fit (or who want exact
/// precision the scaled-integer ladder would reject as `ConversionUnderOverflow`).
#[derive(Debug, Clone, Copy)]
pub struct ExpAndMantissa<'buf> {
    pub exponent: i64,
    pub mantissa: Mantissa<'buf>,
}

fn fractional_big<'buf>(
    ctx: &mut DecodeContext<'buf>,
    want_tag: CBORType,
) -> Result<ExpAndMantissa<'buf>> {
    ctx.enter_checked(RegionKind::Array, |item| {
        if item.semantic_type() == want_tag {
            Ok(())
        } else {
            Err(CBORError::ExpectedTag)
        }
    })?;
    let exponent = read_exponent(ctx)?;
    let item = ctx.get_next_raw()?;
    let mantissa = match bignum_from_item(&item) {
        Ok(big) => Mantissa::Big(big),
        Err(_) => Mantissa::Int(int64_strict(&item).map_err(|e| ctx.latch_pub(e))?),
    };
    ctx.exit_array()?;
    Ok(ExpAndMantissa { exponent, mantissa })
}

/// Read a decimal fraction (tag 4) as an `(exponent, mantissa)` pair without scaling -
/// the mantissa may be a bignum too large for `get_decimal_fraction_i64` to represent.
pub fn get_decimal_fraction_big<'buf>(ctx: &mut DecodeContext<'buf>) -> Result<ExpAndMantissa<'buf>> {
    fractional_big(ctx, CBORType::DecimalFraction)
}

/// Read a bigfloat (tag 5) as an `(exponent, mantissa)` pair without scaling. See
/// [`get_decimal_fraction_big`].
pub fn get_big_float_big<'buf>(ctx: &mut DecodeContext<'buf>) -> Result<ExpAndMantissa<'buf>> {
    fractional_big(ctx, CBORType::BigFloat)
}

/***************************************************************************************************
 * Epoch date
 ***************************************************************************************************/

/// Read an epoch-based date (tag 1) as whole seconds since the Unix epoch. A
/// non-integral float epoch is rounded to the nearest second, ties to even.
pub fn get_epoch_date<'buf>(ctx: &mut DecodeContext<'buf>) -> Result<i64> {
    let item = at_cursor(ctx)?;
    if item.semantic_type() != CBORType::DateEpoch {
        return Err(ctx.latch_pub(CBORError::ExpectedTag));
    }
    match item.value {
        CBOR::UInt(v) => i64::try_from(v).map_err(|_| ctx.latch_pub(CBORError::ConversionUnderOverflow)),
        CBOR::NInt(v) => {
            if v > i64::MAX as u64 {
                Err(ctx.latch_pub(CBORError::ConversionUnderOverflow))
            } else {
                Ok(-1 - v as i64)
            }
        }
        #[cfg(feature = "float")]
        CBOR::Float16(v) => convert::f64_to_i64_round(f64::from(v)).map_err(|e| ctx.latch_pub(e)),
        #[cfg(feature = "float")]
        CBOR::Float32(v) => convert::f64_to_i64_round(v as f64).map_err(|e| ctx.latch_pub(e)),
        #[cfg(feature = "float")]
        CBOR::Float64(v) => convert::f64_to_i64_round(v).map_err(|e| ctx.latch_pub(e)),
        _ => Err(ctx.latch_pub(CBORError::UnexpectedType)),
    }
}

/// As `get_epoch_date`, additionally parsed into a `chrono::DateTime<Utc>` (requires the
/// `full` feature, which pulls in `chrono`).
#[cfg(feature = "full")]
pub fn get_epoch_date_time<'buf>(ctx: &mut DecodeContext<'buf>) -> Result<DateTime<Utc>> {
    let secs = get_epoch_date(ctx)?;
    DateTime::from_timestamp(secs, 0).ok_or_else(|| ctx.latch_pub(CBORError::ConversionUnderOverflow))
}

/// Read a standard date/time string (tag 0) and parse it as RFC 3339. Requires the
/// `full` feature (pulls in `chrono`). Fails with `CBORError::MalformedEncoding` if the
/// text is not valid RFC 3339, in addition to the usual tag-matching failures
/// `get_date_string` can raise.
#[cfg(feature = "full")]
pub fn get_date_time<'buf>(
    ctx: &mut DecodeContext<'buf>,
    requirement: TagRequirement,
) -> Result<DateTime<FixedOffset>> {
    let s = get_date_string(ctx, requirement)?;
    DateTime::parse_from_rfc3339(s).map_err(|_| ctx.latch_pub(CBORError::MalformedEncoding))
}

