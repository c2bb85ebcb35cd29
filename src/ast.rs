/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
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
 * CBOR Item model
 *
 * `CBOR` is the raw, wire-level shape of a decoded item: what major type it is and its
 * immediate payload. It never builds a tree - `Array`/`Map` carry only a declared
 * element/pair count, and their contents are reached by entering the region on the
 * cursor (see `crate::cursor`).
 *
 * `Item` is what the cursor actually hands back: a `CBOR` value plus whatever tags
 * preceded it on the wire and, if it was read out of a map, the label (key) it was
 * paired with.
 **************************************************************************************************/
use crate::constants::{tag, MAX_TAGS_PER_ITEM};
use crate::error::CBORError;

use std::convert::TryFrom;

#[cfg(feature = "float")]
use half::f16;

/// The raw, untagged shape of a decoded CBOR item.
///
/// Positive and negative integers are both held as a `u64`: for `NInt`, the actual
/// represented value is `-1 - NInt` (RFC 8949 §3.1), which lets this type hold the full
/// negative range without a wider integer type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CBOR<'buf> {
    /// An unsigned integer, major type 0.
    UInt(u64),
    /// A negative integer, major type 1. The represented value is `-1 - NInt`.
    NInt(u64),
    /// A byte string, major type 2. Borrows from the input buffer.
    Bstr(&'buf [u8]),
    /// A UTF-8 text string, major type 3. Borrows from the input buffer.
    Tstr(&'buf str),
    /// An array header, major type 4. Holds only the declared element count - the
    /// elements themselves are reached via `EnterArray`.
    Array(usize),
    /// A map header, major type 5. Holds only the declared pair count - the pairs
    /// themselves are reached via `EnterMap`.
    Map(usize),
    /// A simple value outside the `False`/`True`/`Null`/`Undefined` range.
    Simple(u8),
    /// The simple value `false`.
    False,
    /// The simple value `true`.
    True,
    /// The simple value `null`.
    Null,
    /// The simple value `undefined`.
    Undefined,
    /// A half precision (16 bit) IEEE-754 float.
    #[cfg(feature = "float")]
    Float16(f16),
    /// A single precision (32 bit) IEEE-754 float.
    #[cfg(feature = "float")]
    Float32(f32),
    /// A double precision (64 bit) IEEE-754 float.
    #[cfg(feature = "float")]
    Float64(f64),
}

impl<'buf> CBOR<'buf> {
    /// Return `true` if this item is a bare numeric value (integer or, with the `float`
    /// feature, a float). Used by the conversion ladder to decide whether a value is a
    /// plausible source for numeric coercion before it looks at tags at all.
    pub fn is_numeric(&self) -> bool {
        matches!(self.content_type(), CBORType::UInt | CBORType::NInt)
            || self.is_float()
    }

    #[cfg(feature = "float")]
    fn is_float(&self) -> bool {
        matches!(
            self.content_type(),
            CBORType::Float16 | CBORType::Float32 | CBORType::Float64
        )
    }

    #[cfg(not(feature = "float"))]
    fn is_float(&self) -> bool {
        false
    }

    /// The discriminant of this item's raw wire shape, ignoring any tags.
    pub fn content_type(&self) -> CBORType {
        match self {
            CBOR::UInt(_) => CBORType::UInt,
            CBOR::NInt(_) => CBORType::NInt,
            CBOR::Bstr(_) => CBORType::Bstr,
            CBOR::Tstr(_) => CBORType::Tstr,
            CBOR::Array(_) => CBORType::Array,
            CBOR::Map(_) => CBORType::Map,
            CBOR::Simple(_) => CBORType::Simple,
            CBOR::False => CBORType::False,
            CBOR::True => CBORType::True,
            CBOR::Null => CBORType::Null,
            CBOR::Undefined => CBORType::Undefined,
            #[cfg(feature = "float")]
            CBOR::Float16(_) => CBORType::Float16,
            #[cfg(feature = "float")]
            CBOR::Float32(_) => CBORType::Float32,
            #[cfg(feature = "float")]
            CBOR::Float64(_) => CBORType::Float64,
        }
    }
}

/// The discriminant of a CBOR item. Unlike [`CBOR`], this also enumerates the
/// *semantic* types that arise from interpreting a recognized tag over a raw shape
/// (`DateString`, `Uuid`, ...), plus the two wildcard tokens used by type filters:
/// `Any` matches anything, `None_` terminates a label list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CBORType {
    UInt,
    NInt,
    Bstr,
    Tstr,
    Array,
    Map,
    Simple,
    False,
    True,
    Null,
    Undefined,
    Float16,
    Float32,
    Float64,
    DateString,
    DateEpoch,
    Uri,
    Base64,
    Base64Url,
    Regex,
    Mime,
    Uuid,
    PosBignum,
    NegBignum,
    DecimalFraction,
    BigFloat,
    /// Wildcard: matches any content type. Used as a type filter, never as a decoded
    /// item's own type.
    Any,
    /// Sentinel terminator for label lists (`GetItemsInMap`) and "no tag applies" tag
    /// specs.
    None_,
}

/// A map key, as attached to an [`Item`] that was read out of a map region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Label<'buf> {
    /// An integer label. CBOR allows the full negative/positive integer range as a map
    /// key; this narrows to `i64`, which covers every label any real protocol uses.
    Int(i64),
    /// A text-string label.
    Text(&'buf str),
}

impl<'buf> TryFrom<CBOR<'buf>> for Label<'buf> {
    type Error = CBORError;

    /// Interpret a decoded map key as a `Label`. Integer keys are narrowed to `i64`
    /// (`NInt`'s represented value is `-1 - NInt`, per RFC 8949 §3.1); text keys are
    /// taken as-is. Any other key shape - byte string, array, float, ... - is legal CBOR
    /// but not a label this crate supports, and is rejected with `UnexpectedType`.
    fn try_from(value: CBOR<'buf>) -> Result<Self, Self::Error> {
        match value {
            CBOR::UInt(v) => i64::try_from(v)
                .map(Label::Int)
                .map_err(|_| CBORError::ConversionUnderOverflow),
            CBOR::NInt(v) => {
                if v > i64::MAX as u64 {
                    Err(CBORError::ConversionUnderOverflow)
                } else {
                    Ok(Label::Int(-1 - v as i64))
                }
            }
            CBOR::Tstr(s) => Ok(Label::Text(s)),
            _ => Err(CBORError::UnexpectedType),
        }
    }
}

impl<'buf> From<i64> for Label<'buf> {
    fn from(v: i64) -> Self {
        Label::Int(v)
    }
}

impl<'buf> From<&'buf str> for Label<'buf> {
    fn from(s: &'buf str) -> Self {
        Label::Text(s)
    }
}

/// A fixed-capacity, insertion-ordered list of the tag numbers that preceded an item on
/// the wire, outermost tag first. Bounded by [`MAX_TAGS_PER_ITEM`] - a longer tag chain
/// is rejected with `CBORError::TooManyTags` rather than silently truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagList {
    tags: [u64; MAX_TAGS_PER_ITEM],
    len: usize,
}

impl Default for TagList {
    fn default() -> Self {
        TagList {
            tags: [0; MAX_TAGS_PER_ITEM],
            len: 0,
        }
    }
}

impl TagList {
    /// An empty tag list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tag number to the end of the list (nearest the value last).
    ///
    /// # Errors
    /// Returns `Err(())` if the list is already at `MAX_TAGS_PER_ITEM`; the caller is
    /// expected to translate this into `CBORError::TooManyTags`.
    pub fn push(&mut self, t: u64) -> Result<(), ()> {
        if self.len >= MAX_TAGS_PER_ITEM {
            return Err(());
        }
        self.tags[self.len] = t;
        self.len += 1;
        Ok(())
    }

    /// Number of tags carried.
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` if no tags are present.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The full ordered tag chain, outermost first.
    pub fn as_slice(&self) -> &[u64] {
        &self.tags[..self.len]
    }

    /// The innermost tag (closest to the value), which is the one that determines the
    /// item's semantic type.
    pub fn innermost(&self) -> Option<u64> {
        if self.len == 0 {
            None
        } else {
            Some(self.tags[self.len - 1])
        }
    }

    /// `true` if `t` appears anywhere in the chain.
    pub fn contains(&self, t: u64) -> bool {
        self.as_slice().iter().any(|&x| x == t)
    }
}

/// A single decoded CBOR item: its raw shape, the tag chain that preceded it on the
/// wire, and - if it was read out of a map - the label it was paired with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Item<'buf> {
    /// Raw wire shape of the item.
    pub value: CBOR<'buf>,
    /// Tag numbers preceding the item, outermost first.
    pub tags: TagList,
    /// The map key this item was read against, if the cursor was inside a map region.
    pub label: Option<Label<'buf>>,
}

impl<'buf> Item<'buf> {
    pub(crate) fn new(value: CBOR<'buf>, tags: TagList, label: Option<Label<'buf>>) -> Self {
        Item { value, tags, label }
    }

    /// The item's raw content type, ignoring tags.
    pub fn content_type(&self) -> CBORType {
        self.value.content_type()
    }

    /// The item's semantic type: the content type as modified by the innermost
    /// recognized tag, or just the content type if no recognized tag applies.
    ///
    /// Tag 24 and tag 63 are both accepted wherever "encoded CBOR" is expected, and are
    /// not otherwise distinguished here - that distinction belongs to `EnterBstrWrapped`,
    /// not to type interpretation.
    pub fn semantic_type(&self) -> CBORType {
        let content = self.content_type();
        match (self.tags.innermost(), content) {
            (Some(tag::DATE_TIME_STRING), CBORType::Tstr) => CBORType::DateString,
            (Some(tag::EPOCH_DATE), CBORType::UInt)
            | (Some(tag::EPOCH_DATE), CBORType::NInt) => CBORType::DateEpoch,
            #[cfg(feature = "float")]
            (Some(tag::EPOCH_DATE), CBORType::Float16)
            | (Some(tag::EPOCH_DATE), CBORType::Float32)
            | (Some(tag::EPOCH_DATE), CBORType::Float64) => CBORType::DateEpoch,
            (Some(tag::POS_BIGNUM), CBORType::Bstr) => CBORType::PosBignum,
            (Some(tag::NEG_BIGNUM), CBORType::Bstr) => CBORType::NegBignum,
            (Some(tag::DECIMAL_FRACTION), CBORType::Array) => CBORType::DecimalFraction,
            (Some(tag::BIGFLOAT), CBORType::Array) => CBORType::BigFloat,
            (Some(tag::URI), CBORType::Tstr) => CBORType::Uri,
            (Some(tag::BASE64URL), CBORType::Tstr) => CBORType::Base64Url,
            (Some(tag::BASE64), CBORType::Tstr) => CBORType::Base64,
            (Some(tag::REGEX), CBORType::Tstr) => CBORType::Regex,
            (Some(tag::MIME), CBORType::Tstr) => CBORType::Mime,
            (Some(tag::BINARY_MIME), CBORType::Tstr) => CBORType::Mime,
            (Some(tag::UUID), CBORType::Bstr) => CBORType::Uuid,
            _ => content,
        }
    }
}
