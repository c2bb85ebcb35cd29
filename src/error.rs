/***************************************************************************************************
 * Copyright (c) 2021-2023 Qualcomm Innovation Center, Inc. All rights reserved.
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
 * cbor_cursor Error API
 **************************************************************************************************/
use std::result;

#[cfg(any(feature = "full", test))]
use thiserror::Error;

/// An alias for Result<T, CBORError> used throughout this crate.
pub type Result<T> = result::Result<T, CBORError>;

/// `CBORError` describes every way in which traversing, searching or converting a CBOR
/// item can fail. A single flat enum is used throughout the crate rather than per-module
/// error types so that it can be latched as the cursor's sticky error (see
/// [`crate::cursor::DecodeContext`]).
#[cfg_attr(any(feature = "full", test), derive(Copy, Clone, Error, Debug, PartialEq, Eq))]
#[cfg_attr(all(not(feature = "full"), not(test)), derive(Copy, Clone, Debug, PartialEq, Eq))]
pub enum CBORError {
    // --- Structural errors ---------------------------------------------------------
    /// The item at the cursor was not of the type the caller required.
    #[cfg_attr(any(feature = "full", test), error("Did not match expected CBOR type"))]
    UnexpectedType,
    /// There is no next item to read: either the enclosing region is exhausted or the
    /// buffer is. Recoverable - `Exit*` absorbs it.
    #[cfg_attr(any(feature = "full", test), error("No more items available in this region"))]
    NoMoreItems,
    /// Pushing a new region onto the nesting stack would exceed `MAX_NESTING`.
    #[cfg_attr(any(feature = "full", test), error("Array/map nesting exceeds the maximum supported depth"))]
    ArrayNestingTooDeep,
    /// An `Exit*` call named a region kind that does not match the top of the nesting
    /// stack.
    #[cfg_attr(any(feature = "full", test), error("Exit call does not match the active region"))]
    CloseMismatch,
    /// The input buffer ended where a complete item was expected.
    #[cfg_attr(any(feature = "full", test), error("Unexpected end of input buffer"))]
    HitEnd,
    /// `GetItemInMapN`/`GetItemInMapSZ` found no entry for the requested label.
    #[cfg_attr(any(feature = "full", test), error("Map does not contain the requested label"))]
    LabelNotFound,
    /// A map contains two entries with the same label.
    #[cfg_attr(any(feature = "full", test), error("Map contains a duplicate label"))]
    DuplicateLabel,
    /// A map-scoped operation was attempted while the active region is not a map.
    #[cfg_attr(any(feature = "full", test), error("The current region is not a map"))]
    MapNotEntered,

    // --- Numeric errors --------------------------------------------------------------
    /// A numeric value is representable at the source but not in the requested
    /// destination type.
    #[cfg_attr(any(feature = "full", test), error("Overflow or underflow in number conversion"))]
    ConversionUnderOverflow,
    /// An unsigned getter was used on a value that is negative.
    #[cfg_attr(any(feature = "full", test), error("Requested an unsigned value from a negative number"))]
    NumberSignConversion,
    /// A decimal-fraction or bigfloat's exponent/mantissa pair cannot be coerced to the
    /// requested type.
    #[cfg_attr(any(feature = "full", test), error("Exponent/mantissa pair cannot be converted"))]
    BadExpAndMantissa,
    /// A getter that requires floating point support was called while the `float`
    /// feature is not enabled.
    #[cfg_attr(any(feature = "full", test), error("Floating point support is not compiled in"))]
    FloatDisabled,

    // --- Input errors ------------------------------------------------------------------
    /// The additional-information encoding for a type-7 (simple/float) item is illegal.
    #[cfg_attr(any(feature = "full", test), error("Illegal major-type-7 additional information"))]
    BadType7,
    /// `Finish()` found bytes remaining after the top-level region was fully consumed.
    #[cfg_attr(any(feature = "full", test), error("Extra bytes remain after the decoded item(s)"))]
    ExtraBytes,
    /// A slice extracted during parsing had an unexpected length for the target type.
    #[cfg_attr(any(feature = "full", test), error("Slice length is incompatible with the target type conversion"))]
    BadSliceLength,
    /// A text string contains an invalid UTF-8 sequence.
    #[cfg_attr(any(feature = "full", test), error("A tstr contains an invalid UTF8 sequence"))]
    Utf8Error,
    /// The additional-information encoding is illegal or the item is otherwise malformed.
    #[cfg_attr(any(feature = "full", test), error("Encoding is illegal or malformed"))]
    MalformedEncoding,
    /// Indefinite-length items, or another feature this decoder does not implement, were
    /// encountered.
    #[cfg_attr(any(feature = "full", test), error("The encoding feature is not supported"))]
    NotImplemented,
    /// A tag chain longer than `MAX_TAGS_PER_ITEM` was encountered.
    #[cfg_attr(any(feature = "full", test), error("Too many chained tags on a single item"))]
    TooManyTags,
    /// A tag requirement (`MATCH_TAG`/`MATCH_CONTENT_TYPE`/`MATCH_EITHER`) was not
    /// satisfied by the item at the cursor.
    #[cfg_attr(any(feature = "full", test), error("Unexpected tag value"))]
    ExpectedTag,
    /// Indicates a malformed `break` marker; reserved for future indefinite-length
    /// support.
    #[cfg_attr(any(feature = "full", test), error("Unexpected break marker"))]
    BadBreak,

    // --- User errors -------------------------------------------------------------------
    /// A caller-supplied `GetItemsInMapWithCallback` callback asked to abort. The
    /// enclosed value is caller-defined and opaque to the core decoder.
    #[cfg_attr(any(feature = "full", test), error("Caller callback requested abort"))]
    CallbackFail(u32),
}
