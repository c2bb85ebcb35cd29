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
 * cbor_cursor wire-format and decoder constants
 **************************************************************************************************/

/// Additional Information bitmask
pub const AI_MASK: u8 = 0b000_11111;

/// Major Type 0 (Positive integers)
pub const MT_UINT: u8 = 0b000_00000;
/// Major Type 1 (Negative integers)
pub const MT_NINT: u8 = 0b001_00000;
/// Major Type 2 (Byte Strings)
pub const MT_BSTR: u8 = 0b010_00000;
/// Major Type 3 (Text Strings)
pub const MT_TSTR: u8 = 0b011_00000;
/// Major Type 4 (Array)
pub const MT_ARRAY: u8 = 0b100_00000;
/// Major Type 5 (Map)
pub const MT_MAP: u8 = 0b101_00000;
/// Major Type 6 (Tag)
pub const MT_TAG: u8 = 0b110_00000;
/// Major Type 7 (Floats, simple types etc.)
pub const MT_SIMPLE: u8 = 0b111_00000;

/// Maximum value of a "simple" payload mapped on AI bits
pub const PAYLOAD_AI_BITS: u8 = 23;
/// Indicates one byte of length of value information follows MT/AI byte
pub const PAYLOAD_ONE_BYTE: u8 = 24;
/// Indicates two bytes of length of value information follows MT/AI byte
pub const PAYLOAD_TWO_BYTES: u8 = 25;
/// Indicates four bytes of length of value information follows MT/AI byte
pub const PAYLOAD_FOUR_BYTES: u8 = 26;
/// Indicates eight bytes of length of value information follows MT/AI byte
pub const PAYLOAD_EIGHT_BYTES: u8 = 27;

/// Maximum nesting depth of map/array/bstr-wrapped regions that may be simultaneously
/// active on the cursor. Chosen to comfortably exceed the nesting depth of any
/// standardized CBOR-based protocol (COSE, EAT, CWT, ...) this crate targets.
pub const MAX_NESTING: usize = 16;

/// Maximum number of CBOR tag numbers preserved on a single item. A tag chain longer
/// than this is almost always a malformed or adversarial encoding.
pub const MAX_TAGS_PER_ITEM: usize = 4;

/// Maximum number of labels that may be requested in a single `GetItemsInMap` batch call.
pub const MAX_MAP_QUERY_LABELS: usize = 16;

/// IANA-registered CBOR tag numbers that the typed getters and tag matcher recognize.
pub mod tag {
    /// Standard date/time string (RFC 3339), tag 0.
    pub const DATE_TIME_STRING: u64 = 0;
    /// Epoch-based date/time, tag 1.
    pub const EPOCH_DATE: u64 = 1;
    /// Positive bignum, tag 2.
    pub const POS_BIGNUM: u64 = 2;
    /// Negative bignum, tag 3.
    pub const NEG_BIGNUM: u64 = 3;
    /// Decimal fraction, tag 4.
    pub const DECIMAL_FRACTION: u64 = 4;
    /// Bigfloat, tag 5.
    pub const BIGFLOAT: u64 = 5;
    /// Expected conversion to base64url encoding, tag 21.
    pub const BASE64URL_HINT: u64 = 21;
    /// Expected conversion to base64 encoding, tag 22.
    pub const BASE64_HINT: u64 = 22;
    /// Expected conversion to base16 encoding, tag 23.
    pub const BASE16_HINT: u64 = 23;
    /// Encoded CBOR data item wrapped in a byte string, tag 24.
    pub const ENCODED_CBOR: u64 = 24;
    /// URI, tag 32.
    pub const URI: u64 = 32;
    /// base64-encoded text, tag 34.
    pub const BASE64: u64 = 34;
    /// base64url-encoded text, tag 33.
    pub const BASE64URL: u64 = 33;
    /// Regular expression, tag 35.
    pub const REGEX: u64 = 35;
    /// MIME message, tag 36.
    pub const MIME: u64 = 36;
    /// Binary UUID, tag 37.
    pub const UUID: u64 = 37;
    /// Self-describe CBOR sequence, tag 63.
    pub const CBOR_SEQUENCE: u64 = 63;
    /// Binary MIME message, tag 257.
    pub const BINARY_MIME: u64 = 257;
}

/// Bitmask values used by the `GetXConvert` family of typed getters to describe which
/// wire representations a caller is willing to accept as the source of a numeric
/// conversion.
pub mod convert {
    /// Accept a native `int64` (`CBOR::NInt`) source.
    pub const INT64: u32 = 0x01;
    /// Accept a native `uint64` (`CBOR::UInt`) source.
    pub const UINT64: u32 = 0x02;
    /// Accept a 32-bit IEEE-754 float source.
    pub const FLOAT: u32 = 0x04;
    /// Accept a big float (base-2 mantissa/exponent) source.
    pub const BIGFLOAT: u32 = 0x08;
    /// Accept a decimal fraction (base-10 mantissa/exponent) source.
    pub const DECIMAL_FRACTION: u32 = 0x10;
    /// Accept a (positive or negative) bignum source.
    pub const BIG_NUM: u32 = 0x20;
    /// Accept a 64-bit IEEE-754 double source.
    pub const DOUBLE: u32 = 0x40;
    /// Accept either `INT64` or `UINT64` - the common case for a signed getter that
    /// should also accept an in-range unsigned value.
    pub const XINT64: u32 = INT64 | UINT64;
    /// Accept every numeric representation CBOR defines.
    pub const ALL: u32 = INT64 | UINT64 | FLOAT | DOUBLE | BIGFLOAT | DECIMAL_FRACTION | BIG_NUM;
}
