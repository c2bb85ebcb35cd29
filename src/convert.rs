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
 * Numeric conversion ladder
 *
 * CBOR represents a number in eight different ways: native `int64`/`uint64`, a 16/32/64
 * bit float, a positive/negative bignum, a base-10 decimal fraction, or a base-2 bigfloat.
 * The `GetXConvert` family of typed getters accepts a bitmask of which of these the
 * caller considers a legitimate source, and this module is where each of those source
 * shapes is actually coerced into the requested native destination type - with an
 * explicit overflow/underflow check rather than a wrapping or saturating cast.
 **************************************************************************************************/
use crate::error::{CBORError, Result};

use std::convert::TryFrom;

/// Coerce a `u64` bignum (big-endian byte string, already parsed into its widest native
/// form) into an `i64`, with the `negative` flag applied per RFC 8949 §3.4.3 (`NegBignum`
/// represents `-1 - n`). Fails with `ConversionUnderOverflow` if the magnitude does not
/// fit.
pub(crate) fn bignum_to_i64(value: u64, negative: bool) -> Result<i64> {
    if negative {
        if value > i64::MAX as u64 {
            Err(CBORError::ConversionUnderOverflow)
        } else {
            Ok(-1 - value as i64)
        }
    } else {
        i64::try_from(value).map_err(|_| CBORError::ConversionUnderOverflow)
    }
}

/// Coerce a `u64` bignum into a `u64`, rejecting a negative bignum outright (an unsigned
/// getter has no representation for it).
pub(crate) fn bignum_to_u64(value: u64, negative: bool) -> Result<u64> {
    if negative {
        Err(CBORError::NumberSignConversion)
    } else {
        Ok(value)
    }
}

/// Compute `mantissa * 10^exp` (decimal fraction, tag 4) or `mantissa * 2^exp` (bigfloat,
/// tag 5) and coerce the result to `i64`. A zero mantissa is always `0`, regardless of
/// exponent. Otherwise, a negative exponent whose magnitude scales `mantissa` to
/// something below one in absolute value is `ConversionUnderOverflow` (the value is
/// non-zero but has no integer representation), and likewise for any exponent that
/// leaves a non-zero remainder - this ladder never rounds a fractional result, it only
/// ever returns an exact integer or fails.
pub(crate) fn scaled_integer_i64(mantissa: i64, exp: i64, base: i64) -> Result<i64> {
    if mantissa == 0 {
        return Ok(0);
    }
    if exp == 0 {
        return Ok(mantissa);
    }
    if exp > 0 {
        let mut acc = mantissa;
        for _ in 0..exp {
            acc = acc
                .checked_mul(base)
                .ok_or(CBORError::ConversionUnderOverflow)?;
        }
        Ok(acc)
    } else {
        let mut divisor: i64 = 1;
        for _ in 0..(-exp) {
            divisor = divisor
                .checked_mul(base)
                .ok_or(CBORError::ConversionUnderOverflow)?;
        }
        if mantissa % divisor != 0 {
            Err(CBORError::ConversionUnderOverflow)
        } else {
            Ok(mantissa / divisor)
        }
    }
}

/// Round a finite `f64` to the nearest `i64`, ties rounding to even, failing with
/// `ConversionUnderOverflow` if the rounded value is outside `i64`'s range. NaN and
/// infinities are rejected the same way - neither has an integer representation.
pub(crate) fn f64_to_i64_round(v: f64) -> Result<i64> {
    if !v.is_finite() {
        return Err(CBORError::ConversionUnderOverflow);
    }
    let rounded = round_ties_even(v);
    if rounded < i64::MIN as f64 || rounded > i64::MAX as f64 {
        Err(CBORError::ConversionUnderOverflow)
    } else {
        Ok(rounded as i64)
    }
}

/// As [`f64_to_i64_round`], for an unsigned destination. A negative source (even `-0.0`
/// rounded down) is rejected with `NumberSignConversion`.
pub(crate) fn f64_to_u64_round(v: f64) -> Result<u64> {
    if !v.is_finite() {
        return Err(CBORError::ConversionUnderOverflow);
    }
    let rounded = round_ties_even(v);
    if rounded < 0.0 {
        Err(CBORError::NumberSignConversion)
    } else if rounded > u64::MAX as f64 {
        Err(CBORError::ConversionUnderOverflow)
    } else {
        Ok(rounded as u64)
    }
}

fn round_ties_even(v: f64) -> f64 {
    let floor = v.floor();
    let diff = v - floor;
    if diff < 0.5 {
        floor
    } else if diff > 0.5 {
        floor + 1.0
    } else if (floor as i64) % 2 == 0 {
        floor
    } else {
        floor + 1.0
    }
}
