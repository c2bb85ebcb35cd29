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
 * Map search batch/callback forms, numeric conversion ladder (bignum/decimal
 * fraction/bigfloat), nesting depth limit, and close-mismatch scenarios.
 *
 * The float-dependent cases here (decimal fraction/bigfloat mantissa parsing reads
 * through `parse_item_shallow`, which only needs integer/bignum support) do not require
 * the `float` feature; only the plain `conversion_overflow_from_double` case in
 * `cursor_basic.rs` does.
 **************************************************************************************************/
extern crate cbor_cursor;

use cbor_cursor::constants_api::convert as cvt;
use cbor_cursor::decoder::DecodeContext;
use cbor_cursor::error::CBORError;
use cbor_cursor::getters;
use cbor_cursor::mapsearch_api::{get_items_in_map, get_items_in_map_with_callback, MapQuery};
use cbor_cursor::types::{CBORType, Label};

#[test]
fn nesting_depth_limit_is_enforced() {
    // 16 arrays, each wrapping exactly one element, the innermost of which is a bare 0.
    let mut input = vec![0x81u8; 16];
    input.push(0x00);
    let mut ctx = DecodeContext::new(&input);
    for _ in 0..15 {
        ctx.enter_array().unwrap();
    }
    let err = ctx.enter_array().unwrap_err();
    assert_eq!(err, CBORError::ArrayNestingTooDeep);
}

#[test]
fn close_mismatch_on_wrong_exit_kind() {
    // array[1]
    let input: &[u8] = &[0x81, 0x01];
    let mut ctx = DecodeContext::new(input);
    ctx.enter_array().unwrap();
    let err = ctx.exit_map().unwrap_err();
    assert_eq!(err, CBORError::CloseMismatch);
}

#[test]
fn enter_array_from_map_label() {
    // map{"items": [7, 8]}
    let input: &[u8] = &[0xa1, 0x65, b'i', b't', b'e', b'm', b's', 0x82, 0x07, 0x08];
    let mut ctx = DecodeContext::new(input);
    ctx.enter_map().unwrap();
    ctx.enter_array_from_map_label(Label::Text("items")).unwrap();
    assert_eq!(getters::get_int64(&mut ctx).unwrap(), 7);
    assert_eq!(getters::get_int64(&mut ctx).unwrap(), 8);
    ctx.exit_array().unwrap();
    ctx.exit_map().unwrap();
    assert!(ctx.finish().is_ok());
}

#[test]
fn uint64_rejects_negative_with_sign_conversion_error() {
    // nint(-1)
    let input: &[u8] = &[0x20];
    let mut ctx = DecodeContext::new(input);
    let err = getters::get_uint64(&mut ctx).unwrap_err();
    assert_eq!(err, CBORError::NumberSignConversion);
}

#[test]
fn positive_bignum_roundtrips_through_convert_and_raw_getter() {
    // tag(2) bstr(0x0100) == 256
    let input: &[u8] = &[0xc2, 0x42, 0x01, 0x00];
    let mut ctx = DecodeContext::new(input);
    let big = getters::get_bignum(&mut ctx).unwrap();
    assert_eq!(big.magnitude, &[0x01, 0x00]);
    assert!(!big.negative);

    let mut ctx2 = DecodeContext::new(input);
    let v = getters::get_uint64_convert(&mut ctx2, cvt::BIG_NUM).unwrap();
    assert_eq!(v, 256);
}

#[test]
fn negative_bignum_rejects_unsigned_convert() {
    // tag(3) bstr(0x00) - represents -1 - 0 = -1
    let input: &[u8] = &[0xc3, 0x41, 0x00];
    let mut ctx = DecodeContext::new(input);
    let err = getters::get_uint64_convert(&mut ctx, cvt::BIG_NUM).unwrap_err();
    assert_eq!(err, CBORError::NumberSignConversion);
}

#[test]
fn decimal_fraction_exact_integer() {
    // tag(4) [-1, 270] == 27.0
    let input: &[u8] = &[0xc4, 0x82, 0x20, 0x19, 0x01, 0x0e];
    let mut ctx = DecodeContext::new(input);
    let v = getters::get_decimal_fraction_i64(&mut ctx).unwrap();
    assert_eq!(v, 27);
    assert!(ctx.finish().is_ok());
}

#[test]
fn bigfloat_exact_integer() {
    // tag(5) [-1, 4] == 4 * 2^-1 == 2.0
    let input: &[u8] = &[0xc5, 0x82, 0x20, 0x04];
    let mut ctx = DecodeContext::new(input);
    let v = getters::get_big_float_i64(&mut ctx).unwrap();
    assert_eq!(v, 2);
}

#[test]
fn decimal_fraction_nonintegral_is_conversion_error() {
    // tag(4) [-1, 3] == 0.3, not representable as an exact i64
    let input: &[u8] = &[0xc4, 0x82, 0x20, 0x03];
    let mut ctx = DecodeContext::new(input);
    let err = getters::get_decimal_fraction_i64(&mut ctx).unwrap_err();
    assert_eq!(err, CBORError::ConversionUnderOverflow);
}

#[test]
fn decimal_fraction_zero_mantissa_is_zero_regardless_of_exponent() {
    // tag(4) [-5, 0] == 0 * 10^-5 == 0
    let input: &[u8] = &[0xc4, 0x82, 0x24, 0x00];
    let mut ctx = DecodeContext::new(input);
    let v = getters::get_decimal_fraction_i64(&mut ctx).unwrap();
    assert_eq!(v, 0);
}

#[test]
fn decimal_fraction_big_preserves_bignum_mantissa() {
    // tag(4) [-1, tag(2) bstr(0x0100)] == (256) * 10^-1, mantissa too precise to matter here -
    // exercises the non-scaling "big" getter, which must not collapse the mantissa to i64.
    let input: &[u8] = &[0xc4, 0x82, 0x20, 0xc2, 0x42, 0x01, 0x00];
    let mut ctx = DecodeContext::new(input);
    let got = getters::get_decimal_fraction_big(&mut ctx).unwrap();
    assert_eq!(got.exponent, -1);
    match got.mantissa {
        getters::Mantissa::Big(big) => {
            assert_eq!(big.magnitude, &[0x01, 0x00]);
            assert!(!big.negative);
        }
        getters::Mantissa::Int(_) => panic!("expected a bignum mantissa"),
    }
    assert!(ctx.finish().is_ok());
}

#[test]
fn decimal_fraction_honored_by_convert_all_at_cursor() {
    // tag(4) [-1, 270] == 27.0, read through the mask-driven ladder rather than the
    // dedicated GetDecimalFraction getter.
    let input: &[u8] = &[0xc4, 0x82, 0x20, 0x19, 0x01, 0x0e];
    let mut ctx = DecodeContext::new(input);
    let v = getters::get_int64_convert_all(&mut ctx).unwrap();
    assert_eq!(v, 27);
    assert!(ctx.finish().is_ok());
}

#[test]
fn bigfloat_honored_by_uint64_convert_all() {
    // tag(5) [-1, 4] == 2.0
    let input: &[u8] = &[0xc5, 0x82, 0x20, 0x04];
    let mut ctx = DecodeContext::new(input);
    let v = getters::get_uint64_convert_all(&mut ctx).unwrap();
    assert_eq!(v, 2);
}

#[test]
fn decimal_fraction_rejected_when_mask_excludes_it() {
    // Same input as above, but a mask missing DECIMAL_FRACTION falls through to
    // UnexpectedType rather than silently succeeding.
    let input: &[u8] = &[0xc4, 0x82, 0x20, 0x19, 0x01, 0x0e];
    let mut ctx = DecodeContext::new(input);
    let err = getters::get_int64_convert(&mut ctx, cvt::UINT64 | cvt::INT64).unwrap_err();
    assert_eq!(err, CBORError::UnexpectedType);
}

#[test]
fn decimal_fraction_convert_all_by_map_label_preserves_cursor_position() {
    // map{1: tag(4)[-1, 270], 2: 99} - GetIntConvertAllInMapN on label 1 must not disturb
    // the map's own sequential read position, even though it has to enter and exit the
    // fraction's array internally.
    let input: &[u8] = &[
        0xa2, 0x01, 0xc4, 0x82, 0x20, 0x19, 0x01, 0x0e, 0x02, 0x18, 0x63,
    ];
    let mut ctx = DecodeContext::new(input);
    ctx.enter_map().unwrap();
    let v = getters::get_int64_convert_in_map_n(&mut ctx, 1, cvt::ALL).unwrap();
    assert_eq!(v, 27);
    // A second by-label lookup only succeeds if the first left the map region's own
    // frame on top of the stack - if entering the fraction's array had leaked a frame,
    // this would fail with MapNotEntered instead.
    assert_eq!(getters::get_int64_in_map_n(&mut ctx, 2).unwrap(), 99);
    ctx.exit_map().unwrap();
    assert!(ctx.finish().is_ok());
}

#[test]
fn batch_label_lookup_single_pass() {
    // map{1: 10, 2: 20, 3: 30}
    let input: &[u8] = &[0xa3, 0x01, 0x0a, 0x02, 0x14, 0x03, 0x18, 0x1e];
    let mut ctx = DecodeContext::new(input);
    ctx.enter_map().unwrap();
    let queries = [
        MapQuery { label: Label::Int(3), type_filter: CBORType::Any },
        MapQuery { label: Label::Int(1), type_filter: CBORType::Any },
    ];
    let results = get_items_in_map(&mut ctx, &queries).unwrap();
    assert!(results[0].is_some());
    assert!(results[1].is_some());
    ctx.exit_map().unwrap();
    assert!(ctx.finish().is_ok());
}

#[test]
fn callback_visits_unmatched_entries_only() {
    // map{1: 10, 2: 20, 3: 30}
    let input: &[u8] = &[0xa3, 0x01, 0x0a, 0x02, 0x14, 0x03, 0x18, 0x1e];
    let mut ctx = DecodeContext::new(input);
    ctx.enter_map().unwrap();
    let queries = [MapQuery { label: Label::Int(2), type_filter: CBORType::Any }];
    let mut visited: Vec<Option<Label<'_>>> = Vec::new();
    let result = get_items_in_map_with_callback(&mut ctx, &queries, &mut visited, |v, item| {
        v.push(item.label);
        Ok(())
    });
    assert!(result.is_ok());
    assert_eq!(visited.len(), 2);
    assert!(visited.contains(&Some(Label::Int(1))));
    assert!(visited.contains(&Some(Label::Int(3))));
}

#[test]
fn callback_abort_propagates_callback_fail() {
    let input: &[u8] = &[0xa2, 0x01, 0x0a, 0x02, 0x14];
    let mut ctx = DecodeContext::new(input);
    ctx.enter_map().unwrap();
    let queries: [MapQuery<'_>; 0] = [];
    let mut dummy = ();
    let result = get_items_in_map_with_callback(&mut ctx, &queries, &mut dummy, |_, _| {
        Err(CBORError::CallbackFail(42))
    });
    assert_eq!(result.unwrap_err(), CBORError::CallbackFail(42));
}

#[test]
fn get_next_with_tags_exposes_tag_chain() {
    // tag(32) "http://example.com" - the URI tag, read through the escape hatch rather
    // than the dedicated GetURI getter.
    let mut input = vec![0xd8, 0x20, 0x73];
    input.extend_from_slice(b"http://example.com");
    let mut ctx = DecodeContext::new(&input);
    let item = ctx.get_next_with_tags().unwrap();
    assert_eq!(item.tags.as_slice(), &[32]);
    assert_eq!(item.semantic_type(), CBORType::Uri);
}
