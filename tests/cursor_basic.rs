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
 * Cursor traversal: basic map/nested/sticky-error/conversion/tag/duplicate scenarios
 **************************************************************************************************/
extern crate cbor_cursor;

use cbor_cursor::constants_api::convert as cvt;
use cbor_cursor::decoder::{DecodeContext, TagRequirement};
use cbor_cursor::error::CBORError;
use cbor_cursor::getters;
use cbor_cursor::types::Label;

#[test]
fn basic_map() {
    // map{1: 2, 3: 4}
    let input: &[u8] = &[0xa2, 0x01, 0x02, 0x03, 0x04];
    let mut ctx = DecodeContext::new(input);
    ctx.enter_map().unwrap();
    let v = getters::get_int64_in_map_n(&mut ctx, 3).unwrap();
    assert_eq!(v, 4);
    ctx.exit_map().unwrap();
    assert!(ctx.finish().is_ok());
}

#[test]
fn nested_map_via_label() {
    // map{"a": map{"b": 10}}
    let input: &[u8] = &[
        0xa1, 0x61, 0x61, 0xa1, 0x61, 0x62, 0x0a,
    ];
    let mut ctx = DecodeContext::new(input);
    ctx.enter_map().unwrap();
    ctx.enter_map_from_map_label(Label::Text("a")).unwrap();
    let v = getters::get_int64_in_map_sz(&mut ctx, "b").unwrap();
    assert_eq!(v, 10);
    ctx.exit_map().unwrap();
    ctx.exit_map().unwrap();
    assert!(ctx.finish().is_ok());
}

#[test]
fn sticky_error_after_wrong_enter() {
    // array[1]
    let input: &[u8] = &[0x81, 0x01];
    let mut ctx = DecodeContext::new(input);

    assert!(ctx.enter_map().is_err());
    // Any further operation is now a no-op returning the same latched error.
    let v = getters::get_int64(&mut ctx);
    assert!(v.is_err());
    assert_eq!(ctx.finish().unwrap_err(), CBORError::UnexpectedType);
}

#[test]
fn conversion_overflow_from_double() {
    // double == 2^63, which does not fit in an i64.
    let input: &[u8] = &[0xfb, 0x43, 0xe0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
    let mut ctx = DecodeContext::new(input);
    let result = getters::get_int64_convert(&mut ctx, cvt::FLOAT | cvt::DOUBLE);
    assert_eq!(result.unwrap_err(), CBORError::ConversionUnderOverflow);
}

#[test]
fn tag_match_policy() {
    // tag(0) "2024-01-02T00:00:00Z"
    let mut input = vec![0xc0, 0x74];
    input.extend_from_slice(b"2024-01-02T00:00:00Z");

    let mut ctx = DecodeContext::new(&input);
    let s = getters::get_date_string(&mut ctx, TagRequirement::MatchTag).unwrap();
    assert_eq!(s, "2024-01-02T00:00:00Z");

    let mut ctx2 = DecodeContext::new(&input);
    let err = getters::get_date_string(&mut ctx2, TagRequirement::MatchContentType).unwrap_err();
    assert_eq!(err, CBORError::UnexpectedType);
}

#[test]
fn duplicate_label_detected() {
    // map{1: 2, 1: 3} - label 1 appears twice.
    let input: &[u8] = &[0xa2, 0x01, 0x02, 0x01, 0x03];
    let mut ctx = DecodeContext::new(input);
    ctx.enter_map().unwrap();
    let result = getters::get_int64_in_map_n(&mut ctx, 1);
    assert!(result.is_err());
    assert_eq!(ctx.finish().unwrap_err(), CBORError::DuplicateLabel);
}

#[test]
fn exit_absorbs_exhausted_region() {
    // array[] - empty array, GetNextRaw immediately reports NoMoreItems, but ExitArray
    // still succeeds because NoMoreItems is recoverable.
    let input: &[u8] = &[0x80];
    let mut ctx = DecodeContext::new(input);
    ctx.enter_array().unwrap();
    assert!(ctx.get_next_raw().is_err());
    assert!(ctx.exit_array().is_ok());
    assert!(ctx.finish().is_ok());
}

#[test]
fn rewind_map_resets_sequential_position() {
    let input: &[u8] = &[0xa2, 0x01, 0x02, 0x03, 0x04];
    let mut ctx = DecodeContext::new(input);
    ctx.enter_map().unwrap();
    let _ = ctx.get_next_raw().unwrap();
    let _ = ctx.get_next_raw().unwrap();
    assert!(ctx.get_next_raw().is_err());
    ctx.rewind_map().unwrap();
    let first = ctx.get_next_raw().unwrap();
    assert_eq!(first.label, Some(Label::Int(1)));
}

#[test]
fn bstr_wrapped_enter_exit() {
    // bstr(tag 24) wrapping a single uint item `0x0a` (= 10), 1-byte length.
    let input: &[u8] = &[0xd8, 0x18, 0x41, 0x0a];
    let mut ctx = DecodeContext::new(input);
    let bytes = ctx.enter_bstr_wrapped().unwrap();
    assert_eq!(bytes, &[0x0a]);
    let v = getters::get_int64(&mut ctx).unwrap();
    assert_eq!(v, 10);
    ctx.exit_bstr_wrapped().unwrap();
    assert!(ctx.finish().is_ok());
}

#[test]
fn in_bounded_mode_reflects_stack_depth() {
    let input: &[u8] = &[0xa1, 0x01, 0x02];
    let mut ctx = DecodeContext::new(input);
    assert!(!ctx.in_bounded_mode());
    ctx.enter_map().unwrap();
    assert!(ctx.in_bounded_mode());
    ctx.exit_map().unwrap();
    assert!(!ctx.in_bounded_mode());
}
