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
 * Map search
 *
 * A one-pass, non-destructive scan of the active map region: every search here walks the
 * full declared pair count from the region's first child, restores the cursor's position
 * when it is done, and keeps scanning after a match is found so a second occurrence of
 * the same label is still caught as `DuplicateLabel`. There is no index - a map with N
 * children and M lookups costs O(N*M), which this crate accepts as the price of staying
 * allocation-free.
 **************************************************************************************************/
use crate::ast::{CBORType, Item, Label};
use crate::constants::MAX_MAP_QUERY_LABELS;
use crate::cursor::DecodeContext;
use crate::decode;
use crate::error::{CBORError, Result};
use crate::nesting::RegionKind;

use std::convert::TryFrom;

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// Scan the active map region for `label`, restoring the cursor position before
/// returning. `type_filter` of `CBORType::Any` accepts any value shape; otherwise the
/// found value's content type or semantic type must match it.
///
/// Returns the matching item together with the absolute buffer offset of its first child -
/// the position right after its own tag/header bytes - used by
/// `DecodeContext::enter_map_from_map_label`/`enter_array_from_map_label` and by
/// `crate::getters`'s map-label convert paths to enter the value directly without
/// re-parsing its header.
#[cfg_attr(feature = "trace", trace)]
pub(crate) fn scan_map<'buf>(
    ctx: &mut DecodeContext<'buf>,
    label: Label,
    type_filter: CBORType,
) -> Result<(Item<'buf>, usize)> {
    let frame = ctx.top_frame();
    if frame.kind != RegionKind::Map {
        return Err(ctx.latch_pub(CBORError::MapNotEntered));
    }
    let saved_pos = ctx.raw_pos();
    let input = ctx.input();
    let mut scan_pos = frame.first_child_pos;
    let mut found: Option<(Item<'buf>, usize)> = None;

    for _ in 0..frame.bound {
        let (after_key, _key_tags, key_raw) =
            decode::parse_tagged_item(input, scan_pos).map_err(|e| ctx.latch_pub(e))?;
        let this_label = Label::try_from(key_raw).map_err(|e| ctx.latch_pub(e))?;
        let value_start = after_key;
        if this_label == label {
            let (after_val, val_tags, val_raw) =
                decode::parse_tagged_item(input, value_start).map_err(|e| ctx.latch_pub(e))?;
            if found.is_some() {
                ctx.set_pos(saved_pos);
                return Err(ctx.latch_pub(CBORError::DuplicateLabel));
            }
            found = Some((Item::new(val_raw, val_tags, Some(this_label)), after_val));
            // `after_val` is only the end of the value's own tag/header (what
            // `push_region_after_item` needs); resuming the scan from there would walk
            // straight into a container value's children as if they were the next key.
            scan_pos = decode::skip_item(input, value_start).map_err(|e| ctx.latch_pub(e))?;
        } else {
            scan_pos = decode::skip_item(input, value_start).map_err(|e| ctx.latch_pub(e))?;
        }
    }

    ctx.set_pos(saved_pos);
    match found {
        None => Err(ctx.latch_pub(CBORError::LabelNotFound)),
        Some((item, value_start)) => {
            if type_filter != CBORType::Any
                && item.content_type() != type_filter
                && item.semantic_type() != type_filter
            {
                Err(ctx.latch_pub(CBORError::UnexpectedType))
            } else {
                Ok((item, value_start))
            }
        }
    }
}

/// Find the item under an integer label in the active map region. Scans the entire
/// region regardless of where the match is found, so a duplicate label is always
/// detected rather than silently shadowed.
pub fn get_item_in_map_n<'buf>(
    ctx: &mut DecodeContext<'buf>,
    label: i64,
    type_filter: CBORType,
) -> Result<Item<'buf>> {
    ctx.get_error().map_or(Ok(()), Err)?;
    scan_map(ctx, Label::Int(label), type_filter).map(|(item, _)| item)
}

/// Find the item under a text label in the active map region. See
/// [`get_item_in_map_n`] for scan semantics.
pub fn get_item_in_map_sz<'buf>(
    ctx: &mut DecodeContext<'buf>,
    label: &'buf str,
    type_filter: CBORType,
) -> Result<Item<'buf>> {
    ctx.get_error().map_or(Ok(()), Err)?;
    scan_map(ctx, Label::Text(label), type_filter).map(|(item, _)| item)
}

/// One entry in a [`get_items_in_map`] batch request: the label to search for and the
/// expected type (`CBORType::Any` to accept anything).
#[derive(Debug, Clone, Copy)]
pub struct MapQuery<'buf> {
    pub label: Label<'buf>,
    pub type_filter: CBORType,
}

/// Look up a batch of labels in the active map region in a single pass. Returns one
/// `Option<Item>` per query, in the same order as `queries`, `None` where the label was
/// absent. Still fails with `DuplicateLabel` if any requested label occurs twice, and
/// with `UnexpectedType` if a found value does not match its query's `type_filter`.
///
/// `queries` is bounded by [`MAX_MAP_QUERY_LABELS`]; a longer batch is rejected up front
/// without scanning.
#[cfg_attr(feature = "trace", trace)]
pub fn get_items_in_map<'buf>(
    ctx: &mut DecodeContext<'buf>,
    queries: &[MapQuery<'buf>],
) -> Result<[Option<Item<'buf>>; MAX_MAP_QUERY_LABELS]> {
    ctx.get_error().map_or(Ok(()), Err)?;
    if queries.len() > MAX_MAP_QUERY_LABELS {
        return Err(ctx.latch_pub(CBORError::TooManyTags));
    }
    let frame = ctx.top_frame();
    if frame.kind != RegionKind::Map {
        return Err(ctx.latch_pub(CBORError::MapNotEntered));
    }
    let saved_pos = ctx.raw_pos();
    let input = ctx.input();
    let mut results: [Option<Item<'buf>>; MAX_MAP_QUERY_LABELS] = [None; MAX_MAP_QUERY_LABELS];
    let mut scan_pos = frame.first_child_pos;

    for _ in 0..frame.bound {
        let (after_key, _key_tags, key_raw) =
            decode::parse_tagged_item(input, scan_pos).map_err(|e| ctx.latch_pub(e))?;
        let this_label = Label::try_from(key_raw).map_err(|e| ctx.latch_pub(e))?;
        let value_start = after_key;
        let slot = queries.iter().position(|q| q.label == this_label);
        match slot {
            Some(i) => {
                let (_after_val, val_tags, val_raw) =
                    decode::parse_tagged_item(input, value_start).map_err(|e| ctx.latch_pub(e))?;
                if results[i].is_some() {
                    ctx.set_pos(saved_pos);
                    return Err(ctx.latch_pub(CBORError::DuplicateLabel));
                }
                let item = Item::new(val_raw, val_tags, Some(this_label));
                if queries[i].type_filter != CBORType::Any
                    && item.content_type() != queries[i].type_filter
                    && item.semantic_type() != queries[i].type_filter
                {
                    ctx.set_pos(saved_pos);
                    return Err(ctx.latch_pub(CBORError::UnexpectedType));
                }
                results[i] = Some(item);
                scan_pos = decode::skip_item(input, value_start).map_err(|e| ctx.latch_pub(e))?;
            }
            None => {
                scan_pos = decode::skip_item(input, value_start).map_err(|e| ctx.latch_pub(e))?;
            }
        }
    }

    ctx.set_pos(saved_pos);
    Ok(results)
}

/// Visit every child of the active map region that none of `queries` matched, in wire
/// order, calling `callback(user_ctx, item)` on each. The callback may abort the scan by
/// returning `Err(CBORError::CallbackFail(code))`, which is propagated (and latched) as
/// the scan's result.
#[cfg_attr(feature = "trace", trace)]
pub fn get_items_in_map_with_callback<'buf, U>(
    ctx: &mut DecodeContext<'buf>,
    queries: &[MapQuery<'buf>],
    user_ctx: &mut U,
    callback: impl Fn(&mut U, &Item<'buf>) -> Result<()>,
) -> Result<[Option<Item<'buf>>; MAX_MAP_QUERY_LABELS]> {
    ctx.get_error().map_or(Ok(()), Err)?;
    if queries.len() > MAX_MAP_QUERY_LABELS {
        return Err(ctx.latch_pub(CBORError::TooManyTags));
    }
    let frame = ctx.top_frame();
    if frame.kind != RegionKind::Map {
        return Err(ctx.latch_pub(CBORError::MapNotEntered));
    }
    let saved_pos = ctx.raw_pos();
    let input = ctx.input();
    let mut results: [Option<Item<'buf>>; MAX_MAP_QUERY_LABELS] = [None; MAX_MAP_QUERY_LABELS];
    let mut scan_pos = frame.first_child_pos;

    for _ in 0..frame.bound {
        let (after_key, _key_tags, key_raw) = match decode::parse_tagged_item(input, scan_pos) {
            Ok(v) => v,
            Err(e) => {
                ctx.set_pos(saved_pos);
                return Err(ctx.latch_pub(e));
            }
        };
        let this_label = match Label::try_from(key_raw) {
            Ok(v) => v,
            Err(e) => {
                ctx.set_pos(saved_pos);
                return Err(ctx.latch_pub(e));
            }
        };
        let value_start = after_key;
        let (_after_val, val_tags, val_raw) = match decode::parse_tagged_item(input, value_start) {
            Ok(v) => v,
            Err(e) => {
                ctx.set_pos(saved_pos);
                return Err(ctx.latch_pub(e));
            }
        };
        let item = Item::new(val_raw, val_tags, Some(this_label));
        match queries.iter().position(|q| q.label == this_label) {
            Some(i) => {
                if results[i].is_some() {
                    ctx.set_pos(saved_pos);
                    return Err(ctx.latch_pub(CBORError::DuplicateLabel));
                }
                results[i] = Some(item);
            }
            None => {
                if let Err(e) = callback(user_ctx, &item) {
                    ctx.set_pos(saved_pos);
                    let code = match e {
                        CBORError::CallbackFail(c) => CBORError::CallbackFail(c),
                        other => other,
                    };
                    return Err(ctx.latch_pub(code));
                }
            }
        }
        scan_pos = decode::skip_item(input, value_start).map_err(|e| ctx.latch_pub(e))?;
    }

    ctx.set_pos(saved_pos);
    Ok(results)
}
