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
 * Traversal cursor
 *
 * `DecodeContext` is the single object a caller drives: one reader position plus a
 * bounded nesting stack of the map/array/bstr-wrapped regions currently entered. There is
 * no intermediate tree - every region is visited by entering it, reading its children
 * with `GetNextRaw`, and exiting it.
 *
 * Every fallible operation is gated on a *sticky* error: the first error encountered
 * latches into `sticky_error` and every subsequent call becomes a no-op returning that
 * same error, until the caller observes it with `GetAndResetError` (or exits the region
 * that produced a merely-exhausted condition). This lets a caller write a long chain of
 * `Get*` calls and check for failure exactly once at the end.
 **************************************************************************************************/
use crate::ast::{CBORType, Item, Label, CBOR};
use crate::constants::tag;
use crate::decode;
use crate::error::{CBORError, Result};
use crate::nesting::{NestingFrame, NestingStack, RegionKind};

use std::convert::TryFrom;

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// The traversal cursor over a single CBOR-encoded buffer.
///
/// `'buf` is the lifetime of the input buffer; every `Item` handed back by `GetNextRaw`
/// borrows from it directly, with no copying.
#[derive(Debug)]
pub struct DecodeContext<'buf> {
    input: &'buf [u8],
    pos: usize,
    stack: NestingStack,
    sticky_error: Option<CBORError>,
}

impl<'buf> DecodeContext<'buf> {
    /// Start a new cursor at the beginning of `input`, with the implicit top-level
    /// region covering the whole buffer.
    #[cfg_attr(feature = "trace", trace)]
    pub fn new(input: &'buf [u8]) -> Self {
        let top = NestingFrame::new(RegionKind::Top, input.len(), 0);
        DecodeContext {
            input,
            pos: 0,
            stack: NestingStack::new(top),
            sticky_error: None,
        }
    }

    /// The first error this cursor encountered, if any. Does not clear it.
    pub fn get_error(&self) -> Option<CBORError> {
        self.sticky_error
    }

    /// The first error this cursor encountered, if any, clearing it so subsequent calls
    /// are no longer gated on it.
    pub fn get_and_reset_error(&mut self) -> Option<CBORError> {
        self.sticky_error.take()
    }

    /// `true` if at least one map/array/bstr-wrapped region is currently entered (i.e.
    /// the cursor is somewhere other than the implicit top-level region).
    pub fn in_bounded_mode(&self) -> bool {
        self.stack.depth() > 1
    }

    fn gate(&self) -> Result<()> {
        match self.sticky_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Latch `e` as the sticky error if none is latched yet, and return it either way -
    /// every fallible operation below returns through this so the *first* error is always
    /// the one callers observe.
    fn latch(&mut self, e: CBORError) -> CBORError {
        if self.sticky_error.is_none() {
            self.sticky_error = Some(e);
        }
        e
    }

    #[cfg_attr(feature = "trace", trace)]
    fn offset_of(&self, sub: &[u8]) -> usize {
        let base = self.input.as_ptr() as usize;
        let p = sub.as_ptr() as usize;
        p - base
    }

    /***********************************************************************************
     * Sequential reads
     ***********************************************************************************/

    /// Read the next item in the active region.
    ///
    /// Inside a map region this reads a complete label/value pair and returns the value
    /// with `label` set; inside an array, bstr-wrapped, or the top-level region it reads
    /// one bare item with `label` left `None`. Fails with `NoMoreItems` once the active
    /// region's declared count (map/array) or byte extent (bstr-wrapped/top) is
    /// exhausted.
    #[cfg_attr(feature = "trace", trace)]
    pub fn get_next_raw(&mut self) -> Result<Item<'buf>> {
        self.gate()?;
        let frame = *self.stack.top();
        match frame.kind {
            RegionKind::Map => {
                if frame.items_consumed >= frame.bound {
                    return Err(self.latch(CBORError::NoMoreItems));
                }
                let (after_key, _key_tags, key_raw) = decode::parse_tagged_item(self.input, self.pos)
                    .map_err(|e| self.latch(e))?;
                let label = Label::try_from(key_raw).map_err(|e| self.latch(e))?;
                let (after_val, val_tags, val_raw) = decode::parse_tagged_item(self.input, after_key)
                    .map_err(|e| self.latch(e))?;
                self.pos = after_val;
                self.stack.top_mut().items_consumed += 1;
                Ok(Item::new(val_raw, val_tags, Some(label)))
            }
            RegionKind::Array => {
                if frame.items_consumed >= frame.bound {
                    return Err(self.latch(CBORError::NoMoreItems));
                }
                let (after, tags, raw) = decode::parse_tagged_item(self.input, self.pos)
                    .map_err(|e| self.latch(e))?;
                self.pos = after;
                self.stack.top_mut().items_consumed += 1;
                Ok(Item::new(raw, tags, None))
            }
            RegionKind::Top | RegionKind::BstrWrap => {
                if self.pos >= frame.bound {
                    return Err(self.latch(CBORError::NoMoreItems));
                }
                let (after, tags, raw) = decode::parse_tagged_item(self.input, self.pos)
                    .map_err(|e| self.latch(e))?;
                self.pos = after;
                self.stack.top_mut().items_consumed += 1;
                Ok(Item::new(raw, tags, None))
            }
        }
    }

    /// Read the next item along with its full tag chain.
    ///
    /// This is the escape hatch for callers that need to see every tag on an item - every
    /// `Item` returned from this cursor already carries its tag chain in `Item::tags`, so
    /// this is equivalent to `GetNextRaw`; it exists as a distinct name to mirror the
    /// typed getters, which hide tags the caller didn't ask about.
    #[cfg_attr(feature = "trace", trace)]
    pub fn get_next_with_tags(&mut self) -> Result<Item<'buf>> {
        self.get_next_raw()
    }

    /***********************************************************************************
     * Enter / Exit
     ***********************************************************************************/

    fn push_region_after_item(&mut self, kind: RegionKind, item: &Item<'buf>) -> Result<()> {
        let bound = match (kind, item.value) {
            (RegionKind::Map, CBOR::Map(n)) => n,
            (RegionKind::Array, CBOR::Array(n)) => n,
            _ => return Err(self.latch(CBORError::UnexpectedType)),
        };
        let frame = NestingFrame::new(kind, bound, self.pos);
        self.stack.push(frame).map_err(|e| self.latch(e))
    }

    #[cfg_attr(feature = "trace", trace)]
    fn enter(&mut self, kind: RegionKind) -> Result<()> {
        self.gate()?;
        let item = self.get_next_raw()?;
        self.push_region_after_item(kind, &item)
    }

    /// Push a region frame for `item`, whose tag/header bytes have already been parsed
    /// elsewhere and whose first child begins at `content_start` - used when a caller
    /// already holds the item (e.g. found by `crate::mapsearch::scan_map`) rather than
    /// reading it fresh with `get_next_raw`.
    pub(crate) fn enter_region_at(
        &mut self,
        kind: RegionKind,
        item: &Item<'buf>,
        content_start: usize,
    ) -> Result<()> {
        self.pos = content_start;
        self.push_region_after_item(kind, item)
    }

    /// As `enter`, but first runs `check` over the item about to be entered - used by
    /// `crate::getters` to require a specific tag (e.g. tag 4, decimal fraction) on the
    /// array/map being entered, not just its bare shape.
    pub(crate) fn enter_checked(
        &mut self,
        kind: RegionKind,
        check: impl FnOnce(&Item<'buf>) -> Result<()>,
    ) -> Result<()> {
        self.gate()?;
        let item = self.get_next_raw()?;
        check(&item).map_err(|e| self.latch(e))?;
        self.push_region_after_item(kind, &item)
    }

    /// Enter the map at the cursor, pushing a new bounded region. The cursor resumes
    /// positioned at the map's first key.
    pub fn enter_map(&mut self) -> Result<()> {
        self.enter(RegionKind::Map)
    }

    /// Enter the array at the cursor, pushing a new bounded region. The cursor resumes
    /// positioned at the array's first element.
    pub fn enter_array(&mut self) -> Result<()> {
        self.enter(RegionKind::Array)
    }

    /// Enter a byte string whose content is itself a CBOR item (tag 24, "encoded CBOR
    /// data item", or tag 63, "self-describe CBOR sequence" - both are accepted
    /// identically here). Returns the wrapped bytes, in case the caller also wants the
    /// raw encoding (e.g. to hash it).
    #[cfg_attr(feature = "trace", trace)]
    pub fn enter_bstr_wrapped(&mut self) -> Result<&'buf [u8]> {
        self.gate()?;
        let item = self.get_next_raw()?;
        let bytes = match item.value {
            CBOR::Bstr(b)
                if item.tags.innermost() == Some(tag::ENCODED_CBOR)
                    || item.tags.innermost() == Some(tag::CBOR_SEQUENCE) =>
            {
                b
            }
            _ => return Err(self.latch(CBORError::UnexpectedType)),
        };
        let start = self.offset_of(bytes);
        let end = start + bytes.len();
        let frame = NestingFrame::new(RegionKind::BstrWrap, end, start);
        self.stack.push(frame).map_err(|e| self.latch(e))?;
        self.pos = start;
        Ok(bytes)
    }

    #[cfg_attr(feature = "trace", trace)]
    fn exit(&mut self, kind: RegionKind) -> Result<()> {
        if let Some(e) = self.sticky_error {
            if e == CBORError::NoMoreItems {
                self.sticky_error = None;
            } else {
                return Err(e);
            }
        }
        let top = *self.stack.top();
        if top.kind != kind {
            return Err(self.latch(CBORError::CloseMismatch));
        }
        match top.kind {
            RegionKind::Map => {
                for _ in 0..(top.bound - top.items_consumed) {
                    self.pos = decode::skip_item(self.input, self.pos).map_err(|e| self.latch(e))?;
                    self.pos = decode::skip_item(self.input, self.pos).map_err(|e| self.latch(e))?;
                }
            }
            RegionKind::Array => {
                for _ in 0..(top.bound - top.items_consumed) {
                    self.pos = decode::skip_item(self.input, self.pos).map_err(|e| self.latch(e))?;
                }
            }
            RegionKind::BstrWrap => {
                self.pos = top.bound;
            }
            RegionKind::Top => return Err(self.latch(CBORError::CloseMismatch)),
        }
        self.stack.pop().map_err(|e| self.latch(e))?;
        Ok(())
    }

    /// Exit the active map region, skipping any unread remaining pairs. Fails with
    /// `CloseMismatch` if the active region is not a map.
    pub fn exit_map(&mut self) -> Result<()> {
        self.exit(RegionKind::Map)
    }

    /// Exit the active array region, skipping any unread remaining elements. Fails with
    /// `CloseMismatch` if the active region is not an array.
    pub fn exit_array(&mut self) -> Result<()> {
        self.exit(RegionKind::Array)
    }

    /// Exit the active bstr-wrapped region, discarding any unread remainder of the
    /// wrapped bytes. Fails with `CloseMismatch` if the active region is not
    /// bstr-wrapped.
    pub fn exit_bstr_wrapped(&mut self) -> Result<()> {
        self.exit(RegionKind::BstrWrap)
    }

    /***********************************************************************************
     * Map rewind / targeted entry
     ***********************************************************************************/

    /// Reposition the cursor to the first key of the active map region, as if no pairs
    /// had been read yet. A latched `NoMoreItems` is cleared by this call (it is exactly
    /// the condition rewinding exists to recover from); any other latched error is left
    /// in place. Fails with `MapNotEntered` if the active region is not a map.
    #[cfg_attr(feature = "trace", trace)]
    pub fn rewind_map(&mut self) -> Result<()> {
        if let Some(e) = self.sticky_error {
            if e == CBORError::NoMoreItems {
                self.sticky_error = None;
            } else {
                return Err(e);
            }
        }
        if self.stack.top().kind != RegionKind::Map {
            return Err(self.latch(CBORError::MapNotEntered));
        }
        let first_child_pos = self.stack.top().first_child_pos;
        self.pos = first_child_pos;
        self.stack.top_mut().items_consumed = 0;
        Ok(())
    }

    /// Enter, as a map, the value found under `label` in the active map region, without
    /// disturbing the active region's declared bound. This is a targeted jump rather
    /// than a sequential read: it leaves the parent map's own sequential position
    /// unusable for further `GetNextRaw` calls (marked exhausted) until the caller calls
    /// `RewindMap` on it, since the scan that located `label` does not establish which
    /// pair index precedes it.
    pub fn enter_map_from_map_label(&mut self, label: Label) -> Result<()> {
        self.enter_from_map_label(label, RegionKind::Map)
    }

    /// As `enter_map_from_map_label`, but enters the found value as an array.
    pub fn enter_array_from_map_label(&mut self, label: Label) -> Result<()> {
        self.enter_from_map_label(label, RegionKind::Array)
    }

    #[cfg_attr(feature = "trace", trace)]
    fn enter_from_map_label(&mut self, label: Label, kind: RegionKind) -> Result<()> {
        self.gate()?;
        let want = match kind {
            RegionKind::Map => CBORType::Map,
            RegionKind::Array => CBORType::Array,
            _ => CBORType::Any,
        };
        let (item, content_start) = crate::mapsearch::scan_map(self, label, want)?;
        let bound = self.stack.top().bound;
        self.stack.top_mut().items_consumed = bound;
        self.enter_region_at(kind, &item, content_start)
    }

    /***********************************************************************************
     * Lifecycle
     ***********************************************************************************/

    /// Finish decoding. Fails if a sticky error is latched, if any region besides the
    /// implicit top-level one remains entered, or if unconsumed bytes remain after the
    /// top-level region's items.
    #[cfg_attr(feature = "trace", trace)]
    pub fn finish(self) -> Result<()> {
        if let Some(e) = self.sticky_error {
            return Err(e);
        }
        if self.stack.depth() != 1 {
            return Err(CBORError::CloseMismatch);
        }
        if self.pos != self.input.len() {
            return Err(CBORError::ExtraBytes);
        }
        Ok(())
    }

    /***********************************************************************************
     * Crate-internal accessors for `crate::mapsearch`
     ***********************************************************************************/

    pub(crate) fn input(&self) -> &'buf [u8] {
        self.input
    }

    pub(crate) fn raw_pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub(crate) fn top_frame(&self) -> NestingFrame {
        *self.stack.top()
    }

    pub(crate) fn latch_pub(&mut self, e: CBORError) -> CBORError {
        self.latch(e)
    }
}
