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
 * Nesting stack
 *
 * The cursor's bounded regions (map, array, byte-string-wrapped CBOR, and the implicit
 * top-level region) are tracked on a fixed-capacity, inline stack - no heap allocation,
 * same discipline the rest of this crate follows.
 **************************************************************************************************/
use crate::constants::MAX_NESTING;
use crate::error::{CBORError, Result};

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// The kind of region a `NestingFrame` represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    /// The implicit region enclosing the whole input buffer.
    Top,
    /// A CBOR map: children are read in label/value pairs.
    Map,
    /// A CBOR array: children are read one at a time.
    Array,
    /// A byte string whose content is itself CBOR (tag 24 or tag 63).
    BstrWrap,
}

/// One entry on the nesting stack.
///
/// For `Map` and `Array` regions, `bound` is the declared pair/element count and
/// `items_consumed` counts pairs/elements read so far. For `Top` and `BstrWrap` regions,
/// `bound` is the absolute byte offset marking the end of the region, and
/// `items_consumed` is advisory only (there is no declared item count to check it
/// against).
#[derive(Debug, Clone, Copy)]
pub struct NestingFrame {
    pub kind: RegionKind,
    pub bound: usize,
    pub items_consumed: usize,
    /// Reader offset of the region's first child, cached so `RewindMap` can restore it.
    pub first_child_pos: usize,
}

impl NestingFrame {
    pub fn new(kind: RegionKind, bound: usize, first_child_pos: usize) -> Self {
        NestingFrame {
            kind,
            bound,
            items_consumed: 0,
            first_child_pos,
        }
    }
}

/// A fixed-capacity stack of [`NestingFrame`]s.
#[derive(Debug, Clone, Copy)]
pub struct NestingStack {
    frames: [NestingFrame; MAX_NESTING],
    depth: usize,
}

impl NestingStack {
    pub fn new(top: NestingFrame) -> Self {
        let mut frames = [top; MAX_NESTING];
        frames[0] = top;
        NestingStack { frames, depth: 1 }
    }

    /// Number of frames currently on the stack (always >= 1; the top-level region is
    /// never popped).
    #[cfg_attr(feature = "trace", trace)]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Push a new region. Fails with `ArrayNestingTooDeep` if the stack is already at
    /// capacity.
    #[cfg_attr(feature = "trace", trace)]
    pub fn push(&mut self, frame: NestingFrame) -> Result<()> {
        if self.depth >= MAX_NESTING {
            return Err(CBORError::ArrayNestingTooDeep);
        }
        self.frames[self.depth] = frame;
        self.depth += 1;
        Ok(())
    }

    /// Pop and return the top region. Never pops the implicit top-level region -
    /// returns `CloseMismatch` if called with only that frame left.
    #[cfg_attr(feature = "trace", trace)]
    pub fn pop(&mut self) -> Result<NestingFrame> {
        if self.depth <= 1 {
            return Err(CBORError::CloseMismatch);
        }
        self.depth -= 1;
        Ok(self.frames[self.depth])
    }

    /// Immutable reference to the active (top) region.
    #[cfg_attr(feature = "trace", trace)]
    pub fn top(&self) -> &NestingFrame {
        &self.frames[self.depth - 1]
    }

    /// Mutable reference to the active (top) region.
    #[cfg_attr(feature = "trace", trace)]
    pub fn top_mut(&mut self) -> &mut NestingFrame {
        &mut self.frames[self.depth - 1]
    }
}
