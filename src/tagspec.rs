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
 * Tag matcher
 *
 * A `TagSpec` is a caller-supplied policy describing whether a tagged wrapper is
 * required, forbidden, or optional for a given item. Every typed getter that interprets
 * a tag (`GetDateString`, `GetURI`, `GetBinaryUUID`, ...) is built over `TagSpec::matches`.
 **************************************************************************************************/
use crate::ast::{CBORType, Item};
use crate::error::{CBORError, Result};

/// How strictly a `TagSpec` requires the semantic tag to be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagRequirement {
    /// The item must carry a tag that resolves to one of `tagged_types`.
    MatchTag,
    /// The item's raw content type must be one of `content_types`, and it must not
    /// itself carry a conflicting semantic tag.
    MatchContentType,
    /// Either of the above is acceptable.
    MatchEither,
}

/// A compile-time-constant matching policy for a family of typed getters, e.g.
/// "accept tag 0 over a text string, or a bare text string" for `GetDateString`.
#[derive(Debug, Clone, Copy)]
pub struct TagSpec {
    pub requirement: TagRequirement,
    /// Up to three semantic types that satisfy `MatchTag`/`MatchEither`. Unused slots
    /// are `CBORType::None_`.
    pub tagged_types: [CBORType; 3],
    /// Up to three raw content types that satisfy `MatchContentType`/`MatchEither`.
    /// Unused slots are `CBORType::None_`.
    pub content_types: [CBORType; 3],
}

impl TagSpec {
    /// Construct a spec accepting only a single semantic type via a tag, with a single
    /// allowed raw content type as the content-type fallback. This is the shape nearly
    /// every typed getter in `crate::getters` needs.
    pub const fn single(requirement: TagRequirement, tagged: CBORType, content: CBORType) -> Self {
        TagSpec {
            requirement,
            tagged_types: [tagged, CBORType::None_, CBORType::None_],
            content_types: [content, CBORType::None_, CBORType::None_],
        }
    }

    fn tagged_type_matches(&self, t: CBORType) -> bool {
        self.tagged_types.iter().any(|&x| x == t)
    }

    fn content_type_matches(&self, t: CBORType) -> bool {
        self.content_types.iter().any(|&x| x == t)
    }

    /// Decide whether `item` satisfies this policy, returning `Ok(())` if so and
    /// `Err(CBORError::UnexpectedType)` otherwise.
    pub fn matches(&self, item: &Item) -> Result<()> {
        let semantic = item.semantic_type();
        let content = item.content_type();
        let ok = match self.requirement {
            TagRequirement::MatchTag => self.tagged_type_matches(semantic),
            TagRequirement::MatchContentType => {
                self.content_type_matches(content) && semantic == content
            }
            TagRequirement::MatchEither => {
                self.tagged_type_matches(semantic) || self.content_type_matches(content)
            }
        };
        if ok {
            Ok(())
        } else {
            Err(CBORError::UnexpectedType)
        }
    }
}
