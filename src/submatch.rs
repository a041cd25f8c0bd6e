//! Value types produced by inflation
//!
//! - [`Pos`] - a zero-width byte offset recorded by a position marker
//! - [`Submatch`] - a captured span together with its offsets
//! - [`Region`] - one begin/end pair reported by the engine for a capture slot

use serde::{Deserialize, Serialize};
use std::fmt;

/// A byte offset into the input, recorded by a zero-width position marker
///
/// Position fields consume no input. Two adjacent markers therefore record
/// the same offset.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Pos(pub usize);

impl Pos {
    /// The offset as a plain `usize`
    #[inline]
    pub fn offset(self) -> usize {
        self.0
    }
}

impl From<Pos> for usize {
    fn from(pos: Pos) -> usize {
        pos.0
    }
}

impl From<usize> for Pos {
    fn from(offset: usize) -> Self {
        Pos(offset)
    }
}

impl PartialEq<usize> for Pos {
    fn eq(&self, other: &usize) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A captured span: begin offset, end offset and the matched bytes
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Submatch {
    /// Offset of the first matched byte
    pub begin: usize,
    /// Offset one past the last matched byte
    pub end: usize,
    /// The matched bytes, `input[begin..end]`
    pub bytes: Vec<u8>,
}

impl Submatch {
    /// Create a submatch from a region of `input`
    pub fn from_region(region: Region, input: &[u8]) -> Self {
        Self {
            begin: region.begin,
            end: region.end,
            bytes: input[region.begin..region.end].to_vec(),
        }
    }

    /// Length of the match in bytes
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    /// Whether the match was empty
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// The matched text, if it is valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }
}

impl fmt::Display for Submatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.bytes))
    }
}

/// The begin/end byte offsets of one matched capture slot
///
/// Unmatched slots are represented as `None` wherever a region is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    /// Start byte offset (inclusive)
    pub begin: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Region {
    /// Create a new region
    #[inline]
    pub fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }

    /// Whether the region covers no bytes
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }
}

impl From<regex::Match<'_>> for Region {
    fn from(m: regex::Match<'_>) -> Self {
        Region::new(m.start(), m.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submatch_from_region() {
        let input = b"foo.bar";
        let sub = Submatch::from_region(Region::new(4, 7), input);
        assert_eq!(sub.begin, 4);
        assert_eq!(sub.end, 7);
        assert_eq!(sub.as_str(), Some("bar"));
        assert_eq!(sub.len(), 3);
        assert_eq!(sub.to_string(), "bar");
    }

    #[test]
    fn test_empty_submatch() {
        let sub = Submatch::from_region(Region::new(2, 2), b"abc");
        assert!(sub.is_empty());
        assert_eq!(sub.as_str(), Some(""));
    }

    #[test]
    fn test_pos_conversions() {
        let pos = Pos::from(3);
        assert_eq!(pos, 3usize);
        assert_eq!(usize::from(pos), 3);
        assert_eq!(pos.to_string(), "3");
    }

    #[test]
    fn test_pos_serializes_as_number() {
        let json = serde_json::to_string(&Pos(7)).unwrap();
        assert_eq!(json, "7");
    }
}
