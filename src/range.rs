use std::{cmp, fmt::Debug, ops};

// Range type inspired by the Range type used in [dissimilar](https://docs.rs/dissimilar)
#[derive(Debug)]
pub struct Range<'a, T> {
    inner: &'a [T],
    offset: usize,
    len: usize,
}

impl<T> Copy for Range<'_, T> {}

impl<T> Clone for Range<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Range<'a, T> {
    pub fn new(inner: &'a [T], bounds: impl RangeBounds) -> Self {
        let (offset, len) = bounds.index(inner.len());
        Range { inner, offset, len }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn as_slice(&self) -> &'a [T] {
        &self.inner[self.offset..self.offset + self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'a, T> {
        self.as_slice().iter()
    }

    pub fn slice(&self, bounds: impl RangeBounds) -> Self {
        let (offset, len) = bounds.index(self.len);
        Range {
            inner: self.inner,
            offset: self.offset + offset,
            len,
        }
    }

    // The grow/shrink/shift operations below adjust which window of `inner`
    // this range covers; the callers guarantee the adjusted window stays in
    // bounds.

    pub fn grow_up(&mut self, adjust: usize) {
        self.offset -= adjust;
        self.len += adjust;
    }

    pub fn grow_down(&mut self, adjust: usize) {
        self.len += adjust;
        debug_assert!(self.offset + self.len <= self.inner.len());
    }

    pub fn shift_up(&mut self, adjust: usize) {
        self.offset -= adjust;
    }

    pub fn shift_down(&mut self, adjust: usize) {
        self.offset += adjust;
        debug_assert!(self.offset + self.len <= self.inner.len());
    }

    pub fn shrink_front(&mut self, adjust: usize) {
        self.offset += adjust;
        self.len -= adjust;
    }

    pub fn shrink_back(&mut self, adjust: usize) {
        self.len -= adjust;
    }
}

impl<T> Range<'_, T>
where
    T: PartialEq,
{
    pub fn common_prefix_len(&self, other: Range<'_, T>) -> usize {
        for (i, (item1, item2)) in self.iter().zip(other.iter()).enumerate() {
            if item1 != item2 {
                return i;
            }
        }
        cmp::min(self.len, other.len)
    }

    pub fn common_suffix_len(&self, other: Range<'_, T>) -> usize {
        for (i, (item1, item2)) in self.iter().rev().zip(other.iter().rev()).enumerate() {
            if item1 != item2 {
                return i;
            }
        }
        cmp::min(self.len, other.len)
    }
}

/// One cell of an edit script: a window into the old text, the new text, or
/// (for unchanged stretches) both.
#[derive(Debug)]
pub enum DiffRange<'a, 'b, T> {
    Equal(Range<'a, T>, Range<'b, T>),
    Delete(Range<'a, T>),
    Insert(Range<'b, T>),
}

impl<T> Copy for DiffRange<'_, '_, T> {}

impl<T> Clone for DiffRange<'_, '_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> DiffRange<'_, '_, T> {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        match self {
            DiffRange::Equal(range, _) | DiffRange::Delete(range) => range.len(),
            DiffRange::Insert(range) => range.len(),
        }
    }

    pub fn grow_up(&mut self, adjust: usize) {
        match self {
            DiffRange::Equal(range1, range2) => {
                range1.grow_up(adjust);
                range2.grow_up(adjust);
            }
            DiffRange::Delete(range) => range.grow_up(adjust),
            DiffRange::Insert(range) => range.grow_up(adjust),
        }
    }

    pub fn grow_down(&mut self, adjust: usize) {
        match self {
            DiffRange::Equal(range1, range2) => {
                range1.grow_down(adjust);
                range2.grow_down(adjust);
            }
            DiffRange::Delete(range) => range.grow_down(adjust),
            DiffRange::Insert(range) => range.grow_down(adjust),
        }
    }

    pub fn shift_up(&mut self, adjust: usize) {
        match self {
            DiffRange::Equal(range1, range2) => {
                range1.shift_up(adjust);
                range2.shift_up(adjust);
            }
            DiffRange::Delete(range) => range.shift_up(adjust),
            DiffRange::Insert(range) => range.shift_up(adjust),
        }
    }

    pub fn shift_down(&mut self, adjust: usize) {
        match self {
            DiffRange::Equal(range1, range2) => {
                range1.shift_down(adjust);
                range2.shift_down(adjust);
            }
            DiffRange::Delete(range) => range.shift_down(adjust),
            DiffRange::Insert(range) => range.shift_down(adjust),
        }
    }

    pub fn shrink_front(&mut self, adjust: usize) {
        match self {
            DiffRange::Equal(range1, range2) => {
                range1.shrink_front(adjust);
                range2.shrink_front(adjust);
            }
            DiffRange::Delete(range) => range.shrink_front(adjust),
            DiffRange::Insert(range) => range.shrink_front(adjust),
        }
    }

    pub fn shrink_back(&mut self, adjust: usize) {
        match self {
            DiffRange::Equal(range1, range2) => {
                range1.shrink_back(adjust);
                range2.shrink_back(adjust);
            }
            DiffRange::Delete(range) => range.shrink_back(adjust),
            DiffRange::Insert(range) => range.shrink_back(adjust),
        }
    }
}

pub trait RangeBounds: Sized + Clone + Debug {
    // Returns (offset, len).
    fn try_index(self, len: usize) -> Option<(usize, usize)>;

    fn index(self, len: usize) -> (usize, usize) {
        match self.clone().try_index(len) {
            Some(range) => range,
            None => panic!("index out of range, index={:?}, len={}", self, len),
        }
    }
}

impl RangeBounds for ops::Range<usize> {
    fn try_index(self, len: usize) -> Option<(usize, usize)> {
        if self.start <= self.end && self.end <= len {
            Some((self.start, self.end - self.start))
        } else {
            None
        }
    }
}

impl RangeBounds for ops::RangeFrom<usize> {
    fn try_index(self, len: usize) -> Option<(usize, usize)> {
        if self.start <= len {
            Some((self.start, len - self.start))
        } else {
            None
        }
    }
}

impl RangeBounds for ops::RangeTo<usize> {
    fn try_index(self, len: usize) -> Option<(usize, usize)> {
        if self.end <= len {
            Some((0, self.end))
        } else {
            None
        }
    }
}

impl RangeBounds for ops::RangeFull {
    fn try_index(self, len: usize) -> Option<(usize, usize)> {
        Some((0, len))
    }
}
