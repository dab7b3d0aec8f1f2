//! One-dimensional intervals and coalesced interval sets.
//!
//! A `Range` is either closed (`[min, max]`) or open (`(min, max)`). The layout only ever needs
//! the vertical axis, so everything is plain `f64`.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    min: f64,
    max: f64,
    inclusive: bool,
}

impl Range {
    /// Builds a range, swapping the bounds if they arrive reversed.
    pub fn new(min: f64, max: f64, inclusive: bool) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min,
            max,
            inclusive,
        }
    }

    pub fn inclusive(min: f64, max: f64) -> Self {
        Self::new(min, max, true)
    }

    pub fn exclusive(min: f64, max: f64) -> Self {
        Self::new(min, max, false)
    }

    /// Smallest closed range containing every value of `values`.
    pub fn spanning(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut it = values.into_iter();
        let first = it.next()?;
        let (min, max) = it.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some(Self::inclusive(min, max))
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn is_inclusive(&self) -> bool {
        self.inclusive
    }

    pub fn length(&self) -> f64 {
        self.max - self.min
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Zero-width open range. It contains no point at all.
    pub fn is_empty(&self) -> bool {
        !self.inclusive && self.min >= self.max
    }

    pub fn contains(&self, value: f64) -> bool {
        if self.inclusive {
            self.min <= value && value <= self.max
        } else {
            self.min < value && value < self.max
        }
    }

    /// True iff both ranges share at least one point.
    ///
    /// Ranges that only touch at a bound overlap when both contain that bound, so `[0, 10]`
    /// and `[10, 20]` overlap while `[0, 10)` style open ranges do not.
    pub fn overlaps(&self, other: &Range) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let lo = self.min.max(other.min);
        let hi = self.max.min(other.max);
        if lo < hi {
            true
        } else if lo == hi {
            self.contains(lo) && other.contains(lo)
        } else {
            false
        }
    }

    pub fn offset(&self, amount: f64) -> Range {
        Range::new(self.min + amount, self.max + amount, self.inclusive)
    }

    /// Grows both bounds by `amount`. Negative amounts shrink, collapsing at the midpoint.
    pub fn expand(&self, amount: f64) -> Range {
        let min = self.min - amount;
        let max = self.max + amount;
        if min > max {
            let mid = self.midpoint();
            return Range::new(mid, mid, self.inclusive);
        }
        Range::new(min, max, self.inclusive)
    }

    /// Convex hull of both ranges, closed if either input is closed.
    pub fn expand_with(&self, other: &Range) -> Range {
        Range::new(
            self.min.min(other.min),
            self.max.max(other.max),
            self.inclusive || other.inclusive,
        )
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (open, close) = if self.inclusive { ('[', ']') } else { ('(', ')') };
        write!(f, "{open}{}, {}{close}", self.min, self.max)
    }
}

/// Sorted list of pairwise non-overlapping ranges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeSet {
    ranges: Vec<Range>,
}

impl RangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ranges(ranges: impl IntoIterator<Item = Range>) -> Self {
        let mut set = Self {
            ranges: ranges.into_iter().collect(),
        };
        set.condense();
        set
    }

    pub fn insert(&mut self, range: Range) {
        if range.is_empty() {
            return;
        }
        self.ranges.push(range);
        self.condense();
    }

    pub fn extend(&mut self, other: &RangeSet) {
        self.ranges.extend(other.ranges.iter().copied());
        self.condense();
    }

    /// Restores the invariant: sorted by `min`, no two members overlapping.
    pub fn condense(&mut self) {
        self.ranges.retain(|r| !r.is_empty());
        // Closed ranges first on equal `min` so a shared bound is seen before an open neighbour.
        self.ranges.sort_by(|a, b| {
            a.min
                .total_cmp(&b.min)
                .then_with(|| b.inclusive.cmp(&a.inclusive))
        });

        let mut merged: Vec<Range> = Vec::with_capacity(self.ranges.len());
        for range in self.ranges.drain(..) {
            match merged.last_mut() {
                Some(last) if last.overlaps(&range) => *last = last.expand_with(&range),
                _ => merged.push(range),
            }
            // A hull can close a previously open bound and reach back into its predecessor.
            while merged.len() >= 2 && merged[merged.len() - 2].overlaps(&merged[merged.len() - 1])
            {
                let Some(tail) = merged.pop() else { break };
                if let Some(last) = merged.last_mut() {
                    *last = last.expand_with(&tail);
                }
            }
        }
        self.ranges = merged;
    }

    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn contains(&self, value: f64) -> bool {
        self.ranges.iter().any(|r| r.contains(value))
    }

    pub fn overlaps(&self, range: &Range) -> bool {
        self.ranges.iter().any(|r| r.overlaps(range))
    }

    pub fn offset(&self, amount: f64) -> RangeSet {
        RangeSet::from_ranges(self.ranges.iter().map(|r| r.offset(amount)))
    }

    /// Hull of every member, `None` for an empty set.
    pub fn bounds(&self) -> Option<Range> {
        let first = *self.ranges.first()?;
        Some(
            self.ranges
                .iter()
                .skip(1)
                .fold(first, |acc, r| acc.expand_with(r)),
        )
    }
}

impl From<Range> for RangeSet {
    fn from(range: Range) -> Self {
        RangeSet::from_ranges([range])
    }
}

impl fmt::Display for RangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.ranges.iter().map(ToString::to_string).collect();
        write!(f, "{{{}}}", parts.join(" U "))
    }
}
