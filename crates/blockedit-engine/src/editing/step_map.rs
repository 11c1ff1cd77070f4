use std::ops::Range;

use serde::{Deserialize, Serialize};

/// One changed span of position space: `old_size` units starting at
/// `old_start` became `new_size` units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapRange {
    pub old_start: usize,
    pub old_size: usize,
    pub new_size: usize,
}

impl MapRange {
    pub fn new(old_start: usize, old_size: usize, new_size: usize) -> Self {
        Self {
            old_start,
            old_size,
            new_size,
        }
    }
}

/// Which side of a replaced span a position inside it should land on after
/// mapping. A cursor glued to the text before an edit biases left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bias {
    #[default]
    Left,
    Right,
}

/// An immutable description of how position space changed across one step:
/// an ordered, non-overlapping list of [`MapRange`]s sorted ascending by
/// `old_start`.
///
/// Positions before a changed span are unaffected; positions after it shift
/// by the span's size delta; positions strictly inside a replaced span
/// collapse to the span's start or end according to [`Bias`]. A position
/// exactly at a pure insertion point lands after the inserted content. To
/// carry a position across a sequence of steps, apply each step's map in
/// application order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepMap {
    ranges: Vec<MapRange>,
}

impl StepMap {
    /// The identity map: no span changed, every position maps to itself.
    pub const EMPTY: StepMap = StepMap { ranges: Vec::new() };

    /// Single-range map: `old_size` units at `pos` became `new_size`.
    pub fn of(pos: usize, old_size: usize, new_size: usize) -> Self {
        Self {
            ranges: vec![MapRange::new(pos, old_size, new_size)],
        }
    }

    pub(crate) fn from_ranges(ranges: Vec<MapRange>) -> Self {
        debug_assert!(
            ranges
                .windows(2)
                .all(|w| w[0].old_start + w[0].old_size <= w[1].old_start),
            "map ranges must be ascending and non-overlapping"
        );
        Self { ranges }
    }

    pub fn ranges(&self) -> &[MapRange] {
        &self.ranges
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Net change in document size this map describes.
    #[must_use]
    pub fn size_delta(&self) -> isize {
        self.ranges
            .iter()
            .map(|r| r.new_size as isize - r.old_size as isize)
            .sum()
    }

    /// Map a position valid before the step to the corresponding position
    /// after it.
    #[must_use]
    pub fn map(&self, pos: usize, bias: Bias) -> usize {
        let mut delta: isize = 0;
        for range in &self.ranges {
            if pos < range.old_start {
                break;
            }
            if pos < range.old_start + range.old_size {
                // Inside content the step removed or replaced.
                let start = (range.old_start as isize + delta) as usize;
                return match bias {
                    Bias::Left => start,
                    Bias::Right => start + range.new_size,
                };
            }
            delta += range.new_size as isize - range.old_size as isize;
        }
        (pos as isize + delta) as usize
    }

    /// Map both ends of a range, e.g. a selection. The result is clamped so
    /// it never inverts.
    #[must_use]
    pub fn map_range(&self, range: Range<usize>, bias: Bias) -> Range<usize> {
        let start = self.map(range.start, bias);
        let end = self.map(range.end, bias).max(start);
        start..end
    }
}
