use crate::geometry::Segment;
use crate::math::TOLERANCE;

/// One contiguous run of segments forming a connected path component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subpath {
    /// Index of the last segment belonging to this sub-path.
    pub last_segment: usize,
    /// Whether the sub-path forms a closed loop.
    pub closed: bool,
}

/// Maps a flat segment sequence to its sub-path structure.
///
/// Built in one pass over the ordered segment sequence: a sub-path continues
/// while each segment starts where the previous one ended (within tolerance),
/// and is closed when its last segment ends at its first segment's start.
/// An open sub-path that happens to end exactly at its start point is
/// indistinguishable from a closed one and is treated as closed.
///
/// When a closed sub-path's explicit closing segment is degenerate
/// (near-zero length), that segment is excluded from the indexed range but
/// the sub-path stays marked closed, so wraparound queries land on the last
/// real segment.
#[derive(Debug, Clone, Default)]
pub struct PathTopology {
    subpaths: Vec<Subpath>,
    firsts: Vec<usize>,
    segment_count: usize,
}

impl PathTopology {
    /// Builds the topology index for a segment sequence.
    #[must_use]
    pub fn new(segments: &[Segment]) -> Self {
        let mut subpaths = Vec::new();
        let mut firsts = Vec::new();
        let count = segments.len();

        let mut first = 0;
        for i in 0..count {
            let run_ends = i + 1 == count
                || (segments[i + 1].start() - segments[i].end()).norm() > TOLERANCE;
            if !run_ends {
                continue;
            }

            let closed = (segments[i].end() - segments[first].start()).norm() <= TOLERANCE;
            let mut last = i;
            if closed && i > first && segments[i].is_degenerate() {
                last = i - 1;
            }
            subpaths.push(Subpath {
                last_segment: last,
                closed,
            });
            firsts.push(first);
            first = i + 1;
        }

        Self {
            subpaths,
            firsts,
            segment_count: count,
        }
    }

    /// Returns the number of segments the index was built over.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    /// Returns the sub-path records, in segment order.
    #[must_use]
    pub fn subpaths(&self) -> &[Subpath] {
        &self.subpaths
    }

    /// Returns the sub-path containing segment `index`.
    ///
    /// # Panics
    ///
    /// Panics (in debug builds) if `index` is out of range.
    #[must_use]
    pub fn subpath_of(&self, index: usize) -> usize {
        debug_assert!(index < self.segment_count, "segment index out of range");
        let mut found = 0;
        for (k, &start) in self.firsts.iter().enumerate() {
            if start <= index {
                found = k;
            } else {
                break;
            }
        }
        found
    }

    /// Returns the first segment index of `index`'s sub-path.
    #[must_use]
    pub fn first_of(&self, index: usize) -> usize {
        self.firsts[self.subpath_of(index)]
    }

    /// Returns the last segment index of `index`'s sub-path.
    #[must_use]
    pub fn last_of(&self, index: usize) -> usize {
        self.subpaths[self.subpath_of(index)].last_segment
    }

    /// Returns whether `index`'s sub-path is closed.
    #[must_use]
    pub fn is_closed(&self, index: usize) -> bool {
        self.subpaths[self.subpath_of(index)].closed
    }

    /// Returns the segment index preceding `index` within its sub-path.
    ///
    /// At a sub-path's first segment this wraps to the sub-path's last
    /// segment when closed, and is `None` at an open boundary.
    #[must_use]
    pub fn previous_of(&self, index: usize) -> Option<usize> {
        let k = self.subpath_of(index);
        if index == self.firsts[k] {
            if self.subpaths[k].closed {
                Some(self.subpaths[k].last_segment)
            } else {
                None
            }
        } else {
            Some(index - 1)
        }
    }

    /// Returns the segment index following `index` within its sub-path.
    ///
    /// At a sub-path's last segment this wraps to the sub-path's first
    /// segment when closed, and is `None` at an open boundary.
    #[must_use]
    pub fn next_of(&self, index: usize) -> Option<usize> {
        let k = self.subpath_of(index);
        if index >= self.subpaths[k].last_segment {
            if self.subpaths[k].closed {
                Some(self.firsts[k])
            } else {
                None
            }
        } else {
            Some(index + 1)
        }
    }

    /// Returns the segment vector range occupied by sub-path `subpath`,
    /// including any excluded degenerate closing segment.
    ///
    /// # Panics
    ///
    /// Panics if `subpath` is out of range.
    #[must_use]
    pub fn range_of(&self, subpath: usize) -> std::ops::Range<usize> {
        let start = self.firsts[subpath];
        let end = self
            .firsts
            .get(subpath + 1)
            .copied()
            .unwrap_or(self.segment_count);
        start..end
    }
}
