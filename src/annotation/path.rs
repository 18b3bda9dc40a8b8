use crate::error::{AnnotationError, Result, TopologyError};
use crate::geometry::Segment;
use crate::topology::PathTopology;

use super::Satellite;

/// A piecewise path together with its ordered satellite annotations.
///
/// Satellites are anchored by segment index into the owned segment sequence;
/// insertion order of the annotation list is significant for the scan-based
/// queries. Every mutating operation renumbers affected anchors, recomputes
/// the topology index, and re-derives the `is_start` / `is_closing` flags, so
/// callers only ever observe a consistent triple.
///
/// The scan-based queries ([`Self::closing_satellites`],
/// [`Self::previous_satellites`]) walk the annotation list in insertion order
/// and trust its flags by contract; callers constructing a path from external
/// data are responsible for supplying a list ordered consistently with curve
/// traversal order.
#[derive(Debug, Clone)]
pub struct AnnotatedPath {
    segments: Vec<Segment>,
    satellites: Vec<(usize, Satellite)>,
    topology: PathTopology,
}

impl AnnotatedPath {
    /// Creates a path from a segment sequence and its annotation list.
    ///
    /// Flags on the supplied satellites are preserved as-is; they are only
    /// re-derived after a structural mutation.
    ///
    /// # Errors
    ///
    /// Returns an error if any satellite anchor does not fit the sequence.
    pub fn new(segments: Vec<Segment>, satellites: Vec<(usize, Satellite)>) -> Result<Self> {
        let count = segments.len();
        if let Some(&(index, _)) = satellites.iter().find(|(index, _)| *index >= count) {
            return Err(AnnotationError::AnchorOutOfRange { index, count }.into());
        }
        let topology = PathTopology::new(&segments);
        Ok(Self {
            segments,
            satellites,
            topology,
        })
    }

    /// Returns the owned segment sequence.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the annotation list in insertion order.
    #[must_use]
    pub fn satellites(&self) -> &[(usize, Satellite)] {
        &self.satellites
    }

    /// Returns the derived topology index.
    #[must_use]
    pub fn topology(&self) -> &PathTopology {
        &self.topology
    }

    /// Returns the segment immediately preceding the node that segment
    /// `outgoing` leaves from.
    ///
    /// At a sub-path's first segment this is the sub-path's last segment when
    /// closed, and `None` when open: a path endpoint has no incoming curve
    /// and corner rounding is not defined there.
    ///
    /// # Panics
    ///
    /// Panics (in debug builds) if `outgoing` is out of range.
    #[must_use]
    pub fn curve_in(&self, outgoing: usize) -> Option<&Segment> {
        debug_assert!(outgoing < self.segments.len(), "segment index out of range");
        if outgoing == self.topology.first_of(outgoing) {
            if self.topology.is_closed(outgoing) {
                return self.segments.get(self.topology.last_of(outgoing));
            }
            return None;
        }
        self.segments.get(outgoing - 1)
    }

    /// Returns the satellites anchored at `segment_index`, in list order,
    /// stopping once `limit` matches are collected (`None` is unbounded).
    #[must_use]
    pub fn satellites_at(&self, segment_index: usize, limit: Option<usize>) -> Vec<&Satellite> {
        let mut found = Vec::new();
        for (index, satellite) in &self.satellites {
            if *index == segment_index {
                found.push(satellite);
                if limit.is_some_and(|max| found.len() >= max) {
                    break;
                }
            }
        }
        found
    }

    /// Returns the satellites that close out the sub-path `segment_index`
    /// belongs to, found by scanning the annotation list.
    ///
    /// The scan starts just after the first entry anchored at
    /// `segment_index`, collects entries flagged closing, and stops at the
    /// next entry flagged as a sub-path start.
    #[must_use]
    pub fn closing_satellites(&self, segment_index: usize) -> Vec<&Satellite> {
        let Some(position) = self
            .satellites
            .iter()
            .position(|(index, _)| *index == segment_index)
        else {
            return Vec::new();
        };

        let mut found = Vec::new();
        for (_, satellite) in &self.satellites[position + 1..] {
            if satellite.is_start {
                break;
            }
            if satellite.is_closing {
                found.push(satellite);
            }
        }
        found
    }

    /// Returns the satellites preceding the one anchored at `segment_index`.
    ///
    /// For a satellite that does not start a sub-path's scan range, these are
    /// the satellites at the immediately preceding list entry's anchor. For a
    /// sub-path's starting satellite, the topological predecessors are the
    /// satellites closing that same sub-path.
    #[must_use]
    pub fn previous_satellites(
        &self,
        segment_index: usize,
        limit: Option<usize>,
    ) -> Vec<&Satellite> {
        let Some(position) = self
            .satellites
            .iter()
            .position(|(index, _)| *index == segment_index)
        else {
            return Vec::new();
        };

        if self.satellites[position].1.is_start {
            return self.closing_satellites(segment_index);
        }
        if position == 0 {
            return Vec::new();
        }
        self.satellites_at(self.satellites[position - 1].0, limit)
    }

    /// Replaces the segment sequence wholesale.
    ///
    /// Satellites whose anchors no longer fit the new sequence are dropped;
    /// the rest keep their indices.
    pub fn recalculate_for_new_path(&mut self, segments: Vec<Segment>) {
        let count = segments.len();
        self.segments = segments;
        self.satellites.retain(|(index, _)| *index < count);
        self.rebuild();
    }

    /// Appends extra segments and their satellites to the path.
    ///
    /// Anchors in `extra_satellites` are relative to `extra_segments` and are
    /// shifted past the existing sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if an extra anchor does not fit `extra_segments`.
    pub fn append(
        &mut self,
        extra_segments: Vec<Segment>,
        extra_satellites: Vec<(usize, Satellite)>,
    ) -> Result<()> {
        let extra_count = extra_segments.len();
        if let Some(&(index, _)) = extra_satellites
            .iter()
            .find(|(index, _)| *index >= extra_count)
        {
            return Err(AnnotationError::AnchorOutOfRange {
                index,
                count: extra_count,
            }
            .into());
        }

        let offset = self.segments.len();
        self.segments.extend(extra_segments);
        self.satellites.extend(
            extra_satellites
                .into_iter()
                .map(|(index, satellite)| (index + offset, satellite)),
        );
        self.rebuild();
        Ok(())
    }

    /// Removes `count` segments starting at `start`.
    ///
    /// Satellites anchored inside the removed range are dropped; later
    /// anchors shift down.
    ///
    /// # Errors
    ///
    /// Returns an error if the range does not fit the sequence.
    pub fn subtract(&mut self, start: usize, count: usize) -> Result<()> {
        let end = start.saturating_add(count);
        if end > self.segments.len() {
            return Err(TopologyError::InvalidRange {
                start,
                end,
                count: self.segments.len(),
            }
            .into());
        }

        self.segments.drain(start..end);
        self.satellites
            .retain(|(index, _)| *index < start || *index >= end);
        for (index, _) in &mut self.satellites {
            if *index >= end {
                *index -= count;
            }
        }
        self.rebuild();
        Ok(())
    }

    /// Reverses the segments in the inclusive range `[start, end]`, both in
    /// sequence order and in per-segment direction.
    ///
    /// A satellite anchored at index `i` inside the range moves to
    /// `start + end - i`, and the affected entries' relative list order flips
    /// to stay consistent with traversal order.
    ///
    /// # Errors
    ///
    /// Returns an error if the range does not fit the sequence.
    pub fn reverse_range(&mut self, start: usize, end: usize) -> Result<()> {
        if start > end || end >= self.segments.len() {
            return Err(TopologyError::InvalidRange {
                start,
                end,
                count: self.segments.len(),
            }
            .into());
        }

        self.segments[start..=end].reverse();
        for segment in &mut self.segments[start..=end] {
            *segment = segment.reversed();
        }

        for (index, _) in &mut self.satellites {
            if (start..=end).contains(index) {
                *index = start + end - *index;
            }
        }

        // Flip the relative list order of the affected entries.
        let positions: Vec<usize> = self
            .satellites
            .iter()
            .enumerate()
            .filter(|(_, (index, _))| (start..=end).contains(index))
            .map(|(position, _)| position)
            .collect();
        for pair in 0..positions.len() / 2 {
            let mirrored = positions.len() - 1 - pair;
            self.satellites.swap(positions[pair], positions[mirrored]);
        }

        self.rebuild();
        Ok(())
    }

    /// Relocates one sub-path's segments, and the satellites anchored on
    /// them, to the end of the sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if `subpath` is out of range.
    pub fn move_subpath_to_end(&mut self, subpath: usize) -> Result<()> {
        let subpath_count = self.topology.subpaths().len();
        if subpath >= subpath_count {
            return Err(TopologyError::SubpathNotFound {
                index: subpath,
                count: subpath_count,
            }
            .into());
        }

        let range = self.topology.range_of(subpath);
        let moved_count = range.len();
        let moved: Vec<Segment> = self.segments.drain(range.clone()).collect();
        self.segments.extend(moved);
        let new_start = self.segments.len() - moved_count;

        let mut kept = Vec::with_capacity(self.satellites.len());
        let mut relocated = Vec::new();
        for (index, satellite) in self.satellites.drain(..) {
            if range.contains(&index) {
                relocated.push((index - range.start + new_start, satellite));
            } else if index >= range.end {
                kept.push((index - moved_count, satellite));
            } else {
                kept.push((index, satellite));
            }
        }
        kept.extend(relocated);
        self.satellites = kept;

        self.rebuild();
        Ok(())
    }

    /// Drops every satellite anchored at `segment_index`.
    pub fn delete_satellites(&mut self, segment_index: usize) {
        self.satellites.retain(|(index, _)| *index != segment_index);
        self.resync_flags();
    }

    /// Re-derives the `is_start` / `is_closing` flags from the topology
    /// index: the first list entry anchored in each sub-path's range starts
    /// its scan range, and entries anchored on a closed sub-path's last
    /// segment close it.
    pub fn resync_flags(&mut self) {
        let topology = &self.topology;
        let mut seen = vec![false; topology.subpaths().len()];
        for (index, satellite) in &mut self.satellites {
            let subpath = topology.subpath_of(*index);
            satellite.is_start = !seen[subpath];
            seen[subpath] = true;
            satellite.is_closing =
                topology.is_closed(*index) && *index == topology.last_of(*index);
        }
    }

    /// Recomputes the topology index and re-derives structural flags.
    fn rebuild(&mut self) {
        self.topology = PathTopology::new(&self.segments);
        self.resync_flags();
    }
}
