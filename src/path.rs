use crate::config::SamplingConfig;
use crate::error::PathError;
use crate::geometry_utilities::types::*;
use crate::geometry_utilities::{estimate_cubic_length, evaluate_cubic_bezier, normalize_safe};
use arrayvec::ArrayVec;

/// Upper bound on the line pieces a single segment is split into while resampling.
/// Beyond this the f32 curve parameter can no longer tell the steps apart.
pub const MAX_SEGMENT_DIVISIONS: usize = 1 << 24;

fn is_finite(p: &CanvasPoint) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum PointType {
    Anchor,
    Control,
}

/// A chain of cubic bezier segments sharing their end anchors.
#[derive(Clone, Debug)]
pub struct BezierPath {
    /// [anchor0, ctrl0_0, ctrl0_1, anchor1, ..., anchorN]
    /// A closed path has two more controls at the end which lead back into anchor0.
    points: Vec<CanvasPoint>,
    closed: bool,
    auto_set_control_points: bool,
    version: u32,
}

impl BezierPath {
    /// A single segment running from `centre - (1, 0)` to `centre + (1, 0)`.
    pub fn new(centre: CanvasPoint) -> BezierPath {
        BezierPath {
            points: vec![
                centre + CanvasVector::new(-1.0, 0.0),
                centre + CanvasVector::new(-0.5, 0.5),
                centre + CanvasVector::new(0.5, -0.5),
                centre + CanvasVector::new(1.0, 0.0),
            ],
            closed: false,
            auto_set_control_points: false,
            version: 0,
        }
    }

    /// Rebuilds a path from a point buffer previously obtained through [`BezierPath::points`].
    pub fn from_points(points: Vec<CanvasPoint>, closed: bool, auto_set: bool) -> Result<BezierPath, PathError> {
        let len = points.len();
        let valid_length = if closed {
            len % 3 == 0 && len >= 6
        } else {
            len % 3 == 1 && len >= 4
        };
        if !valid_length {
            return Err(PathError::InvalidArgument(
                "point count must be 3k+1 (open) or 3k+3 (closed) with at least one segment",
            ));
        }
        if !points.iter().all(is_finite) {
            return Err(PathError::InvalidArgument("points must be finite"));
        }

        let mut path = BezierPath {
            points,
            closed,
            auto_set_control_points: auto_set,
            version: 0,
        };
        if auto_set {
            path.auto_set_all_control_points();
        }
        Ok(path)
    }

    pub fn points(&self) -> &[CanvasPoint] {
        &self.points
    }

    pub fn point(&self, index: usize) -> Result<CanvasPoint, PathError> {
        self.points.get(index).copied().ok_or(PathError::InvalidIndex {
            index,
            len: self.points.len(),
        })
    }

    pub fn point_type(&self, index: usize) -> Result<PointType, PathError> {
        self.point(index)?;
        Ok(match index % 3 {
            0 => PointType::Anchor,
            _ => PointType::Control,
        })
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn num_segments(&self) -> usize {
        self.points.len() / 3
    }

    pub fn num_anchors(&self) -> usize {
        (self.points.len() + 2) / 3
    }

    pub fn anchor_indices(&self) -> impl Iterator<Item = usize> {
        (0..self.points.len()).step_by(3)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn auto_set_control_points(&self) -> bool {
        self.auto_set_control_points
    }

    /// Bumped by every mutation which changes the path.
    pub fn version(&self) -> u32 {
        self.version
    }

    fn dirty(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    pub fn set_closed(&mut self, closed: bool) {
        if self.closed == closed {
            return;
        }
        self.closed = closed;
        self.dirty();

        if closed {
            let n = self.points.len();
            let last = self.points[n - 1];
            let wrap_out = last + (last - self.points[n - 2]);
            let first = self.points[0];
            let wrap_in = first + (first - self.points[1]);
            self.points.push(wrap_out);
            self.points.push(wrap_in);
            log::trace!("closed path, {} segments", self.num_segments());

            if self.auto_set_control_points {
                self.auto_set_anchor_control_points(0);
                self.auto_set_anchor_control_points(self.points.len() - 3);
            }
            return;
        }

        self.points.truncate(self.points.len() - 2);
        log::trace!("opened path, {} segments", self.num_segments());
        if self.auto_set_control_points {
            self.auto_set_start_and_end_controls();
        }
    }

    /// Turning auto-set on recomputes every control point. Turning it off keeps the current positions.
    pub fn set_auto_set_control_points(&mut self, auto_set: bool) {
        let changed = self.auto_set_control_points != auto_set;
        self.auto_set_control_points = auto_set;
        let mut moved = false;
        if auto_set {
            let before = self.points.clone();
            self.auto_set_all_control_points();
            moved = before != self.points;
        }
        if changed || moved {
            self.dirty();
        }
    }

    /// Moves a point.
    ///
    /// Anchors drag their two controls along. A moved control mirrors the opposite control around
    /// their shared anchor, keeping that control's distance to the anchor.
    /// Moving a control while control points are auto-set does nothing.
    pub fn move_point(&mut self, index: usize, position: CanvasPoint) -> Result<(), PathError> {
        let point_type = self.point_type(index)?;
        if !is_finite(&position) {
            return Err(PathError::InvalidArgument("position must be finite"));
        }

        if point_type == PointType::Control && self.auto_set_control_points {
            log::debug!("ignoring move of control point {}, control points are auto-set", index);
            return Ok(());
        }

        let delta = position - self.points[index];
        self.points[index] = position;
        self.dirty();

        if self.auto_set_control_points {
            self.auto_set_all_affected_control_points(index);
            return Ok(());
        }

        let i = index as isize;
        if point_type == PointType::Anchor {
            if self.is_addressable(i + 1) {
                let after = self.loop_index(i + 1);
                self.points[after] += delta;
            }
            if self.is_addressable(i - 1) {
                let before = self.loop_index(i - 1);
                self.points[before] += delta;
            }
            return Ok(());
        }

        let next_is_anchor = (index + 1) % 3 == 0;
        let (paired, anchor) = if next_is_anchor { (i + 2, i + 1) } else { (i - 2, i - 1) };
        if self.is_addressable(paired) {
            let anchor_position = self.points[self.loop_index(anchor)];
            let paired = self.loop_index(paired);
            let distance = (anchor_position - self.points[paired]).length();
            let dir = normalize_safe(anchor_position - position);
            // A control dropped onto its anchor has no direction to mirror
            if dir != CanvasVector::zero() {
                self.points[paired] = anchor_position + dir * distance;
            }
        }
        Ok(())
    }

    /// Appends a segment ending at `anchor_position`.
    ///
    /// A closed path has no free end, so the anchor is inserted into the segment closing the loop instead.
    /// Non-finite positions are ignored.
    pub fn add_segment(&mut self, anchor_position: CanvasPoint) {
        if !is_finite(&anchor_position) {
            log::debug!("ignoring new segment ending at non-finite position {:?}", anchor_position);
            return;
        }
        if self.closed {
            let last = self.num_segments() - 1;
            self.insert_anchor(anchor_position, last);
            return;
        }

        let n = self.points.len();
        let last = self.points[n - 1];
        let continuation = last + (last - self.points[n - 2]);
        self.points.push(continuation);
        self.points.push(continuation.lerp(anchor_position, 0.5));
        self.points.push(anchor_position);
        self.dirty();

        if self.auto_set_control_points {
            self.auto_set_all_affected_control_points(self.points.len() - 1);
        }
    }

    /// Splits segment `segment_index` in two at a new anchor.
    pub fn split_segment(&mut self, anchor_position: CanvasPoint, segment_index: usize) -> Result<(), PathError> {
        let count = self.num_segments();
        if segment_index >= count {
            return Err(PathError::InvalidSegment {
                index: segment_index,
                count,
            });
        }
        if !is_finite(&anchor_position) {
            return Err(PathError::InvalidArgument("position must be finite"));
        }
        self.insert_anchor(anchor_position, segment_index);
        Ok(())
    }

    fn insert_anchor(&mut self, anchor_position: CanvasPoint, segment_index: usize) {
        let insert_at = segment_index * 3 + 2;
        self.points
            .splice(insert_at..insert_at, std::iter::repeat(anchor_position).take(3));
        self.dirty();

        let anchor_index = segment_index * 3 + 3;
        if self.auto_set_control_points {
            self.auto_set_all_affected_control_points(anchor_index);
        } else {
            self.auto_set_anchor_control_points(anchor_index);
        }
    }

    /// Removes an anchor together with two of its controls.
    ///
    /// Does nothing while the path only has two anchors left.
    pub fn delete_segment(&mut self, anchor_index: usize) -> Result<(), PathError> {
        if self.point_type(anchor_index)? != PointType::Anchor {
            return Err(PathError::NotAnAnchor { index: anchor_index });
        }
        if self.num_anchors() <= 2 {
            log::debug!(
                "refusing to delete anchor {}, the path must keep at least one segment",
                anchor_index
            );
            return Ok(());
        }

        let n = self.points.len();
        let neighbour = if anchor_index == 0 {
            if self.closed {
                self.points[n - 1] = self.points[2];
            }
            self.points.drain(0..3);
            0
        } else if !self.closed && anchor_index == n - 1 {
            self.points.drain(anchor_index - 2..=anchor_index);
            anchor_index - 3
        } else {
            self.points.drain(anchor_index - 1..anchor_index + 2);
            anchor_index
        };
        self.dirty();

        if self.auto_set_control_points {
            let neighbour = self.loop_index(neighbour as isize);
            self.auto_set_all_affected_control_points(neighbour);
        }
        Ok(())
    }

    /// The four points `[anchor, control, control, anchor]` of segment `index`.
    pub fn points_in_segment(&self, index: usize) -> Result<[CanvasPoint; 4], PathError> {
        let count = self.num_segments();
        if index >= count {
            return Err(PathError::InvalidSegment { index, count });
        }
        Ok(self.segment_points(index))
    }

    pub(crate) fn segment_points(&self, index: usize) -> [CanvasPoint; 4] {
        let start = index * 3;
        [
            self.points[start],
            self.points[start + 1],
            self.points[start + 2],
            self.points[self.loop_index(start as isize + 3)],
        ]
    }

    /// Position on segment `index` at parameter `t`, clamped to `[0, 1]`.
    pub fn position_on_segment(&self, index: usize, t: f32) -> Result<CanvasPoint, PathError> {
        if !t.is_finite() {
            return Err(PathError::InvalidArgument("curve parameter must be finite"));
        }
        let pts = self.points_in_segment(index)?;
        Ok(evaluate_cubic_bezier(pts[0], pts[1], pts[2], pts[3], t.max(0.0).min(1.0)))
    }

    pub fn estimated_length(&self) -> f32 {
        (0..self.num_segments())
            .map(|segment| estimate_cubic_length(&self.segment_points(segment)))
            .sum()
    }

    /// Bounds of every anchor and control. The curve itself always lies inside.
    pub fn control_bounds(&self) -> CanvasRect {
        CanvasRect::from_points(self.points.iter())
    }

    pub fn evenly_spaced_points_with(&self, config: &SamplingConfig) -> Result<Vec<CanvasPoint>, PathError> {
        self.evenly_spaced_points(config.spacing, config.resolution)
    }

    /// Points along the path which are `spacing` apart, measured along the curve.
    ///
    /// Every segment is approximated by `ceil(estimated_length * resolution * 10)` line pieces.
    /// The first point is the first anchor. The path end is only included if it happens to fall on the spacing.
    pub fn evenly_spaced_points(&self, spacing: f32, resolution: f32) -> Result<Vec<CanvasPoint>, PathError> {
        SamplingConfig::new(spacing, resolution).validate()?;
        profiling::scope!("BezierPath::evenly_spaced_points");

        let mut evenly_spaced = vec![self.points[0]];
        let mut previous = self.points[0];
        let mut distance_since_last = 0.0f32;

        for segment in 0..self.num_segments() {
            let pts = self.segment_points(segment);
            let estimated_length = estimate_cubic_length(&pts);
            let divisions = (estimated_length * resolution * 10.0).ceil();
            if divisions > MAX_SEGMENT_DIVISIONS as f32 {
                return Err(PathError::InvalidArgument(
                    "resolution too fine for the path length, a segment would need more than 2^24 steps",
                ));
            }
            let divisions = (divisions as usize).max(1);

            for step in 1..=divisions {
                let t = step as f32 / divisions as f32;
                let on_curve = evaluate_cubic_bezier(pts[0], pts[1], pts[2], pts[3], t);
                distance_since_last += (previous - on_curve).length();

                while distance_since_last >= spacing {
                    let overshoot = distance_since_last - spacing;
                    let evenly_spaced_point = on_curve + normalize_safe(previous - on_curve) * overshoot;
                    evenly_spaced.push(evenly_spaced_point);
                    distance_since_last = overshoot;
                    previous = evenly_spaced_point;
                }

                previous = on_curve;
            }
        }

        log::trace!("resampled {} segments into {} points", self.num_segments(), evenly_spaced.len());
        Ok(evenly_spaced)
    }

    fn auto_set_all_affected_control_points(&mut self, updated_anchor_index: usize) {
        let anchor = updated_anchor_index as isize;
        let affected: ArrayVec<usize, 3> = [anchor - 3, anchor, anchor + 3]
            .iter()
            .filter(|&&i| self.is_addressable(i))
            .map(|&i| self.loop_index(i))
            .collect();

        for anchor_index in affected {
            self.auto_set_anchor_control_points(anchor_index);
        }
        self.auto_set_start_and_end_controls();
    }

    fn auto_set_all_control_points(&mut self) {
        for anchor_index in (0..self.points.len()).step_by(3) {
            self.auto_set_anchor_control_points(anchor_index);
        }
        self.auto_set_start_and_end_controls();
    }

    /// Places both controls of an anchor along the difference of the unit vectors towards its two neighbours.
    /// Each control sits at half the distance to the neighbour on its side.
    fn auto_set_anchor_control_points(&mut self, anchor_index: usize) {
        let a = anchor_index as isize;
        let anchor_position = self.points[anchor_index];
        let mut dir = CanvasVector::zero();
        let mut neighbour_distances = [0.0f32; 2];

        if self.is_addressable(a - 3) {
            let offset = self.points[self.loop_index(a - 3)] - anchor_position;
            dir += normalize_safe(offset);
            neighbour_distances[0] = offset.length();
        }
        if self.is_addressable(a + 3) {
            let offset = self.points[self.loop_index(a + 3)] - anchor_position;
            dir -= normalize_safe(offset);
            neighbour_distances[1] = -offset.length();
        }

        let dir = normalize_safe(dir);

        for (i, distance) in neighbour_distances.iter().enumerate() {
            let control = a + i as isize * 2 - 1;
            if self.is_addressable(control) {
                let control = self.loop_index(control);
                self.points[control] = anchor_position + dir * (*distance * 0.5);
            }
        }
    }

    /// The end controls of an open path point halfway towards the neighbouring anchor.
    fn auto_set_start_and_end_controls(&mut self) {
        if self.closed {
            return;
        }

        let n = self.points.len();
        self.points[1] = self.points[0].lerp(self.points[3], 0.5);
        self.points[n - 2] = self.points[n - 1].lerp(self.points[n - 4], 0.5);
    }

    /// Whether `index` refers to a point, either directly or by wrapping around a closed path.
    fn is_addressable(&self, index: isize) -> bool {
        (index >= 0 && (index as usize) < self.points.len()) || self.closed
    }

    fn loop_index(&self, index: isize) -> usize {
        index.rem_euclid(self.points.len() as isize) as usize
    }
}

impl std::ops::Index<usize> for BezierPath {
    type Output = CanvasPoint;

    fn index(&self, index: usize) -> &CanvasPoint {
        &self.points[index]
    }
}
