//! State shared by every curve kind: control points, order, color and render handles.
//!
//! Nothing in here does math. Every mutation bumps the curve's generation and raises
//! the dirty flag so evaluators know their caches are stale.

use nalgebra::Vector2;

use crate::error::{CurveError, Result};
use crate::options::Color;
use crate::point::ControlPoint;

/// Opaque identifier of something the renderer drew for a curve.
///
/// The kernel only stores these so the GUI can find and free its segments again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentId(pub u32);

/// Rendering bookkeeping of a single curve
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderHandles {
    /// Polylines drawing the curve itself
    pub curve: Vec<SegmentId>,

    /// Segments of the control polygon
    pub polygon: Vec<SegmentId>,

    /// Markers of the control points, parallel to the control points
    pub points: Vec<SegmentId>,

    released: Vec<SegmentId>,
}

impl RenderHandles {
    /// Hands out the ids whose control points were removed, for the GUI to free.
    pub fn take_released(&mut self) -> Vec<SegmentId> {
        std::mem::take(&mut self.released)
    }

    /// Every id currently held, e.g. to free them all when the curve is discarded.
    pub fn all(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.curve
            .iter()
            .chain(self.polygon.iter())
            .chain(self.points.iter())
            .chain(self.released.iter())
            .copied()
    }

    fn release_point(&mut self, index: usize) {
        if index < self.points.len() {
            let id = self.points.remove(index);
            self.released.push(id);
        }
    }
}

/// Control points, order and bookkeeping common to Bézier curves and B-splines
#[derive(Clone, Debug, PartialEq)]
pub struct CurveBase {
    points: Vec<ControlPoint>,
    order: usize,
    color: Color,
    handles: RenderHandles,
    generation: u64,
    dirty: bool,
}

impl CurveBase {
    /// Creates the shared state; a new base is dirty so caches get built on first use.
    pub fn new(order: usize, points: Vec<ControlPoint>, color: Color) -> Self {
        CurveBase {
            points,
            order,
            color,
            handles: RenderHandles::default(),
            generation: 0,
            dirty: true,
        }
    }

    /// Control points in curve order
    pub fn control_points(&self) -> &[ControlPoint] {
        &self.points
    }

    /// Number of control points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the curve has no control points at all
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Order, i.e. degree + 1
    pub fn order(&self) -> usize {
        self.order
    }

    /// Degree, i.e. order - 1 (saturating)
    pub fn degree(&self) -> usize {
        self.order.saturating_sub(1)
    }

    pub(crate) fn set_order(&mut self, order: usize) {
        self.order = order;
        self.touch();
    }

    /// Display color
    pub fn color(&self) -> Color {
        self.color
    }

    /// Changes the display color, not a geometric change
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Render handles
    pub fn handles(&self) -> &RenderHandles {
        &self.handles
    }

    /// Render handles, for the GUI to record what it drew
    pub fn handles_mut(&mut self) -> &mut RenderHandles {
        &mut self.handles
    }

    /// Counter increased by every geometric change
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether caches derived from this state have to be rebuilt
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Called by evaluators after rebuilding their caches
    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Raises the dirty flag for changes that live outside the base, like knot edits.
    pub(crate) fn mark_dirty(&mut self) {
        self.touch();
    }

    fn touch(&mut self) {
        self.generation += 1;
        self.dirty = true;
    }

    /// Inserts `point` before `index`, `index == len` appends.
    pub fn add_control_point(&mut self, point: ControlPoint, index: usize) -> Result<()> {
        if index > self.points.len() {
            return Err(CurveError::IndexRange {
                index,
                len: self.points.len(),
            });
        }
        self.points.insert(index, point);
        self.touch();
        Ok(())
    }

    /// Removes and returns the control point at `index`.
    ///
    /// Its marker id (if any) is moved to the released list of [`RenderHandles`].
    pub fn remove_control_point(&mut self, index: usize) -> Result<ControlPoint> {
        self.check_index(index)?;
        let point = self.points.remove(index);
        self.handles.release_point(index);
        self.touch();
        Ok(point)
    }

    /// Moves the control point at `index` keeping its weight
    pub fn update_control_point(&mut self, index: usize, position: Vector2<f64>) -> Result<()> {
        self.check_index(index)?;
        self.points[index].position = position;
        self.touch();
        Ok(())
    }

    /// Changes the weight of the control point at `index`; zero is refused.
    pub fn update_weight(&mut self, index: usize, weight: f64) -> Result<()> {
        self.check_index(index)?;
        if weight == 0.0 {
            return Err(CurveError::DegenerateWeight { index });
        }
        self.points[index].weight = weight;
        self.touch();
        Ok(())
    }

    /// Replaces the control point at `index` entirely
    pub fn set_control_point(&mut self, index: usize, point: ControlPoint) -> Result<()> {
        self.check_index(index)?;
        self.points[index] = point;
        self.touch();
        Ok(())
    }

    /// Replaces every control point at once, used by knot insertion and removal.
    pub(crate) fn replace_control_points(&mut self, points: Vec<ControlPoint>) {
        self.points = points;
        self.touch();
    }

    /// Fails with [`CurveError::DegenerateWeight`] for the first zero weight.
    pub fn check_weights(&self) -> Result<()> {
        match self.points.iter().position(|p| p.weight == 0.0) {
            Some(index) => Err(CurveError::DegenerateWeight { index }),
            None => Ok(()),
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.points.len() {
            Err(CurveError::IndexRange {
                index,
                len: self.points.len(),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> CurveBase {
        CurveBase::new(
            3,
            vec![
                ControlPoint::unweighted(0.0, 0.0),
                ControlPoint::unweighted(1.0, 1.0),
                ControlPoint::unweighted(2.0, 0.0),
            ],
            Color::default(),
        )
    }

    #[test]
    fn add_checks_range() {
        let mut base = base();
        let point = ControlPoint::unweighted(5.0, 5.0);
        assert_eq!(
            base.add_control_point(point, 4),
            Err(CurveError::IndexRange { index: 4, len: 3 })
        );
        base.add_control_point(point, 3).unwrap();
        assert_eq!(base.control_points()[3], point);
        assert_eq!(base.len(), 4);
    }

    #[test]
    fn mutations_mark_dirty() {
        let mut base = base();
        base.mark_clean();
        let generation = base.generation();
        base.update_control_point(1, Vector2::new(3.0, 3.0)).unwrap();
        assert!(base.is_dirty());
        assert_eq!(base.generation(), generation + 1);
    }

    #[test]
    fn remove_releases_marker() {
        let mut base = base();
        base.handles_mut().points = vec![SegmentId(10), SegmentId(11), SegmentId(12)];
        let removed = base.remove_control_point(1).unwrap();
        assert_eq!(removed, ControlPoint::unweighted(1.0, 1.0));
        assert_eq!(base.handles().points, vec![SegmentId(10), SegmentId(12)]);
        assert_eq!(base.handles_mut().take_released(), vec![SegmentId(11)]);
        assert!(base.handles_mut().take_released().is_empty());
    }

    #[test]
    fn all_handles_include_released() {
        let mut base = base();
        let handles = base.handles_mut();
        handles.curve = vec![SegmentId(1)];
        handles.polygon = vec![SegmentId(2), SegmentId(3)];
        handles.points = vec![SegmentId(10), SegmentId(11), SegmentId(12)];
        base.remove_control_point(0).unwrap();

        let mut all: Vec<_> = base.handles().all().collect();
        all.sort();
        assert_eq!(
            all,
            vec![
                SegmentId(1),
                SegmentId(2),
                SegmentId(3),
                SegmentId(10),
                SegmentId(11),
                SegmentId(12)
            ]
        );
    }

    #[test]
    fn zero_weight_is_refused() {
        let mut base = base();
        assert_eq!(
            base.update_weight(2, 0.0),
            Err(CurveError::DegenerateWeight { index: 2 })
        );
        assert_eq!(base.control_points()[2].weight, 1.0);
        assert_eq!(
            base.remove_control_point(3),
            Err(CurveError::IndexRange { index: 3, len: 3 })
        );
    }
}
