//! Control points of the river curve, with click picking and drag editing

use river_core::{PickPolicy, Vec3};

/// Ordered control points: index 0 is the river's source, the last its mouth.
///
/// The count is fixed at construction. Points are moved, never added or removed.
#[derive(Debug, Clone)]
pub struct ControlPointStore {
    points: Box<[Vec3]>,
    selection: Option<usize>,
}

/// Evenly spread `count` points along the y axis across the view height.
pub fn default_layout(count: usize, view_height: f32) -> Vec<Vec3> {
    if count == 0 {
        return Vec::new();
    }
    let step = view_height / count as f32;
    (0..count)
        .map(|i| Vec3::new(0.0, -view_height * 0.5 + i as f32 * step + step * 0.5, 0.0))
        .collect()
}

impl ControlPointStore {
    pub fn new(count: usize, view_height: f32) -> Self {
        Self::from_points(default_layout(count, view_height))
    }

    pub fn from_points(points: Vec<Vec3>) -> Self {
        Self {
            points: points.into_boxed_slice(),
            selection: None,
        }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<Vec3> {
        self.points.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Find the control point under `world`.
    ///
    /// A point qualifies when its distance is strictly below `threshold`.
    pub fn pick(&self, world: Vec3, threshold: f32, policy: PickPolicy) -> Option<usize> {
        let candidates = self
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| (i, p.distance(&world)))
            .filter(|&(_, d)| d < threshold);

        match policy {
            PickPolicy::LastMatch => candidates.last().map(|(i, _)| i),
            PickPolicy::Nearest => candidates
                .fold(None, |best: Option<(usize, f32)>, (i, d)| match best {
                    Some((_, best_d)) if best_d <= d => best,
                    _ => Some((i, d)),
                })
                .map(|(i, _)| i),
        }
    }

    /// Select `index` for dragging. Out-of-range indices are ignored.
    pub fn begin_drag(&mut self, index: usize) {
        if index < self.points.len() {
            self.selection = Some(index);
        }
    }

    /// Move the selected point to `world`. Returns the moved index, if any.
    pub fn update_drag(&mut self, world: Vec3) -> Option<usize> {
        let index = self.selection()?;
        let point = self.points.get_mut(index)?;
        *point = world;
        Some(index)
    }

    pub fn end_drag(&mut self) {
        self.selection = None;
    }

    /// The selected index, if any
    pub fn selection(&self) -> Option<usize> {
        self.selection.filter(|&index| index < self.points.len())
    }

    pub fn is_dragging(&self) -> bool {
        self.selection().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_layout_is_centred_on_y_axis() {
        let store = ControlPointStore::new(4, 9.0);
        let ys: Vec<f32> = store.points().iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![-3.375, -1.125, 1.125, 3.375]);
        assert!(store.points().iter().all(|p| p.x == 0.0 && p.z == 0.0));
        assert!(ControlPointStore::new(0, 9.0).is_empty());
    }

    #[test]
    fn pick_is_strictly_inside_threshold() {
        let store = ControlPointStore::from_points(vec![Vec3::ZERO]);
        assert_eq!(store.pick(Vec3::new(0.1, 0.0, 0.0), 0.2, PickPolicy::LastMatch), Some(0));
        assert_eq!(store.pick(Vec3::new(0.2, 0.0, 0.0), 0.2, PickPolicy::LastMatch), None);
        assert_eq!(store.pick(Vec3::new(0.5, 0.0, 0.0), 0.2, PickPolicy::Nearest), None);
    }

    #[test]
    fn overlapping_points_resolve_by_policy() {
        let store = ControlPointStore::from_points(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.05, 0.0, 0.0),
            Vec3::new(0.15, 0.0, 0.0),
            Vec3::new(5.0, 0.0, 0.0),
        ]);
        let click = Vec3::new(0.04, 0.0, 0.0);
        assert_eq!(store.pick(click, 0.2, PickPolicy::LastMatch), Some(2));
        assert_eq!(store.pick(click, 0.2, PickPolicy::Nearest), Some(1));
    }

    #[test]
    fn nearest_ties_go_to_lower_index() {
        let store = ControlPointStore::from_points(vec![
            Vec3::new(-0.1, 0.0, 0.0),
            Vec3::new(0.1, 0.0, 0.0),
        ]);
        assert_eq!(store.pick(Vec3::ZERO, 0.2, PickPolicy::Nearest), Some(0));
        assert_eq!(store.pick(Vec3::ZERO, 0.2, PickPolicy::LastMatch), Some(1));
    }

    #[test]
    fn drag_overwrites_selected_point() {
        let mut store = ControlPointStore::new(4, 9.0);
        assert_eq!(store.update_drag(Vec3::new(1.0, 1.0, 0.0)), None);

        store.begin_drag(2);
        assert!(store.is_dragging());
        let target = Vec3::new(7.5, -2.0, 0.0);
        assert_eq!(store.update_drag(target), Some(2));
        assert_eq!(store.get(2), Some(target));

        store.end_drag();
        assert_eq!(store.selection(), None);
        store.update_drag(Vec3::ZERO);
        assert_eq!(store.get(2), Some(target));
    }

    #[test]
    fn begin_drag_out_of_range_is_ignored() {
        let mut store = ControlPointStore::new(4, 9.0);
        store.begin_drag(4);
        assert_eq!(store.selection(), None);
    }

    #[test]
    fn drag_never_changes_point_count() {
        let mut store = ControlPointStore::new(4, 9.0);
        store.begin_drag(3);
        for i in 0..10 {
            store.update_drag(Vec3::new(i as f32, 0.0, 0.0));
        }
        store.end_drag();
        assert_eq!(store.len(), 4);
        assert_eq!(store.get(3), Some(Vec3::new(9.0, 0.0, 0.0)));
        assert_eq!(store.get(4), None);
    }

    proptest! {
        #[test]
        fn clicking_a_point_picks_it(
            xs in proptest::collection::vec(-8.0f32..8.0, 1..8),
            which in any::<proptest::sample::Index>(),
        ) {
            let points: Vec<Vec3> = xs.iter().map(|&x| Vec3::new(x, x * 0.5, 0.0)).collect();
            let store = ControlPointStore::from_points(points.clone());
            let i = which.index(points.len());

            let picked = store.pick(points[i], 0.4, PickPolicy::Nearest);
            prop_assert!(picked.is_some());
            let p = points[picked.unwrap()];
            prop_assert_eq!(p.distance(&points[i]), 0.0);

            let last = store.pick(points[i], 0.4, PickPolicy::LastMatch).unwrap();
            prop_assert!(last >= i);

            let far = Vec3::new(100.0, 100.0, 0.0);
            prop_assert_eq!(store.pick(far, 0.4, PickPolicy::LastMatch), None);
        }
    }
}
