//! Two-phase subtree split: pick the sort axis with the smallest summed
//! margins, then the split point on that axis with the least overlap.

use std::cmp::Ordering;

use super::{Children, RTree};
use crate::constants::{CHILDREN_PER_NODE, SPLIT_BOUNDS};
use crate::geometry::Rect;

/// Sort keys evaluated as split axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    MinX,
    MaxX,
    MinY,
    MaxY,
}

impl Axis {
    const ALL: [Axis; 4] = [Axis::MinX, Axis::MaxX, Axis::MinY, Axis::MaxY];

    fn key(self, rect: &Rect) -> f64 {
        match self {
            Axis::MinX => rect.min_x(),
            Axis::MaxX => rect.max_x(),
            Axis::MinY => rect.min_y(),
            Axis::MaxY => rect.max_y(),
        }
    }
}

impl<T> RTree<T> {
    /// Split an overfull child list into the part that stays and the part for a new sibling
    pub(super) fn split_children(&self, mut children: Children) -> (Children, Children) {
        debug_assert_eq!(children.len(), CHILDREN_PER_NODE + 1, "split of a subtree that is not overfull");

        let mut best_axis = Axis::MinX;
        let mut best_margin = f64::INFINITY;
        for axis in Axis::ALL {
            self.sort_along(&mut children, axis);
            let margin = self.margin_sum(&children);
            if margin < best_margin {
                best_margin = margin;
                best_axis = axis;
            }
        }

        self.sort_along(&mut children, best_axis);
        let mut best_split = SPLIT_BOUNDS;
        let mut best_overlap = f64::INFINITY;
        for split in SPLIT_BOUNDS..children.len() - SPLIT_BOUNDS {
            let overlap = self.overlap_at(&children, split);
            if overlap < best_overlap {
                best_split = split;
                best_overlap = overlap;
            }
        }

        let moved: Children = children.drain(best_split..).collect();
        (children, moved)
    }

    fn sort_along(&self, children: &mut Children, axis: Axis) {
        children.sort_by(|&a, &b| {
            let ka = axis.key(&self.nodes[a].bounds());
            let kb = axis.key(&self.nodes[b].bounds());
            ka.partial_cmp(&kb).unwrap_or(Ordering::Equal)
        });
    }

    /// Sum over every valid split point of the margins of both groups
    fn margin_sum(&self, children: &[usize]) -> f64 {
        (SPLIT_BOUNDS..children.len() - SPLIT_BOUNDS)
            .map(|split| {
                let (low, high) = children.split_at(split);
                self.union_of(low).margin() + self.union_of(high).margin()
            })
            .sum()
    }

    fn overlap_at(&self, children: &[usize], split: usize) -> f64 {
        let (low, high) = children.split_at(split);
        self.union_of(low)
            .intersection(&self.union_of(high))
            .map_or(0.0, |cut| cut.area())
    }
}

#[cfg(test)]
mod tests {
    use crate::constants::{CHILDREN_PER_NODE, SPLIT_BOUNDS};
    use crate::geometry::{Point, Rect};
    use crate::spatial::RTree;

    #[test]
    fn test_first_split_respects_fill_bounds() {
        let mut tree = RTree::new();
        // Two clusters far apart along x, interleaved in insertion order
        for i in 0..=CHILDREN_PER_NODE {
            let base = if i % 2 == 0 { 0.0 } else { 1000.0 };
            let offset = f64::from(u32::try_from(i).expect("small index"));
            let p = Point::new(base + offset, offset);
            tree.insert(Rect::spanning(p, Point::new(p.x + 1.0, p.y + 1.0)), i);
        }

        assert_eq!(tree.depth(), 3);
        let fills = tree.subtree_fills();
        // root plus the two halves of the split
        assert_eq!(fills.len(), 3);
        assert!(fills.iter().filter(|&&f| f != 2).all(|&f| f >= SPLIT_BOUNDS));

        let left = tree.query(&Rect::new(-1.0, -1.0, 100.0, 100.0).expect("valid rect"));
        assert!(left.iter().all(|&&i| i % 2 == 0));
        assert_eq!(left.len(), CHILDREN_PER_NODE / 2 + 1);
    }
}
