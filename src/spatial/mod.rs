//! Dynamic bounding-box index over arbitrary items.
//!
//! Each leaf holds one item with its exact bounds; subtrees hold up to
//! [`CHILDREN_PER_NODE`] children. Tree nodes live in an arena and refer to
//! each other by index, so there is no deletion and no reparenting.

mod split;

use smallvec::SmallVec;

use crate::constants::CHILDREN_PER_NODE;
use crate::geometry::Rect;

/// Child list of a subtree; the spare slot holds the overflow entry until the split
pub(crate) type Children = SmallVec<[usize; CHILDREN_PER_NODE + 1]>;

#[derive(Debug, Clone)]
enum TreeNode {
    Leaf { bounds: Rect, item: usize },
    Subtree { bounds: Rect, children: Children },
}

impl TreeNode {
    fn bounds(&self) -> Rect {
        match self {
            TreeNode::Leaf { bounds, .. } | TreeNode::Subtree { bounds, .. } => *bounds,
        }
    }
}

/// R-tree with an R*-style split (margin-driven axis, overlap-driven split point).
#[derive(Debug, Clone)]
pub struct RTree<T> {
    nodes: Vec<TreeNode>,
    items: Vec<T>,
    root: Option<usize>,
}

impl<T> Default for RTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RTree<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            items: Vec::new(),
            root: None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Bounds of everything in the tree
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.root.map(|root| self.nodes[root].bounds())
    }

    /// Number of levels from the root down to the leaves (0 for an empty tree)
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.root;
        while let Some(idx) = current {
            depth += 1;
            current = match &self.nodes[idx] {
                TreeNode::Leaf { .. } => None,
                TreeNode::Subtree { children, .. } => children.first().copied(),
            };
        }
        depth
    }

    /// Add an item under the given bounds
    pub fn insert(&mut self, bounds: Rect, item: T) {
        let item_idx = self.items.len();
        self.items.push(item);

        let Some(root) = self.root else {
            self.root = Some(self.push_node(TreeNode::Leaf { bounds, item: item_idx }));
            return;
        };

        if let Some(overflow) = self.insert_into(root, bounds, item_idx) {
            let children: Children = [overflow, root].into_iter().collect();
            let new_root = self.new_subtree(children);
            self.root = Some(new_root);
        }
    }

    /// All items whose bounds intersect `rect`
    #[must_use]
    pub fn query(&self, rect: &Rect) -> Vec<&T> {
        let mut found = Vec::new();
        if let Some(root) = self.root {
            self.collect_intersecting(root, rect, &mut found);
        }
        found
    }

    /// Iterate over all items in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    fn push_node(&mut self, node: TreeNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn new_subtree(&mut self, children: Children) -> usize {
        let bounds = self.union_of(&children);
        self.push_node(TreeNode::Subtree { bounds, children })
    }

    fn union_of(&self, children: &[usize]) -> Rect {
        let (first, rest) = children
            .split_first()
            .expect("subtrees always hold at least one child");
        rest.iter()
            .fold(self.nodes[*first].bounds(), |acc, &c| acc.union(&self.nodes[c].bounds()))
    }

    /// Insert below `node_idx`; returns a new sibling if `node_idx` had to split
    fn insert_into(&mut self, node_idx: usize, bounds: Rect, item: usize) -> Option<usize> {
        let children = match &self.nodes[node_idx] {
            TreeNode::Leaf { .. } => {
                // A leaf never takes a second item, it hands back a sibling leaf instead
                return Some(self.push_node(TreeNode::Leaf { bounds, item }));
            }
            TreeNode::Subtree { children, .. } => children.clone(),
        };

        let best_child = self.choose_child(&children, &bounds);
        let overflow = self.insert_into(best_child, bounds, item);

        let mut children = children;
        if let Some(sibling) = overflow {
            debug_assert!(children.len() <= CHILDREN_PER_NODE, "subtree exceeded its capacity");
            children.push(sibling);
        }

        if children.len() > CHILDREN_PER_NODE {
            let (keep, moved) = self.split_children(children);
            self.set_children(node_idx, keep);
            return Some(self.new_subtree(moved));
        }

        self.set_children(node_idx, children);
        None
    }

    fn set_children(&mut self, node_idx: usize, children: Children) {
        let bounds = self.union_of(&children);
        self.nodes[node_idx] = TreeNode::Subtree { bounds, children };
    }

    /// Child whose bounds grow least, relative to their size, when `bounds` is added
    fn choose_child(&self, children: &[usize], bounds: &Rect) -> usize {
        let mut best_child = children[0];
        let mut best_rating = f64::NEG_INFINITY;
        for &child in children {
            let child_bounds = self.nodes[child].bounds();
            let union_area = child_bounds.union(bounds).area();
            let rating = if union_area > 0.0 {
                child_bounds.area() / union_area
            } else {
                1.0
            };
            if rating > best_rating {
                best_child = child;
                best_rating = rating;
            }
        }
        best_child
    }

    fn collect_intersecting<'a>(&'a self, node_idx: usize, rect: &Rect, found: &mut Vec<&'a T>) {
        match &self.nodes[node_idx] {
            TreeNode::Leaf { bounds, item } => {
                if bounds.intersects(rect) {
                    found.push(&self.items[*item]);
                }
            }
            TreeNode::Subtree { bounds, children } => {
                if !bounds.intersects(rect) {
                    return;
                }
                for &child in children {
                    self.collect_intersecting(child, rect, found);
                }
            }
        }
    }

    #[cfg(test)]
    fn subtree_fills(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                TreeNode::Leaf { .. } => None,
                TreeNode::Subtree { children, .. } => Some(children.len()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_rect(rng: &mut StdRng, extent: f64, max_size: f64) -> Rect {
        let x = rng.gen_range(0.0..extent);
        let y = rng.gen_range(0.0..extent);
        let w = rng.gen_range(0.0..max_size);
        let h = rng.gen_range(0.0..max_size);
        Rect::spanning(Point::new(x, y), Point::new(x + w, y + h))
    }

    fn brute_force(boxes: &[Rect], query: &Rect) -> Vec<usize> {
        boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.intersects(query))
            .map(|(i, _)| i)
            .collect()
    }

    fn sorted_query(tree: &RTree<usize>, query: &Rect) -> Vec<usize> {
        let mut found: Vec<usize> = tree.query(query).into_iter().copied().collect();
        found.sort_unstable();
        found
    }

    #[test]
    fn test_empty_tree() {
        let tree: RTree<u32> = RTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 0);
        assert!(tree.bounds().is_none());
        assert!(tree.query(&Rect::around(Point::new(0.0, 0.0), 100.0)).is_empty());
    }

    #[test]
    fn test_single_leaf_root_is_filtered() {
        let mut tree = RTree::new();
        tree.insert(Rect::spanning(Point::new(0.0, 0.0), Point::new(1.0, 1.0)), "a");

        assert_eq!(tree.query(&Rect::around(Point::new(0.5, 0.5), 0.1)), vec![&"a"]);
        assert!(tree.query(&Rect::around(Point::new(5.0, 5.0), 1.0)).is_empty());
    }

    #[test]
    fn test_split_keeps_minimum_fill() {
        let mut tree = RTree::new();
        for i in 0..500 {
            let x = f64::from(i % 25) * 3.0;
            let y = f64::from(i / 25) * 3.0;
            tree.insert(Rect::spanning(Point::new(x, y), Point::new(x + 1.0, y + 1.0)), i);
        }

        assert_eq!(tree.len(), 500);
        assert!(tree.depth() >= 3);
        let fills = tree.subtree_fills();
        assert!(fills.iter().all(|&fill| fill <= CHILDREN_PER_NODE));
        // Only root growth creates subtrees with fewer than the split minimum
        assert!(fills.iter().all(|&fill| fill >= 2));
    }

    #[test]
    fn test_query_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(0x7261_696c);
        let boxes: Vec<Rect> = (0..1500).map(|_| random_rect(&mut rng, 1000.0, 30.0)).collect();

        let mut tree = RTree::new();
        for (i, b) in boxes.iter().enumerate() {
            tree.insert(*b, i);
        }

        for _ in 0..200 {
            let query = random_rect(&mut rng, 1000.0, 150.0);
            assert_eq!(sorted_query(&tree, &query), brute_force(&boxes, &query));
        }
    }

    #[test]
    fn test_query_independent_of_insertion_order() {
        let mut rng = StdRng::seed_from_u64(42);
        let boxes: Vec<Rect> = (0..400).map(|_| random_rect(&mut rng, 200.0, 10.0)).collect();

        let mut forward = RTree::new();
        for (i, b) in boxes.iter().enumerate() {
            forward.insert(*b, i);
        }
        let mut reverse = RTree::new();
        for (i, b) in boxes.iter().enumerate().rev() {
            reverse.insert(*b, i);
        }

        for _ in 0..50 {
            let query = random_rect(&mut rng, 200.0, 40.0);
            let expected = brute_force(&boxes, &query);
            assert_eq!(sorted_query(&forward, &query), expected);
            assert_eq!(sorted_query(&reverse, &query), expected);
        }
    }

    #[test]
    fn test_degenerate_boxes_are_found() {
        // Horizontal segments and points have zero area
        let mut tree = RTree::new();
        for i in 0..100 {
            let y = f64::from(i);
            tree.insert(Rect::spanning(Point::new(0.0, y), Point::new(50.0, y)), i);
        }
        tree.insert(Rect::spanning(Point::new(7.0, 7.5), Point::new(7.0, 7.5)), 1000);

        let query = Rect::new(6.0, 7.2, 8.0, 8.0).expect("valid rect");
        let mut found: Vec<i32> = tree.query(&query).into_iter().copied().collect();
        found.sort_unstable();
        assert_eq!(found, vec![8, 1000]);
    }
}
