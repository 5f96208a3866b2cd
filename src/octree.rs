//! 8D SP-GiST-style octree indexing `BBox4D`s as points in "doubled" space
//! (`spec.md` §4.J).
//!
//! The standard SP-GiST trick for indexing boxes with a point-partitioning
//! tree: a box `(xmin..xmax, ymin..ymax, zmin..zmax, tmin..tmax)` becomes a
//! single point `(xmin, xmax, ymin, ymax, zmin, zmax, tmin, tmax)` in an
//! 8-dimensional space. Recursive octant splitting (config/choose/
//! picksplit/consistent, in SP-GiST's own vocabulary) then operates on
//! ordinary 8D points. This only ever indexes spatiotemporal bboxes
//! (`has_x && has_t`); a box with no Z collapses that axis pair to `0.0`,
//! the usual 2.5D convention.
//!
//! `BBoxPoint8` implements `rstar::Point` so it can be reused with
//! `rstar`'s KNN machinery if a caller wants nearest-neighbor search
//! instead of range search; the tree itself is hand-rolled rather than an
//! `rstar::RTree`, because R-tree MBR splitting groups by bounding-volume
//! overlap while SP-GiST splits by a fixed centroid per node — a
//! different algorithm, not just a different API (see `DESIGN.md`).
//! Grounded on the teacher's `IndexedPoint3D`/`SpatialIndexManager`
//! (`src/spatial_index.rs`), generalized from 3 dimensions to 8 and from
//! an `rstar::RTree` backing store to a hand-rolled trie.

use crate::bbox::BBox4D;
use rstar::Point as RstarPoint;
use rustc_hash::FxHashMap;

pub const DIMENSIONS: usize = 8;

const X_MIN: usize = 0;
const X_MAX: usize = 1;
const Y_MIN: usize = 2;
const Y_MAX: usize = 3;
const Z_MIN: usize = 4;
const Z_MAX: usize = 5;
const T_MIN: usize = 6;
const T_MAX: usize = 7;

/// A leaf holds at most this many points before it's split into octants.
const MAX_LEAF_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBoxPoint8 {
    coords: [f64; DIMENSIONS],
}

impl BBoxPoint8 {
    pub fn from_bbox(b: &BBox4D) -> Self {
        assert!(
            b.has_x && b.has_t,
            "the octree only indexes bboxes with both a spatial and a temporal extent"
        );
        let (zmin, zmax) = if b.has_z { (b.zmin, b.zmax) } else { (0.0, 0.0) };
        Self {
            coords: [
                b.xmin,
                b.xmax,
                b.ymin,
                b.ymax,
                zmin,
                zmax,
                b.tmin as f64,
                b.tmax as f64,
            ],
        }
    }

    pub fn coords(&self) -> &[f64; DIMENSIONS] {
        &self.coords
    }
}

impl RstarPoint for BBoxPoint8 {
    type Scalar = f64;
    const DIMENSIONS: usize = DIMENSIONS;

    fn generate(generator: impl FnMut(usize) -> Self::Scalar) -> Self {
        Self {
            coords: std::array::from_fn(generator),
        }
    }

    fn nth(&self, index: usize) -> Self::Scalar {
        self.coords[index]
    }

    fn nth_mut(&mut self, index: usize) -> &mut Self::Scalar {
        &mut self.coords[index]
    }
}

#[derive(Debug, Clone)]
enum Node<T> {
    Leaf(Vec<(BBoxPoint8, T)>),
    Inner {
        centroid: BBoxPoint8,
        children: FxHashMap<u8, Node<T>>,
    },
}

/// Octant code: bit `i` is `1` when the point's `i`th coordinate is on the
/// "high" side of the node's centroid (`>=`), `0` on the "low" side (`<`).
fn octant_code(point: &BBoxPoint8, centroid: &BBoxPoint8) -> u8 {
    let mut code = 0u8;
    for i in 0..DIMENSIONS {
        if point.coords[i] >= centroid.coords[i] {
            code |= 1 << i;
        }
    }
    code
}

fn centroid_of<T>(items: &[(BBoxPoint8, T)]) -> BBoxPoint8 {
    let n = items.len() as f64;
    let mut sums = [0.0f64; DIMENSIONS];
    for (p, _) in items {
        for i in 0..DIMENSIONS {
            sums[i] += p.coords[i];
        }
    }
    for s in &mut sums {
        *s /= n;
    }
    BBoxPoint8 { coords: sums }
}

/// A 256-ary point-partitioning tree over `BBoxPoint8`s.
pub struct Octree<T> {
    root: Option<Node<T>>,
    len: usize,
}

impl<T> Default for Octree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Octree<T> {
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, bbox: &BBox4D, value: T) {
        let point = BBoxPoint8::from_bbox(bbox);
        let root = self.root.take();
        self.root = Some(insert_node(root, point, value));
        self.len += 1;
    }

    /// All values whose indexed bbox overlaps `query` (the leaf-consistent
    /// predicate); inner nodes are pruned using the octant-consistent
    /// predicate below without ever materializing a candidate leaf.
    pub fn range_query(&self, query: &BBox4D) -> Vec<&T> {
        self.range_query_op(query, ScanOp::Overlaps)
    }

    /// The full scan-key operator family (`spec.md` §4.J): containment,
    /// overlap, exact match, and the eight directional predicates with
    /// their `over*` inclusive variants. Each has its own leaf-consistent
    /// test and inner-consistent pruning rule, so a `before`/`left`/...
    /// query prunes whole octants the same way `overlaps` does rather
    /// than falling back to a full scan.
    pub fn range_query_op(&self, query: &BBox4D, op: ScanOp) -> Vec<&T> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            collect(root, query, op, &mut out);
        }
        out
    }
}

/// The scan-key operator family a range query can be run with
/// (`spec.md` §4.J). Directional operators ignore a query dimension the
/// query bbox carries as `±∞` or doesn't carry at all, matching
/// [`crate::bbox::BBox4D`]'s own predicates of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOp {
    Contains,
    Contained,
    Overlaps,
    Same,
    Before,
    After,
    OverBefore,
    OverAfter,
    Left,
    Right,
    OverLeft,
    OverRight,
    Below,
    Above,
    OverBelow,
    OverAbove,
    Front,
    Back,
    OverFront,
    OverBack,
}

fn insert_node<T>(node: Option<Node<T>>, point: BBoxPoint8, value: T) -> Node<T> {
    match node {
        None => Node::Leaf(vec![(point, value)]),
        Some(Node::Leaf(mut items)) => {
            items.push((point, value));
            if items.len() > MAX_LEAF_CAPACITY {
                split_leaf(items)
            } else {
                Node::Leaf(items)
            }
        }
        Some(Node::Inner { centroid, mut children }) => {
            let code = octant_code(&point, &centroid);
            let child = children.remove(&code);
            children.insert(code, insert_node(child, point, value));
            Node::Inner { centroid, children }
        }
    }
}

/// Picksplit: partitions an overfull leaf by its own centroid. If every
/// point lands in the same octant (e.g. exact duplicates), splitting
/// cannot make progress, so the leaf is kept as-is rather than recursing
/// forever.
fn split_leaf<T>(items: Vec<(BBoxPoint8, T)>) -> Node<T> {
    let centroid = centroid_of(&items);
    let mut children: FxHashMap<u8, Vec<(BBoxPoint8, T)>> = FxHashMap::default();
    for (p, v) in items {
        let code = octant_code(&p, &centroid);
        children.entry(code).or_default().push((p, v));
    }
    if children.len() <= 1 {
        let items = children.into_values().next().unwrap_or_default();
        return Node::Leaf(items);
    }
    let children = children.into_iter().map(|(c, v)| (c, Node::Leaf(v))).collect();
    Node::Inner { centroid, children }
}

fn collect<'a, T>(node: &'a Node<T>, query: &BBox4D, op: ScanOp, out: &mut Vec<&'a T>) {
    match node {
        Node::Leaf(items) => {
            for (p, v) in items {
                if leaf_consistent(p, query, op) {
                    out.push(v);
                }
            }
        }
        Node::Inner { centroid, children } => {
            for (&code, child) in children {
                if octant_could_satisfy(code, centroid, query, op) {
                    collect(child, query, op, out);
                }
            }
        }
    }
}

fn point_overlaps_query(p: &BBoxPoint8, query: &BBox4D) -> bool {
    let x_ok = axis_overlap(p.coords[X_MIN], p.coords[X_MAX], query.xmin, query.xmax);
    let y_ok = axis_overlap(p.coords[Y_MIN], p.coords[Y_MAX], query.ymin, query.ymax);
    let z_ok = !query.has_z
        || axis_overlap(p.coords[Z_MIN], p.coords[Z_MAX], query.zmin, query.zmax);
    let t_ok = axis_overlap(
        p.coords[T_MIN],
        p.coords[T_MAX],
        query.tmin as f64,
        query.tmax as f64,
    );
    x_ok && y_ok && z_ok && t_ok
}

fn axis_overlap(pmin: f64, pmax: f64, qmin: f64, qmax: f64) -> bool {
    pmin <= qmax && pmax >= qmin
}

/// Octant-consistent predicate: can any point stored under `code` possibly
/// overlap `query`? Each axis pair `(lo, hi)` is checked independently —
/// a "high" branch on the min-coordinate can be pruned once the centroid
/// already exceeds the query's max, and symmetrically for the max-coordinate
/// "low" branch against the query's min.
fn octant_could_overlap(code: u8, centroid: &BBoxPoint8, query: &BBox4D) -> bool {
    !axis_pair_prunes(code, X_MIN, X_MAX, centroid, query.xmin, query.xmax)
        && !axis_pair_prunes(code, Y_MIN, Y_MAX, centroid, query.ymin, query.ymax)
        && (!query.has_z || !axis_pair_prunes(code, Z_MIN, Z_MAX, centroid, query.zmin, query.zmax))
        && !axis_pair_prunes(
            code,
            T_MIN,
            T_MAX,
            centroid,
            query.tmin as f64,
            query.tmax as f64,
        )
}

fn axis_pair_prunes(
    code: u8,
    lo_idx: usize,
    hi_idx: usize,
    centroid: &BBoxPoint8,
    q_lo: f64,
    q_hi: f64,
) -> bool {
    let lo_bit = (code >> lo_idx) & 1;
    let hi_bit = (code >> hi_idx) & 1;
    if lo_bit == 1 && centroid.coords[lo_idx] > q_hi {
        return true;
    }
    if hi_bit == 0 && centroid.coords[hi_idx] <= q_lo {
        return true;
    }
    false
}

fn axis_contains(amin: f64, amax: f64, bmin: f64, bmax: f64) -> bool {
    amin <= bmin && bmax <= amax
}

fn axis_before(amax: f64, bmin: f64) -> bool {
    amax < bmin
}

fn axis_after(amin: f64, bmax: f64) -> bool {
    amin > bmax
}

fn axis_overbefore(amax: f64, bmax: f64) -> bool {
    amax <= bmax
}

fn axis_overafter(amin: f64, bmin: f64) -> bool {
    amin >= bmin
}

/// Leaf-consistent test for every [`ScanOp`] other than `Overlaps` (which
/// reuses [`point_overlaps_query`] directly). `p`'s axes are the indexed
/// bbox, `query`'s are the scan key; directional operators skip a query
/// dimension it doesn't carry the same way [`crate::bbox::BBox4D`]'s own
/// `before`/`left`/... methods do.
fn leaf_consistent(p: &BBoxPoint8, query: &BBox4D, op: ScanOp) -> bool {
    if op == ScanOp::Overlaps {
        return point_overlaps_query(p, query);
    }

    let px = (p.coords[X_MIN], p.coords[X_MAX]);
    let py = (p.coords[Y_MIN], p.coords[Y_MAX]);
    let pz = (p.coords[Z_MIN], p.coords[Z_MAX]);
    let pt = (p.coords[T_MIN], p.coords[T_MAX]);
    let qt = (query.tmin as f64, query.tmax as f64);

    match op {
        ScanOp::Overlaps => unreachable!("handled above"),
        ScanOp::Contains => {
            axis_contains(px.0, px.1, query.xmin, query.xmax)
                && axis_contains(py.0, py.1, query.ymin, query.ymax)
                && (!query.has_z || axis_contains(pz.0, pz.1, query.zmin, query.zmax))
                && axis_contains(pt.0, pt.1, qt.0, qt.1)
        }
        ScanOp::Contained => {
            axis_contains(query.xmin, query.xmax, px.0, px.1)
                && axis_contains(query.ymin, query.ymax, py.0, py.1)
                && (!query.has_z || axis_contains(query.zmin, query.zmax, pz.0, pz.1))
                && axis_contains(qt.0, qt.1, pt.0, pt.1)
        }
        ScanOp::Same => {
            px.0 == query.xmin
                && px.1 == query.xmax
                && py.0 == query.ymin
                && py.1 == query.ymax
                && (!query.has_z || (pz.0 == query.zmin && pz.1 == query.zmax))
                && pt.0 == qt.0
                && pt.1 == qt.1
        }
        ScanOp::Before => !query.has_t || axis_before(pt.1, qt.0),
        ScanOp::After => !query.has_t || axis_after(pt.0, qt.1),
        ScanOp::OverBefore => !query.has_t || axis_overbefore(pt.1, qt.1),
        ScanOp::OverAfter => !query.has_t || axis_overafter(pt.0, qt.0),
        ScanOp::Left => !query.has_x || axis_before(px.1, query.xmin),
        ScanOp::Right => !query.has_x || axis_after(px.0, query.xmax),
        ScanOp::OverLeft => !query.has_x || axis_overbefore(px.1, query.xmax),
        ScanOp::OverRight => !query.has_x || axis_overafter(px.0, query.xmin),
        ScanOp::Below => !query.has_x || axis_before(py.1, query.ymin),
        ScanOp::Above => !query.has_x || axis_after(py.0, query.ymax),
        ScanOp::OverBelow => !query.has_x || axis_overbefore(py.1, query.ymax),
        ScanOp::OverAbove => !query.has_x || axis_overafter(py.0, query.ymin),
        ScanOp::Front => !query.has_z || axis_before(pz.1, query.zmin),
        ScanOp::Back => !query.has_z || axis_after(pz.0, query.zmax),
        ScanOp::OverFront => !query.has_z || axis_overbefore(pz.1, query.zmax),
        ScanOp::OverBack => !query.has_z || axis_overafter(pz.0, query.zmin),
    }
}

/// One necessary inequality a subtree's indexed points must satisfy for a
/// [`ScanOp`] to hold, expressed against a single coordinate so the
/// octant-consistent check below can refute it from a single known bound.
#[derive(Clone, Copy)]
enum Req {
    Le(f64),
    Ge(f64),
    Lt(f64),
    Gt(f64),
}

/// Does the bound the `lo_bit`/`hi_bit` branch guarantees (`>=` centroid on
/// the `1` branch, `<` centroid on the `0` branch) already contradict
/// `req`? Used to prune a whole octant without visiting its points.
fn bound_prunes(bit: u8, centroid_val: f64, req: Req) -> bool {
    match (bit, req) {
        (1, Req::Le(t)) => centroid_val > t,
        (1, Req::Lt(t)) => centroid_val >= t,
        (0, Req::Ge(t)) => centroid_val <= t,
        (0, Req::Gt(t)) => centroid_val <= t,
        _ => false,
    }
}

fn axis_pair_could_satisfy(
    code: u8,
    lo_idx: usize,
    hi_idx: usize,
    centroid: &BBoxPoint8,
    lo_reqs: &[Req],
    hi_reqs: &[Req],
) -> bool {
    let lo_bit = (code >> lo_idx) & 1;
    let hi_bit = (code >> hi_idx) & 1;
    lo_reqs.iter().all(|&r| !bound_prunes(lo_bit, centroid.coords[lo_idx], r))
        && hi_reqs.iter().all(|&r| !bound_prunes(hi_bit, centroid.coords[hi_idx], r))
}

/// Octant-consistent predicate for every [`ScanOp`] other than `Overlaps`
/// (which keeps using [`octant_could_overlap`] directly, unchanged from
/// before this operator family existed).
fn octant_could_satisfy(code: u8, centroid: &BBoxPoint8, query: &BBox4D, op: ScanOp) -> bool {
    let qt = (query.tmin as f64, query.tmax as f64);
    match op {
        ScanOp::Overlaps => octant_could_overlap(code, centroid, query),
        ScanOp::Contains => {
            axis_pair_could_satisfy(code, X_MIN, X_MAX, centroid, &[Req::Le(query.xmin)], &[Req::Ge(query.xmax)])
                && axis_pair_could_satisfy(code, Y_MIN, Y_MAX, centroid, &[Req::Le(query.ymin)], &[Req::Ge(query.ymax)])
                && (!query.has_z
                    || axis_pair_could_satisfy(code, Z_MIN, Z_MAX, centroid, &[Req::Le(query.zmin)], &[Req::Ge(query.zmax)]))
                && axis_pair_could_satisfy(code, T_MIN, T_MAX, centroid, &[Req::Le(qt.0)], &[Req::Ge(qt.1)])
        }
        ScanOp::Contained => {
            axis_pair_could_satisfy(code, X_MIN, X_MAX, centroid, &[Req::Ge(query.xmin)], &[Req::Le(query.xmax)])
                && axis_pair_could_satisfy(code, Y_MIN, Y_MAX, centroid, &[Req::Ge(query.ymin)], &[Req::Le(query.ymax)])
                && (!query.has_z
                    || axis_pair_could_satisfy(code, Z_MIN, Z_MAX, centroid, &[Req::Ge(query.zmin)], &[Req::Le(query.zmax)]))
                && axis_pair_could_satisfy(code, T_MIN, T_MAX, centroid, &[Req::Ge(qt.0)], &[Req::Le(qt.1)])
        }
        ScanOp::Same => {
            axis_pair_could_satisfy(
                code,
                X_MIN,
                X_MAX,
                centroid,
                &[Req::Le(query.xmin), Req::Ge(query.xmin)],
                &[Req::Le(query.xmax), Req::Ge(query.xmax)],
            ) && axis_pair_could_satisfy(
                code,
                Y_MIN,
                Y_MAX,
                centroid,
                &[Req::Le(query.ymin), Req::Ge(query.ymin)],
                &[Req::Le(query.ymax), Req::Ge(query.ymax)],
            ) && (!query.has_z
                || axis_pair_could_satisfy(
                    code,
                    Z_MIN,
                    Z_MAX,
                    centroid,
                    &[Req::Le(query.zmin), Req::Ge(query.zmin)],
                    &[Req::Le(query.zmax), Req::Ge(query.zmax)],
                ))
                && axis_pair_could_satisfy(
                    code,
                    T_MIN,
                    T_MAX,
                    centroid,
                    &[Req::Le(qt.0), Req::Ge(qt.0)],
                    &[Req::Le(qt.1), Req::Ge(qt.1)],
                )
        }
        ScanOp::Before => !query.has_t || axis_pair_could_satisfy(code, T_MIN, T_MAX, centroid, &[], &[Req::Lt(qt.0)]),
        ScanOp::After => !query.has_t || axis_pair_could_satisfy(code, T_MIN, T_MAX, centroid, &[Req::Gt(qt.1)], &[]),
        ScanOp::OverBefore => !query.has_t || axis_pair_could_satisfy(code, T_MIN, T_MAX, centroid, &[], &[Req::Le(qt.1)]),
        ScanOp::OverAfter => !query.has_t || axis_pair_could_satisfy(code, T_MIN, T_MAX, centroid, &[Req::Ge(qt.0)], &[]),
        ScanOp::Left => {
            !query.has_x || axis_pair_could_satisfy(code, X_MIN, X_MAX, centroid, &[], &[Req::Lt(query.xmin)])
        }
        ScanOp::Right => {
            !query.has_x || axis_pair_could_satisfy(code, X_MIN, X_MAX, centroid, &[Req::Gt(query.xmax)], &[])
        }
        ScanOp::OverLeft => {
            !query.has_x || axis_pair_could_satisfy(code, X_MIN, X_MAX, centroid, &[], &[Req::Le(query.xmax)])
        }
        ScanOp::OverRight => {
            !query.has_x || axis_pair_could_satisfy(code, X_MIN, X_MAX, centroid, &[Req::Ge(query.xmin)], &[])
        }
        ScanOp::Below => {
            !query.has_x || axis_pair_could_satisfy(code, Y_MIN, Y_MAX, centroid, &[], &[Req::Lt(query.ymin)])
        }
        ScanOp::Above => {
            !query.has_x || axis_pair_could_satisfy(code, Y_MIN, Y_MAX, centroid, &[Req::Gt(query.ymax)], &[])
        }
        ScanOp::OverBelow => {
            !query.has_x || axis_pair_could_satisfy(code, Y_MIN, Y_MAX, centroid, &[], &[Req::Le(query.ymax)])
        }
        ScanOp::OverAbove => {
            !query.has_x || axis_pair_could_satisfy(code, Y_MIN, Y_MAX, centroid, &[Req::Ge(query.ymin)], &[])
        }
        ScanOp::Front => {
            !query.has_z || axis_pair_could_satisfy(code, Z_MIN, Z_MAX, centroid, &[], &[Req::Lt(query.zmin)])
        }
        ScanOp::Back => {
            !query.has_z || axis_pair_could_satisfy(code, Z_MIN, Z_MAX, centroid, &[Req::Gt(query.zmax)], &[])
        }
        ScanOp::OverFront => {
            !query.has_z || axis_pair_could_satisfy(code, Z_MIN, Z_MAX, centroid, &[], &[Req::Le(query.zmax)])
        }
        ScanOp::OverBack => {
            !query.has_z || axis_pair_could_satisfy(code, Z_MIN, Z_MAX, centroid, &[Req::Ge(query.zmin)], &[])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Timestamp;

    fn bbox(x: f64, y: f64, t: i64) -> BBox4D {
        BBox4D::from_point_time(x, y, None, Timestamp::from_micros(t), false)
    }

    #[test]
    fn range_query_finds_overlapping_points() {
        let mut tree = Octree::new();
        for i in 0..100i64 {
            tree.insert(&bbox(i as f64, i as f64, i), i);
        }

        let query = bbox(50.0, 50.0, 50);
        let mut hits = tree.range_query(&query);
        hits.sort();
        assert_eq!(hits, vec![&50]);
    }

    #[test]
    fn range_query_respects_wide_window() {
        let mut tree = Octree::new();
        for i in 0..200i64 {
            tree.insert(&bbox(i as f64, 0.0, i), i);
        }

        let mut query = bbox(10.0, 0.0, 10);
        query.union(&bbox(20.0, 0.0, 20));
        let mut hits: Vec<i64> = tree.range_query(&query).into_iter().copied().collect();
        hits.sort();
        assert_eq!(hits, (10..=20).collect::<Vec<_>>());
    }

    #[test]
    fn duplicate_points_do_not_infinite_loop_on_split() {
        let mut tree = Octree::new();
        for i in 0..(MAX_LEAF_CAPACITY * 2) {
            tree.insert(&bbox(1.0, 1.0, 1), i);
        }
        assert_eq!(tree.len(), MAX_LEAF_CAPACITY * 2);
        let hits = tree.range_query(&bbox(1.0, 1.0, 1));
        assert_eq!(hits.len(), MAX_LEAF_CAPACITY * 2);
    }

    #[test]
    fn empty_tree_returns_no_hits() {
        let tree: Octree<i64> = Octree::new();
        assert!(tree.range_query(&bbox(0.0, 0.0, 0)).is_empty());
    }

    #[test]
    fn range_query_op_contains_finds_enclosing_boxes() {
        let mut tree = Octree::new();
        let mut wide = bbox(0.0, 0.0, 0);
        wide.union(&bbox(10.0, 0.0, 10));
        tree.insert(&wide, 1);
        tree.insert(&bbox(5.0, 0.0, 5), 2);

        let query = bbox(5.0, 0.0, 5);
        let mut hits = tree.range_query_op(&query, ScanOp::Contains);
        hits.sort();
        assert_eq!(hits, vec![&1, &2]);
    }

    #[test]
    fn range_query_op_left_finds_boxes_strictly_left_of_query() {
        let mut tree = Octree::new();
        for i in 0..20i64 {
            tree.insert(&bbox(i as f64, 0.0, i), i);
        }

        let query = bbox(10.0, 0.0, 10);
        let mut hits: Vec<i64> = tree.range_query_op(&query, ScanOp::Left).into_iter().copied().collect();
        hits.sort();
        assert_eq!(hits, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn range_query_op_before_finds_earlier_points() {
        let mut tree = Octree::new();
        for i in 0..20i64 {
            tree.insert(&bbox(0.0, 0.0, i), i);
        }

        let query = bbox(0.0, 0.0, 10);
        let mut hits: Vec<i64> = tree.range_query_op(&query, ScanOp::Before).into_iter().copied().collect();
        hits.sort();
        assert_eq!(hits, (0..10).collect::<Vec<_>>());
    }
}
