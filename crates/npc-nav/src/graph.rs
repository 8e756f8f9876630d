//! Walkable-node graph and builder.
//!
//! # Data layout
//!
//! Links are stored in **Compressed Sparse Row (CSR)** format.  Given a
//! `NodeId n`, its outgoing links occupy the `EdgeId` range:
//!
//! ```text
//! node_out_start[n] .. node_out_start[n+1]
//! ```
//!
//! All link arrays (`edge_from`, `edge_to`, `edge_length`) are sorted by
//! source node, so iterating a node's links is one contiguous scan.
//!
//! # Spatial index
//!
//! Two R-trees (via `rstar`): one over node positions and one over link
//! segments.  Query endpoints attach to whichever is closer, so a point
//! in the middle of a long link snaps onto that link rather than failing
//! to reach the nearest node.  See [`Anchor`].

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use npc_core::{EdgeId, NodeId, Vec3};

use crate::search;
use crate::service::{NavPath, NavigationService};

/// Default distance within which a query point snaps onto the graph.
pub const DEFAULT_SNAP_RADIUS: f32 = 1.5;

/// Distances within this tolerance count as the same attachment point.
const ANCHOR_EPS: f32 = 1e-3;

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f32; 3],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f32; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f32; 3]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        let dz = self.point[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

// ── R-tree link entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct LinkEntry {
    a:    Vec3,
    b:    Vec3,
    edge: EdgeId,
}

impl LinkEntry {
    /// Closest point on the segment to `p` and its fraction along `a -> b`.
    fn project(&self, p: Vec3) -> (Vec3, f32) {
        let ab   = self.b - self.a;
        let len2 = ab.length_squared();
        if len2 <= f32::EPSILON {
            return (self.a, 0.0);
        }
        let t = ((p - self.a).dot(ab) / len2).clamp(0.0, 1.0);
        (self.a + ab * t, t)
    }
}

impl RTreeObject for LinkEntry {
    type Envelope = AABB<[f32; 3]>;
    fn envelope(&self) -> Self::Envelope {
        let (a, b) = (self.a, self.b);
        AABB::from_corners(
            [a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)],
            [a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)],
        )
    }
}

impl PointDistance for LinkEntry {
    fn distance_2(&self, point: &[f32; 3]) -> f32 {
        let p = Vec3::new(point[0], point[1], point[2]);
        let (q, _) = self.project(p);
        (p - q).length_squared()
    }
}

// ── Anchor ────────────────────────────────────────────────────────────────────

/// A link passing through an anchor point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinkHit {
    pub edge: EdgeId,
    /// Fraction of the link already covered at the anchor point, in `[0, 1]`.
    pub t: f32,
}

/// Where a world position attaches to the graph.
#[derive(Clone, Debug, PartialEq)]
pub enum Anchor {
    /// The position snaps onto a node.
    Node { node: NodeId, point: Vec3 },
    /// The position projects onto the interior of one or more links.  A
    /// two-way link contributes one hit per direction.
    Link { point: Vec3, hits: Vec<LinkHit> },
}

impl Anchor {
    /// The attachment point on the graph.
    pub fn point(&self) -> Vec3 {
        match self {
            Anchor::Node { point, .. } | Anchor::Link { point, .. } => *point,
        }
    }
}

// ── NavGraph ──────────────────────────────────────────────────────────────────

/// Directed graph of walkable nodes plus a spatial index for snapping.
///
/// Do not construct directly; use [`NavGraphBuilder`].
pub struct NavGraph {
    /// World position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<Vec3>,

    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Source node of each link (needed to walk `prev_edge` back to the start).
    pub edge_from: Vec<NodeId>,

    /// Destination node of each link.
    pub edge_to: Vec<NodeId>,

    /// Length of each link in metres; the search cost.
    pub edge_length: Vec<f32>,

    /// Maximum distance for snapping a query endpoint onto the graph.
    pub snap_radius: f32,

    spatial_idx: RTree<NodeEntry>,
    link_idx:    RTree<LinkEntry>,
}

impl NavGraph {
    /// A graph with no nodes.  Every path query against it is `Invalid`.
    pub fn empty() -> Self {
        NavGraphBuilder::new().build()
    }

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// Iterator over the `EdgeId`s of all outgoing links from `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nearest node to `pos`, regardless of distance.
    pub fn nearest_node(&self, pos: Vec3) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&pos.to_array())
            .map(|e| e.id)
    }

    /// Nearest node to `pos` within `radius`.
    pub fn nearest_node_within(&self, pos: Vec3, radius: f32) -> Option<NodeId> {
        if radius < 0.0 {
            return None;
        }
        self.spatial_idx
            .nearest_neighbor(&pos.to_array())
            .filter(|e| e.distance_2(&pos.to_array()) <= radius * radius)
            .map(|e| e.id)
    }

    /// Attach `pos` to the closest node or link within `radius`.
    ///
    /// A node wins over a link at (nearly) the same distance, so positions
    /// at a link's end snap onto its node.
    pub fn anchor_within(&self, pos: Vec3, radius: f32) -> Option<Anchor> {
        if radius < 0.0 {
            return None;
        }
        let p = pos.to_array();
        let node = self
            .spatial_idx
            .nearest_neighbor(&p)
            .map(|e| (e.id, e.distance_2(&p).sqrt()))
            .filter(|(_, d)| *d <= radius);
        let link = self
            .link_idx
            .nearest_neighbor_iter_with_distance_2(&p)
            .next()
            .map(|(e, d2)| (e, d2.sqrt()))
            .filter(|(_, d)| *d <= radius);

        match (node, link) {
            (Some((node, dn)), link) if link.is_none_or(|(_, dl)| dn <= dl + ANCHOR_EPS) => {
                Some(Anchor::Node { node, point: self.node_pos[node.index()] })
            }
            (_, Some((nearest, dl))) => {
                let (point, _) = nearest.project(pos);
                let mut hits: Vec<LinkHit> = self
                    .link_idx
                    .nearest_neighbor_iter_with_distance_2(&p)
                    .take_while(|(_, d2)| d2.sqrt() <= dl + ANCHOR_EPS)
                    .filter_map(|(e, _)| {
                        let (q, t) = e.project(pos);
                        (q.distance(point) <= ANCHOR_EPS).then_some(LinkHit { edge: e.edge, t })
                    })
                    .collect();
                hits.sort_by_key(|h| h.edge.0);
                Some(Anchor::Link { point, hits })
            }
            _ => None,
        }
    }
}

impl NavigationService for NavGraph {
    fn find_path(&self, from: Vec3, to: Vec3) -> NavPath {
        search::find_path(self, from, to)
    }

    fn sample_walkable(&self, near: Vec3, radius: f32) -> Option<Vec3> {
        self.anchor_within(near, radius).map(|a| a.point())
    }
}

// ── NavGraphBuilder ───────────────────────────────────────────────────────────

/// Construct a [`NavGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use npc_core::Vec3;
/// use npc_nav::NavGraphBuilder;
///
/// let mut b = NavGraphBuilder::new();
/// let a = b.add_node(Vec3::new(0.0, 0.0, 0.0));
/// let c = b.add_node(Vec3::new(4.0, 0.0, 0.0));
/// b.add_link(a, c);
/// let graph = b.build();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2); // bidirectional
/// ```
pub struct NavGraphBuilder {
    nodes:       Vec<Vec3>,
    raw_edges:   Vec<RawEdge>,
    snap_radius: f32,
}

struct RawEdge {
    from:   NodeId,
    to:     NodeId,
    length: f32,
}

impl NavGraphBuilder {
    pub fn new() -> Self {
        Self {
            nodes:       Vec::new(),
            raw_edges:   Vec::new(),
            snap_radius: DEFAULT_SNAP_RADIUS,
        }
    }

    /// Override [`DEFAULT_SNAP_RADIUS`].
    pub fn snap_radius(mut self, radius: f32) -> Self {
        self.snap_radius = radius;
        self
    }

    /// Add a walkable node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: Vec3) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Add a **directed** link; its cost is the straight distance between
    /// the two nodes.
    pub fn add_directed_link(&mut self, from: NodeId, to: NodeId) {
        let length = self.nodes[from.index()].distance(self.nodes[to.index()]);
        self.raw_edges.push(RawEdge { from, to, length });
    }

    /// Add links in both directions.
    pub fn add_link(&mut self, a: NodeId, b: NodeId) {
        self.add_directed_link(a, b);
        self.add_directed_link(b, a);
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`NavGraph`].
    pub fn build(self) -> NavGraph {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from:   Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:     Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_length: Vec<f32>    = raw.iter().map(|e| e.length).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry { point: pos.to_array(), id: NodeId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        let links: Vec<LinkEntry> = (0..edge_count)
            .map(|i| LinkEntry {
                a:    self.nodes[edge_from[i].index()],
                b:    self.nodes[edge_to[i].index()],
                edge: EdgeId(i as u32),
            })
            .collect();
        let link_idx = RTree::bulk_load(links);

        NavGraph {
            node_pos: self.nodes,
            node_out_start,
            edge_from,
            edge_to,
            edge_length,
            snap_radius: self.snap_radius,
            spatial_idx,
            link_idx,
        }
    }
}

impl Default for NavGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
