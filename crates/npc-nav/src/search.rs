//! Dijkstra over a [`NavGraph`] and conversion to path corners.
//!
//! # Cost units
//!
//! Link lengths are converted to whole millimetres (`u32`) so the priority
//! queue can order costs exactly; `NavPath::length` recomputes the metric
//! length from the corner positions.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use npc_core::{EdgeId, NodeId, Vec3};

use crate::graph::{Anchor, NavGraph};
use crate::service::NavPath;
use crate::{NavError, NavResult};

/// Corners closer than this are merged.
const CORNER_MERGE_DIST: f32 = 1e-4;

/// Search state after one Dijkstra run.
struct Reached {
    /// Best known cost (mm) per node; `u32::MAX` for unreached nodes.
    dist: Vec<u32>,
    /// Link that reached each node; `EdgeId::INVALID` for seeds and
    /// unreached nodes.
    prev_edge: Vec<EdgeId>,
}

#[inline]
fn metres_to_mm(metres: f32) -> u32 {
    (metres * 1000.0).round() as u32
}

#[inline]
fn edge_cost_mm(graph: &NavGraph, edge: EdgeId) -> u32 {
    metres_to_mm(graph.edge_length[edge.index()])
}

/// Dijkstra from every `(node, cost)` seed, stopping early once all of
/// `stop_at` is settled.  An empty `stop_at` explores everything reachable.
fn dijkstra(graph: &NavGraph, seeds: &[(NodeId, u32)], stop_at: &[NodeId]) -> Reached {
    let n = graph.node_count();
    let mut dist      = vec![u32::MAX; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];

    // Secondary key NodeId keeps tie-breaking deterministic.
    let mut heap: BinaryHeap<Reverse<(u32, NodeId)>> = BinaryHeap::new();
    for &(node, cost) in seeds {
        if cost < dist[node.index()] {
            dist[node.index()] = cost;
            heap.push(Reverse((cost, node)));
        }
    }
    let mut unsettled = stop_at.to_vec();

    while let Some(Reverse((cost, node))) = heap.pop() {
        if cost > dist[node.index()] {
            continue;
        }
        if !unsettled.is_empty() {
            unsettled.retain(|&g| g != node);
            if unsettled.is_empty() {
                break;
            }
        }
        for edge in graph.out_edges(node) {
            let neighbor = graph.edge_to[edge.index()];
            let new_cost = cost.saturating_add(edge_cost_mm(graph, edge));
            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    Reached { dist, prev_edge }
}

fn reconstruct(graph: &NavGraph, reached: &Reached, to: NodeId) -> Vec<NodeId> {
    let mut nodes = vec![to];
    let mut cur = to;
    loop {
        let e = reached.prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        cur = graph.edge_from[e.index()];
        nodes.push(cur);
    }
    nodes.reverse();
    nodes
}

/// Node sequence of the cheapest route from `from` to `to`.
pub fn route(graph: &NavGraph, from: NodeId, to: NodeId) -> NavResult<Vec<NodeId>> {
    for id in [from, to] {
        if id.index() >= graph.node_count() {
            return Err(NavError::NodeNotFound(id));
        }
    }
    let reached = dijkstra(graph, &[(from, 0)], &[to]);
    if reached.dist[to.index()] == u32::MAX {
        return Err(NavError::NoPath { from, to });
    }
    Ok(reconstruct(graph, &reached, to))
}

/// World-space path query backing `NavGraph`'s [`NavigationService`] impl.
///
/// Both endpoints attach to the graph through [`NavGraph::anchor_within`]
/// with `snap_radius`, so a point part-way along a link joins the search
/// at both of that link's ends.
///
/// - A start that attaches to nothing gives `Invalid`.
/// - If the goal attaches and is reachable, the result is `Complete` and
///   ends exactly at `to`.  Start and goal on the same link in its
///   direction of travel walk straight along it when that is no longer
///   than going through the graph.
/// - Otherwise the result is `Partial`, ending at the reached node closest
///   to `to`.
///
/// [`NavigationService`]: crate::NavigationService
pub fn find_path(graph: &NavGraph, from: Vec3, to: Vec3) -> NavPath {
    let Some(start) = graph.anchor_within(from, graph.snap_radius) else {
        tracing::trace!(%from, "path start is off the walkable graph");
        return NavPath::invalid();
    };
    let goal = graph.anchor_within(to, graph.snap_radius);

    let seeds    = departures(graph, &start);
    let entries  = goal.as_ref().map(|g| arrivals(graph, g)).unwrap_or_default();
    let stop_at: Vec<NodeId> = entries.iter().map(|&(n, _)| n).collect();
    let reached  = dijkstra(graph, &seeds, &stop_at);

    if let Some(goal) = &goal {
        let via_graph = entries
            .iter()
            .filter(|(n, _)| reached.dist[n.index()] != u32::MAX)
            .map(|&(n, extra)| (reached.dist[n.index()].saturating_add(extra), n))
            .min();
        let head = [from, start.point()];
        let tail = [goal.point(), to];

        match (along_shared_link(graph, &start, goal), via_graph) {
            (Some(direct), via) if via.is_none_or(|(cost, _)| direct <= cost) => {
                return NavPath::complete(corners(graph, &head, &[], &tail));
            }
            (_, Some((_, last))) => {
                let nodes = reconstruct(graph, &reached, last);
                return NavPath::complete(corners(graph, &head, &nodes, &tail));
            }
            _ => {}
        }
    }

    // Closest reached node to the goal; ties go to the cheaper, then lower id.
    let best = reached
        .dist
        .iter()
        .enumerate()
        .filter(|(_, d)| **d != u32::MAX)
        .map(|(i, d)| (graph.node_pos[i].distance(to), *d, NodeId(i as u32)))
        .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)))
        .map(|(_, _, id)| id);

    let nodes = best.map(|b| reconstruct(graph, &reached, b)).unwrap_or_default();
    NavPath::partial(corners(graph, &[from, start.point()], &nodes, &[]))
}

/// Nodes the search starts from, with the cost of walking from the anchor
/// point to each.
fn departures(graph: &NavGraph, anchor: &Anchor) -> Vec<(NodeId, u32)> {
    match anchor {
        Anchor::Node { node, .. } => vec![(*node, 0)],
        Anchor::Link { hits, .. } => hits
            .iter()
            .map(|h| {
                let rest = (1.0 - h.t) * graph.edge_length[h.edge.index()];
                (graph.edge_to[h.edge.index()], metres_to_mm(rest))
            })
            .collect(),
    }
}

/// Nodes from which the anchor point is entered, with the remaining cost.
fn arrivals(graph: &NavGraph, anchor: &Anchor) -> Vec<(NodeId, u32)> {
    match anchor {
        Anchor::Node { node, .. } => vec![(*node, 0)],
        Anchor::Link { hits, .. } => hits
            .iter()
            .map(|h| {
                let covered = h.t * graph.edge_length[h.edge.index()];
                (graph.edge_from[h.edge.index()], metres_to_mm(covered))
            })
            .collect(),
    }
}

/// Cost of walking straight from `start` to `goal` when both lie on the
/// same link with the goal ahead.
fn along_shared_link(graph: &NavGraph, start: &Anchor, goal: &Anchor) -> Option<u32> {
    let (Anchor::Link { hits: starts, .. }, Anchor::Link { hits: goals, .. }) = (start, goal) else {
        return None;
    };
    let mut best: Option<u32> = None;
    for s in starts {
        for g in goals.iter().filter(|g| g.edge == s.edge && g.t >= s.t) {
            let cost = metres_to_mm((g.t - s.t) * graph.edge_length[s.edge.index()]);
            best = Some(best.map_or(cost, |b| b.min(cost)));
        }
    }
    best
}

fn corners(graph: &NavGraph, head: &[Vec3], nodes: &[NodeId], tail: &[Vec3]) -> Vec<Vec3> {
    let mut out = Vec::with_capacity(head.len() + nodes.len() + tail.len());
    out.extend_from_slice(head);
    out.extend(nodes.iter().map(|n| graph.node_pos[n.index()]));
    out.extend_from_slice(tail);
    out.dedup_by(|b, a| a.distance(*b) < CORNER_MERGE_DIST);
    // A merged run keeps its first corner; the path still ends on `tail`.
    if let (Some(last), Some(&end)) = (out.last_mut(), tail.last()) {
        *last = end;
    }
    out
}
