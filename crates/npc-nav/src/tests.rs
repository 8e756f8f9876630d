//! Unit tests for npc-nav.
//!
//! All tests use hand-built graphs on the XZ plane.

#[cfg(test)]
mod helpers {
    use npc_core::{NodeId, Vec3};
    use crate::{NavGraph, NavGraphBuilder};

    /// A "U" around a wall:
    ///
    /// ```text
    ///   z=4   1 ─────── 2
    ///         │         │
    ///         │  wall   │
    ///   z=0   0         3        4 (isolated)
    ///        x=0       x=4      x=20
    /// ```
    ///
    /// 0 and 3 are 4 m apart in a straight line but 12 m apart on foot.
    pub fn u_graph() -> (NavGraph, [NodeId; 5]) {
        let mut b = NavGraphBuilder::new();
        let n0 = b.add_node(Vec3::new(0.0, 0.0, 0.0));
        let n1 = b.add_node(Vec3::new(0.0, 0.0, 4.0));
        let n2 = b.add_node(Vec3::new(4.0, 0.0, 4.0));
        let n3 = b.add_node(Vec3::new(4.0, 0.0, 0.0));
        let n4 = b.add_node(Vec3::new(20.0, 0.0, 0.0));
        b.add_link(n0, n1);
        b.add_link(n1, n2);
        b.add_link(n2, n3);
        (b.build(), [n0, n1, n2, n3, n4])
    }

    /// Two 10 m links meeting at a right angle.  Most of each link lies
    /// beyond the snap radius of both its nodes.
    ///
    /// ```text
    ///   z=10                2
    ///                       │
    ///   z=0   0 ─────────── 1
    ///        x=0          x=10
    /// ```
    pub fn elbow() -> NavGraph {
        let mut b = NavGraphBuilder::new();
        let n0 = b.add_node(Vec3::new(0.0, 0.0, 0.0));
        let n1 = b.add_node(Vec3::new(10.0, 0.0, 0.0));
        let n2 = b.add_node(Vec3::new(10.0, 0.0, 10.0));
        b.add_link(n0, n1);
        b.add_link(n1, n2);
        b.build()
    }
}

// ── Builder & graph structure ─────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use npc_core::{NodeId, Vec3};
    use crate::NavGraphBuilder;

    #[test]
    fn empty_build() {
        let g = NavGraphBuilder::new().build();
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(g.is_empty());
        assert!(g.nearest_node(Vec3::ZERO).is_none());
    }

    #[test]
    fn link_lengths_are_euclidean() {
        let mut b = NavGraphBuilder::new();
        let a = b.add_node(Vec3::new(0.0, 0.0, 0.0));
        let c = b.add_node(Vec3::new(3.0, 0.0, 4.0));
        b.add_directed_link(a, c);
        let g = b.build();
        assert_eq!(g.edge_count(), 1);
        assert!((g.edge_length[0] - 5.0).abs() < 1e-6);
        assert_eq!(g.out_edges(NodeId(0)).count(), 1);
        assert_eq!(g.out_edges(NodeId(1)).count(), 0);
    }

    #[test]
    fn csr_row_pointers() {
        let (g, [n0, n1, n2, n3, n4]) = super::helpers::u_graph();
        assert_eq!(g.out_edges(n0).count(), 1);
        assert_eq!(g.out_edges(n1).count(), 2);
        assert_eq!(g.out_edges(n2).count(), 2);
        assert_eq!(g.out_edges(n3).count(), 1);
        assert_eq!(g.out_edges(n4).count(), 0);
        assert_eq!(g.node_out_start.len(), g.node_count() + 1);
    }
}

// ── Spatial queries ───────────────────────────────────────────────────────────

#[cfg(test)]
mod spatial {
    use npc_core::Vec3;
    use crate::{Anchor, NavigationService};

    #[test]
    fn nearest_node_within_radius() {
        let (g, [n0, ..]) = super::helpers::u_graph();
        assert_eq!(g.nearest_node_within(Vec3::new(0.5, 0.0, 0.5), 1.0), Some(n0));
        assert_eq!(g.nearest_node_within(Vec3::new(10.0, 0.0, 0.0), 1.0), None);
        assert_eq!(g.nearest_node_within(Vec3::ZERO, -1.0), None);
    }

    #[test]
    fn sample_walkable_returns_node_position() {
        let (g, _) = super::helpers::u_graph();
        let p = g.sample_walkable(Vec3::new(19.0, 0.0, 0.5), 2.0).unwrap();
        assert_eq!(p, Vec3::new(20.0, 0.0, 0.0));
        assert!(g.sample_walkable(Vec3::new(12.0, 0.0, 12.0), 2.0).is_none());
    }

    #[test]
    fn sample_walkable_snaps_onto_links() {
        let (g, _) = super::helpers::u_graph();
        let p = g.sample_walkable(Vec3::new(2.0, 0.0, 4.8), 1.0).unwrap();
        assert!(p.distance(Vec3::new(2.0, 0.0, 4.0)) < 1e-5, "{p}");
    }

    #[test]
    fn mid_link_point_anchors_on_both_directions() {
        let (g, _) = super::helpers::u_graph();
        let Some(Anchor::Link { point, hits }) = g.anchor_within(Vec3::new(0.2, 0.0, 1.0), 1.5) else {
            panic!("expected a link anchor");
        };
        assert!(point.distance(Vec3::new(0.0, 0.0, 1.0)) < 1e-5);
        assert_eq!(hits.len(), 2);
        let mut ts: Vec<f32> = hits.iter().map(|h| h.t).collect();
        ts.sort_by(f32::total_cmp);
        assert!((ts[0] - 0.25).abs() < 1e-5 && (ts[1] - 0.75).abs() < 1e-5, "{ts:?}");
    }

    #[test]
    fn link_end_snaps_to_its_node() {
        let (g, [n0, ..]) = super::helpers::u_graph();
        let anchor = g.anchor_within(Vec3::new(0.0, 0.0, -0.5), 1.5);
        assert_eq!(anchor, Some(Anchor::Node { node: n0, point: Vec3::ZERO }));
        assert_eq!(g.anchor_within(Vec3::ZERO, -1.0), None);
    }
}

// ── Path queries ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod paths {
    use npc_core::Vec3;
    use crate::search::route;
    use crate::{NavError, NavGraph, NavGraphBuilder, NavigationService, PathStatus};

    #[test]
    fn complete_path_goes_around_the_wall() {
        let (g, _) = super::helpers::u_graph();
        let from = Vec3::new(0.0, 0.0, 0.0);
        let to   = Vec3::new(4.0, 0.0, 0.0);
        let path = g.find_path(from, to);
        assert!(path.is_complete());
        assert_eq!(path.corners.first(), Some(&from));
        assert_eq!(path.end(), Some(to));
        // Walkable length, not the 4 m straight line.
        assert!((path.length() - 12.0).abs() < 1e-4, "got {}", path.length());
    }

    #[test]
    fn off_graph_endpoints_are_kept_as_corners() {
        let (g, _) = super::helpers::u_graph();
        let from = Vec3::new(0.5, 0.0, 0.0);
        let to   = Vec3::new(0.0, 0.0, 4.5);
        let path = g.find_path(from, to);
        assert!(path.is_complete());
        assert_eq!(path.corners, vec![from, Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 4.0), to]);
    }

    #[test]
    fn unreachable_goal_is_partial() {
        let (g, _) = super::helpers::u_graph();
        let path = g.find_path(Vec3::ZERO, Vec3::new(20.0, 0.0, 0.0));
        assert_eq!(path.status, PathStatus::Partial);
        assert!(!path.is_complete());
        // Closest reachable node to (20,0,0) is node 3 at (4,0,0).
        assert_eq!(path.end(), Some(Vec3::new(4.0, 0.0, 0.0)));
    }

    #[test]
    fn goal_off_the_mesh_is_partial() {
        let (g, _) = super::helpers::u_graph();
        let path = g.find_path(Vec3::ZERO, Vec3::new(2.0, 0.0, 2.0));
        assert_eq!(path.status, PathStatus::Partial);
    }

    #[test]
    fn start_off_the_mesh_is_invalid() {
        let (g, _) = super::helpers::u_graph();
        let path = g.find_path(Vec3::new(50.0, 0.0, 50.0), Vec3::ZERO);
        assert_eq!(path.status, PathStatus::Invalid);
        assert!(path.corners.is_empty());
        assert_eq!(path.length(), 0.0);
    }

    #[test]
    fn empty_graph_is_invalid() {
        let path = NavGraph::empty().find_path(Vec3::ZERO, Vec3::ZERO);
        assert_eq!(path.status, PathStatus::Invalid);
    }

    #[test]
    fn same_node_path_is_complete() {
        let (g, _) = super::helpers::u_graph();
        let p = Vec3::new(0.0, 0.0, 4.0);
        let path = g.find_path(p, p);
        assert!(path.is_complete());
        assert_eq!(path.length(), 0.0);
    }

    #[test]
    fn node_route_and_errors() {
        let (g, [n0, n1, n2, n3, n4]) = super::helpers::u_graph();
        assert_eq!(route(&g, n0, n3).unwrap(), vec![n0, n1, n2, n3]);
        assert!(matches!(route(&g, n0, n4), Err(NavError::NoPath { .. })));
        assert!(matches!(
            route(&g, n0, npc_core::NodeId(99)),
            Err(NavError::NodeNotFound(_))
        ));
    }

    #[test]
    fn shared_service_through_arc() {
        let (g, _) = super::helpers::u_graph();
        let shared: std::sync::Arc<dyn NavigationService> = std::sync::Arc::new(g);
        assert!(shared.find_path(Vec3::ZERO, Vec3::new(4.0, 0.0, 4.0)).is_complete());
    }

    #[test]
    fn start_mid_link_joins_the_graph() {
        // 5 m from either node, well outside the snap radius of both.
        let g = super::helpers::elbow();
        let from = Vec3::new(5.0, 0.0, 0.0);
        let path = g.find_path(from, Vec3::new(10.0, 0.0, 10.0));
        assert!(path.is_complete());
        assert_eq!(path.corners, vec![from, Vec3::new(10.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 10.0)]);
        assert!((path.length() - 15.0).abs() < 1e-4);

        let back = g.find_path(Vec3::new(7.5, 0.0, 0.0), Vec3::ZERO);
        assert!(back.is_complete());
        assert!((back.length() - 7.5).abs() < 1e-4);
    }

    #[test]
    fn goal_mid_link_is_reachable() {
        let g = super::helpers::elbow();
        let to = Vec3::new(10.0, 0.0, 5.0);
        let path = g.find_path(Vec3::ZERO, to);
        assert!(path.is_complete());
        assert_eq!(path.end(), Some(to));
        assert!((path.length() - 15.0).abs() < 1e-4);
    }

    #[test]
    fn same_link_walks_straight_along_it() {
        let g = super::helpers::elbow();
        let from = Vec3::new(2.0, 0.0, 0.0);
        let to   = Vec3::new(7.0, 0.0, 0.5);
        let path = g.find_path(from, to);
        assert!(path.is_complete());
        assert_eq!(path.corners.len(), 3);
        assert!(path.corners[1].distance(Vec3::new(7.0, 0.0, 0.0)) < 1e-5);
        assert!((path.length() - 5.5).abs() < 1e-4);
    }

    #[test]
    fn one_way_link_is_not_walked_backwards() {
        let mut b = NavGraphBuilder::new();
        let a = b.add_node(Vec3::ZERO);
        let c = b.add_node(Vec3::new(10.0, 0.0, 0.0));
        b.add_directed_link(a, c);
        let g = b.build();

        assert!(g.find_path(Vec3::new(2.0, 0.0, 0.0), Vec3::new(6.0, 0.0, 0.0)).is_complete());
        let back = g.find_path(Vec3::new(6.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(back.status, PathStatus::Partial);
        assert_eq!(back.end(), Some(Vec3::new(10.0, 0.0, 0.0)));
    }
}
