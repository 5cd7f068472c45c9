//! Segment-level pipe topology.

use indexmap::{IndexMap, IndexSet};
use smallvec::SmallVec;

use atmos_core::{Direction, NetId, TilePos};

use crate::net::PipeNet;

/// One pipe segment: its net membership and its connected neighbours.
#[derive(Clone, Debug)]
pub(crate) struct Vertex {
    pub(crate) net: NetId,
    pub(crate) edges: SmallVec<[TilePos; 4]>,
}

/// Incremental connectivity over pipe segments.
///
/// Placing a segment next to existing segments merges their nets;
/// removing one splits its net into connected components. Net IDs are
/// monotonic and never reused, so a stale ID held by a host goes dead
/// rather than silently pointing at a different network.
///
/// The graph tracks topology only. Gas lives in the pipe-layer cells
/// of the [`Map`](atmos_grid::Map); the pooled operations in
/// [`net`](crate::net) bridge the two.
#[derive(Clone, Debug, Default)]
pub struct PipeGraph {
    pub(crate) vertices: IndexMap<TilePos, Vertex>,
    pub(crate) nets: IndexMap<NetId, PipeNet>,
    next_net: u32,
}

impl PipeGraph {
    /// An empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a segment at `pos` and return the net it ends up in.
    ///
    /// An isolated segment gets a fresh net. A segment adjacent to
    /// existing segments joins their net; if it bridges several nets,
    /// they merge into the largest and the others retire.
    pub fn add_segment(&mut self, pos: TilePos) -> NetId {
        if let Some(v) = self.vertices.get(&pos) {
            return v.net;
        }

        let mut edges: SmallVec<[TilePos; 4]> = SmallVec::new();
        for dir in Direction::ALL {
            let there = pos.step(dir);
            if self.vertices.contains_key(&there) {
                edges.push(there);
            }
        }

        let net = if edges.is_empty() {
            let net = self.fresh_net();
            self.nets.insert(net, PipeNet::default());
            net
        } else {
            let mut candidates: SmallVec<[NetId; 4]> = SmallVec::new();
            for e in &edges {
                let n = self.vertices[e].net;
                if !candidates.contains(&n) {
                    candidates.push(n);
                }
            }
            let target = *candidates
                .iter()
                .max_by_key(|n| self.nets[*n].members.len())
                .unwrap_or(&candidates[0]);
            for &other in candidates.iter().filter(|&&n| n != target) {
                let absorbed = self
                    .nets
                    .swap_remove(&other)
                    .map(|n| n.members)
                    .unwrap_or_default();
                for member in &absorbed {
                    self.vertices[member].net = target;
                }
                self.nets[&target].members.extend(absorbed);
            }
            target
        };

        for e in &edges {
            self.vertices[e].edges.push(pos);
        }
        self.nets[&net].members.push(pos);
        self.vertices.insert(pos, Vertex { net, edges });
        net
    }

    /// Remove the segment at `pos`, splitting its net if the removal
    /// disconnects it. Returns the net the segment belonged to, or
    /// `None` if there was no segment there.
    ///
    /// After a split, the component containing the removed segment's
    /// first remaining neighbour keeps the old net ID; every other
    /// component gets a fresh one.
    pub fn remove_segment(&mut self, pos: TilePos) -> Option<NetId> {
        let vertex = self.vertices.swap_remove(&pos)?;
        for e in &vertex.edges {
            self.vertices[e].edges.retain(|p| *p != pos);
        }
        let net = vertex.net;
        let members = &mut self.nets[&net].members;
        members.retain(|p| *p != pos);
        if members.is_empty() {
            self.nets.swap_remove(&net);
            return Some(net);
        }
        if vertex.edges.len() > 1 {
            self.repartition(net, &vertex.edges);
        }
        Some(net)
    }

    /// The net containing the segment at `pos`, if any.
    pub fn net_at(&self, pos: TilePos) -> Option<NetId> {
        self.vertices.get(&pos).map(|v| v.net)
    }

    /// Member segments of `net`, if it exists.
    pub fn members(&self, net: NetId) -> Option<&[TilePos]> {
        self.nets.get(&net).map(|n| n.members.as_slice())
    }

    /// Number of live nets.
    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    /// Number of placed segments.
    pub fn segment_count(&self) -> usize {
        self.vertices.len()
    }

    fn fresh_net(&mut self) -> NetId {
        let id = NetId(self.next_net);
        self.next_net += 1;
        id
    }

    /// Re-derive connected components around `seeds` after a removal.
    fn repartition(&mut self, net: NetId, seeds: &[TilePos]) {
        let mut assigned: IndexSet<TilePos> = IndexSet::new();
        let mut keep_old = true;
        for &seed in seeds {
            if assigned.contains(&seed) {
                continue;
            }
            let component = self.flood(seed);
            if keep_old {
                // First component inherits the old ID.
                keep_old = false;
                assigned.extend(component.iter().copied());
                self.nets[&net].members = component;
            } else {
                let fresh = self.fresh_net();
                for member in &component {
                    self.vertices[member].net = fresh;
                }
                assigned.extend(component.iter().copied());
                self.nets.insert(fresh, PipeNet { members: component });
            }
        }
    }

    /// Connected component containing `start`, following edges.
    fn flood(&self, start: TilePos) -> Vec<TilePos> {
        let mut seen: IndexSet<TilePos> = IndexSet::new();
        let mut stack = vec![start];
        seen.insert(start);
        while let Some(pos) = stack.pop() {
            for &next in &self.vertices[&pos].edges {
                if seen.insert(next) {
                    stack.push(next);
                }
            }
        }
        seen.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(graph: &mut PipeGraph, y: i32, xs: std::ops::Range<i32>) {
        for x in xs {
            graph.add_segment(TilePos::new(x, y));
        }
    }

    #[test]
    fn isolated_segments_get_distinct_nets() {
        let mut graph = PipeGraph::new();
        let a = graph.add_segment(TilePos::new(0, 0));
        let b = graph.add_segment(TilePos::new(5, 5));
        assert_ne!(a, b);
        assert_eq!(graph.net_count(), 2);
    }

    #[test]
    fn adjacent_segment_joins_existing_net() {
        let mut graph = PipeGraph::new();
        let a = graph.add_segment(TilePos::new(0, 0));
        let b = graph.add_segment(TilePos::new(1, 0));
        assert_eq!(a, b);
        assert_eq!(graph.members(a).unwrap().len(), 2);
    }

    #[test]
    fn bridging_segment_merges_nets() {
        let mut graph = PipeGraph::new();
        line(&mut graph, 0, 0..3); // net A, 3 members
        let b = graph.add_segment(TilePos::new(4, 0)); // net B, 1 member
        assert_eq!(graph.net_count(), 2);

        let merged = graph.add_segment(TilePos::new(3, 0));
        assert_eq!(graph.net_count(), 1);
        // Larger net survives the merge.
        assert_eq!(merged, graph.net_at(TilePos::new(0, 0)).unwrap());
        assert_ne!(merged, b);
        assert_eq!(graph.members(merged).unwrap().len(), 5);
    }

    #[test]
    fn duplicate_add_is_idempotent() {
        let mut graph = PipeGraph::new();
        let a = graph.add_segment(TilePos::new(0, 0));
        let again = graph.add_segment(TilePos::new(0, 0));
        assert_eq!(a, again);
        assert_eq!(graph.segment_count(), 1);
        assert_eq!(graph.members(a).unwrap().len(), 1);
    }

    #[test]
    fn removing_interior_segment_splits_net() {
        let mut graph = PipeGraph::new();
        line(&mut graph, 0, 0..5);
        let original = graph.net_at(TilePos::new(0, 0)).unwrap();

        graph.remove_segment(TilePos::new(2, 0));
        assert_eq!(graph.net_count(), 2);
        let left = graph.net_at(TilePos::new(0, 0)).unwrap();
        let right = graph.net_at(TilePos::new(4, 0)).unwrap();
        assert_ne!(left, right);
        // One side keeps the original ID, the other is fresh.
        assert!(left == original || right == original);
        assert_eq!(graph.members(left).unwrap().len(), 2);
        assert_eq!(graph.members(right).unwrap().len(), 2);
    }

    #[test]
    fn removing_end_segment_keeps_net_whole() {
        let mut graph = PipeGraph::new();
        line(&mut graph, 0, 0..4);
        let net = graph.net_at(TilePos::new(0, 0)).unwrap();

        graph.remove_segment(TilePos::new(3, 0));
        assert_eq!(graph.net_count(), 1);
        assert_eq!(graph.net_at(TilePos::new(0, 0)), Some(net));
        assert_eq!(graph.members(net).unwrap().len(), 3);
    }

    #[test]
    fn removing_cut_of_loop_does_not_split() {
        let mut graph = PipeGraph::new();
        // 3×3 ring of segments around a hole.
        for (x, y) in [(0, 0), (1, 0), (2, 0), (2, 1), (2, 2), (1, 2), (0, 2), (0, 1)] {
            graph.add_segment(TilePos::new(x, y));
        }
        assert_eq!(graph.net_count(), 1);
        graph.remove_segment(TilePos::new(1, 0));
        // Still one net: the ring stays connected the long way round.
        assert_eq!(graph.net_count(), 1);
        assert_eq!(graph.members(graph.net_at(TilePos::new(0, 0)).unwrap()).unwrap().len(), 7);
    }

    #[test]
    fn removing_last_segment_retires_net() {
        let mut graph = PipeGraph::new();
        let a = graph.add_segment(TilePos::new(0, 0));
        assert_eq!(graph.remove_segment(TilePos::new(0, 0)), Some(a));
        assert_eq!(graph.net_count(), 0);
        assert_eq!(graph.net_at(TilePos::new(0, 0)), None);
        // IDs are never reused.
        let b = graph.add_segment(TilePos::new(0, 0));
        assert_ne!(a, b);
    }

    #[test]
    fn removing_missing_segment_is_noop() {
        let mut graph = PipeGraph::new();
        graph.add_segment(TilePos::new(0, 0));
        assert_eq!(graph.remove_segment(TilePos::new(9, 9)), None);
        assert_eq!(graph.segment_count(), 1);
    }
}
