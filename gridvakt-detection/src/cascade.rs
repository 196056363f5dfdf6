//! Risk propagation over supply edges.
//!
//! Breadth-first traversal from each failing node over its `supplies`
//! edges, cycle-guarded with a visited set. Every downstream node a failing
//! source can reach is a cascade victim. When several failing sources reach
//! the same victim, the first source in traversal order claims it, so the
//! output is deterministic for a given topology order.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use gridvakt_core::topology::{NodeId, Topology};

use crate::thresholds::Severity;

/// A failing source and one node it puts at risk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadePair {
    pub source: NodeId,
    pub victim: NodeId,
}

/// Output of one propagation pass.
///
/// A node may appear both in `direct` and as a victim in `cascades`; the
/// two findings are independent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CascadeReport {
    pub direct: Vec<(NodeId, Severity)>,
    pub cascades: Vec<CascadePair>,
}

impl CascadeReport {
    pub fn severity_of(&self, source: &NodeId) -> Option<Severity> {
        self.direct
            .iter()
            .find(|(id, _)| id == source)
            .map(|&(_, severity)| severity)
    }

    pub fn is_empty(&self) -> bool {
        self.direct.is_empty() && self.cascades.is_empty()
    }
}

/// Computes the transitive victim set for the given failing nodes.
///
/// `failing` must be ordered deterministically (topology order); the claim
/// tie-break and the output ordering follow from it.
pub fn propagate(topology: &Topology, failing: &[(NodeId, Severity)]) -> CascadeReport {
    let mut claimed: HashSet<NodeId> = HashSet::new();
    let mut cascades = Vec::new();

    for (source, _) in failing {
        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        visited.insert(source.clone());
        queue.extend(topology.supplies_of(source).iter().cloned());

        while let Some(victim) = queue.pop_front() {
            if !visited.insert(victim.clone()) {
                continue;
            }
            if claimed.insert(victim.clone()) {
                cascades.push(CascadePair {
                    source: source.clone(),
                    victim: victim.clone(),
                });
            }
            queue.extend(topology.supplies_of(&victim).iter().cloned());
        }
    }

    CascadeReport {
        direct: failing.to_vec(),
        cascades,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridvakt_core::topology::{Node, NodeKind, TopologyDescription};

    fn node(id: &str, supplies: &[&str]) -> Node {
        Node {
            id: id.into(),
            name: id.to_owned(),
            kind: NodeKind::Substation,
            location: (0.0, 0.0),
            supplies: supplies.iter().map(|&s| s.into()).collect(),
        }
    }

    fn topology(nodes: Vec<Node>) -> Topology {
        Topology::load(TopologyDescription { nodes }).unwrap()
    }

    fn failing(ids: &[&str]) -> Vec<(NodeId, Severity)> {
        ids.iter().map(|&id| (id.into(), Severity::Critical)).collect()
    }

    fn pairs(report: &CascadeReport) -> Vec<(&str, &str)> {
        report
            .cascades
            .iter()
            .map(|p| (p.source.as_str(), p.victim.as_str()))
            .collect()
    }

    #[test]
    fn isolated_failure_has_no_victims() {
        let topo = topology(vec![node("a", &[])]);
        let report = propagate(&topo, &failing(&["a"]));
        assert_eq!(report.direct.len(), 1);
        assert!(report.cascades.is_empty());
    }

    #[test]
    fn one_hop_cascade() {
        let topo = topology(vec![node("a", &["b"]), node("b", &[])]);
        let report = propagate(&topo, &failing(&["a"]));
        assert_eq!(pairs(&report), vec![("a", "b")]);
    }

    #[test]
    fn transitive_closure_reaches_all_downstream() {
        let topo = topology(vec![node("a", &["b"]), node("b", &["c"]), node("c", &[])]);
        let report = propagate(&topo, &failing(&["a"]));
        assert_eq!(pairs(&report), vec![("a", "b"), ("a", "c")]);
    }

    #[test]
    fn supply_cycle_terminates_without_double_emit() {
        let topo = topology(vec![node("a", &["b"]), node("b", &["a"])]);
        let report = propagate(&topo, &failing(&["a"]));
        assert_eq!(pairs(&report), vec![("a", "b")]);
    }

    #[test]
    fn source_is_never_its_own_victim() {
        let topo = topology(vec![node("a", &["a"])]);
        let report = propagate(&topo, &failing(&["a"]));
        assert_eq!(report.direct.len(), 1);
        assert!(report.cascades.is_empty());
    }

    #[test]
    fn mutual_failures_cascade_both_ways() {
        let topo = topology(vec![node("a", &["b"]), node("b", &["a"])]);
        let report = propagate(&topo, &failing(&["a", "b"]));
        assert_eq!(report.direct.len(), 2);
        assert_eq!(pairs(&report), vec![("a", "b"), ("b", "a")]);
    }

    #[test]
    fn first_failing_source_claims_shared_victim() {
        let topo = topology(vec![
            node("a", &["c"]),
            node("b", &["c"]),
            node("c", &[]),
        ]);
        let report = propagate(&topo, &failing(&["a", "b"]));
        assert_eq!(pairs(&report), vec![("a", "c")]);
    }

    #[test]
    fn failing_node_can_still_be_a_victim() {
        let topo = topology(vec![node("a", &["b"]), node("b", &[])]);
        let report = propagate(&topo, &failing(&["a", "b"]));
        assert_eq!(report.direct.len(), 2);
        assert_eq!(pairs(&report), vec![("a", "b")]);
    }

    #[test]
    fn diamond_emits_each_victim_once() {
        let topo = topology(vec![
            node("a", &["b", "c"]),
            node("b", &["d"]),
            node("c", &["d"]),
            node("d", &[]),
        ]);
        let report = propagate(&topo, &failing(&["a"]));
        assert_eq!(pairs(&report), vec![("a", "b"), ("a", "c"), ("a", "d")]);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        // Dense random graphs with arbitrary cycles: propagation must
        // terminate and never report the same victim twice.
        proptest! {
            #[test]
            fn propagation_terminates_and_claims_once(
                edges in proptest::collection::vec((0usize..8, 0usize..8), 0..32),
                fail_mask in 0u8..255,
            ) {
                let mut supplies: Vec<Vec<usize>> = vec![Vec::new(); 8];
                for (from, to) in edges {
                    if !supplies[from].contains(&to) {
                        supplies[from].push(to);
                    }
                }
                let nodes = (0..8)
                    .map(|i| {
                        let targets: Vec<&str> = Vec::new();
                        let mut n = node(&format!("n{i}"), &targets);
                        n.supplies = supplies[i]
                            .iter()
                            .map(|t| NodeId::from(format!("n{t}")))
                            .collect();
                        n
                    })
                    .collect();
                let topo = topology(nodes);
                let failing: Vec<(NodeId, Severity)> = (0..8)
                    .filter(|i| fail_mask & (1 << i) != 0)
                    .map(|i| (NodeId::from(format!("n{i}")), Severity::Warning))
                    .collect();

                let report = propagate(&topo, &failing);

                let mut seen = HashSet::new();
                for pair in &report.cascades {
                    prop_assert!(seen.insert(pair.victim.clone()), "victim reported twice");
                    prop_assert!(pair.source != pair.victim);
                }
            }
        }
    }
}
