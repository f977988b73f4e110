//! Property tests for graph isomorphism and class assignment

use chrono::NaiveDate;
use mobility_motifs::{
    assign_classes, discover_motifs_detailed, MotifConfig, TransitionGraph, VisitRecord,
};
use proptest::prelude::*;

fn permutations(n: usize) -> Vec<Vec<usize>> {
    if n == 0 {
        return vec![vec![]];
    }
    let mut result = Vec::new();
    for perm in permutations(n - 1) {
        for pos in 0..=perm.len() {
            let mut next = perm.clone();
            next.insert(pos, n - 1);
            result.push(next);
        }
    }
    result
}

/// Reference check: try every node bijection.
fn brute_force_isomorphic(a: &TransitionGraph, b: &TransitionGraph) -> bool {
    let n = a.node_count();
    if n != b.node_count() || a.edge_count() != b.edge_count() {
        return false;
    }
    permutations(n).iter().any(|perm| {
        (0..n).all(|i| (0..n).all(|j| a.has_edge(i, j) == b.has_edge(perm[i], perm[j])))
    })
}

fn edge_list(nodes: usize) -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((0..nodes, 0..nodes), 0..(nodes * 3))
}

/// Up to 4 users over 8 days, one random walk over 5 places per user-day.
fn population() -> impl Strategy<Value = Vec<VisitRecord>> {
    prop::collection::vec(prop::collection::vec(0u64..5, 1..9), 1..32).prop_map(|walks| {
        let mut records = Vec::new();
        for (i, walk) in walks.iter().enumerate() {
            let user_id = format!("u{}", i % 4);
            let date = NaiveDate::from_ymd_opt(2023, 5, 1 + (i / 4) as u32).unwrap();
            for (order, &loc) in walk.iter().enumerate() {
                records.push(VisitRecord::new(&user_id, loc, date, order as u32));
            }
        }
        records
    })
}

proptest! {
    #[test]
    fn relabeled_walks_are_isomorphic(
        walk in prop::collection::vec(0u64..6, 1..14),
        perm in Just((0u64..6).collect::<Vec<_>>()).prop_shuffle(),
    ) {
        let relabeled: Vec<u64> = walk.iter().map(|&n| 100 + perm[n as usize]).collect();
        let a = TransitionGraph::from_sequence(&walk).unwrap();
        let b = TransitionGraph::from_sequence(&relabeled).unwrap();
        prop_assert_eq!(a.signature(), b.signature());
        prop_assert!(a.is_isomorphic(&b));
        prop_assert!(b.is_isomorphic(&a));
    }

    #[test]
    fn isomorphism_matches_brute_force(a in edge_list(6), b in edge_list(6)) {
        let ga = TransitionGraph::from_edges(6, &a).unwrap();
        let gb = TransitionGraph::from_edges(6, &b).unwrap();
        prop_assert_eq!(ga.is_isomorphic(&gb), brute_force_isomorphic(&ga, &gb));
    }

    #[test]
    fn relabeled_six_node_graphs_are_isomorphic(
        edges in edge_list(6),
        perm in Just((0usize..6).collect::<Vec<_>>()).prop_shuffle(),
    ) {
        let relabeled: Vec<(usize, usize)> = edges.iter().map(|&(a, b)| (perm[a], perm[b])).collect();
        let a = TransitionGraph::from_edges(6, &edges).unwrap();
        let b = TransitionGraph::from_edges(6, &relabeled).unwrap();
        prop_assert!(a.is_isomorphic(&b));
    }

    #[test]
    fn discovery_ignores_record_order(
        (records, shuffled) in population()
            .prop_flat_map(|records| (Just(records.clone()), Just(records).prop_shuffle())),
    ) {
        let config = MotifConfig {
            proportion_filter: 0.05,
            ..MotifConfig::default()
        };
        let first = discover_motifs_detailed(&records, &config).unwrap();
        let second = discover_motifs_detailed(&records, &config).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(discover_motifs_detailed(&shuffled, &config).unwrap(), first);
    }

    #[test]
    fn classes_partition_by_isomorphism(
        edge_sets in prop::collection::vec(edge_list(4), 1..12),
    ) {
        let graphs: Vec<TransitionGraph> = edge_sets
            .iter()
            .map(|edges| TransitionGraph::from_edges(4, edges).unwrap())
            .collect();
        let classes = assign_classes(&graphs);

        for i in 0..graphs.len() {
            for j in 0..graphs.len() {
                prop_assert_eq!(
                    classes[i] == classes[j],
                    brute_force_isomorphic(&graphs[i], &graphs[j])
                );
            }
        }

        // classes appear in order of first occurrence
        let mut seen = 0u32;
        for &class in &classes {
            prop_assert!(class <= seen);
            if class == seen {
                seen += 1;
            }
        }
    }
}
