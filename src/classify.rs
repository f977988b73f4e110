//! Equivalence classification of transition graphs.
//!
//! Graphs within one `uniq_visits` bucket are partitioned into isomorphism
//! classes by a single left-to-right pass: every graph not yet assigned opens
//! a new class and claims all later unassigned graphs isomorphic to it.
//! Classes are therefore numbered in order of first appearance, and the
//! numbering depends only on the order of the input slice.

use crate::graph::{GraphSignature, TransitionGraph};

/// Assign a class index to every graph in the bucket.
///
/// Two graphs share an index if and only if they are isomorphic. Graph
/// signatures are compared first and the full isomorphism test runs only
/// when they tie.
///
/// # Example
/// ```
/// use mobility_motifs::classify::assign_classes;
/// use mobility_motifs::graph::TransitionGraph;
///
/// let sequences: [&[u64]; 3] = [&[1, 2, 3, 1], &[1, 2, 1, 3, 1], &[4, 6, 5, 4]];
/// let graphs: Vec<TransitionGraph> = sequences
///     .iter()
///     .filter_map(|seq| TransitionGraph::from_sequence(seq))
///     .collect();
///
/// assert_eq!(assign_classes(&graphs), vec![0, 1, 0]);
/// ```
pub fn assign_classes(graphs: &[TransitionGraph]) -> Vec<u32> {
    let signatures: Vec<GraphSignature> = graphs.iter().map(TransitionGraph::signature).collect();
    let mut class_of: Vec<Option<u32>> = vec![None; graphs.len()];
    let mut next_class = 0u32;

    for i in 0..graphs.len() {
        if class_of[i].is_some() {
            continue;
        }
        class_of[i] = Some(next_class);

        for j in (i + 1)..graphs.len() {
            if class_of[j].is_none() && matches(graphs, &signatures, i, j) {
                class_of[j] = Some(next_class);
            }
        }

        next_class += 1;
    }

    finish(class_of)
}

/// Same as [`assign_classes`], with the candidate scan for each new class
/// sharded across the rayon pool.
///
/// Class opening stays sequential, so the result is identical to the
/// sequential pass.
#[cfg(feature = "parallel")]
pub fn assign_classes_parallel(graphs: &[TransitionGraph]) -> Vec<u32> {
    use rayon::prelude::*;

    let signatures: Vec<GraphSignature> = graphs.par_iter().map(TransitionGraph::signature).collect();
    let mut class_of: Vec<Option<u32>> = vec![None; graphs.len()];
    let mut next_class = 0u32;

    for i in 0..graphs.len() {
        if class_of[i].is_some() {
            continue;
        }
        class_of[i] = Some(next_class);

        let members: Vec<usize> = {
            let assigned = &class_of;
            ((i + 1)..graphs.len())
                .into_par_iter()
                .filter(|&j| assigned[j].is_none() && matches(graphs, &signatures, i, j))
                .collect()
        };
        for j in members {
            class_of[j] = Some(next_class);
        }

        next_class += 1;
    }

    finish(class_of)
}

/// Number of distinct classes in an assignment.
pub fn class_count(classes: &[u32]) -> u32 {
    classes.iter().max().map_or(0, |&max| max + 1)
}

fn matches(graphs: &[TransitionGraph], signatures: &[GraphSignature], i: usize, j: usize) -> bool {
    signatures[i] == signatures[j] && graphs[i].search_isomorphism(&graphs[j])
}

fn finish(class_of: Vec<Option<u32>>) -> Vec<u32> {
    // every index is assigned once the scan reaches it
    class_of.into_iter().map(|c| c.unwrap_or_default()).collect()
}
