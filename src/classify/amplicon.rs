// src/classify/amplicon.rs

use ahash::AHashSet;

use super::annotate::annotate_pair;
use crate::error::ExtractError;
use crate::graph::ReadGraph;
use crate::types::{AmbiguousGroup, GenuineRecord};

/// Second-pass extraction for amplicon sequencing data.
///
/// Amplicon datasets have much steeper frequency profiles, so the pass uses
/// its own thresholds: a node with `count <= low_freq` and degree within
/// `degree_limit` gets one annotated candidate row per neighbor whose count
/// reaches `high_freq`, all sharing a group id. Edit-distance-1 graphs only.
pub fn extract_amplicon_groups(
    graph: &ReadGraph,
    components: &[Vec<u32>],
    low_freq: u32,
    high_freq: u32,
    degree_limit: usize,
) -> Result<Vec<AmbiguousGroup>, ExtractError> {
    let mut groups = Vec::new();
    let mut visited: AHashSet<u32> = AHashSet::new();
    for comp in components {
        if comp.len() < 2 {
            continue;
        }
        for &node in comp {
            if graph.count(node) > low_freq
                || graph.degree(node) > degree_limit
                || visited.contains(&node)
            {
                continue;
            }
            visited.insert(node);
            let mut candidates = Vec::new();
            for &nei in graph.neighbors(node) {
                if graph.count(nei) >= high_freq {
                    candidates.push(GenuineRecord {
                        parent_read: graph.seq(nei).to_string(),
                        parent_count: graph.count(nei),
                        parent_degree: graph.degree(nei),
                        annotation: Some(annotate_pair(graph.seq(nei), graph.seq(node))?),
                        child_read: graph.seq(node).to_string(),
                        child_count: graph.count(node),
                        child_degree: graph.degree(node),
                    });
                }
            }
            if !candidates.is_empty() {
                groups.push(AmbiguousGroup { candidates });
            }
        }
    }
    log::debug!("{} amplicon candidate groups", groups.len());
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{build_graph, EditDistance};
    use crate::types::SequenceRecord;

    fn records(spec: &[(&str, u32)]) -> Vec<SequenceRecord> {
        let mut out = Vec::new();
        for (seq, count) in spec {
            for i in 0..*count {
                out.push(SequenceRecord {
                    id: format!("{seq}_{i}"),
                    seq: seq.to_string(),
                });
            }
        }
        out
    }

    #[test]
    fn collects_every_qualifying_neighbor_into_one_group() {
        let recs = records(&[("ACGT", 2000), ("TCGA", 1600), ("TCGT", 40), ("ACGC", 10)]);
        let (graph, _) = build_graph(&recs, EditDistance::One, 5).unwrap();
        let comps = graph.connected_components();
        let groups = extract_amplicon_groups(&graph, &comps, 50, 1500, 8).unwrap();
        // TCGT neighbors both amplicon-high reads; ACGC only one.
        assert_eq!(groups.len(), 2);
        let tcgt = groups
            .iter()
            .find(|g| g.candidates[0].child_read == "TCGT")
            .unwrap();
        assert_eq!(tcgt.candidates.len(), 2);
        let acgc = groups
            .iter()
            .find(|g| g.candidates[0].child_read == "ACGC")
            .unwrap();
        assert_eq!(acgc.candidates.len(), 1);
        assert_eq!(acgc.candidates[0].parent_read, "ACGT");
    }

    #[test]
    fn nodes_above_low_freq_are_skipped() {
        let recs = records(&[("ACGT", 2000), ("ACGC", 100)]);
        let (graph, _) = build_graph(&recs, EditDistance::One, 5).unwrap();
        let comps = graph.connected_components();
        let groups = extract_amplicon_groups(&graph, &comps, 50, 1500, 8).unwrap();
        assert!(groups.is_empty());
    }
}
