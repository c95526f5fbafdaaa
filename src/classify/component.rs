// src/classify/component.rs

use ahash::AHashSet;
use rayon::prelude::*;

use super::annotate::annotate_pair;
use crate::error::ExtractError;
use crate::graph::ReadGraph;
use crate::types::{AmbiguousGroup, GenuineRecord};

/// How a candidate error's parent is chosen among its neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentPolicy {
    /// A parent exists only when exactly one neighbor is high-frequency;
    /// several high-frequency neighbors form an ambiguous group.
    UniqueHighNeighbor,
    /// Rank every neighbor by `0.5 * degree + 0.5 * count` (stable,
    /// descending) and take the top one if it is high-frequency. Used for
    /// UMI-style inputs; never emits ambiguous groups.
    BestScoredNeighbor,
}

/// Thresholds for one classification pass.
#[derive(Debug, Clone, Copy)]
pub struct ClassifyParams {
    pub high_freq_thre: u32,
    pub max_error_freq: u32,
    pub ambiguous_degree_limit: usize,
    pub policy: ParentPolicy,
    /// Annotate records with base-level error details (edit-distance-1 mode).
    pub annotate: bool,
}

/// Typed result of classifying one component, merged by the orchestrator.
#[derive(Debug, Default)]
pub struct ComponentOutcome {
    pub genuine: Vec<GenuineRecord>,
    pub ambiguous: Vec<AmbiguousGroup>,
}

/// Classify the nodes of one connected component.
///
/// `visited` is owned by the caller and scoped to one pass; nodes already in
/// it are skipped, and every examined node is added whether or not it
/// produced a record. Running the same pass twice with the same set
/// therefore adds nothing the second time.
pub fn classify_component(
    graph: &ReadGraph,
    nodes: &[u32],
    params: &ClassifyParams,
    visited: &mut AHashSet<u32>,
) -> Result<ComponentOutcome, ExtractError> {
    let mut outcome = ComponentOutcome::default();
    for &node in nodes {
        if graph.count(node) > params.max_error_freq || visited.contains(&node) {
            continue;
        }
        visited.insert(node);
        let degree = graph.degree(node);
        if degree == 0 {
            continue;
        }
        match params.policy {
            ParentPolicy::UniqueHighNeighbor => {
                classify_unique_high(graph, node, params, &mut outcome)?
            }
            ParentPolicy::BestScoredNeighbor => {
                classify_best_scored(graph, node, params, &mut outcome)?
            }
        }
    }
    Ok(outcome)
}

fn classify_unique_high(
    graph: &ReadGraph,
    node: u32,
    params: &ClassifyParams,
    outcome: &mut ComponentOutcome,
) -> Result<(), ExtractError> {
    let neighbors = graph.neighbors(node);
    if neighbors.len() == 1 {
        let nei = neighbors[0];
        if graph.count(nei) >= params.high_freq_thre {
            outcome
                .genuine
                .push(make_record(graph, nei, node, params.annotate)?);
        }
    } else if neighbors.len() <= params.ambiguous_degree_limit {
        let high: Vec<u32> = neighbors
            .iter()
            .copied()
            .filter(|&nei| graph.count(nei) >= params.high_freq_thre)
            .collect();
        match high.len() {
            0 => {}
            1 => outcome
                .genuine
                .push(make_record(graph, high[0], node, params.annotate)?),
            _ => {
                let mut candidates = Vec::with_capacity(high.len());
                for nei in high {
                    candidates.push(make_record(graph, nei, node, params.annotate)?);
                }
                outcome.ambiguous.push(AmbiguousGroup { candidates });
            }
        }
    }
    // Denser nodes stay unclassified; the heuristic is not trusted there.
    Ok(())
}

fn classify_best_scored(
    graph: &ReadGraph,
    node: u32,
    params: &ClassifyParams,
    outcome: &mut ComponentOutcome,
) -> Result<(), ExtractError> {
    let neighbors = graph.neighbors(node);
    if neighbors.len() > params.ambiguous_degree_limit {
        return Ok(());
    }
    let mut scored: Vec<(u32, f64)> = neighbors
        .iter()
        .map(|&nei| {
            let score = 0.5 * graph.degree(nei) as f64 + 0.5 * graph.count(nei) as f64;
            (nei, score)
        })
        .collect();
    // Stable sort: ties keep adjacency order, so the pick is deterministic.
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    if let Some(&(best, _)) = scored.first() {
        if graph.count(best) >= params.high_freq_thre {
            outcome
                .genuine
                .push(make_record(graph, best, node, params.annotate)?);
        }
    }
    Ok(())
}

fn make_record(
    graph: &ReadGraph,
    parent: u32,
    child: u32,
    annotate: bool,
) -> Result<GenuineRecord, ExtractError> {
    let annotation = if annotate {
        Some(annotate_pair(graph.seq(parent), graph.seq(child))?)
    } else {
        None
    };
    Ok(GenuineRecord {
        parent_read: graph.seq(parent).to_string(),
        parent_count: graph.count(parent),
        parent_degree: graph.degree(parent),
        annotation,
        child_read: graph.seq(child).to_string(),
        child_count: graph.count(child),
        child_degree: graph.degree(child),
    })
}

/// Classify every component in parallel. Components are vertex-disjoint, so
/// each unit works on its own fresh visited set and private result lists;
/// outcomes are merged here in component order. Any unit error aborts the
/// whole batch rather than returning partial output.
pub fn classify_components(
    graph: &ReadGraph,
    components: &[Vec<u32>],
    params: &ClassifyParams,
) -> Result<(Vec<GenuineRecord>, Vec<AmbiguousGroup>), ExtractError> {
    let outcomes: Vec<ComponentOutcome> = components
        .par_iter()
        .map(|comp| {
            let mut visited = AHashSet::new();
            classify_component(graph, comp, params, &mut visited)
        })
        .collect::<Result<_, _>>()?;

    let mut genuine = Vec::new();
    let mut ambiguous = Vec::new();
    for mut outcome in outcomes {
        genuine.append(&mut outcome.genuine);
        ambiguous.append(&mut outcome.ambiguous);
    }
    Ok((genuine, ambiguous))
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

    fn params(policy: ParentPolicy) -> ClassifyParams {
        ClassifyParams {
            high_freq_thre: 5,
            max_error_freq: 3,
            ambiguous_degree_limit: 4,
            policy,
            annotate: true,
        }
    }

    #[test]
    fn star_component_yields_one_genuine_per_leaf() {
        // Center count 50; leaves at distance 1 with counts 1, 2, 3.
        let recs = records(&[("ACGT", 50), ("CCGT", 1), ("AGGT", 2), ("ACTT", 3)]);
        let (graph, _) = build_graph(&recs, EditDistance::One, 5).unwrap();
        let comps = graph.connected_components();
        assert_eq!(comps.len(), 1);
        let (genuine, ambiguous) =
            classify_components(&graph, &comps, &params(ParentPolicy::UniqueHighNeighbor))
                .unwrap();
        assert_eq!(genuine.len(), 3);
        assert!(ambiguous.is_empty());
        for rec in &genuine {
            assert_eq!(rec.parent_read, "ACGT");
            assert_eq!(rec.parent_count, 50);
            assert_eq!(rec.child_degree, 1);
            assert!(rec.annotation.is_some());
        }
    }

    #[test]
    fn two_high_neighbors_form_one_ambiguous_group() {
        // TCGT sits between two high-frequency parents one substitution away.
        let recs = records(&[("ACGT", 10), ("TCGA", 8), ("TCGT", 1)]);
        let (graph, _) = build_graph(&recs, EditDistance::One, 5).unwrap();
        let comps = graph.connected_components();
        let (genuine, ambiguous) =
            classify_components(&graph, &comps, &params(ParentPolicy::UniqueHighNeighbor))
                .unwrap();
        // The two parents themselves exceed max_error_freq and are filtered.
        assert!(genuine.is_empty());
        assert_eq!(ambiguous.len(), 1);
        let group = &ambiguous[0];
        assert_eq!(group.candidates.len(), 2);
        for cand in &group.candidates {
            assert_eq!(cand.child_read, "TCGT");
        }
    }

    #[test]
    fn low_frequency_sole_neighbor_stays_unclassified() {
        let recs = records(&[("ACGT", 6), ("ACGG", 2), ("ACGC", 4)]);
        // ACGG and ACGC are low-frequency; ACGC's count exceeds
        // max_error_freq so it is filtered outright.
        let (graph, _) = build_graph(&recs, EditDistance::One, 5).unwrap();
        let comps = graph.connected_components();
        let (genuine, ambiguous) =
            classify_components(&graph, &comps, &params(ParentPolicy::UniqueHighNeighbor))
                .unwrap();
        assert_eq!(genuine.len(), 1);
        assert_eq!(genuine[0].child_read, "ACGG");
        assert!(ambiguous.is_empty());
    }

    #[test]
    fn dense_nodes_are_left_unclassified() {
        let mut p = params(ParentPolicy::UniqueHighNeighbor);
        p.ambiguous_degree_limit = 1;
        let recs = records(&[("ACGT", 10), ("TCGA", 8), ("TCGT", 1)]);
        let (graph, _) = build_graph(&recs, EditDistance::One, 5).unwrap();
        let comps = graph.connected_components();
        // TCGT has degree 2 > limit 1: too densely connected to call.
        let (genuine, ambiguous) = classify_components(&graph, &comps, &p).unwrap();
        assert!(genuine.is_empty());
        assert!(ambiguous.is_empty());
    }

    #[test]
    fn revisiting_a_component_adds_no_records() {
        let recs = records(&[("ACGT", 50), ("CCGT", 1), ("AGGT", 2)]);
        let (graph, _) = build_graph(&recs, EditDistance::One, 5).unwrap();
        let comps = graph.connected_components();
        let p = params(ParentPolicy::UniqueHighNeighbor);
        let mut visited = AHashSet::new();
        let first = classify_component(&graph, &comps[0], &p, &mut visited).unwrap();
        assert_eq!(first.genuine.len(), 2);
        let second = classify_component(&graph, &comps[0], &p, &mut visited).unwrap();
        assert!(second.genuine.is_empty());
        assert!(second.ambiguous.is_empty());
    }

    #[test]
    fn every_eligible_node_is_visited_once() {
        let recs = records(&[("ACGT", 50), ("CCGT", 1), ("AGGT", 2), ("ACTT", 4)]);
        let (graph, _) = build_graph(&recs, EditDistance::One, 5).unwrap();
        let comps = graph.connected_components();
        let p = params(ParentPolicy::UniqueHighNeighbor);
        let mut visited = AHashSet::new();
        classify_component(&graph, &comps[0], &p, &mut visited).unwrap();
        // Nodes over max_error_freq (the center at 50, ACTT at 4) are
        // filtered, everything else was examined exactly once.
        assert_eq!(visited.len(), 2);
        assert!(visited.contains(&graph.node_id("CCGT").unwrap()));
        assert!(visited.contains(&graph.node_id("AGGT").unwrap()));
    }

    #[test]
    fn classified_filtered_and_unclassified_partition_the_component() {
        // One high center, one genuine leaf, one child with two high
        // parents, one over-frequency leaf, one low leaf with a low parent.
        let recs = records(&[
            ("ACGT", 10),
            ("TCGA", 8),
            ("TCGT", 1), // ambiguous: two high parents
            ("ACGA", 4), // filtered: count > max_error_freq
            ("ACGC", 2), // genuine child of ACGT
        ]);
        let (graph, _) = build_graph(&recs, EditDistance::One, 5).unwrap();
        let comps = graph.connected_components();
        assert_eq!(comps.len(), 1);
        let (genuine, ambiguous) =
            classify_components(&graph, &comps, &params(ParentPolicy::UniqueHighNeighbor))
                .unwrap();

        let genuine_children: Vec<&str> =
            genuine.iter().map(|r| r.child_read.as_str()).collect();
        let ambiguous_children: Vec<&str> = ambiguous
            .iter()
            .flat_map(|g| g.candidates.iter().map(|r| r.child_read.as_str()))
            .collect();
        assert_eq!(genuine_children, ["ACGC"]);
        assert!(ambiguous_children.iter().all(|&c| c == "TCGT"));
        // No read appears in more than one record set.
        assert!(!genuine_children.iter().any(|c| ambiguous_children.contains(c)));
        // Filtered (ACGT, TCGA, ACGA) and unclassified nodes make up the rest.
        let classified = 1 + 1;
        assert_eq!(graph.node_count() - classified, 3);
    }

    #[test]
    fn best_scored_policy_picks_strongest_neighbor() {
        // TCGT neighbors two high-frequency reads; TCGA has the larger
        // count and wins the score.
        let recs = records(&[("ACGT", 7), ("TCGA", 20), ("TCGT", 1)]);
        let (graph, _) = build_graph(&recs, EditDistance::One, 5).unwrap();
        let comps = graph.connected_components();
        let (genuine, ambiguous) =
            classify_components(&graph, &comps, &params(ParentPolicy::BestScoredNeighbor))
                .unwrap();
        assert!(ambiguous.is_empty());
        assert_eq!(genuine.len(), 1);
        assert_eq!(genuine[0].parent_read, "TCGA");
        assert_eq!(genuine[0].child_read, "TCGT");
    }

    #[test]
    fn best_scored_tie_keeps_adjacency_order() {
        // Both parents have degree 1 and count 8: identical scores. The
        // stable sort keeps adjacency order, so the lowest node id (the
        // lexicographically first sequence, ACGT) wins deterministically.
        let recs = records(&[("ACGT", 8), ("TCGA", 8), ("TCGT", 1)]);
        let (graph, _) = build_graph(&recs, EditDistance::One, 5).unwrap();
        let comps = graph.connected_components();
        let (genuine, _) =
            classify_components(&graph, &comps, &params(ParentPolicy::BestScoredNeighbor))
                .unwrap();
        assert_eq!(genuine.len(), 1);
        assert_eq!(genuine[0].parent_read, "ACGT");
        assert_eq!(genuine[0].child_read, "TCGT");
    }

    #[test]
    fn best_scored_rejects_low_frequency_winner() {
        let recs = records(&[("ACGT", 4), ("ACGG", 1)]);
        // Highest-scored neighbor is below the high-frequency threshold.
        let (graph, _) = build_graph(&recs, EditDistance::One, 4).unwrap();
        let comps = graph.connected_components();
        let mut p = params(ParentPolicy::BestScoredNeighbor);
        p.high_freq_thre = 10;
        let (genuine, _) = classify_components(&graph, &comps, &p).unwrap();
        assert!(genuine.is_empty());
    }
}
