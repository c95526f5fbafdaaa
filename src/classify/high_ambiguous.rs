// src/classify/high_ambiguous.rs

use super::annotate::annotate_pair;
use crate::error::ExtractError;
use crate::graph::ReadGraph;
use crate::types::{AmbiguousGroup, GenuineRecord};

/// Surface mutually-adjacent pairs of reads whose counts both strictly
/// exceed the high-frequency threshold. Each qualifying edge yields one
/// group holding both directions, claiming no parent/child orientation.
/// Edit-distance-1 graphs only; records are always annotated.
pub fn extract_high_ambiguous(
    graph: &ReadGraph,
    components: &[Vec<u32>],
    high_freq_thre: u32,
) -> Result<Vec<AmbiguousGroup>, ExtractError> {
    let mut groups = Vec::new();
    for comp in components {
        for &a in comp {
            for &b in graph.neighbors(a) {
                if b <= a {
                    continue;
                }
                if graph.count(a) > high_freq_thre && graph.count(b) > high_freq_thre {
                    groups.push(AmbiguousGroup {
                        candidates: vec![
                            directed_record(graph, a, b)?,
                            directed_record(graph, b, a)?,
                        ],
                    });
                }
            }
        }
    }
    log::debug!("{} high-ambiguous edges", groups.len());
    Ok(groups)
}

fn directed_record(graph: &ReadGraph, from: u32, to: u32) -> Result<GenuineRecord, ExtractError> {
    Ok(GenuineRecord {
        parent_read: graph.seq(from).to_string(),
        parent_count: graph.count(from),
        parent_degree: graph.degree(from),
        annotation: Some(annotate_pair(graph.seq(from), graph.seq(to))?),
        child_read: graph.seq(to).to_string(),
        child_count: graph.count(to),
        child_degree: graph.degree(to),
    })
}
