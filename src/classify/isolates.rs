// src/classify/isolates.rs

use crate::graph::{DatasetIndex, ReadGraph};
use crate::types::NegativeRecord;

/// Original record ids split by whether their read has any graph neighbors.
/// Handed to file-export collaborators downstream.
#[derive(Debug, Default)]
pub struct IdPartition {
    pub isolated: Vec<String>,
    pub non_isolated: Vec<String>,
}

/// Isolated reads with a high count are treated as error-free negatives.
/// Isolated low-count reads are silently dropped: neither genuine,
/// ambiguous, nor negative.
pub fn extract_isolated_negatives(graph: &ReadGraph, high_freq_thre: u32) -> Vec<NegativeRecord> {
    let negatives: Vec<NegativeRecord> = graph
        .isolates()
        .filter(|&node| graph.count(node) >= high_freq_thre)
        .map(|node| NegativeRecord {
            read: graph.seq(node).to_string(),
            count: graph.count(node),
            degree: 0,
        })
        .collect();
    log::debug!("{} isolated negatives", negatives.len());
    negatives
}

/// Partition the original record identifiers into isolated and non-isolated
/// sets based on the constructed graph.
pub fn split_isolates(graph: &ReadGraph, dataset: &DatasetIndex) -> IdPartition {
    let mut partition = IdPartition::default();
    for node in graph.nodes() {
        let ids = match dataset.seq_to_ids.get(graph.seq(node)) {
            Some(ids) => ids,
            None => continue,
        };
        if graph.degree(node) == 0 {
            partition.isolated.extend(ids.iter().cloned());
        } else {
            partition.non_isolated.extend(ids.iter().cloned());
        }
    }
    log::debug!(
        "{} isolated ids, {} non-isolated ids",
        partition.isolated.len(),
        partition.non_isolated.len()
    );
    partition
}
