// src/graph.rs

use ahash::{AHashMap, AHashSet};
use rayon::prelude::*;

use crate::error::ExtractError;
use crate::neighbors::{enumerate_ed1, enumerate_ed2, real_neighbors};
use crate::types::SequenceRecord;

/// Which mutational neighborhood the graph's edges span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditDistance {
    One,
    Two,
}

impl EditDistance {
    pub fn value(self) -> usize {
        match self {
            EditDistance::One => 1,
            EditDistance::Two => 2,
        }
    }
}

/// Auxiliary maps produced alongside the graph: originating record ids per
/// unique sequence and the observed read-length range.
#[derive(Debug)]
pub struct DatasetIndex {
    pub seq_to_ids: AHashMap<String, Vec<String>>,
    pub min_len: usize,
    pub max_len: usize,
}

impl DatasetIndex {
    /// The unique sequences; identical to the graph's node set.
    pub fn unique_seqs(&self) -> impl Iterator<Item = &str> {
        self.seq_to_ids.keys().map(String::as_str)
    }
}

/// A read-only snapshot of the graph for persistence or visualization
/// collaborators: nodes as `(sequence, count, degree)`, edges as pairs.
#[derive(Debug)]
pub struct GraphView {
    pub nodes: Vec<(String, u32, usize)>,
    pub edges: Vec<(String, String)>,
}

/// Undirected simple graph over unique reads. Nodes are indexed densely;
/// an edge joins two reads at exactly the configured edit distance.
/// Immutable after construction.
#[derive(Debug)]
pub struct ReadGraph {
    seqs: Vec<String>,
    counts: Vec<u32>,
    index: AHashMap<String, u32>,
    adj: Vec<Vec<u32>>,
}

impl ReadGraph {
    pub fn node_count(&self) -> usize {
        self.seqs.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adj.iter().map(Vec::len).sum::<usize>() / 2
    }

    pub fn seq(&self, node: u32) -> &str {
        &self.seqs[node as usize]
    }

    pub fn count(&self, node: u32) -> u32 {
        self.counts[node as usize]
    }

    pub fn degree(&self, node: u32) -> usize {
        self.adj[node as usize].len()
    }

    pub fn neighbors(&self, node: u32) -> &[u32] {
        &self.adj[node as usize]
    }

    pub fn node_id(&self, seq: &str) -> Option<u32> {
        self.index.get(seq).copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = u32> + '_ {
        0..self.seqs.len() as u32
    }

    /// Nodes with no edges.
    pub fn isolates(&self) -> impl Iterator<Item = u32> + '_ {
        self.nodes().filter(|&n| self.degree(n) == 0)
    }

    /// Connected components as sorted node-id lists, ordered by their
    /// smallest node id. Singleton components are included, so the
    /// components partition the full node set.
    pub fn connected_components(&self) -> Vec<Vec<u32>> {
        let n = self.seqs.len();
        let mut seen = vec![false; n];
        let mut components = Vec::new();
        for start in 0..n as u32 {
            if seen[start as usize] {
                continue;
            }
            let mut comp = Vec::new();
            let mut queue = std::collections::VecDeque::from([start]);
            seen[start as usize] = true;
            while let Some(node) = queue.pop_front() {
                comp.push(node);
                for &nei in self.neighbors(node) {
                    if !seen[nei as usize] {
                        seen[nei as usize] = true;
                        queue.push_back(nei);
                    }
                }
            }
            comp.sort_unstable();
            components.push(comp);
        }
        components
    }

    pub fn view(&self) -> GraphView {
        let nodes = self
            .nodes()
            .map(|n| (self.seqs[n as usize].clone(), self.count(n), self.degree(n)))
            .collect();
        let mut edges = Vec::with_capacity(self.edge_count());
        for a in self.nodes() {
            for &b in self.neighbors(a) {
                if a < b {
                    edges.push((self.seqs[a as usize].clone(), self.seqs[b as usize].clone()));
                }
            }
        }
        GraphView { nodes, edges }
    }
}

/// Build the read-adjacency graph from the record stream.
///
/// Counts occurrences per unique read, partitions reads around
/// `high_freq_thre`, then searches the mutational neighborhood of every
/// high-frequency read in parallel against the mode's candidate universe:
/// all unique reads at distance 1, low-frequency reads only at distance 2.
/// Fails with `NoHighFrequencyReads` before any parallel work when no read
/// reaches the threshold.
pub fn build_graph(
    records: &[SequenceRecord],
    mode: EditDistance,
    high_freq_thre: u32,
) -> Result<(ReadGraph, DatasetIndex), ExtractError> {
    let mut count_map: AHashMap<&str, u32> = AHashMap::new();
    let mut seq_to_ids: AHashMap<String, Vec<String>> = AHashMap::new();
    let mut min_len = usize::MAX;
    let mut max_len = 0usize;
    for rec in records {
        *count_map.entry(rec.seq.as_str()).or_insert(0) += 1;
        seq_to_ids
            .entry(rec.seq.clone())
            .or_default()
            .push(rec.id.clone());
        min_len = min_len.min(rec.seq.len());
        max_len = max_len.max(rec.seq.len());
    }

    // Sorted node order keeps ids, component order and output deterministic.
    let mut seqs: Vec<String> = count_map.keys().map(|s| s.to_string()).collect();
    seqs.sort_unstable();
    let counts: Vec<u32> = seqs.iter().map(|s| count_map[s.as_str()]).collect();
    let index: AHashMap<String, u32> = seqs
        .iter()
        .enumerate()
        .map(|(i, s)| (s.clone(), i as u32))
        .collect();

    let high_freq: Vec<u32> = (0..seqs.len() as u32)
        .filter(|&n| counts[n as usize] >= high_freq_thre)
        .collect();
    if high_freq.is_empty() {
        return Err(ExtractError::NoHighFrequencyReads {
            threshold: high_freq_thre,
        });
    }
    log::debug!(
        "{} unique reads, {} high-frequency (threshold {})",
        seqs.len(),
        high_freq.len(),
        high_freq_thre
    );

    // Candidate universe: every unique read at distance 1, where both
    // directions of error are plausible. At distance 2 only low-frequency
    // reads are plausible erroneous variants of a high-frequency anchor.
    let universe: AHashSet<String> = match mode {
        EditDistance::One => seqs.iter().cloned().collect(),
        EditDistance::Two => seqs
            .iter()
            .zip(&counts)
            .filter(|(_, c)| **c < high_freq_thre)
            .map(|(s, _)| s.clone())
            .collect(),
    };

    // Neighbor search per high-frequency read; each unit reads only the
    // immutable universe and index and writes a private edge list, merged
    // afterwards.
    let edges: Vec<(u32, u32)> = high_freq
        .par_iter()
        .flat_map_iter(|&node| {
            let candidates = match mode {
                EditDistance::One => enumerate_ed1(&seqs[node as usize]),
                EditDistance::Two => enumerate_ed2(&seqs[node as usize]),
            };
            real_neighbors(&candidates, &universe)
                .into_iter()
                .map(|nei| (node, index[&nei]))
                .collect::<Vec<_>>()
        })
        .collect();

    let mut adj: Vec<Vec<u32>> = vec![Vec::new(); seqs.len()];
    let mut seen: AHashSet<(u32, u32)> = AHashSet::with_capacity(edges.len());
    for (a, b) in edges {
        if a == b {
            continue;
        }
        let key = (a.min(b), a.max(b));
        if seen.insert(key) {
            adj[a as usize].push(b);
            adj[b as usize].push(a);
        }
    }
    for nei in &mut adj {
        nei.sort_unstable();
    }

    let graph = ReadGraph {
        seqs,
        counts,
        index,
        adj,
    };
    log::info!(
        "graph summary: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    let dataset = DatasetIndex {
        seq_to_ids,
        min_len: if min_len == usize::MAX { 0 } else { min_len },
        max_len,
    };
    Ok((graph, dataset))
}
