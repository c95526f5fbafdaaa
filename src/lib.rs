// src/lib.rs
pub mod classify;
pub mod error;
pub mod fastq;
pub mod graph;
pub mod neighbors;
pub mod types;

use std::fmt::Write as FmtWrite;

use crate::classify::{
    classify_components, extract_amplicon_groups, extract_high_ambiguous,
    extract_isolated_negatives, split_isolates, ClassifyParams, IdPartition, ParentPolicy,
};
use crate::error::ExtractError;
use crate::graph::{build_graph, DatasetIndex, EditDistance, GraphView, ReadGraph};
use crate::types::{
    AmbiguousGroup, GenuineRecord, NegativeRecord, SequenceRecord, GENUINE_ED1_COLUMNS,
    GENUINE_ED2_COLUMNS, NEGATIVE_COLUMNS,
};

/// Immutable extraction parameters, fixed at the start of a run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Size of the worker pool used for the parallel phases.
    pub num_workers: usize,
    /// Count at or above which a read is treated as a trustworthy anchor.
    pub high_freq_thre: u32,
    /// Highest count a candidate error read may have.
    pub max_error_freq: u32,
    /// Highest degree at which an ambiguous call is still trusted.
    pub ambiguous_degree_limit: usize,
    /// Degree gate for the amplicon second pass.
    pub amplicon_degree_limit: usize,
    pub amplicon_low_freq: u32,
    pub amplicon_high_freq: u32,
    /// Also surface mutually-adjacent high-frequency pairs (ed1 only).
    pub high_ambiguous: bool,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_workers: 1,
            high_freq_thre: 5,
            max_error_freq: 3,
            ambiguous_degree_limit: 4,
            amplicon_degree_limit: 8,
            amplicon_low_freq: 50,
            amplicon_high_freq: 1500,
            high_ambiguous: false,
            verbose: false,
        }
    }
}

impl Config {
    fn validate(&self) -> Result<(), ExtractError> {
        if self.num_workers == 0 {
            return Err(ExtractError::InvalidConfig(
                "num_workers must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything one extraction pass produces. Record lists are immutable once
/// emitted; CSV text is generated on demand.
#[derive(Debug)]
pub struct ExtractionResults {
    pub mode: EditDistance,
    pub genuine: Vec<GenuineRecord>,
    pub ambiguous: Vec<AmbiguousGroup>,
    pub negative: Vec<NegativeRecord>,
    /// Present only when requested and only at edit distance 1.
    pub high_ambiguous: Option<Vec<AmbiguousGroup>>,
    /// Original record ids split by graph isolation, for file-export
    /// collaborators.
    pub id_partition: IdPartition,
    pub graph: ReadGraph,
    pub dataset: DatasetIndex,
}

impl ExtractionResults {
    fn genuine_columns(&self) -> &'static [&'static str] {
        match self.mode {
            EditDistance::One => &GENUINE_ED1_COLUMNS,
            EditDistance::Two => &GENUINE_ED2_COLUMNS,
        }
    }

    /// Genuine-error table in the fixed column order.
    pub fn genuine_csv(&self) -> String {
        render_table(
            self.genuine_columns(),
            self.genuine.iter().map(|r| r.to_row()),
        )
    }

    /// Ambiguous-error table: one row per candidate parent, grouped by a
    /// leading `idx` column.
    pub fn ambiguous_csv(&self) -> String {
        render_grouped_table(self.genuine_columns(), &self.ambiguous)
    }

    /// Negative (error-free) table.
    pub fn negative_csv(&self) -> String {
        render_table(&NEGATIVE_COLUMNS, self.negative.iter().map(|r| r.to_row()))
    }

    /// High-ambiguous table: two rows (both directions) per qualifying edge.
    pub fn high_ambiguous_csv(&self) -> Option<String> {
        self.high_ambiguous
            .as_ref()
            .map(|groups| render_grouped_table(&GENUINE_ED1_COLUMNS, groups))
    }

    /// Graph snapshot for persistence or visualization collaborators.
    pub fn graph_view(&self) -> GraphView {
        self.graph.view()
    }
}

fn render_table(columns: &[&str], rows: impl Iterator<Item = Vec<String>>) -> String {
    let mut out = String::new();
    writeln!(out, "{}", columns.join(",")).unwrap();
    for row in rows {
        writeln!(out, "{}", row.join(",")).unwrap();
    }
    out
}

fn render_grouped_table(columns: &[&str], groups: &[AmbiguousGroup]) -> String {
    let mut out = String::new();
    writeln!(out, "idx,{}", columns.join(",")).unwrap();
    for (idx, group) in groups.iter().enumerate() {
        for cand in &group.candidates {
            writeln!(out, "{},{}", idx, cand.to_row().join(",")).unwrap();
        }
    }
    out
}

/// Run the full extraction pipeline over a record snapshot at the given
/// edit-distance mode.
pub fn extract_training_data(
    records: &[SequenceRecord],
    mode: EditDistance,
    config: &Config,
) -> Result<ExtractionResults, ExtractError> {
    config.validate()?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.num_workers)
        .build()?;
    pool.install(|| run_extraction(records, mode, config))
}

fn run_extraction(
    records: &[SequenceRecord],
    mode: EditDistance,
    config: &Config,
) -> Result<ExtractionResults, ExtractError> {
    // 1. Build the read graph and auxiliary maps.
    let (graph, dataset) = build_graph(records, mode, config.high_freq_thre)?;
    log::debug!(
        "read lengths span {}..={}",
        dataset.min_len,
        dataset.max_len
    );

    // 2. Classify every connected component in parallel.
    let components = graph.connected_components();
    let params = ClassifyParams {
        high_freq_thre: config.high_freq_thre,
        max_error_freq: config.max_error_freq,
        ambiguous_degree_limit: config.ambiguous_degree_limit,
        policy: ParentPolicy::UniqueHighNeighbor,
        annotate: mode == EditDistance::One,
    };
    let (genuine, ambiguous) = classify_components(&graph, &components, &params)?;
    log::info!(
        "{} genuine records, {} ambiguous groups",
        genuine.len(),
        ambiguous.len()
    );

    // 3. Isolated high-frequency reads become negatives.
    let negative = extract_isolated_negatives(&graph, config.high_freq_thre);

    // 4. Optional symmetric high-confidence pairs (distance 1 only).
    let high_ambiguous = if mode == EditDistance::One && config.high_ambiguous {
        Some(extract_high_ambiguous(
            &graph,
            &components,
            config.high_freq_thre,
        )?)
    } else {
        None
    };

    // 5. Bipartition the original record ids for file export.
    let id_partition = split_isolates(&graph, &dataset);

    Ok(ExtractionResults {
        mode,
        genuine,
        ambiguous,
        negative,
        high_ambiguous,
        id_partition,
        graph,
        dataset,
    })
}

/// Genuine-error extraction for UMI-style inputs: an edit-distance-1 graph
/// classified with the best-scored-neighbor policy. Emits genuine records
/// only.
pub fn extract_umi_genuine(
    records: &[SequenceRecord],
    config: &Config,
) -> Result<Vec<GenuineRecord>, ExtractError> {
    config.validate()?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.num_workers)
        .build()?;
    pool.install(|| {
        let (graph, _) = build_graph(records, EditDistance::One, config.high_freq_thre)?;
        let components = graph.connected_components();
        let params = ClassifyParams {
            high_freq_thre: config.high_freq_thre,
            max_error_freq: config.max_error_freq,
            ambiguous_degree_limit: config.ambiguous_degree_limit,
            policy: ParentPolicy::BestScoredNeighbor,
            annotate: true,
        };
        let (genuine, _) = classify_components(&graph, &components, &params)?;
        log::info!("{} UMI genuine records", genuine.len());
        Ok(genuine)
    })
}

/// Second-pass extraction for amplicon sequencing data, using the amplicon
/// frequency thresholds instead of the standard ones.
pub fn extract_amplicon(
    records: &[SequenceRecord],
    config: &Config,
) -> Result<Vec<AmbiguousGroup>, ExtractError> {
    config.validate()?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.num_workers)
        .build()?;
    pool.install(|| {
        let (graph, _) = build_graph(records, EditDistance::One, config.high_freq_thre)?;
        let components = graph.connected_components();
        let groups = extract_amplicon_groups(
            &graph,
            &components,
            config.amplicon_low_freq,
            config.amplicon_high_freq,
            config.amplicon_degree_limit,
        )?;
        log::info!("{} amplicon candidate groups", groups.len());
        Ok(groups)
    })
}

/// Render amplicon or high-ambiguous groups as a standalone table.
pub fn grouped_csv(groups: &[AmbiguousGroup]) -> String {
    render_grouped_table(&GENUINE_ED1_COLUMNS, groups)
}
