//src/types.rs

/// A minimal representation of one input sequencing record.
#[derive(Debug, Clone)]
pub struct SequenceRecord {
    pub id: String,
    pub seq: String,
}

/// Base-level annotation of a single-substitution (or single-indel) event
/// between two adjacent reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorAnnotation {
    /// Substitution code, e.g. `"G-C"`; `X` stands in for a missing base.
    pub error_type: String,
    /// Index of the mismatching base.
    pub position: usize,
    /// Flanking context around the error in the parent read.
    pub parent_kmer: String,
    /// Flanking context around the error in the child read.
    pub child_kmer: String,
}

/// A low-frequency read confidently attributed to one high-frequency parent.
/// `annotation` is present in edit-distance-1 mode only; at distance 2 only
/// the adjacency itself is meaningful.
#[derive(Debug, Clone)]
pub struct GenuineRecord {
    pub parent_read: String,
    pub parent_count: u32,
    pub parent_degree: usize,
    pub annotation: Option<ErrorAnnotation>,
    pub child_read: String,
    pub child_count: u32,
    pub child_degree: usize,
}

/// A group of candidate parents all sharing the same child read: an error
/// whose true parent cannot be uniquely determined. Group ids are assigned
/// at render time, in component order.
#[derive(Debug, Clone)]
pub struct AmbiguousGroup {
    pub candidates: Vec<GenuineRecord>,
}

/// An isolated high-frequency read treated as error-free.
#[derive(Debug, Clone)]
pub struct NegativeRecord {
    pub read: String,
    pub count: u32,
    pub degree: usize,
}

/// Fixed column order for genuine records at edit distance 1.
pub const GENUINE_ED1_COLUMNS: [&str; 10] = [
    "StartRead",
    "StartReadCount",
    "StartDegree",
    "ErrorType",
    "ErrorPosition",
    "StartErrKmer",
    "EndErrKmer",
    "EndRead",
    "EndReadCount",
    "EndDegree",
];

/// Fixed column order for genuine records at edit distance 2.
pub const GENUINE_ED2_COLUMNS: [&str; 6] = [
    "StartRead",
    "StartReadCount",
    "StartDegree",
    "EndRead",
    "EndReadCount",
    "EndDegree",
];

/// Fixed column order for negative records.
pub const NEGATIVE_COLUMNS: [&str; 3] = ["StartRead", "StartReadCount", "StartDegree"];

impl GenuineRecord {
    /// Render one output row in the fixed column order. Annotated records
    /// get the ed1 schema, unannotated ones the ed2 schema.
    pub fn to_row(&self) -> Vec<String> {
        match &self.annotation {
            Some(ann) => vec![
                self.parent_read.clone(),
                self.parent_count.to_string(),
                self.parent_degree.to_string(),
                ann.error_type.clone(),
                ann.position.to_string(),
                ann.parent_kmer.clone(),
                ann.child_kmer.clone(),
                self.child_read.clone(),
                self.child_count.to_string(),
                self.child_degree.to_string(),
            ],
            None => vec![
                self.parent_read.clone(),
                self.parent_count.to_string(),
                self.parent_degree.to_string(),
                self.child_read.clone(),
                self.child_count.to_string(),
                self.child_degree.to_string(),
            ],
        }
    }
}

impl NegativeRecord {
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.read.clone(),
            self.count.to_string(),
            self.degree.to_string(),
        ]
    }
}
