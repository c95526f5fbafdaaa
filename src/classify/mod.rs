pub mod amplicon;
pub mod annotate;
pub mod component;
pub mod high_ambiguous;
pub mod isolates;

pub use amplicon::extract_amplicon_groups;
pub use annotate::annotate_pair;
pub use component::{classify_component, classify_components, ClassifyParams, ComponentOutcome, ParentPolicy};
pub use high_ambiguous::extract_high_ambiguous;
pub use isolates::{extract_isolated_negatives, split_isolates, IdPartition};
