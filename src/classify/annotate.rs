// src/classify/annotate.rs

use crate::error::ExtractError;
use crate::neighbors::edit_distance;
use crate::types::ErrorAnnotation;

/// Annotate a pair of adjacent reads with the error type, its position and
/// the flanking context windows.
///
/// Equal-length pairs yield a substitution code `parent_base-child_base`.
/// A length difference of one is treated as a single indel with `X` standing
/// in for the missing base. Pairs not at edit distance 1 fail with
/// `InvalidEditDistance`; given the graph builder's contract that branch
/// should be unreachable.
pub fn annotate_pair(parent: &str, child: &str) -> Result<ErrorAnnotation, ExtractError> {
    let distance = edit_distance(parent, child);
    if distance != 1 {
        return Err(ExtractError::InvalidEditDistance {
            parent: parent.to_string(),
            child: child.to_string(),
            distance,
        });
    }

    let p: Vec<char> = parent.chars().collect();
    let c: Vec<char> = child.chars().collect();

    if p.len() == c.len() {
        let pos = mismatch_position(&p, &c);
        Ok(ErrorAnnotation {
            error_type: format!("{}-{}", p[pos], c[pos]),
            position: pos,
            parent_kmer: context_window(&p, pos),
            child_kmer: context_window(&c, pos),
        })
    } else if p.len() < c.len() {
        // Child carries one extra base.
        let pos = mismatch_position(&p, &c);
        let parent_kmer = if pos == 0 {
            format!("X{}", p[0])
        } else if pos == p.len() {
            format!("{}X", p[p.len() - 1])
        } else {
            format!("{}X{}", p[pos - 1], p[pos])
        };
        Ok(ErrorAnnotation {
            error_type: format!("X-{}", c[pos]),
            position: pos,
            parent_kmer,
            child_kmer: context_window(&c, pos),
        })
    } else {
        // Parent carries one extra base.
        let pos = mismatch_position(&c, &p);
        let child_kmer = if pos == 0 {
            format!("X{}", c[0])
        } else if pos == c.len() {
            format!("{}X", c[c.len() - 1])
        } else {
            format!("{}X{}", c[pos - 1], c[pos])
        };
        Ok(ErrorAnnotation {
            error_type: format!("{}-X", p[pos]),
            position: pos,
            parent_kmer: context_window(&p, pos),
            child_kmer,
        })
    }
}

/// First index at which the two reads disagree; the shorter read's length
/// when its whole prefix matches.
fn mismatch_position(shorter: &[char], longer: &[char]) -> usize {
    for (i, &ch) in shorter.iter().enumerate() {
        if longer[i] != ch {
            return i;
        }
    }
    shorter.len()
}

/// Flanking context around `pos`: the first two characters at the left
/// boundary, the last two at the right boundary, otherwise the 3-character
/// window centered on `pos`.
fn context_window(read: &[char], pos: usize) -> String {
    if pos == 0 {
        read[..read.len().min(2)].iter().collect()
    } else if pos >= read.len() - 1 {
        read[read.len() - 2..].iter().collect()
    } else {
        read[pos - 1..pos + 2].iter().collect()
    }
}
