// src/neighbors.rs

use ahash::AHashSet;

/// The sequence alphabet. Reads containing other symbols never match an
/// enumerated candidate at those positions.
pub const ALPHABET: [char; 4] = ['A', 'C', 'G', 'T'];

/// Enumerate every sequence at exactly one substitution from `read`:
/// `len * (|alphabet| - 1)` distinct candidates, none equal to the input.
pub fn enumerate_ed1(read: &str) -> AHashSet<String> {
    let chars: Vec<char> = read.chars().collect();
    let mut out = AHashSet::with_capacity(chars.len() * (ALPHABET.len() - 1));
    let mut buf = chars.clone();
    for i in 0..chars.len() {
        let original = chars[i];
        for &sub in &ALPHABET {
            if sub == original {
                continue;
            }
            buf[i] = sub;
            out.insert(buf.iter().collect());
        }
        buf[i] = original;
    }
    out
}

/// Enumerate every sequence at exactly two substitutions from `read`: all
/// unordered position pairs with every combination of two replacement bases.
/// Grows quadratically in read length.
pub fn enumerate_ed2(read: &str) -> AHashSet<String> {
    let chars: Vec<char> = read.chars().collect();
    let n = chars.len();
    let mut out = AHashSet::new();
    let mut buf = chars.clone();
    for i in 0..n {
        let orig_i = chars[i];
        for j in (i + 1)..n {
            let orig_j = chars[j];
            for &a in &ALPHABET {
                if a == orig_i {
                    continue;
                }
                buf[i] = a;
                for &b in &ALPHABET {
                    if b == orig_j {
                        continue;
                    }
                    buf[j] = b;
                    out.insert(buf.iter().collect());
                }
                buf[j] = orig_j;
            }
            buf[i] = orig_i;
        }
    }
    out
}

/// Intersect an enumerated candidate set with the universe of sequences that
/// actually occur in the dataset. Constant-time membership tests make this
/// the cheap half of the neighbor search.
pub fn real_neighbors(candidates: &AHashSet<String>, universe: &AHashSet<String>) -> AHashSet<String> {
    if candidates.len() <= universe.len() {
        candidates.intersection(universe).cloned().collect()
    } else {
        universe.intersection(candidates).cloned().collect()
    }
}

/// Full Levenshtein distance (substitutions, insertions, deletions), two-row
/// DP. Reads are short, so the quadratic cost is irrelevant; this is only
/// used as a defensive check on pairs already believed adjacent.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let sub = prev[j] + usize::from(ca != cb);
            curr[j + 1] = sub.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ed1_candidate_count_and_exclusion() {
        let cands = enumerate_ed1("ACGT");
        assert_eq!(cands.len(), 12);
        assert!(!cands.contains("ACGT"));
        assert!(cands.contains("CCGT"));
        assert!(cands.contains("ACGA"));
    }

    #[test]
    fn ed2_candidates_are_all_distance_two() {
        let cands = enumerate_ed2("ACGT");
        // C(4,2) position pairs * 3 * 3 substitutions
        assert_eq!(cands.len(), 54);
        for c in &cands {
            assert_eq!(edit_distance("ACGT", c), 2, "candidate {c}");
        }
    }

    #[test]
    fn real_neighbors_intersects_with_universe() {
        let universe: AHashSet<String> =
            ["ACGT", "ACGG"].iter().map(|s| s.to_string()).collect();
        let found = real_neighbors(&enumerate_ed1("ACGT"), &universe);
        assert_eq!(found.len(), 1);
        assert!(found.contains("ACGG"));
    }

    #[test]
    fn edit_distance_basics() {
        assert_eq!(edit_distance("ACGT", "ACGT"), 0);
        assert_eq!(edit_distance("ACGT", "ACCT"), 1);
        assert_eq!(edit_distance("ACGT", "AGGA"), 2);
        assert_eq!(edit_distance("ACGT", "ACGTT"), 1);
        assert_eq!(edit_distance("", "ACG"), 3);
    }
}
