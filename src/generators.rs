//! Candidate denominators built from a generator list
//!
//! In expanded mode every non-empty subset of the generators contributes the
//! product of its members, so `k` generators give `2^k - 1` products. The
//! search then evaluates all of them for every scale degree, which costs
//! `O(2^k * n_edo)`; keep `k` around 10 or below.

use log::{debug, warn};
use serde::Serialize;

use crate::error::{NejiError, Result};

/// Generator count above which expanded mode gets noticeably slow.
pub const EXPANSION_WARN_THRESHOLD: usize = 10;

/// How the candidate denominators are derived from the generators.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum CandidateMode {
    /// Products of every non-empty subset of the generators
    #[default]
    Expanded,
    /// The generator list itself
    Limited,
}

/// Product of every non-empty subset of `generators`.
///
/// Subsets are visited in binary-counting order of their membership mask.
/// Equal products from different subsets are all kept.
pub fn expand_generators(generators: &[u64]) -> Result<Vec<u64>> {
    let k = generators.len();
    if k >= u64::BITS as usize {
        return Err(NejiError::GeneratorOverflow);
    }

    let mut products = Vec::new();
    for mask in 1u64..(1u64 << k) {
        let mut product = 1u64;
        for (i, &g) in generators.iter().enumerate() {
            if mask & (1 << i) != 0 {
                product = product
                    .checked_mul(g)
                    .ok_or(NejiError::GeneratorOverflow)?;
            }
        }
        products.push(product);
    }

    Ok(products)
}

/// Denominators evaluated by the best-fit search.
///
/// Kept sorted ascending with duplicates removed, so that when two
/// candidates fit a degree equally well the smaller denominator wins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CandidateSet {
    mode: CandidateMode,
    denominators: Vec<u64>,
}

impl CandidateSet {
    /// Build the candidate set for `generators`.
    ///
    /// Fails if the list is empty, contains a zero, or (in expanded mode)
    /// a subset product overflows.
    pub fn new(generators: &[u64], mode: CandidateMode) -> Result<Self> {
        if generators.is_empty() {
            return Err(NejiError::EmptyGenerators);
        }
        if let Some(&g) = generators.iter().find(|&&g| g == 0) {
            return Err(NejiError::NonPositiveGenerator(g));
        }

        let mut denominators = match mode {
            CandidateMode::Expanded => {
                if generators.len() > EXPANSION_WARN_THRESHOLD {
                    warn!(
                        "{} generators expand to 2^{} - 1 candidate denominators per degree; this may be slow",
                        generators.len(),
                        generators.len()
                    );
                }
                expand_generators(generators)?
            }
            CandidateMode::Limited => generators.to_vec(),
        };

        denominators.sort_unstable();
        denominators.dedup();

        debug!("{:?} candidate denominators: {:?}", mode, denominators);

        Ok(Self { mode, denominators })
    }

    /// How the candidates were derived
    pub fn mode(&self) -> CandidateMode {
        self.mode
    }

    /// Candidate denominators, ascending
    pub fn denominators(&self) -> &[u64] {
        &self.denominators
    }

    /// Largest candidate denominator; sizes one nudge step.
    pub fn largest(&self) -> u64 {
        // never empty: `new` rejects an empty generator list
        self.denominators.last().copied().unwrap_or(1)
    }

    /// Number of distinct candidates
    pub fn len(&self) -> usize {
        self.denominators.len()
    }

    /// Always false for a set built by [`CandidateSet::new`]
    pub fn is_empty(&self) -> bool {
        self.denominators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_two_generators() {
        let mut products = expand_generators(&[2, 3]).unwrap();
        products.sort();
        assert_eq!(products, vec![2, 3, 6]);
    }

    #[test]
    fn test_expand_counts_all_subsets() {
        let products = expand_generators(&[2, 3, 5, 7, 11]).unwrap();
        assert_eq!(products.len(), 31);
        assert!(products.contains(&(2 * 3 * 5 * 7 * 11)));
    }

    #[test]
    fn test_expand_keeps_duplicates() {
        // {2, 6} and {3, 4} share the product 12
        let products = expand_generators(&[2, 3, 4, 6]).unwrap();
        assert_eq!(products.len(), 15);
        assert_eq!(products.iter().filter(|&&p| p == 12).count(), 2);
    }

    #[test]
    fn test_expand_overflow() {
        assert!(matches!(
            expand_generators(&[u64::MAX, 2]),
            Err(NejiError::GeneratorOverflow)
        ));
    }

    #[test]
    fn test_candidate_set_sorted_and_deduplicated() {
        let set = CandidateSet::new(&[5, 3, 2, 6], CandidateMode::Expanded).unwrap();
        let d = set.denominators();
        assert!(d.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(d.first(), Some(&2));
        assert_eq!(set.largest(), 5 * 3 * 2 * 6);
        assert_eq!(set.mode(), CandidateMode::Expanded);
    }

    #[test]
    fn test_limited_mode_uses_raw_generators() {
        let set = CandidateSet::new(&[7, 3, 5], CandidateMode::Limited).unwrap();
        assert_eq!(set.denominators(), &[3, 5, 7]);
        assert_eq!(set.largest(), 7);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_invalid_generators() {
        assert!(matches!(
            CandidateSet::new(&[], CandidateMode::Expanded),
            Err(NejiError::EmptyGenerators)
        ));
        assert!(matches!(
            CandidateSet::new(&[2, 0, 3], CandidateMode::Limited),
            Err(NejiError::NonPositiveGenerator(0))
        ));
    }
}
