//! Manual adjustment of one selected ratio
//!
//! A nudge of `amount` moves a degree's ratio by `amount / largest`, where
//! `largest` is the largest candidate denominator. The nudged ratio must stay
//! strictly between the ratios of the neighbouring degrees; crossing either
//! one is an error, never a clamp.

use log::{debug, info};
use num_rational::Ratio;
use num_traits::{CheckedAdd, CheckedSub};

use crate::error::{NejiError, Result};
use crate::generators::CandidateSet;
use crate::pitch::cents_from_interval;
use crate::search::{format_ratio, ApproximationRecord, BestFitTable};

/// A signed adjustment of one scale degree
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Nudge {
    /// Degree to adjust; must be in `1..n_edo`
    pub degree: usize,
    /// Signed number of `1/largest` steps
    pub amount: i64,
}

impl Nudge {
    /// Nudge `degree` by `amount` steps.
    pub fn new(degree: usize, amount: i64) -> Self {
        Self { degree, amount }
    }

    /// Check that the degree can be nudged in a scale of `n_edo` steps.
    ///
    /// Degree 0 has no lower neighbour and degree `n_edo` (the octave) no
    /// upper one, so both are rejected.
    pub fn check_degree(&self, n_edo: usize) -> Result<()> {
        if self.degree >= n_edo {
            return Err(NejiError::DegreeOutOfRange {
                degree: self.degree,
                n_edo,
            });
        }
        if self.degree == 0 {
            return Err(NejiError::NudgeUnison);
        }
        Ok(())
    }

    /// Apply the nudge to `table` and return the replaced record.
    ///
    /// The table is left untouched when validation fails.
    pub fn apply(
        &self,
        table: &mut BestFitTable,
        candidates: &CandidateSet,
    ) -> Result<ApproximationRecord> {
        let n_edo = table.len().saturating_sub(1);
        self.check_degree(n_edo)?;

        let degree = self.degree;
        let delta = Ratio::new(self.amount.unsigned_abs(), candidates.largest());
        let overflow = || NejiError::RatioOverflow(format!("degree {degree} nudge"));

        // check_degree guarantees both neighbours exist
        let (lower, current, upper) = match (
            table.get(degree - 1),
            table.get(degree),
            table.get(degree + 1),
        ) {
            (Some(l), Some(c), Some(u)) => (l.ratio, c.ratio, u.ratio),
            _ => {
                return Err(NejiError::DegreeOutOfRange { degree, n_edo });
            }
        };

        let nudged = if self.amount >= 0 {
            let nudged = current.checked_add(&delta).ok_or_else(overflow)?;
            if nudged >= upper {
                return Err(NejiError::NudgeCrossesUpper {
                    degree,
                    neighbour: degree + 1,
                    nudged: format_ratio(&nudged),
                    upper: format_ratio(&upper),
                });
            }
            nudged
        } else {
            let floor = lower.checked_add(&delta).ok_or_else(overflow)?;
            if current <= floor {
                let nudged = match current.checked_sub(&delta) {
                    Some(r) => format_ratio(&r),
                    None => match delta.checked_sub(&current) {
                        Some(below_zero) => format!("-{}", format_ratio(&below_zero)),
                        None => {
                            format!("{} - {}", format_ratio(&current), format_ratio(&delta))
                        }
                    },
                };
                return Err(NejiError::NudgeCrossesLower {
                    degree,
                    neighbour: degree - 1,
                    nudged,
                    lower: format_ratio(&lower),
                });
            }
            // current > lower + delta >= delta, so only the common denominator can overflow
            current.checked_sub(&delta).ok_or_else(overflow)?
        };

        let cents = cents_from_interval(*nudged.numer() as f64, *nudged.denom() as f64)?;

        let record = table
            .get_mut(degree)
            .ok_or(NejiError::DegreeOutOfRange { degree, n_edo })?;
        debug!(
            "degree {}: {} -> {} (step 1/{})",
            degree,
            format_ratio(&record.ratio),
            format_ratio(&nudged),
            candidates.largest()
        );

        record.numerator = *nudged.numer();
        record.denominator = *nudged.denom();
        record.ratio = nudged;
        record.cents = cents;
        record.error = cents - record.target_cents;

        info!(
            "nudged degree {} by {} to {} ({:.6} cents)",
            degree,
            self.amount,
            format_ratio(&nudged),
            cents
        );

        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::CandidateMode;
    use crate::pitch::cents_from_edo;

    fn twelve_edo() -> (BestFitTable, CandidateSet) {
        let candidates = CandidateSet::new(&[2, 3, 5], CandidateMode::Expanded).unwrap();
        let table = BestFitTable::search(&cents_from_edo(12).unwrap(), &candidates).unwrap();
        (table, candidates)
    }

    #[test]
    fn test_neighbourhood_of_fourth() {
        let (table, candidates) = twelve_edo();
        assert_eq!(candidates.largest(), 30);
        assert_eq!(table.get(4).unwrap().ratio, Ratio::new(19, 15));
        assert_eq!(table.get(5).unwrap().ratio, Ratio::new(4, 3));
        assert_eq!(table.get(6).unwrap().ratio, Ratio::new(7, 5));
    }

    #[test]
    fn test_nudge_up() {
        let (mut table, candidates) = twelve_edo();
        let record = Nudge::new(5, 1).apply(&mut table, &candidates).unwrap();

        assert_eq!(record.ratio, Ratio::new(41, 30));
        assert_eq!(table.get(5).unwrap().ratio, Ratio::new(41, 30));
        let expected = cents_from_interval(41.0, 30.0).unwrap();
        assert!((table.cents()[5] - expected).abs() < 1e-12);
        assert!((record.error - (expected - 500.0)).abs() < 1e-9);

        let ratios = table.ratios();
        assert!(ratios[4] < ratios[5] && ratios[5] < ratios[6]);
    }

    #[test]
    fn test_nudge_up_onto_neighbour_fails() {
        let (mut table, candidates) = twelve_edo();
        let before = table.clone();

        // 4/3 + 2/30 = 7/5, equal to degree 6
        let err = Nudge::new(5, 2).apply(&mut table, &candidates).unwrap_err();
        assert!(matches!(
            err,
            NejiError::NudgeCrossesUpper {
                degree: 5,
                neighbour: 6,
                ..
            }
        ));
        assert_eq!(table, before);
    }

    #[test]
    fn test_nudge_down() {
        let (mut table, candidates) = twelve_edo();
        let record = Nudge::new(5, -1).apply(&mut table, &candidates).unwrap();
        assert_eq!(record.ratio, Ratio::new(13, 10));
        assert_eq!(record.numerator, 13);
        assert_eq!(record.denominator, 10);
    }

    #[test]
    fn test_nudge_down_onto_neighbour_fails() {
        let (mut table, candidates) = twelve_edo();

        // 4/3 - 2/30 = 19/15, equal to degree 4
        let err = Nudge::new(5, -2).apply(&mut table, &candidates).unwrap_err();
        assert!(matches!(
            err,
            NejiError::NudgeCrossesLower {
                degree: 5,
                neighbour: 4,
                ..
            }
        ));

        // far below zero
        let err = Nudge::new(5, -100).apply(&mut table, &candidates).unwrap_err();
        match err {
            NejiError::NudgeCrossesLower { nudged, .. } => assert!(nudged.starts_with('-')),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_nudge_down_with_huge_coprime_denominators() {
        let candidates =
            CandidateSet::new(&[4294967311, 4294967357], CandidateMode::Limited).unwrap();
        let table = BestFitTable::search(&cents_from_edo(12).unwrap(), &candidates).unwrap();

        // the common denominator of 4294967311 and 4294967357 exceeds u64
        for degree in [3, 9] {
            let mut scratch = table.clone();
            let result = Nudge::new(degree, -1).apply(&mut scratch, &candidates);
            assert!(
                matches!(result, Err(NejiError::RatioOverflow(_))),
                "degree {degree}: {result:?}"
            );
            assert_eq!(scratch, table);
        }

        for degree in 1..12 {
            let mut scratch = table.clone();
            match Nudge::new(degree, -1).apply(&mut scratch, &candidates) {
                Ok(record) => {
                    let ratios = scratch.ratios();
                    assert!(ratios[degree - 1] < record.ratio);
                    assert!(record.ratio < ratios[degree + 1]);
                }
                Err(NejiError::RatioOverflow(_)) | Err(NejiError::NudgeCrossesLower { .. }) => {}
                Err(other) => panic!("degree {degree}: unexpected error {other}"),
            }
        }
    }

    #[test]
    fn test_unison_and_out_of_range_rejected() {
        let (mut table, candidates) = twelve_edo();
        assert!(matches!(
            Nudge::new(0, 1).apply(&mut table, &candidates),
            Err(NejiError::NudgeUnison)
        ));
        assert!(matches!(
            Nudge::new(12, -1).apply(&mut table, &candidates),
            Err(NejiError::DegreeOutOfRange {
                degree: 12,
                n_edo: 12
            })
        ));
        assert!(matches!(
            Nudge::new(40, 1).apply(&mut table, &candidates),
            Err(NejiError::DegreeOutOfRange { .. })
        ));
    }
}
