//! Best-fit search of just intonation ratios for each EDO degree
//!
//! For every degree and every candidate denominator `q`, the ideal numerator
//! `q * 2^(cents/1200)` is rounded to the nearest integer (halves away from
//! zero) and the resulting ratio is scored by its signed error in cents.
//! Each degree keeps the candidate with the smallest absolute error; on an
//! exact tie the first candidate in ascending-denominator order is kept.

use std::collections::BTreeMap;

use log::{debug, trace};
use num_rational::Ratio;
use serde::{Serialize, Serializer};

use crate::error::{NejiError, Result};
use crate::generators::CandidateSet;
use crate::pitch::{cents_from_interval, find_numerator};

/// Formats a ratio as `n/d`, keeping the `/1` of whole numbers.
pub fn format_ratio(ratio: &Ratio<u64>) -> String {
    format!("{}/{}", ratio.numer(), ratio.denom())
}

fn serialize_ratio<S: Serializer>(
    ratio: &Ratio<u64>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(&format_ratio(ratio))
}

/// One candidate approximation of one scale degree
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ApproximationRecord {
    /// Scale degree index, 0 is the unison
    pub degree: usize,
    /// Candidate denominator the numerator was fitted against
    pub denominator: u64,
    /// Rounded best-fit numerator
    pub numerator: u64,
    /// `numerator/denominator` in lowest terms
    #[serde(serialize_with = "serialize_ratio")]
    pub ratio: Ratio<u64>,
    /// EDO pitch being approximated
    pub target_cents: f64,
    /// Pitch of `ratio`
    pub cents: f64,
    /// `cents - target_cents`
    pub error: f64,
}

impl ApproximationRecord {
    /// Fit `denominator` to `target_cents`.
    pub fn evaluate(degree: usize, target_cents: f64, denominator: u64) -> Result<Self> {
        let ideal = find_numerator(target_cents, denominator as f64);
        let rounded = ideal.round();
        if rounded.is_nan() || rounded >= u64::MAX as f64 {
            return Err(NejiError::RatioOverflow(format!(
                "degree {degree} numerator over {denominator}"
            )));
        }
        let numerator = rounded as u64;
        let cents = cents_from_interval(numerator as f64, denominator as f64)?;
        let ratio = Ratio::new(numerator, denominator);

        Ok(Self {
            degree,
            denominator,
            numerator,
            ratio,
            target_cents,
            cents,
            error: cents - target_cents,
        })
    }
}

/// Every candidate approximation, grouped by degree, in candidate order.
pub fn all_approximations(
    edo_cents: &[f64],
    candidates: &CandidateSet,
) -> Result<BTreeMap<usize, Vec<ApproximationRecord>>> {
    let mut by_degree = BTreeMap::new();

    for (degree, &target) in edo_cents.iter().enumerate() {
        let records = candidates
            .denominators()
            .iter()
            .map(|&q| -> Result<ApproximationRecord> {
                let record = ApproximationRecord::evaluate(degree, target, q)?;
                trace!(
                    "degree {}: {} -> {:.6} cents (error {:+.6})",
                    degree,
                    format_ratio(&record.ratio),
                    record.cents,
                    record.error
                );
                Ok(record)
            })
            .collect::<Result<Vec<_>>>()?;

        by_degree.insert(degree, records);
    }

    Ok(by_degree)
}

/// The selected approximation for each scale degree
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BestFitTable {
    records: Vec<ApproximationRecord>,
}

impl BestFitTable {
    /// Run the search over every degree of `edo_cents`.
    pub fn search(edo_cents: &[f64], candidates: &CandidateSet) -> Result<Self> {
        debug!(
            "searching {} degrees against {} candidate denominators",
            edo_cents.len(),
            candidates.len()
        );

        let all = all_approximations(edo_cents, candidates)?;
        Ok(Self::from_approximations(all))
    }

    /// Keep the smallest-error record of each degree.
    pub fn from_approximations(all: BTreeMap<usize, Vec<ApproximationRecord>>) -> Self {
        let records = all
            .into_values()
            .filter_map(|records| {
                let mut iter = records.into_iter();
                let first = iter.next()?;
                let best = iter.fold(first, |best, candidate| {
                    if candidate.error.abs() < best.error.abs() {
                        candidate
                    } else {
                        best
                    }
                });

                debug!(
                    "degree {}: best {} ({:.6} cents, error {:+.6})",
                    best.degree,
                    format_ratio(&best.ratio),
                    best.cents,
                    best.error
                );
                Some(best)
            })
            .collect();

        Self { records }
    }

    /// Number of scale degrees, unison and octave included
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no degree has been searched
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Selected record of `degree`
    pub fn get(&self, degree: usize) -> Option<&ApproximationRecord> {
        self.records.get(degree)
    }

    pub(crate) fn get_mut(&mut self, degree: usize) -> Option<&mut ApproximationRecord> {
        self.records.get_mut(degree)
    }

    /// Selected records, indexed by degree
    pub fn records(&self) -> &[ApproximationRecord] {
        &self.records
    }

    /// Selected ratio of every degree
    pub fn ratios(&self) -> Vec<Ratio<u64>> {
        self.records.iter().map(|r| r.ratio).collect()
    }

    /// The final tuning: selected cents of every degree
    pub fn cents(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.cents).collect()
    }
}
