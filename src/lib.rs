// Copyright 2025 Tyler Neely (tylerneely@gmail.com).
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE.
//
// See http://creativecommons.org/licenses/MIT/ for more information.

//! Near-equal just intonation (NEJI) tunings.
//!
//! Each degree of an equal division of the octave is approximated by a
//! rational number whose denominator is built from a set of integer
//! generators. The result can be fine tuned one degree at a time and written
//! out as a Scala tuning file.

#![warn(missing_docs)]

use std::collections::BTreeMap;

pub mod error;
pub mod generators;
pub mod nudge;
pub mod pitch;
pub mod scala;
pub mod search;

pub use error::{NejiError, Result};
pub use generators::{expand_generators, CandidateMode, CandidateSet};
pub use nudge::Nudge;
pub use pitch::{cents_from_edo, cents_from_interval, find_numerator};
pub use scala::{CentsFormat, ScalaFile};
pub use search::{all_approximations, ApproximationRecord, BestFitTable};

/// A computed NEJI tuning together with the candidates it was searched over
#[derive(Clone, Debug)]
pub struct Neji {
    /// Selected approximation per degree
    pub table: BestFitTable,
    /// Candidate denominators used by the search
    pub candidates: CandidateSet,
}

impl Neji {
    /// Search `n_edo`-EDO against `generators`, then apply `nudge` if given.
    pub fn compute(
        n_edo: u32,
        generators: &[u64],
        mode: CandidateMode,
        nudge: Option<Nudge>,
    ) -> Result<Self> {
        let edo = cents_from_edo(n_edo)?;
        let candidates = CandidateSet::new(generators, mode)?;
        let all = all_approximations(&edo, &candidates)?;
        Self::from_approximations(all, candidates, nudge)
    }

    /// Select the best record per degree from an already evaluated
    /// [`all_approximations`] result, then apply `nudge` if given.
    pub fn from_approximations(
        all: BTreeMap<usize, Vec<ApproximationRecord>>,
        candidates: CandidateSet,
        nudge: Option<Nudge>,
    ) -> Result<Self> {
        let mut table = BestFitTable::from_approximations(all);

        if let Some(nudge) = nudge {
            nudge.apply(&mut table, &candidates)?;
        }

        Ok(Self { table, candidates })
    }

    /// The final tuning in cents, unison first
    pub fn cents(&self) -> Vec<f64> {
        self.table.cents()
    }
}

/// Best-fit cents for every pitch of `edo_cents`, searching the full
/// product expansion of `generators`.
pub fn get_neji(edo_cents: &[f64], generators: &[u64]) -> Result<Vec<f64>> {
    let candidates = CandidateSet::new(generators, CandidateMode::Expanded)?;
    Ok(BestFitTable::search(edo_cents, &candidates)?.cents())
}
