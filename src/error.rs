//! Error type shared by every stage of the NEJI pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while computing or exporting a NEJI tuning.
#[derive(Error, Debug)]
pub enum NejiError {
    /// Logarithm or division outside its domain (zero denominator or non-positive ratio).
    #[error("domain error: cannot take the pitch of {numerator}/{denominator}")]
    Domain {
        /// Numerator of the rejected interval
        numerator: f64,
        /// Denominator of the rejected interval
        denominator: f64,
    },

    /// The octave must be divided into at least one step.
    #[error("invalid EDO size {0}: must be a positive integer")]
    InvalidEdo(u32),

    /// No generators were given.
    #[error("generator list is empty")]
    EmptyGenerators,

    /// Generators must be at least 1.
    #[error("generator {0} is not a positive integer")]
    NonPositiveGenerator(u64),

    /// Product of a generator subset does not fit in a `u64`.
    #[error("generator product overflows: too many or too large generators")]
    GeneratorOverflow,

    /// Exact ratio arithmetic left the range of `u64`.
    #[error("ratio arithmetic overflows for {0}")]
    RatioOverflow(String),

    /// Nudge degree outside `1..n_edo`.
    #[error("scale degree {degree} is out of range for {n_edo}-EDO (must be below {n_edo})")]
    DegreeOutOfRange {
        /// Requested degree
        degree: usize,
        /// Steps in the scale
        n_edo: usize,
    },

    /// Degree 0 has no lower neighbour, so a nudge there cannot be validated.
    #[error("nudging scale degree 0 (the unison) is not supported")]
    NudgeUnison,

    /// The nudged ratio reaches the next higher degree's ratio.
    #[error(
        "nudged ratio {nudged} for degree {degree} is not below degree {neighbour}'s ratio {upper}; decrease the nudge amount"
    )]
    NudgeCrossesUpper {
        /// Degree being nudged
        degree: usize,
        /// Degree whose ratio was reached
        neighbour: usize,
        /// Ratio the nudge would have produced
        nudged: String,
        /// Ratio of the neighbouring degree
        upper: String,
    },

    /// The nudged ratio reaches the next lower degree's ratio.
    #[error(
        "nudged ratio {nudged} for degree {degree} is not above degree {neighbour}'s ratio {lower}; increase the nudge amount"
    )]
    NudgeCrossesLower {
        /// Degree being nudged
        degree: usize,
        /// Degree whose ratio was reached
        neighbour: usize,
        /// Ratio the nudge would have produced
        nudged: String,
        /// Ratio of the neighbouring degree
        lower: String,
    },

    /// A tuning handed to the Scala exporter is empty or does not start at the unison.
    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    /// The output file could not be written.
    #[error("failed to write '{}': {source}", path.display())]
    Io {
        /// File being written
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NejiError>;
