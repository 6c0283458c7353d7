//! Pitch conversions between EDO degrees, cents and frequency ratios
//!
//! One octave (ratio 2:1) spans 1200 cents.

use crate::error::{NejiError, Result};

/// Cents in one octave
pub const CENTS_PER_OCTAVE: f64 = 1200.0;

/// Cents of every degree of an `n_edo` equal division, unison through octave.
///
/// Returns `n_edo + 1` values: degree `i` sits at `i * 1200 / n_edo` cents.
pub fn cents_from_edo(n_edo: u32) -> Result<Vec<f64>> {
    if n_edo == 0 {
        return Err(NejiError::InvalidEdo(n_edo));
    }

    let step = CENTS_PER_OCTAVE / n_edo as f64;
    let mut cents: Vec<f64> = (0..=n_edo).map(|i| step * i as f64).collect();

    // Pin the octave so accumulated rounding never leaves it at 1199.999...
    if let Some(last) = cents.last_mut() {
        *last = CENTS_PER_OCTAVE;
    }

    Ok(cents)
}

/// Size of the interval `numerator/denominator` in cents.
pub fn cents_from_interval(numerator: f64, denominator: f64) -> Result<f64> {
    if denominator == 0.0 {
        return Err(NejiError::Domain {
            numerator,
            denominator,
        });
    }

    let ratio = numerator / denominator;
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(NejiError::Domain {
            numerator,
            denominator,
        });
    }

    Ok(CENTS_PER_OCTAVE * ratio.log2())
}

/// Inverse of [`cents_from_interval`]: the real-valued numerator which, over
/// `denominator`, spans exactly `cents`.
pub fn find_numerator(cents: f64, denominator: f64) -> f64 {
    denominator * 2.0_f64.powf(cents / CENTS_PER_OCTAVE)
}
