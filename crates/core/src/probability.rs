//! Probability algebra for independent events.
//!
//! The simulator folds the exposure probabilities contributed by each
//! contagious neighbor of a susceptible node into a single probability that
//! at least one of them transmits. Events are assumed independent.

use thiserror::Error;

/// Largest input [`inclusion_exclusion`] accepts. The expansion sums
/// `2^n - 1` subset products.
pub const MAX_INCLUSION_EXCLUSION_TERMS: usize = 20;

/// Errors from the checked probability routines.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProbabilityError {
    /// A value is not a probability (outside `[0, 1]`, or NaN).
    #[error("value {value} at index {index} is not a probability")]
    OutOfDomain { index: usize, value: f64 },

    /// Too many events for the subset expansion.
    #[error(
        "inclusion-exclusion over {0} events exceeds the limit of {max}",
        max = MAX_INCLUSION_EXCLUSION_TERMS
    )]
    TooManyTerms(usize),
}

/// Probability that every one of several independent events occurs.
///
/// Returns `1.0` for no events. Inputs are not validated.
pub fn joint_probability(probs: impl IntoIterator<Item = f64>) -> f64 {
    probs.into_iter().product()
}

/// Probability that at least one of several independent events occurs.
///
/// Computed as the complement of no event occurring,
/// `1 - Π(1 - p)`, which equals the inclusion-exclusion expansion without
/// its exponential term count or cancellation error. Returns `0.0` for no
/// events. Inputs are not validated; see [`try_union_probability`].
pub fn union_probability(probs: impl IntoIterator<Item = f64>) -> f64 {
    1.0 - joint_probability(probs.into_iter().map(|p| 1.0 - p))
}

/// Probability that a contact with per-step transmission probability
/// `weight` has transmitted at least once over `steps` steps:
/// `1 - (1 - weight)^steps`.
///
/// Zero steps give zero probability, whatever the weight.
pub fn exposure_probability(weight: f64, steps: u64) -> f64 {
    1.0 - (1.0 - weight).powf(steps as f64)
}

/// [`union_probability`] that rejects values outside `[0, 1]`.
pub fn try_union_probability(probs: &[f64]) -> Result<f64, ProbabilityError> {
    validate(probs)?;
    Ok(union_probability(probs.iter().copied()))
}

/// Union probability by explicit inclusion-exclusion:
/// `Σ_k (-1)^(k+1) Σ_{|S|=k} Π_{i∈S} p_i`.
///
/// Exponential in `probs.len()`; only meant for checking
/// [`union_probability`] on small inputs.
pub fn inclusion_exclusion(probs: &[f64]) -> Result<f64, ProbabilityError> {
    if probs.len() > MAX_INCLUSION_EXCLUSION_TERMS {
        return Err(ProbabilityError::TooManyTerms(probs.len()));
    }
    validate(probs)?;

    let mut total = 0.0;
    for mask in 1u32..(1u32 << probs.len()) {
        let product = joint_probability(
            probs
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, p)| *p),
        );
        if mask.count_ones() % 2 == 1 {
            total += product;
        } else {
            total -= product;
        }
    }
    Ok(total)
}

fn validate(probs: &[f64]) -> Result<(), ProbabilityError> {
    match probs
        .iter()
        .enumerate()
        .find(|(_, p)| !(0.0..=1.0).contains(*p))
    {
        Some((index, &value)) => Err(ProbabilityError::OutOfDomain { index, value }),
        None => Ok(()),
    }
}
