//! Probability algebra and random sources for contact-network simulation.
//!
//! This crate has no notion of graphs or node state. It provides:
//!
//! - **Probability combinator**: [`joint_probability`] and
//!   [`union_probability`] for independent events
//! - **Distribution sampler**: the recovery, exposure-threshold and
//!   incubation sources behind the [`Sampler`] trait, configured through
//!   [`DistributionConfig`]

pub mod distributions;
pub mod probability;

pub use distributions::{
    ConstantSampler, DistributionConfig, DistributionError, Distributions, FnSampler,
    NormalParams, NormalSampler, Sampler,
};
pub use probability::{
    exposure_probability, inclusion_exclusion, joint_probability, try_union_probability,
    union_probability, ProbabilityError, MAX_INCLUSION_EXCLUSION_TERMS,
};
