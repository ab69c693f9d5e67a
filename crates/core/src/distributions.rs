//! Random sources driving state transitions.
//!
//! Three quantities are drawn fresh on every use:
//!
//! | Source              | Default            | Clamp    |
//! |---------------------|--------------------|----------|
//! | Recovery duration   | Normal(14, 1)      | none     |
//! | Exposure threshold  | Normal(0.97, 0.1)  | `[0, 1]` |
//! | Incubation duration | Normal(9, 2)       | none     |
//!
//! Durations are in simulation steps. Every source is a [`Sampler`] drawing
//! from a generator passed in by the caller, so one seeded generator can
//! drive a whole simulation.

use rand::RngCore;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors building a distribution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistributionError {
    /// Mean is not finite, or standard deviation is negative or not finite.
    #[error("invalid {source_name} distribution: mean {mean}, standard deviation {std_dev}")]
    InvalidParams {
        source_name: &'static str,
        mean: f64,
        std_dev: f64,
    },

    /// Clamp bounds are NaN or inverted.
    #[error("invalid clamp range [{low}, {high}]")]
    InvalidClamp { low: f64, high: f64 },
}

/// A source of single floating-point samples.
pub trait Sampler {
    /// Draw one sample using `rng`.
    fn sample(&self, rng: &mut dyn RngCore) -> f64;
}

/// Mean and standard deviation of a normal distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalParams {
    pub mean: f64,
    pub std_dev: f64,
}

impl NormalParams {
    /// Create new parameters.
    pub const fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }

    fn validate(&self, source_name: &'static str) -> Result<(), DistributionError> {
        if self.mean.is_finite() && self.std_dev.is_finite() && self.std_dev >= 0.0 {
            Ok(())
        } else {
            Err(DistributionError::InvalidParams {
                source_name,
                mean: self.mean,
                std_dev: self.std_dev,
            })
        }
    }
}

/// Normal distribution, optionally clamped to a closed interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalSampler {
    params: NormalParams,
    clamp: Option<(f64, f64)>,
}

impl NormalSampler {
    /// Create an unclamped normal sampler.
    pub fn new(params: NormalParams) -> Result<Self, DistributionError> {
        params.validate("normal")?;
        Ok(Self {
            params,
            clamp: None,
        })
    }

    /// Clamp every sample to `[low, high]`.
    ///
    /// Fails if either bound is NaN or `low > high`.
    pub fn clamped(mut self, low: f64, high: f64) -> Result<Self, DistributionError> {
        if low.is_nan() || high.is_nan() || low > high {
            return Err(DistributionError::InvalidClamp { low, high });
        }
        self.clamp = Some((low, high));
        Ok(self)
    }

    /// Distribution parameters.
    pub fn params(&self) -> NormalParams {
        self.params
    }
}

impl Sampler for NormalSampler {
    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        let z: f64 = StandardNormal.sample(rng);
        let x = self.params.mean + self.params.std_dev * z;
        match self.clamp {
            Some((low, high)) => x.clamp(low, high),
            None => x,
        }
    }
}

/// Always returns the same value. Does not touch the generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantSampler(pub f64);

impl Sampler for ConstantSampler {
    fn sample(&self, _rng: &mut dyn RngCore) -> f64 {
        self.0
    }
}

/// Sampler backed by an arbitrary function of the generator.
pub struct FnSampler<F>(pub F);

impl<F> Sampler for FnSampler<F>
where
    F: Fn(&mut dyn RngCore) -> f64,
{
    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        (self.0)(rng)
    }
}

/// Parameters of the three transition distributions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionConfig {
    /// Steps an infected node stays infected.
    pub recovery: NormalParams,
    /// Exposure probability a susceptible node must reach. Clamped to `[0, 1]`.
    pub exposure_threshold: NormalParams,
    /// Steps an exposed node stays exposed.
    pub incubation: NormalParams,
}

impl DistributionConfig {
    pub const DEFAULT_RECOVERY: NormalParams = NormalParams::new(14.0, 1.0);
    pub const DEFAULT_EXPOSURE_THRESHOLD: NormalParams = NormalParams::new(0.97, 0.1);
    pub const DEFAULT_INCUBATION: NormalParams = NormalParams::new(9.0, 2.0);

    /// Set the recovery duration distribution.
    pub fn with_recovery(mut self, mean: f64, std_dev: f64) -> Self {
        self.recovery = NormalParams::new(mean, std_dev);
        self
    }

    /// Set the exposure threshold distribution.
    pub fn with_exposure_threshold(mut self, mean: f64, std_dev: f64) -> Self {
        self.exposure_threshold = NormalParams::new(mean, std_dev);
        self
    }

    /// Set the incubation duration distribution.
    pub fn with_incubation(mut self, mean: f64, std_dev: f64) -> Self {
        self.incubation = NormalParams::new(mean, std_dev);
        self
    }

    /// Check every parameter set.
    pub fn validate(&self) -> Result<(), DistributionError> {
        self.recovery.validate("recovery")?;
        self.exposure_threshold.validate("exposure threshold")?;
        self.incubation.validate("incubation")?;
        Ok(())
    }

    /// Build the samplers.
    pub fn build(&self) -> Result<Distributions, DistributionError> {
        self.validate()?;
        Ok(Distributions::from_valid(self))
    }
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            recovery: Self::DEFAULT_RECOVERY,
            exposure_threshold: Self::DEFAULT_EXPOSURE_THRESHOLD,
            incubation: Self::DEFAULT_INCUBATION,
        }
    }
}

/// The three samplers consulted by the transition rule.
pub struct Distributions {
    recovery: Box<dyn Sampler>,
    exposure_threshold: Box<dyn Sampler>,
    incubation: Box<dyn Sampler>,
}

impl Distributions {
    fn from_valid(config: &DistributionConfig) -> Self {
        Self {
            recovery: Box::new(NormalSampler {
                params: config.recovery,
                clamp: None,
            }),
            exposure_threshold: Box::new(NormalSampler {
                params: config.exposure_threshold,
                clamp: Some((0.0, 1.0)),
            }),
            incubation: Box::new(NormalSampler {
                params: config.incubation,
                clamp: None,
            }),
        }
    }

    /// Replace the recovery duration sampler.
    pub fn with_recovery(mut self, sampler: impl Sampler + 'static) -> Self {
        self.recovery = Box::new(sampler);
        self
    }

    /// Replace the exposure threshold sampler.
    pub fn with_exposure_threshold(mut self, sampler: impl Sampler + 'static) -> Self {
        self.exposure_threshold = Box::new(sampler);
        self
    }

    /// Replace the incubation duration sampler.
    pub fn with_incubation(mut self, sampler: impl Sampler + 'static) -> Self {
        self.incubation = Box::new(sampler);
        self
    }

    /// Draw a recovery duration.
    pub fn sample_recovery(&self, rng: &mut dyn RngCore) -> f64 {
        self.recovery.sample(rng)
    }

    /// Draw an exposure threshold.
    pub fn sample_exposure_threshold(&self, rng: &mut dyn RngCore) -> f64 {
        self.exposure_threshold.sample(rng)
    }

    /// Draw an incubation duration.
    pub fn sample_incubation(&self, rng: &mut dyn RngCore) -> f64 {
        self.incubation.sample(rng)
    }
}

impl Default for Distributions {
    fn default() -> Self {
        Self::from_valid(&DistributionConfig::default())
    }
}

impl fmt::Debug for Distributions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Distributions").finish_non_exhaustive()
    }
}
