//! Time-domain signal container
//!
//! A signal is an ordered run of real samples tagged with its sample rate.
//! Stages never mutate a signal; they derive a new one.

use crate::error::{ensure_finite, Result, SpectrumError};

/// Real-valued, uniformly sampled signal
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    samples: Vec<f64>,
    sample_rate: f64,
}

impl Signal {
    /// Create a signal after validating its contents
    ///
    /// # Arguments
    /// * `samples` - Time-domain samples x[n] (may be empty)
    /// * `sample_rate` - Sample rate in Hz (finite, > 0)
    pub fn new(samples: Vec<f64>, sample_rate: f64) -> Result<Self> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(SpectrumError::InvalidSampleRate(sample_rate));
        }
        ensure_finite(&samples)?;

        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Derive a signal with new samples and the same sample rate
    pub(crate) fn derive(&self, samples: Vec<f64>) -> Self {
        Self {
            samples,
            sample_rate: self.sample_rate,
        }
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }

    /// Get sample rate in Hz
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Arithmetic mean of the samples, `None` for an empty signal
    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            None
        } else {
            Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
        }
    }

    /// Signal duration in seconds
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate
    }
}
