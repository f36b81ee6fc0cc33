//! Window functions for spectral analysis
//!
//! Tapering windows reduce spectral leakage; their coefficient sum is kept
//! alongside so the magnitude stage can undo the lost energy.

use std::f64::consts::PI;

use crate::error::{Result, SpectrumError};

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WindowType {
    /// Hann window: w[n] = 0.5 - 0.5*cos(2πn/(N-1))
    /// Sidelobe attenuation: ~31 dB (first sidelobe)
    #[default]
    Hann,

    /// Hamming window: w[n] = 0.54 - 0.46*cos(2πn/(N-1))
    Hamming,

    /// Blackman window: w[n] = 0.42 - 0.5*cos(2πn/(N-1)) + 0.08*cos(4πn/(N-1))
    Blackman,

    /// Rectangular window (no tapering)
    Rectangular,
}

impl WindowType {
    /// Generate window coefficients
    ///
    /// # Arguments
    /// * `length` - Number of samples (N >= 1)
    ///
    /// # Returns
    /// Coefficients w[n] for n = 0..N-1 together with their sum.
    /// A single-sample window is always `[1.0]`.
    pub fn generate(&self, length: usize) -> Result<WindowCoefficients> {
        if length == 0 {
            return Err(SpectrumError::InvalidLength {
                len: 0,
                reason: "window length must be at least 1",
            });
        }

        if length == 1 {
            return Ok(WindowCoefficients::from_vec(vec![1.0]));
        }

        let span = (length - 1) as f64;
        let coefficients = (0..length)
            .map(|n| {
                let angle = 2.0 * PI * n as f64 / span;
                let w = match self {
                    WindowType::Hann => 0.5 * (1.0 - angle.cos()),
                    WindowType::Hamming => 0.54 - 0.46 * angle.cos(),
                    WindowType::Blackman => {
                        0.42 - 0.5 * angle.cos() + 0.08 * (2.0 * angle).cos()
                    }
                    WindowType::Rectangular => 1.0,
                };
                // Rounding can push endpoints a hair outside [0, 1]
                w.clamp(0.0, 1.0)
            })
            .collect();

        Ok(WindowCoefficients::from_vec(coefficients))
    }
}

/// Window coefficients paired with their sum
#[derive(Debug, Clone, PartialEq)]
pub struct WindowCoefficients {
    coefficients: Vec<f64>,
    sum: f64,
}

impl WindowCoefficients {
    fn from_vec(coefficients: Vec<f64>) -> Self {
        let sum = window_sum(&coefficients);
        Self { coefficients, sum }
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Sum of all coefficients (Σ w[n])
    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }
}

/// Hanning window of length N
pub fn hanning_window(length: usize) -> Result<WindowCoefficients> {
    WindowType::Hann.generate(length)
}

/// Arithmetic sum of window coefficients
pub fn window_sum(coefficients: &[f64]) -> f64 {
    coefficients.iter().sum()
}
