//! Error types shared by every pipeline stage

use num_complex::Complex64;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpectrumError {
    #[error("Invalid length {len}: {reason}")]
    InvalidLength { len: usize, reason: &'static str },

    #[error("Signal contains no samples")]
    EmptySignal,

    #[error("Spectrum contains no bins")]
    EmptySpectrum,

    #[error("Length mismatch: expected {expected} elements, found {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Non-finite value {value} at index {index}")]
    NonFiniteValue { index: usize, value: f64 },

    #[error("Sample rate must be finite and positive (found: {0} Hz)")]
    InvalidSampleRate(f64),

    /// Only reachable with window correction enabled. In practice this means a
    /// Hann window of length 2, whose coefficients are both zero.
    #[error("Window correction scale factor must be finite and positive (found: {0})")]
    InvalidScaleFactor(f64),
}

pub type Result<T> = std::result::Result<T, SpectrumError>;

/// Reject the first NaN or infinite sample
pub(crate) fn ensure_finite(samples: &[f64]) -> Result<()> {
    match samples.iter().position(|s| !s.is_finite()) {
        Some(index) => Err(SpectrumError::NonFiniteValue {
            index,
            value: samples[index],
        }),
        None => Ok(()),
    }
}

/// Reject the first complex value with a NaN or infinite part
pub(crate) fn ensure_finite_complex(values: &[Complex64]) -> Result<()> {
    for (index, c) in values.iter().enumerate() {
        if !c.re.is_finite() {
            return Err(SpectrumError::NonFiniteValue { index, value: c.re });
        }
        if !c.im.is_finite() {
            return Err(SpectrumError::NonFiniteValue { index, value: c.im });
        }
    }
    Ok(())
}
