//! Signal conditioning ahead of the FFT
//!
//! Detrending removes the DC offset; windowing tapers the edges to reduce
//! leakage. Detrend always runs before the window, otherwise the tapered
//! offset leaks into the low bins.

use log::trace;

use super::window::{WindowCoefficients, WindowType};
use crate::error::{Result, SpectrumError};
use crate::signal::Signal;

/// Conditioned signal plus the scale factor the magnitude stage needs
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionedSignal {
    /// Detrended and/or windowed signal
    pub signal: Signal,

    /// Window coefficient sum, or N when no window was applied
    pub window_sum: f64,
}

/// Subtract the mean from every sample
///
/// # Returns
/// New signal x[n] - μ with the same length and sample rate
pub fn detrend(signal: &Signal) -> Result<Signal> {
    let mean = signal.mean().ok_or(SpectrumError::EmptySignal)?;
    trace!("detrend: removing mean {mean:e} from {} samples", signal.len());

    Ok(signal.derive(signal.samples().iter().map(|&x| x - mean).collect()))
}

/// Multiply the signal by window coefficients element-wise
pub fn apply_window(signal: &Signal, window: &WindowCoefficients) -> Result<Signal> {
    if signal.len() != window.len() {
        return Err(SpectrumError::LengthMismatch {
            expected: signal.len(),
            actual: window.len(),
        });
    }

    Ok(signal.derive(
        signal
            .samples()
            .iter()
            .zip(window.coefficients().iter())
            .map(|(&s, &w)| s * w)
            .collect(),
    ))
}

/// Detrend and/or apply a Hann window
///
/// # Arguments
/// * `signal` - Raw input signal
/// * `detrend_enabled` - Remove the mean first
/// * `window_enabled` - Apply a Hann window afterwards
pub fn condition(
    signal: &Signal,
    detrend_enabled: bool,
    window_enabled: bool,
) -> Result<ConditionedSignal> {
    let window_type = window_enabled.then_some(WindowType::Hann);
    condition_with(signal, detrend_enabled, window_type)
}

/// Detrend and/or apply an arbitrary window
///
/// `window_type = None` skips windowing and reports N as the window sum,
/// which leaves amplitude normalization untouched downstream.
pub fn condition_with(
    signal: &Signal,
    detrend_enabled: bool,
    window_type: Option<WindowType>,
) -> Result<ConditionedSignal> {
    if signal.is_empty() {
        return Err(SpectrumError::EmptySignal);
    }

    let detrended = if detrend_enabled {
        detrend(signal)?
    } else {
        signal.clone()
    };

    match window_type {
        Some(window_type) => {
            let window = window_type.generate(detrended.len())?;
            trace!("{window_type:?} window sum = {}", window.sum());
            Ok(ConditionedSignal {
                signal: apply_window(&detrended, &window)?,
                window_sum: window.sum(),
            })
        }
        None => Ok(ConditionedSignal {
            window_sum: detrended.len() as f64,
            signal: detrended,
        }),
    }
}
