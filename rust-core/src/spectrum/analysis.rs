//! High-level spectrum analyzer
//!
//! Chains conditioning, FFT and magnitude post-processing into one call.

use log::debug;

use super::fft::{validate_length, ComplexValue, FftEngine, DEFAULT_PARALLEL_THRESHOLD};
use super::magnitude::{magnitude_spectrum, MagnitudeSpectrum, Spectrum};
use super::preprocess::condition_with;
use super::window::WindowType;
use crate::error::Result;
use crate::signal::Signal;

/// Spectrum analyzer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnalysisConfig {
    /// Remove the mean before windowing
    pub detrend: bool,

    /// Taper the signal and correct magnitudes for the window's energy loss
    pub window: bool,

    /// Window shape used when `window` is set
    pub window_type: WindowType,

    /// FFT sub-transform length at which recursion goes parallel
    pub parallel_threshold: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            detrend: true,
            window: true,
            window_type: WindowType::Hann,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl AnalysisConfig {
    /// Plain FFT magnitudes: no detrend, no window
    pub fn raw() -> Self {
        Self {
            detrend: false,
            window: false,
            ..Self::default()
        }
    }
}

/// Spectrum analyzer
///
/// Holds only configuration; every call is independent.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpectrumAnalyzer {
    config: AnalysisConfig,
    engine: FftEngine,
}

impl SpectrumAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            engine: FftEngine::with_parallel_threshold(config.parallel_threshold),
        }
    }

    /// Analyze signal and return its single-sided magnitude spectrum
    ///
    /// # Arguments
    /// * `signal` - Input signal, length must be a power of two
    ///
    /// # Returns
    /// (frequency, magnitude) pairs for bins 0..=N/2
    pub fn analyze(&self, signal: &Signal) -> Result<MagnitudeSpectrum> {
        // Reject bad lengths before doing any work
        validate_length(signal.len())?;

        debug!(
            "analyze: n = {}, fs = {} Hz, detrend = {}, window = {}",
            signal.len(),
            signal.sample_rate(),
            self.config.detrend,
            self.config.window
        );

        let window_type = self.config.window.then_some(self.config.window_type);
        let conditioned = condition_with(signal, self.config.detrend, window_type)?;

        let input: Vec<ComplexValue> = conditioned
            .signal
            .samples()
            .iter()
            .map(|&x| ComplexValue::new(x, 0.0))
            .collect();
        let bins = self.engine.fft(&input)?;
        let spectrum = Spectrum::new(bins, signal.sample_rate())?;

        magnitude_spectrum(&spectrum, conditioned.window_sum, self.config.window)
    }

    /// Analyze and return magnitude in dB
    ///
    /// # Arguments
    /// * `signal` - Input signal
    /// * `reference` - Reference level for 0 dB
    pub fn analyze_db(&self, signal: &Signal, reference: f64) -> Result<Vec<f64>> {
        Ok(self.analyze(signal)?.to_db(reference))
    }

    /// Get current configuration
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }
}

/// Analyze a signal with the given configuration
pub fn analyze(signal: &Signal, config: AnalysisConfig) -> Result<MagnitudeSpectrum> {
    SpectrumAnalyzer::new(config).analyze(signal)
}
