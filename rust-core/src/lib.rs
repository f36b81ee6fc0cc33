//! Spectral Pipeline - FFT Spectrum Analysis Core
//! 
//! Turns a finite run of real samples into a single-sided amplitude
//! spectrum: detrend, window, radix-2 FFT, magnitude normalization.

pub mod error;
pub mod signal;
pub mod spectrum;

pub use error::{Result, SpectrumError};
pub use signal::Signal;
pub use spectrum::{
    analyze, AnalysisConfig, ComplexValue, FftEngine, MagnitudeSpectrum, SpectrumAnalyzer,
    WindowType,
};
