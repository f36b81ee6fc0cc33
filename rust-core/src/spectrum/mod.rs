//! Spectral analysis with FFT

pub mod window;
pub mod preprocess;
pub mod fft;
pub mod magnitude;
pub mod analysis;

pub use window::{hanning_window, window_sum, WindowCoefficients, WindowType};
pub use preprocess::{apply_window, condition, condition_with, detrend, ConditionedSignal};
pub use fft::{fft, fft_real, ifft, ComplexValue, FftEngine, TwiddleTable, DEFAULT_PARALLEL_THRESHOLD};
pub use magnitude::{magnitude_spectrum, MagnitudeSpectrum, Spectrum, SpectrumPoint};
pub use analysis::{analyze, AnalysisConfig, SpectrumAnalyzer};
