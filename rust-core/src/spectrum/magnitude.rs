//! Spectrum post-processing
//!
//! Turns raw FFT bins into single-sided physical amplitudes and maps bin
//! indices to Hz.

use log::{trace, warn};

use super::fft::ComplexValue;
use crate::error::{ensure_finite_complex, Result, SpectrumError};

/// Raw N-point FFT output tagged with the originating sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    bins: Vec<ComplexValue>,
    sample_rate: f64,
}

impl Spectrum {
    pub fn new(bins: Vec<ComplexValue>, sample_rate: f64) -> Result<Self> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(SpectrumError::InvalidSampleRate(sample_rate));
        }
        ensure_finite_complex(&bins)?;

        Ok(Self { bins, sample_rate })
    }

    pub fn bins(&self) -> &[ComplexValue] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Bin spacing in Hz (f_s / N), `None` without bins
    pub fn resolution(&self) -> Option<f64> {
        if self.bins.is_empty() {
            None
        } else {
            Some(self.sample_rate / self.bins.len() as f64)
        }
    }

    /// Frequency of bin k in Hz
    pub fn frequency(&self, bin: usize) -> Option<f64> {
        self.resolution().map(|df| bin as f64 * df)
    }

    /// |X[k]|
    pub fn magnitude(&self, bin: usize) -> Option<f64> {
        self.bins.get(bin).map(|c| c.norm())
    }

    /// arg(X[k]) in radians
    pub fn phase(&self, bin: usize) -> Option<f64> {
        self.bins.get(bin).map(|c| c.arg())
    }
}

/// One (frequency, magnitude) pair
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpectrumPoint {
    /// Frequency in Hz
    pub frequency: f64,

    /// Single-sided amplitude
    pub magnitude: f64,
}

/// Single-sided amplitude spectrum, bins 0..=N/2
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MagnitudeSpectrum {
    points: Vec<SpectrumPoint>,
    fft_size: usize,
    sample_rate: f64,
}

impl MagnitudeSpectrum {
    pub fn points(&self) -> &[SpectrumPoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<SpectrumPoint> {
        self.points
    }

    /// Length of the FFT that produced this spectrum
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Number of bins (N/2 + 1)
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Frequency axis in Hz
    pub fn frequencies(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.frequency).collect()
    }

    pub fn magnitudes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.magnitude).collect()
    }

    /// Bin spacing in Hz
    pub fn resolution(&self) -> f64 {
        self.sample_rate / self.fft_size as f64
    }

    /// Strongest non-DC component
    ///
    /// Falls back to the DC bin when it is the only bin.
    pub fn peak(&self) -> Option<SpectrumPoint> {
        let candidates = if self.points.len() > 1 {
            &self.points[1..]
        } else {
            &self.points[..]
        };

        candidates
            .iter()
            .copied()
            .max_by(|a, b| a.magnitude.total_cmp(&b.magnitude))
    }

    /// Magnitudes in dB: 20*log10(|X|/reference)
    ///
    /// # Arguments
    /// * `reference` - Reference level for 0 dB
    pub fn to_db(&self, reference: f64) -> Vec<f64> {
        self.points
            .iter()
            .map(|p| {
                let mag_clamped = p.magnitude.max(1e-10); // Avoid log(0)
                20.0 * (mag_clamped / reference).log10()
            })
            .collect()
    }
}

/// Convert raw FFT bins to a single-sided magnitude spectrum
///
/// For k in 0..=N/2:
/// * `|X[k]| / N`, doubled for every bin except DC and Nyquist
/// * with `correct_window`, additionally multiplied by `N / scale_factor`
///   to restore the amplitude the window removed
///
/// # Arguments
/// * `spectrum` - Raw FFT output
/// * `scale_factor` - Window coefficient sum (or N when unwindowed)
/// * `correct_window` - Apply window energy correction
pub fn magnitude_spectrum(
    spectrum: &Spectrum,
    scale_factor: f64,
    correct_window: bool,
) -> Result<MagnitudeSpectrum> {
    let n = spectrum.len();
    if n == 0 {
        return Err(SpectrumError::EmptySpectrum);
    }

    let norm = if correct_window {
        if !scale_factor.is_finite() || scale_factor <= 0.0 {
            warn!("cannot correct window energy with scale factor {scale_factor}");
            return Err(SpectrumError::InvalidScaleFactor(scale_factor));
        }
        scale_factor
    } else {
        n as f64
    };

    let resolution = spectrum.sample_rate() / n as f64;
    let half = n / 2;
    let points = spectrum.bins()[..=half]
        .iter()
        .enumerate()
        .map(|(k, bin)| {
            let mut magnitude = bin.norm() / norm;
            // DC and Nyquist have no mirrored partner
            if k != 0 && !(n % 2 == 0 && k == half) {
                magnitude *= 2.0;
            }
            SpectrumPoint {
                frequency: k as f64 * resolution,
                magnitude,
            }
        })
        .collect();

    let result = MagnitudeSpectrum {
        points,
        fft_size: n,
        sample_rate: spectrum.sample_rate(),
    };

    if let Some(peak) = result.peak() {
        trace!("peak {:.3} at {:.3} Hz", peak.magnitude, peak.frequency);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::fft::fft_real;
    use approx::assert_abs_diff_eq;
    use realfft::RealFftPlanner;
    use std::f64::consts::PI;

    fn spectrum_of(samples: &[f64], sample_rate: f64) -> Spectrum {
        Spectrum::new(fft_real(samples).unwrap(), sample_rate).unwrap()
    }

    #[test]
    fn test_cosine_peak() {
        let samples: Vec<f64> = (0..8).map(|n| (2.0 * PI * n as f64 / 8.0).cos()).collect();
        let result = magnitude_spectrum(&spectrum_of(&samples, 8.0), 8.0, false).unwrap();

        assert_eq!(result.len(), 5);
        assert_eq!(result.frequencies(), vec![0.0, 1.0, 2.0, 3.0, 4.0]);

        for point in result.points() {
            let expected = if point.frequency == 1.0 { 1.0 } else { 0.0 };
            assert_abs_diff_eq!(point.magnitude, expected, epsilon = 1e-6);
        }

        let peak = result.peak().unwrap();
        assert_eq!(peak.frequency, 1.0);
    }

    #[test]
    fn test_dc_and_nyquist_not_doubled() {
        // 0.5 + 0.25*(-1)^n : DC 0.5, Nyquist 0.25
        let samples: Vec<f64> = (0..16)
            .map(|n| 0.5 + if n % 2 == 0 { 0.25 } else { -0.25 })
            .collect();
        let result = magnitude_spectrum(&spectrum_of(&samples, 16.0), 16.0, false).unwrap();
        let mags = result.magnitudes();

        assert_abs_diff_eq!(mags[0], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(mags[8], 0.25, epsilon = 1e-12);
        assert!(mags[1..8].iter().all(|&m| m < 1e-12));
    }

    #[test]
    fn test_window_correction_formula() {
        let samples: Vec<f64> = (0..32).map(|n| (n as f64 * 0.7).sin()).collect();
        let spectrum = spectrum_of(&samples, 32.0);
        let scale = 13.5;

        let corrected = magnitude_spectrum(&spectrum, scale, true).unwrap();
        let plain = magnitude_spectrum(&spectrum, scale, false).unwrap();

        for (k, (c, p)) in corrected.points().iter().zip(plain.points()).enumerate() {
            let raw = spectrum.magnitude(k).unwrap();
            let fold = if k == 0 || k == 16 { 1.0 } else { 2.0 };
            assert_abs_diff_eq!(c.magnitude, raw / scale * fold, epsilon = 1e-12);
            assert_abs_diff_eq!(c.magnitude, p.magnitude * 32.0 / scale, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_matches_realfft_magnitudes() {
        let n = 256;
        let samples: Vec<f64> = (0..n)
            .map(|i| (i as f64 * 0.31).sin() + 0.2 * (i as f64 * 1.7).cos())
            .collect();

        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(n);
        let mut input = samples.clone();
        let mut output = r2c.make_output_vec();
        r2c.process(&mut input, &mut output).unwrap();

        let spectrum = spectrum_of(&samples, 1000.0);
        for (k, reference) in output.iter().enumerate() {
            assert_abs_diff_eq!(spectrum.magnitude(k).unwrap(), reference.norm(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_frequency_mapping() {
        let spectrum = spectrum_of(&[0.0; 1024], 48000.0);
        let result = magnitude_spectrum(&spectrum, 1024.0, false).unwrap();

        assert_eq!(result.len(), 513);
        assert_eq!(result.frequencies()[0], 0.0);
        assert_abs_diff_eq!(result.frequencies()[512], 24000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.resolution(), 46.875, epsilon = 1e-12);
    }

    #[test]
    fn test_single_bin() {
        let spectrum = spectrum_of(&[3.0], 10.0);
        let result = magnitude_spectrum(&spectrum, 1.0, true).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.points()[0].magnitude, 3.0);
        assert_eq!(result.peak().unwrap().frequency, 0.0);
    }

    #[test]
    fn test_empty_spectrum() {
        let spectrum = Spectrum::new(Vec::new(), 8.0).unwrap();
        assert_eq!(
            magnitude_spectrum(&spectrum, 1.0, false),
            Err(SpectrumError::EmptySpectrum)
        );
        assert_eq!(spectrum.resolution(), None);
        assert_eq!(spectrum.frequency(0), None);
    }

    #[test]
    fn test_non_finite_bins_rejected() {
        let bins = vec![ComplexValue::new(f64::NAN, 0.0), ComplexValue::new(1.0, 0.0)];
        assert!(matches!(
            Spectrum::new(bins, 2.0),
            Err(SpectrumError::NonFiniteValue { index: 0, .. })
        ));

        let bins = vec![ComplexValue::new(1.0, 0.0), ComplexValue::new(0.0, f64::INFINITY)];
        assert_eq!(
            Spectrum::new(bins, 2.0),
            Err(SpectrumError::NonFiniteValue {
                index: 1,
                value: f64::INFINITY
            })
        );
    }

    #[test]
    fn test_bin_frequencies() {
        let spectrum = spectrum_of(&[0.0; 8], 400.0);
        assert_eq!(spectrum.resolution(), Some(50.0));
        assert_eq!(spectrum.frequency(3), Some(150.0));
    }

    #[test]
    fn test_into_points() {
        let samples: Vec<f64> = (0..4).map(|n| n as f64).collect();
        let result = magnitude_spectrum(&spectrum_of(&samples, 4.0), 4.0, false).unwrap();
        let expected = result.points().to_vec();

        let points = result.into_points();
        assert_eq!(points.len(), 3);
        assert_eq!(points, expected);
        assert_eq!(points[2].frequency, 2.0);
    }

    #[test]
    fn test_invalid_scale_factor() {
        let spectrum = spectrum_of(&[1.0, 1.0], 2.0);
        assert_eq!(
            magnitude_spectrum(&spectrum, 0.0, true),
            Err(SpectrumError::InvalidScaleFactor(0.0))
        );
        // Scale factor ignored without correction
        assert!(magnitude_spectrum(&spectrum, 0.0, false).is_ok());
    }

    #[test]
    fn test_phase() {
        let spectrum = spectrum_of(&[0.0, 1.0, 0.0, -1.0], 4.0);
        // sin at bin 1: X[1] = -2i
        assert_abs_diff_eq!(spectrum.phase(1).unwrap(), -PI / 2.0, epsilon = 1e-12);
        assert_eq!(spectrum.phase(4), None);
    }

    #[test]
    fn test_to_db() {
        let samples: Vec<f64> = vec![1.0; 8];
        let result = magnitude_spectrum(&spectrum_of(&samples, 8.0), 8.0, false).unwrap();
        let db = result.to_db(1.0);

        assert_abs_diff_eq!(db[0], 0.0, epsilon = 1e-9);
        // Empty bins clamp to 1e-10
        assert!(db[1..].iter().all(|&d| d <= -199.0));
    }
}
