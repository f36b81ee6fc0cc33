//! Recursive radix-2 Cooley-Tukey FFT
//!
//! Splits the input into even and odd samples, transforms both halves and
//! recombines them with butterflies. Large sub-transforms evaluate their two
//! halves concurrently when the `parallel` feature is enabled.

use std::f64::consts::PI;

use log::debug;
use num_complex::Complex64;

use crate::error::{ensure_finite_complex, Result, SpectrumError};

/// Complex sample / bin value
pub type ComplexValue = Complex64;

/// Sub-transforms at least this long split across threads
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

/// Precomputed twiddle factors e^{-i2πk/N} for k = 0..N/2
///
/// Built once per transform length and handed to
/// [`FftEngine::fft_with_twiddles`]; nothing is cached globally.
#[derive(Debug, Clone, PartialEq)]
pub struct TwiddleTable {
    size: usize,
    factors: Vec<ComplexValue>,
}

impl TwiddleTable {
    /// Build a table for transforms of length `size` (power of two)
    pub fn new(size: usize) -> Result<Self> {
        validate_length(size)?;

        let factors = (0..size / 2)
            .map(|k| twiddle(k, size))
            .collect();

        Ok(Self { size, factors })
    }

    /// Transform length this table serves
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn factors(&self) -> &[ComplexValue] {
        &self.factors
    }
}

/// Source of twiddle factors during recursion
#[derive(Debug, Clone, Copy)]
enum Twiddles<'a> {
    Direct,
    Table {
        factors: &'a [ComplexValue],
        stride: usize,
    },
}

impl Twiddles<'_> {
    /// W_n^k for a sub-transform of length n
    fn factor(&self, k: usize, n: usize) -> ComplexValue {
        match self {
            Twiddles::Direct => twiddle(k, n),
            // W_n^k == W_N^(k * N/n)
            Twiddles::Table { factors, stride } => factors[k * stride],
        }
    }

    fn halved(self) -> Self {
        match self {
            Twiddles::Direct => Twiddles::Direct,
            Twiddles::Table { factors, stride } => Twiddles::Table {
                factors,
                stride: stride * 2,
            },
        }
    }
}

/// Stateless FFT engine
///
/// Only carries the tuning knob deciding when recursion goes parallel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FftEngine {
    parallel_threshold: usize,
}

impl Default for FftEngine {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl FftEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create engine with a custom parallel threshold
    ///
    /// # Arguments
    /// * `parallel_threshold` - Minimum sub-transform length evaluated with
    ///   both halves in parallel. `usize::MAX` keeps everything sequential.
    pub fn with_parallel_threshold(parallel_threshold: usize) -> Self {
        Self { parallel_threshold }
    }

    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// Forward FFT
    ///
    /// # Arguments
    /// * `input` - Complex sequence, length must be a power of two
    ///
    /// # Returns
    /// N-point spectrum X[k] = Σ x[n]·e^{-i2πkn/N}
    pub fn fft(&self, input: &[ComplexValue]) -> Result<Vec<ComplexValue>> {
        validate_input(input)?;
        self.log_call(input.len());
        Ok(self.transform(input, Twiddles::Direct))
    }

    /// Forward FFT using precomputed twiddle factors
    pub fn fft_with_twiddles(
        &self,
        input: &[ComplexValue],
        table: &TwiddleTable,
    ) -> Result<Vec<ComplexValue>> {
        validate_input(input)?;
        if table.size() != input.len() {
            return Err(SpectrumError::LengthMismatch {
                expected: input.len(),
                actual: table.size(),
            });
        }
        self.log_call(input.len());

        let twiddles = Twiddles::Table {
            factors: table.factors(),
            stride: 1,
        };
        Ok(self.transform(input, twiddles))
    }

    /// Forward FFT of a real signal (imaginary parts zero)
    pub fn fft_real(&self, samples: &[f64]) -> Result<Vec<ComplexValue>> {
        let input: Vec<ComplexValue> = samples
            .iter()
            .map(|&x| ComplexValue::new(x, 0.0))
            .collect();
        self.fft(&input)
    }

    /// Inverse FFT, x[n] = (1/N)·Σ X[k]·e^{i2πkn/N}
    pub fn ifft(&self, spectrum: &[ComplexValue]) -> Result<Vec<ComplexValue>> {
        let conjugated: Vec<ComplexValue> = spectrum.iter().map(|c| c.conj()).collect();
        let scale = 1.0 / spectrum.len() as f64;

        Ok(self
            .fft(&conjugated)?
            .into_iter()
            .map(|c| c.conj() * scale)
            .collect())
    }

    fn log_call(&self, n: usize) {
        let mode = if cfg!(feature = "parallel") && n >= self.parallel_threshold {
            "parallel"
        } else {
            "sequential"
        };
        debug!("fft: n = {n}, {mode}");
    }

    fn transform(&self, input: &[ComplexValue], twiddles: Twiddles<'_>) -> Vec<ComplexValue> {
        let n = input.len();
        if n == 1 {
            return input.to_vec();
        }

        let even: Vec<ComplexValue> = input.iter().step_by(2).copied().collect();
        let odd: Vec<ComplexValue> = input.iter().skip(1).step_by(2).copied().collect();

        let half_twiddles = twiddles.halved();
        let (even_spectrum, odd_spectrum) = self.transform_halves(&even, &odd, half_twiddles);

        let half = n / 2;
        let mut output = vec![ComplexValue::new(0.0, 0.0); n];
        for k in 0..half {
            let t = twiddles.factor(k, n) * odd_spectrum[k];
            output[k] = even_spectrum[k] + t;
            output[k + half] = even_spectrum[k] - t;
        }

        output
    }

    #[cfg(feature = "parallel")]
    fn transform_halves(
        &self,
        even: &[ComplexValue],
        odd: &[ComplexValue],
        twiddles: Twiddles<'_>,
    ) -> (Vec<ComplexValue>, Vec<ComplexValue>) {
        // Parent length is twice the half length
        if even.len() * 2 >= self.parallel_threshold {
            rayon::join(
                || self.transform(even, twiddles),
                || self.transform(odd, twiddles),
            )
        } else {
            (self.transform(even, twiddles), self.transform(odd, twiddles))
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn transform_halves(
        &self,
        even: &[ComplexValue],
        odd: &[ComplexValue],
        twiddles: Twiddles<'_>,
    ) -> (Vec<ComplexValue>, Vec<ComplexValue>) {
        (self.transform(even, twiddles), self.transform(odd, twiddles))
    }
}

/// Forward FFT with the default engine
pub fn fft(input: &[ComplexValue]) -> Result<Vec<ComplexValue>> {
    FftEngine::default().fft(input)
}

/// Inverse FFT with the default engine
pub fn ifft(spectrum: &[ComplexValue]) -> Result<Vec<ComplexValue>> {
    FftEngine::default().ifft(spectrum)
}

/// Forward FFT of real samples with the default engine
pub fn fft_real(samples: &[f64]) -> Result<Vec<ComplexValue>> {
    FftEngine::default().fft_real(samples)
}

/// e^{-i2πk/n}
fn twiddle(k: usize, n: usize) -> ComplexValue {
    let angle = -2.0 * PI * k as f64 / n as f64;
    ComplexValue::new(angle.cos(), angle.sin())
}

pub(crate) fn validate_length(n: usize) -> Result<()> {
    if n == 0 {
        return Err(SpectrumError::InvalidLength {
            len: 0,
            reason: "FFT length must be at least 1",
        });
    }
    if !n.is_power_of_two() {
        return Err(SpectrumError::InvalidLength {
            len: n,
            reason: "FFT length must be a power of two",
        });
    }
    Ok(())
}

fn validate_input(input: &[ComplexValue]) -> Result<()> {
    validate_length(input.len())?;
    ensure_finite_complex(input)
}
