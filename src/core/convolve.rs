//! 2D linear convolution with `full` and `same` output modes.
//!
//! Both a direct summation and an FFT based implementation are provided; the
//! `same` crop is centered with respect to the full output so the two paths
//! agree with each other to floating point precision.

use crate::types::{CslcError, CslcResult};
use ndarray::{s, Array2, ArrayView2};
use num_complex::{Complex32, Complex64};
use num_traits::Zero;
use rustfft::FftPlanner;
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Relative cost of one FFT butterfly compared to one multiply-add of the
/// direct sum. Three transforms and a spectral product are charged per call.
const FFT_COST_FACTOR: f64 = 4.0;

/// Output extent of a convolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvolveMode {
    /// Every lag with any overlap: `(r1 + r2 - 1, c1 + c2 - 1)`
    Full,
    /// Shape of the first operand, centered with respect to `Full`
    Same,
}

impl ConvolveMode {
    /// Output shape for an image of `image_dim` convolved with `kernel_dim`
    pub fn output_dim(&self, image_dim: (usize, usize), kernel_dim: (usize, usize)) -> (usize, usize) {
        match self {
            ConvolveMode::Full => (
                image_dim.0 + kernel_dim.0 - 1,
                image_dim.1 + kernel_dim.1 - 1,
            ),
            ConvolveMode::Same => image_dim,
        }
    }

    /// Offset of the output window inside the full convolution
    fn crop_offset(&self, kernel_dim: (usize, usize)) -> (usize, usize) {
        match self {
            ConvolveMode::Full => (0, 0),
            ConvolveMode::Same => ((kernel_dim.0 - 1) / 2, (kernel_dim.1 - 1) / 2),
        }
    }
}

/// Algorithm used to evaluate the convolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvolveMethod {
    /// Explicit sum over the kernel support
    Direct,
    /// Zero padded spectral product
    Fft,
    /// Pick whichever is cheaper for the operand sizes
    #[default]
    Auto,
}

impl ConvolveMethod {
    /// Resolve `Auto` into a concrete method for the given operand sizes
    pub fn resolve(
        &self,
        image_dim: (usize, usize),
        kernel_dim: (usize, usize),
        mode: ConvolveMode,
    ) -> ConvolveMethod {
        match self {
            ConvolveMethod::Auto => {
                let (out_rows, out_cols) = mode.output_dim(image_dim, kernel_dim);
                let direct_cost =
                    (out_rows * out_cols) as f64 * (kernel_dim.0 * kernel_dim.1) as f64;

                let padded = ((image_dim.0 + kernel_dim.0 - 1) * (image_dim.1 + kernel_dim.1 - 1)) as f64;
                let fft_cost = FFT_COST_FACTOR * 3.0 * padded * padded.log2().max(1.0);

                if fft_cost < direct_cost {
                    ConvolveMethod::Fft
                } else {
                    ConvolveMethod::Direct
                }
            }
            concrete => *concrete,
        }
    }
}

/// Sample types that can be convolved with real-valued weights
pub trait ConvElement: Copy + Zero + AddAssign {
    /// Multiply by a real weight
    fn scaled(self, weight: f64) -> Self;
    /// Widen to double precision complex for the spectral path
    fn to_complex(self) -> Complex64;
    /// Narrow back from the spectral path; real types keep the real part
    fn from_complex(value: Complex64) -> Self;
}

impl ConvElement for f32 {
    fn scaled(self, weight: f64) -> Self {
        self * weight as f32
    }

    fn to_complex(self) -> Complex64 {
        Complex64::new(self as f64, 0.0)
    }

    fn from_complex(value: Complex64) -> Self {
        value.re as f32
    }
}

impl ConvElement for f64 {
    fn scaled(self, weight: f64) -> Self {
        self * weight
    }

    fn to_complex(self) -> Complex64 {
        Complex64::new(self, 0.0)
    }

    fn from_complex(value: Complex64) -> Self {
        value.re
    }
}

impl ConvElement for Complex32 {
    fn scaled(self, weight: f64) -> Self {
        self * weight as f32
    }

    fn to_complex(self) -> Complex64 {
        Complex64::new(self.re as f64, self.im as f64)
    }

    fn from_complex(value: Complex64) -> Self {
        Complex32::new(value.re as f32, value.im as f32)
    }
}

impl ConvElement for Complex64 {
    fn scaled(self, weight: f64) -> Self {
        self * weight
    }

    fn to_complex(self) -> Complex64 {
        self
    }

    fn from_complex(value: Complex64) -> Self {
        value
    }
}

/// Perform 2D linear convolution of `image` with `kernel`
///
/// # Arguments
/// * `image` - First operand; in `Same` mode the output has its shape
/// * `kernel` - Real-valued weights
/// * `mode` - Output extent
/// * `method` - Evaluation algorithm (`Auto` picks by operation count)
///
/// # Returns
/// * Freshly allocated convolution result
pub fn convolve2d<T, W>(
    image: &ArrayView2<T>,
    kernel: &ArrayView2<W>,
    mode: ConvolveMode,
    method: ConvolveMethod,
) -> CslcResult<Array2<T>>
where
    T: ConvElement,
    W: Copy + Into<f64>,
{
    if image.is_empty() {
        return Err(CslcError::EmptyInput(format!(
            "cannot convolve an image of shape {:?}",
            image.dim()
        )));
    }
    if kernel.is_empty() {
        return Err(CslcError::EmptyInput(format!(
            "cannot convolve with a kernel of shape {:?}",
            kernel.dim()
        )));
    }

    let method = method.resolve(image.dim(), kernel.dim(), mode);
    log::debug!(
        "Convolving {:?} with {:?} kernel ({:?} mode, {:?})",
        image.dim(),
        kernel.dim(),
        mode,
        method
    );

    match method {
        ConvolveMethod::Fft => convolve_fft(image, kernel, mode),
        _ => Ok(convolve_direct(image, kernel, mode)),
    }
}

/// Direct summation over the kernel support with implicit zero padding
fn convolve_direct<T, W>(image: &ArrayView2<T>, kernel: &ArrayView2<W>, mode: ConvolveMode) -> Array2<T>
where
    T: ConvElement,
    W: Copy + Into<f64>,
{
    let (img_rows, img_cols) = image.dim();
    let (ker_rows, ker_cols) = kernel.dim();
    let (off_row, off_col) = mode.crop_offset(kernel.dim());

    let mut output = Array2::<T>::zeros(mode.output_dim(image.dim(), kernel.dim()));

    for ((i, j), out) in output.indexed_iter_mut() {
        // Position inside the full convolution
        let n = i + off_row;
        let m = j + off_col;

        let ki_start = (n + 1).saturating_sub(img_rows);
        let ki_end = n.min(ker_rows - 1);
        let kj_start = (m + 1).saturating_sub(img_cols);
        let kj_end = m.min(ker_cols - 1);

        let mut sum = T::zero();
        for ki in ki_start..=ki_end {
            for kj in kj_start..=kj_end {
                sum += image[[n - ki, m - kj]].scaled(kernel[[ki, kj]].into());
            }
        }
        *out = sum;
    }

    output
}

/// Spectral product of the zero padded operands, cropped like `convolve_direct`
fn convolve_fft<T, W>(
    image: &ArrayView2<T>,
    kernel: &ArrayView2<W>,
    mode: ConvolveMode,
) -> CslcResult<Array2<T>>
where
    T: ConvElement,
    W: Copy + Into<f64>,
{
    let (img_rows, img_cols) = image.dim();
    let (ker_rows, ker_cols) = kernel.dim();
    let full_dim = ConvolveMode::Full.output_dim(image.dim(), kernel.dim());

    let mut planner = FftPlanner::<f64>::new();

    let mut image_spec = Array2::<Complex64>::zeros(full_dim);
    image_spec
        .slice_mut(s![..img_rows, ..img_cols])
        .zip_mut_with(image, |dst, src| *dst = src.to_complex());

    let mut kernel_spec = Array2::<Complex64>::zeros(full_dim);
    kernel_spec
        .slice_mut(s![..ker_rows, ..ker_cols])
        .zip_mut_with(kernel, |dst, &w| *dst = Complex64::new(w.into(), 0.0));

    fft2(&mut planner, &mut image_spec, false)?;
    fft2(&mut planner, &mut kernel_spec, false)?;
    image_spec.zip_mut_with(&kernel_spec, |a, &b| *a *= b);
    fft2(&mut planner, &mut image_spec, true)?;

    // rustfft leaves the inverse unnormalized
    let scale = 1.0 / (full_dim.0 * full_dim.1) as f64;
    let (off_row, off_col) = mode.crop_offset(kernel.dim());
    let (out_rows, out_cols) = mode.output_dim(image.dim(), kernel.dim());

    Ok(image_spec
        .slice(s![off_row..off_row + out_rows, off_col..off_col + out_cols])
        .mapv(|v| T::from_complex(v * scale)))
}

/// In-place 2D transform: rows first, then columns through a transposed copy
fn fft2(planner: &mut FftPlanner<f64>, data: &mut Array2<Complex64>, inverse: bool) -> CslcResult<()> {
    let (rows, cols) = data.dim();

    let row_fft = if inverse {
        planner.plan_fft_inverse(cols)
    } else {
        planner.plan_fft_forward(cols)
    };
    let buffer = data
        .as_slice_mut()
        .ok_or_else(|| CslcError::Processing("FFT row buffer is not contiguous".to_string()))?;
    row_fft.process(buffer);

    let mut transposed = data.t().as_standard_layout().into_owned();
    let col_fft = if inverse {
        planner.plan_fft_inverse(rows)
    } else {
        planner.plan_fft_forward(rows)
    };
    let buffer = transposed
        .as_slice_mut()
        .ok_or_else(|| CslcError::Processing("FFT column buffer is not contiguous".to_string()))?;
    col_fft.process(buffer);

    data.assign(&transposed.t());
    Ok(())
}
