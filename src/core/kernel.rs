use crate::core::convolve::{convolve2d, ConvolveMethod, ConvolveMode};
use crate::types::{CslcError, CslcResult};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Normalized smoothing kernel (weights sum to one)
pub type Kernel = Array2<f32>;

/// Number of self-convolution passes evaluated in `Full` mode.
///
/// Passes with index `>= FULL_CONVOLUTION_PASSES` use `Same` mode, so the
/// kernel stops growing after this many passes.
pub const FULL_CONVOLUTION_PASSES: usize = 4;

/// Convolution mode used for self-convolution pass `pass` (zero based)
pub fn convolution_mode_for_pass(pass: usize) -> ConvolveMode {
    if pass < FULL_CONVOLUTION_PASSES {
        ConvolveMode::Full
    } else {
        ConvolveMode::Same
    }
}

/// Smoothing kernel parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelParams {
    /// Side of the base box kernel in pixels
    pub size: usize,
    /// Number of self-convolution passes
    pub num_conv: usize,
}

impl Default for KernelParams {
    fn default() -> Self {
        Self {
            size: 5,     // 5x5 box
            num_conv: 0, // plain boxcar
        }
    }
}

impl KernelParams {
    /// Build the kernel described by these parameters
    pub fn build(&self) -> CslcResult<Kernel> {
        get_kernel(self.size, self.num_conv)
    }

    /// Side length of the kernel `build` returns
    pub fn kernel_side(&self) -> usize {
        let full_passes = self.num_conv.min(FULL_CONVOLUTION_PASSES);
        self.size + full_passes * self.size.saturating_sub(1)
    }
}

/// Build a smoothing kernel by repeated self-convolution of a box
///
/// # Arguments
/// * `size` - Side of the `size x size` box of ones
/// * `num_conv` - Number of convolutions with the box
///
/// # Returns
/// * Kernel normalized to unit sum, in single precision
pub fn get_kernel(size: usize, num_conv: usize) -> CslcResult<Kernel> {
    if size == 0 {
        return Err(CslcError::InvalidParameter(
            "kernel size must be at least 1".to_string(),
        ));
    }

    log::debug!("Building {}x{} box kernel with {} convolutions", size, size, num_conv);

    let base = Array2::<f64>::ones((size, size));
    let mut kernel = base.clone();

    for pass in 0..num_conv {
        let mode = convolution_mode_for_pass(pass);
        // Box sums are integers, direct summation keeps them exact
        kernel = convolve2d(&kernel.view(), &base.view(), mode, ConvolveMethod::Direct)?;
        log::debug!("Pass {} ({:?}): kernel shape {:?}", pass, mode, kernel.dim());
    }

    let total = kernel.sum();
    kernel.mapv_inplace(|w| w / total);

    Ok(kernel.mapv(|w| w as f32))
}
