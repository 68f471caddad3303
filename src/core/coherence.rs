use crate::core::convolve::{convolve2d, ConvolveMethod, ConvolveMode};
use crate::core::kernel::{get_kernel, Kernel};
use crate::types::{CslcError, CslcResult, SlcRealScene, SlcScene};
use ndarray::Zip;
use serde::{Deserialize, Serialize};

/// Coherence estimation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoherenceParams {
    /// Side of the base box kernel
    pub kernel_size: usize,
    /// Self-convolution passes applied to the box
    pub num_conv: usize,
    /// Convolution algorithm for the smoothing step
    pub method: ConvolveMethod,
}

impl Default for CoherenceParams {
    fn default() -> Self {
        Self {
            kernel_size: 5,
            num_conv: 0,
            method: ConvolveMethod::Auto,
        }
    }
}

/// Output of [`smoothed_dot_prod`]
#[derive(Debug, Clone, PartialEq)]
pub enum SmoothedField {
    /// Smoothed cross product `<z1 z2*>`
    Complex(SlcScene),
    /// Smoothed magnitude product `<|z1| |z2|>`
    Real(SlcRealScene),
}

impl SmoothedField {
    pub fn dim(&self) -> (usize, usize) {
        match self {
            SmoothedField::Complex(field) => field.dim(),
            SmoothedField::Real(field) => field.dim(),
        }
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, SmoothedField::Complex(_))
    }

    pub fn into_complex(self) -> Option<SlcScene> {
        match self {
            SmoothedField::Complex(field) => Some(field),
            SmoothedField::Real(_) => None,
        }
    }

    pub fn into_real(self) -> Option<SlcRealScene> {
        match self {
            SmoothedField::Real(field) => Some(field),
            SmoothedField::Complex(_) => None,
        }
    }
}

/// Weighted neighbourhood dot product of two scenes
///
/// For every pixel, the product of `z1` with the conjugate of `z2` (or of
/// their magnitudes when `real` is set) is averaged over the neighbourhood
/// weighted by `k`. The kernel is used as given; pass a unit-sum kernel to
/// get a local mean.
///
/// # Arguments
/// * `z1` - First complex scene
/// * `z2` - Second complex scene, same shape as `z1`
/// * `k` - 2D smoothing kernel
/// * `real` - Smooth `|z1| |z2|` instead of `z1 conj(z2)`
///
/// # Returns
/// * Smoothed field with the shape of `z1`
pub fn smoothed_dot_prod(
    z1: &SlcScene,
    z2: &SlcScene,
    k: &Kernel,
    real: bool,
) -> CslcResult<SmoothedField> {
    if real {
        smoothed_intensity_product(z1, z2, k).map(SmoothedField::Real)
    } else {
        smoothed_cross_product(z1, z2, k).map(SmoothedField::Complex)
    }
}

/// Smoothed complex cross product `<z1 conj(z2)>`
pub fn smoothed_cross_product(z1: &SlcScene, z2: &SlcScene, k: &Kernel) -> CslcResult<SlcScene> {
    cross_product_with(z1, z2, k, ConvolveMethod::Auto)
}

/// Smoothed magnitude product `<|z1| |z2|>` of two complex scenes
pub fn smoothed_intensity_product(
    z1: &SlcScene,
    z2: &SlcScene,
    k: &Kernel,
) -> CslcResult<SlcRealScene> {
    intensity_product_with(z1, z2, k, ConvolveMethod::Auto)
}

/// Smoothed magnitude product of two real-valued scenes
pub fn smoothed_magnitude_product(
    a1: &SlcRealScene,
    a2: &SlcRealScene,
    k: &Kernel,
) -> CslcResult<SlcRealScene> {
    check_same_shape(a1.dim(), a2.dim())?;
    let product = Zip::from(a1).and(a2).map_collect(|&a, &b| a.abs() * b.abs());
    convolve2d(&product.view(), &k.view(), ConvolveMode::Same, ConvolveMethod::Auto)
}

fn cross_product_with(
    z1: &SlcScene,
    z2: &SlcScene,
    k: &Kernel,
    method: ConvolveMethod,
) -> CslcResult<SlcScene> {
    check_same_shape(z1.dim(), z2.dim())?;
    let product = Zip::from(z1).and(z2).map_collect(|&a, &b| a * b.conj());
    convolve2d(&product.view(), &k.view(), ConvolveMode::Same, method)
}

fn intensity_product_with(
    z1: &SlcScene,
    z2: &SlcScene,
    k: &Kernel,
    method: ConvolveMethod,
) -> CslcResult<SlcRealScene> {
    check_same_shape(z1.dim(), z2.dim())?;
    let product = Zip::from(z1).and(z2).map_collect(|a, b| a.norm() * b.norm());
    convolve2d(&product.view(), &k.view(), ConvolveMode::Same, method)
}

fn check_same_shape(expected: (usize, usize), found: (usize, usize)) -> CslcResult<()> {
    if expected != found {
        return Err(CslcError::ShapeMismatch { expected, found });
    }
    Ok(())
}

/// Windowed coherence estimator holding a prebuilt kernel
pub struct CoherenceEstimator {
    kernel: Kernel,
    method: ConvolveMethod,
}

impl CoherenceEstimator {
    /// Create an estimator around an existing kernel
    pub fn new(kernel: Kernel) -> Self {
        Self {
            kernel,
            method: ConvolveMethod::Auto,
        }
    }

    /// Create an estimator, building its kernel from `params`
    pub fn with_params(params: CoherenceParams) -> CslcResult<Self> {
        let kernel = get_kernel(params.kernel_size, params.num_conv)?;
        log::info!(
            "Coherence estimator: {}x{} kernel ({} convolutions of a {}x{} box), {:?}",
            kernel.nrows(),
            kernel.ncols(),
            params.num_conv,
            params.kernel_size,
            params.kernel_size,
            params.method
        );
        Ok(Self {
            kernel,
            method: params.method,
        })
    }

    /// Create an estimator with default parameters
    pub fn standard() -> CslcResult<Self> {
        Self::with_params(CoherenceParams::default())
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    pub fn method(&self) -> ConvolveMethod {
        self.method
    }

    /// [`smoothed_dot_prod`] with this estimator's kernel and method
    pub fn smoothed_dot_prod(
        &self,
        z1: &SlcScene,
        z2: &SlcScene,
        real: bool,
    ) -> CslcResult<SmoothedField> {
        if real {
            intensity_product_with(z1, z2, &self.kernel, self.method).map(SmoothedField::Real)
        } else {
            cross_product_with(z1, z2, &self.kernel, self.method).map(SmoothedField::Complex)
        }
    }

    /// Coherence magnitude `|<z1 z2*>| / sqrt(<|z1|^2> <|z2|^2>)`
    ///
    /// Values are clamped to `[0, 1]`; pixels whose denominator vanishes
    /// are set to zero.
    pub fn coherence(&self, z1: &SlcScene, z2: &SlcScene) -> CslcResult<SlcRealScene> {
        let (rows, cols) = z1.dim();
        log::info!("Estimating coherence over {}x{} scene", rows, cols);

        let numerator = cross_product_with(z1, z2, &self.kernel, self.method)?;
        let power1 = intensity_product_with(z1, z1, &self.kernel, self.method)?;
        let power2 = intensity_product_with(z2, z2, &self.kernel, self.method)?;

        let coherence = Zip::from(&numerator)
            .and(&power1)
            .and(&power2)
            .map_collect(|num, &p1, &p2| {
                // FFT round-off can leave tiny negative powers
                let denom = (p1.max(0.0) * p2.max(0.0)).sqrt();
                if denom.is_finite() && denom > 0.0 {
                    (num.norm() / denom).clamp(0.0, 1.0)
                } else {
                    0.0
                }
            });

        let valid = coherence.iter().filter(|&&c| c > 0.0).count();
        log::debug!("Coherence computed, {} of {} pixels non-zero", valid, rows * cols);

        Ok(coherence)
    }
}
