//! cslc: burst stack grouping and coherence estimation for coregistered SLCs
//!
//! Groups Sentinel-1 style burst acquisitions into deduplicated, date-indexed
//! stacks, builds smoothing kernels by iterated box convolution and computes
//! windowed cross products between complex scenes, the building blocks of an
//! interferometric coherence estimate.

pub mod types;
pub mod core;

#[cfg(feature = "python")]
mod python;

// Re-export main types and functions for easier access
pub use types::{
    CslcError, CslcResult, GeoTransform, SlcComplex, SlcImage, SlcReal, SlcRealScene, SlcScene,
};

pub use crate::core::{
    bounds, get_kernel, group_into_stacks, smoothed_dot_prod, CoherenceEstimator,
    CoherenceParams, Footprint, Kernel, KernelParams, SmoothedField,
};
