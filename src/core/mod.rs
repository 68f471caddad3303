//! Core stack grouping and coherence modules

pub mod bounds;
pub mod coherence;
pub mod convolve;
pub mod kernel;
pub mod stack;

// Re-export main types
pub use bounds::{bounds, Footprint};
pub use coherence::{
    smoothed_cross_product, smoothed_dot_prod, smoothed_intensity_product,
    smoothed_magnitude_product, CoherenceEstimator, CoherenceParams, SmoothedField,
};
pub use convolve::{convolve2d, ConvElement, ConvolveMethod, ConvolveMode};
pub use kernel::{convolution_mode_for_pass, get_kernel, Kernel, KernelParams, FULL_CONVOLUTION_PASSES};
pub use stack::{dropped_duplicates, group_into_stacks, stack_dates, BurstStack, BurstStacks};
