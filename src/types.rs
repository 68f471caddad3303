use chrono::{DateTime, NaiveDate, Utc};
use ndarray::Array2;
use num_complex::Complex;
use serde::{Deserialize, Serialize};

/// Complex-valued SLC sample (I + jQ)
pub type SlcComplex = Complex<f32>;

/// Real-valued magnitude or intensity sample
pub type SlcReal = f32;

/// 2D complex SLC scene (azimuth x range)
pub type SlcScene = Array2<SlcComplex>;

/// 2D real-valued scene (azimuth x range)
pub type SlcRealScene = Array2<SlcReal>;

/// Geospatial transformation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    pub top_left_x: f64,
    pub pixel_width: f64,
    pub rotation_x: f64,
    pub top_left_y: f64,
    pub rotation_y: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    /// Build from the six coefficients in GDAL order
    /// `[origin_x, pixel_width, rot_x, origin_y, rot_y, pixel_height]`
    pub fn from_gdal(coeffs: [f64; 6]) -> Self {
        Self {
            top_left_x: coeffs[0],
            pixel_width: coeffs[1],
            rotation_x: coeffs[2],
            top_left_y: coeffs[3],
            rotation_y: coeffs[4],
            pixel_height: coeffs[5],
        }
    }

    /// Coefficients back in GDAL order
    pub fn to_gdal(&self) -> [f64; 6] {
        [
            self.top_left_x,
            self.pixel_width,
            self.rotation_x,
            self.top_left_y,
            self.rotation_y,
            self.pixel_height,
        ]
    }
}

impl From<[f64; 6]> for GeoTransform {
    fn from(coeffs: [f64; 6]) -> Self {
        Self::from_gdal(coeffs)
    }
}

/// One coregistered burst acquisition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlcImage {
    /// Product name, used as the deterministic ordering key
    pub name: String,
    /// Burst / data source identity
    pub provider_id: String,
    /// Acquisition start time
    pub acquired: DateTime<Utc>,
    /// Affine georeferencing of the raster
    pub geotrans: GeoTransform,
    pub x_pixels: usize,
    pub y_pixels: usize,
}

impl SlcImage {
    /// Calendar date (UTC) of the acquisition
    pub fn acquisition_date(&self) -> NaiveDate {
        self.acquired.date_naive()
    }
}

/// Error types for stack grouping and coherence processing
#[derive(Debug, thiserror::Error)]
pub enum CslcError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid argument type: {0}")]
    InvalidArgumentType(String),

    #[error("Shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Processing error: {0}")]
    Processing(String),
}

/// Result type for cslc operations
pub type CslcResult<T> = Result<T, CslcError>;
