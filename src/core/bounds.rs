use crate::types::SlcImage;
use serde::{Deserialize, Serialize};

/// Axis-aligned raster footprint in the image's native CRS
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Footprint {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// True when the two rectangles share any point, edges included
    pub fn intersects(&self, other: &Footprint) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// Overlapping rectangle, if any
    pub fn intersection(&self, other: &Footprint) -> Option<Footprint> {
        if !self.intersects(other) {
            return None;
        }
        Some(Footprint {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
        })
    }
}

/// Footprint of an image from its geotransform and pixel counts
///
/// Assumes a north-up raster (no rotation terms) with a negative pixel
/// height, as written by GDAL.
pub fn bounds(img: &SlcImage) -> Footprint {
    let gt = &img.geotrans;
    Footprint {
        min_x: gt.top_left_x,
        min_y: gt.top_left_y + gt.pixel_height * img.y_pixels as f64,
        max_x: gt.top_left_x + gt.pixel_width * img.x_pixels as f64,
        max_y: gt.top_left_y,
    }
}
