//! Detector plate scales
//!
//! A [`Scale`] gives the number of pixels per millimeter in the focal plane
//! for a given image shape, accounting for the camera binning.

/// Pixels per millimeter for an image of a given shape
pub trait Scale: Send + Sync {
    fn pixels_per_mm(&self, width: usize, height: usize) -> f64;
}

/// ZWO ASI294MM camera
///
/// The binning factor is inferred from the image width against the
/// full resolution of the sensor and the pixel scale is rounded up
/// to an integer number of pixels per millimeter.
#[derive(Debug, Clone, Copy, Default)]
pub struct Asi294;
impl Asi294 {
    /// Full resolution width [px]
    pub const FULL_WIDTH: usize = 8288;
    /// Full resolution height [px]
    pub const FULL_HEIGHT: usize = 5644;
    /// Pixel size [micron]
    pub const PIXEL_SIZE: f64 = 2.3;
    /// Binning factor of an image `width` pixels wide
    pub fn binning(width: usize) -> f64 {
        Self::FULL_WIDTH as f64 / width as f64
    }
}
impl Scale for Asi294 {
    fn pixels_per_mm(&self, width: usize, _height: usize) -> f64 {
        (1e3 / Self::PIXEL_SIZE / Self::binning(width)).ceil()
    }
}

/// Constant plate scale
#[derive(Debug, Clone, Copy)]
pub struct Fixed(pub f64);
impl Scale for Fixed {
    fn pixels_per_mm(&self, _width: usize, _height: usize) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asi294() {
        assert_eq!(Asi294.pixels_per_mm(8288, 5644), 435.);
        assert_eq!(Asi294::binning(4144), 2.);
        assert_eq!(Asi294.pixels_per_mm(4144, 2822), 218.);
        assert_eq!(Asi294.pixels_per_mm(2072, 1411), 109.);
    }

    #[test]
    fn fixed() {
        assert_eq!(Fixed(12.5).pixels_per_mm(10, 10), 12.5);
    }
}
