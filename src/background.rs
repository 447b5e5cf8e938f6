use std::ops::Range;

use crate::{Centroid, Error, Image, Result};

/// Background subtracted image
#[derive(Debug, Clone)]
pub struct Background {
    /// mean of the samples outside the exclusion window
    pub level: f64,
    /// image minus the background level, floored at zero
    pub image: Image,
}

/// Square exclusion window `[x-r, x+r) × [y-r, y+r)` clipped to the image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub columns: Range<usize>,
    pub rows: Range<usize>,
}
impl Window {
    pub fn new(image: &Image, centroid: Centroid, radius: usize) -> Self {
        let Centroid { x, y } = centroid;
        Self {
            columns: x.saturating_sub(radius)..x.saturating_add(radius).min(image.width()),
            rows: y.saturating_sub(radius)..y.saturating_add(radius).min(image.height()),
        }
    }
    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.columns.contains(&x) && self.rows.contains(&y)
    }
    fn len(&self) -> usize {
        self.columns.len() * self.rows.len()
    }
}

/// Mean of the samples outside the exclusion window of half-width `radius`
pub fn background_level(image: &Image, centroid: Centroid, radius: usize) -> Result<f64> {
    let window = Window::new(image, centroid, radius);
    let n_background = image.len() - window.len();
    if n_background == 0 {
        return Err(Error::invalid_parameter(format!(
            "study radius covers entire image (radius: {radius}, centroid: {centroid}, shape: {:?})",
            image.shape()
        )));
    }
    let (width, height) = image.shape();
    let sum: f64 = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .filter(|&(x, y)| !window.contains(x, y))
        .map(|(x, y)| image.at(x, y))
        .sum();
    let level = sum / n_background as f64;
    log::debug!(
        "background: {level:.3} from {n_background} pixels outside {:?}x{:?}",
        window.columns,
        window.rows
    );
    Ok(level)
}

/// Removes the background level from every sample, clamping negative values to zero
pub fn subtract_background(image: &Image, centroid: Centroid, radius: usize) -> Result<Background> {
    let level = background_level(image, centroid, radius)?;
    Ok(Background {
        level,
        image: image.map(|v| (v - level).max(0.)),
    })
}
