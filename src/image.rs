//! Focal plane image and pixel coordinates
//!
//! [`Image`] stores the samples in a [`nalgebra::DMatrix`] with one matrix row
//! per image row, so that `(x, y)` always means `(column, row)`.
//! Samples are only reached through [`Image::at`] or [`Image::get`],
//! never by raw matrix indices at the call site.

use std::fmt;

use nalgebra::DMatrix;

use crate::{Error, Result};

/// Integer pixel coordinates: `x` is the column, `y` is the row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Centroid {
    pub x: usize,
    pub y: usize,
}
impl Centroid {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
    /// Euclidean distance in pixels from the centroid to the pixel `(i, j)`
    pub fn distance_to(&self, i: usize, j: usize) -> f64 {
        let dx = i as f64 - self.x as f64;
        let dy = j as f64 - self.y as f64;
        (dx * dx + dy * dy).sqrt()
    }
}
impl fmt::Display for Centroid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x: {}, y: {})", self.x, self.y)
    }
}

/// 2-D grid of intensity samples
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    data: DMatrix<f64>,
}
impl Image {
    /// Creates an image from row-major samples
    pub fn from_row_slice(width: usize, height: usize, samples: &[f64]) -> Result<Self> {
        Self::check_shape(width, height, samples.len())?;
        Ok(Self {
            data: DMatrix::from_row_slice(height, width, samples),
        })
    }
    /// Creates an image from column-major samples
    pub fn from_column_slice(width: usize, height: usize, samples: &[f64]) -> Result<Self> {
        Self::check_shape(width, height, samples.len())?;
        Ok(Self {
            data: DMatrix::from_column_slice(height, width, samples),
        })
    }
    /// Creates an image where the sample at `(x, y)` is `f(x, y)`
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> f64,
    {
        Self::check_shape(width, height, width * height)?;
        Ok(Self {
            data: DMatrix::from_fn(height, width, |row, column| f(column, row)),
        })
    }
    /// Creates an image with all samples set to `value`
    pub fn filled(width: usize, height: usize, value: f64) -> Result<Self> {
        Self::from_fn(width, height, |_, _| value)
    }
    fn check_shape(width: usize, height: usize, n_sample: usize) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::invalid_image(format!(
                "empty image ({width}x{height})"
            )));
        }
        if width * height != n_sample {
            return Err(Error::invalid_image(format!(
                "{n_sample} samples do not fill a {width}x{height} image"
            )));
        }
        Ok(())
    }
    /// Number of columns
    pub fn width(&self) -> usize {
        self.data.ncols()
    }
    /// Number of rows
    pub fn height(&self) -> usize {
        self.data.nrows()
    }
    /// Returns `(width, height)`
    pub fn shape(&self) -> (usize, usize) {
        (self.width(), self.height())
    }
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    /// Sample at column `x` and row `y`
    ///
    /// Panics if `(x, y)` is outside the image
    pub fn at(&self, x: usize, y: usize) -> f64 {
        self.data[(y, x)]
    }
    /// Sample at column `x` and row `y` or `None` if outside the image
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        self.data.get((y, x)).copied()
    }
    /// Iterator over all the samples, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &f64> + '_ {
        self.data.iter()
    }
    /// Mean of all the samples
    pub fn mean(&self) -> f64 {
        self.data.mean()
    }
    pub fn sum(&self) -> f64 {
        self.data.sum()
    }
    /// Sum of the samples of each column, indexed by `x`
    pub fn column_sums(&self) -> Vec<f64> {
        self.data.column_iter().map(|c| c.sum()).collect()
    }
    /// Sum of the samples of each row, indexed by `y`
    pub fn row_sums(&self) -> Vec<f64> {
        self.data.row_iter().map(|r| r.sum()).collect()
    }
    /// Samples of row `y` for the columns `[x0, x1)`, clamped to the image
    pub fn row_profile(&self, y: usize, x0: usize, x1: usize) -> Vec<f64> {
        if y >= self.height() {
            return vec![];
        }
        let x1 = x1.min(self.width());
        (x0.min(x1)..x1).map(|x| self.at(x, y)).collect()
    }
    /// New image with `f` applied to every sample
    pub fn map<F>(&self, f: F) -> Self
    where
        F: FnMut(f64) -> f64,
    {
        Self {
            data: self.data.map(f),
        }
    }
    /// Samples in row-major order
    pub fn to_row_major(&self) -> Vec<f64> {
        self.data.transpose().as_slice().to_vec()
    }
}
