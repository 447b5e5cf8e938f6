//! Image sources
//!
//! Any type yielding a rectangular grid of samples can feed the analysis
//! through the [`ImageSource`] trait.
//! [`NpyImage`] reads 2-D numpy arrays saved with `numpy.save`.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use npyz::{DType, NpyFile, Order};

use crate::{Error, Image, Result};

/// Supplier of focal plane images
pub trait ImageSource {
    /// Label of the image used in reports and logs
    fn name(&self) -> String;
    fn load(&self) -> Result<Image>;
}

impl ImageSource for Image {
    fn name(&self) -> String {
        let (width, height) = self.shape();
        format!("image {width}x{height}")
    }
    fn load(&self) -> Result<Image> {
        Ok(self.clone())
    }
}

/// 2-D numpy array file (`.npy`)
#[derive(Debug, Clone)]
pub struct NpyImage {
    path: PathBuf,
}
impl NpyImage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
    fn samples<R: std::io::Read>(&self, npy: NpyFile<R>) -> Result<Vec<f64>> {
        let type_str = match npy.dtype() {
            DType::Plain(type_str) => type_str.to_string(),
            dtype => return Err(Error::NpyType(format!("{dtype:?}"), self.path.clone())),
        };
        // first character is the byte order
        let samples = match type_str.get(1..) {
            Some("f8") => npy.into_vec::<f64>(),
            Some("f4") => npy
                .into_vec::<f32>()
                .map(|v| v.into_iter().map(f64::from).collect()),
            Some("u1") => npy
                .into_vec::<u8>()
                .map(|v| v.into_iter().map(f64::from).collect()),
            Some("u2") => npy
                .into_vec::<u16>()
                .map(|v| v.into_iter().map(f64::from).collect()),
            Some("u4") => npy
                .into_vec::<u32>()
                .map(|v| v.into_iter().map(f64::from).collect()),
            Some("i2") => npy
                .into_vec::<i16>()
                .map(|v| v.into_iter().map(f64::from).collect()),
            Some("i4") => npy
                .into_vec::<i32>()
                .map(|v| v.into_iter().map(f64::from).collect()),
            Some("i8") => npy
                .into_vec::<i64>()
                .map(|v| v.into_iter().map(|x| x as f64).collect()),
            _ => return Err(Error::NpyType(type_str, self.path.clone())),
        };
        samples.map_err(|e| Error::Npy(e, self.path.clone()))
    }
}
impl ImageSource for NpyImage {
    fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
    fn load(&self) -> Result<Image> {
        let file = File::open(&self.path).map_err(|e| Error::Io(e, self.path.clone()))?;
        let npy = NpyFile::new(BufReader::new(file)).map_err(|e| Error::Npy(e, self.path.clone()))?;
        let (height, width) = match npy.shape() {
            &[height, width] => (height as usize, width as usize),
            shape => {
                return Err(Error::invalid_image(format!(
                    "expected a 2-D array in {:?}, found shape {shape:?}",
                    self.path
                )))
            }
        };
        let order = npy.order();
        let samples = self.samples(npy)?;
        log::debug!("{:?}: {width}x{height} ({order:?} order)", self.path);
        match order {
            Order::C => Image::from_row_slice(width, height, &samples),
            Order::Fortran => Image::from_column_slice(width, height, &samples),
        }
    }
}
