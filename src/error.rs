use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid image: {0}")]
    InvalidImage(String),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("failed to open image file {1:?}")]
    Io(#[source] std::io::Error, PathBuf),
    #[error("failed to read numpy array from {1:?}")]
    Npy(#[source] std::io::Error, PathBuf),
    #[error("unsupported numpy data type {0} in {1:?}")]
    NpyType(String, PathBuf),
}
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_image(msg: impl ToString) -> Self {
        Error::InvalidImage(msg.to_string())
    }
    pub(crate) fn invalid_parameter(msg: impl ToString) -> Self {
        Error::InvalidParameter(msg.to_string())
    }
}
