//! Failure modes of a single extraction
//!
//! None of these reach the caller of the extractor; they are logged and
//! collapsed into an absent accent.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported image reference: {0}")]
    Unsupported(String),

    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to fetch image: {0}")]
    Http(#[from] reqwest::Error),

    #[error("image request returned {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("no usable pixels in image")]
    EmptySignal,

    #[error("pixel analysis failed: {0}")]
    Processing(String),

    #[error("sample has {0} pixels, expected a full grid")]
    InvalidSample(usize),
}
