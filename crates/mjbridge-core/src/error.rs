//! Error types for the result pipeline.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use mjbridge_protocols::SessionError;

/// Errors raised while waiting for, downloading or storing a result.
#[derive(Debug, Error)]
pub enum ImagineError {
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The image host answered with a non-success status.
    #[error("Download of {url} failed with status {status}")]
    Download { url: String, status: u16 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode image from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: image::ImageError,
    },

    /// One side is shorter than two pixels, so a quadrant would be empty.
    #[error("Grid of {width}x{height} is too small to split into quadrants")]
    GridTooSmall { width: u32, height: u32 },

    #[error("Failed to save {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No finished grid after {0:?}")]
    DeadlineExceeded(Duration),

    #[error("Waiting for result cancelled")]
    Cancelled,
}

/// Errors raised when overriding classifier patterns.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("Unknown classifier pattern: {0}")]
    Unknown(String),

    #[error("Invalid {name} pattern: {source}")]
    Invalid {
        name: String,
        #[source]
        source: regex::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_error_display() {
        let err = ImagineError::Download {
            url: "https://cdn.example.com/grid.png".to_string(),
            status: 404,
        };
        let display = err.to_string();
        assert!(display.contains("grid.png"));
        assert!(display.contains("404"));
    }

    #[test]
    fn test_session_error_transparent() {
        let err = ImagineError::from(SessionError::Unavailable("gone".to_string()));
        assert_eq!(err.to_string(), "Session unavailable: gone");
    }

    #[test]
    fn test_deadline_display() {
        let err = ImagineError::DeadlineExceeded(Duration::from_secs(5));
        assert!(err.to_string().contains("5s"));
    }

    #[test]
    fn test_grid_too_small_display() {
        let err = ImagineError::GridTooSmall {
            width: 1,
            height: 4,
        };
        assert!(err.to_string().contains("1x4"));
    }

    #[test]
    fn test_pattern_errors() {
        let err = PatternError::Unknown("sparkle".to_string());
        assert!(err.to_string().contains("sparkle"));

        let source = regex::Regex::new("(").unwrap_err();
        let err = PatternError::Invalid {
            name: "grid".to_string(),
            source,
        };
        assert!(err.to_string().contains("Invalid grid pattern"));
    }
}
