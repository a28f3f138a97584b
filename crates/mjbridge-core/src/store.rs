//! Artifact storage for split quadrants.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageEncoder, ImageError, ImageResult};
use tracing::info;

use crate::error::ImagineError;
use crate::splitter::Quadrant;

/// Writes quadrant images into a local directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Base name for the files of one grid: the last path segment of the
    /// image URL without its query string.
    pub fn base_name(url: &str) -> String {
        let last = url.rsplit('/').next().unwrap_or(url);
        let name = last.split('?').next().unwrap_or(last);
        if name.is_empty() {
            "image".to_string()
        } else {
            name.to_string()
        }
    }

    /// Path of one quadrant file: `<dir>/<base>-<index>.png`.
    pub fn quadrant_path(&self, base: &str, quadrant: Quadrant) -> PathBuf {
        self.dir.join(format!("{}-{}.png", base, quadrant.index()))
    }

    /// Write the four quadrants as PNG files and return their paths in order.
    ///
    /// `icc_profile` is embedded in every file. Nothing is written when a
    /// quadrant is empty.
    pub fn save_quadrants(
        &self,
        base: &str,
        quadrants: &[DynamicImage; 4],
        icc_profile: Option<&[u8]>,
    ) -> Result<Vec<PathBuf>, ImagineError> {
        if quadrants.iter().any(|q| q.width() == 0 || q.height() == 0) {
            return Err(ImagineError::GridTooSmall {
                width: quadrants[0].width() + quadrants[1].width(),
                height: quadrants[0].height() + quadrants[2].height(),
            });
        }

        std::fs::create_dir_all(&self.dir)?;

        let mut paths = Vec::with_capacity(quadrants.len());
        for (quadrant, image) in Quadrant::ALL.iter().zip(quadrants.iter()) {
            let path = self.quadrant_path(base, *quadrant);
            write_png(&path, image, icc_profile).map_err(|source| ImagineError::Save {
                path: path.clone(),
                source,
            })?;
            info!("Saved image: {}", path.display());
            paths.push(path);
        }

        Ok(paths)
    }
}

fn write_png(path: &Path, image: &DynamicImage, icc_profile: Option<&[u8]>) -> ImageResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    let mut encoder = PngEncoder::new(&mut writer);
    if let Some(profile) = icc_profile {
        encoder
            .set_icc_profile(profile.to_vec())
            .map_err(ImageError::Unsupported)?;
    }
    image.write_with_encoder(encoder)?;
    writer.flush()?;
    Ok(())
}

impl Default for ArtifactStore {
    fn default() -> Self {
        Self::new("./images")
    }
}
