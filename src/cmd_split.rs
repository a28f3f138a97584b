//! `split`: cut a local grid image into quadrants.

use std::error::Error;
use std::path::{Path, PathBuf};

use tracing::info;

use mjbridge_config::Config;
use mjbridge_core::{ArtifactStore, GridImage};

pub(crate) fn split(
    config: &Config,
    image_path: &Path,
    output_dir: Option<PathBuf>,
) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let grid = GridImage::open(image_path)?;
    info!(
        "Splitting {} ({}x{})",
        image_path.display(),
        grid.image.width(),
        grid.image.height()
    );

    let store = ArtifactStore::new(output_dir.unwrap_or_else(|| config.storage.output_path()));
    // Same naming as downloaded grids: the full file name, extension included.
    let base = image_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    let paths = store.save_quadrants(base, &grid.split(), grid.icc_profile.as_deref())?;
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};

    #[test]
    fn test_split_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("grid.png");
        let mut grid = RgbaImage::new(8, 6);
        grid.put_pixel(7, 5, Rgba([255, 0, 0, 255]));
        DynamicImage::ImageRgba8(grid).save(&source).unwrap();

        let out = dir.path().join("out");
        let paths = split(&Config::default(), &source, Some(out.clone())).unwrap();

        assert_eq!(paths.len(), 4);
        assert_eq!(paths[0], out.join("grid.png-0.png"));
        assert_eq!(paths[3], out.join("grid.png-3.png"));

        let bottom_right = image::open(&paths[3]).unwrap().to_rgba8();
        assert_eq!(bottom_right.dimensions(), (4, 3));
        assert_eq!(bottom_right.get_pixel(3, 2), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = split(&Config::default(), &dir.path().join("nope.png"), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_thin_image_rejected_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("thin.png");
        DynamicImage::ImageRgba8(RgbaImage::new(1, 4)).save(&source).unwrap();

        let out = dir.path().join("out");
        let err = split(&Config::default(), &source, Some(out.clone())).unwrap_err();

        assert!(err.to_string().contains("too small"));
        assert!(!out.exists());
    }
}
