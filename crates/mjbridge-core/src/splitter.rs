//! Grid splitting.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageDecoder, ImageReader, ImageResult};

/// One cell of a 2x2 grid, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    /// Position in [`Quadrant::ALL`], used in file names.
    pub fn index(self) -> usize {
        match self {
            Quadrant::TopLeft => 0,
            Quadrant::TopRight => 1,
            Quadrant::BottomLeft => 2,
            Quadrant::BottomRight => 3,
        }
    }

    /// `(x, y, width, height)` of this quadrant in a `width` x `height` image.
    ///
    /// The split point is `width / 2`, `height / 2` rounded down, so an odd
    /// remainder ends up in the right column and bottom row.
    pub fn bounds(self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        let half_w = width / 2;
        let half_h = height / 2;
        match self {
            Quadrant::TopLeft => (0, 0, half_w, half_h),
            Quadrant::TopRight => (half_w, 0, width - half_w, half_h),
            Quadrant::BottomLeft => (0, half_h, half_w, height - half_h),
            Quadrant::BottomRight => (half_w, half_h, width - half_w, height - half_h),
        }
    }
}

/// A decoded grid and the colour profile embedded in its source file.
#[derive(Debug, Clone)]
pub struct GridImage {
    pub image: DynamicImage,
    /// Carried over to every quadrant file.
    pub icc_profile: Option<Vec<u8>>,
}

impl GridImage {
    /// Decode an encoded image, sniffing the format from its bytes.
    pub fn decode(bytes: &[u8]) -> ImageResult<Self> {
        let decoder = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .into_decoder()?;
        Self::from_decoder(decoder)
    }

    pub fn open(path: &Path) -> ImageResult<Self> {
        let decoder = ImageReader::open(path)?
            .with_guessed_format()?
            .into_decoder()?;
        Self::from_decoder(decoder)
    }

    fn from_decoder(mut decoder: impl ImageDecoder) -> ImageResult<Self> {
        let icc_profile = decoder.icc_profile()?.filter(|profile| !profile.is_empty());
        let image = DynamicImage::from_decoder(decoder)?;
        Ok(Self { image, icc_profile })
    }

    pub fn split(&self) -> [DynamicImage; 4] {
        split_into_quadrants(&self.image)
    }
}

/// Cut a composite grid into its four quadrants: top-left, top-right,
/// bottom-left, bottom-right. No resizing or padding.
pub fn split_into_quadrants(image: &DynamicImage) -> [DynamicImage; 4] {
    let (width, height) = (image.width(), image.height());
    Quadrant::ALL.map(|quadrant| {
        let (x, y, w, h) = quadrant.bounds(width, height);
        image.crop_imm(x, y, w, h)
    })
}
