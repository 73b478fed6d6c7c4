//! Photo decoding: header summary for listings, oriented thumbnails.

use image::imageops::FilterType;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

use crate::listing::PhotoHeader;

/// EXIF orientation tag value for a decoder orientation.
fn exif_orientation(o: Orientation) -> u8 {
    #[allow(unreachable_patterns)]
    match o {
        Orientation::NoTransforms => 1,
        Orientation::FlipHorizontal => 2,
        Orientation::Rotate180 => 3,
        Orientation::FlipVertical => 4,
        Orientation::Rotate90FlipH => 5,
        Orientation::Rotate90 => 6,
        Orientation::Rotate270FlipH => 7,
        Orientation::Rotate270 => 8,
        _ => 1,
    }
}

/// Reads orientation and pixel dimensions without decoding pixel data.
pub fn read_header(path: &Path) -> image::ImageResult<PhotoHeader> {
    let mut decoder = ImageReader::open(path)?
        .with_guessed_format()?
        .into_decoder()?;
    let (width, height) = decoder.dimensions();
    let orientation = exif_orientation(decoder.orientation()?);
    Ok(PhotoHeader {
        orientation,
        width,
        height,
    })
}

/// Width that keeps the aspect ratio of `w`x`h` at the given height.
fn scaled_width(w: u32, h: u32, height: u32) -> u32 {
    if h == 0 {
        return 1;
    }
    let width = (u64::from(w) * u64::from(height) + u64::from(h) / 2) / u64::from(h);
    width.clamp(1, u64::from(u32::MAX)) as u32
}

/// Decodes `path`, applies its EXIF orientation, scales it to `height` and encodes JPEG.
pub fn thumbnail_jpeg(path: &Path, height: u32) -> image::ImageResult<Vec<u8>> {
    let mut decoder = ImageReader::open(path)?
        .with_guessed_format()?
        .into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut img = DynamicImage::from_decoder(decoder)?;
    img.apply_orientation(orientation);

    let width = scaled_width(img.width(), img.height(), height);
    let thumb = img.resize_exact(width, height, FilterType::Triangle);

    // JPEG has no alpha channel.
    let rgb = DynamicImage::ImageRgb8(thumb.to_rgb8());
    let mut out = Cursor::new(Vec::new());
    rgb.write_to(&mut out, ImageFormat::Jpeg)?;
    Ok(out.into_inner())
}
