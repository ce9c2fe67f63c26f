//! Raster decoding into pixel grids and encoding back to PNG or ASCII PPM

use crate::io::error::{AlgorithmError, Result};
use crate::spatial::grid::{Color, PixelGrid};
use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ExtendedColorType, ImageEncoder, ImageError, ImageFormat, ImageReader, RgbImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Whether `path` names a PPM destination
fn is_pnm_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm") || ext.eq_ignore_ascii_case("pnm"))
}

fn decode_failure(path: &Path, error: ImageError) -> AlgorithmError {
    match error {
        ImageError::IoError(_) | ImageError::Limits(_) => AlgorithmError::ImageLoad {
            path: path.to_path_buf(),
            source: error,
        },
        other => AlgorithmError::MalformedInput {
            path: path.to_path_buf(),
            reason: other.to_string(),
        },
    }
}

/// Decode an image file into an opaque RGB pixel grid
///
/// The format is sniffed from the file contents, so plain-text `P3` pixmaps
/// load the same way as PNG. Alpha is discarded.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be opened
/// - The contents are not a valid image
/// - The decoded image has a zero dimension
pub fn load_pixel_grid(path: &Path) -> Result<PixelGrid> {
    let reader = ImageReader::open(path)
        .map_err(|e| AlgorithmError::FileSystem {
            path: path.to_path_buf(),
            operation: "open image",
            source: e,
        })?
        .with_guessed_format()
        .map_err(|e| AlgorithmError::FileSystem {
            path: path.to_path_buf(),
            operation: "read image header",
            source: e,
        })?;

    let rgb = reader
        .decode()
        .map_err(|e| decode_failure(path, e))?
        .to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(AlgorithmError::MalformedInput {
            path: path.to_path_buf(),
            reason: format!("image has zero dimension ({width}x{height})"),
        });
    }

    let grid = PixelGrid::from_fn(width as usize, height as usize, |point| {
        let [r, g, b] = rgb.get_pixel(point.x as u32, point.y as u32).0;
        Color::new(r, g, b)
    })?;

    tracing::debug!(
        path = %path.display(),
        width,
        height,
        "decoded source image"
    );
    Ok(grid)
}

/// Encode a pixel grid to `path`
///
/// Destinations ending in `.ppm` or `.pnm` are written as plain-text `P3`
/// with a maximum sample value of 255; anything else is written as PNG.
/// Missing parent directories are created.
///
/// # Errors
///
/// Returns an error if:
/// - The grid is too large for the image format
/// - The parent directory or file cannot be created
/// - Encoding fails
pub fn save_pixel_grid(grid: &PixelGrid, path: &Path) -> Result<()> {
    let (Ok(width), Ok(height)) = (u32::try_from(grid.width()), u32::try_from(grid.height()))
    else {
        return Err(crate::io::error::invalid_parameter(
            "output size",
            &format!("{}x{}", grid.width(), grid.height()),
            &"dimensions must fit in u32",
        ));
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| AlgorithmError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    let raw: Vec<u8> = grid
        .pixels()
        .flat_map(|color| [color.r, color.g, color.b])
        .collect();
    let export_error = |e| AlgorithmError::ImageExport {
        path: path.to_path_buf(),
        source: e,
    };

    if is_pnm_path(path) {
        let file = File::create(path).map_err(|e| AlgorithmError::FileSystem {
            path: path.to_path_buf(),
            operation: "create file",
            source: e,
        })?;
        PnmEncoder::new(BufWriter::new(file))
            .with_subtype(PnmSubtype::Pixmap(SampleEncoding::Ascii))
            .write_image(&raw, width, height, ExtendedColorType::Rgb8)
            .map_err(export_error)?;
    } else {
        let image = RgbImage::from_raw(width, height, raw).ok_or_else(|| {
            crate::io::error::computation_error("png export", &"pixel buffer size mismatch")
        })?;
        image
            .save_with_format(path, ImageFormat::Png)
            .map_err(export_error)?;
    }

    tracing::debug!(path = %path.display(), width, height, "wrote output image");
    Ok(())
}
