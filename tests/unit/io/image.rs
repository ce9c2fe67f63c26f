//! Tests for loading and saving pixel grids in PNG and plain-text PPM

#[cfg(test)]
mod tests {
    use std::fs;
    use tilecollapse::io::image::{load_pixel_grid, save_pixel_grid};
    use tilecollapse::spatial::grid::{Color, PixelGrid, Point};
    use tilecollapse::{AlgorithmError, Result};

    fn sample() -> Result<PixelGrid> {
        PixelGrid::from_fn(5, 3, |p| {
            Color::new(p.x as u8 * 50, p.y as u8 * 100, 255 - p.x as u8)
        })
    }

    // Tests PNG output decodes to the same pixels
    // Verified by swapping red and blue when packing raw bytes
    #[test]
    fn test_png_round_trip() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("out.png");
        let grid = sample()?;

        save_pixel_grid(&grid, &path)?;
        assert_eq!(load_pixel_grid(&path)?, grid);
        Ok(())
    }

    // Tests .ppm destinations are plain-text pixmaps
    // Verified by encoding PPM destinations with the binary subtype
    #[test]
    fn test_ppm_is_ascii() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.ppm");
        let grid = sample()?;

        save_pixel_grid(&grid, &path)?;
        let text = fs::read_to_string(&path)?;
        assert!(text.starts_with("P3"));
        assert!(text.contains("255"));
        assert_eq!(load_pixel_grid(&path)?, grid);
        Ok(())
    }

    // Tests a hand-written P3 file decodes row-major
    // Verified by transposing coordinates while decoding
    #[test]
    fn test_load_plain_pixmap() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("tiny.ppm");
        fs::write(&path, "P3\n2 2\n255\n255 0 0  0 255 0\n0 0 255  9 9 9\n")?;

        let grid = load_pixel_grid(&path)?;
        assert_eq!((grid.width(), grid.height()), (2, 2));
        assert_eq!(grid.get(Point::new(1, 0)), Some(Color::new(0, 255, 0)));
        assert_eq!(grid.get(Point::new(0, 1)), Some(Color::new(0, 0, 255)));
        Ok(())
    }

    // Tests malformed contents are reported as input problems
    // Verified by mapping every decode failure to ImageLoad
    #[test]
    fn test_malformed_input() -> Result<()> {
        let dir = tempfile::tempdir()?;

        let unknown = dir.path().join("noise.png");
        fs::write(&unknown, "definitely not an image")?;
        assert!(matches!(
            load_pixel_grid(&unknown),
            Err(AlgorithmError::MalformedInput { .. })
        ));

        let empty = dir.path().join("empty.ppm");
        fs::write(&empty, "P3\n0 2\n255\n")?;
        assert!(matches!(
            load_pixel_grid(&empty),
            Err(AlgorithmError::MalformedInput { .. })
        ));

        let truncated = dir.path().join("short.ppm");
        fs::write(&truncated, "P3\n2 2\n255\n1 2 3 4 5 6\n")?;
        assert!(matches!(
            load_pixel_grid(&truncated),
            Err(AlgorithmError::MalformedInput { .. } | AlgorithmError::ImageLoad { .. })
        ));
        Ok(())
    }

    // Tests a missing file is a file system error
    // Verified by mapping open failures to MalformedInput
    #[test]
    fn test_missing_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        assert!(matches!(
            load_pixel_grid(&dir.path().join("absent.png")),
            Err(AlgorithmError::FileSystem { .. })
        ));
        Ok(())
    }
}
