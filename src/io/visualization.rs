//! Frame capture and GIF generation for solver visualization

use crate::{
    io::configuration::VIEWER_MIN_FRAME_DELAY_MS,
    io::error::{AlgorithmError, Result, WithOperation, invalid_parameter},
    spatial::grid::{Color, PixelGrid, Point},
};
use image::{Delay, Frame, Rgba, RgbaImage};
use std::path::Path;

/// A single collapse event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollapseEvent {
    /// Output cell that was collapsed
    pub cell: Point,
    /// Canonical point of the chosen pattern
    pub pattern: Point,
    /// Number of cells collapsed before this one
    pub iteration: usize,
}

/// Records collapse events of one solve for later rendering
///
/// Frames are rendered by stamping each collapsed cell's source block;
/// cells not yet collapsed show the mean color of the source.
pub struct VisualizationCapture {
    events: Vec<CollapseEvent>,
    cells: Point,
    region_size: usize,
}

impl VisualizationCapture {
    /// Prepare a capture for a grid of `cells` cells of `region_size` pixels
    pub fn new(cells: Point, region_size: usize) -> Self {
        Self {
            events: Vec::with_capacity(cells.x.saturating_mul(cells.y)),
            cells,
            region_size,
        }
    }

    /// Record a collapse
    pub fn record_collapse(&mut self, cell: Point, pattern: Point) {
        let iteration = self.events.len();
        self.events.push(CollapseEvent {
            cell,
            pattern,
            iteration,
        });
    }

    /// Discard events from a failed attempt
    pub fn reset(&mut self) {
        self.events.clear();
    }

    /// All recorded events
    pub fn events(&self) -> &[CollapseEvent] {
        &self.events
    }

    /// Number of recorded events
    pub const fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Export the captured collapses as an animated GIF
    ///
    /// Frames are skipped when `frame_delay_ms` is below what viewers
    /// honor, keeping the apparent speed. The last frame holds longer.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No collapses were captured
    /// - The frame dimensions are invalid
    /// - File system operations fail
    /// - GIF encoding fails
    pub fn export_gif(&self, source: &PixelGrid, output_path: &Path, frame_delay_ms: u32) -> Result<()> {
        if self.events.is_empty() {
            return Err(invalid_parameter(
                "visualization",
                &output_path.display(),
                &"no collapses captured",
            ));
        }

        let frame_delay_ms = frame_delay_ms.max(1);
        let effective_delay_ms = frame_delay_ms.max(VIEWER_MIN_FRAME_DELAY_MS);
        let skip_factor = if frame_delay_ms < VIEWER_MIN_FRAME_DELAY_MS {
            VIEWER_MIN_FRAME_DELAY_MS.div_ceil(frame_delay_ms) as usize
        } else {
            1
        };

        let frames = self.generate_frames(source, effective_delay_ms, skip_factor)?;

        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| AlgorithmError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }

        let file = std::fs::File::create(output_path).map_err(|e| AlgorithmError::FileSystem {
            path: output_path.to_path_buf(),
            operation: "create file",
            source: e,
        })?;

        let mut encoder = image::codecs::gif::GifEncoder::new(file);
        encoder
            .encode_frames(frames)
            .map_err(|e| AlgorithmError::ImageExport {
                path: output_path.to_path_buf(),
                source: e,
            })?;

        tracing::debug!(
            path = %output_path.display(),
            events = self.events.len(),
            "wrote visualization"
        );
        Ok(())
    }

    fn generate_frames(
        &self,
        source: &PixelGrid,
        delay_ms: u32,
        skip_factor: usize,
    ) -> Result<Vec<Frame>> {
        let width = self.cells.x.saturating_mul(self.region_size);
        let height = self.cells.y.saturating_mul(self.region_size);
        if width == 0 || height == 0 || u32::try_from(width.max(height)).is_err() {
            return Err(invalid_parameter(
                "visualization size",
                &format!("{width}x{height}"),
                &"frame dimensions must be positive and fit in u32",
            ));
        }

        let mut canvas = RgbaImage::from_pixel(width as u32, height as u32, rgba(source.mean_color()));
        let mut frames = Vec::new();
        let frame_total = self.events.len() / skip_factor + 3;
        frames
            .try_reserve(frame_total)
            .with_operation("visualization frames", frame_total)?;

        frames.push(Self::frame(&canvas, delay_ms));
        for (count, event) in self.events.iter().enumerate() {
            self.stamp(&mut canvas, source, event);
            if (count + 1) % skip_factor == 0 {
                frames.push(Self::frame(&canvas, delay_ms));
            }
        }
        if self.events.len() % skip_factor != 0 {
            frames.push(Self::frame(&canvas, delay_ms));
        }

        frames.push(Self::frame(&canvas, delay_ms.saturating_mul(25)));
        Ok(frames)
    }

    fn stamp(&self, canvas: &mut RgbaImage, source: &PixelGrid, event: &CollapseEvent) {
        let size = self.region_size;
        for dy in 0..size {
            for dx in 0..size {
                let Some(color) = source.get(Point::new(event.pattern.x + dx, event.pattern.y + dy))
                else {
                    continue;
                };
                let x = event.cell.x * size + dx;
                let y = event.cell.y * size + dy;
                if let Some(pixel) = canvas.get_pixel_mut_checked(x as u32, y as u32) {
                    *pixel = rgba(color);
                }
            }
        }
    }

    fn frame(canvas: &RgbaImage, delay_ms: u32) -> Frame {
        Frame::from_parts(
            canvas.clone(),
            0,
            0,
            Delay::from_numer_denom_ms(delay_ms, 1),
        )
    }
}

const fn rgba(color: Color) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, 255])
}
