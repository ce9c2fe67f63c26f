use crate::{
    algorithm::{
        catalog::PatternCatalog,
        compositor::composite,
        solver::{SolvedGrid, Solver},
    },
    analysis::extraction::{PatternModel, extract_patterns},
    io::configuration::{
        DEFAULT_MAX_ATTEMPTS, DEFAULT_OUTPUT_CELLS, DEFAULT_REGION_SIZE, DEFAULT_SEED,
        GIF_FRAME_DELAY_MS, MAX_OUTPUT_CELLS,
    },
    io::error::{AlgorithmError, Result, invalid_parameter},
    io::visualization::VisualizationCapture,
    spatial::grid::{PixelGrid, Point},
};
use std::path::Path;

/// Parameters of one synthesis run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SynthesisConfig {
    /// Edge length of extracted regions and output cells in pixels
    pub region_size: usize,
    /// Output size in cells
    pub output_cells: Point,
    /// Seed of the first attempt; attempt `n` uses `seed + n`
    pub seed: u64,
    /// Solve attempts before giving up
    pub max_attempts: usize,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            region_size: DEFAULT_REGION_SIZE,
            output_cells: Point::new(DEFAULT_OUTPUT_CELLS, DEFAULT_OUTPUT_CELLS),
            seed: DEFAULT_SEED,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl SynthesisConfig {
    /// Check every parameter is in range
    ///
    /// # Errors
    ///
    /// Returns an error if the region size or attempt count is zero, or an
    /// output dimension is zero or above `MAX_OUTPUT_CELLS`
    pub fn validate(&self) -> Result<()> {
        if self.region_size == 0 {
            return Err(invalid_parameter(
                "region_size",
                &self.region_size,
                &"must be at least 1",
            ));
        }
        for (parameter, value) in [("width", self.output_cells.x), ("height", self.output_cells.y)]
        {
            if value == 0 || value > MAX_OUTPUT_CELLS {
                return Err(invalid_parameter(
                    parameter,
                    &value,
                    &format!("must be between 1 and {MAX_OUTPUT_CELLS} cells"),
                ));
            }
        }
        if self.max_attempts == 0 {
            return Err(invalid_parameter(
                "max_attempts",
                &self.max_attempts,
                &"at least one attempt is required",
            ));
        }
        Ok(())
    }

    /// Seed used by the zero-based `attempt`
    pub const fn attempt_seed(&self, attempt: usize) -> u64 {
        self.seed.wrapping_add(attempt as u64)
    }
}

/// Progress notifications emitted while synthesizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisEvent {
    /// A fresh solve began from an uncollapsed grid
    AttemptStarted {
        /// Zero-based attempt number
        attempt: usize,
    },
    /// A cell collapsed in the current attempt
    CellCollapsed {
        /// Cell that collapsed
        cell: Point,
        /// Collapsed cells so far in this attempt
        collapsed: usize,
        /// Cells in the grid
        total: usize,
    },
}

/// Result of a successful synthesis
#[derive(Debug, Clone)]
pub struct Synthesis {
    /// Composited output image
    pub image: PixelGrid,
    /// Canonical point chosen per cell
    pub solution: SolvedGrid,
    /// Attempts used, including the successful one
    pub attempts: usize,
}

/// Extracts a model from a source image and synthesizes outputs from it
///
/// Contradictions restart the solve from scratch with the next seed until
/// the attempt budget runs out.
pub struct Synthesizer {
    config: SynthesisConfig,
    source: PixelGrid,
    model: PatternModel,
    catalog: PatternCatalog,
    /// Optional visualization capture of the last attempt
    pub visualization: Option<VisualizationCapture>,
}

impl Synthesizer {
    /// Validate `config` and build the pattern model of `source`
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the region does not
    /// fit in the source, or allocation fails during extraction
    pub fn new(source: PixelGrid, config: SynthesisConfig) -> Result<Self> {
        config.validate()?;
        let model = extract_patterns(&source, config.region_size)?;
        let catalog = PatternCatalog::from_adjacency(model.adjacency())?;

        tracing::info!(
            patterns = catalog.len(),
            width = config.output_cells.x,
            height = config.output_cells.y,
            "prepared pattern catalog"
        );

        Ok(Self {
            config,
            source,
            model,
            catalog,
            visualization: None,
        })
    }

    /// Active configuration
    pub const fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Source image
    pub const fn source(&self) -> &PixelGrid {
        &self.source
    }

    /// Extracted pattern model
    pub const fn model(&self) -> &PatternModel {
        &self.model
    }

    /// Dense pattern catalog used by the solver
    pub const fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    /// Number of cells in the output grid
    pub const fn total_cells(&self) -> usize {
        self.config.output_cells.x * self.config.output_cells.y
    }

    /// Record collapses for GIF export
    pub fn enable_visualization(&mut self) {
        self.visualization = Some(VisualizationCapture::new(
            self.config.output_cells,
            self.config.region_size,
        ));
    }

    /// Write the captured collapses of the last attempt as a GIF
    ///
    /// # Errors
    ///
    /// Returns an error if visualization was not enabled or the export fails
    pub fn export_visualization(&self, path: &Path) -> Result<()> {
        let capture = self.visualization.as_ref().ok_or_else(|| {
            invalid_parameter("visualization", &"disabled", &"call enable_visualization first")
        })?;
        capture.export_gif(&self.source, path, GIF_FRAME_DELAY_MS)
    }

    /// Synthesize an output image
    ///
    /// # Errors
    ///
    /// Returns `RestartsExhausted` if every attempt hit a contradiction, or
    /// any non-recoverable error immediately
    pub fn run(&mut self) -> Result<Synthesis> {
        self.run_with(|_| {})
    }

    /// Synthesize an output image, reporting progress to `observer`
    ///
    /// # Errors
    ///
    /// Returns `RestartsExhausted` if every attempt hit a contradiction, or
    /// any non-recoverable error immediately
    pub fn run_with<F>(&mut self, mut observer: F) -> Result<Synthesis>
    where
        F: FnMut(SynthesisEvent),
    {
        let mut last_cell = Point::default();

        for attempt in 0..self.config.max_attempts {
            observer(SynthesisEvent::AttemptStarted { attempt });
            if let Some(capture) = self.visualization.as_mut() {
                capture.reset();
            }

            match self.attempt(attempt, &mut observer) {
                Ok(solution) => {
                    let image = composite(&solution, &self.source, self.config.region_size)?;
                    tracing::info!(attempts = attempt + 1, "synthesis complete");
                    return Ok(Synthesis {
                        image,
                        solution,
                        attempts: attempt + 1,
                    });
                }
                Err(error) if error.is_recoverable() => {
                    if let AlgorithmError::SolveContradiction { cell, collapsed } = error {
                        tracing::warn!(
                            attempt,
                            x = cell.x,
                            y = cell.y,
                            collapsed,
                            "contradiction, restarting"
                        );
                        last_cell = cell;
                    }
                }
                Err(other) => return Err(other),
            }
        }

        Err(AlgorithmError::RestartsExhausted {
            attempts: self.config.max_attempts,
            last_cell,
        })
    }

    fn attempt<F>(&mut self, attempt: usize, observer: &mut F) -> Result<SolvedGrid>
    where
        F: FnMut(SynthesisEvent),
    {
        let seed = self.config.attempt_seed(attempt);
        tracing::debug!(attempt, seed, "starting solve");

        let catalog = &self.catalog;
        let visualization = &mut self.visualization;
        let solver = Solver::new(catalog, self.config.output_cells, seed)?;

        solver.run_with(|state, cell, pattern| {
            if let (Some(capture), Some(point)) = (visualization.as_mut(), catalog.point(pattern)) {
                capture.record_collapse(cell, point);
            }
            observer(SynthesisEvent::CellCollapsed {
                cell,
                collapsed: state.collapsed_count(),
                total: state.total_cells(),
            });
        })
    }
}
