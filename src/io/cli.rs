//! Command-line interface for synthesizing textures from one image or a directory of images

use crate::algorithm::executor::{SynthesisConfig, SynthesisEvent, Synthesizer};
use crate::io::configuration::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_OUTPUT_CELLS, DEFAULT_REGION_SIZE, DEFAULT_SEED, OUTPUT_SUFFIX,
    SOURCE_EXTENSIONS,
};
use crate::io::error::{AlgorithmError, Result, invalid_parameter};
use crate::io::image::{load_pixel_grid, save_pixel_grid};
use crate::io::progress::ProgressManager;
use crate::spatial::grid::Point;
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "tilecollapse")]
#[command(
    author,
    version,
    about = "Synthesize textures by tiled wave function collapse over source regions"
)]
/// Command-line arguments for the synthesizer
pub struct Cli {
    /// Source image or directory of images
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Edge length of extracted regions in pixels
    #[arg(short, long, default_value_t = DEFAULT_REGION_SIZE)]
    pub region_size: usize,

    /// Output width in cells
    #[arg(short = 'w', long, default_value_t = DEFAULT_OUTPUT_CELLS)]
    pub width: usize,

    /// Output height in cells (defaults to the width)
    #[arg(short = 'H', long)]
    pub height: Option<usize>,

    /// Random seed of the first attempt
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Solve attempts before giving up on contradictions
    #[arg(short, long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub attempts: usize,

    /// Write an animated GIF of the collapse order next to each output
    #[arg(short = 'g', long)]
    pub visualize: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,

    /// Increase log detail (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Output file for a single target, or output directory for a batch
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Algorithm parameters selected on the command line
    pub fn synthesis_config(&self) -> SynthesisConfig {
        SynthesisConfig {
            region_size: self.region_size,
            output_cells: Point::new(self.width, self.height.unwrap_or(self.width)),
            seed: self.seed,
            max_attempts: self.attempts,
        }
    }
}

/// Whether `path` has one of the accepted source extensions
fn is_source_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SOURCE_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
}

/// Whether `path` is itself a previous result
fn is_result_image(path: &Path) -> bool {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem.ends_with(OUTPUT_SUFFIX))
}

/// Orchestrates single-file and batch synthesis with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or target is invalid, or any
    /// file fails to load, synthesize or save
    pub fn process(&mut self) -> Result<()> {
        self.cli.synthesis_config().validate()?;
        let files = self.collect_files()?;

        if files.is_empty() {
            tracing::info!(target = %self.cli.target.display(), "nothing to process");
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for (index, file) in files.iter().enumerate() {
            self.process_file(file, index)?;
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    /// Inputs selected by the target, minus those with existing outputs
    ///
    /// # Errors
    ///
    /// Returns an error if the target is neither a supported image nor a
    /// readable directory
    pub fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let target = &self.cli.target;

        if target.is_file() {
            if !is_source_image(target) {
                return Err(invalid_parameter(
                    "target",
                    &target.display(),
                    &format!("expected one of: {}", SOURCE_EXTENSIONS.join(", ")),
                ));
            }
            let selected = self.should_process_file(target).then(|| target.clone());
            return Ok(selected.into_iter().collect());
        }

        if target.is_dir() {
            let read_error = |e| AlgorithmError::FileSystem {
                path: target.clone(),
                operation: "read directory",
                source: e,
            };
            let mut files = Vec::new();
            for entry in std::fs::read_dir(target).map_err(read_error)? {
                let path = entry.map_err(read_error)?.path();
                if path.is_file()
                    && is_source_image(&path)
                    && !is_result_image(&path)
                    && self.should_process_file(&path)
                {
                    files.push(path);
                }
            }
            files.sort();
            return Ok(files);
        }

        Err(invalid_parameter(
            "target",
            &target.display(),
            &"must be an image file or directory",
        ))
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = self.output_path(input_path);
        if output_path.exists() {
            // Allow print for user feedback for progress messages
            #[allow(clippy::print_stderr)]
            if !self.cli.quiet {
                eprintln!("Skipping: {} (output exists)", input_path.display());
            }
            false
        } else {
            true
        }
    }

    fn process_file(&mut self, input_path: &Path, index: usize) -> Result<()> {
        let start_time = Instant::now();
        let output_path = self.output_path(input_path);

        let source = load_pixel_grid(input_path)?;
        let mut synthesizer = Synthesizer::new(source, self.cli.synthesis_config())?;
        if self.cli.visualize {
            synthesizer.enable_visualization();
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_file(index, input_path, synthesizer.total_cells());
        }

        let progress = &mut self.progress_manager;
        let synthesis = synthesizer.run_with(|event| {
            let Some(pm) = progress.as_mut() else {
                return;
            };
            match event {
                SynthesisEvent::AttemptStarted { attempt } => pm.restart(index, attempt),
                SynthesisEvent::CellCollapsed { collapsed, .. } => pm.update_cells(index, collapsed),
            }
        })?;

        save_pixel_grid(&synthesis.image, &output_path)?;

        if self.cli.visualize {
            synthesizer.export_visualization(&Self::visualization_path(&output_path))?;
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index);
        }

        tracing::info!(
            input = %input_path.display(),
            output = %output_path.display(),
            attempts = synthesis.attempts,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "wrote result"
        );
        Ok(())
    }

    /// Where the result for `input_path` is written
    pub fn output_path(&self, input_path: &Path) -> PathBuf {
        match &self.cli.output {
            Some(output) if self.cli.target.is_file() => output.clone(),
            Some(directory) => directory.join(Self::result_name(input_path)),
            None => input_path
                .parent()
                .map_or_else(|| PathBuf::from(Self::result_name(input_path)), |parent| {
                    parent.join(Self::result_name(input_path))
                }),
        }
    }

    fn result_name(input_path: &Path) -> String {
        let stem = input_path.file_stem().unwrap_or_default();
        let extension = input_path.extension().unwrap_or_default();
        format!(
            "{}{}.{}",
            stem.to_string_lossy(),
            OUTPUT_SUFFIX,
            extension.to_string_lossy()
        )
    }

    fn visualization_path(output_path: &Path) -> PathBuf {
        output_path.with_extension("gif")
    }
}
