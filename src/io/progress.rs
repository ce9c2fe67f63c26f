//! Collapse progress display for single files and batches

use crate::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;

/// Displayed state of one input file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct FileState {
    name: String,
    collapsed: usize,
    total: usize,
    attempt: usize,
    done: bool,
}

/// Coordinates progress bars while synthesizing one or more files
///
/// Shows one bar per file for small batches; larger batches add an overall
/// file counter and keep only the most recent files on screen.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    file_bars: Vec<ProgressBar>,
    files: Vec<FileState>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

static CELL_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{msg} [{bar:30.cyan/blue}] {prefix}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Files: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

impl ProgressManager {
    /// Create a manager drawing to stderr
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    /// Create a manager that draws nothing
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        Self {
            multi_progress: MultiProgress::with_draw_target(target),
            batch_bar: None,
            file_bars: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Create bars for `file_count` files
    pub fn initialize(&mut self, file_count: usize) {
        if file_count > MAX_INDIVIDUAL_PROGRESS_BARS + 1 {
            let batch_bar = ProgressBar::new(file_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }

        for _ in 0..file_count.min(MAX_INDIVIDUAL_PROGRESS_BARS) {
            let bar = ProgressBar::new(0);
            bar.set_style(CELL_STYLE.clone());
            self.file_bars.push(self.multi_progress.add(bar));
        }
    }

    /// Begin tracking file `index` with `total_cells` cells to collapse
    pub fn start_file(&mut self, index: usize, path: &Path, total_cells: usize) {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        if index >= self.files.len() {
            self.files.resize(index + 1, FileState::default());
        }
        if let Some(state) = self.files.get_mut(index) {
            *state = FileState {
                name,
                total: total_cells,
                ..FileState::default()
            };
        }
        self.update_bars();
    }

    /// Report the number of collapsed cells in the current attempt
    pub fn update_cells(&mut self, index: usize, collapsed: usize) {
        if let Some(state) = self.files.get_mut(index) {
            state.collapsed = collapsed;
        }
        self.update_bars();
    }

    /// Note that a new attempt restarted from an empty grid
    pub fn restart(&mut self, index: usize, attempt: usize) {
        if let Some(state) = self.files.get_mut(index) {
            state.attempt = attempt;
            state.collapsed = 0;
        }
        self.update_bars();
    }

    /// Mark file `index` as finished
    pub fn complete_file(&mut self, index: usize) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }
        if let Some(state) = self.files.get_mut(index) {
            state.done = true;
            state.collapsed = state.total;
        }
        self.update_bars();
    }

    /// Clear every bar
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All files processed");
        }
        let _ = self.multi_progress.clear();
    }

    /// Show the most recently started files
    fn update_bars(&self) {
        let active: Vec<&FileState> = self.files.iter().filter(|s| !s.name.is_empty()).collect();
        let start = active.len().saturating_sub(MAX_INDIVIDUAL_PROGRESS_BARS);
        let visible = active.get(start..).unwrap_or(&[]);

        for (bar_index, state) in visible.iter().enumerate() {
            if let Some(bar) = self.file_bars.get(bar_index) {
                bar.set_length(state.total as u64);
                bar.set_position(state.collapsed as u64);
                let width = state.total.to_string().len();
                bar.set_message(format!("{:>width$}/{}", state.collapsed, state.total));
                let marker = if state.done { "✓ " } else { "" };
                let retry = if state.attempt > 0 {
                    format!(" (attempt {})", state.attempt + 1)
                } else {
                    String::new()
                };
                bar.set_prefix(format!("{marker}{}{retry}", state.name));
            }
        }

        for bar in self.file_bars.iter().skip(visible.len()) {
            bar.set_length(0);
            bar.set_position(0);
            bar.set_message(String::new());
            bar.set_prefix(String::new());
        }
    }
}
