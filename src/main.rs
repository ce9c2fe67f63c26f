//! CLI entry point for tiled wave function collapse synthesis

use clap::Parser;
use tilecollapse::io::cli::{Cli, FileProcessor};
use tilecollapse::io::logging::init_logging;

fn main() -> tilecollapse::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    let mut processor = FileProcessor::new(cli);
    processor.process()
}
