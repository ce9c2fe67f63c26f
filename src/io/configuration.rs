//! Pipeline constants and runtime configuration defaults

// Content-addressed table tuning
/// Slot count of a freshly created probing table
pub const INITIAL_TABLE_CAPACITY: usize = 256;
/// Load factor at which a table grows before inserting
pub const MAX_LOAD_FACTOR: f64 = 0.75;
/// Capacity multiplier applied on growth
pub const GROWTH_FACTOR: usize = 2;

/// Edge length of extracted regions in pixels
pub const DEFAULT_REGION_SIZE: usize = 3;

/// Output width and height in cells
pub const DEFAULT_OUTPUT_CELLS: usize = 32;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed output dimension in cells
pub const MAX_OUTPUT_CELLS: usize = 4096;

// Default values for configurable parameters
/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;

/// Solve attempts before giving up on contradictions
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;

// Input and output settings
/// File extensions accepted as source images
pub const SOURCE_EXTENSIONS: [&str; 3] = ["png", "ppm", "pnm"];
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_result";
/// Delay between GIF animation frames
pub const GIF_FRAME_DELAY_MS: u32 = 5;
/// Minimum frame delay that viewers reliably support (in milliseconds)
pub const VIEWER_MIN_FRAME_DELAY_MS: u32 = 50;

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "TILECOLLAPSE_LOG";
