//! Tests for relationships between configuration constants

#[cfg(test)]
mod tests {
    use tilecollapse::io::configuration::{
        DEFAULT_MAX_ATTEMPTS, DEFAULT_OUTPUT_CELLS, DEFAULT_REGION_SIZE, GIF_FRAME_DELAY_MS,
        GROWTH_FACTOR, INITIAL_TABLE_CAPACITY, MAX_LOAD_FACTOR, MAX_OUTPUT_CELLS, OUTPUT_SUFFIX,
        SOURCE_EXTENSIONS, VIEWER_MIN_FRAME_DELAY_MS,
    };

    // Tests table tuning leaves room before the first growth
    // Verified by setting the load factor above one
    #[test]
    fn test_table_tuning() {
        assert!(INITIAL_TABLE_CAPACITY.is_power_of_two());
        assert!(MAX_LOAD_FACTOR > 0.0 && MAX_LOAD_FACTOR < 1.0);
        assert!(GROWTH_FACTOR >= 2);
        assert!((INITIAL_TABLE_CAPACITY as f64 * MAX_LOAD_FACTOR) >= 1.0);
    }

    // Tests defaults form a valid run
    // Verified by setting the default attempts to zero
    #[test]
    fn test_defaults_in_range() {
        assert!(DEFAULT_REGION_SIZE > 0);
        assert!(DEFAULT_OUTPUT_CELLS > 0 && DEFAULT_OUTPUT_CELLS <= MAX_OUTPUT_CELLS);
        assert!(DEFAULT_MAX_ATTEMPTS > 0);
        assert!(GIF_FRAME_DELAY_MS > 0 && GIF_FRAME_DELAY_MS <= VIEWER_MIN_FRAME_DELAY_MS);
    }

    // Tests result names cannot be mistaken for sources by extension alone
    // Verified by emptying the output suffix
    #[test]
    fn test_naming() {
        assert!(!OUTPUT_SUFFIX.is_empty());
        assert!(SOURCE_EXTENSIONS.contains(&"png"));
        assert!(SOURCE_EXTENSIONS.contains(&"ppm"));
        assert!(SOURCE_EXTENSIONS.iter().all(|ext| ext.chars().all(|c| c.is_ascii_lowercase())));
    }
}
