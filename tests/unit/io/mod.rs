pub mod configuration;
pub mod image;
pub mod progress;
