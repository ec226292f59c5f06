// Library exports for traffic-report
pub mod analysis;
pub mod capture;
pub mod charts;
pub mod config;
pub mod report;
pub mod utils;

pub use analysis::{analyze_capture, TrafficTally};
pub use capture::{decoder, reader};
pub use charts::render;
pub use config::settings;
pub use report::{json, summary};
pub use utils::formatting;

// Error types
pub use anyhow::{Error, Result};
