pub mod settings;

pub use settings::{ChartsConfig, Config, ReportConfig};
