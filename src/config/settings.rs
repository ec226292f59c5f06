use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub charts: ChartsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    pub top_sources: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChartsConfig {
    pub output_dir: String,
    pub width: u32,
    pub height: u32,
    pub pie_size: u32,
    pub protocol_bar: String,
    pub top_sources_bar: String,
    pub protocol_pie: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { top_sources: 10 }
    }
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
            width: 1000,
            height: 600,
            pie_size: 800,
            protocol_bar: "protocol_usage.png".to_string(),
            top_sources_bar: "top_source_ips.png".to_string(),
            protocol_pie: "protocol_distribution.png".to_string(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_artifact_contract() {
        let config = Config::default();
        assert_eq!(config.report.top_sources, 10);
        assert_eq!(config.charts.protocol_bar, "protocol_usage.png");
        assert_eq!(config.charts.top_sources_bar, "top_source_ips.png");
        assert_eq!(config.charts.protocol_pie, "protocol_distribution.png");
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str("[report]\ntop_sources = 5\n").unwrap();
        assert_eq!(config.report.top_sources, 5);
        assert_eq!(config.charts.output_dir, ".");
    }
}
