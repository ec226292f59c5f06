use std::fmt;
use std::path::{Path, PathBuf};

use log::{info, warn};
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use plotters::style::FontTransform;
use thiserror::Error;

use crate::analysis::TrafficTally;
use crate::config::ChartsConfig;
use crate::utils::formatting::truncate_label;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Cannot create chart output directory '{0}': {1}")]
    OutputDir(String, String),

    #[error("Failed to render chart '{0}': {1}")]
    Render(String, String),
}

fn render_err(path: &Path, err: impl fmt::Display) -> ChartError {
    ChartError::Render(path.display().to_string(), err.to_string())
}

const PROTOCOL_BAR_COLOR: RGBColor = RGBColor(102, 178, 255);
const SOURCE_BAR_COLOR: RGBColor = RGBColor(255, 160, 64);

const PIE_PALETTE: &[RGBColor] = &[
    RGBColor(102, 178, 255),
    RGBColor(255, 160, 64),
    RGBColor(120, 200, 120),
    RGBColor(220, 100, 100),
    RGBColor(170, 130, 220),
    RGBColor(200, 180, 90),
    RGBColor(100, 200, 200),
    RGBColor(230, 140, 190),
];

/// Render the three chart artifacts for a finished tally into the configured
/// output directory, returning the paths written.
///
/// A chart whose backing tally is empty is skipped with a warning; an empty
/// capture therefore produces no images and no error.
pub fn render_all(
    tally: &TrafficTally,
    config: &ChartsConfig,
    top_n: usize,
) -> Result<Vec<PathBuf>, ChartError> {
    let out_dir = Path::new(&config.output_dir);
    std::fs::create_dir_all(out_dir)
        .map_err(|e| ChartError::OutputDir(config.output_dir.clone(), e.to_string()))?;

    let mut written = Vec::new();
    let protocols = tally.protocols_by_count();
    let top_sources = tally.top_sources(top_n);

    if protocols.is_empty() {
        warn!("no protocols tallied; skipping {}", config.protocol_bar);
    } else {
        let path = out_dir.join(&config.protocol_bar);
        render_bar_chart(
            &protocols,
            &path,
            (config.width, config.height),
            "Protocol Usage in Captured Traffic",
            "Protocol",
            &PROTOCOL_BAR_COLOR,
            false,
        )?;
        written.push(path);
    }

    if top_sources.is_empty() {
        warn!("no source addresses tallied; skipping {}", config.top_sources_bar);
    } else {
        let path = out_dir.join(&config.top_sources_bar);
        render_bar_chart(
            &top_sources,
            &path,
            (config.width, config.height),
            "Top Source IP Addresses",
            "Source IP",
            &SOURCE_BAR_COLOR,
            true,
        )?;
        written.push(path);
    }

    if protocols.is_empty() {
        warn!("no protocols tallied; skipping {}", config.protocol_pie);
    } else {
        let path = out_dir.join(&config.protocol_pie);
        render_pie_chart(
            &protocols,
            &path,
            config.pie_size,
            "Protocol Distribution",
        )?;
        written.push(path);
    }

    for path in &written {
        info!("rendered chart {}", path.display());
    }
    Ok(written)
}

fn render_bar_chart(
    data: &[(String, u64)],
    path: &Path,
    size: (u32, u32),
    caption: &str,
    x_desc: &str,
    color: &RGBColor,
    rotate_labels: bool,
) -> Result<(), ChartError> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(|e| render_err(path, e))?;

    let y_max = data.iter().map(|(_, count)| *count).max().unwrap_or(0).max(1);
    let x_label_area = if rotate_labels { 120 } else { 60 };

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(x_label_area)
        .y_label_area_size(60)
        .build_cartesian_2d((0..data.len()).into_segmented(), 0u64..y_max + y_max / 10 + 1)
        .map_err(|e| render_err(path, e))?;

    let label_style = if rotate_labels {
        ("sans-serif", 14)
            .into_font()
            .transform(FontTransform::Rotate90)
    } else {
        ("sans-serif", 14).into_font()
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(x_desc)
        .y_desc("Number of Packets")
        .x_labels(data.len())
        .x_label_style(label_style)
        .x_label_formatter(&|value| match value {
            SegmentValue::CenterOf(i) => data
                .get(*i)
                .map(|(label, _)| truncate_label(label, 20))
                .unwrap_or_default(),
            _ => String::new(),
        })
        .draw()
        .map_err(|e| render_err(path, e))?;

    chart
        .draw_series(data.iter().enumerate().map(|(i, (_, count))| {
            Rectangle::new(
                [
                    (SegmentValue::Exact(i), 0u64),
                    (SegmentValue::Exact(i + 1), *count),
                ],
                color.mix(0.85).filled(),
            )
        }))
        .map_err(|e| render_err(path, e))?;

    root.present().map_err(|e| render_err(path, e))?;
    Ok(())
}

fn render_pie_chart(
    data: &[(String, u64)],
    path: &Path,
    size: u32,
    caption: &str,
) -> Result<(), ChartError> {
    let root = BitMapBackend::new(path, (size, size)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| render_err(path, e))?;
    let root = root
        .titled(caption, ("sans-serif", 28))
        .map_err(|e| render_err(path, e))?;

    let center = (size as i32 / 2, size as i32 / 2);
    let radius = size as f64 * 0.32;
    let sizes: Vec<f64> = data.iter().map(|(_, count)| *count as f64).collect();
    let labels: Vec<String> = data
        .iter()
        .map(|(label, _)| truncate_label(label, 20))
        .collect();
    let colors: Vec<RGBColor> = (0..data.len())
        .map(|i| PIE_PALETTE[i % PIE_PALETTE.len()])
        .collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(-90.0);
    pie.label_style(("sans-serif", 18).into_font().color(&BLACK));
    pie.percentages(("sans-serif", 14).into_font().color(&WHITE));

    root.draw(&pie).map_err(|e| render_err(path, e))?;
    root.present().map_err(|e| render_err(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartsConfig;

    #[test]
    fn empty_tally_skips_all_charts() {
        let dir = std::env::temp_dir().join(format!("traffic-report-empty-{}", std::process::id()));
        let config = ChartsConfig {
            output_dir: dir.display().to_string(),
            ..ChartsConfig::default()
        };

        let written = render_all(&TrafficTally::new(), &config, 10).unwrap();
        assert!(written.is_empty());
        assert!(!dir.join(&config.protocol_bar).exists());
        assert!(!dir.join(&config.top_sources_bar).exists());
        assert!(!dir.join(&config.protocol_pie).exists());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn unwritable_output_dir_is_an_error() {
        let config = ChartsConfig {
            output_dir: "/dev/null/not-a-directory".to_string(),
            ..ChartsConfig::default()
        };

        let result = render_all(&TrafficTally::new(), &config, 10);
        assert!(matches!(result, Err(ChartError::OutputDir(_, _))));
    }
}
