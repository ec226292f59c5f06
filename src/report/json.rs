use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::analysis::TrafficTally;

/// Machine-readable counterpart of the text summary, for downstream
/// consumers that ingest the numbers instead of the charts.
#[derive(Debug, Serialize)]
pub struct SummaryReport {
    pub total_packets: u64,
    pub total_bytes: u64,
    pub protocol_counts: Vec<LabelCount>,
    pub top_sources: Vec<LabelCount>,
}

#[derive(Debug, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: u64,
}

impl SummaryReport {
    pub fn from_tally(tally: &TrafficTally, top_n: usize) -> Self {
        SummaryReport {
            total_packets: tally.total_packets,
            total_bytes: tally.total_bytes,
            protocol_counts: to_entries(tally.protocols_by_count()),
            top_sources: to_entries(tally.top_sources(top_n)),
        }
    }
}

fn to_entries(pairs: Vec<(String, u64)>) -> Vec<LabelCount> {
    pairs
        .into_iter()
        .map(|(label, count)| LabelCount { label, count })
        .collect()
}

pub fn write_json_report(path: &Path, tally: &TrafficTally, top_n: usize) -> Result<()> {
    let report = SummaryReport::from_tally(tally, top_n);
    let file = File::create(path)
        .with_context(|| format!("Cannot create JSON report {:?}", path))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &report)
        .with_context(|| format!("Cannot write JSON report {:?}", path))?;
    Ok(())
}
