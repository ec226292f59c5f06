use std::collections::HashMap;
use std::path::Path;

use crate::capture::{CaptureError, CaptureReader, PacketRecord};

/// Frequency tables built in a single forward pass over a packet sequence.
///
/// Every record contributes to `total_packets`, `total_bytes`, and its
/// protocol counter; only records that carry an IP layer contribute to the
/// source counter. The pass itself performs no I/O.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrafficTally {
    pub total_packets: u64,
    pub total_bytes: u64,
    pub protocol_counts: HashMap<String, u64>,
    pub source_counts: HashMap<String, u64>,
}

impl TrafficTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, record: &PacketRecord) {
        self.total_packets += 1;
        self.total_bytes += record.length as u64;

        *self
            .protocol_counts
            .entry(record.protocol.clone())
            .or_insert(0) += 1;

        if let Some(src) = &record.src_ip {
            *self.source_counts.entry(src.clone()).or_insert(0) += 1;
        }
    }

    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a PacketRecord>,
    {
        let mut tally = Self::new();
        for record in records {
            tally.observe(record);
        }
        tally
    }

    /// Top source addresses by count descending. Ties are broken by address
    /// string ascending so the result is deterministic.
    pub fn top_sources(&self, n: usize) -> Vec<(String, u64)> {
        let mut entries: Vec<(String, u64)> = self
            .source_counts
            .iter()
            .map(|(addr, count)| (addr.clone(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries.truncate(n);
        entries
    }

    /// Protocol labels by count descending, ties by label ascending. The
    /// report and both protocol charts share this ordering.
    pub fn protocols_by_count(&self) -> Vec<(String, u64)> {
        let mut entries: Vec<(String, u64)> = self
            .protocol_counts
            .iter()
            .map(|(label, count)| (label.clone(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }
}

/// Read a capture file and tally it in one pass. Capture failures propagate
/// unchanged; an empty capture yields an empty tally.
pub fn analyze_capture<P: AsRef<Path>>(path: P) -> Result<TrafficTally, CaptureError> {
    let mut reader = CaptureReader::open(path)?;
    let mut tally = TrafficTally::new();
    while let Some(record) = reader.next_record()? {
        tally.observe(&record);
    }
    Ok(tally)
}
