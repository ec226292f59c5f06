use std::path::Path;

use log::debug;
use pcap::Capture;
use thiserror::Error;

use super::decoder::{decode_frame, PacketRecord};

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Cannot open capture file '{0}': {1}")]
    OpenFailed(String, String),

    #[error("Failed to read from capture '{0}': {1}")]
    ReadFailed(String, String),
}

/// Reads decoded packet records out of an on-disk pcap/pcapng capture.
///
/// The file is consumed in one forward pass; records are produced eagerly,
/// one per call, and end-of-file is `Ok(None)` rather than an error.
pub struct CaptureReader {
    capture: Capture<pcap::Offline>,
    path: String,
    records_read: u64,
}

impl CaptureReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CaptureError> {
        let display = path.as_ref().display().to_string();
        let capture = Capture::from_file(path.as_ref())
            .map_err(|e| CaptureError::OpenFailed(display.clone(), e.to_string()))?;

        debug!("opened capture file {}", display);
        Ok(CaptureReader {
            capture,
            path: display,
            records_read: 0,
        })
    }

    pub fn next_record(&mut self) -> Result<Option<PacketRecord>, CaptureError> {
        match self.capture.next_packet() {
            Ok(packet) => {
                self.records_read += 1;
                Ok(Some(decode_frame(packet.data)))
            }
            Err(pcap::Error::NoMorePackets) => {
                debug!("capture {} exhausted after {} records", self.path, self.records_read);
                Ok(None)
            }
            Err(e) => Err(CaptureError::ReadFailed(self.path.clone(), e.to_string())),
        }
    }

    pub fn records_read(&self) -> u64 {
        self.records_read
    }
}
