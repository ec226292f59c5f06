pub mod tally;

pub use tally::{analyze_capture, TrafficTally};
