use std::io::Write;

use crate::analysis::TrafficTally;
use crate::utils::formatting::format_bytes;

/// Write the human-readable traffic summary: totals, the full protocol tally
/// sorted by count, and the top source addresses.
pub fn write_summary(w: &mut impl Write, tally: &TrafficTally, top_n: usize) -> std::io::Result<()> {
    writeln!(w, "Total packets: {}", tally.total_packets)?;
    writeln!(w, "Total bytes: {}", format_bytes(tally.total_bytes))?;

    writeln!(w)?;
    writeln!(w, "Protocol counts:")?;
    for (label, count) in tally.protocols_by_count() {
        writeln!(w, "{}: {}", label, count)?;
    }

    writeln!(w)?;
    writeln!(w, "Top source addresses:")?;
    let top = tally.top_sources(top_n);
    if top.is_empty() {
        writeln!(w, "(no IP traffic captured)")?;
    } else {
        for (addr, count) in top {
            writeln!(w, "{}: {}", addr, count)?;
        }
    }

    Ok(())
}

pub fn print_summary(tally: &TrafficTally, top_n: usize) -> std::io::Result<()> {
    let stdout = std::io::stdout();
    write_summary(&mut stdout.lock(), tally, top_n)
}
