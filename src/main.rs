use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::debug;
use traffic_report::analysis::analyze_capture;
use traffic_report::charts::render_all;
use traffic_report::config::Config;
use traffic_report::report::{print_summary, write_json_report};

#[derive(Parser)]
#[command(name = "traffic-report")]
#[command(about = "Summarize a captured packet trace and render traffic charts")]
struct Cli {
    /// Path to the capture file (.pcap / .pcapng)
    capture: PathBuf,

    #[arg(short, long, help = "Configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Directory for rendered chart images")]
    output_dir: Option<String>,

    #[arg(short = 'n', long, help = "Number of top source addresses to report")]
    top: Option<usize>,

    #[arg(long, help = "Also write the summary as JSON to this path")]
    json: Option<PathBuf>,

    #[arg(long, help = "Skip chart rendering")]
    no_charts: bool,

    #[arg(short, long, help = "Enable debug logging")]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }

    // Load configuration, CLI flags override file values
    let mut config = match &cli.config {
        Some(path) => match Config::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path, e);
                process::exit(1);
            }
        },
        None => Config::default(),
    };
    if let Some(dir) = cli.output_dir {
        config.charts.output_dir = dir;
    }
    if let Some(top) = cli.top {
        config.report.top_sources = top;
    }

    let tally = analyze_capture(&cli.capture)?;
    debug!(
        "tallied {} packets across {} protocols and {} sources",
        tally.total_packets,
        tally.protocol_counts.len(),
        tally.source_counts.len()
    );

    print_summary(&tally, config.report.top_sources)?;
    println!();

    if let Some(path) = &cli.json {
        write_json_report(path, &tally, config.report.top_sources)?;
        println!("Wrote {}", path.display());
    }

    if !cli.no_charts {
        let written = render_all(&tally, &config.charts, config.report.top_sources)?;
        for path in written {
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}
