use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use microbench::logging;
use microbench::plot::{self, PlotConfig, PlotLayout, TextPainter, DEFAULT_MIN_STRINGS};

#[derive(Parser, Debug)]
#[command(name = "text-plot")]
#[command(about = "Compare text-bench XML reports and chart time per character as a PNG")]
struct Args {
    /// Reports to compare, oldest first.
    #[arg(value_name = "REPORT", required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// Where to write the PNG chart.
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Ignore languages with fewer laid-out strings than this.
    #[arg(long, default_value_t = DEFAULT_MIN_STRINGS)]
    min_strings: u64,

    /// Only log warnings and errors.
    #[arg(short, long, default_value_t = false)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let args: Args = microbench::cli::parse_or_exit();
    logging::init(args.quiet);

    let cfg = PlotConfig {
        inputs: args.inputs,
        output: args.output,
        min_strings: args.min_strings,
    };
    let sets = cfg.load_sets()?;
    let rows = plot::compare(&sets);
    if rows.is_empty() {
        tracing::warn!("no language is present in every report");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    plot::write_table(&sets, &rows, &mut out)?;
    out.flush()?;

    let layout = PlotLayout::default();
    let names: Vec<&str> = sets.iter().map(|s| s.name.as_str()).collect();
    let pixmap = layout.render(&names, &rows, &mut TextPainter::new(layout.label_size))?;
    plot::save_png(&pixmap, &cfg.output)?;
    tracing::info!(path = %cfg.output.display(), "wrote chart");
    Ok(())
}
