use std::io::{self, Write};

use clap::Parser;
use microbench::benches::raster::{self, RasterConfig, DEFAULT_HEIGHT, DEFAULT_ITERATIONS, DEFAULT_WIDTH};
use microbench::cli::{self, CommonArgs};
use microbench::report::{report, LineStyle};
use microbench::{logging, Clock};

#[derive(Parser, Debug)]
#[command(name = "raster-bench")]
#[command(about = "Time clearing and filling random rectangles and circles on a pixmap")]
struct Args {
    #[arg(default_value_t = DEFAULT_WIDTH, value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    #[arg(default_value_t = DEFAULT_HEIGHT, value_parser = clap::value_parser!(u32).range(1..))]
    height: u32,

    #[arg(default_value_t = DEFAULT_ITERATIONS, value_parser = clap::value_parser!(u32).range(1..))]
    iterations: u32,

    /// Seed for shape positions, sizes and colors.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> anyhow::Result<()> {
    let args: Args = cli::parse_or_exit();
    logging::init(args.common.quiet);

    let cfg = RasterConfig {
        width: args.width,
        height: args.height,
        iterations: args.iterations,
        seed: args.seed,
    };
    let harness = args.common.harness(Clock::Monotonic);
    let result = raster::run(&cfg, &harness)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(
        out,
        "Raster Benchmark - Width: {}, Height: {}, Iterations: {}",
        cfg.width, cfg.height, cfg.iterations
    )?;
    report(&result, LineStyle::Totals, &mut out)?;
    out.flush()?;

    args.common.emit_json("raster-bench", &harness, std::slice::from_ref(&result))?;
    Ok(())
}
