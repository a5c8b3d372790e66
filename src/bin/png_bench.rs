use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use microbench::benches::decode::{self, DecodeConfig, DEFAULT_ITERATIONS};
use microbench::cli::{self, CommonArgs};
use microbench::report::{report, LineStyle};
use microbench::{logging, Clock};

#[derive(Parser, Debug)]
#[command(name = "png-bench")]
#[command(about = "Time repeated decoding of a PNG file to RGBA8")]
struct Args {
    /// Image to decode, e.g. test.png.
    #[arg(value_name = "IMAGE")]
    image: PathBuf,

    #[arg(long, default_value_t = DEFAULT_ITERATIONS, value_parser = clap::value_parser!(u32).range(1..))]
    iterations: u32,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> anyhow::Result<()> {
    let args: Args = cli::parse_or_exit();
    logging::init(args.common.quiet);

    let cfg = DecodeConfig {
        path: args.image,
        iterations: args.iterations,
    };
    let harness = args.common.harness(Clock::Monotonic);
    let result = decode::run(&cfg, &harness)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    report(&result, LineStyle::Repeated, &mut out)?;
    out.flush()?;

    args.common.emit_json("png-bench", &harness, std::slice::from_ref(&result))?;
    Ok(())
}
