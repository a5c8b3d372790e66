use std::path::PathBuf;

use clap::Parser;
use microbench::benches::text::{
    self, CosmicShaper, LanguageSelection, TextBench, TextBenchConfig, DEFAULT_BENCHMARK_NAME, DEFAULT_DATA_DIR,
    DEFAULT_FONT_SIZE, DEFAULT_ITERATIONS,
};
use microbench::cli::{self, CommonArgs};
use microbench::logging;

#[derive(Parser, Debug)]
#[command(name = "text-bench")]
#[command(about = "Time text layout extents for every string of per-language catalogs (XML output)")]
struct Args {
    /// Language name (e.g. "es" for Spanish), or "ALL". Can be provided multiple times.
    #[arg(short, long = "lang", value_name = "LANG", action = clap::ArgAction::Append)]
    langs: Vec<String>,

    /// Directory where the .dat files live.
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Name for the benchmark run.
    #[arg(short, long, default_value = DEFAULT_BENCHMARK_NAME)]
    name: String,

    /// Output file. If omitted, the report goes to stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Passes over each catalog.
    #[arg(long, default_value_t = DEFAULT_ITERATIONS, value_parser = clap::value_parser!(u32).range(1..))]
    iterations: u32,

    #[arg(long, default_value_t = DEFAULT_FONT_SIZE)]
    font_size: f32,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> anyhow::Result<()> {
    let args: Args = cli::parse_or_exit();
    logging::init(args.common.quiet);

    let config = TextBenchConfig {
        selection: LanguageSelection::from_args(&args.langs),
        data_dir: args.data_dir,
        name: args.name,
        output: args.output,
        iterations: args.iterations,
        font_size: args.font_size,
    };
    config.validate()?;
    let languages = config.selection.resolve(&config.data_dir)?;
    let out = text::open_output(config.output.as_deref())?;
    let shaper = CosmicShaper::new(config.font_size);
    let harness = args.common.harness(text::DEFAULT_CLOCK);

    let mut bench = TextBench::new(config, shaper, harness);
    let results = bench.run(&languages, out)?;

    let measured: Vec<_> = results.into_iter().map(|r| r.result).collect();
    args.common.emit_json("text-bench", &harness, &measured)?;
    Ok(())
}
