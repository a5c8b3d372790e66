use std::io::{self, Write};

use clap::Parser;
use microbench::benches::containers::{self, ContainerConfig, DEFAULT_ENTRIES, DEFAULT_TREE_ENTRIES};
use microbench::cli::{self, CommonArgs};
use microbench::report::{report_all, LineStyle};
use microbench::{logging, Clock};

#[derive(Parser, Debug)]
#[command(name = "container-bench")]
#[command(about = "Time insertion, lookup and deletion on std collections")]
struct Args {
    /// Operations per array, list and hash map phase.
    #[arg(long, default_value_t = DEFAULT_ENTRIES, value_parser = clap::value_parser!(u32).range(1..))]
    entries: u32,

    /// Also run the balanced-tree phases.
    #[arg(long, default_value_t = false)]
    tree: bool,

    /// Operations per tree phase.
    #[arg(long, default_value_t = DEFAULT_TREE_ENTRIES, value_parser = clap::value_parser!(u32).range(1..))]
    tree_entries: u32,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> anyhow::Result<()> {
    let args: Args = cli::parse_or_exit();
    logging::init(args.common.quiet);

    let cfg = ContainerConfig {
        entries: args.entries,
        tree_entries: args.tree_entries,
        include_tree: args.tree,
    };
    let harness = args.common.harness(Clock::ProcessCpu);
    let results = containers::run(&cfg, &harness)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    report_all(&results, LineStyle::Seconds, &mut out)?;
    out.flush()?;

    args.common.emit_json("container-bench", &harness, &results)?;
    Ok(())
}
