use std::io::{self, Write};

use clap::Parser;
use microbench::benches::memory::{self, MemoryConfig, DEFAULT_SIZE_BYTES};
use microbench::cli::{self, CommonArgs};
use microbench::report::{report_all, LineStyle};
use microbench::{format_bytes, logging, Clock};

#[derive(Parser, Debug)]
#[command(name = "memtest")]
#[command(about = "Time allocation, memset, memcpy and memmove over one large buffer")]
struct Args {
    /// Buffer size in bytes.
    #[arg(value_name = "SIZE_BYTES")]
    size_bytes: Option<u64>,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> anyhow::Result<()> {
    let args: Args = cli::parse_or_exit();
    logging::init(args.common.quiet);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let size_bytes = match args.size_bytes {
        Some(size) => {
            writeln!(out, "Using buffer size from command line: {}", format_bytes(size))?;
            size
        }
        None => {
            writeln!(out, "To specify a custom buffer size: memtest [SIZE_BYTES]")?;
            writeln!(out, "Using built in buffer size: {}", format_bytes(DEFAULT_SIZE_BYTES))?;
            DEFAULT_SIZE_BYTES
        }
    };

    let harness = args.common.harness(Clock::Monotonic);
    let results = memory::run(&MemoryConfig { size_bytes }, &harness)?;
    report_all(&results, LineStyle::Throughput, &mut out)?;
    out.flush()?;

    args.common.emit_json("memtest", &harness, &results)?;
    Ok(())
}
