use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use pf_gallery::{
    BenchConfig, OpParams, Operation, Size, apply, load_image, run_bench, save_image, write_report,
};
use pixfoundry::{Backend, BorderKind};

#[derive(Parser, Debug)]
#[command(name = "pf_gallery")]
#[command(about = "Run PixFoundry operations on image files and benchmark the backends")]
struct Cli {
    /// Size of the rayon pool used by the parallel backend.
    #[arg(long, global = true)]
    threads: Option<usize>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply one operation to an image file.
    Run(RunArgs),
    /// Time every operation on both backends and write a report.
    Bench(BenchArgs),
}

#[derive(Args, Debug, Clone)]
struct RunArgs {
    #[arg(value_enum)]
    op: Operation,
    #[arg(long, required = true)]
    input: PathBuf,
    #[arg(long, required = true)]
    output: PathBuf,
    #[arg(long, default_value = "auto", value_parser = parse_backend)]
    backend: Backend,
    #[arg(long, default_value = "reflect", value_parser = parse_border)]
    border: BorderKind,
    #[arg(long, default_value_t = 0)]
    border_value: u8,
    #[command(flatten)]
    params: OpParams,
}

#[derive(Args, Debug, Clone)]
struct BenchArgs {
    /// Comma-separated `WIDTHxHEIGHT` list.
    #[arg(long, value_delimiter = ',', default_value = "256x256,512x512")]
    sizes: Vec<Size>,
    #[arg(long, default_value_t = 2)]
    warmup: usize,
    #[arg(long, default_value_t = 10)]
    repeat: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Restrict to these operations; all by default.
    #[arg(long, value_enum, value_delimiter = ',')]
    ops: Vec<Operation>,
    #[arg(long, default_value = "bench_out")]
    out: PathBuf,
}

fn parse_backend(s: &str) -> Result<Backend, String> {
    s.parse().map_err(|e: pixfoundry::Error| e.to_string())
}

fn parse_border(s: &str) -> Result<BorderKind, String> {
    s.parse().map_err(|e: pixfoundry::Error| e.to_string())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("configuring the rayon thread pool")?;
    }

    match cli.cmd {
        Command::Run(args) => run_op(args),
        Command::Bench(args) => run_benchmark(args),
    }
}

fn run_op(args: RunArgs) -> Result<()> {
    let img = load_image(&args.input)?;
    let border = args.border.with_value(args.border_value);
    if !args.op.uses_border() && args.border != BorderKind::Reflect {
        log::warn!("{} ignores --border", args.op.name());
    }

    let out = apply(args.op, &img.as_view(), &args.params, border, args.backend).with_context(
        || {
            format!(
                "running {} on {} ({}x{} {:?})",
                args.op.name(),
                args.input.display(),
                img.width(),
                img.height(),
                img.channels()
            )
        },
    )?;
    save_image(&args.output, &out.as_view())?;
    info!(
        "{} -> {} ({}x{} {:?})",
        args.op.name(),
        args.output.display(),
        out.width(),
        out.height(),
        out.channels()
    );
    Ok(())
}

fn run_benchmark(args: BenchArgs) -> Result<()> {
    let config = BenchConfig {
        sizes: args.sizes,
        warmup: args.warmup,
        repeat: args.repeat,
        seed: args.seed,
        ops: if args.ops.is_empty() {
            Operation::ALL.to_vec()
        } else {
            args.ops
        },
        params: OpParams::default(),
    };

    let report = run_bench(&config)?;
    write_report(&args.out, &report)?;

    let mismatches = report.cases.iter().filter(|c| !c.outputs_match).count();
    info!(
        "wrote {} cases to {} ({} parity mismatches)",
        report.cases.len(),
        args.out.display(),
        mismatches
    );
    if mismatches > 0 {
        anyhow::bail!("{mismatches} cases produced different bytes on the two backends");
    }
    Ok(())
}
