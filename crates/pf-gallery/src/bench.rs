//! Backend timing harness.
//!
//! Every operation runs on both backends for each requested size. Outputs
//! are compared byte for byte; timings are summarised per case and written
//! as JSON plus a Markdown table.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use anyhow::{Context, Result, anyhow, bail};
use log::info;
use pixfoundry::{Backend, BorderMode, Channels, Image, ImageView};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;

use crate::ops::{OpParams, Operation, apply};

/// `WIDTHxHEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl FromStr for Size {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| anyhow!("size must look like WIDTHxHEIGHT, got `{s}`"))?;
        let width: usize = w.trim().parse().with_context(|| format!("width in `{s}`"))?;
        let height: usize = h.trim().parse().with_context(|| format!("height in `{s}`"))?;
        if width == 0 || height == 0 {
            bail!("size must be non-empty, got `{s}`");
        }
        Ok(Self { width, height })
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub sizes: Vec<Size>,
    pub warmup: usize,
    pub repeat: usize,
    pub seed: u64,
    pub ops: Vec<Operation>,
    pub params: OpParams,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            sizes: vec![
                Size {
                    width: 256,
                    height: 256,
                },
                Size {
                    width: 512,
                    height: 512,
                },
            ],
            warmup: 2,
            repeat: 10,
            seed: 0,
            ops: Operation::ALL.to_vec(),
            params: OpParams::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Timing {
    pub median_ms: f64,
    pub mean_ms: f64,
    pub stdev_ms: f64,
}

impl Timing {
    pub fn from_samples(samples_ms: &[f64]) -> Self {
        if samples_ms.is_empty() {
            return Self {
                median_ms: 0.0,
                mean_ms: 0.0,
                stdev_ms: 0.0,
            };
        }
        let mut sorted = samples_ms.to_vec();
        sorted.sort_by(f64::total_cmp);
        let n = sorted.len();
        let median_ms = if n % 2 == 1 {
            sorted[n / 2]
        } else {
            0.5 * (sorted[n / 2 - 1] + sorted[n / 2])
        };
        let mean_ms = sorted.iter().sum::<f64>() / n as f64;
        let var = sorted.iter().map(|v| (v - mean_ms).powi(2)).sum::<f64>() / n as f64;
        Self {
            median_ms,
            mean_ms,
            stdev_ms: var.sqrt(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseResult {
    pub op: Operation,
    pub size: Size,
    pub single: Timing,
    pub parallel: Timing,
    /// `single.median / parallel.median`.
    pub speedup: f64,
    pub outputs_match: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    pub threads: usize,
    pub seed: u64,
    pub warmup: usize,
    pub repeat: usize,
    pub cases: Vec<CaseResult>,
}

pub fn run_bench(config: &BenchConfig) -> Result<BenchReport> {
    if config.repeat == 0 {
        bail!("repeat must be at least 1");
    }

    let mut cases = Vec::with_capacity(config.sizes.len() * config.ops.len());
    for (i, &size) in config.sizes.iter().enumerate() {
        let img = noise_rgb(size, config.seed.wrapping_add(i as u64))?;
        let view = img.as_view();
        for &op in &config.ops {
            let (single_out, single) = time_case(op, &view, config, Backend::Single)?;
            let (parallel_out, parallel) = time_case(op, &view, config, Backend::Parallel)?;
            let outputs_match = single_out == parallel_out;
            if !outputs_match {
                log::warn!("{} {size}: backend outputs differ", op.name());
            }
            let speedup = if parallel.median_ms > 0.0 {
                single.median_ms / parallel.median_ms
            } else {
                0.0
            };
            info!(
                "{:<20} {size:>10} single {:>8.3} ms  parallel {:>8.3} ms  x{speedup:.2}",
                op.name(),
                single.median_ms,
                parallel.median_ms
            );
            cases.push(CaseResult {
                op,
                size,
                single,
                parallel,
                speedup,
                outputs_match,
            });
        }
    }

    Ok(BenchReport {
        threads: rayon::current_num_threads(),
        seed: config.seed,
        warmup: config.warmup,
        repeat: config.repeat,
        cases,
    })
}

fn time_case(
    op: Operation,
    view: &ImageView<'_, u8>,
    config: &BenchConfig,
    backend: Backend,
) -> Result<(Image<u8>, Timing)> {
    let run = || {
        apply(op, view, &config.params, BorderMode::Reflect, backend)
            .with_context(|| format!("running {} on {backend}", op.name()))
    };

    for _ in 0..config.warmup {
        run()?;
    }
    let mut samples = Vec::with_capacity(config.repeat);
    let mut last = None;
    for _ in 0..config.repeat {
        let start = Instant::now();
        let out = run()?;
        samples.push(start.elapsed().as_secs_f64() * 1e3);
        last = Some(out);
    }
    let out = last.ok_or_else(|| anyhow!("no timed runs for {}", op.name()))?;
    Ok((out, Timing::from_samples(&samples)))
}

fn noise_rgb(size: Size, seed: u64) -> Result<Image<u8>> {
    let mut data = vec![0u8; size.width * size.height * 3];
    StdRng::seed_from_u64(seed).fill_bytes(&mut data);
    Image::from_vec(size.width, size.height, Channels::Rgb, data)
        .with_context(|| format!("building {size} benchmark image"))
}

pub fn render_markdown(report: &BenchReport) -> Result<String> {
    let mut md = String::new();
    writeln!(md, "# PixFoundry backend benchmark\n")?;
    writeln!(
        md,
        "threads: {}, seed: {}, warmup: {}, repeat: {}\n",
        report.threads, report.seed, report.warmup, report.repeat
    )?;
    writeln!(
        md,
        "| op | size | single median (ms) | single mean ± sd | parallel median (ms) | parallel mean ± sd | speedup | parity |"
    )?;
    writeln!(md, "|---|---|---:|---:|---:|---:|---:|---|")?;
    for case in &report.cases {
        writeln!(
            md,
            "| {} | {} | {:.3} | {:.3} ± {:.3} | {:.3} | {:.3} ± {:.3} | {:.2}x | {} |",
            case.op.name(),
            case.size,
            case.single.median_ms,
            case.single.mean_ms,
            case.single.stdev_ms,
            case.parallel.median_ms,
            case.parallel.mean_ms,
            case.parallel.stdev_ms,
            case.speedup,
            if case.outputs_match { "ok" } else { "MISMATCH" }
        )?;
    }
    Ok(md)
}

/// Writes `results.json` and `report.md` into `out_dir`.
pub fn write_report(out_dir: &Path, report: &BenchReport) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let json_path = out_dir.join("results.json");
    let bytes = serde_json::to_vec_pretty(report).context("serializing json")?;
    fs::write(&json_path, bytes).with_context(|| format!("writing json {}", json_path.display()))?;

    let md_path = out_dir.join("report.md");
    let md = render_markdown(report).context("rendering markdown report")?;
    fs::write(&md_path, md)
        .with_context(|| format!("writing report {}", md_path.display()))
}
