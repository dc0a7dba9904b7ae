//! Support library for the `pf_gallery` binary: image file I/O, the
//! operation registry shared by `run` and `bench`, and the benchmark
//! harness.

pub mod bench;
pub mod io;
pub mod ops;

pub use bench::{BenchConfig, BenchReport, CaseResult, Size, Timing, run_bench, write_report};
pub use io::{load_image, save_image};
pub use ops::{OpParams, Operation, apply};
