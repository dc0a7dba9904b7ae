//! Execution strategy selection.
//!
//! Work is always partitioned by output row. Each row is computed from
//! read-only inputs in a fixed order, so the sequential and parallel
//! executors produce identical bytes.

use core::fmt;
use core::str::FromStr;

use log::debug;

use crate::{Error, Result};

/// Caller-facing backend selector.
///
/// `Parallel` is spelled `openmp` (or `parallel`) at string boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Backend {
    Single,
    Parallel,
    #[default]
    Auto,
}

/// Resolved strategy for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Executor {
    Sequential,
    Parallel,
}

pub const fn parallel_available() -> bool {
    cfg!(feature = "parallel")
}

impl Backend {
    pub fn resolve(self) -> Result<Executor> {
        let exec = match self {
            Self::Single => Executor::Sequential,
            Self::Parallel if parallel_available() => Executor::Parallel,
            Self::Parallel => return Err(Error::BackendUnavailable(self)),
            Self::Auto if parallel_available() => Executor::Parallel,
            Self::Auto => Executor::Sequential,
        };
        debug!("backend {self} resolved to {exec:?}");
        Ok(exec)
    }
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "single" => Ok(Self::Single),
            "openmp" | "parallel" => Ok(Self::Parallel),
            "auto" => Ok(Self::Auto),
            other => Err(Error::invalid_parameter(format!(
                "backend must be one of single, openmp, auto (got `{other}`)"
            ))),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Single => "single",
            Self::Parallel => "openmp",
            Self::Auto => "auto",
        })
    }
}

/// Pins a resolved executor so multi-stage operations can hand it to each
/// stage and get the same strategy back.
impl From<Executor> for Backend {
    fn from(exec: Executor) -> Self {
        match exec {
            Executor::Sequential => Self::Single,
            Executor::Parallel => Self::Parallel,
        }
    }
}

impl Executor {
    /// Calls `f(y, row)` for every `row_len`-sized row of `out`.
    ///
    /// Returns only after every row has been written.
    pub fn fill_rows<T, F>(self, out: &mut [T], row_len: usize, f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync + Send,
    {
        if out.is_empty() {
            return;
        }
        assert!(row_len > 0, "row length must be non-zero");
        debug_assert_eq!(out.len() % row_len, 0, "buffer must hold whole rows");

        match self {
            Self::Sequential => {
                for (y, row) in out.chunks_mut(row_len).enumerate() {
                    f(y, row);
                }
            }
            #[cfg(feature = "parallel")]
            Self::Parallel => {
                use rayon::prelude::*;

                out.par_chunks_mut(row_len)
                    .enumerate()
                    .for_each(|(y, row)| f(y, row));
            }
            #[cfg(not(feature = "parallel"))]
            Self::Parallel => {
                for (y, row) in out.chunks_mut(row_len).enumerate() {
                    f(y, row);
                }
            }
        }
    }
}
