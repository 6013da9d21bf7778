//! workload
//! The synthetic compute burn timed by the harness.

use std::fmt;
use std::hint::black_box;

use rand::Rng;

use crate::cpu;
use crate::error::{Error, Result};

pub const DEFAULT_TRIG_ITERATIONS: u64 = 1_000_000;
pub const DEFAULT_MATMUL_ROUNDS: u64 = 1_000;
pub const DEFAULT_MATMUL_DIM: usize = 100;
/// Three `dim x dim` f32 buffers stay under ~200 MiB at this size.
pub const MAX_MATMUL_DIM: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workload {
  /// `iterations` evaluations of `sin(i) * cos(i)`.
  Trig { iterations: u64 },
  /// `rounds` dense `dim x dim` multiplies of freshly randomized matrices.
  Matmul { rounds: u64, dim: usize },
}

impl Default for Workload {
  fn default() -> Self { Workload::Trig { iterations: DEFAULT_TRIG_ITERATIONS } }
}

impl Workload {
  pub fn matmul() -> Self { Workload::Matmul { rounds: DEFAULT_MATMUL_ROUNDS, dim: DEFAULT_MATMUL_DIM } }

  pub fn validate(&self) -> Result<()> {
    match *self {
      Workload::Trig { iterations: 0 } => Err(Error::InvalidWorkload("trig iterations must be > 0".into())),
      Workload::Matmul { rounds: 0, .. } => Err(Error::InvalidWorkload("matmul rounds must be > 0".into())),
      Workload::Matmul { dim: 0, .. } => Err(Error::InvalidWorkload("matmul dim must be > 0".into())),
      Workload::Matmul { dim, .. } if dim > MAX_MATMUL_DIM || dim.checked_mul(dim).is_none() =>
        Err(Error::InvalidWorkload(format!("matmul dim {dim} exceeds {MAX_MATMUL_DIM}"))),
      _ => Ok(()),
    }
  }

  /// Runs the workload to completion on the calling thread and returns a checksum.
  pub fn run(&self) -> Result<f64> {
    self.validate()?;
    let checksum = match *self {
      Workload::Trig { iterations } => cpu::trig_accumulate(black_box(iterations)),
      Workload::Matmul { rounds, dim } => {
        let mut rng = rand::rng();
        let mut checksum = 0.0f64;
        for _ in 0..rounds {
          let a: Vec<f32> = (0..dim * dim).map(|_| rng.random()).collect();
          let b: Vec<f32> = (0..dim * dim).map(|_| rng.random()).collect();
          let mut c = vec![0.0f32; dim * dim];
          cpu::sgemm(dim, dim, dim, 1.0, 0.0, &a, &b, &mut c);
          checksum += black_box(&c).iter().map(|&x| x as f64).sum::<f64>();
        }
        checksum
      }
    };
    Ok(black_box(checksum))
  }
}

impl fmt::Display for Workload {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Workload::Trig { iterations } => write!(f, "trig x{iterations}"),
      Workload::Matmul { rounds, dim } => write!(f, "matmul {dim}x{dim} x{rounds}"),
    }
  }
}
