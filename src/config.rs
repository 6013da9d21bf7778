//! config
//! Command-line surface and the plain `Config` the library runs from.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::probe::DEFAULT_GPU_PROPERTY;
use crate::report::Format;
use crate::runtime::{Backend, DelegateOptions, InferencePreference};
use crate::workload::{Workload, DEFAULT_MATMUL_DIM, DEFAULT_MATMUL_ROUNDS, DEFAULT_TRIG_ITERATIONS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum WorkloadKind { #[default] Trig, Matmul }

#[derive(Debug, Parser)]
#[command(name = "gpuprobe", version)]
#[command(about = "Probe for GPU delegate support and time a synthetic CPU workload")]
pub struct Cli {
  /// Root the OpenCL library paths are resolved under
  #[arg(long, value_name = "PATH", default_value = "/")]
  pub sysroot: PathBuf,

  /// System property describing the GPU
  #[arg(long, value_name = "NAME", default_value = DEFAULT_GPU_PROPERTY)]
  pub property: String,

  #[arg(long, value_enum, default_value_t)]
  pub workload: WorkloadKind,

  /// Trig evaluations per run
  #[arg(long, value_name = "N", default_value_t = DEFAULT_TRIG_ITERATIONS)]
  pub iterations: u64,

  /// Matrix multiplies per run
  #[arg(long, value_name = "N", default_value_t = DEFAULT_MATMUL_ROUNDS)]
  pub rounds: u64,

  /// Square matrix dimension
  #[arg(long, value_name = "N", default_value_t = DEFAULT_MATMUL_DIM)]
  pub dim: usize,

  #[arg(long, value_enum, default_value_t)]
  pub backend: Backend,

  /// Disallow reduced-precision shaders in the delegate
  #[arg(long)]
  pub no_precision_loss: bool,

  #[arg(long, value_enum, default_value_t)]
  pub inference_preference: InferencePreference,

  #[arg(long, value_enum, default_value_t)]
  pub format: Format,

  /// Used when RUST_LOG is unset
  #[arg(long, value_name = "LEVEL", default_value = "warn")]
  pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct Config {
  pub sysroot: PathBuf,
  pub property: String,
  pub workload: Workload,
  pub backend: Backend,
  pub delegate: DelegateOptions,
  pub format: Format,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      sysroot: PathBuf::from("/"), property: DEFAULT_GPU_PROPERTY.to_string(), workload: Workload::default(),
      backend: Backend::default(), delegate: DelegateOptions::default(), format: Format::default(),
    }
  }
}

impl Cli {
  pub fn into_config(self) -> Config {
    let workload = match self.workload {
      WorkloadKind::Trig => Workload::Trig { iterations: self.iterations },
      WorkloadKind::Matmul => Workload::Matmul { rounds: self.rounds, dim: self.dim },
    };
    Config {
      sysroot: self.sysroot, property: self.property, workload, backend: self.backend,
      delegate: DelegateOptions { precision_loss_allowed: !self.no_precision_loss, inference_preference: self.inference_preference },
      format: self.format,
    }
  }
}
