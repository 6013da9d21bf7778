pub mod app;
pub mod config;
pub mod cpu;
pub mod error;
pub mod harness;
pub mod probe;
pub mod report;
pub mod runtime;
pub mod workload;

pub use error::{Error, Result};
pub use harness::{TestResult, TimingHarness};
pub use probe::{DiagnosticResult, Prober};

use std::sync::Arc;

use config::Config;
use runtime::AccelRuntime;

/// Prober and harness wired from a `Config`, sharing one runtime.
pub fn build(config: &Config) -> Result<(Prober, TimingHarness, Arc<dyn AccelRuntime>)> {
  let runtime = config.backend.runtime()?;
  let prober = Prober::new(runtime.clone()).sysroot(&config.sysroot).property(&config.property);
  let harness = TimingHarness::new(config.workload, config.delegate);
  Ok((prober, harness, runtime))
}

#[cfg(feature = "python")]
mod python {
  use pyo3::prelude::*;

  use crate::config::Config;
  use crate::report::Report;

  fn to_pyerr(e: crate::Error) -> PyErr { PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()) }

  /// Runs the capability probe and returns the diagnostic as JSON.
  #[pyfunction] fn probe(py: Python<'_>) -> PyResult<String> {
    let (prober, _, _) = crate::build(&Config::default()).map_err(to_pyerr)?;
    let diagnostic = py.allow_threads(|| prober.probe());
    serde_json::to_string(&diagnostic).map_err(|e| to_pyerr(e.into()))
  }

  /// Probes, then benchmarks when a GPU is usable. Returns the full report as JSON.
  #[pyfunction] fn run_benchmark(py: Python<'_>) -> PyResult<String> {
    let (prober, harness, runtime) = crate::build(&Config::default()).map_err(to_pyerr)?;
    let outcome = py.allow_threads(|| crate::app::run_diagnostic_and_test(&prober, &harness, runtime.as_ref(), &mut crate::report::Discard))
      .map_err(to_pyerr)?;
    Report { diagnostic: &outcome.diagnostic, benchmark: outcome.benchmark.as_ref() }.to_json().map_err(to_pyerr)
  }

  #[pymodule] fn gpuprobe(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(probe, m)?)?;
    m.add_function(wrap_pyfunction!(run_benchmark, m)?)?;
    Ok(())
  }
}
