//! app
//! Probe, show, maybe benchmark, show. Each unit of work runs on a background
//! thread while the calling thread waits and does the rendering.

use std::thread;

use tracing::info;

use crate::error::{Error, Result};
use crate::harness::{TestResult, TimingHarness};
use crate::probe::{DiagnosticResult, Prober};
use crate::report::{self, DisplaySink};
use crate::runtime::AccelRuntime;

#[derive(Debug, Clone)]
pub struct Outcome { pub diagnostic: DiagnosticResult, pub benchmark: Option<TestResult> }

fn in_background<T: Send>(work: impl FnOnce() -> T + Send) -> Result<T> {
  thread::scope(|s| s.spawn(work).join()).map_err(|_| Error::WorkloadPanicked("background worker panicked".into()))
}

/// Sink errors are the only thing that propagates; probe and harness
/// failures arrive as data.
pub fn run_diagnostic_and_test(
  prober: &Prober, harness: &TimingHarness, runtime: &dyn AccelRuntime, sink: &mut dyn DisplaySink,
) -> Result<Outcome> {
  let diagnostic = in_background(|| prober.probe())?;
  sink.show_diagnostic(&report::format_diagnostic(&diagnostic))?;

  if !diagnostic.can_use_gpu() {
    info!("GPU unavailable, skipping benchmark");
    sink.show_benchmark(report::SKIP_MESSAGE)?;
    return Ok(Outcome { diagnostic, benchmark: None });
  }

  let benchmark = in_background(|| harness.run(runtime))?;
  sink.show_benchmark(&report::format_test_result(&benchmark))?;
  Ok(Outcome { diagnostic, benchmark: Some(benchmark) })
}
