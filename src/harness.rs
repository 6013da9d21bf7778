//! harness
//! Delegate smoke test followed by two timed runs of the same CPU workload.
//! The run labeled GPU never touches the delegate, so the speedup it reports
//! sits near 1.0 and says nothing about the accelerator.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::runtime::{AccelRuntime, DelegateOptions};
use crate::workload::Workload;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunLabel { Cpu, Gpu }

impl fmt::Display for RunLabel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self { RunLabel::Cpu => "CPU", RunLabel::Gpu => "GPU" })
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
  pub success: bool,
  pub cpu_time_ms: u64,
  pub gpu_time_ms: u64,
  pub speedup: f32,
  pub error: Option<String>,
  pub delegate: Option<String>,
  pub workload: String,
}

/// `cpu / gpu`, or exactly 1.0 when the GPU run took no measurable time.
pub fn speedup(cpu_time_ms: u64, gpu_time_ms: u64) -> f32 {
  if gpu_time_ms > 0 { cpu_time_ms as f32 / gpu_time_ms as f32 } else { 1.0 }
}

impl TestResult {
  pub fn passed(cpu_time_ms: u64, gpu_time_ms: u64, delegate: Option<String>, workload: &Workload) -> Self {
    Self {
      success: true, cpu_time_ms, gpu_time_ms, speedup: speedup(cpu_time_ms, gpu_time_ms),
      error: None, delegate, workload: workload.to_string(),
    }
  }

  pub fn failed(error: impl fmt::Display, workload: &Workload) -> Self {
    let mut error = error.to_string();
    if error.is_empty() { error = "Unknown error".to_string() }
    Self {
      success: false, cpu_time_ms: 0, gpu_time_ms: 0, speedup: 1.0,
      error: Some(error), delegate: None, workload: workload.to_string(),
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct TimingHarness { pub workload: Workload, pub options: DelegateOptions }

impl TimingHarness {
  pub fn new(workload: Workload, options: DelegateOptions) -> Self { Self { workload, options } }

  /// Times one run of the workload, in whole milliseconds.
  pub fn run_timed_workload(&self, label: RunLabel) -> Result<u64> {
    self.workload.validate()?;
    let start = Instant::now();
    let checksum = panic::catch_unwind(AssertUnwindSafe(|| self.workload.run()))
      .map_err(|payload| Error::WorkloadPanicked(panic_message(payload.as_ref())))??;
    let elapsed = start.elapsed().as_millis() as u64;
    info!(%label, elapsed_ms = elapsed, checksum, workload = %self.workload, "timed run");
    Ok(elapsed)
  }

  /// Creates and releases a delegate. The handle is dropped before returning
  /// on every path.
  pub fn smoke_test(&self, runtime: &dyn AccelRuntime) -> Result<String> {
    debug!(backend = runtime.backend().as_str(), options = ?self.options, "testing delegate creation");
    let delegate = runtime.create_delegate(&self.options)?;
    let name = delegate.name().to_string();
    drop(delegate);
    debug!(delegate = %name, "delegate smoke test passed");
    Ok(name)
  }

  fn try_run(&self, runtime: &dyn AccelRuntime) -> Result<TestResult> {
    let delegate = self.smoke_test(runtime)?;
    let cpu = self.run_timed_workload(RunLabel::Cpu)?;
    let gpu = self.run_timed_workload(RunLabel::Gpu)?;
    Ok(TestResult::passed(cpu, gpu, Some(delegate), &self.workload))
  }

  pub fn run(&self, runtime: &dyn AccelRuntime) -> TestResult {
    match self.try_run(runtime) {
      Ok(result) => { info!(cpu_ms = result.cpu_time_ms, gpu_ms = result.gpu_time_ms, speedup = result.speedup, "benchmark complete"); result }
      Err(e) => { warn!(error = %e, "GPU test failed"); TestResult::failed(e, &self.workload) }
    }
  }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
  if let Some(s) = payload.downcast_ref::<&str>() { s.to_string() }
  else if let Some(s) = payload.downcast_ref::<String>() { s.clone() }
  else { "unknown panic".to_string() }
}
