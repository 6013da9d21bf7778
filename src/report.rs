//! report
//! Renders results into the two display regions and defines where they go.

use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::harness::TestResult;
use crate::probe::DiagnosticResult;

pub const SKIP_MESSAGE: &str = "GPU unavailable, benchmark skipped";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Format { #[default] Text, Json }

/// The two text regions a run reports into.
pub trait DisplaySink {
  fn show_diagnostic(&mut self, text: &str) -> Result<()>;
  fn show_benchmark(&mut self, text: &str) -> Result<()>;
}

pub fn format_diagnostic(result: &DiagnosticResult) -> String {
  [
    format!("OpenCL Available: {}", result.opencl_available()),
    format!("Library Path: {}", result.opencl_path_display()),
    format!("GPU Info: {}", result.gpu_info()),
    format!("GPU Delegate: {}", if result.delegate_supported() { "Supported" } else { "Not Supported" }),
    format!("GPU Usable: {}", if result.can_use_gpu() { "Yes" } else { "No" }),
  ].join("\n")
}

pub fn format_test_result(result: &TestResult) -> String {
  if !result.success {
    return format!("GPU test failed: {}", result.error.as_deref().unwrap_or("Unknown error"));
  }
  [
    format!("CPU time: {}ms", result.cpu_time_ms),
    format!("GPU time: {}ms", result.gpu_time_ms),
    format!("Speedup: {:.2}x", result.speedup),
    (if result.speedup > 1.0 { "GPU acceleration effective" } else { "No GPU acceleration effect" }).to_string(),
  ].join("\n")
}

/// Writes each region as a titled block.
pub struct TextSink<W: Write> { out: W }

impl<W: Write> TextSink<W> {
  pub fn new(out: W) -> Self { Self { out } }
  pub fn into_inner(self) -> W { self.out }

  fn block(&mut self, title: &str, text: &str) -> Result<()> {
    writeln!(self.out, "== {title} ==")?;
    writeln!(self.out, "{text}")?;
    writeln!(self.out)?;
    Ok(())
  }
}

impl<W: Write> DisplaySink for TextSink<W> {
  fn show_diagnostic(&mut self, text: &str) -> Result<()> { self.block("Diagnostic", text) }
  fn show_benchmark(&mut self, text: &str) -> Result<()> { self.block("Benchmark", text) }
}

/// Drops both regions; used when the caller renders the records itself.
pub struct Discard;

impl DisplaySink for Discard {
  fn show_diagnostic(&mut self, _: &str) -> Result<()> { Ok(()) }
  fn show_benchmark(&mut self, _: &str) -> Result<()> { Ok(()) }
}

#[derive(Debug, Serialize)]
pub struct Report<'a> {
  pub diagnostic: &'a DiagnosticResult,
  pub benchmark: Option<&'a TestResult>,
}

impl Report<'_> {
  pub fn to_json(&self) -> Result<String> { Ok(serde_json::to_string_pretty(self)?) }
}
