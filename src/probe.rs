//! probe
//! Capability probing: OpenCL library on disk, one system property, and the
//! runtime's delegate compatibility flag, folded into a `DiagnosticResult`.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::runtime::AccelRuntime;

/// vendor 32, vendor 64, system 32, system 64
pub const OPENCL_CANDIDATES: [&str; 4] = [
  "/vendor/lib/libOpenCL.so",
  "/vendor/lib64/libOpenCL.so",
  "/system/lib/libOpenCL.so",
  "/system/lib64/libOpenCL.so",
];

pub const DEFAULT_GPU_PROPERTY: &str = "ro.hardware.vulkan";
pub const GPU_INFO_UNAVAILABLE: &str = "GPU info unavailable";
pub const OPENCL_NOT_FOUND: &str = "Not found";

/// Only the inputs are stored; availability and usability are derived on read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticResult {
  opencl_path: Option<PathBuf>,
  gpu_info: String,
  delegate_supported: bool,
}

impl DiagnosticResult {
  pub fn new(opencl_path: Option<PathBuf>, gpu_info: String, delegate_supported: bool) -> Self {
    let gpu_info = if gpu_info.trim().is_empty() { GPU_INFO_UNAVAILABLE.to_string() } else { gpu_info };
    Self { opencl_path, gpu_info, delegate_supported }
  }

  pub fn opencl_available(&self) -> bool { self.opencl_path.is_some() }
  pub fn opencl_path(&self) -> Option<&Path> { self.opencl_path.as_deref() }
  pub fn gpu_info(&self) -> &str { &self.gpu_info }
  pub fn delegate_supported(&self) -> bool { self.delegate_supported }
  pub fn can_use_gpu(&self) -> bool { self.opencl_available() && self.delegate_supported }

  pub fn opencl_path_display(&self) -> String {
    self.opencl_path().map_or_else(|| OPENCL_NOT_FOUND.to_string(), |p| p.display().to_string())
  }
}

#[derive(Serialize)]
struct DiagnosticView<'a> {
  opencl_available: bool,
  opencl_path: Option<&'a Path>,
  gpu_info: &'a str,
  delegate_supported: bool,
  can_use_gpu: bool,
}

impl Serialize for DiagnosticResult {
  fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    DiagnosticView {
      opencl_available: self.opencl_available(), opencl_path: self.opencl_path(), gpu_info: self.gpu_info(),
      delegate_supported: self.delegate_supported, can_use_gpu: self.can_use_gpu(),
    }.serialize(serializer)
  }
}

/// Reads one named system property.
pub trait PropertyReader: Send + Sync {
  fn read(&self, name: &str) -> Result<String>;
}

/// `getprop <name>`, first line of stdout.
#[derive(Debug, Clone)]
pub struct GetProp { program: String }

impl GetProp {
  pub fn new() -> Self { Self::with_program("getprop") }
  pub fn with_program(program: impl Into<String>) -> Self { Self { program: program.into() } }
}

impl Default for GetProp { fn default() -> Self { Self::new() } }

impl PropertyReader for GetProp {
  fn read(&self, name: &str) -> Result<String> {
    let command = format!("{} {}", self.program, name);
    let output = Command::new(&self.program).arg(name).output()
      .map_err(|source| Error::PropertyRead { command: command.clone(), source })?;
    if !output.status.success() { return Err(Error::PropertyStatus { command, status: output.status }) }
    let stdout = String::from_utf8_lossy(&output.stdout);
    match stdout.lines().next().map(str::trim) {
      Some(line) if !line.is_empty() => Ok(line.to_string()),
      _ => Err(Error::PropertyEmpty(name.to_string())),
    }
  }
}

/// Last existing candidate under `sysroot`, in candidate order.
pub fn find_opencl(sysroot: &Path) -> Option<PathBuf> {
  let mut found = None;
  for candidate in OPENCL_CANDIDATES {
    let path = sysroot.join(candidate.trim_start_matches('/'));
    if path.exists() {
      debug!(path = %path.display(), "found OpenCL library");
      found = Some(path);
    }
  }
  found
}

pub struct Prober {
  sysroot: PathBuf,
  property: String,
  reader: Box<dyn PropertyReader>,
  runtime: Arc<dyn AccelRuntime>,
}

impl Prober {
  pub fn new(runtime: Arc<dyn AccelRuntime>) -> Self {
    Self { sysroot: PathBuf::from("/"), property: DEFAULT_GPU_PROPERTY.to_string(), reader: Box::new(GetProp::new()), runtime }
  }

  pub fn sysroot(mut self, sysroot: impl Into<PathBuf>) -> Self { self.sysroot = sysroot.into(); self }
  pub fn property(mut self, property: impl Into<String>) -> Self { self.property = property.into(); self }
  pub fn reader(mut self, reader: impl PropertyReader + 'static) -> Self { self.reader = Box::new(reader); self }

  pub fn gpu_info(&self) -> String {
    match self.reader.read(&self.property) {
      Ok(value) => value,
      Err(e) => { warn!(property = %self.property, error = %e, "GPU info unavailable"); GPU_INFO_UNAVAILABLE.to_string() }
    }
  }

  pub fn probe(&self) -> DiagnosticResult {
    let opencl_path = find_opencl(&self.sysroot);
    let gpu_info = self.gpu_info();
    let delegate_supported = self.runtime.is_delegate_supported();
    debug!(backend = self.runtime.backend().as_str(), delegate_supported, "delegate compatibility");

    let result = DiagnosticResult::new(opencl_path, gpu_info, delegate_supported);
    info!(
      opencl = result.opencl_available(), delegate = result.delegate_supported(), can_use_gpu = result.can_use_gpu(),
      "diagnostic complete"
    );
    result
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn can_use_gpu_is_conjunction() {
    let path = || Some(PathBuf::from("/vendor/lib64/libOpenCL.so"));
    assert!(DiagnosticResult::new(path(), "adreno".into(), true).can_use_gpu());
    assert!(!DiagnosticResult::new(path(), "adreno".into(), false).can_use_gpu());
    assert!(!DiagnosticResult::new(None, "adreno".into(), true).can_use_gpu());
    assert!(!DiagnosticResult::new(None, "adreno".into(), false).can_use_gpu());
  }

  #[test]
  fn derived_flags_track_inputs() {
    for (path, supported) in [(Some(PathBuf::from("/system/lib/libOpenCL.so")), true), (Some(PathBuf::from("/system/lib/libOpenCL.so")), false), (None, true), (None, false)] {
      let d = DiagnosticResult::new(path.clone(), "mali".into(), supported);
      assert_eq!(d.opencl_available(), path.is_some());
      assert_eq!(d.opencl_path(), path.as_deref());
      assert_eq!(d.can_use_gpu(), d.opencl_available() && d.delegate_supported());

      let v = serde_json::to_value(&d).unwrap();
      assert_eq!(v["opencl_available"], d.opencl_available());
      assert_eq!(v["delegate_supported"], supported);
      assert_eq!(v["can_use_gpu"], d.opencl_available() && supported);
      assert_eq!(v["gpu_info"], "mali");
    }
  }

  #[test]
  fn empty_gpu_info_becomes_sentinel() {
    assert_eq!(DiagnosticResult::new(None, "  ".into(), false).gpu_info(), GPU_INFO_UNAVAILABLE);
  }

  #[test]
  fn missing_path_displays_not_found() {
    assert_eq!(DiagnosticResult::new(None, "x".into(), false).opencl_path_display(), "Not found");
  }

  #[test]
  fn missing_getprop_binary_is_a_read_error() {
    let err = GetProp::with_program("gpuprobe-no-such-binary").read(DEFAULT_GPU_PROPERTY).unwrap_err();
    assert!(matches!(err, Error::PropertyRead { .. }));
  }

  #[cfg(unix)]
  #[test]
  fn getprop_takes_first_line() {
    // `echo <name>` prints the property name back
    assert_eq!(GetProp::with_program("echo").read("adreno").unwrap(), "adreno");
  }

  #[cfg(unix)]
  #[test]
  fn blank_first_line_is_empty_property() {
    // `echo ""` prints a lone newline
    assert!(matches!(GetProp::with_program("echo").read(""), Err(Error::PropertyEmpty(_))));
  }

  #[cfg(unix)]
  #[test]
  fn nonzero_exit_is_a_status_error() {
    assert!(matches!(GetProp::with_program("false").read("x"), Err(Error::PropertyStatus { .. })));
  }
}
