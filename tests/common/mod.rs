#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use gpuprobe::error::{Error, Result};
use gpuprobe::probe::PropertyReader;
use gpuprobe::runtime::{AccelRuntime, Backend, Delegate, DelegateOptions};

/// Runtime double counting live delegates.
pub struct FakeRuntime { pub supported: bool, pub fail_create: bool, pub live: Arc<AtomicUsize>, pub created: Arc<AtomicUsize> }

impl FakeRuntime {
  pub fn new(supported: bool) -> Self {
    Self { supported, fail_create: false, live: Arc::default(), created: Arc::default() }
  }
  pub fn failing() -> Self { Self { fail_create: true, ..Self::new(true) } }
}

struct FakeDelegate { live: Arc<AtomicUsize> }

impl Delegate for FakeDelegate { fn name(&self) -> &str { "fake" } }
impl Drop for FakeDelegate { fn drop(&mut self) { self.live.fetch_sub(1, Ordering::SeqCst); } }

impl AccelRuntime for FakeRuntime {
  fn backend(&self) -> Backend { Backend::Wgpu }
  fn is_delegate_supported(&self) -> bool { self.supported }
  fn create_delegate(&self, _options: &DelegateOptions) -> Result<Box<dyn Delegate>> {
    if self.fail_create { return Err(Error::DelegateConstruction("OpenCL driver rejected context".into())) }
    self.created.fetch_add(1, Ordering::SeqCst);
    self.live.fetch_add(1, Ordering::SeqCst);
    Ok(Box::new(FakeDelegate { live: self.live.clone() }))
  }
}

pub struct FixedProperty(pub Option<&'static str>);

impl PropertyReader for FixedProperty {
  fn read(&self, name: &str) -> Result<String> {
    match self.0 {
      Some(v) => Ok(v.to_string()),
      None => Err(Error::PropertyEmpty(name.to_string())),
    }
  }
}

/// Creates `<root>/<candidate>` as an empty file.
pub fn stage(root: &Path, candidate: &str) {
  let path = root.join(candidate.trim_start_matches('/'));
  fs::create_dir_all(path.parent().unwrap()).unwrap();
  fs::write(path, b"").unwrap();
}
