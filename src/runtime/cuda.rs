//! cuda backend
//! Supported means the driver initializes and reports the requested ordinal.

use std::sync::Arc;

use cudarc::driver::{result, CudaContext};
use tracing::debug;

use super::{AccelRuntime, Backend, Delegate, DelegateOptions};
use crate::error::{Error, Result};

pub struct CudaRuntime { ordinal: usize }

impl CudaRuntime {
  pub fn new(ordinal: usize) -> Self { Self { ordinal } }
}

impl AccelRuntime for CudaRuntime {
  fn backend(&self) -> Backend { Backend::Cuda }

  fn is_delegate_supported(&self) -> bool {
    if result::init().is_err() { return false }
    match result::device::get_count() {
      Ok(count) => { debug!(count, "cuda devices"); count > 0 && (self.ordinal as i64) < count as i64 }
      Err(e) => { debug!(error = ?e, "cuda device count failed"); false }
    }
  }

  // cuda has no notion of precision loss or inference preference at context level
  fn create_delegate(&self, _options: &DelegateOptions) -> Result<Box<dyn Delegate>> {
    let ctx = CudaContext::new(self.ordinal).map_err(|e| Error::DelegateConstruction(format!("{e:?}")))?;
    let name = format!("cuda:{}", self.ordinal);
    debug!(delegate = %name, "cuda delegate created");
    Ok(Box::new(CudaDelegate { name, _ctx: ctx }))
  }
}

pub struct CudaDelegate { name: String, _ctx: Arc<CudaContext> }

impl Delegate for CudaDelegate { fn name(&self) -> &str { &self.name } }

impl Drop for CudaDelegate {
  fn drop(&mut self) { debug!(delegate = %self.name, "cuda delegate released") }
}
