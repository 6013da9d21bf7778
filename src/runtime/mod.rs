//! runtime
//! The GPU-acceleration runtime seam. A runtime answers two questions: is a
//! delegate supported on this device, and can one actually be constructed.
//! wgpu is the default backend, cuda rides behind the `cuda` feature.

pub mod webgpu;
#[cfg(feature = "cuda")] pub mod cuda;

use std::sync::Arc;

use serde::Serialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum InferencePreference {
  #[default] FastSingleAnswer,
  SustainedSpeed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DelegateOptions {
  pub precision_loss_allowed: bool,
  pub inference_preference: InferencePreference,
}

impl Default for DelegateOptions {
  fn default() -> Self {
    Self { precision_loss_allowed: true, inference_preference: InferencePreference::FastSingleAnswer }
  }
}

/// A live accelerator handle. Dropping it releases the underlying device.
pub trait Delegate: Send {
  fn name(&self) -> &str;
}

pub trait AccelRuntime: Send + Sync {
  fn backend(&self) -> Backend;
  fn is_delegate_supported(&self) -> bool;
  fn create_delegate(&self, options: &DelegateOptions) -> Result<Box<dyn Delegate>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
  #[default] Wgpu,
  Cuda,
}

impl Backend {
  pub fn as_str(self) -> &'static str {
    match self { Backend::Wgpu => "wgpu", Backend::Cuda => "cuda" }
  }

  pub fn runtime(self) -> Result<Arc<dyn AccelRuntime>> {
    match self {
      Backend::Wgpu => Ok(Arc::new(webgpu::WgpuRuntime::new())),
      #[cfg(feature = "cuda")] Backend::Cuda => Ok(Arc::new(cuda::CudaRuntime::new(0))),
      #[cfg(not(feature = "cuda"))] Backend::Cuda => Err(Error::BackendUnavailable("cuda")),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_options_allow_precision_loss() {
    let opts = DelegateOptions::default();
    assert!(opts.precision_loss_allowed);
    assert_eq!(opts.inference_preference, InferencePreference::FastSingleAnswer);
  }

  #[cfg(not(feature = "cuda"))]
  #[test]
  fn cuda_without_feature_is_unavailable() {
    let err = Backend::Cuda.runtime().err().unwrap();
    assert!(matches!(err, Error::BackendUnavailable("cuda")));
    assert!(err.to_string().contains("--features cuda"));
  }
}
