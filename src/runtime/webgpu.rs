//! wgpu backend
//! Supported means at least one hardware (non-CPU) adapter is visible.
//! Constructing a delegate requests an adapter and opens a device on it.

use tracing::debug;

use super::{AccelRuntime, Backend, Delegate, DelegateOptions, InferencePreference};
use crate::error::{Error, Result};

pub struct WgpuRuntime { instance: wgpu::Instance, backends: wgpu::Backends }

impl WgpuRuntime {
  pub fn new() -> Self { Self::with_backends(wgpu::Backends::all()) }

  pub fn with_backends(backends: wgpu::Backends) -> Self {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor { backends, ..Default::default() });
    Self { instance, backends }
  }
}

impl Default for WgpuRuntime { fn default() -> Self { Self::new() } }

fn power_preference(pref: InferencePreference) -> wgpu::PowerPreference {
  match pref {
    InferencePreference::FastSingleAnswer => wgpu::PowerPreference::HighPerformance,
    InferencePreference::SustainedSpeed => wgpu::PowerPreference::LowPower,
  }
}

impl AccelRuntime for WgpuRuntime {
  fn backend(&self) -> Backend { Backend::Wgpu }

  fn is_delegate_supported(&self) -> bool {
    let adapters = self.instance.enumerate_adapters(self.backends);
    for adapter in &adapters {
      let info = adapter.get_info();
      debug!(name = %info.name, backend = ?info.backend, device_type = ?info.device_type, "adapter");
    }
    adapters.iter().any(|a| a.get_info().device_type != wgpu::DeviceType::Cpu)
  }

  fn create_delegate(&self, options: &DelegateOptions) -> Result<Box<dyn Delegate>> {
    let adapter = pollster::block_on(self.instance.request_adapter(&wgpu::RequestAdapterOptions {
      power_preference: power_preference(options.inference_preference),
      compatible_surface: None,
      force_fallback_adapter: false,
    })).ok_or(Error::NoAdapter)?;

    // precision loss allowed: take f16 shaders when the adapter has them
    let mut required_features = wgpu::Features::empty();
    if options.precision_loss_allowed && adapter.features().contains(wgpu::Features::SHADER_F16) {
      required_features |= wgpu::Features::SHADER_F16;
    }

    let info = adapter.get_info();
    let (device, queue) = pollster::block_on(adapter.request_device(
      &wgpu::DeviceDescriptor {
        label: Some("gpuprobe-delegate"),
        required_features,
        required_limits: wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits()),
        memory_hints: wgpu::MemoryHints::Performance,
      },
      None,
    )).map_err(|e| Error::DelegateConstruction(e.to_string()))?;

    let name = format!("{} ({:?})", info.name, info.backend);
    debug!(delegate = %name, f16 = !required_features.is_empty(), "wgpu delegate created");
    Ok(Box::new(WgpuDelegate { name, _device: device, _queue: queue }))
  }
}

pub struct WgpuDelegate { name: String, _device: wgpu::Device, _queue: wgpu::Queue }

impl Delegate for WgpuDelegate { fn name(&self) -> &str { &self.name } }

impl Drop for WgpuDelegate {
  fn drop(&mut self) { debug!(delegate = %self.name, "wgpu delegate released") }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn preference_maps_to_power() {
    assert_eq!(power_preference(InferencePreference::FastSingleAnswer), wgpu::PowerPreference::HighPerformance);
    assert_eq!(power_preference(InferencePreference::SustainedSpeed), wgpu::PowerPreference::LowPower);
  }
}
