mod common;

use std::sync::Arc;

use common::{stage, FakeRuntime, FixedProperty};
use gpuprobe::probe::{find_opencl, Prober, GPU_INFO_UNAVAILABLE, OPENCL_CANDIDATES};
use gpuprobe::report::format_diagnostic;
use proptest::prelude::*;

fn prober(root: &std::path::Path, supported: bool, prop: Option<&'static str>) -> Prober {
  Prober::new(Arc::new(FakeRuntime::new(supported))).sysroot(root).reader(FixedProperty(prop))
}

#[test]
fn nothing_staged() {
  let dir = tempfile::tempdir().unwrap();
  let d = prober(dir.path(), false, Some("adreno")).probe();
  assert!(!d.opencl_available());
  assert_eq!(d.opencl_path(), None);
  assert!(!d.can_use_gpu());
  assert!(format_diagnostic(&d).contains("Library Path: Not found"));
}

#[test]
fn single_vendor_lib64() {
  let dir = tempfile::tempdir().unwrap();
  stage(dir.path(), "/vendor/lib64/libOpenCL.so");
  let d = prober(dir.path(), true, Some("adreno")).probe();
  assert!(d.opencl_available());
  assert_eq!(d.opencl_path(), Some(dir.path().join("vendor/lib64/libOpenCL.so").as_path()));
  assert_eq!(d.gpu_info(), "adreno");
  assert!(d.can_use_gpu());
}

#[test]
fn last_existing_candidate_wins() {
  let dir = tempfile::tempdir().unwrap();
  stage(dir.path(), "/vendor/lib/libOpenCL.so");
  stage(dir.path(), "/system/lib/libOpenCL.so");
  assert_eq!(find_opencl(dir.path()), Some(dir.path().join("system/lib/libOpenCL.so")));
  stage(dir.path(), "/system/lib64/libOpenCL.so");
  assert_eq!(find_opencl(dir.path()), Some(dir.path().join("system/lib64/libOpenCL.so")));
}

#[test]
fn unreadable_property_is_sentinel() {
  let dir = tempfile::tempdir().unwrap();
  let d = prober(dir.path(), true, None).probe();
  assert_eq!(d.gpu_info(), GPU_INFO_UNAVAILABLE);
  let d = prober(dir.path(), true, Some("")).probe();
  assert_eq!(d.gpu_info(), GPU_INFO_UNAVAILABLE);
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(32))]

  #[test]
  fn availability_and_winner(mask in 0u8..16, supported in any::<bool>()) {
    let dir = tempfile::tempdir().unwrap();
    let staged: Vec<&str> = OPENCL_CANDIDATES.iter().enumerate().filter(|(i, _)| mask & (1 << i) != 0).map(|(_, c)| *c).collect();
    for c in &staged { stage(dir.path(), c) }

    let d = prober(dir.path(), supported, Some("mali")).probe();
    prop_assert_eq!(d.opencl_available(), !staged.is_empty());
    prop_assert_eq!(d.opencl_path().map(|p| p.to_path_buf()), staged.last().map(|c| dir.path().join(c.trim_start_matches('/'))));
    prop_assert_eq!(d.can_use_gpu(), d.opencl_available() && supported);
  }
}
