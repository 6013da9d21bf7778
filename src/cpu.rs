//! cpu
//! Scalar kernels behind the synthetic workloads. Nothing here touches an
//! accelerator; both the "CPU" and "GPU" runs land in these loops.

/// `c = alpha * a @ b + beta * c` for row-major `a: m x k`, `b: k x n`, `c: m x n`.
pub fn sgemm(
  m: usize, n: usize, k: usize,
  alpha: f32, beta: f32,
  a: &[f32], b: &[f32], c: &mut [f32]
) {
  debug_assert!(a.len() >= m * k && b.len() >= k * n && c.len() >= m * n);
  for i in 0..m {
    let row = &mut c[i * n..(i + 1) * n];
    for x in row.iter_mut() { *x *= beta }
    for p in 0..k {
      let aip = alpha * a[i * k + p];
      let brow = &b[p * n..(p + 1) * n];
      for (x, &bpj) in row.iter_mut().zip(brow) { *x += aip * bpj }
    }
  }
}

/// Sum of `sin(i) * cos(i)` for `i` in `0..iterations`.
pub fn trig_accumulate(iterations: u64) -> f64 {
  let mut sum = 0.0;
  for i in 0..iterations {
    let x = i as f64;
    sum += x.sin() * x.cos();
  }
  sum
}
