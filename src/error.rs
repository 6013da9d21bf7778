//! Error
//! Everything fallible inside the crate returns `Result<T>`; the prober and
//! harness turn these into sentinels or a failed `TestResult` at their edges.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("failed to run property command `{command}`: {source}")]
  PropertyRead { command: String, #[source] source: std::io::Error },

  #[error("property command `{command}` exited with {status}")]
  PropertyStatus { command: String, status: std::process::ExitStatus },

  #[error("property `{0}` is empty")]
  PropertyEmpty(String),

  #[error("{0} backend not compiled in; rebuild with `--features {0}`")]
  BackendUnavailable(&'static str),

  #[error("no GPU adapter available")]
  NoAdapter,

  #[error("GPU delegate construction failed: {0}")]
  DelegateConstruction(String),

  #[error("invalid workload: {0}")]
  InvalidWorkload(String),

  #[error("workload panicked: {0}")]
  WorkloadPanicked(String),

  #[error(transparent)]
  Io(#[from] std::io::Error),

  #[error(transparent)]
  Json(#[from] serde_json::Error),
}
