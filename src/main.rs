use std::io;

use clap::Parser;
use gpuprobe::app;
use gpuprobe::config::Cli;
use gpuprobe::report::{Discard, Format, Report, TextSink};

fn main() -> Result<(), Box<dyn std::error::Error>> {
  let cli = Cli::parse();
  let filter = tracing_subscriber::EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
  tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(io::stderr).init();

  let config = cli.into_config();
  let (prober, harness, runtime) = gpuprobe::build(&config)?;

  match config.format {
    Format::Text => {
      let mut sink = TextSink::new(io::stdout().lock());
      app::run_diagnostic_and_test(&prober, &harness, runtime.as_ref(), &mut sink)?;
    }
    Format::Json => {
      let outcome = app::run_diagnostic_and_test(&prober, &harness, runtime.as_ref(), &mut Discard)?;
      println!("{}", Report { diagnostic: &outcome.diagnostic, benchmark: outcome.benchmark.as_ref() }.to_json()?);
    }
  }

  Ok(())
}
