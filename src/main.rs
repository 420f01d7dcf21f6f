use std::sync::Arc;

use anyhow::Context;

use linepool::{Config, ConsoleWriter, Coordinator, LogWriter, Subscribe};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional env file; the variables themselves are validated next.
    let _ = dotenvy::from_filename("cfg.env");
    let cfg = Config::from_env().context("loading configuration")?;

    let log = LogWriter::create(&cfg.log_file)
        .await
        .with_context(|| format!("creating log file {}", cfg.log_file.display()))?;
    let subscribers: Vec<Arc<dyn Subscribe>> = vec![Arc::new(log), Arc::new(ConsoleWriter)];

    let coordinator = Coordinator::bootstrap(&cfg, subscribers)
        .await
        .context("starting the worker pool runtime")?;
    coordinator.run(tokio::io::stdin()).await;
    Ok(())
}
