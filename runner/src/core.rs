use std::time::Duration;

use clap::Parser;
use conveyor::observer::LogObserver;
use conveyor::pipeline::Pipeline;
use tracing::{error, info};

use crate::config::RunnerArgs;

pub async fn start_runner() -> anyhow::Result<()> {
    let args = RunnerArgs::parse();
    let timeout_secs = args.timeout_secs;
    let config = args.to_pipeline_config();

    let mut pipeline = Pipeline::new(1, config, LogObserver::new());

    // Start the pipeline.
    pipeline.start().await?;

    // Spawn a task that listens for Ctrl+C (and the optional run timeout)
    // and triggers shutdown.
    let shutdown_handle = pipeline.shutdown_handle();
    let watcher = tokio::spawn(async move {
        let run_timeout = async {
            match timeout_secs {
                Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    error!("failed to listen for Ctrl+C: {:?}", e);
                    return;
                }

                info!("Ctrl+C received, shutting down pipeline...");
            }
            _ = run_timeout => {
                info!("run timeout reached, shutting down pipeline...");
            }
        }

        shutdown_handle.shutdown();
    });

    // Wait for the pipeline to finish (either normally or via shutdown).
    let result = pipeline.wait().await;

    // The watcher is aborted if it is still waiting on a signal; if it
    // already triggered shutdown there is nothing left for it to do.
    watcher.abort();
    let _ = watcher.await;

    let summary = result?;

    info!(
        produced = summary.produced,
        consumed = summary.consumed(),
        residual = summary.residual,
        "runner finished"
    );

    Ok(())
}
