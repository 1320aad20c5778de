use std::path::PathBuf;

use aarchup::Result;
use aarchup::config::Config;
use aarchup::error::Error as AarchupError;
use aarchup::exec::ShellRunner;
use aarchup::notify::{LogBackend, NotifyBackend};
use aarchup::scheduler::Scheduler;
use aarchup::telemetry::init_tracing;
use tokio::signal;
use tracing::info;

use super::cli::Cli;

const DEFAULT_CONFIG: &str = "aarchup.toml";

pub async fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.log_filter.as_deref(), cli.debug, cli.json_logs)?;

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let config = Config::load(&config_path, &cli.overrides())?;

    info!(
        command = %config.update_command,
        aur = config.aur.enabled,
        max_lines = config.max_lines,
        urgency = %config.notify.urgency,
        mode = ?config.mode,
        "configuration loaded"
    );

    if cli.dry_run {
        return drive(Scheduler::new(config, ShellRunner::default(), LogBackend::default())).await;
    }

    #[cfg(target_os = "linux")]
    let result = drive(Scheduler::new(
        config,
        ShellRunner::default(),
        aarchup::notify::DesktopBackend::default(),
    ))
    .await;

    #[cfg(not(target_os = "linux"))]
    let result = {
        let _ = config;
        Err(AarchupError::from(aarchup::error::NotifyError::Unsupported))
    };

    result
}

async fn drive<B>(mut scheduler: Scheduler<ShellRunner, B>) -> Result<()>
where
    B: NotifyBackend + Send + 'static,
    B::Handle: Send,
{
    // Les appels D-Bus du backend sont bloquants : les cycles tournent sur
    // leur propre tâche pour que Ctrl-C reste traité pendant un envoi.
    let cycles = tokio::spawn(async move { scheduler.run().await });
    let stop = cycles.abort_handle();

    tokio::select! {
        biased;
        _ = signal::ctrl_c() => {
            info!("shutdown signal received, stopping");
            stop.abort();
            Ok(())
        }
        joined = cycles => match joined {
            Ok(res) => res,
            Err(err) => Err(AarchupError::Task(err.to_string())),
        },
    }
}
