//! Command handlers

use std::fs;
use std::path::{Path, PathBuf};

use tokio::net::TcpListener;
use tracing::{info, warn};

use taller_app::bootstrap;
use taller_app::config::Config;
use taller_app::repository::Repositories;
use taller_app::Services;
use taller_server::{build_router, telemetry, AppState};
use taller_types::Result;

use crate::cli::{Cli, Commands};
use crate::output::{output_config, output_report};

pub fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve { bind, data_dir } => {
            let mut config = Config::load(cli.config.as_deref())?;
            if let Some(bind) = bind {
                config.bind = bind;
            }
            if let Some(dir) = data_dir {
                config.data_dir = Some(dir);
            }
            telemetry::init(config.log_format, cli.verbose, Some(&config.log_file()?))?;

            let repos = Repositories::open(&config)?;
            let report = bootstrap::run(&config, &repos)?;
            for table in &report.tables {
                info!(table = %table.table, status = %table.status, "table ready");
            }

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(serve(config, repos))
        }

        Commands::Migrate { data_dir } => {
            let mut config = Config::load(cli.config.as_deref())?;
            if let Some(dir) = data_dir {
                config.data_dir = Some(dir);
            }
            telemetry::init(config.log_format, cli.verbose, Some(&config.log_file()?))?;

            let repos = Repositories::open(&config)?;
            let report = bootstrap::run(&config, &repos)?;
            output_report(cli.format, &report)
        }

        Commands::Config { show, init } => {
            let path = Config::resolve_path(cli.config.as_deref())?;
            if init {
                init_config(&path)?;
            }
            if show || !init {
                let config = Config::load(Some(&path))?;
                output_config(cli.format, &config)?;
                println!("\nConfig file:      {}", path.display());
            }
            Ok(())
        }
    }
}

fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    Config::default().save(path)?;
    println!("Wrote default config: {}", path.display());
    Ok(())
}

async fn serve(config: Config, repos: Repositories) -> Result<()> {
    let services = Services::new(&config, &repos);
    let app = build_router(AppState::new(services));

    let listener = TcpListener::bind(&config.bind).await?;
    let pid_file = PidFile::create(config.pid_file()?)?;
    info!(
        addr = %listener.local_addr()?,
        data_dir = %config.data_dir()?.display(),
        pid = std::process::id(),
        "server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    drop(pid_file);
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "could not listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

/// Pid file removed again when the server stops
struct PidFile {
    path: PathBuf,
}

impl PidFile {
    fn create(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, format!("{}\n", std::process::id()))?;
        Ok(Self { path })
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "could not remove pid file");
        }
    }
}
