// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! bpm command line
//!
//! Wires the runc lifecycle to the host and exposes it as subcommands.
//! Settings come from `BPM_*` environment variables, job definitions from
//! `<system_root>/jobs/<job>/config/bpm.yml`.

use anyhow::{Context, bail};
use bpm::config::{job_config_path, load_job_config, validate_job_name};
use bpm::constants::DEFAULT_EXIT_TIMEOUT;
use bpm::infrastructure::{BpmRuncAdapter, RuncCommandClient, SystemUserFinder, TokioClock};
use bpm::settings::Settings;
use bpm::domain::ContainerStatus;
use bpm::{DomainError, Job, ProcessConfig, RuncLifecycle};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tabwriter::TabWriter;
use tracing::{info, info_span, warn};

#[derive(Parser, Debug)]
#[command(name = "bpm")]
#[command(about = "Run BOSH job processes in runc containers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a job process
    Start {
        job: String,

        /// Process to start (defaults to the job name)
        #[arg(short, long)]
        process: Option<String>,
    },

    /// Stop a job process and remove its container
    Stop {
        job: String,

        /// Process to stop (defaults to the job name)
        #[arg(short, long)]
        process: Option<String>,

        /// Seconds to wait for a graceful exit before sending SIGQUIT
        #[arg(long, default_value_t = DEFAULT_EXIT_TIMEOUT.as_secs())]
        timeout: u64,
    },

    /// List all job containers
    List,

    /// Print the pid of a running job process
    Pid {
        job: String,

        /// Process to inspect (defaults to the job name)
        #[arg(short, long)]
        process: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env();

    // Logs go to stderr; stdout is reserved for command output.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&settings.log_level)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let lifecycle = RuncLifecycle::new(
        Arc::new(RuncCommandClient::new(
            &settings.runc_path,
            &settings.runc_root,
        )),
        Arc::new(BpmRuncAdapter::new()),
        Arc::new(SystemUserFinder),
        Arc::new(TokioClock),
        settings.system_root.clone(),
    );

    match cli.command {
        Command::Start { job, process } => {
            let config = load_process(&settings, &job, process)?;
            start(&lifecycle, &job, &config).await
        }
        Command::Stop {
            job,
            process,
            timeout,
        } => {
            let config = load_process(&settings, &job, process)?;
            stop(&lifecycle, &job, &config, Duration::from_secs(timeout)).await
        }
        Command::List => {
            let jobs = lifecycle.list_jobs().await.context("listing jobs")?;
            write_jobs(std::io::stdout().lock(), &jobs)?;
            Ok(())
        }
        Command::Pid { job, process } => {
            let config = load_process(&settings, &job, process)?;
            let found = lifecycle
                .get_job(&job, &config)
                .await
                .with_context(|| format!("fetching {job}/{}", config.name))?;
            if !found.is_running() {
                bail!("{job}/{} is not running", config.name);
            }
            println!("{}", found.pid);
            Ok(())
        }
    }
}

fn load_process(
    settings: &Settings,
    job: &str,
    process: Option<String>,
) -> anyhow::Result<ProcessConfig> {
    validate_job_name(job)?;
    let path = job_config_path(&settings.system_root, job);
    let job_config = load_job_config(&path)?;
    let name = process.unwrap_or_else(|| job.to_string());
    let config = job_config
        .process(&name)
        .with_context(|| format!("in {}", path.display()))?;
    Ok(config.clone())
}

async fn start(lifecycle: &RuncLifecycle, job: &str, config: &ProcessConfig) -> anyhow::Result<()> {
    // A container left behind by a crashed process keeps its id taken.
    let existing = lifecycle.get_job(job, config).await;
    if let Some(status) = stale_status(job, &config.name, existing)? {
        info!(job, process = %config.name, %status, "Removing stale container");
        lifecycle
            .remove_job(job, config)
            .await
            .context("removing stale container")?;
    }

    lifecycle
        .start_job(job, config)
        .await
        .with_context(|| format!("starting {job}/{}", config.name))?;
    Ok(())
}

async fn stop(
    lifecycle: &RuncLifecycle,
    job: &str,
    config: &ProcessConfig,
    exit_timeout: Duration,
) -> anyhow::Result<()> {
    let span = info_span!("stop", job, process = %config.name);

    match lifecycle.stop_job(&span, job, config, exit_timeout).await {
        Ok(()) => {}
        Err(DomainError::Timeout) => {
            warn!(parent: &span, "Process was forcefully stopped");
        }
        Err(e) => return Err(e).with_context(|| format!("stopping {job}/{}", config.name)),
    }

    lifecycle
        .remove_job(job, config)
        .await
        .with_context(|| format!("removing {job}/{}", config.name))
}

/// Status of a leftover container that is safe to remove before starting.
/// Containers that may still have live processes are refused.
fn stale_status(
    job: &str,
    process: &str,
    existing: bpm::Result<Job>,
) -> anyhow::Result<Option<ContainerStatus>> {
    match existing {
        Ok(found) => match found.status {
            status @ (ContainerStatus::Stopped | ContainerStatus::Created) => Ok(Some(status)),
            status => bail!("{job}/{process} is already {status}"),
        },
        Err(DomainError::ContainerNotFound(_)) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("checking for an existing {job}/{process}")),
    }
}

fn write_jobs(out: impl Write, jobs: &[Job]) -> std::io::Result<()> {
    let mut tw = TabWriter::new(out);
    writeln!(tw, "Name\tPid\tStatus")?;
    for job in jobs {
        writeln!(tw, "{}\t{}\t{}", job.name, job.pid, job.status)?;
    }
    tw.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leftover(status: ContainerStatus) -> bpm::Result<Job> {
        Ok(Job {
            name: "web-server".to_string(),
            pid: 0,
            status,
        })
    }

    #[test]
    fn test_stale_status_removes_only_dead_containers() {
        assert_eq!(
            stale_status("web", "server", leftover(ContainerStatus::Stopped)).unwrap(),
            Some(ContainerStatus::Stopped)
        );
        assert_eq!(
            stale_status("web", "server", leftover(ContainerStatus::Created)).unwrap(),
            Some(ContainerStatus::Created)
        );
    }

    #[test]
    fn test_stale_status_refuses_live_containers() {
        for status in [
            ContainerStatus::Running,
            ContainerStatus::Paused,
            ContainerStatus::Creating,
        ] {
            let err = stale_status("web", "server", leftover(status)).unwrap_err();
            assert_eq!(err.to_string(), format!("web/server is already {status}"));
        }
    }

    #[test]
    fn test_stale_status_missing_container() {
        let missing = Err(DomainError::ContainerNotFound("web-server".to_string()));
        assert_eq!(stale_status("web", "server", missing).unwrap(), None);
    }

    #[test]
    fn test_stale_status_propagates_query_failures() {
        let failed = Err(DomainError::runtime("state", "permission denied"));
        let err = stale_status("web", "server", failed).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DomainError>(),
            Some(&DomainError::runtime("state", "permission denied"))
        );
    }

    #[test]
    fn test_load_process_rejects_traversing_job_name() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            system_root: dir.path().to_path_buf(),
            ..Settings::default()
        };
        for job in ["..", "../other", "web/.."] {
            let err = load_process(&settings, job, Some("server".to_string())).unwrap_err();
            assert!(
                matches!(
                    err.downcast_ref::<DomainError>(),
                    Some(DomainError::InvalidConfiguration(_))
                ),
                "{job}: {err:#}"
            );
        }
    }

    #[test]
    fn test_write_jobs_aligns_columns() {
        let jobs = vec![
            Job {
                name: "web-server".to_string(),
                pid: 1234,
                status: ContainerStatus::Running,
            },
            Job {
                name: "db-db".to_string(),
                pid: 0,
                status: ContainerStatus::Stopped,
            },
        ];

        let mut out = Vec::new();
        write_jobs(&mut out, &jobs).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Name        Pid   Status\n\
             web-server  1234  running\n\
             db-db       0     stopped\n"
        );
    }

    #[test]
    fn test_cli_parses_stop() {
        let cli = Cli::try_parse_from(["bpm", "stop", "web", "-p", "worker", "--timeout", "5"])
            .unwrap();
        match cli.command {
            Command::Stop {
                job,
                process,
                timeout,
            } => {
                assert_eq!(job, "web");
                assert_eq!(process.as_deref(), Some("worker"));
                assert_eq!(timeout, 5);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_stop_default_timeout() {
        let cli = Cli::try_parse_from(["bpm", "stop", "web"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Stop { timeout: 20, process: None, .. }
        ));
    }
}
