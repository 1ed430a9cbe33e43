// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Runc Lifecycle Service
//!
//! Turns job operations into runc container operations:
//! 1. start: resolve the user, prepare pid/log paths, build the spec and bundle, run
//! 2. stop: SIGTERM, poll the container state, SIGQUIT once the exit timeout elapses
//! 3. remove: delete the container, then destroy its bundle
//! 4. list / get: container state projected into jobs
//!
//! A job process and its container are correlated only through
//! [`ContainerId`]; nothing about a job is stored here.

use crate::config::ProcessConfig;
use crate::constants::{STATE_POLL_INTERVAL, VCAP_USER};
use crate::domain::ports::{Clock, JobPrerequisites, RuncAdapter, RuncClient, UserFinder};
use crate::domain::value_objects::pid_file;
use crate::domain::{ContainerId, ContainerStatus, DomainError, Job, JobPaths, Result, Signal};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{Instrument, Span, debug, info, warn};

/// Log handles of a started job.
///
/// The container holds its own copies; these belong to the caller, who
/// decides when to close them.
#[derive(Debug)]
pub struct JobStreams {
    pub stdout: File,
    pub stderr: File,
}

pub struct RuncLifecycle {
    client: Arc<dyn RuncClient>,
    adapter: Arc<dyn RuncAdapter>,
    user_finder: Arc<dyn UserFinder>,
    clock: Arc<dyn Clock>,
    system_root: PathBuf,
}

impl RuncLifecycle {
    pub fn new(
        client: Arc<dyn RuncClient>,
        adapter: Arc<dyn RuncAdapter>,
        user_finder: Arc<dyn UserFinder>,
        clock: Arc<dyn Clock>,
        system_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client,
            adapter,
            user_finder,
            clock,
            system_root: system_root.into(),
        }
    }

    fn bundle_path(&self, job_name: &str, config: &ProcessConfig) -> PathBuf {
        JobPaths::new(&self.system_root, job_name).bundle(&config.name)
    }

    /// Start one process of a job in a new container.
    ///
    /// Every step runs in order and the first failure is returned as is.
    /// Nothing is rolled back: a half-created bundle or pid directory is
    /// cleaned up by [`RuncLifecycle::remove_job`].
    pub async fn start_job(&self, job_name: &str, config: &ProcessConfig) -> Result<JobStreams> {
        let user = self.user_finder.lookup(VCAP_USER)?;

        let JobPrerequisites {
            pid_dir,
            stdout,
            stderr,
        } = self
            .adapter
            .create_job_prerequisites(&self.system_root, job_name, config, &user)
            .await?;

        let spec = self
            .adapter
            .build_spec(&self.system_root, job_name, config, &user)?;

        let bundle_path = self.bundle_path(job_name, config);
        self.client.create_bundle(&bundle_path, spec, &user).await?;

        let container_id = ContainerId::new(job_name, &config.name);
        let pid_path = pid_file(&pid_dir, &config.name);
        debug!(
            container_id = %container_id,
            bundle = %bundle_path.display(),
            pid_file = %pid_path.display(),
            "Running container"
        );
        self.client
            .run_container(
                &pid_path,
                &bundle_path,
                container_id.as_str(),
                &stdout,
                &stderr,
            )
            .await?;

        info!(
            job = job_name,
            process = %config.name,
            container_id = %container_id,
            "Job started"
        );
        Ok(JobStreams { stdout, stderr })
    }

    /// Stop a job's container.
    ///
    /// Sends SIGTERM, then queries the container state right away and every
    /// [`STATE_POLL_INTERVAL`] after that until runc reports it stopped. When
    /// `exit_timeout` elapses first the container gets SIGQUIT and
    /// [`DomainError::Timeout`] is returned. A failed state query counts as
    /// "not stopped yet". All queries run on a polling task instrumented with
    /// `span`, so a query that never returns cannot hold back the escalation.
    pub async fn stop_job(
        &self,
        span: &Span,
        job_name: &str,
        config: &ProcessConfig,
        exit_timeout: Duration,
    ) -> Result<()> {
        let container_id = ContainerId::new(job_name, &config.name);

        self.client
            .signal_container(container_id.as_str(), Signal::Term)
            .await?;
        let signaled_at = self.clock.now();
        let deadline = self.clock.sleep(exit_timeout);

        let (queried_tx, queried_rx) = oneshot::channel();
        let (stopped_tx, stopped_rx) = oneshot::channel();
        let poller = tokio::spawn(
            poll_until_stopped(
                Arc::clone(&self.client),
                Arc::clone(&self.clock),
                container_id.clone(),
                queried_tx,
                stopped_tx,
            )
            .instrument(span.clone()),
        );

        // The forced signal never precedes the first state query.
        let escalate = async move {
            let _ = queried_rx.await;
            deadline.await;
        };

        tokio::select! {
            biased;

            Ok(()) = stopped_rx => {
                info!(
                    parent: span,
                    container_id = %container_id,
                    elapsed = ?self.clock.now().duration_since(signaled_at),
                    "Container stopped"
                );
                Ok(())
            }
            () = escalate => {
                poller.abort();
                warn!(
                    parent: span,
                    container_id = %container_id,
                    timeout_secs = exit_timeout.as_secs(),
                    "Container did not stop in time, sending SIGQUIT"
                );
                if let Err(e) = self
                    .client
                    .signal_container(container_id.as_str(), Signal::Quit)
                    .await
                {
                    warn!(parent: span, container_id = %container_id, error = %e, "Failed to send SIGQUIT");
                }
                Err(DomainError::Timeout)
            }
        }
    }

    /// Delete the container, then its bundle. A failed delete leaves the bundle alone.
    pub async fn remove_job(&self, job_name: &str, config: &ProcessConfig) -> Result<()> {
        let container_id = ContainerId::new(job_name, &config.name);
        self.client.delete_container(container_id.as_str()).await?;

        let bundle_path = self.bundle_path(job_name, config);
        self.client.destroy_bundle(&bundle_path).await?;

        debug!(container_id = %container_id, "Job removed");
        Ok(())
    }

    pub async fn list_jobs(&self) -> Result<Vec<Job>> {
        let containers = self.client.list_containers().await?;
        Ok(containers.into_iter().map(Job::from).collect())
    }

    pub async fn get_job(&self, job_name: &str, config: &ProcessConfig) -> Result<Job> {
        let container_id = ContainerId::new(job_name, &config.name);
        let state = self.client.container_state(container_id.as_str()).await?;
        Ok(Job {
            name: container_id.into(),
            pid: state.pid,
            status: state.status,
        })
    }
}

async fn poll_until_stopped(
    client: Arc<dyn RuncClient>,
    clock: Arc<dyn Clock>,
    container_id: ContainerId,
    queried: oneshot::Sender<()>,
    stopped: oneshot::Sender<()>,
) {
    // The waiter may already have given up on either channel.
    let _ = queried.send(());
    loop {
        if container_stopped(client.as_ref(), container_id.as_str()).await {
            let _ = stopped.send(());
            return;
        }
        if stopped.is_closed() {
            return;
        }
        clock.sleep(STATE_POLL_INTERVAL).await;
    }
}

async fn container_stopped(client: &dyn RuncClient, container_id: &str) -> bool {
    match client.container_state(container_id).await {
        Ok(state) => state.status == ContainerStatus::Stopped,
        Err(e) => {
            debug!(container_id, error = %e, "Failed to fetch container state");
            false
        }
    }
}
