// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! RuncCommandClient against a scripted stand-in for the runc binary

use bpm::DomainError;
use bpm::domain::ports::RuncClient;
use bpm::domain::{ContainerState, ContainerStatus, RuntimeSpec, Signal, User};
use bpm::infrastructure::RuncCommandClient;
use serial_test::serial;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct FakeRunc {
    dir: TempDir,
    client: RuncCommandClient,
}

impl FakeRunc {
    /// Installs a shell script that records its arguments, then runs `body`.
    /// `$3` is the runc subcommand, `$4` its first argument.
    fn new(body: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("runc");
        let calls = dir.path().join("calls");
        fs::write(
            &script,
            format!(
                "#!/bin/sh\necho \"$@\" >> '{}'\n{body}\n",
                calls.display()
            ),
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let client = RuncCommandClient::new(script, dir.path().join("state"));
        Self { dir, client }
    }

    fn root(&self) -> PathBuf {
        self.dir.path().join("state")
    }

    fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("calls"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

fn current_user() -> User {
    User::new(
        "vcap",
        nix::unistd::getuid().as_raw(),
        nix::unistd::getgid().as_raw(),
    )
}

#[tokio::test]
#[serial]
async fn test_signal_container() {
    let runc = FakeRunc::new("exit 0");

    runc.client
        .signal_container("web-server", Signal::Term)
        .await
        .unwrap();
    runc.client
        .signal_container("web-server", Signal::Quit)
        .await
        .unwrap();

    let root = runc.root();
    assert_eq!(
        runc.calls(),
        vec![
            format!("--root {} kill web-server TERM", root.display()),
            format!("--root {} kill web-server QUIT", root.display()),
        ]
    );
}

#[tokio::test]
#[serial]
async fn test_failure_carries_runc_stderr() {
    let runc = FakeRunc::new("echo 'container does not exist' >&2\nexit 1");

    let err = runc
        .client
        .signal_container("web-server", Signal::Term)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        DomainError::runtime("kill", "container does not exist")
    );
}

#[tokio::test]
#[serial]
async fn test_container_state() {
    let runc = FakeRunc::new(
        r#"echo '{"ociVersion":"1.0.2","id":"'"$4"'","pid":4321,"status":"running","bundle":"/b"}'"#,
    );

    let state = runc.client.container_state("web-server").await.unwrap();

    assert_eq!(
        state,
        ContainerState {
            id: "web-server".to_string(),
            pid: 4321,
            status: ContainerStatus::Running,
        }
    );
}

#[tokio::test]
#[serial]
async fn test_container_state_missing_container() {
    let runc = FakeRunc::new("echo 'container does not exist' >&2\nexit 1");

    let err = runc.client.container_state("web-server").await.unwrap_err();

    assert_eq!(err, DomainError::ContainerNotFound("web-server".to_string()));
}

#[tokio::test]
#[serial]
async fn test_container_state_other_failure_stays_runtime() {
    let runc = FakeRunc::new("echo 'permission denied' >&2\nexit 1");

    let err = runc.client.container_state("web-server").await.unwrap_err();

    assert_eq!(err, DomainError::runtime("state", "permission denied"));
}

#[tokio::test]
#[serial]
async fn test_container_state_garbage_output() {
    let runc = FakeRunc::new("echo 'not json'");

    let err = runc.client.container_state("web-server").await.unwrap_err();

    assert!(matches!(err, DomainError::Serialization(_)));
}

#[tokio::test]
#[serial]
async fn test_list_containers() {
    let runc = FakeRunc::new(
        r#"echo '[{"id":"web-server","pid":12,"status":"running"},{"id":"web-worker","pid":0,"status":"stopped"}]'"#,
    );

    let containers = runc.client.list_containers().await.unwrap();

    assert_eq!(containers.len(), 2);
    assert_eq!(containers[1].status, ContainerStatus::Stopped);
    assert_eq!(
        runc.calls(),
        vec![format!("--root {} list --format json", runc.root().display())]
    );
}

#[tokio::test]
#[serial]
async fn test_list_containers_null_is_empty() {
    let runc = FakeRunc::new("echo null");

    assert!(runc.client.list_containers().await.unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn test_delete_container_forces() {
    let runc = FakeRunc::new("exit 0");

    runc.client.delete_container("web-server").await.unwrap();

    assert_eq!(
        runc.calls(),
        vec![format!("--root {} delete --force web-server", runc.root().display())]
    );
}

#[tokio::test]
#[serial]
async fn test_run_container_attaches_job_logs() {
    let runc = FakeRunc::new("echo 'to stdout'\necho 'to stderr' >&2");
    let logs = tempfile::tempdir().unwrap();
    let stdout_path = logs.path().join("server.stdout.log");
    let stderr_path = logs.path().join("server.stderr.log");
    let stdout = fs::File::create(&stdout_path).unwrap();
    let stderr = fs::File::create(&stderr_path).unwrap();

    runc.client
        .run_container(
            Path::new("/pids/server.pid"),
            Path::new("/bundles/web/server"),
            "web-server",
            &stdout,
            &stderr,
        )
        .await
        .unwrap();

    assert_eq!(
        runc.calls(),
        vec![format!(
            "--root {} run --bundle /bundles/web/server --pid-file /pids/server.pid --detach web-server",
            runc.root().display()
        )]
    );
    assert_eq!(fs::read_to_string(&stdout_path).unwrap(), "to stdout\n");
    assert_eq!(fs::read_to_string(&stderr_path).unwrap(), "to stderr\n");
}

#[tokio::test]
#[serial]
async fn test_run_container_failure() {
    let runc = FakeRunc::new("exit 1");
    let stdout = tempfile::tempfile().unwrap();
    let stderr = tempfile::tempfile().unwrap();

    let err = runc
        .client
        .run_container(
            Path::new("/pids/server.pid"),
            Path::new("/bundles/web/server"),
            "web-server",
            &stdout,
            &stderr,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Runtime { ref command, .. } if command == "run"));
}

#[tokio::test]
#[serial]
async fn test_create_and_destroy_bundle() {
    let runc = FakeRunc::new("exit 0");
    let bundle = runc.dir.path().join("bundles/web/server");
    let spec = RuntimeSpec {
        oci_version: "1.0.2".to_string(),
        hostname: "web".to_string(),
        ..Default::default()
    };

    runc.client
        .create_bundle(&bundle, spec, &current_user())
        .await
        .unwrap();

    let rootfs = bundle.join("rootfs");
    assert!(rootfs.is_dir());
    assert_eq!(
        fs::metadata(&rootfs).unwrap().permissions().mode() & 0o777,
        0o700
    );
    let written: serde_json::Value =
        serde_json::from_slice(&fs::read(bundle.join("config.json")).unwrap()).unwrap();
    assert_eq!(written["ociVersion"], "1.0.2");
    assert_eq!(written["hostname"], "web");

    runc.client.destroy_bundle(&bundle).await.unwrap();
    assert!(!bundle.exists());

    // Already gone is fine.
    runc.client.destroy_bundle(&bundle).await.unwrap();
    assert!(runc.calls().is_empty());
}
