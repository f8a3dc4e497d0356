// tests/exec_combined_output.rs

#![cfg(unix)]

mod common;
use crate::common::{init_tracing, with_timeout};

use std::io;

use nix::unistd::getuid;
use runner::exec::{LaunchSpec, ProcessLauncher, RealLauncher};
use runner::types::RunAsUser;
use tempfile::tempdir;

fn sh(script: &str) -> LaunchSpec {
    LaunchSpec {
        program: "sh".into(),
        args: vec!["-c".into(), script.into()],
        work_dir: None,
        run_as: None,
    }
}

#[tokio::test]
async fn stdout_and_stderr_are_interleaved_in_write_order() {
    init_tracing();

    let exit = with_timeout(RealLauncher.launch(sh("echo out1; echo err1 >&2; echo out2; echo err2 >&2")))
        .await
        .unwrap();

    assert_eq!(exit.output, "out1\nerr1\nout2\nerr2\n");
    assert_eq!(exit.exit_code, 0);
}

#[tokio::test]
async fn exit_code_is_reported() {
    let exit = with_timeout(RealLauncher.launch(sh("echo bye; exit 7")))
        .await
        .unwrap();

    assert_eq!(exit.exit_code, 7);
    assert_eq!(exit.output, "bye\n");
}

#[tokio::test]
async fn signal_death_maps_to_minus_one() {
    let exit = with_timeout(RealLauncher.launch(sh("kill -9 $$")))
        .await
        .unwrap();

    assert_eq!(exit.exit_code, -1);
}

#[tokio::test]
async fn work_dir_is_applied() {
    let dir = tempdir().unwrap();
    let canonical = dir.path().canonicalize().unwrap();
    let mut spec = sh("pwd -P");
    spec.work_dir = Some(dir.path().to_path_buf());

    let exit = with_timeout(RealLauncher.launch(spec)).await.unwrap();

    assert_eq!(exit.output.trim_end(), canonical.display().to_string());
}

#[tokio::test]
async fn missing_program_is_a_launch_error() {
    let spec = LaunchSpec {
        program: "/definitely/not/a/real/program".into(),
        args: Vec::new(),
        work_dir: None,
        run_as: None,
    };

    let err = with_timeout(RealLauncher.launch(spec)).await.unwrap_err();

    assert_eq!(err.kind(), io::ErrorKind::NotFound);
}

#[tokio::test]
async fn stdin_is_closed() {
    let exit = with_timeout(RealLauncher.launch(sh("cat; echo done")))
        .await
        .unwrap();

    assert_eq!(exit.output, "done\n");
}

#[tokio::test]
async fn run_as_identity_sets_uid_and_home() {
    // Switching to our own uid needs no privileges.
    let uid = getuid().as_raw();
    let mut spec = sh("echo \"$HOME\"; id -u");
    spec.run_as = Some(RunAsUser {
        uid: Some(uid),
        gid: None,
        username: None,
        home: Some("/srv/runner-home".into()),
    });

    let exit = with_timeout(RealLauncher.launch(spec)).await.unwrap();

    assert_eq!(exit.exit_code, 0);
    assert_eq!(exit.output, format!("/srv/runner-home\n{uid}\n"));
}

#[tokio::test]
async fn large_output_does_not_stall_the_child() {
    // Well past the usual 64 KiB pipe buffer.
    let exit = with_timeout(RealLauncher.launch(sh(
        "i=0; while [ $i -lt 20000 ]; do echo 0123456789; i=$((i+1)); done",
    )))
    .await
    .unwrap();

    assert_eq!(exit.exit_code, 0);
    assert_eq!(exit.output.len(), 20000 * 11);
}
