// src/exec/child.rs

//! Child process runner.

use std::io::{self, PipeReader};
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::types::RunAsUser;

use super::backend::{ChildExit, LaunchSpec};

/// Run the child to completion, capturing stdout and stderr as one stream.
///
/// Both descriptors are the write end of the same pipe, so the captured text
/// keeps the order in which the child wrote it. The pipe is drained while
/// the child runs; a full pipe would otherwise stall it.
pub async fn run_combined(spec: &LaunchSpec) -> io::Result<ChildExit> {
    let (reader, writer) = io::pipe()?;
    let writer_err = writer.try_clone()?;

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .stdin(Stdio::null())
        .stdout(writer)
        .stderr(writer_err);
    if let Some(dir) = &spec.work_dir {
        cmd.current_dir(dir);
    }
    if let Some(run_as) = &spec.run_as {
        apply_identity(&mut cmd, run_as);
    }

    let mut child = cmd.spawn()?;
    // The command still owns our copies of the write end; EOF never arrives
    // until they are closed.
    drop(cmd);

    debug!(program = %spec.program, pid = ?child.id(), "child started");

    let (status, captured) = tokio::join!(child.wait(), read_to_end(reader));
    let status = status?;
    let captured = captured?;

    Ok(ChildExit {
        output: String::from_utf8_lossy(&captured).into_owned(),
        exit_code: status.code().unwrap_or(-1),
    })
}

#[cfg(unix)]
async fn read_to_end(reader: PipeReader) -> io::Result<Vec<u8>> {
    use std::os::fd::OwnedFd;

    use tokio::io::AsyncReadExt;
    use tokio::net::unix::pipe::Receiver;

    let mut receiver = Receiver::from_owned_fd(OwnedFd::from(reader))?;
    let mut captured = Vec::new();
    receiver.read_to_end(&mut captured).await?;
    Ok(captured)
}

#[cfg(not(unix))]
async fn read_to_end(mut reader: PipeReader) -> io::Result<Vec<u8>> {
    use std::io::Read;

    tokio::task::spawn_blocking(move || {
        let mut captured = Vec::new();
        reader.read_to_end(&mut captured).map(|_| captured)
    })
    .await
    .map_err(io::Error::other)?
}

#[cfg(unix)]
fn apply_identity(cmd: &mut Command, run_as: &RunAsUser) {
    if let Some(uid) = run_as.uid {
        cmd.uid(uid);
    }
    if let Some(gid) = run_as.gid {
        cmd.gid(gid);
    }
    if let Some(home) = &run_as.home {
        cmd.env("HOME", home);
    }
}

#[cfg(not(unix))]
fn apply_identity(_cmd: &mut Command, _run_as: &RunAsUser) {}
