//! External process execution with cancellation support.

use std::{
    io::{self, Read},
    path::PathBuf,
    process::{Child, Command, ExitStatus, Stdio},
    thread::{self, JoinHandle},
    time::Duration,
};

use thiserror::Error;

use crate::CancelToken;

/// A command to run in a working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecParams {
    /// Working directory of the child process.
    pub pwd: PathBuf,
    /// Program to run, resolved through `PATH`.
    pub cmd: String,
    /// Arguments passed to the program.
    pub args: Vec<String>,
}

/// Failure running an external command.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The process was killed by a signal or cancelled before finishing.
    #[error("process was terminated by a signal")]
    Terminated,

    /// The process exited unsuccessfully. Holds its combined output, or the
    /// exit status when it produced no output.
    #[error("{0}")]
    Failed(String),

    #[error("could not start '{command}': {cause}")]
    Spawn { command: String, cause: io::Error },

    #[error("could not wait for '{command}': {cause}")]
    Wait { command: String, cause: io::Error },
}

/// Runs external commands.
pub trait CommandRunner: Send + Sync {
    /// Run the command and return its standard output.
    ///
    /// A cancelled `cancel` token kills the child and yields
    /// [`ExecError::Terminated`].
    fn exec(&self, cancel: &CancelToken, params: &ExecParams) -> Result<String, ExecError>;
}

/// [`CommandRunner`] that spawns real child processes.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    poll_interval: Duration,
}

impl ProcessRunner {
    /// Create a runner that checks for cancellation every 25ms.
    pub fn new() -> Self {
        Self {
            poll_interval: Duration::from_millis(25),
        }
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for ProcessRunner {
    fn exec(&self, cancel: &CancelToken, params: &ExecParams) -> Result<String, ExecError> {
        if cancel.is_cancelled() {
            return Err(ExecError::Terminated);
        }

        tracing::debug!(
            cmd = %params.cmd,
            args = ?params.args,
            pwd = %params.pwd.display(),
            "running command"
        );

        let mut child = Command::new(&params.cmd)
            .args(&params.args)
            .current_dir(&params.pwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|cause| ExecError::Spawn {
                command: params.cmd.clone(),
                cause,
            })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match self.wait(&mut child, cancel) {
            Ok(Some(status)) => status,
            // Grandchildren may still hold the pipes open, so the drain
            // threads are left to finish on their own
            Ok(None) => return Err(ExecError::Terminated),
            Err(cause) => {
                return Err(ExecError::Wait {
                    command: params.cmd.clone(),
                    cause,
                });
            }
        };

        let stdout = collect(stdout);
        let stderr = collect(stderr);
        classify(&params.cmd, status, stdout, stderr)
    }
}

impl ProcessRunner {
    /// Wait for the child, killing it if cancellation is requested.
    /// Returns `None` when the child was killed.
    fn wait(&self, child: &mut Child, cancel: &CancelToken) -> io::Result<Option<ExitStatus>> {
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(Some(status));
            }
            if cancel.is_cancelled() {
                // The child may exit on its own between the check and the kill
                let _ = child.kill();
                child.wait()?;
                return Ok(None);
            }
            thread::sleep(self.poll_interval);
        }
    }
}

fn classify(
    cmd: &str,
    status: ExitStatus,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
) -> Result<String, ExecError> {
    if status.success() {
        return Ok(String::from_utf8_lossy(&stdout).into_owned());
    }

    // No exit code means the process was killed by a signal
    if status.code().is_none() {
        return Err(ExecError::Terminated);
    }

    let mut combined = stdout;
    combined.extend_from_slice(&stderr);
    if combined.is_empty() {
        return Err(ExecError::Failed(format!("{cmd}: {status}")));
    }
    Err(ExecError::Failed(
        String::from_utf8_lossy(&combined).into_owned(),
    ))
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .map(|handle| handle.join().unwrap_or_default())
        .unwrap_or_default()
}
