use ensure_core::{CancelToken, CommandRunner, ExecParams, ProcessRunner};

use super::{BackendError, GenerateRequest, MockBackend};

/// Command run when none is configured.
pub const DEFAULT_MOCKGEN_COMMAND: &str = "mockgen";

/// Runs `mockgen <package> <Iface1,Iface2>` in the destination's working
/// directory and uses its standard output as the mock body.
#[derive(Debug, Clone)]
pub struct MockgenBackend<R = ProcessRunner> {
    runner: R,
    command: String,
}

impl MockgenBackend {
    /// Backend running `command` as a real child process.
    pub fn new(command: impl Into<String>) -> Self {
        Self::with_runner(ProcessRunner::new(), command)
    }
}

impl Default for MockgenBackend {
    fn default() -> Self {
        Self::new(DEFAULT_MOCKGEN_COMMAND)
    }
}

impl<R: CommandRunner> MockgenBackend<R> {
    pub fn with_runner(runner: R, command: impl Into<String>) -> Self {
        Self {
            runner,
            command: command.into(),
        }
    }

    fn params(&self, request: &GenerateRequest) -> ExecParams {
        ExecParams {
            pwd: request.working_dir.clone(),
            cmd: self.command.clone(),
            args: vec![request.package_path.clone(), request.interfaces.join(",")],
        }
    }
}

impl<R: CommandRunner> MockBackend for MockgenBackend<R> {
    fn generate(
        &self,
        cancel: &CancelToken,
        request: &GenerateRequest,
    ) -> Result<String, BackendError> {
        let params = self.params(request);
        Ok(self.runner.exec(cancel, &params)?)
    }
}
