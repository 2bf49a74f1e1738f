use std::{
    ffi::{OsStr, OsString},
    fmt,
    fs::File,
    path::Path,
    process::{ExitStatus, Stdio},
};

use anyhow::Context as _;
use async_trait::async_trait;
use tokio::process::Command;

/// Program plus arguments, spawned directly (no shell in between).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandLine {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn get_program(&self) -> &OsStr {
        &self.program
    }

    pub fn get_args(&self) -> impl Iterator<Item = &OsStr> {
        self.args.iter().map(OsString::as_os_str)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// What came back from a subprocess. Never an `Err`: callers branch on `exit_code`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub exit_code: i32,
    /// stderr, preceded by stdout when stdout was not redirected. For humans only.
    pub diagnostic: String,
}

impl ProcessOutput {
    /// The process was killed by a signal or otherwise ended without an exit code.
    pub const ABNORMAL_TERMINATION: i32 = -1;
    /// The process could not be started (missing program, unopenable redirect file, ...).
    pub const LAUNCH_FAILURE: i32 = -2;

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `cmd` to completion. `stdin` is read from the given file, `stdout` is written to the
    /// given file (created or truncated); whatever is not redirected ends up in the diagnostic.
    async fn execute(
        &self,
        cmd: &CommandLine,
        stdin: Option<&Path>,
        stdout: Option<&Path>,
    ) -> ProcessOutput;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    async fn try_execute(
        &self,
        cmd: &CommandLine,
        stdin: Option<&Path>,
        stdout: Option<&Path>,
    ) -> anyhow::Result<ProcessOutput> {
        let stdin = match stdin {
            Some(path) => Stdio::from(
                File::open(path)
                    .with_context(|| format!("Failed to open stdin file {:?}", path))?,
            ),
            None => Stdio::null(),
        };
        let stdout = match stdout {
            Some(path) => Stdio::from(
                File::create(path)
                    .with_context(|| format!("Failed to create stdout file {:?}", path))?,
            ),
            None => Stdio::piped(),
        };

        log::debug!("Spawning: {}", cmd);
        let proc = Command::new(cmd.get_program())
            .args(cmd.get_args())
            .stdin(stdin)
            .stdout(stdout)
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to spawn '{}'", cmd))?;

        let output = proc
            .wait_with_output()
            .await
            .context("Failed to communicate with subprocess")?;

        let mut diagnostic = String::from_utf8_lossy(&output.stdout).into_owned();
        diagnostic.push_str(&String::from_utf8_lossy(&output.stderr));

        let exit_code = match output.status.code() {
            Some(code) => code,
            None => {
                diagnostic.push_str(&describe_abnormal_exit(output.status));
                ProcessOutput::ABNORMAL_TERMINATION
            }
        };
        Ok(ProcessOutput {
            exit_code,
            diagnostic,
        })
    }
}

#[async_trait]
impl ProcessRunner for SystemRunner {
    async fn execute(
        &self,
        cmd: &CommandLine,
        stdin: Option<&Path>,
        stdout: Option<&Path>,
    ) -> ProcessOutput {
        self.try_execute(cmd, stdin, stdout)
            .await
            .unwrap_or_else(|e| ProcessOutput {
                exit_code: ProcessOutput::LAUNCH_FAILURE,
                diagnostic: format!("{:#}", e),
            })
    }
}

#[cfg(unix)]
fn describe_abnormal_exit(status: ExitStatus) -> String {
    use std::os::unix::process::ExitStatusExt as _;
    match status.signal() {
        Some(sig) => format!("Process terminated by signal {}", sig),
        None => "Process terminated abnormally".to_owned(),
    }
}

#[cfg(not(unix))]
fn describe_abnormal_exit(_status: ExitStatus) -> String {
    "Process terminated abnormally".to_owned()
}
