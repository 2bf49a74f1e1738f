use std::path::Path;

use async_trait::async_trait;

use super::{
    process::{CommandLine, ProcessRunner, SystemRunner},
    result::CaseOutcome,
};

/// Turns the source under test into one executable.
///
/// Returns [`Verdict::Success`](super::Verdict::Success) only if `artifact` exists afterwards;
/// otherwise `FileMissing` (no source), `CompileError` (toolchain said no) or `RunError`
/// (toolchain said yes but produced nothing).
#[async_trait]
pub trait Compiler: Send + Sync {
    async fn compile(&self, source: &Path, artifact: &Path) -> CaseOutcome;
}

/// `g++ -std=c++11 <source> -o <artifact> -Wall`
#[derive(Debug, Clone)]
pub struct Gxx<R = SystemRunner> {
    runner: R,
}

impl Gxx {
    pub fn new() -> Self {
        Self::with_runner(SystemRunner)
    }
}

impl Default for Gxx {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Gxx<R> {
    const PROGRAM: &str = "g++";
    const STD_FLAG: &str = "-std=c++11";
    const WARNING_FLAG: &str = "-Wall";

    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    pub fn command_line(&self, source: &Path, artifact: &Path) -> CommandLine {
        CommandLine::new(Self::PROGRAM)
            .arg(Self::STD_FLAG)
            .arg(source)
            .arg("-o")
            .arg(artifact)
            .arg(Self::WARNING_FLAG)
    }
}

#[async_trait]
impl<R: ProcessRunner> Compiler for Gxx<R> {
    async fn compile(&self, source: &Path, artifact: &Path) -> CaseOutcome {
        if !source.is_file() {
            return CaseOutcome::file_missing(format!(
                "Source file not found: {}",
                source.display()
            ));
        }

        let cmd = self.command_line(source, artifact);
        log::info!("{}", cmd);
        let out = self.runner.execute(&cmd, None, None).await;

        if !out.success() {
            return CaseOutcome::compile_error(format!(
                "Compile failed (exit code: {}):\n{}",
                out.exit_code, out.diagnostic
            ));
        }
        if !artifact.is_file() {
            return CaseOutcome::run_error(format!(
                "Compile command succeeded, but no executable was generated: {}",
                artifact.display()
            ));
        }
        if !out.diagnostic.is_empty() {
            // warnings
            eprint!("{}", out.diagnostic);
        }
        CaseOutcome::success("Compile success")
    }
}
