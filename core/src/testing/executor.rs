use std::path::Path;

use super::{
    compare,
    process::{CommandLine, ProcessRunner},
    result::{CaseId, CaseOutcome},
};
use crate::{config::JudgeConfig, platform::Platform};

/// Runs the compiled artifact against one testcase at a time and classifies the result.
///
/// Everything it writes stays inside the testcase directory: a temporary output file while the
/// program runs, and `<error_prefix><id>.<suffix>` when the answer is wrong.
pub struct CaseExecutor<'a, R> {
    cfg: &'a JudgeConfig,
    runner: &'a R,
    program: CommandLine,
}

impl<'a, R: ProcessRunner> CaseExecutor<'a, R> {
    pub fn new(
        cfg: &'a JudgeConfig,
        runner: &'a R,
        artifact: &Path,
        platform: &dyn Platform,
    ) -> Self {
        Self {
            cfg,
            runner,
            program: CommandLine::new(platform.invocation_path(artifact)),
        }
    }

    pub async fn run_case(&self, id: CaseId) -> CaseOutcome {
        let cfg = self.cfg;
        let input = cfg.input_path(id);
        let expected = cfg.expected_output_path(id);

        if !input.is_file() {
            return CaseOutcome::file_missing(format!("Input file missing: {}", input.display()));
        }
        if !expected.is_file() {
            return CaseOutcome::file_missing(format!(
                "Expected output file missing: {}",
                expected.display()
            ));
        }

        // A mismatch file from an earlier run would otherwise outlive a fixed answer.
        let mismatch = cfg.mismatch_path(id);
        remove_or_warn(&mismatch);

        let actual = cfg.temp_output_path(id);
        let out = self
            .runner
            .execute(&self.program, Some(&input), Some(&actual))
            .await;

        if !out.success() {
            remove_or_warn(&actual);
            return CaseOutcome::run_error(format!(
                "Run error (exit code: {}):\n{}",
                out.exit_code, out.diagnostic
            ));
        }
        if !actual.is_file() {
            return CaseOutcome::run_error(
                "Program exited normally, but no output file was generated",
            );
        }

        let comparison = match compare::compare_files(&actual, &expected) {
            Ok(c) => c,
            Err(e) => {
                remove_or_warn(&actual);
                return CaseOutcome::file_missing(format!("Cannot compare outputs: {}", e));
            }
        };

        if comparison.is_equal() {
            remove_or_warn(&actual);
            return CaseOutcome::success("Answer correct");
        }

        match fsutil::rename(&actual, &mismatch) {
            Ok(()) => CaseOutcome::answer_mismatch(
                format!(
                    "Answer mismatch:\n{}\nYour output saved to: {}",
                    comparison,
                    mismatch.display()
                ),
                Some(mismatch),
            ),
            Err(e) => {
                log::warn!("{:#}", e);
                remove_or_warn(&actual);
                CaseOutcome::answer_mismatch(
                    format!("Answer mismatch:\n{}\n(Your output was not saved)", comparison),
                    None,
                )
            }
        }
    }
}

fn remove_or_warn(path: &Path) {
    if let Err(e) = fsutil::remove_file_if_exists(path) {
        log::warn!("{:#}", e);
    }
}
