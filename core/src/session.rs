use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use crate::{
    config::JudgeConfig,
    platform::{self, Platform},
    style,
    testing::{
        discovery, CaseExecutor, CaseId, CaseOutcome, Compiler, Gxx, ProcessRunner, SystemRunner,
    },
};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

/// Conditions that stop a session before any testcase result exists.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Testcase directory not found: {0}")]
    TestcaseDirNotFound(PathBuf),

    #[error("Error prefix '{0}' must differ from the input and output prefixes")]
    ConflictingPrefix(String),

    #[error("{}: {}", .0.verdict, .0.message)]
    Compile(CaseOutcome),

    #[error("Cannot list testcases")]
    Discovery(#[source] fsutil::Error),
}

/// Tally of one session. Only failed cases keep their outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionReport {
    total: usize,
    passed: usize,
    failures: BTreeMap<CaseId, CaseOutcome>,
}

impl SessionReport {
    fn record(&mut self, id: CaseId, outcome: CaseOutcome) {
        self.total += 1;
        if outcome.is_success() {
            self.passed += 1;
        } else {
            self.failures.insert(id, outcome);
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Failed cases in ascending id order.
    pub fn failures(&self) -> &BTreeMap<CaseId, CaseOutcome> {
        &self.failures
    }

    pub fn all_passed(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn exit_code(&self) -> i32 {
        if self.all_passed() {
            EXIT_SUCCESS
        } else {
            EXIT_FAILURE
        }
    }
}

/// Compile once, run every testcase in ascending order, print the report, delete the artifact.
pub struct JudgeSession<C = Gxx, R = SystemRunner> {
    cfg: JudgeConfig,
    compiler: C,
    runner: R,
    platform: &'static dyn Platform,
}

impl JudgeSession {
    pub fn new(cfg: JudgeConfig) -> Self {
        Self::with_toolchain(cfg, Gxx::new(), SystemRunner)
    }
}

impl<C: Compiler, R: ProcessRunner> JudgeSession<C, R> {
    pub fn with_toolchain(cfg: JudgeConfig, compiler: C, runner: R) -> Self {
        Self {
            cfg,
            compiler,
            runner,
            platform: platform::host(),
        }
    }

    pub async fn run(&self) -> Result<SessionReport, SessionError> {
        let cfg = &self.cfg;
        let dir = cfg.get_testcase_dir();
        if !dir.is_dir() {
            return Err(SessionError::TestcaseDirNotFound(dir.to_owned()));
        }
        check_prefixes(cfg)?;

        let artifact = cfg.get_artifact_path();
        style::print_step(
            1,
            &format!("Compiling {}", cfg.get_source_file().display()),
        );
        let compiled = self
            .compiler
            .compile(cfg.get_source_file(), artifact)
            .await;
        if !compiled.is_success() {
            return Err(SessionError::Compile(compiled));
        }
        let _cleanup = ArtifactCleanup {
            path: artifact,
            platform: self.platform,
        };

        style::print_step(2, &format!("Scanning testcase directory {}", dir.display()));
        let cases = discovery::list_cases(dir, cfg.get_input_prefix(), cfg.get_file_suffix())
            .map_err(SessionError::Discovery)?;
        if cases.is_empty() {
            eprintln!(
                "No testcases found (looking for {})",
                cfg.input_location_pattern().display()
            );
            return Ok(SessionReport::default());
        }
        style::print_case_list(&cases);

        style::print_step(3, "Running testcases");
        let executor = CaseExecutor::new(cfg, &self.runner, artifact, self.platform);
        let mut report = SessionReport::default();
        for id in cases {
            let spinner = style::case_spinner(id);
            let outcome = executor.run_case(id).await;
            style::finish_case_spinner(spinner, id, &outcome);
            if !outcome.is_success() {
                eprintln!("Testcase {}: {}", id, outcome.message);
            }
            report.record(id, outcome);
        }

        style::print_session_report(&report, cfg);
        Ok(report)
    }
}

/// Deletes the compiled artifact when the session scope ends, however it ends.
struct ArtifactCleanup<'a> {
    path: &'a Path,
    platform: &'a dyn Platform,
}

impl Drop for ArtifactCleanup<'_> {
    fn drop(&mut self) {
        match self.platform.delete_file(self.path) {
            Ok(()) => log::debug!("Removed {}", self.path.display()),
            Err(e) => log::warn!("Failed to clean temporary file: {:#}", e),
        }
    }
}

fn check_prefixes(cfg: &JudgeConfig) -> Result<(), SessionError> {
    match cfg.conflicting_prefix() {
        Some(prefix) => Err(SessionError::ConflictingPrefix(prefix.to_owned())),
        None => Ok(()),
    }
}

/// Remove persisted mismatch files and temporary outputs left by interrupted sessions.
/// Only exact `<error_prefix><digits>.<suffix>` and `.grader-<pid>-<id>.<suffix>` names are
/// touched. Returns how many files were removed; individual failures are only logged.
pub fn clean_persisted_outputs(cfg: &JudgeConfig) -> Result<usize, SessionError> {
    check_prefixes(cfg)?;
    let dir = cfg.get_testcase_dir();
    let mismatches = fsutil::find_files_matching(dir, &cfg.mismatch_glob())
        .map_err(SessionError::Discovery)?
        .into_iter()
        .filter(|p| file_name_satisfies(p, |name| cfg.is_mismatch_file_name(name)));
    let temps = fsutil::find_files_matching(dir, &cfg.temp_output_glob())
        .map_err(SessionError::Discovery)?
        .into_iter()
        .filter(|p| file_name_satisfies(p, |name| cfg.is_temp_output_file_name(name)));

    let mut removed = 0;
    for path in mismatches.chain(temps) {
        match fsutil::remove_file(&path) {
            Ok(()) => {
                log::info!("Removed {}", path.display());
                removed += 1;
            }
            Err(e) => log::warn!("{:#}", e),
        }
    }
    Ok(removed)
}

fn file_name_satisfies(path: &Path, pred: impl Fn(&str) -> bool) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map_or(false, pred)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::Verdict;

    #[test]
    fn report_tallies_and_keeps_failures_sorted() {
        let mut r = SessionReport::default();
        r.record(CaseId(1), CaseOutcome::success("ok"));
        r.record(CaseId(5), CaseOutcome::run_error("boom"));
        r.record(CaseId(3), CaseOutcome::file_missing("gone"));

        assert_eq!(r.total(), 3);
        assert_eq!(r.passed(), 1);
        assert_eq!(r.failed(), 2);
        assert_eq!(
            r.failures().keys().copied().collect::<Vec<_>>(),
            vec![CaseId(3), CaseId(5)]
        );
        assert_eq!(r.failures()[&CaseId(5)].verdict, Verdict::RunError);
        assert_eq!(r.exit_code(), EXIT_FAILURE);
    }

    #[test]
    fn empty_report_is_success() {
        let r = SessionReport::default();
        assert!(r.all_passed());
        assert_eq!(r.exit_code(), EXIT_SUCCESS);
    }

    #[test]
    fn clean_removes_mismatches_and_stale_temps_only() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = JudgeConfig::default().testcase_dir(dir.path());
        for name in [
            "input1.txt",
            "output1.txt",
            "error1.txt",
            "error12.txt",
            "errors.txt",
            "error1_notes.txt",
            "error2-backup.txt",
            "error3.old.txt",
            ".grader-notes-1.txt",
        ] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        std::fs::write(cfg.temp_output_path(CaseId(4)), "").unwrap();

        assert_eq!(clean_persisted_outputs(&cfg).unwrap(), 3);

        let mut left: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        left.sort();
        assert_eq!(
            left,
            vec![
                ".grader-notes-1.txt",
                "error1_notes.txt",
                "error2-backup.txt",
                "error3.old.txt",
                "errors.txt",
                "input1.txt",
                "output1.txt",
            ]
        );
    }

    #[test]
    fn clean_refuses_an_error_prefix_that_names_testcase_files() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = JudgeConfig::default()
            .testcase_dir(dir.path())
            .error_prefix("output");
        std::fs::write(dir.path().join("output1.txt"), "5\n").unwrap();

        let err = clean_persisted_outputs(&cfg).unwrap_err();
        assert!(matches!(err, SessionError::ConflictingPrefix(_)));
        assert!(dir.path().join("output1.txt").exists());
    }

    #[test]
    fn compile_error_message_carries_diagnostics() {
        let err = SessionError::Compile(CaseOutcome::compile_error("Compile failed:\nmain.cpp:1"));
        assert_eq!(err.to_string(), "COMPILE_ERROR: Compile failed:\nmain.cpp:1");
    }
}
