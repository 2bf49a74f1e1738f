use std::path::{Path, PathBuf};

use crate::platform;
use crate::testing::{discovery, CaseId};

/// Everything a judge session reads. Built once (defaults + overrides) and never mutated after
/// the session takes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgeConfig {
    testcase_dir: PathBuf,
    input_prefix: String,
    output_prefix: String,
    error_prefix: String,
    file_suffix: String,
    source_file: PathBuf,
    artifact_path: PathBuf,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            testcase_dir: Self::DEFAULT_TESTCASE_DIR.into(),
            input_prefix: Self::DEFAULT_INPUT_PREFIX.into(),
            output_prefix: Self::DEFAULT_OUTPUT_PREFIX.into(),
            error_prefix: Self::DEFAULT_ERROR_PREFIX.into(),
            file_suffix: Self::FILE_SUFFIX.into(),
            source_file: Self::DEFAULT_SOURCE_FILE.into(),
            artifact_path: format!(
                "{}{}",
                Self::ARTIFACT_STEM,
                platform::host().executable_suffix()
            )
            .into(),
        }
    }
}

impl JudgeConfig {
    pub const DEFAULT_TESTCASE_DIR: &str = "testcase";
    pub const DEFAULT_INPUT_PREFIX: &str = "input";
    pub const DEFAULT_OUTPUT_PREFIX: &str = "output";
    pub const DEFAULT_ERROR_PREFIX: &str = "error";
    pub const DEFAULT_SOURCE_FILE: &str = "main.cpp";
    pub const FILE_SUFFIX: &str = "txt";
    const ARTIFACT_STEM: &str = "judge_temp";
    const TEMP_OUTPUT_PREFIX: &str = ".grader-";

    pub fn testcase_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.testcase_dir = dir.into();
        self
    }

    pub fn input_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.input_prefix = prefix.into();
        self
    }

    pub fn output_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.output_prefix = prefix.into();
        self
    }

    pub fn error_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.error_prefix = prefix.into();
        self
    }

    pub fn source_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_file = path.into();
        self
    }

    pub fn artifact_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifact_path = path.into();
        self
    }

    pub fn get_testcase_dir(&self) -> &Path {
        &self.testcase_dir
    }

    pub fn get_input_prefix(&self) -> &str {
        &self.input_prefix
    }

    pub fn get_output_prefix(&self) -> &str {
        &self.output_prefix
    }

    pub fn get_error_prefix(&self) -> &str {
        &self.error_prefix
    }

    pub fn get_file_suffix(&self) -> &str {
        &self.file_suffix
    }

    pub fn get_source_file(&self) -> &Path {
        &self.source_file
    }

    pub fn get_artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    fn case_file(&self, prefix: &str, id: CaseId) -> PathBuf {
        self.testcase_dir
            .join(format!("{}{}.{}", prefix, id, self.file_suffix))
    }

    pub fn input_path(&self, id: CaseId) -> PathBuf {
        self.case_file(&self.input_prefix, id)
    }

    pub fn expected_output_path(&self, id: CaseId) -> PathBuf {
        self.case_file(&self.output_prefix, id)
    }

    pub fn mismatch_path(&self, id: CaseId) -> PathBuf {
        self.case_file(&self.error_prefix, id)
    }

    /// Where the program's stdout goes while case `id` runs.
    /// The process id keeps two sessions on the same directory from clobbering each other.
    pub fn temp_output_path(&self, id: CaseId) -> PathBuf {
        self.testcase_dir.join(format!(
            "{}{}-{}.{}",
            Self::TEMP_OUTPUT_PREFIX,
            std::process::id(),
            id,
            self.file_suffix
        ))
    }

    /// Human-readable location of persisted mismatches, e.g. `testcase/errorx.txt`.
    pub fn mismatch_location_pattern(&self) -> PathBuf {
        self.case_file_pattern(&self.error_prefix)
    }

    /// e.g. `testcase/inputx.txt`
    pub fn input_location_pattern(&self) -> PathBuf {
        self.case_file_pattern(&self.input_prefix)
    }

    fn case_file_pattern(&self, prefix: &str) -> PathBuf {
        self.testcase_dir
            .join(format!("{}x.{}", prefix, self.file_suffix))
    }

    /// Glob (file name only) preselecting persisted mismatch files.
    /// Broader than the naming rule; confirm with [`Self::is_mismatch_file_name`].
    pub fn mismatch_glob(&self) -> String {
        format!(
            "{}[0-9]*.{}",
            fsutil::escape_glob(&self.error_prefix),
            fsutil::escape_glob(&self.file_suffix)
        )
    }

    /// Glob (file name only) preselecting temporary outputs of any session, including ones that
    /// were killed before they could clean up. Confirm with [`Self::is_temp_output_file_name`].
    pub fn temp_output_glob(&self) -> String {
        format!(
            "{}*-*.{}",
            fsutil::escape_glob(Self::TEMP_OUTPUT_PREFIX),
            fsutil::escape_glob(&self.file_suffix)
        )
    }

    /// `<error_prefix><digits>.<suffix>` and nothing else.
    pub fn is_mismatch_file_name(&self, name: &str) -> bool {
        discovery::parse_case_id(name, &self.error_prefix, &self.file_suffix).is_some()
    }

    /// `.grader-<pid>-<id>.<suffix>` and nothing else.
    pub fn is_temp_output_file_name(&self, name: &str) -> bool {
        let Some(rest) = name.strip_prefix(Self::TEMP_OUTPUT_PREFIX) else {
            return false
        };
        let Some((pid, case)) = rest.split_once('-') else {
            return false
        };
        let is_number = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        is_number(pid) && discovery::parse_case_id(case, "", &self.file_suffix).is_some()
    }

    /// Error prefix equal to the input or output prefix would make stale-mismatch removal
    /// delete the testcase files themselves.
    pub fn conflicting_prefix(&self) -> Option<&str> {
        if self.error_prefix == self.input_prefix || self.error_prefix == self.output_prefix {
            Some(&self.error_prefix)
        } else {
            None
        }
    }
}
