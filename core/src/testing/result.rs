use std::{fmt, path::PathBuf};

/// Number taken from a testcase file name, `12` in `input12.txt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CaseId(pub u64);

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Success,
    CompileError,
    RunError,
    FileMissing,
    AnswerMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseOutcome {
    pub verdict: Verdict,
    pub message: String,
    /// Set only for [`Verdict::AnswerMismatch`]: where the program's output was kept.
    pub mismatch_file: Option<PathBuf>,
}

impl CaseOutcome {
    pub fn new(verdict: Verdict, message: impl Into<String>) -> Self {
        Self {
            verdict,
            message: message.into(),
            mismatch_file: None,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Verdict::Success, message)
    }

    pub fn compile_error(message: impl Into<String>) -> Self {
        Self::new(Verdict::CompileError, message)
    }

    pub fn run_error(message: impl Into<String>) -> Self {
        Self::new(Verdict::RunError, message)
    }

    pub fn file_missing(message: impl Into<String>) -> Self {
        Self::new(Verdict::FileMissing, message)
    }

    pub fn answer_mismatch(message: impl Into<String>, mismatch_file: Option<PathBuf>) -> Self {
        Self {
            verdict: Verdict::AnswerMismatch,
            message: message.into(),
            mismatch_file,
        }
    }

    pub fn is_success(&self) -> bool {
        self.verdict == Verdict::Success
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn verdict_names() {
        assert_eq!(Verdict::Success.to_string(), "SUCCESS");
        assert_eq!(Verdict::CompileError.to_string(), "COMPILE_ERROR");
        assert_eq!(Verdict::RunError.to_string(), "RUN_ERROR");
        assert_eq!(Verdict::FileMissing.to_string(), "FILE_MISSING");
        assert_eq!(Verdict::AnswerMismatch.to_string(), "ANSWER_MISMATCH");
    }

    #[test]
    fn case_ids_order_numerically() {
        let mut ids = vec![CaseId(10), CaseId(2), CaseId(1)];
        ids.sort();
        assert_eq!(ids, vec![CaseId(1), CaseId(2), CaseId(10)]);
        assert_eq!(CaseId(10).to_string(), "10");
    }
}
