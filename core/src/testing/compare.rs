use std::{fmt, path::Path};

/// One entry of a diff report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discrepancy {
    /// `tail` holds the first lines past the shorter side, numbered from
    /// `min(actual, expected) + 1`; `omitted` counts the ones left out.
    LineCount {
        actual: usize,
        expected: usize,
        tail: Vec<String>,
        omitted: usize,
    },
    /// `number` is 1-based.
    Line {
        number: usize,
        actual: String,
        expected: String,
    },
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discrepancy::LineCount {
                actual,
                expected,
                tail,
                omitted,
            } => {
                write!(
                    f,
                    "Line count mismatch: your output has {} line(s), expected {}",
                    actual, expected
                )?;
                let first = actual.min(expected) + 1;
                let what = if actual > expected {
                    "Extra lines in your output"
                } else {
                    "Missing lines in your output"
                };
                write!(f, "\n  {} (from line {}):", what, first)?;
                for (i, line) in tail.iter().enumerate() {
                    write!(f, "\n    Line {}: {}", first + i, line)?;
                }
                if *omitted > 0 {
                    write!(f, "\n    ... {} more line(s)", omitted)?;
                }
                Ok(())
            }
            Discrepancy::Line {
                number,
                actual,
                expected,
            } => write!(
                f,
                "Line {} mismatch:\n  Your output: {}\n  Expected:    {}",
                number, actual, expected
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comparison {
    pub discrepancies: Vec<Discrepancy>,
}

impl Comparison {
    pub fn is_equal(&self) -> bool {
        self.discrepancies.is_empty()
    }

    pub fn report(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, d) in self.discrepancies.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", d)?;
        }
        Ok(())
    }
}

/// Line-by-line comparison of two files that the caller has already checked exist.
/// A file that exists but cannot be read is an error, not an empty file.
pub fn compare_files(
    actual: impl AsRef<Path>,
    expected: impl AsRef<Path>,
) -> fsutil::Result<Comparison> {
    let actual = fsutil::read(actual)?;
    let expected = fsutil::read(expected)?;
    Ok(compare_bytes(&actual, &expected))
}

/// How many extra or missing lines a line-count entry quotes.
pub const MAX_TAIL_LINES: usize = 5;

pub fn compare_bytes(actual: &[u8], expected: &[u8]) -> Comparison {
    let actual = split_lines(actual);
    let expected = split_lines(expected);
    let mut discrepancies = Vec::new();

    if actual.len() != expected.len() {
        let longer = if actual.len() > expected.len() {
            &actual
        } else {
            &expected
        };
        let common = actual.len().min(expected.len());
        let rest = &longer[common..];
        let listed = rest.len().min(MAX_TAIL_LINES);
        discrepancies.push(Discrepancy::LineCount {
            actual: actual.len(),
            expected: expected.len(),
            tail: rest[..listed].iter().map(|l| lossy(l)).collect(),
            omitted: rest.len() - listed,
        });
    }

    for (i, (a, e)) in actual.iter().zip(&expected).enumerate() {
        if a != e {
            discrepancies.push(Discrepancy::Line {
                number: i + 1,
                actual: lossy(a),
                expected: lossy(e),
            });
        }
    }

    Comparison { discrepancies }
}

/// Splits on `\n` and drops trailing `\r`s, so CRLF and LF files compare equal.
/// A final terminator does not open an extra empty line.
fn split_lines(data: &[u8]) -> Vec<&[u8]> {
    let mut lines: Vec<&[u8]> = data.split(|&b| b == b'\n').collect();
    if lines.last().map_or(false, |l| l.is_empty()) {
        lines.pop();
    }
    lines.into_iter().map(strip_trailing_cr).collect()
}

fn strip_trailing_cr(mut line: &[u8]) -> &[u8] {
    while let [rest @ .., b'\r'] = line {
        line = rest;
    }
    line
}

fn lossy(line: &[u8]) -> String {
    String::from_utf8_lossy(line).into_owned()
}

#[cfg(test)]
mod test {
    use super::*;

    fn line(number: usize, actual: &str, expected: &str) -> Discrepancy {
        Discrepancy::Line {
            number,
            actual: actual.into(),
            expected: expected.into(),
        }
    }

    #[test]
    fn identical_is_equal() {
        let c = compare_bytes(b"1 2\n3\n", b"1 2\n3\n");
        assert!(c.is_equal());
        assert_eq!(c.report(), "");
    }

    #[test]
    fn crlf_equals_lf() {
        assert!(compare_bytes(b"5\r\n6\r\n", b"5\n6\n").is_equal());
        assert!(compare_bytes(b"5\r\r\n", b"5").is_equal());
    }

    #[test]
    fn missing_final_newline_is_equal() {
        assert!(compare_bytes(b"5", b"5\n").is_equal());
    }

    #[test]
    fn both_empty_is_equal() {
        assert!(compare_bytes(b"", b"").is_equal());
    }

    #[test]
    fn trailing_spaces_are_significant() {
        let c = compare_bytes(b"5 \n", b"5\n");
        assert_eq!(c.discrepancies, vec![line(1, "5 ", "5")]);
    }

    #[test]
    fn per_line_mismatches_are_numbered() {
        let c = compare_bytes(b"a\nB\nc\nD\n", b"a\nb\nc\nd\n");
        assert_eq!(c.discrepancies, vec![line(2, "B", "b"), line(4, "D", "d")]);
        assert_eq!(
            c.report(),
            "Line 2 mismatch:\n  Your output: B\n  Expected:    b\n\
             Line 4 mismatch:\n  Your output: D\n  Expected:    d"
        );
    }

    #[test]
    fn line_count_mismatch_is_reported_once_and_prefix_still_compared() {
        let c = compare_bytes(b"x\n2\n3\n", b"1\n2\n");
        assert_eq!(
            c.discrepancies,
            vec![
                Discrepancy::LineCount {
                    actual: 3,
                    expected: 2,
                    tail: vec!["3".into()],
                    omitted: 0,
                },
                line(1, "x", "1"),
            ]
        );
        let count = c
            .discrepancies
            .iter()
            .filter(|d| matches!(d, Discrepancy::LineCount { .. }))
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn missing_lines_are_listed() {
        let c = compare_bytes(b"1\n", b"1\n2\n3\n");
        assert!(!c.is_equal());
        assert_eq!(
            c.report(),
            "Line count mismatch: your output has 1 line(s), expected 3\n  \
             Missing lines in your output (from line 2):\n    Line 2: 2\n    Line 3: 3"
        );
    }

    #[test]
    fn long_tail_is_truncated() {
        let expected: String = (1..=200_000).map(|i| format!("{}\n", i)).collect();
        let c = compare_bytes(b"", expected.as_bytes());
        assert_eq!(c.discrepancies.len(), 1);

        let report = c.report();
        assert_eq!(report.lines().count(), 2 + MAX_TAIL_LINES + 1, "{}", report);
        assert!(report.contains("    Line 5: 5"), "{}", report);
        assert!(!report.contains("Line 6: 6"), "{}", report);
        assert!(
            report.ends_with(&format!("... {} more line(s)", 200_000 - MAX_TAIL_LINES)),
            "{}",
            report
        );
    }

    #[test]
    fn empty_output_against_single_empty_line() {
        let c = compare_bytes(b"", b"\n");
        assert_eq!(c.discrepancies.len(), 1);
    }

    #[test]
    fn compare_files_reads_both_sides() {
        let dir = tempfile::tempdir().unwrap();
        let actual = dir.path().join("actual.txt");
        let expected = dir.path().join("expected.txt");
        std::fs::write(&actual, "5\r\n").unwrap();
        std::fs::write(&expected, "5\n").unwrap();

        assert!(compare_files(&actual, &expected).unwrap().is_equal());
    }

    #[test]
    fn unreadable_file_is_an_error_not_empty() {
        let dir = tempfile::tempdir().unwrap();
        let actual = dir.path().join("actual.txt");
        std::fs::write(&actual, "").unwrap();

        let res = compare_files(&actual, dir.path().join("nope.txt"));
        assert!(res.is_err());
    }
}
