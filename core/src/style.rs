use std::{collections::BTreeMap, time::Duration};

use colored::{Color, ColoredString, Colorize};
use crossterm::terminal;
use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    config::JudgeConfig,
    session::SessionReport,
    testing::{CaseId, CaseOutcome, Verdict},
};

pub fn is_truecolor_supported() -> bool {
    let Ok(v) = std::env::var("COLORTERM") else {
        return false
    };
    matches!(v.as_str(), "truecolor" | "24bit")
}

pub trait ColorTheme {
    fn color(&self) -> Color;
}

impl ColorTheme for log::Level {
    fn color(&self) -> Color {
        use log::Level::*;
        match self {
            Error => Color::BrightRed,
            Warn => Color::BrightYellow,
            Info => Color::Cyan,
            Debug => Color::Magenta,
            Trace => Color::Blue,
        }
    }
}

impl ColorTheme for Verdict {
    fn color(&self) -> Color {
        use Verdict::*;
        if !self::is_truecolor_supported() {
            return match self {
                Success => Color::Green,
                AnswerMismatch => Color::Yellow,
                RunError => Color::Magenta,
                CompileError => Color::Red,
                FileMissing => Color::Blue,
            };
        }

        match self {
            Success => Color::TrueColor {
                r: 30,
                g: 180,
                b: 40,
            },
            AnswerMismatch => Color::TrueColor {
                r: 210,
                g: 138,
                b: 4,
            },
            RunError => Color::TrueColor {
                r: 171,
                g: 40,
                b: 200,
            },
            CompileError => Color::TrueColor {
                r: 220,
                g: 42,
                b: 42,
            },
            FileMissing => Color::TrueColor {
                r: 60,
                g: 110,
                b: 220,
            },
        }
    }
}

pub fn verdict_badge(verdict: Verdict) -> ColoredString {
    let fg = if is_truecolor_supported() {
        Color::TrueColor {
            r: 255,
            g: 255,
            b: 255,
        }
    } else {
        Color::BrightBlack
    };
    format!(" {} ", verdict)
        .on_color(verdict.color())
        .bold()
        .color(fg)
}

pub fn print_step(n: usize, msg: &str) {
    println!("{} {}", format!("[{}]", n).cyan().bold(), msg);
}

pub fn print_case_list(cases: &[CaseId]) {
    let ids = cases
        .iter()
        .map(CaseId::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    println!("Found {} testcase(s): {}", cases.len(), ids.bold());
}

pub fn case_spinner(id: CaseId) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("Testcase {}", id));
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Replace the spinner with the verdict line. Must run before anything else is printed.
pub fn finish_case_spinner(pb: ProgressBar, id: CaseId, outcome: &CaseOutcome) {
    pb.finish_and_clear();
    println!("Testcase {}: {}", id, verdict_badge(outcome.verdict));
}

pub fn print_session_report(report: &SessionReport, cfg: &JudgeConfig) {
    let (cols, _) = terminal::size().unwrap_or((40, 40));
    let bar = "━".repeat(cols as usize).blue().bold();

    println!("\n{}", bar);
    println!(
        "Total: {}  Passed: {}  Failed: {}",
        report.total().to_string().bold(),
        report.passed().to_string().green().bold(),
        report.failed().to_string().bright_red().bold(),
    );

    if report.all_passed() {
        let msg = format!("All {} testcases passed ✨", report.total());
        println!("{}", msg.green());
        println!("{}", bar);
        return;
    }

    let failed_ids = report
        .failures()
        .keys()
        .map(CaseId::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    println!("Failed testcases: {}", failed_ids.bright_red());

    let count: BTreeMap<Verdict, usize> =
        report
            .failures()
            .values()
            .fold(BTreeMap::new(), |mut count, outcome| {
                *count.entry(outcome.verdict).or_default() += 1;
                count
            });
    let detail = count
        .iter()
        .map(|(&verdict, &cnt)| {
            format!(
                "{}{}{}",
                self::verdict_badge(verdict),
                "x".dimmed(),
                cnt.to_string().bold().bright_white(),
            )
        })
        .collect::<Vec<String>>()
        .join(", ");
    println!("{}", detail);

    for (id, outcome) in report.failures() {
        println!(
            "\n{}: {}\n{}",
            format!("Testcase {}", id).bright_yellow().bold(),
            self::verdict_badge(outcome.verdict),
            outcome.message,
        );
    }

    if report
        .failures()
        .values()
        .any(|o| o.mismatch_file.is_some())
    {
        println!(
            "\nWrong outputs were saved as {}",
            cfg.mismatch_location_pattern().display()
        );
    }
    println!("{}", bar);
}
