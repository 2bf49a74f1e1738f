use std::path::PathBuf;

use anyhow::Context as _;
use clap::{ArgAction, Parser};
use grader_core::{
    session::{self, EXIT_FAILURE, EXIT_SUCCESS},
    JudgeConfig, JudgeSession,
};

const USAGE_EXAMPLES: &str = "\
Examples:
  grader
  grader -t mytest -i in -o ans -c sol.cpp";

#[derive(Debug, clap::Parser)]
#[command(author, version, about, long_about = None, after_help = USAGE_EXAMPLES)]
pub struct Args {
    /// Testcase directory [default: testcase]
    #[arg(short = 't', long = "testcase", value_name = "DIR")]
    pub testcase_dir: Option<PathBuf>,

    /// Input filename prefix [default: input]
    #[arg(short = 'i', long = "input", value_name = "PREFIX")]
    pub input_prefix: Option<String>,

    /// Expected output filename prefix [default: output]
    #[arg(short = 'o', long = "output", value_name = "PREFIX")]
    pub output_prefix: Option<String>,

    /// Prefix of saved wrong outputs [default: error]
    #[arg(short = 'e', long = "error", value_name = "PREFIX")]
    pub error_prefix: Option<String>,

    /// Source file to compile [default: main.cpp]
    #[arg(short = 'c', long = "code", value_name = "FILE")]
    pub source_file: Option<PathBuf>,

    /// Remove saved wrong outputs and leftover temporary files, then exit
    #[arg(long)]
    pub clean: bool,

    /// Log more (-v: info, -vv: debug)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Like [`Parser::parse`], but a bad command line exits with 1 instead of clap's 2.
    pub fn parse_or_exit() -> Self {
        Self::try_parse().unwrap_or_else(|e| {
            let _ = e.print();
            std::process::exit(if e.use_stderr() {
                EXIT_FAILURE
            } else {
                EXIT_SUCCESS
            })
        })
    }

    pub fn to_config(&self) -> JudgeConfig {
        let mut cfg = JudgeConfig::default();
        if let Some(dir) = &self.testcase_dir {
            cfg = cfg.testcase_dir(dir);
        }
        if let Some(prefix) = &self.input_prefix {
            cfg = cfg.input_prefix(prefix);
        }
        if let Some(prefix) = &self.output_prefix {
            cfg = cfg.output_prefix(prefix);
        }
        if let Some(prefix) = &self.error_prefix {
            cfg = cfg.error_prefix(prefix);
        }
        if let Some(file) = &self.source_file {
            cfg = cfg.source_file(file);
        }
        cfg
    }

    /// Returns the process exit code.
    pub async fn exec(&self) -> anyhow::Result<i32> {
        let cfg = self.to_config();
        log::debug!("{:?}", cfg);

        if self.clean {
            let removed = session::clean_persisted_outputs(&cfg).with_context(|| {
                format!("Failed to clean {}", cfg.get_testcase_dir().display())
            })?;
            println!(
                "Removed {} file(s) from {}",
                removed,
                cfg.get_testcase_dir().display()
            );
            return Ok(EXIT_SUCCESS);
        }

        let report = JudgeSession::new(cfg).run().await?;
        Ok(report.exit_code())
    }
}
