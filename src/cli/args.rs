use crate::formatting::ColorMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color when writing to a terminal
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

impl From<ColorChoice> for ColorMode {
    fn from(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Auto => ColorMode::Auto,
            ColorChoice::Always => ColorMode::Always,
            ColorChoice::Never => ColorMode::Never,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "coderefactor")]
#[command(about = "LLM-assisted Python code analysis and refactoring", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Python source file to analyze
    pub file: PathBuf,

    /// Write refactored code to this path
    #[arg(short = 'r', long = "refactor-output", value_name = "PATH")]
    pub refactor_output: Option<PathBuf>,

    /// Basic mode: faster, lighter analysis with a smaller model
    #[arg(long)]
    pub basic: bool,

    /// Expert mode: in-depth analysis focused on runtime and memory
    #[arg(long)]
    pub expert: bool,

    /// Model identifier (defaults depend on the mode)
    #[arg(long = "llm", value_name = "MODEL")]
    pub llm: Option<String>,

    /// Model provider
    #[arg(long = "llm-provider", value_name = "NAME")]
    pub llm_provider: Option<String>,

    /// Directory for the report file (defaults to the current directory)
    #[arg(long = "report-dir", value_name = "DIR")]
    pub report_dir: Option<PathBuf>,

    /// Configuration file (defaults to the nearest .coderefactor.toml)
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Install missing packages without asking
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// When to use terminal colors
    #[arg(long, value_enum, default_value = "auto")]
    pub color: ColorChoice,

    /// Suppress progress spinners and panels
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Increase verbosity level (can be repeated: -v, -vv)
    ///
    /// -v: debug logging
    /// -vv: trace logging
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
