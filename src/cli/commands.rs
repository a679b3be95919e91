use std::path::PathBuf;

use clap::{Args, Parser};

#[derive(Parser, Debug)]
#[command(
    name = "board-report",
    about = concat!("board-report v", env!("CARGO_PKG_VERSION"), " - what moved on the project board since last time"),
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub window: WindowArgs,

    #[command(flatten)]
    pub board: BoardArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Read settings from this TOML file (default: ./board-report.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Classify a previously dumped raw JSON file instead of fetching
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Print the changed items as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

// ---------------------------------------------------------------------------
// Time window
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct WindowArgs {
    /// Date YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<String>,
    /// Start time HH:MM, local (default: [window] start from the config file)
    #[arg(long)]
    pub start: Option<String>,
    /// End time HH:MM, local (default: now for today, end of day otherwise)
    #[arg(long)]
    pub end: Option<String>,
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct BoardArgs {
    /// GitHub organization (default: cncf)
    #[arg(long)]
    pub org: Option<String>,
    /// Project V2 board number (default: 88)
    #[arg(long)]
    pub project_number: Option<u32>,
}

// ---------------------------------------------------------------------------
// Output files
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Markdown report path (default: board_report_YYYY-MM-DD.md)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Raw JSON dump path (default: board_data_YYYY-MM-DD.json)
    #[arg(long)]
    pub json_file: Option<PathBuf>,
    /// Do not write the raw JSON dump
    #[arg(long)]
    pub no_dump_json: bool,
}
