use crate::core::engine::RunMode;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "hall-digest")]
#[command(about = "Emails a personalised digest of the weekly hall menu")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "hall-digest.toml")]
    pub config: String,

    /// Log to stdout and look up the current week instead of the checkpoint
    #[arg(short, long)]
    pub debug: bool,

    /// Render digests without sending them or touching the checkpoint
    #[arg(long)]
    pub dry_run: bool,
}

impl CliConfig {
    pub fn run_mode(&self) -> RunMode {
        if self.debug {
            RunMode::Debug
        } else {
            RunMode::Scheduled
        }
    }
}
