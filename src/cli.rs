use std::path::PathBuf;

use clap::{command, Parser, Subcommand};

// ///////////// //
// CLI interface //
// ///////////// //

/// smb2cups - Registers SMB-shared network printers as CUPS print queues, with location metadata, vendor PPD drivers and single-sided defaults.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file (defaults to smb2cups.toml in the working directory).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Embed this username in the SMB device URI of every queue.
    #[arg(long)]
    pub username: Option<String>,

    /// Submit a credential probe job after each registration so CUPS asks for SMB credentials right away.
    #[arg(long)]
    pub prompt_now: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, Default)]
pub enum Commands {
    /// Register every configured printer (the default when no subcommand is given).
    #[default]
    Install,
    /// Remove every configured print queue from the spooler.
    Uninstall,
    /// Dump the resolved install plan as JSON to stdout, without touching the spooler.
    Plan,
}
