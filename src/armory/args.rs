use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "armory", version)]
#[command(about = "Interactive launcher for CTF and security tooling", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use a custom configuration directory
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// System health check and tool status
    Health,

    /// List all cataloged tools by category
    #[command(alias = "ls")]
    List,

    /// Launch a tool in a new terminal window
    Launch {
        /// Tool name (catalog id or executable name)
        tool: String,

        /// Parameter values as key=value (repeatable)
        #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,

        /// Print the rendered command instead of launching it
        #[arg(long)]
        print: bool,
    },

    /// First-run setup: write default configs and report what's missing
    Setup,

    /// Get or set configuration
    Config {
        /// Configuration key (terminal, working-dir, colors)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Open a short test window in a terminal emulator
    TerminalTest {
        /// Emulator to test (defaults to the selected one)
        terminal: Option<String>,
    },

    /// Remove leftover launch scripts from the temp directory
    Cleanup,
}
