use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "vigil",
    about = "Polls streaming platforms and notifies when tracked accounts go live",
    version
)]
pub struct Args {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start polling tracked accounts
    Run {
        /// Execute a single poll cycle and exit
        #[arg(long)]
        once: bool,
    },

    /// Track an account (platform: youtube, twitch, tiktok or kick)
    Add {
        platform: String,
        username: String,
        /// Name shown in notifications (defaults to the username)
        #[arg(long)]
        display_name: Option<String>,
    },

    /// Stop tracking an account
    Remove { platform: String, username: String },

    /// List tracked accounts
    List,

    /// Send a test notification through the configured webhook
    Test,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run() {
        let args = Args::parse_from(["vigil", "run", "--once"]);
        assert!(matches!(args.command, Commands::Run { once: true }));
    }

    #[test]
    fn test_parse_add_with_display_name() {
        let args = Args::parse_from([
            "vigil",
            "add",
            "twitch",
            "ninja",
            "--display-name",
            "Ninja",
        ]);
        match args.command {
            Commands::Add {
                platform,
                username,
                display_name,
            } => {
                assert_eq!(platform, "twitch");
                assert_eq!(username, "ninja");
                assert_eq!(display_name.as_deref(), Some("Ninja"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags() {
        let args = Args::parse_from(["vigil", "--verbose", "list"]);
        assert!(args.verbose);
        assert!(!args.quiet);
        assert!(matches!(args.command, Commands::List));
    }
}
