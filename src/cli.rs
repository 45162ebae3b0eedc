use cbnorm_metadata::Priority;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cbnorm", version, about = "Normalize comic book archives")]
pub struct Cli {
    /// Settings file (TOML). Defaults to cbnorm.toml in the platform config directory.
    #[arg(long, global = true, env = "CBNORM_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Registry of known scene groups, metadata files and hashes (JSON).
    #[arg(long, global = true, value_name = "FILE")]
    pub registry: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Remove known scene-group promos, reporting possible ones.
    Promos {
        #[arg(required = true)]
        archives: Vec<PathBuf>,
    },
    /// Remove files matching a known hash.
    Dedupe {
        #[arg(required = true)]
        archives: Vec<PathBuf>,
    },
    /// Remove known promos, known hashed files and Comixology meta files.
    Clean {
        #[arg(required = true)]
        archives: Vec<PathBuf>,
    },
    /// Print the classification of an extracted directory.
    Classify { dir: PathBuf },
    /// Merge two ComicInfo.xml documents and print the result.
    Merge {
        base: PathBuf,
        overlay: PathBuf,
        /// Which document wins when both define an element.
        #[arg(long, default_value = "overlay")]
        priority: Priority,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_merge() {
        let cli = Cli::try_parse_from(["cbnorm", "merge", "a.xml", "b.xml", "--priority", "base", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Merge { priority: Priority::Base, .. }));
    }

    #[test]
    fn test_archives_required() {
        assert!(Cli::try_parse_from(["cbnorm", "promos"]).is_err());
    }
}
