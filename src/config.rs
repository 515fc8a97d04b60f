// ⚙️ Configuration - command line flags resolved into a runtime Config

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;

use crate::storage::{FileStorage, LocalStorage, SqliteStorage};

const APP_DIR_NAME: &str = "salary-calculator";
const SQLITE_FILE_NAME: &str = "salary-calculator.db";

#[derive(Debug, Parser)]
#[command(name = "salary-calculator", version, about = "Personal monthly budget calculator")]
pub struct Cli {
    /// Directory holding saved state and logs
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Where the saved state lives
    #[arg(long, global = true, value_enum, default_value_t = Backend::File)]
    pub backend: Backend,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Interactive terminal UI (default)
    Ui,

    /// Print salary, totals, net income and breakdown
    Summary,

    /// Write every record to a CSV file
    Export {
        /// Output file (default: salary-calculator-YYYY-MM-DD.csv)
        path: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// One JSON file per key
    File,
    /// SQLite key/value table
    Sqlite,
}

/// Resolved runtime settings
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub backend: Backend,
    pub verbosity: u8,
    pub command: Command,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Self {
        let data_dir = cli.data_dir.unwrap_or_else(default_data_dir);
        Config {
            data_dir,
            backend: cli.backend,
            verbosity: cli.verbose,
            command: cli.command.unwrap_or(Command::Ui),
        }
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    /// Default tracing filter when RUST_LOG is not set
    pub fn log_level(&self) -> &'static str {
        match self.verbosity {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    pub fn ensure_data_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("failed to create data dir {}", self.data_dir.display()))
    }

    /// Open the configured storage backend inside the data directory
    pub fn open_storage(&self) -> Result<Box<dyn LocalStorage>> {
        match self.backend {
            Backend::File => Ok(Box::new(FileStorage::new(&self.data_dir))),
            Backend::Sqlite => {
                let path = self.data_dir.join(SQLITE_FILE_NAME);
                Ok(Box::new(SqliteStorage::open(&path)?))
            }
        }
    }
}

/// Platform data dir (e.g. ~/.local/share/salary-calculator), or the current
/// directory when the platform has none.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["salary-calculator"]).unwrap();
        let config = Config::from_cli(cli);

        assert_eq!(config.backend, Backend::File);
        assert_eq!(config.command, Command::Ui);
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.data_dir, default_data_dir());
    }

    #[test]
    fn test_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "salary-calculator",
            "export",
            "out.csv",
            "--data-dir",
            "/tmp/calc",
            "--backend",
            "sqlite",
            "-vv",
        ])
        .unwrap();
        let config = Config::from_cli(cli);

        assert_eq!(
            config.command,
            Command::Export {
                path: Some(PathBuf::from("out.csv"))
            }
        );
        assert_eq!(config.data_dir, PathBuf::from("/tmp/calc"));
        assert_eq!(config.backend, Backend::Sqlite);
        assert_eq!(config.log_level(), "trace");
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/calc/logs"));
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let result = Cli::try_parse_from(["salary-calculator", "--backend", "redis"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_open_storage_backends() {
        let dir = tempfile::tempdir().unwrap();

        for backend in [Backend::File, Backend::Sqlite] {
            let config = Config {
                data_dir: dir.path().to_path_buf(),
                backend,
                verbosity: 0,
                command: Command::Summary,
            };
            config.ensure_data_dir().unwrap();

            let mut storage = config.open_storage().unwrap();
            storage.set_item("k", "v").unwrap();
            assert_eq!(storage.get_item("k").unwrap(), Some("v".to_string()));
        }

        assert!(dir.path().join("k.json").exists());
        assert!(dir.path().join(SQLITE_FILE_NAME).exists());
    }
}
