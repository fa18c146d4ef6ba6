//! # Command Line
//!
//! ```text
//! fatura [--config <PATH>] [--db <PATH>] <COMMAND>
//!
//!   summarize <DRAFT>     replay a JSON draft ("-" for stdin), print the summary
//!   next-number <TYPE>    allocate one number for quote | order | invoice
//!   config                print the effective configuration as TOML
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "fatura")]
#[command(about = "Bilingual quote, sales order and tax invoice engine")]
#[command(version)]
pub struct Cli {
    /// Config file (default: fatura.toml in the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Counter database file (overrides config and FATURA_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replay a JSON document draft and print its summary as JSON
    Summarize {
        /// Draft file, or "-" to read standard input
        draft: PathBuf,
    },

    /// Allocate the next document number
    NextNumber {
        /// quote, order or invoice
        document_type: String,
    },

    /// Print the effective configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_summarize_with_globals() {
        let cli = Cli::try_parse_from(["fatura", "summarize", "draft.json", "--db", "/tmp/x.db"]).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
        assert!(matches!(cli.command, Command::Summarize { draft } if draft == PathBuf::from("draft.json")));
    }

    #[test]
    fn test_parse_next_number() {
        let cli = Cli::try_parse_from(["fatura", "--config", "f.toml", "next-number", "quote"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("f.toml")));
        assert!(matches!(cli.command, Command::NextNumber { document_type } if document_type == "quote"));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["fatura"]).is_err());
    }
}
