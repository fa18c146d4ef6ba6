//! # Fatura CLI Library
//!
//! Configuration, state, commands and the entry point behind the `fatura`
//! binary.
//!
//! ## Module Organization
//! ```text
//! fatura_cli/
//! ├── lib.rs          ◄─── You are here (startup & dispatch)
//! ├── cli.rs          ◄─── clap argument definitions
//! ├── config.rs       ◄─── AppConfig (TOML + FATURA_* env)
//! ├── error.rs        ◄─── ApiError returned by commands
//! ├── state/
//! │   ├── document.rs ◄─── DocumentState (current session)
//! │   └── numbering.rs◄─── NumberingState (shared generator)
//! ├── commands/
//! │   ├── customer.rs ◄─── customer field edits
//! │   ├── items.rs    ◄─── line items and discount
//! │   └── document.rs ◄─── type, number, date, summary
//! ├── draft.rs        ◄─── JSON draft replay
//! └── summary.rs      ◄─── DocumentSummary for the renderer
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod draft;
pub mod error;
pub mod state;
pub mod summary;

use std::io::Read;
use std::path::{Path, PathBuf};

use fatura_core::DocumentType;
use fatura_db::{Database, DbConfig, DbError};
use tracing::info;

use cli::{Cli, Command};
use config::AppConfig;
use draft::DocumentDraft;
use error::{ApiError, ApiResult};
use state::{DocumentState, NumberingState};

/// Runs one CLI invocation and returns what should go to stdout.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Load config (file → env → --db)                                     │
/// │  2. Open the counter database (only for commands that number)          │
/// │  3. Build state objects                                                 │
/// │  4. Dispatch the subcommand                                             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(cli: Cli) -> ApiResult<String> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.database.path = Some(db);
    }

    match cli.command {
        Command::Config => toml::to_string_pretty(&config).map_err(|e| ApiError::internal(e.to_string())),

        Command::NextNumber { document_type } => {
            let document_type: DocumentType = document_type.parse()?;
            let db = open_database(&config).await?;
            let numbering = NumberingState::new(db.counters(), config.document.counter_key.clone());

            let number = numbering.generator().allocate(document_type).await;
            db.close().await;
            Ok(number)
        }

        Command::Summarize { draft } => {
            let draft = DocumentDraft::from_json(&read_draft(&draft)?)?;
            let db = open_database(&config).await?;
            let numbering = NumberingState::new(db.counters(), config.document.counter_key.clone());
            let rules = config.warranty_rules();
            let document = DocumentState::from_config(&config);

            draft.apply(&document, &numbering, &rules).await?;
            db.close().await;

            let summary = commands::document::get_document_summary(&document, &rules, &config);
            Ok(serde_json::to_string_pretty(&summary)?)
        }
    }
}

async fn open_database(config: &AppConfig) -> ApiResult<Database> {
    let path: PathBuf = config.database_path()?;
    info!(?path, "Opening counter database");
    let db = Database::new(DbConfig::new(&path)).await?;
    if !db.health_check().await {
        return Err(DbError::ConnectionFailed(format!("{} does not answer queries", path.display())).into());
    }
    Ok(db)
}

fn read_draft(path: &Path) -> ApiResult<String> {
    let result = if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text).map(|_| text)
    } else {
        std::fs::read_to_string(path)
    };
    result.map_err(|e| ApiError::validation(format!("Cannot read draft {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::Utc;

    fn scratch_dir(name: &str) -> PathBuf {
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let dir = std::env::temp_dir().join(format!("fatura-cli-{}-{}-{}", name, std::process::id(), nanos));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cli(dir: &Path, command: Command) -> Cli {
        let config = dir.join("fatura.toml");
        if !config.exists() {
            std::fs::write(&config, "").unwrap();
        }
        Cli {
            config: Some(config),
            db: Some(dir.join("fatura.db")),
            command,
        }
    }

    #[tokio::test]
    async fn test_next_number_persists_across_runs() {
        let dir = scratch_dir("numbers");

        let first = run(cli(&dir, Command::NextNumber { document_type: "invoice".into() })).await.unwrap();
        let second = run(cli(&dir, Command::NextNumber { document_type: "quote".into() })).await.unwrap();

        assert!(first.starts_with("INV-") && first.ends_with("0000"));
        assert!(second.starts_with("Q-") && second.ends_with("0001"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_next_number_rejects_unknown_type() {
        let dir = scratch_dir("badtype");
        let err = run(cli(&dir, Command::NextNumber { document_type: "receipt".into() })).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownDocumentType);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_summarize_draft_file() {
        let dir = scratch_dir("summarize");
        let draft = dir.join("draft.json");
        std::fs::write(
            &draft,
            r#"{ "document_type": "quote", "items": [ { "item_code": "500", "unit_price": "100" } ] }"#,
        )
        .unwrap();

        let output = run(cli(&dir, Command::Summarize { draft })).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["document"]["title_english"], "Quotation");
        assert_eq!(json["totals"]["final_total"], "115.00");
        assert_eq!(json["warranty"]["applies"], true);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_config_prints_toml() {
        let dir = scratch_dir("config");
        std::fs::write(dir.join("fatura.toml"), "[document]\nprinted_by = \"Tester\"\n").unwrap();

        let output = run(cli(&dir, Command::Config)).await.unwrap();
        assert!(output.contains("printed_by = \"Tester\""));
        assert!(output.contains("fatura.db"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
