//! # vp-history
//!
//! Inspect presentation logs, mdoc VP Tokens and deletion plans from the
//! command line.

mod store;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;
use vp_history::mdoc::{DecodedClaims, decode_vp_token};
use vp_history::{DocumentType, DocumentTypeIndex, HistoryConfig, PresentationSubmission};

use crate::store::LogFile;

#[derive(Parser)]
#[command(name = "vp-history", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (JSON).
    #[arg(short, long, global = true, env = "VP_HISTORY_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Decode an mdoc VP Token and print its claims.
    Decode {
        /// base64url-encoded `DeviceResponse`.
        token: String,
    },

    /// Resolve stored token fields into a client consent.
    Consent {
        /// SIOP ID Token.
        #[arg(long)]
        id_token: Option<String>,

        /// VP Token.
        #[arg(long)]
        vp_token: Option<String>,

        /// Presentation Submission file (JSON).
        #[arg(long)]
        submission: Option<PathBuf>,

        /// Message recorded for the exchange.
        #[arg(long)]
        message: Option<String>,
    },

    /// Print presentation summaries.
    History {
        /// Presentation log file (JSON array).
        #[arg(long)]
        logs: PathBuf,
    },

    /// Print the detail of a single presentation.
    Detail {
        /// Presentation log file (JSON array).
        #[arg(long)]
        logs: PathBuf,

        /// Log entry id.
        #[arg(long)]
        id: String,

        /// Decode and include presented claims.
        #[arg(long)]
        claims: bool,
    },

    /// Print the plan for deleting a document.
    Plan {
        /// Document type index file (JSON object of type to document ids).
        #[arg(long)]
        index: PathBuf,

        /// Document id.
        #[arg(long)]
        id: String,

        /// Document type.
        #[arg(long)]
        doc_type: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let config = match &cli.config {
        Some(path) => HistoryConfig::load(path)?,
        None => HistoryConfig::default(),
    };

    match cli.command {
        Command::Decode { token } => {
            let claims = decode_vp_token(&token)?;
            print(&claims_json(&claims, &config))
        }
        Command::Consent {
            id_token,
            vp_token,
            submission,
            message,
        } => {
            let submission: Option<PresentationSubmission> =
                submission.as_deref().map(read_json).transpose()?;
            let consent = vp_history::resolve_consent(
                id_token.as_deref(),
                vp_token.as_deref(),
                submission.as_ref(),
                message.as_deref(),
            );
            print(&consent)
        }
        Command::History { logs } => {
            let store = LogFile::open(&logs)?;
            let records = vp_history::history(&store).await?;
            let rows: Vec<Value> = records
                .iter()
                .map(|record| {
                    json!({
                        "id": record.id,
                        "verifier": record.verifier_name,
                        "date": record.submit_at.format("%Y-%m-%d").to_string(),
                        "status": record.outcome().to_string(),
                    })
                })
                .collect();
            print(&rows)
        }
        Command::Detail { logs, id, claims } => {
            let store = LogFile::open(&logs)?;
            let detail = vp_history::history_detail(&store, &id).await?;
            let mut output = serde_json::to_value(&detail)?;

            if claims && let Some(decoded) = detail.claims() {
                let value = match decoded {
                    Ok(decoded) => claims_json(&decoded, &config),
                    Err(e) => json!({ "error": e }),
                };
                output["claims"] = value;
            }
            print(&output)
        }
        Command::Plan { index, id, doc_type } => {
            let index: DocumentTypeIndex = read_json(&index)?;
            let doc_type = DocumentType::from(doc_type);
            let plan = vp_history::plan_deletion(&id, &doc_type, &index, &config.deletion);
            print(&plan)
        }
    }
}

// Claims grouped by name space, with display fields for the configured name
// space.
fn claims_json(claims: &DecodedClaims, config: &HistoryConfig) -> Value {
    let display = &config.display;

    let groups: Vec<Value> = claims
        .iter()
        .map(|group| {
            let mut value = json!({
                "docType": group.doc_type,
                "namespace": group.namespace,
                "items": group.items,
            });
            if group.namespace == display.namespace {
                let fields = group.display_fields(
                    &display.name_identifier,
                    display.detail_identifier.as_deref(),
                );
                value["display"] = json!({
                    "name": fields.name.map(|v| v.to_json()),
                    "detail": fields.detail.map(|v| v.to_json()),
                });
            }
            value
        })
        .collect();

    Value::Array(groups)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("issue reading {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("issue parsing {}", path.display()))
}

fn print(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
