use buyoutflow::application::compliance::{ComplianceFilter, compliance_rows, compliance_summary};
use buyoutflow::application::engine::ApprovalEngine;
use buyoutflow::domain::approval::Actor;
use buyoutflow::domain::ports::{AuditSinkBox, CommitmentStoreBox};
use buyoutflow::infrastructure::in_memory::{InMemoryAuditLog, InMemoryCommitmentStore};
use buyoutflow::interfaces::csv::action_reader::{ActionReader, ActionType};
use buyoutflow::interfaces::csv::commitment_reader::CommitmentReader;
use buyoutflow::interfaces::csv::compliance_writer::ComplianceWriter;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::collections::BTreeSet;
use std::fs::File;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Commitments CSV used to seed the store
    commitments: PathBuf,

    /// Workflow actions CSV (submit/approve/reject) replayed in order
    actions: PathBuf,

    /// Report on a single project (default: every project seen in the input)
    #[arg(long)]
    project: Option<String>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[cfg(feature = "storage-rocksdb")]
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[cfg(feature = "storage-rocksdb")]
fn backing(cli: &Cli) -> Result<(CommitmentStoreBox, AuditSinkBox)> {
    use buyoutflow::infrastructure::rocksdb::RocksDbStore;

    if let Some(db_path) = &cli.db_path {
        let store = RocksDbStore::open(db_path).into_diagnostic()?;
        Ok((Box::new(store.clone()), Box::new(store)))
    } else {
        Ok((
            Box::new(InMemoryCommitmentStore::new()),
            Box::new(InMemoryAuditLog::new()),
        ))
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn backing(_cli: &Cli) -> Result<(CommitmentStoreBox, AuditSinkBox)> {
    Ok((
        Box::new(InMemoryCommitmentStore::new()),
        Box::new(InMemoryAuditLog::new()),
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let (store, audit) = backing(&cli)?;
    let engine = ApprovalEngine::new(store, audit);

    // Seed commitments. Per-row failures are reported and skipped so one bad
    // line does not abort the run.
    let mut projects = BTreeSet::new();
    let file = File::open(&cli.commitments).into_diagnostic()?;
    for record in CommitmentReader::new(file).records() {
        match record.map(|r| r.into_entry()) {
            Ok(Ok(entry)) => {
                projects.insert(entry.project_code.clone());
                if let Err(e) = engine.add(entry, &Actor::default()).await {
                    eprintln!("Error adding commitment: {}", e);
                }
            }
            Ok(Err(e)) => eprintln!("Error validating commitment: {}", e),
            Err(e) => eprintln!("Error reading commitment: {}", e),
        }
    }

    // Replay workflow actions in file order.
    let file = File::open(&cli.actions).into_diagnostic()?;
    for action in ActionReader::new(file).actions() {
        let action = match action {
            Ok(action) => action,
            Err(e) => {
                eprintln!("Error reading action: {}", e);
                continue;
            }
        };

        let result = match action.action {
            ActionType::Submit => {
                engine
                    .submit(&action.project, &action.entry, action.actor())
                    .await
            }
            ActionType::Approve => {
                engine
                    .respond(
                        &action.project,
                        &action.entry,
                        true,
                        action.comment.clone(),
                        action.escalate.unwrap_or(false),
                        action.actor(),
                    )
                    .await
            }
            ActionType::Reject => {
                engine
                    .respond(
                        &action.project,
                        &action.entry,
                        false,
                        action.comment.clone(),
                        false,
                        action.actor(),
                    )
                    .await
            }
        };
        if let Err(e) = result {
            eprintln!("Error processing action: {}", e);
        }
    }

    // Compliance report over final state.
    let report_projects: Vec<String> = match &cli.project {
        Some(project) => vec![project.clone()],
        None => projects.into_iter().collect(),
    };
    let mut entries = Vec::new();
    for project in &report_projects {
        entries.extend(engine.list(project).await.into_diagnostic()?);
    }

    let filter = ComplianceFilter::default();
    let rows = compliance_rows(&entries, &filter);
    let summary = compliance_summary(&entries, &filter);

    let stdout = io::stdout();
    let writer = ComplianceWriter::new(stdout.lock());
    writer.write_report(&rows, &summary).into_diagnostic()?;

    Ok(())
}
