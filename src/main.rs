use clap::Parser;
use miette::{IntoDiagnostic, Result};
use paylater::application::agreements::CreateOutcome;
use paylater::application::retry::RetryOutcome;
use paylater::application::service::{PayLaterService, ServicePorts};
use paylater::config::Config;
use paylater::domain::customer::{Cart, User};
use paylater::domain::ports::{ActivityLogStoreRef, AgreementRepository, AgreementRepositoryRef};
use paylater::infrastructure::clock::SystemClock;
use paylater::infrastructure::ids::SequentialIdGenerator;
use paylater::infrastructure::in_memory::{
    InMemoryActivityLog, InMemoryAgreementRepository, InMemoryCustomerDirectory,
};
use paylater::interfaces::csv::agreement_writer::AgreementWriter;
use paylater::interfaces::csv::command_reader::{Command, CommandReader};
use paylater::interfaces::csv::record_reader::{CartReader, UserReader};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Command script CSV file
    input: PathBuf,

    /// Users CSV file
    #[arg(long)]
    users: PathBuf,

    /// Carts CSV file
    #[arg(long)]
    carts: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Print the activity log to stderr when done
    #[arg(long)]
    show_log: bool,

    /// Maximum number of activity entries to print
    #[arg(long)]
    log_limit: Option<usize>,
}

fn load_records<T: serde::de::DeserializeOwned>(
    path: &Path,
    records: impl FnOnce(File) -> Box<dyn Iterator<Item = paylater::error::Result<T>>>,
) -> Result<Vec<T>> {
    let file = File::open(path).into_diagnostic()?;
    let mut loaded = Vec::new();
    for record in records(file) {
        match record {
            Ok(record) => loaded.push(record),
            Err(e) => eprintln!("Error reading record from {}: {}", path.display(), e),
        }
    }
    Ok(loaded)
}

#[cfg(feature = "storage-rocksdb")]
fn open_storage(db_path: Option<&Path>) -> Result<(AgreementRepositoryRef, ActivityLogStoreRef)> {
    use paylater::infrastructure::rocksdb::RocksDBStore;

    match db_path {
        Some(path) => {
            let store = RocksDBStore::open(path).into_diagnostic()?;
            let agreements: AgreementRepositoryRef = Arc::new(store.clone());
            let activity: ActivityLogStoreRef = Arc::new(store);
            Ok((agreements, activity))
        }
        None => Ok(in_memory_storage()),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_storage(db_path: Option<&Path>) -> Result<(AgreementRepositoryRef, ActivityLogStoreRef)> {
    if db_path.is_some() {
        eprintln!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(in_memory_storage())
}

fn in_memory_storage() -> (AgreementRepositoryRef, ActivityLogStoreRef) {
    let agreements: AgreementRepositoryRef = Arc::new(InMemoryAgreementRepository::new());
    let activity: ActivityLogStoreRef = Arc::new(InMemoryActivityLog::new());
    (agreements, activity)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let users: Vec<User> = load_records(&cli.users, |file| {
        Box::new(UserReader::new(file).records())
    })?;
    let carts: Vec<Cart> = load_records(&cli.carts, |file| {
        Box::new(CartReader::new(file).records())
    })?;
    tracing::info!(users = users.len(), carts = carts.len(), "customer records loaded");

    let db_path = cli.db_path.or(config.db_path);
    let (agreements, activity) = open_storage(db_path.as_deref())?;

    // Continue numbering after agreements already in a persistent store.
    let existing = agreements.all().await.into_diagnostic()?.len() as u64;
    let service = PayLaterService::new(ServicePorts {
        directory: Arc::new(InMemoryCustomerDirectory::with_records(users, carts)),
        agreements,
        activity,
        clock: Arc::new(SystemClock),
        ids: Arc::new(SequentialIdGenerator::starting_at(existing + 1)),
    })
    .await
    .into_diagnostic()?;

    let mut reported_users: Vec<String> = Vec::new();
    let file = File::open(&cli.input).into_diagnostic()?;
    for command in CommandReader::new(file).commands() {
        let command = match command {
            Ok(command) => command,
            Err(e) => {
                eprintln!("Error reading command: {}", e);
                continue;
            }
        };

        let result = match command {
            Command::Eligible { user, cart } => {
                let outcome = service.is_eligible(&user, &cart).await;
                if let Ok(eligibility) = &outcome {
                    eprintln!("Eligibility of {user}/{cart}: {eligibility}");
                }
                if !reported_users.contains(&user) {
                    reported_users.push(user);
                }
                outcome.map(|_| ())
            }
            Command::Create { user, cart } => {
                let outcome = service.create_agreement(&user, &cart).await;
                if let Ok(CreateOutcome::Rejected(reason)) = &outcome {
                    eprintln!("Agreement not created for {user}/{cart}: {reason}");
                }
                if !reported_users.contains(&user) {
                    reported_users.push(user);
                }
                outcome.map(|_| ())
            }
            Command::Retry {
                agreement,
                installment,
            } => {
                let outcome = service.retry_payment(&agreement, installment).await;
                if let Ok(RetryOutcome::Rejected(rejection)) = &outcome {
                    eprintln!("Retry of {agreement} installment {installment} rejected: {rejection}");
                }
                outcome.map(|_| ())
            }
            Command::SimulateFailure { enabled } => service.set_simulate_failure(enabled).await,
        };

        if let Err(e) = result {
            eprintln!("Error processing command: {}", e);
        }
    }

    let mut snapshot = Vec::new();
    for user in &reported_users {
        snapshot.extend(
            service
                .list_agreements_for_user(user)
                .await
                .into_diagnostic()?,
        );
    }

    let stdout = io::stdout();
    let mut writer = AgreementWriter::new(stdout.lock());
    writer.write_agreements(&snapshot).into_diagnostic()?;

    if cli.show_log {
        let limit = cli.log_limit.unwrap_or(config.log_limit);
        for entry in service.read_activity_log(Some(limit)).await.into_diagnostic()? {
            eprintln!("{} {}", entry.timestamp.to_rfc3339(), entry.message);
        }
    }

    Ok(())
}
