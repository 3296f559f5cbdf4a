// eulcm_cli/src/main.rs
use anyhow::Result;
use clap::{Parser, Subcommand};
use eulcm_store::{DirStore, Repository};
use tracing_subscriber::EnvFilter;

use eulcm_cli::commands;
use eulcm_cli::config::Config;

#[derive(Parser)]
#[command(name = "eulcm")]
#[command(about = "Born-digital content models for a Fedora-style repository", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a MODS-described (1.1) collection
    CreateCollection(commands::create_collection::CreateCollectionArgs),

    /// Create a mailbox, optionally inside a collection
    CreateMailbox(commands::create_mailbox::CreateMailboxArgs),

    /// Ingest a raw email message into a mailbox
    IngestMail(commands::ingest_mail::IngestMailArgs),

    /// Add a legacy file as a constituent of a mailbox
    AddFile(commands::add_file::AddFileArgs),

    /// Regenerate an email message's CERP from its MIME source
    UpdateCerp(commands::update_cerp::UpdateCerpArgs),

    /// Show a stored object record
    Show(commands::show::ShowArgs),

    /// List the messages and files of a mailbox
    Mailbox(commands::mailbox::MailboxArgs),

    /// Validate a stored object against its content model
    Validate(commands::validate::ValidateArgs),

    /// Parse a local metadata file and print its mapped fields
    Inspect(commands::inspect::InspectArgs),

    /// Print content-model declarations as JSON
    Models(commands::models::ModelsArgs),
}

fn main() -> Result<()> {
    // Logs go to stderr so command output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        // Pure logic: no store needed
        Commands::Inspect(args) => commands::inspect::execute(args),
        Commands::Models(args) => commands::models::execute(args),

        Commands::CreateCollection(args) => commands::create_collection::execute(&repository()?, args),
        Commands::CreateMailbox(args) => commands::create_mailbox::execute(&repository()?, args),
        Commands::IngestMail(args) => commands::ingest_mail::execute(&repository()?, args),
        Commands::AddFile(args) => commands::add_file::execute(&repository()?, args),
        Commands::UpdateCerp(args) => commands::update_cerp::execute(&repository()?, args),
        Commands::Show(args) => commands::show::execute(&repository()?, args),
        Commands::Mailbox(args) => commands::mailbox::execute(&repository()?, args),
        Commands::Validate(args) => commands::validate::execute(&repository()?, args),
    }
}

fn repository() -> Result<Repository<DirStore>> {
    Config::from_env()?.repository()
}
