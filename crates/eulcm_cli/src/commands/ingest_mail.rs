use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use eulcm_core::models::boda::{EmailMessage, Mailbox};
use eulcm_core::models::RepositoryObject;
use eulcm_store::{ObjectStore, Repository};

#[derive(Debug, Args)]
pub struct IngestMailArgs {
    /// Mailbox the message is part of
    #[arg(short, long)]
    pub mailbox: String,

    /// Path to the raw RFC 822 message (.eml)
    #[arg(short, long)]
    pub file: PathBuf,

    /// Store the MIME source only; CERP can be generated later with update-cerp
    #[arg(long)]
    pub skip_cerp: bool,
}

pub fn execute<S: ObjectStore>(repo: &Repository<S>, args: IngestMailArgs) -> Result<()> {
    println!("📨 Ingesting message: {:?}", args.file);

    let raw = fs::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let mailbox: Mailbox = repo
        .get_object(&args.mailbox)
        .with_context(|| format!("Mailbox {} could not be loaded", args.mailbox))?;

    let mut message: EmailMessage = repo.create_object(None)?;
    message.mime.set_content(raw);
    message.set_mailbox(Some(&mailbox));

    if !args.skip_cerp {
        message.update_cerp().context("MIME source could not be converted to CERP")?;
        let subject = message.cerp.content()?.subject.clone();
        message.set_label(subject.as_deref());
    }

    repo.save(&mut message)?;
    println!("✅ Message stored. PID: {}", message.pid());
    Ok(())
}
