use anyhow::{Context, Result};
use clap::Args;
use eulcm_core::models::boda::Mailbox;
use eulcm_core::models::collection::v1_1::Collection;
use eulcm_core::models::RepositoryObject;
use eulcm_core::xmlmap::mods::ModsCommon;
use eulcm_store::{ObjectStore, Repository};

#[derive(Debug, Args)]
pub struct CreateMailboxArgs {
    /// Object label, e.g. the account name
    #[arg(short, long)]
    pub label: String,

    /// Collection (1.1) the mailbox belongs to
    #[arg(short, long)]
    pub collection: Option<String>,

    /// Use this pid instead of minting one
    #[arg(long)]
    pub pid: Option<String>,
}

pub fn execute<S: ObjectStore>(repo: &Repository<S>, args: CreateMailboxArgs) -> Result<()> {
    let mut mailbox: Mailbox = repo.create_object(args.pid.as_deref())?;
    mailbox.set_label(Some(&args.label));
    mailbox.mods.content_mut()?.set_title(Some(&args.label))?;

    if let Some(pid) = &args.collection {
        let collection: Collection = repo
            .get_object(pid)
            .with_context(|| format!("Collection {} could not be loaded", pid))?;
        mailbox.set_collection(Some(&collection));
    }

    repo.save(&mut mailbox)?;
    println!("✅ Mailbox created. PID: {}", mailbox.pid());
    Ok(())
}
