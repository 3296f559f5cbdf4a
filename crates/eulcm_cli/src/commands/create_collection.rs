use anyhow::{Context, Result};
use clap::Args;
use eulcm_core::models::collection::v1_1::Collection;
use eulcm_core::models::RepositoryObject;
use eulcm_core::xmlmap::mods::ModsCommon;
use eulcm_store::{ObjectStore, Repository};

#[derive(Debug, Args)]
pub struct CreateCollectionArgs {
    /// Object label
    #[arg(short, long)]
    pub label: String,

    /// MODS title (defaults to the label)
    #[arg(short, long)]
    pub title: Option<String>,

    /// Short name recorded as a MODS identifier
    #[arg(long)]
    pub short_name: Option<String>,

    /// Numeric id of the collection in the source catalog
    #[arg(long)]
    pub source_id: Option<i64>,

    /// Parent collection pid, for a subcollection
    #[arg(short, long)]
    pub parent: Option<String>,

    /// Use this pid instead of minting one
    #[arg(long)]
    pub pid: Option<String>,
}

pub fn execute<S: ObjectStore>(repo: &Repository<S>, args: CreateCollectionArgs) -> Result<()> {
    let mut collection: Collection = repo.create_object(args.pid.as_deref())?;
    collection.set_label(Some(&args.label));

    if let Some(parent_pid) = &args.parent {
        let parent: Collection = repo
            .get_object(parent_pid)
            .with_context(|| format!("Parent collection {} could not be loaded", parent_pid))?;
        collection.set_collection(Some(&parent));
    }

    let mods = collection.mods.content_mut()?;
    mods.set_title(Some(args.title.as_deref().unwrap_or(&args.label)))?;
    mods.set_short_name(args.short_name.as_deref())?;
    mods.set_source_id(args.source_id)?;

    repo.save(&mut collection)?;
    println!("✅ Collection created. PID: {}", collection.pid());
    Ok(())
}
