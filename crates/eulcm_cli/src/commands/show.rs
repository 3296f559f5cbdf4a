use anyhow::Result;
use clap::Args;
use eulcm_core::models::relation::Predicate;
use eulcm_store::{ObjectStore, Repository};

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Object pid
    #[arg(short, long)]
    pub pid: String,

    /// Print the full stored record as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute<S: ObjectStore>(repo: &Repository<S>, args: ShowArgs) -> Result<()> {
    let object = repo.store().fetch(&args.pid)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&object)?);
        return Ok(());
    }

    println!("📦 {}", object.pid);
    println!("   Label: {}", object.label.as_deref().unwrap_or("-"));
    if let Some(owner) = &object.owner {
        println!("   Owner: {}", owner);
    }
    for cmodel in &object.content_models {
        println!("   Model: {}", cmodel);
    }
    for triple in &object.relations {
        let name = Predicate::from_uri(&triple.predicate)
            .map(|p| p.local_name().to_string())
            .unwrap_or_else(|| triple.predicate.clone());
        println!("   {} -> {}", name, triple.object);
    }

    println!("{:-<50}", "-");
    for ds in object.datastreams.values() {
        println!(
            "{} [{}] {} ({} bytes, {} older versions)",
            ds.id,
            ds.control_group.code(),
            ds.mimetype,
            ds.content.len(),
            ds.versions.len()
        );
        println!("   Label: {}", ds.label);
        if let Some(checksum) = &ds.checksum {
            println!("   SHA-256: {}", checksum);
        }
    }
    Ok(())
}
