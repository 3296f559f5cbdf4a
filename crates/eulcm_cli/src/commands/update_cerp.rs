use anyhow::Result;
use clap::Args;
use eulcm_core::models::boda::EmailMessage;
use eulcm_core::models::RepositoryObject;
use eulcm_store::{ObjectStore, Repository};

#[derive(Debug, Args)]
pub struct UpdateCerpArgs {
    /// Email message pid
    #[arg(short, long)]
    pub pid: String,
}

pub fn execute<S: ObjectStore>(repo: &Repository<S>, args: UpdateCerpArgs) -> Result<()> {
    let mut message: EmailMessage = repo.get_object(&args.pid)?;
    message.update_cerp()?;
    repo.save(&mut message)?;
    println!("✅ CERP regenerated for {}", message.pid());
    Ok(())
}
