use anyhow::Result;
use clap::Args;
use eulcm_core::models::boda::Mailbox;
use eulcm_core::models::RepositoryObject;
use eulcm_store::{ObjectStore, Repository};

#[derive(Debug, Args)]
pub struct MailboxArgs {
    /// Mailbox pid
    #[arg(short, long)]
    pub pid: String,
}

pub fn execute<S: ObjectStore>(repo: &Repository<S>, args: MailboxArgs) -> Result<()> {
    let mailbox: Mailbox = repo.get_object(&args.pid)?;
    println!("📬 {} {}", mailbox.pid(), mailbox.label().unwrap_or_default());

    let messages = repo.mailbox_messages(&mailbox)?;
    println!("Messages: {}", messages.len());
    for message in &messages {
        println!("   {}  {}", message.pid(), message.label().unwrap_or("(no subject)"));
    }

    let files = repo.mailbox_constituent_files(&mailbox)?;
    println!("Files: {}", files.len());
    for file in &files {
        println!(
            "   {}  {}  [{}]",
            file.pid(),
            file.label().unwrap_or("-"),
            file.original.mimetype()
        );
    }
    Ok(())
}
