use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use eulcm_core::models::boda::{Mailbox, RushdieFile};
use eulcm_core::models::RepositoryObject;
use eulcm_core::xmlmap::filetech::FileMasterTechBase;
use eulcm_store::{ObjectStore, Repository};

#[derive(Debug, Args)]
pub struct AddFileArgs {
    /// Mailbox the file is a constituent of
    #[arg(short, long)]
    pub mailbox: String,

    /// Path to the recovered file
    #[arg(short, long)]
    pub file: PathBuf,

    /// MIME type of the original file
    #[arg(long, default_value = "application/octet-stream")]
    pub mimetype: String,

    /// Computer the file was recovered from (e.g. "Performa 5400")
    #[arg(long)]
    pub computer: Option<String>,

    /// Absolute path of the file on that computer
    #[arg(long)]
    pub original_path: Option<String>,

    /// Optional PDF rendering of the file
    #[arg(long)]
    pub pdf: Option<PathBuf>,
}

pub fn execute<S: ObjectStore>(repo: &Repository<S>, args: AddFileArgs) -> Result<()> {
    println!("📎 Adding file: {:?}", args.file);

    let content = fs::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let mailbox: Mailbox = repo
        .get_object(&args.mailbox)
        .with_context(|| format!("Mailbox {} could not be loaded", args.mailbox))?;

    let mut file: RushdieFile = repo.create_object(None)?;
    file.original.set_content(content);
    file.original.set_mimetype(&args.mimetype);
    file.set_mailbox(Some(&mailbox));

    if let Some(pdf) = &args.pdf {
        let bytes = fs::read(pdf).with_context(|| format!("Failed to read {}", pdf.display()))?;
        file.pdf.set_content(bytes);
    }

    if args.computer.is_some() || args.original_path.is_some() {
        let mut entry = FileMasterTechBase::new();
        entry.set_computer(args.computer.as_deref())?;
        entry.set_path(args.original_path.as_deref())?;
        file.set_label(entry.name().as_deref());
        file.filetech.content_mut()?.push_file(entry)?;
    } else {
        let name = args.file.file_name().map(|name| name.to_string_lossy().into_owned());
        file.set_label(name.as_deref());
    }

    repo.save(&mut file)?;
    println!("✅ File stored. PID: {}", file.pid());
    Ok(())
}
