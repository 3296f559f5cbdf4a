use anyhow::{anyhow, Result};
use clap::Args;
use eulcm_core::models::{find_model, ALL_MODELS};

#[derive(Debug, Args)]
pub struct ModelsArgs {
    /// Only this model (e.g. "EmailMessage", "Collection-1.1")
    #[arg(short, long)]
    pub name: Option<String>,
}

pub fn execute(args: ModelsArgs) -> Result<()> {
    let descriptions = match &args.name {
        Some(name) => {
            let model = find_model(name).ok_or_else(|| anyhow!("Unknown model '{}'", name))?;
            vec![model.describe()]
        }
        None => ALL_MODELS.iter().map(|model| model.describe()).collect(),
    };
    println!("{}", serde_json::to_string_pretty(&descriptions)?);
    Ok(())
}
