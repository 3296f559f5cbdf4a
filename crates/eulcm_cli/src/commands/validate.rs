use anyhow::{anyhow, bail, Result};
use clap::Args;
use eulcm_core::models::{find_model, ContentModel, ALL_MODELS};
use eulcm_core::models::object::DigitalObject;
use eulcm_core::standard_validator;
use eulcm_store::{ObjectStore, Repository};

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Object pid
    #[arg(short, long)]
    pub pid: String,

    /// Model to check against (see `eulcm models`); defaults to the most
    /// specific model the object declares
    #[arg(short, long)]
    pub model: Option<String>,
}

/// The matching model with the most capability bundles.
pub fn most_specific_model(object: &DigitalObject) -> Option<&'static ContentModel> {
    ALL_MODELS
        .iter()
        .copied()
        .filter(|model| model.matches(object))
        .max_by_key(|model| model.bundles.len())
}

pub fn execute<S: ObjectStore>(repo: &Repository<S>, args: ValidateArgs) -> Result<()> {
    println!("🔍 Validating: {}", args.pid);

    let object = repo.store().fetch(&args.pid)?;
    let model = match &args.model {
        Some(name) => find_model(name).ok_or_else(|| anyhow!("Unknown model '{}'", name))?,
        None => most_specific_model(&object)
            .ok_or_else(|| anyhow!("{} declares no known content model", args.pid))?,
    };
    println!("✅ Checking against model {}", model.name);

    let errors = standard_validator().run(&object, model);

    if errors.is_empty() {
        println!("🎉 VALIDATION PASSED!");
        return Ok(());
    }

    println!("⚠️  Found {} findings.", errors.len());
    println!("{:-<50}", "-");
    for err in &errors {
        let icon = if err.is_error() { "🛑" } else { "⚠️" };
        println!("{} [{}] {}", icon, err.code, err.severity);
        println!("   Msg: {}", err.message);
        if let Some(target) = &err.target_id {
            println!("   Ref: {}", target);
        }
        println!("{:-<50}", "-");
    }

    let failures = errors.iter().filter(|err| err.is_error()).count();
    if failures > 0 {
        bail!("{} failed validation with {} errors", args.pid, failures);
    }
    Ok(())
}
