use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use eulcm_store::repository::DEFAULT_PIDSPACE;
use eulcm_store::{DirStore, Repository};

#[derive(Clone, Debug)]
pub struct Config {
    pub store_dir: PathBuf,
    pub pidspace: String,
    pub owner: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok(); // Load .env if present

        Ok(Config {
            store_dir: env::var("EULCM_STORE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("eulcm-data")),

            pidspace: env::var("EULCM_PIDSPACE")
                .unwrap_or_else(|_| DEFAULT_PIDSPACE.to_string()),

            owner: env::var("EULCM_OWNER").ok().filter(|owner| !owner.is_empty()),
        })
    }

    pub fn repository(&self) -> Result<Repository<DirStore>> {
        let store = DirStore::open(&self.store_dir)
            .with_context(|| format!("Failed to open store at {}", self.store_dir.display()))?;
        let repo = Repository::new(store).with_pidspace(&self.pidspace);
        Ok(match &self.owner {
            Some(owner) => repo.with_owner(owner),
            None => repo,
        })
    }
}
