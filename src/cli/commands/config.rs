use anyhow::Result;
use std::path::PathBuf;

use crate::config::WizardConfig;

pub struct ConfigCommand {
    pub write: Option<PathBuf>,
}

impl ConfigCommand {
    pub fn new(write: Option<PathBuf>) -> Self {
        Self { write }
    }

    pub fn execute(&self, config: &WizardConfig) -> Result<()> {
        match &self.write {
            Some(path) => {
                config.save_to_file(path)?;
                println!("✅ Wrote {} configuration to {}", config.variant, path.display());
            }
            None => print!("{}", config.to_toml_string()?),
        }
        Ok(())
    }
}
