use anyhow::{bail, Result};

use crate::validation::links::is_valid_group_link;

pub struct CheckLinkCommand {
    pub links: Vec<String>,
}

impl CheckLinkCommand {
    pub fn new(links: Vec<String>) -> Self {
        Self { links }
    }

    pub fn execute(&self) -> Result<()> {
        let mut invalid = 0;
        for link in &self.links {
            if is_valid_group_link(link) {
                println!("✅ {link}");
            } else {
                invalid += 1;
                println!("❌ {link}");
            }
        }

        if invalid > 0 {
            println!();
            println!("💡 Links must look like https://t.me/<handle>, optionally ending in ?join");
            bail!("{invalid} of {} links rejected", self.links.len());
        }
        Ok(())
    }
}
