use anyhow::Result;

use crate::config::WizardConfig;
use crate::pricing::format_rate;

pub mod check_link;
pub mod config;
pub mod quote;
pub mod run;

pub use check_link::CheckLinkCommand;
pub use config::ConfigCommand;
pub use quote::QuoteCommand;
pub use run::RunCommand;

pub fn show_getting_started(config: &WizardConfig) -> Result<()> {
    println!("🚚 Member Transfer Wizard");
    println!();
    println!("Active preset: {} ({} steps, {} per member)",
        config.variant,
        config.flow.total_steps,
        format_rate(config.pricing.unit_rate));
    println!();
    println!("To get started:");
    println!("  💵 transfer-wizard quote --members 1000");
    println!("  🔗 transfer-wizard check-link https://t.me/cryptotraders");
    println!("  🚀 transfer-wizard run --source <link> --destination <link> --members <n>");
    println!("  ⚙️  transfer-wizard config");
    println!();
    println!("💡 Pick another preset with --variant strict or --variant compact");
    Ok(())
}
