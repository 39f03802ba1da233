use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::{WizardConfig, WizardVariant};
use crate::pricing::{format_amount, format_rate, quote, CostBreakdown};
use crate::validation::member_count::validate_member_count;

pub struct QuoteCommand {
    pub members: u32,
    pub json: bool,
}

/// Machine readable quote, printed with `--json`
#[derive(Debug, Serialize)]
struct QuoteReport<'a> {
    variant: WizardVariant,
    members: u32,
    unit_rate: Decimal,
    #[serde(flatten)]
    breakdown: CostBreakdown,
    currency: &'a str,
    accepted: bool,
    warning: Option<String>,
}

impl QuoteCommand {
    pub fn new(members: u32, json: bool) -> Self {
        Self { members, json }
    }

    pub fn execute(&self, config: &WizardConfig) -> Result<()> {
        let breakdown = quote(self.members, &config.pricing);
        let limits = validate_member_count(Some(self.members), &config.limits).err();

        if self.json {
            let report = QuoteReport {
                variant: config.variant,
                members: self.members,
                unit_rate: config.pricing.unit_rate,
                breakdown,
                currency: &config.pricing.currency,
                accepted: limits.is_none(),
                warning: limits.map(|e| e.to_string()),
            };
            let rendered = serde_json::to_string_pretty(&report).context("Failed to render quote as JSON")?;
            println!("{rendered}");
            return Ok(());
        }

        println!("💵 QUOTE ({} preset)", config.variant);
        println!("────────────────────");
        println!("   Members:        {}", self.members);
        println!("   Rate:           {} per member", format_rate(config.pricing.unit_rate));
        println!("   Base cost:      {}", format_amount(breakdown.base));
        if !breakdown.processing_fee.is_zero() {
            println!("   Processing fee: {}", format_amount(breakdown.processing_fee));
        }
        println!("   Total:          {} {}", format_amount(breakdown.total), config.pricing.currency);

        if let Some(e) = limits {
            println!();
            println!("⚠️  {e}");
        }
        Ok(())
    }
}
