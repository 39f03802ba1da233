use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-member pricing for one wizard variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Price of a single transferred member
    pub unit_rate: Decimal,
    /// Processing fee as a fraction of the base cost (0 disables the fee)
    pub processing_fee_rate: Decimal,
    /// Floor applied to the processing fee when a fee is charged
    pub minimum_processing_fee: Decimal,
    /// Currency label used for display only
    pub currency: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            unit_rate: Decimal::new(1, 2),
            processing_fee_rate: Decimal::ZERO,
            minimum_processing_fee: Decimal::ZERO,
            currency: "USD".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub base: Decimal,
    pub processing_fee: Decimal,
    pub total: Decimal,
}

impl CostBreakdown {
    pub const ZERO: CostBreakdown = CostBreakdown {
        base: Decimal::ZERO,
        processing_fee: Decimal::ZERO,
        total: Decimal::ZERO,
    };
}

/// `member_count * unit_rate`, the figure shown next to the count input.
pub fn estimated_cost(member_count: u32, unit_rate: Decimal) -> Decimal {
    Decimal::from(member_count) * unit_rate
}

/// Full breakdown. No fee is charged for an empty order so a zero count always costs zero.
pub fn quote(member_count: u32, pricing: &PricingConfig) -> CostBreakdown {
    if member_count == 0 {
        return CostBreakdown::ZERO;
    }

    let base = estimated_cost(member_count, pricing.unit_rate);
    let processing_fee = if pricing.processing_fee_rate.is_zero() && pricing.minimum_processing_fee.is_zero() {
        Decimal::ZERO
    } else {
        (base * pricing.processing_fee_rate).max(pricing.minimum_processing_fee)
    };

    CostBreakdown {
        base,
        processing_fee,
        total: base + processing_fee,
    }
}

/// Two-decimal money string, e.g. `$10.00`.
pub fn format_amount(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

/// Per-member rate with every significant digit and at least two decimals, e.g. `$0.015`.
pub fn format_rate(rate: Decimal) -> String {
    let rate = rate.normalize();
    let places = rate.scale().max(2) as usize;
    format!("${:.*}", places, rate)
}
