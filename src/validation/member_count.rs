use serde::{Deserialize, Serialize};

use crate::wizard::errors::WizardError;

/// Accepted transfer volume. `max` is only enforced when set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberLimits {
    pub min: u32,
    pub max: Option<u32>,
}

impl Default for MemberLimits {
    fn default() -> Self {
        Self { min: 100, max: None }
    }
}

impl MemberLimits {
    pub fn contains(&self, count: u32) -> bool {
        count >= self.min && self.max.is_none_or(|max| count <= max)
    }
}

/// Parse a free-text count. Anything that is not a base-10 integer counts as "not a number".
pub fn parse_member_count(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok()
}

pub fn validate_member_count(count: Option<u32>, limits: &MemberLimits) -> Result<u32, WizardError> {
    match count {
        Some(n) if limits.contains(n) => Ok(n),
        _ => Err(WizardError::InvalidMemberCount {
            value: count,
            min: limits.min,
            max: limits.max,
        }),
    }
}
