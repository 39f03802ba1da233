use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::pricing::PricingConfig;
use crate::validation::member_count::MemberLimits;
use crate::validation::payment_proof::DEFAULT_MAX_PROOF_BYTES;

/// Environment variable prefix for overrides, e.g. `TRANSFER_WIZARD_PRICING__UNIT_RATE`
pub const ENV_PREFIX: &str = "TRANSFER_WIZARD";

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "transfer-wizard.toml";

/// Named presets for the wizard. They differ in steps, limits, pricing and proof rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WizardVariant {
    /// Four steps, at least 100 members, $0.01 per member
    #[default]
    Standard,
    /// Four steps, 100 to 50,000 members, $0.015 per member plus processing fee, proof required
    Strict,
    /// Three steps with payment and confirmation merged, $0.04 per member
    Compact,
}

impl std::fmt::Display for WizardVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WizardVariant::Standard => write!(f, "standard"),
            WizardVariant::Strict => write!(f, "strict"),
            WizardVariant::Compact => write!(f, "compact"),
        }
    }
}

impl std::str::FromStr for WizardVariant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(WizardVariant::Standard),
            "strict" => Ok(WizardVariant::Strict),
            "compact" => Ok(WizardVariant::Compact),
            other => Err(format!("unknown wizard variant '{other}'")),
        }
    }
}

/// Main configuration structure for the transfer wizard
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WizardConfig {
    /// Preset the remaining values were derived from
    pub variant: WizardVariant,
    /// Step layout and payment proof rules
    pub flow: FlowConfig,
    /// Accepted member counts
    pub limits: MemberLimits,
    /// Cost calculation
    pub pricing: PricingConfig,
    /// Simulated backend timings and randomness
    pub simulation: SimulationConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FlowConfig {
    /// 3 or 4; with 3 the payment step doubles as confirmation
    pub total_steps: u8,
    /// Refuse to submit without an attached payment proof
    pub require_payment_proof: bool,
    /// Largest accepted proof file in bytes
    pub max_proof_bytes: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// Time spent in the validating phase
    pub validating_delay_ms: u64,
    /// Time spent in the processing phase
    pub processing_delay_ms: u64,
    /// Interval between transfer progress polls
    pub poll_interval_ms: u64,
    /// Smallest progress increment per poll
    pub progress_step_min: u8,
    /// Largest progress increment per poll
    pub progress_step_max: u8,
    /// Chance in [0, 1] that the simulated transfer fails
    pub failure_rate: f64,
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Default filter directive when RUST_LOG is unset
    pub log_level: String,
    /// Human readable or JSON lines
    pub log_format: LogFormat,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            total_steps: 4,
            require_payment_proof: false,
            max_proof_bytes: DEFAULT_MAX_PROOF_BYTES,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            validating_delay_ms: 2000,
            processing_delay_ms: 2000,
            poll_interval_ms: 1000,
            progress_step_min: 3,
            progress_step_max: 10,
            failure_rate: 0.0,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Same shape with every delay removed, for scripted runs.
    pub fn instant(&self) -> Self {
        Self {
            validating_delay_ms: 0,
            processing_delay_ms: 0,
            poll_interval_ms: 0,
            ..self.clone()
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self::preset(WizardVariant::Standard)
    }
}

impl WizardConfig {
    /// Built-in values for a variant, before any file or environment overrides.
    pub fn preset(variant: WizardVariant) -> Self {
        let base = Self {
            variant,
            flow: FlowConfig::default(),
            limits: MemberLimits::default(),
            pricing: PricingConfig::default(),
            simulation: SimulationConfig::default(),
            observability: ObservabilityConfig::default(),
        };

        match variant {
            WizardVariant::Standard => base,
            WizardVariant::Strict => Self {
                flow: FlowConfig {
                    require_payment_proof: true,
                    ..base.flow
                },
                limits: MemberLimits {
                    min: 100,
                    max: Some(50_000),
                },
                pricing: PricingConfig {
                    unit_rate: Decimal::new(15, 3),
                    processing_fee_rate: Decimal::new(1, 1),
                    minimum_processing_fee: Decimal::new(5, 0),
                    ..base.pricing
                },
                simulation: SimulationConfig {
                    failure_rate: 0.05,
                    ..base.simulation
                },
                ..base
            },
            WizardVariant::Compact => Self {
                flow: FlowConfig {
                    total_steps: 3,
                    ..base.flow
                },
                pricing: PricingConfig {
                    unit_rate: Decimal::new(4, 2),
                    ..base.pricing
                },
                simulation: SimulationConfig {
                    validating_delay_ms: 0,
                    processing_delay_ms: 3000,
                    poll_interval_ms: 0,
                    progress_step_min: 100,
                    progress_step_max: 100,
                    ..base.simulation
                },
                ..base
            },
        }
    }

    /// Load configuration from multiple sources with precedence:
    /// 1. Variant preset (argument, else `TRANSFER_WIZARD_VARIANT`, else standard)
    /// 2. Configuration file (explicit path, else `transfer-wizard.toml` if present)
    /// 3. Environment variables prefixed with `TRANSFER_WIZARD_`
    pub fn load(variant: Option<WizardVariant>, path: Option<&Path>) -> Result<Self> {
        let variant = match variant {
            Some(v) => v,
            None => match std::env::var(format!("{ENV_PREFIX}_VARIANT")) {
                Ok(raw) => raw.parse().map_err(anyhow::Error::msg)?,
                Err(_) => WizardVariant::default(),
            },
        };

        let preset = Self::preset(variant);
        let mut builder = Config::builder().add_source(
            Config::try_from(&preset).context("Failed to serialize wizard preset")?,
        );

        match path {
            Some(path) => {
                if !path.exists() {
                    bail!("Configuration file {} does not exist", path.display());
                }
                builder = builder.add_source(File::from(path));
            }
            None => {
                if Path::new(DEFAULT_CONFIG_FILE).exists() {
                    builder = builder.add_source(File::with_name(DEFAULT_CONFIG_FILE));
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: WizardConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Invalid wizard configuration")?;
        config.variant = variant;
        config.validate()?;

        tracing::debug!(variant = %config.variant, "Wizard configuration loaded");
        Ok(config)
    }

    /// Reject combinations the workflow cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(3..=4).contains(&self.flow.total_steps) {
            bail!("flow.total_steps must be 3 or 4, got {}", self.flow.total_steps);
        }
        if let Some(max) = self.limits.max {
            if max < self.limits.min {
                bail!("limits.max ({max}) is below limits.min ({})", self.limits.min);
            }
        }
        if self.pricing.unit_rate.is_sign_negative()
            || self.pricing.processing_fee_rate.is_sign_negative()
            || self.pricing.minimum_processing_fee.is_sign_negative()
        {
            bail!("pricing values must not be negative");
        }
        let sim = &self.simulation;
        if sim.progress_step_min == 0 || sim.progress_step_min > sim.progress_step_max {
            bail!(
                "simulation progress step range {}..={} is empty or zero",
                sim.progress_step_min,
                sim.progress_step_max
            );
        }
        if !(0.0..=1.0).contains(&sim.failure_rate) {
            bail!("simulation.failure_rate must be within [0, 1], got {}", sim.failure_rate);
        }
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to render configuration as TOML")
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Load .env from the working directory if it exists.
    /// Runs before logging is set up, so the caller reports the outcome.
    pub fn load_env_file() -> Result<bool> {
        Self::load_env_file_from(Path::new(".env"))
    }

    /// Load a dotenv file; `Ok(false)` when there is none.
    pub fn load_env_file_from(path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }
        dotenvy::from_path(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(true)
    }
}
